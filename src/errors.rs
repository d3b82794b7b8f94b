//! Error model: the validator-name taxonomy, rejection paths, and the
//! split between validation failures and schema-construction faults.
//!
//! A `ValidationError` is the sole rejection artifact a caller sees for bad
//! input: which validator rejected, one human message, and where in the
//! value it happened. Everything else (malformed range text, a bad pattern,
//! an unknown registry name) is a `SchemaError`, a caller bug rather than an
//! input problem, and never wears the validator/message/path shape.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of validator names, one per pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    /// Type check / coercion
    Type,
    /// Presence check
    Required,
    /// Null acceptance
    AllowNull,
    /// Strict equality
    Equal,
    /// Undeclared object keys
    UnknownKeys,
    /// Array length bounds
    Len,
    /// Array element distinctness
    Unique,
    /// String pattern
    Match,
    /// String membership
    Enum,
    /// Number bounds
    Range,
    /// User-supplied validator chain
    Custom,
}

impl Stage {
    /// Returns the canonical validator name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Type => "type",
            Stage::Required => "required",
            Stage::AllowNull => "allowNull",
            Stage::Equal => "equal",
            Stage::UnknownKeys => "unknownKeys",
            Stage::Len => "len",
            Stage::Unique => "unique",
            Stage::Match => "match",
            Stage::Enum => "enum",
            Stage::Range => "range",
            Stage::Custom => "custom",
        }
    }

    /// Resolves a canonical validator name back to its stage.
    pub fn from_name(name: &str) -> Option<Stage> {
        match name {
            "type" => Some(Stage::Type),
            "required" => Some(Stage::Required),
            "allowNull" => Some(Stage::AllowNull),
            "equal" => Some(Stage::Equal),
            "unknownKeys" => Some(Stage::UnknownKeys),
            "len" => Some(Stage::Len),
            "unique" => Some(Stage::Unique),
            "match" => Some(Stage::Match),
            "enum" => Some(Stage::Enum),
            "range" => Some(Stage::Range),
            "custom" => Some(Stage::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-descriptor message override table, keyed by validator name.
///
/// Consulted only at the moment a stage is about to fail; an entry fully
/// replaces that stage's default message, with no interpolation. The
/// validator name on the error is preserved either way.
#[derive(Debug, Clone, Default)]
pub struct Messages {
    overrides: HashMap<Stage, String>,
}

impl Messages {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the override for one validator name.
    pub fn set(&mut self, stage: Stage, message: impl Into<String>) {
        self.overrides.insert(stage, message.into());
    }

    /// Returns the override for a validator name, if any.
    pub fn get(&self, stage: Stage) -> Option<&str> {
        self.overrides.get(&stage).map(String::as_str)
    }

    /// Returns true when no overrides are set.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// One step in a rejection path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

/// Location of a rejection within the root value.
///
/// Renders as `$` for the root, dotted keys, bracketed indexes:
/// `user.address.city`, `tags[1]`, `rows[0].name`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Creates a root path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the path points at the root value.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the path segments from the root downward.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn push_key(&mut self, key: &str) {
        self.segments.push(Segment::Key(key.to_string()));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "$");
        }
        let mut first = true;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => {
                    if first {
                        write!(f, "{}", key)?;
                    } else {
                        write!(f, ".{}", key)?;
                    }
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
            first = false;
        }
        Ok(())
    }
}

/// A validation rejection: which validator, what message, where.
///
/// Immutable once constructed. Exactly one is produced per failing call:
/// the first stage to fail wins and short-circuits the rest.
#[derive(Debug, Clone)]
pub struct ValidationError {
    validator: Stage,
    message: String,
    path: Path,
}

impl ValidationError {
    /// Creates a rejection with an explicit message.
    pub fn new(validator: Stage, message: impl Into<String>, path: Path) -> Self {
        Self {
            validator,
            message: message.into(),
            path,
        }
    }

    /// Creates a rejection, consulting the override table for the failing
    /// validator and falling back to the stage's default message.
    pub(crate) fn reject(
        validator: Stage,
        path: &Path,
        overrides: &Messages,
        default_message: impl Into<String>,
    ) -> Self {
        let message = match overrides.get(validator) {
            Some(text) => text.to_string(),
            None => default_message.into(),
        };
        let err = Self {
            validator,
            message,
            path: path.clone(),
        };
        tracing::debug!(validator = validator.as_str(), path = %err.path, "validation rejected");
        err
    }

    /// Returns the name of the stage that rejected.
    pub fn validator(&self) -> Stage {
        self.validator
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the location within the root value.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.validator, self.path, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Schema-construction and registry faults, distinct from input rejections.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Range text that parses to no bound at all
    #[error("invalid range \"{0}\"")]
    InvalidRange(String),

    /// Pattern text the regex engine refused
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A JSON schema document that fits none of the shorthand forms
    #[error("invalid schema shorthand: {0}")]
    InvalidShorthand(String),

    /// An unrecognized type name in a JSON schema document
    #[error("unknown type name \"{0}\"")]
    UnknownKind(String),

    /// An unrecognized validator name in an errors table
    #[error("unknown validator name \"{0}\"")]
    UnknownStage(String),

    /// Registry lookup for a name nothing was registered under
    #[error("schema \"{0}\" is not registered")]
    UnknownSchema(String),

    /// Registered names are immutable; re-registration is refused
    #[error("schema \"{0}\" is already registered")]
    AlreadyRegistered(String),

    /// Schema file could not be read
    #[error("failed to load schema file {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Schema document was not valid JSON
    #[error("invalid schema document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for schema-construction operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Either kind of failure a top-level call can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// The input was rejected by a validator
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The schema itself was unusable
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl Error {
    /// Borrows the validation rejection, if that is what this is.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            Error::Schema(_) => None,
        }
    }

    /// Borrows the schema fault, if that is what this is.
    pub fn as_schema(&self) -> Option<&SchemaError> {
        match self {
            Error::Validation(_) => None,
            Error::Schema(err) => Some(err),
        }
    }
}
