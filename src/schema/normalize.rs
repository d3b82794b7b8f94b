//! Schema normalization: compiling the shorthand union into the canonical
//! descriptor.
//!
//! Compilation happens once, before any validation runs. It parses the
//! `len`/`range` texts into bounds, compiles the pattern text, and recurses
//! into nested schemas so the validation path never re-interprets shorthand.
//! Malformed texts are construction faults, not input rejections.

use regex::Regex;
use tracing::debug;

use crate::errors::{Messages, SchemaError, SchemaResult};
use crate::schema::types::{DefaultSource, Kind, Range, Rule, Schema, UnknownKeys};
use crate::validate::custom::CustomValidator;
use crate::value::Value;

/// The canonical compiled form of one schema node.
///
/// Immutable after compilation and shareable across concurrent validation
/// calls. Flag fields stay unset when the rule left them unset; the
/// effective value is resolved against the per-call defaults at the moment
/// a stage consults it, so one compiled descriptor serves calls with
/// different defaults.
#[derive(Debug, Clone)]
pub struct Descriptor {
    /// Resolved declared type; `Any` when none was declared
    pub kind: Kind,
    /// Whether an absent value is rejected
    pub required: Option<bool>,
    /// Whether an explicit null passes as-is
    pub allow_null: Option<bool>,
    /// Default applied when the input is absent
    pub default: Option<DefaultSource>,
    /// Exact value the input must equal
    pub equal: Option<Value>,
    /// User-supplied validator chain
    pub custom: Vec<CustomValidator>,
    /// Compiled per-key descriptors, in declaration order (objects)
    pub keys: Vec<(String, Descriptor)>,
    /// Compiled element descriptor (arrays); absent means elements pass
    /// through unvalidated
    pub items: Option<Box<Descriptor>>,
    /// Unknown-key policy (objects)
    pub unknown_keys: Option<UnknownKeys>,
    /// Length bounds (arrays)
    pub len: Option<Range>,
    /// Element distinctness (arrays)
    pub unique: Option<bool>,
    /// Wrap a lone value into a one-element array (arrays)
    pub autowrap: Option<bool>,
    /// Strip surrounding whitespace (strings)
    pub trim: Option<bool>,
    /// Compiled pattern (strings)
    pub pattern: Option<Regex>,
    /// Allowed string values
    pub one_of: Option<Vec<String>>,
    /// Value bounds (numbers)
    pub range: Option<Range>,
    /// Per-validator message overrides
    pub messages: Messages,
}

impl Default for Descriptor {
    fn default() -> Self {
        Self {
            kind: Kind::Any,
            required: None,
            allow_null: None,
            default: None,
            equal: None,
            custom: Vec::new(),
            keys: Vec::new(),
            items: None,
            unknown_keys: None,
            len: None,
            unique: None,
            autowrap: None,
            trim: None,
            pattern: None,
            one_of: None,
            range: None,
            messages: Messages::new(),
        }
    }
}

impl Schema {
    /// Compiles this schema into its canonical descriptor.
    pub fn compile(&self) -> SchemaResult<Descriptor> {
        let descriptor = compile_node(self)?;
        debug!(
            kind = descriptor.kind.name(),
            keys = descriptor.keys.len(),
            "schema compiled"
        );
        Ok(descriptor)
    }
}

fn compile_node(schema: &Schema) -> SchemaResult<Descriptor> {
    match schema {
        Schema::Kind(kind) => Ok(Descriptor {
            kind: *kind,
            ..Descriptor::default()
        }),
        Schema::Keys(pairs) => Ok(Descriptor {
            kind: Kind::Object,
            keys: compile_keys(pairs)?,
            ..Descriptor::default()
        }),
        Schema::Items(inner) => Ok(Descriptor {
            kind: Kind::Array,
            items: Some(Box::new(compile_node(inner)?)),
            ..Descriptor::default()
        }),
        Schema::Rule(rule) => compile_rule(rule),
    }
}

fn compile_keys(pairs: &[(String, Schema)]) -> SchemaResult<Vec<(String, Descriptor)>> {
    let mut keys = Vec::with_capacity(pairs.len());
    for (key, schema) in pairs {
        keys.push((key.clone(), compile_node(schema)?));
    }
    Ok(keys)
}

fn compile_rule(rule: &Rule) -> SchemaResult<Descriptor> {
    let mut descriptor = Descriptor {
        required: rule.required,
        allow_null: rule.allow_null,
        default: rule.default.clone(),
        equal: rule.equal.clone(),
        custom: rule.custom.clone(),
        unknown_keys: rule.unknown_keys,
        unique: rule.unique,
        autowrap: rule.autowrap,
        trim: rule.trim,
        one_of: rule.one_of.clone(),
        messages: rule.messages.clone(),
        ..Descriptor::default()
    };

    // Nested schema placement depends on the declared kind. An Array takes
    // any nested form as its element schema; an Object takes a key mapping.
    // Without a declared kind, a key mapping infers Object and a one-element
    // sequence infers Array; other nested forms carry no structure and are
    // ignored.
    descriptor.kind = rule.kind.unwrap_or(Kind::Any);
    if let Some(nested) = &rule.schema {
        match (rule.kind, nested) {
            (Some(Kind::Array), _) => {
                descriptor.items = Some(Box::new(compile_node(nested)?));
            }
            (Some(Kind::Object), Schema::Keys(pairs)) => {
                descriptor.keys = compile_keys(pairs)?;
            }
            (None, Schema::Keys(pairs)) => {
                descriptor.kind = Kind::Object;
                descriptor.keys = compile_keys(pairs)?;
            }
            (None, Schema::Items(inner)) => {
                descriptor.kind = Kind::Array;
                descriptor.items = Some(Box::new(compile_node(inner)?));
            }
            _ => {}
        }
    }

    if let Some(text) = &rule.len {
        descriptor.len = Some(Range::parse(text)?);
    }
    if let Some(text) = &rule.range {
        descriptor.range = Some(Range::parse(text)?);
    }
    if let Some(source) = &rule.pattern {
        let compiled = Regex::new(source).map_err(|err| SchemaError::InvalidPattern {
            pattern: source.clone(),
            reason: err.to_string(),
        })?;
        descriptor.pattern = Some(compiled);
    }

    Ok(descriptor)
}
