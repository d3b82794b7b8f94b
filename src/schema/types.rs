//! Schema type definitions: the declared-type set, the caller-facing
//! shorthand forms, and the full rule with its builder.
//!
//! Callers describe expectations in one of three shorthand forms (a bare
//! type, a bare key mapping, a one-element sequence) or as a full [`Rule`].
//! All of them compile into the canonical descriptor before validation runs
//! (see `normalize`).

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{Messages, SchemaError, SchemaResult, Stage};
use crate::validate::custom::CustomValidator;
use crate::value::Value;

/// Declared value types.
///
/// `Any` is the explicit spelling of "no type declared": coercion and
/// type-specific constraints are skipped and any value passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// No declared type
    Any,
    /// UTF-8 string
    String,
    /// 64-bit floating point number
    Number,
    /// Boolean
    Boolean,
    /// UTC instant
    Date,
    /// Nested object with per-key rules
    Object,
    /// Homogeneous array with one element rule
    Array,
}

impl Kind {
    /// Returns the type name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Any => "any",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Date => "date",
            Kind::Object => "object",
            Kind::Array => "array",
        }
    }

    /// Resolves a type name back to its kind.
    pub fn from_name(name: &str) -> Option<Kind> {
        match name {
            "any" => Some(Kind::Any),
            "string" => Some(Kind::String),
            "number" => Some(Kind::Number),
            "boolean" => Some(Kind::Boolean),
            "date" => Some(Kind::Date),
            "object" => Some(Kind::Object),
            "array" => Some(Kind::Array),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Policy for input object keys with no matching schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    /// Copy unknown keys through unchanged
    Allow,
    /// Reject the whole object (hard default)
    Deny,
    /// Silently omit unknown keys from the output
    Remove,
}

/// Inclusive numeric bounds parsed from "min-max" text.
///
/// Either bound may be omitted ("2-" means at least 2, "-5" means at most
/// 5); a dash-free number is exact. Negative bounds stay representable
/// because a dash that merely signs the second number is not a separator:
/// "-5--1" parses as \[-5, -1\].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Lower bound, inclusive
    pub min: Option<f64>,
    /// Upper bound, inclusive
    pub max: Option<f64>,
}

impl Range {
    /// Parses range text. Text that yields no bound at all is refused.
    pub fn parse(text: &str) -> SchemaResult<Range> {
        let trimmed = text.trim();
        let invalid = || SchemaError::InvalidRange(text.to_string());

        if trimmed.is_empty() {
            return Err(invalid());
        }

        // Leading dash with a clean number after it: an omitted minimum.
        if let Some(rest) = trimmed.strip_prefix('-') {
            if let Some(max) = parse_decimal(rest) {
                return Ok(Range {
                    min: None,
                    max: Some(max),
                });
            }
        }

        // Separator: the first dash whose left side is a complete number.
        let bytes = trimmed.as_bytes();
        for i in 1..bytes.len() {
            if bytes[i] != b'-' {
                continue;
            }
            let prev = bytes[i - 1];
            if !prev.is_ascii_digit() && prev != b'.' {
                continue;
            }
            let left = &trimmed[..i];
            let right = &trimmed[i + 1..];
            let min = match parse_decimal(left) {
                Some(n) => n,
                None => continue,
            };
            if right.is_empty() {
                return Ok(Range {
                    min: Some(min),
                    max: None,
                });
            }
            if let Some(max) = parse_decimal(right) {
                return Ok(Range {
                    min: Some(min),
                    max: Some(max),
                });
            }
        }

        // No separator: an exact bound.
        let exact = parse_decimal(trimmed).ok_or_else(invalid)?;
        Ok(Range {
            min: Some(exact),
            max: Some(exact),
        })
    }

    /// Returns true when the number lies within the bounds.
    pub fn contains(&self, n: f64) -> bool {
        self.min.map_or(true, |min| n >= min) && self.max.map_or(true, |max| n <= max)
    }

    /// Renders the bounds for default error messages.
    pub(crate) fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => format!("exactly {}", min),
            (Some(min), Some(max)) => format!("between {} and {}", min, max),
            (Some(min), None) => format!("at least {}", min),
            (None, Some(max)) => format!("at most {}", max),
            (None, None) => "unbounded".to_string(),
        }
    }
}

/// Strict decimal parse: optional sign, digits, optional fraction, nothing
/// else accepted. Narrower than `f64::from_str`, which would also take
/// exponents, infinities and "nan".
pub(crate) fn parse_decimal(text: &str) -> Option<f64> {
    let unsigned = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);

    let (integral, fraction) = match unsigned.split_once('.') {
        Some((integral, fraction)) => (integral, Some(fraction)),
        None => (unsigned, None),
    };

    if integral.is_empty() || !integral.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    text.parse::<f64>().ok()
}

/// Source of a field's default, applied when the input is absent.
#[derive(Clone)]
pub enum DefaultSource {
    /// A literal value used verbatim
    Value(Value),
    /// A synchronous producer
    Compute(Arc<dyn Fn() -> Result<Value, String> + Send + Sync>),
    /// An asynchronous producer, awaited before use
    Future(
        Arc<
            dyn Fn() -> Pin<Box<dyn Future<Output = Result<Value, String>> + Send>>
                + Send
                + Sync,
        >,
    ),
}

impl DefaultSource {
    /// Wraps a literal default value.
    pub fn value(value: impl Into<Value>) -> Self {
        DefaultSource::Value(value.into())
    }

    /// Wraps a synchronous producer.
    pub fn compute<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value, String> + Send + Sync + 'static,
    {
        DefaultSource::Compute(Arc::new(f))
    }

    /// Wraps an asynchronous producer.
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, String>> + Send + 'static,
    {
        DefaultSource::Future(Arc::new(move || {
            let fut: Pin<Box<dyn Future<Output = Result<Value, String>> + Send>> =
                Box::pin(f());
            fut
        }))
    }

    /// Resolves the default to a concrete value.
    pub(crate) async fn resolve(&self) -> Result<Value, String> {
        match self {
            DefaultSource::Value(value) => Ok(value.clone()),
            DefaultSource::Compute(f) => f(),
            DefaultSource::Future(f) => f().await,
        }
    }
}

impl fmt::Debug for DefaultSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultSource::Value(value) => f.debug_tuple("Value").field(value).finish(),
            DefaultSource::Compute(_) => f.write_str("Compute(..)"),
            DefaultSource::Future(_) => f.write_str("Future(..)"),
        }
    }
}

/// A schema in one of its caller-facing forms.
///
/// The typed union keeps the shorthand forms distinct: a bare mapping and a
/// full rule are separate variants, and the one-element-sequence shorthand
/// always carries its element. An empty `Keys` mapping is an object with
/// zero declared keys, so the unknown-keys policy applies to every input
/// key.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Bare type reference
    Kind(Kind),
    /// Bare key mapping, in declaration order
    Keys(Vec<(String, Schema)>),
    /// One-element sequence: an array of the inner schema
    Items(Box<Schema>),
    /// Full rule
    Rule(Box<Rule>),
}

impl Schema {
    /// Builds the object-shape shorthand from key/schema pairs.
    pub fn object<K, S>(pairs: impl IntoIterator<Item = (K, S)>) -> Self
    where
        K: Into<String>,
        S: Into<Schema>,
    {
        Schema::Keys(
            pairs
                .into_iter()
                .map(|(key, schema)| (key.into(), schema.into()))
                .collect(),
        )
    }

    /// Builds the array shorthand around an element schema.
    pub fn array(item: impl Into<Schema>) -> Self {
        Schema::Items(Box::new(item.into()))
    }
}

impl From<Kind> for Schema {
    fn from(kind: Kind) -> Self {
        Schema::Kind(kind)
    }
}

impl From<Rule> for Schema {
    fn from(rule: Rule) -> Self {
        Schema::Rule(Box::new(rule))
    }
}

/// A full validation rule with every field optional.
///
/// Unset fields stay distinguishable from explicitly set ones so that
/// per-call defaults can seed them. `match` and `enum` are Rust keywords;
/// the fields are named `pattern` and `one_of` while the validator names
/// on errors remain "match" and "enum".
#[derive(Debug, Clone, Default)]
pub struct Rule {
    /// Declared type
    pub kind: Option<Kind>,
    /// Whether an absent value is rejected
    pub required: Option<bool>,
    /// Whether an explicit null passes as-is
    pub allow_null: Option<bool>,
    /// Default applied when the input is absent
    pub default: Option<DefaultSource>,
    /// Exact value the input must equal
    pub equal: Option<Value>,
    /// User-supplied validator chain, run last and in order
    pub custom: Vec<CustomValidator>,
    /// Nested schema; per-key for objects, per-element for arrays
    pub schema: Option<Schema>,
    /// Unknown-key policy (objects)
    pub unknown_keys: Option<UnknownKeys>,
    /// Length bounds text (arrays)
    pub len: Option<String>,
    /// Element distinctness (arrays)
    pub unique: Option<bool>,
    /// Wrap a lone value into a one-element array (arrays)
    pub autowrap: Option<bool>,
    /// Strip surrounding whitespace (strings)
    pub trim: Option<bool>,
    /// Pattern text the string must match
    pub pattern: Option<String>,
    /// Allowed string values
    pub one_of: Option<Vec<String>>,
    /// Value bounds text (numbers)
    pub range: Option<String>,
    /// Per-validator message overrides
    pub messages: Messages,
}

impl Rule {
    /// Creates an empty rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rule with a declared type.
    pub fn of(kind: Kind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Sets the declared type.
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets whether an absent value is rejected.
    pub fn required(mut self, yes: bool) -> Self {
        self.required = Some(yes);
        self
    }

    /// Sets whether an explicit null passes as-is.
    pub fn allow_null(mut self, yes: bool) -> Self {
        self.allow_null = Some(yes);
        self
    }

    /// Sets a literal default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultSource::value(value));
        self
    }

    /// Sets a synchronous default producer.
    pub fn default_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<Value, String> + Send + Sync + 'static,
    {
        self.default = Some(DefaultSource::compute(f));
        self
    }

    /// Sets an asynchronous default producer.
    pub fn default_future<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, String>> + Send + 'static,
    {
        self.default = Some(DefaultSource::future(f));
        self
    }

    /// Sets the exact value the input must equal.
    pub fn equal(mut self, value: impl Into<Value>) -> Self {
        self.equal = Some(value.into());
        self
    }

    /// Appends a validator to the custom chain.
    pub fn custom(mut self, validator: CustomValidator) -> Self {
        self.custom.push(validator);
        self
    }

    /// Sets the nested schema.
    pub fn schema(mut self, schema: impl Into<Schema>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Sets the unknown-key policy.
    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = Some(policy);
        self
    }

    /// Sets the length bounds text.
    pub fn len(mut self, text: impl Into<String>) -> Self {
        self.len = Some(text.into());
        self
    }

    /// Sets element distinctness.
    pub fn unique(mut self, yes: bool) -> Self {
        self.unique = Some(yes);
        self
    }

    /// Sets lone-value wrapping.
    pub fn autowrap(mut self, yes: bool) -> Self {
        self.autowrap = Some(yes);
        self
    }

    /// Sets whitespace stripping.
    pub fn trim(mut self, yes: bool) -> Self {
        self.trim = Some(yes);
        self
    }

    /// Sets the pattern text.
    pub fn pattern(mut self, text: impl Into<String>) -> Self {
        self.pattern = Some(text.into());
        self
    }

    /// Sets the allowed string values.
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the value bounds text.
    pub fn range(mut self, text: impl Into<String>) -> Self {
        self.range = Some(text.into());
        self
    }

    /// Overrides the message for one validator name.
    pub fn message(mut self, stage: Stage, text: impl Into<String>) -> Self {
        self.messages.set(stage, text);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [
            Kind::Any,
            Kind::String,
            Kind::Number,
            Kind::Boolean,
            Kind::Date,
            Kind::Object,
            Kind::Array,
        ] {
            assert_eq!(Kind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(Kind::from_name("float"), None);
    }

    #[test]
    fn test_range_parses_both_bounds() {
        let range = Range::parse("2-5").unwrap();
        assert_eq!(range.min, Some(2.0));
        assert_eq!(range.max, Some(5.0));
    }

    #[test]
    fn test_range_parses_open_bounds() {
        let range = Range::parse("2-").unwrap();
        assert_eq!(range.min, Some(2.0));
        assert_eq!(range.max, None);

        let range = Range::parse("-5").unwrap();
        assert_eq!(range.min, None);
        assert_eq!(range.max, Some(5.0));
    }

    #[test]
    fn test_range_parses_exact_value() {
        let range = Range::parse("3").unwrap();
        assert_eq!(range.min, Some(3.0));
        assert_eq!(range.max, Some(3.0));
    }

    #[test]
    fn test_range_parses_negative_bounds() {
        let range = Range::parse("-5--1").unwrap();
        assert_eq!(range.min, Some(-5.0));
        assert_eq!(range.max, Some(-1.0));
    }

    #[test]
    fn test_range_parses_fractions() {
        let range = Range::parse("0.5-1.5").unwrap();
        assert_eq!(range.min, Some(0.5));
        assert_eq!(range.max, Some(1.5));
    }

    #[test]
    fn test_range_rejects_garbage() {
        assert!(Range::parse("").is_err());
        assert!(Range::parse("-").is_err());
        assert!(Range::parse("abc").is_err());
        assert!(Range::parse("1-2-3").is_err());
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = Range::parse("2-5").unwrap();
        assert!(range.contains(2.0));
        assert!(range.contains(5.0));
        assert!(!range.contains(1.999));
        assert!(!range.contains(5.001));
    }

    #[test]
    fn test_range_describe() {
        assert_eq!(Range::parse("2-5").unwrap().describe(), "between 2 and 5");
        assert_eq!(Range::parse("2-").unwrap().describe(), "at least 2");
        assert_eq!(Range::parse("-5").unwrap().describe(), "at most 5");
        assert_eq!(Range::parse("3").unwrap().describe(), "exactly 3");
    }

    #[test]
    fn test_parse_decimal_is_strict() {
        assert_eq!(parse_decimal("123"), Some(123.0));
        assert_eq!(parse_decimal("123.987"), Some(123.987));
        assert_eq!(parse_decimal("-4.5"), Some(-4.5));
        assert_eq!(parse_decimal("+7"), Some(7.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("1e5"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal(" 1"), None);
        assert_eq!(parse_decimal("1."), None);
        assert_eq!(parse_decimal(".5"), None);
        assert_eq!(parse_decimal("12a"), None);
    }

    #[test]
    fn test_rule_builder_sets_fields() {
        let rule = Rule::of(Kind::String)
            .required(true)
            .trim(true)
            .pattern("^[a-z]+$")
            .one_of(["alpha", "beta"])
            .message(Stage::Enum, "pick alpha or beta");

        assert_eq!(rule.kind, Some(Kind::String));
        assert_eq!(rule.required, Some(true));
        assert_eq!(rule.trim, Some(true));
        assert_eq!(rule.pattern.as_deref(), Some("^[a-z]+$"));
        assert_eq!(
            rule.one_of,
            Some(vec!["alpha".to_string(), "beta".to_string()])
        );
        assert_eq!(rule.messages.get(Stage::Enum), Some("pick alpha or beta"));
    }

    #[tokio::test]
    async fn test_default_source_resolution() {
        let literal = DefaultSource::value(41);
        assert_eq!(literal.resolve().await, Ok(Value::Number(41.0)));

        let computed = DefaultSource::compute(|| Ok(Value::from("made")));
        assert_eq!(computed.resolve().await, Ok(Value::String("made".into())));

        let awaited = DefaultSource::future(|| async { Ok(Value::Bool(true)) });
        assert_eq!(awaited.resolve().await, Ok(Value::Bool(true)));

        let failing = DefaultSource::compute(|| Err("no default available".to_string()));
        assert_eq!(
            failing.resolve().await,
            Err("no default available".to_string())
        );
    }
}
