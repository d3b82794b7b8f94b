//! The validation engine: public entry points, per-call options, and the
//! stage machinery behind them.
//!
//! One call validates one input against one schema and produces either the
//! normalized output value or the first rejection. Absent input and absent
//! output are both spelled `None`; an output key that would be absent is
//! simply omitted from its object.

pub(crate) mod array;
pub(crate) mod coerce;
pub(crate) mod context;
pub mod custom;
pub(crate) mod object;
pub(crate) mod pipeline;

use crate::errors::{Error, ValidationError};
use crate::schema::normalize::Descriptor;
use crate::schema::types::{Schema, UnknownKeys};
use crate::value::Value;

use context::Context;

/// Partial descriptor seed applied per call.
///
/// A field set here fills in for any descriptor that left the same field
/// unset; an explicit descriptor setting always wins. Forwarded unchanged,
/// inside [`Options`], to every custom validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Defaults {
    pub required: Option<bool>,
    pub allow_null: Option<bool>,
    pub trim: Option<bool>,
    pub autowrap: Option<bool>,
    pub unique: Option<bool>,
    pub unknown_keys: Option<UnknownKeys>,
}

/// Per-call validation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub defaults: Defaults,
}

/// Validates an input against a schema with default options.
pub async fn validate(input: Option<Value>, schema: &Schema) -> Result<Option<Value>, Error> {
    validate_with(input, schema, &Options::default()).await
}

/// Validates an input against a schema, compiling it first.
pub async fn validate_with(
    input: Option<Value>,
    schema: &Schema,
    options: &Options,
) -> Result<Option<Value>, Error> {
    let descriptor = schema.compile()?;
    validate_compiled(input, &descriptor, options)
        .await
        .map_err(Error::from)
}

/// Validates an input against an already-compiled descriptor.
///
/// The descriptor is read-only and may be shared across concurrent calls;
/// all per-call state lives inside this function.
pub async fn validate_compiled(
    input: Option<Value>,
    descriptor: &Descriptor,
    options: &Options,
) -> Result<Option<Value>, ValidationError> {
    let mut ctx = Context::new(options);
    pipeline::run(input, descriptor, &mut ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Stage;
    use crate::schema::types::{Kind, Rule};

    #[tokio::test]
    async fn test_validate_coerces_through_a_bare_kind() {
        let out = validate(Some(Value::from("123.987")), &Schema::from(Kind::Number))
            .await
            .unwrap();
        assert_eq!(out, Some(Value::Number(123.987)));
    }

    #[tokio::test]
    async fn test_validate_surfaces_rejections() {
        let err = validate(Some(Value::from("abc")), &Schema::from(Kind::Number))
            .await
            .unwrap_err();
        let rejection = err.as_validation().unwrap();
        assert_eq!(rejection.validator(), Stage::Type);
    }

    #[tokio::test]
    async fn test_validate_surfaces_schema_faults() {
        let schema = Schema::from(Rule::of(Kind::Number).range("broken"));
        let err = validate(Some(Value::Number(1.0)), &schema).await.unwrap_err();
        assert!(err.as_schema().is_some());
    }

    #[tokio::test]
    async fn test_defaults_seed_only_unset_fields() {
        let schema = Schema::object([
            ("kept", Schema::from(Rule::of(Kind::String).trim(false))),
            ("trimmed", Schema::from(Kind::String)),
        ]);
        let options = Options {
            defaults: Defaults {
                trim: Some(true),
                unknown_keys: Some(UnknownKeys::Allow),
                ..Defaults::default()
            },
        };

        let mut input = std::collections::BTreeMap::new();
        input.insert("kept".to_string(), Value::from("  a  "));
        input.insert("trimmed".to_string(), Value::from("  b  "));

        let out = validate_with(Some(Value::Object(input)), &schema, &options)
            .await
            .unwrap();
        let Some(Value::Object(map)) = out else {
            panic!("expected an object back");
        };
        assert_eq!(map.get("kept"), Some(&Value::from("  a  ")));
        assert_eq!(map.get("trimmed"), Some(&Value::from("b")));
    }

    #[tokio::test]
    async fn test_compiled_descriptor_reuse_across_calls() {
        let descriptor = Schema::from(Rule::of(Kind::Number).range("1-5"))
            .compile()
            .unwrap();
        let options = Options::default();

        for n in 1..=5 {
            let out = validate_compiled(Some(Value::Number(n as f64)), &descriptor, &options)
                .await
                .unwrap();
            assert_eq!(out, Some(Value::Number(n as f64)));
        }
        let err = validate_compiled(Some(Value::Number(9.0)), &descriptor, &options)
            .await
            .unwrap_err();
        assert_eq!(err.validator(), Stage::Range);
    }
}
