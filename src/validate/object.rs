//! Object structural validation: per-key recursion plus the unknown-key
//! policy.
//!
//! Output is a freshly built map; inputs are never mutated in place.
//! Declared keys run first, in schema-declaration order; keys whose result
//! is absent are omitted from the output. Input keys with no schema entry
//! are then handled by the effective policy: allow copies them through,
//! remove drops them, deny rejects the whole object naming every offender.

use std::collections::BTreeMap;

use crate::errors::{Stage, ValidationError};
use crate::schema::normalize::Descriptor;
use crate::schema::types::UnknownKeys;
use crate::validate::context::Context;
use crate::validate::pipeline;
use crate::value::Value;

pub(crate) async fn validate(
    input: BTreeMap<String, Value>,
    descriptor: &Descriptor,
    ctx: &mut Context<'_>,
) -> Result<BTreeMap<String, Value>, ValidationError> {
    let mut remaining = input;
    let mut output = BTreeMap::new();

    for (key, child) in &descriptor.keys {
        let child_input = remaining.remove(key);
        ctx.push_key(key);
        let result = pipeline::run(child_input, child, ctx).await;
        ctx.pop();
        if let Some(validated) = result? {
            output.insert(key.clone(), validated);
        }
    }

    if !remaining.is_empty() {
        match ctx.unknown_keys(descriptor) {
            UnknownKeys::Allow => output.extend(remaining),
            UnknownKeys::Remove => {}
            UnknownKeys::Deny => {
                let offenders: Vec<&str> = remaining.keys().map(String::as_str).collect();
                return Err(ValidationError::reject(
                    Stage::UnknownKeys,
                    ctx.path(),
                    &descriptor.messages,
                    format!("unknown keys: {}", offenders.join(", ")),
                ));
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::Kind;
    use crate::validate::Options;

    fn person_descriptor() -> Descriptor {
        Descriptor {
            kind: Kind::Object,
            keys: vec![
                (
                    "name".to_string(),
                    Descriptor {
                        kind: Kind::String,
                        ..Descriptor::default()
                    },
                ),
                (
                    "age".to_string(),
                    Descriptor {
                        kind: Kind::Number,
                        ..Descriptor::default()
                    },
                ),
            ],
            ..Descriptor::default()
        }
    }

    fn person_input() -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from("ada"));
        map.insert("age".to_string(), Value::from("36"));
        map
    }

    #[tokio::test]
    async fn test_declared_keys_recurse_and_coerce() {
        let descriptor = person_descriptor();
        let options = Options::default();
        let mut ctx = Context::new(&options);

        let out = validate(person_input(), &descriptor, &mut ctx).await.unwrap();
        assert_eq!(out.get("name"), Some(&Value::from("ada")));
        assert_eq!(out.get("age"), Some(&Value::Number(36.0)));
    }

    #[tokio::test]
    async fn test_absent_optional_keys_are_omitted() {
        let descriptor = person_descriptor();
        let options = Options::default();
        let mut ctx = Context::new(&options);

        let mut input = BTreeMap::new();
        input.insert("name".to_string(), Value::from("ada"));

        let out = validate(input, &descriptor, &mut ctx).await.unwrap();
        assert!(out.contains_key("name"));
        assert!(!out.contains_key("age"));
    }

    #[tokio::test]
    async fn test_unknown_keys_denied_by_default() {
        let descriptor = person_descriptor();
        let options = Options::default();
        let mut ctx = Context::new(&options);

        let mut input = person_input();
        input.insert("why".to_string(), Value::from("x"));
        input.insert("also".to_string(), Value::from("y"));

        let err = validate(input, &descriptor, &mut ctx).await.unwrap_err();
        assert_eq!(err.validator(), Stage::UnknownKeys);
        assert_eq!(err.message(), "unknown keys: also, why");
    }

    #[tokio::test]
    async fn test_unknown_keys_allow_copies_through() {
        let descriptor = Descriptor {
            unknown_keys: Some(UnknownKeys::Allow),
            ..person_descriptor()
        };
        let options = Options::default();
        let mut ctx = Context::new(&options);

        let mut input = person_input();
        input.insert("extra".to_string(), Value::Bool(true));

        let out = validate(input, &descriptor, &mut ctx).await.unwrap();
        assert_eq!(out.get("extra"), Some(&Value::Bool(true)));
    }

    #[tokio::test]
    async fn test_unknown_keys_remove_drops_silently() {
        let descriptor = Descriptor {
            unknown_keys: Some(UnknownKeys::Remove),
            ..person_descriptor()
        };
        let options = Options::default();
        let mut ctx = Context::new(&options);

        let mut input = person_input();
        input.insert("extra".to_string(), Value::Bool(true));

        let out = validate(input, &descriptor, &mut ctx).await.unwrap();
        assert!(!out.contains_key("extra"));
        assert_eq!(out.len(), 2);
    }

    #[tokio::test]
    async fn test_nested_failure_paths_point_at_the_key() {
        let descriptor = person_descriptor();
        let options = Options::default();
        let mut ctx = Context::new(&options);

        let mut input = person_input();
        input.insert("age".to_string(), Value::from("old"));

        let err = validate(input, &descriptor, &mut ctx).await.unwrap_err();
        assert_eq!(err.validator(), Stage::Type);
        assert_eq!(err.path().to_string(), "age");
    }
}
