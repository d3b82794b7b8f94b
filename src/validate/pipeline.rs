//! The validator pipeline: a fixed-order stage machine run once per
//! (value, descriptor) pair at a given path.
//!
//! Stage order: required, allowNull, default, type, type-specific
//! constraints (strings: trim / match / enum; numbers: range; objects and
//! arrays: structural recursion), equal, custom. The first failing stage
//! aborts the run and produces exactly one rejection. Absent input that is
//! neither required nor defaulted short-circuits as absent.
//!
//! The recursion into structural validators cycles back here, so this is
//! where the future gets boxed.

use std::future::Future;
use std::pin::Pin;

use crate::errors::{Stage, ValidationError};
use crate::schema::normalize::Descriptor;
use crate::schema::types::Kind;
use crate::validate::context::Context;
use crate::validate::{array, coerce, custom, object};
use crate::value::Value;

pub(crate) fn run<'a, 'c: 'a>(
    input: Option<Value>,
    descriptor: &'a Descriptor,
    ctx: &'a mut Context<'c>,
) -> Pin<Box<dyn Future<Output = Result<Option<Value>, ValidationError>> + Send + 'a>> {
    Box::pin(async move {
        // 1. required / 2. allowNull / 3. default
        let mut value = match input {
            None => {
                if ctx.required(descriptor) {
                    return Err(ValidationError::reject(
                        Stage::Required,
                        ctx.path(),
                        &descriptor.messages,
                        "value is required",
                    ));
                }
                let source = match &descriptor.default {
                    Some(source) => source,
                    None => return Ok(None),
                };
                match source.resolve().await {
                    Ok(value) => value,
                    // The taxonomy has no name for a failed default; it
                    // reports as a user-function failure.
                    Err(message) => {
                        return Err(ValidationError::reject(
                            Stage::Custom,
                            ctx.path(),
                            &descriptor.messages,
                            message,
                        ));
                    }
                }
            }
            Some(Value::Null) => {
                if ctx.allow_null(descriptor) {
                    return Ok(Some(Value::Null));
                }
                if ctx.required(descriptor) {
                    return Err(ValidationError::reject(
                        Stage::AllowNull,
                        ctx.path(),
                        &descriptor.messages,
                        "value must not be null",
                    ));
                }
                return Ok(Some(Value::Null));
            }
            Some(value) => value,
        };

        // 4. type
        value = coerce::resolve(value, descriptor, ctx)?;

        // 5. constraints for the resolved kind
        match descriptor.kind {
            Kind::String => value = string_constraints(value, descriptor, ctx)?,
            Kind::Number => number_range(&value, descriptor, ctx)?,
            Kind::Object => {
                value = match value {
                    Value::Object(map) => {
                        Value::Object(object::validate(map, descriptor, ctx).await?)
                    }
                    other => other,
                };
            }
            Kind::Array => {
                value = match value {
                    Value::Array(items) => {
                        Value::Array(array::validate(items, descriptor, ctx).await?)
                    }
                    other => other,
                };
            }
            Kind::Any | Kind::Boolean | Kind::Date => {}
        }

        // 6. equal
        if let Some(expected) = &descriptor.equal {
            if value != *expected {
                return Err(ValidationError::reject(
                    Stage::Equal,
                    ctx.path(),
                    &descriptor.messages,
                    format!("must equal {}", render(expected)),
                ));
            }
        }

        // 7. custom
        value = custom::run_chain(value, descriptor, ctx).await?;

        Ok(Some(value))
    })
}

fn string_constraints(
    value: Value,
    descriptor: &Descriptor,
    ctx: &Context<'_>,
) -> Result<Value, ValidationError> {
    let mut text = match value {
        Value::String(text) => text,
        other => return Ok(other),
    };

    if ctx.trim(descriptor) {
        let stripped = text.trim();
        if stripped.len() != text.len() {
            text = stripped.to_string();
        }
    }

    if let Some(pattern) = &descriptor.pattern {
        if !pattern.is_match(&text) {
            return Err(ValidationError::reject(
                Stage::Match,
                ctx.path(),
                &descriptor.messages,
                format!("must match pattern \"{}\"", pattern.as_str()),
            ));
        }
    }

    if let Some(allowed) = &descriptor.one_of {
        if !allowed.iter().any(|candidate| candidate == &text) {
            return Err(ValidationError::reject(
                Stage::Enum,
                ctx.path(),
                &descriptor.messages,
                format!("must be one of: {}", allowed.join(", ")),
            ));
        }
    }

    Ok(Value::String(text))
}

fn number_range(
    value: &Value,
    descriptor: &Descriptor,
    ctx: &Context<'_>,
) -> Result<(), ValidationError> {
    if let (Some(range), Value::Number(n)) = (&descriptor.range, value) {
        if !range.contains(*n) {
            return Err(ValidationError::reject(
                Stage::Range,
                ctx.path(),
                &descriptor.messages,
                format!("must be {}", range.describe()),
            ));
        }
    }
    Ok(())
}

fn render(value: &Value) -> String {
    serde_json::Value::from(value.clone()).to_string()
}
