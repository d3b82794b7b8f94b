//! Type resolution and coercion.
//!
//! A value already of the declared kind passes through unchanged. String
//! inputs get one coercion attempt for Number, Boolean and Date; nothing
//! else coerces. An Array kind with autowrap in effect wraps a lone value
//! into a one-element array instead of failing, so element failures surface
//! at index 0.

use chrono::{DateTime, Utc};

use crate::errors::{Stage, ValidationError};
use crate::schema::normalize::Descriptor;
use crate::schema::types::{parse_decimal, Kind};
use crate::validate::context::Context;
use crate::value::Value;

pub(crate) fn resolve(
    value: Value,
    descriptor: &Descriptor,
    ctx: &Context<'_>,
) -> Result<Value, ValidationError> {
    let fail = |ctx: &Context<'_>| {
        ValidationError::reject(
            Stage::Type,
            ctx.path(),
            &descriptor.messages,
            format!("must be of type {}", descriptor.kind.name()),
        )
    };

    match descriptor.kind {
        Kind::Any => Ok(value),
        Kind::String => match value {
            Value::String(_) => Ok(value),
            _ => Err(fail(ctx)),
        },
        Kind::Number => match value {
            Value::Number(_) => Ok(value),
            Value::String(text) => parse_decimal(&text)
                .map(Value::Number)
                .ok_or_else(|| fail(ctx)),
            _ => Err(fail(ctx)),
        },
        Kind::Boolean => match value {
            Value::Bool(_) => Ok(value),
            Value::String(text) => {
                if text.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(fail(ctx))
                }
            }
            _ => Err(fail(ctx)),
        },
        Kind::Date => match value {
            Value::DateTime(_) => Ok(value),
            Value::String(text) => DateTime::parse_from_rfc3339(&text)
                .map(|instant| Value::DateTime(instant.with_timezone(&Utc)))
                .map_err(|_| fail(ctx)),
            _ => Err(fail(ctx)),
        },
        Kind::Array => match value {
            Value::Array(_) => Ok(value),
            other if ctx.autowrap(descriptor) => Ok(Value::Array(vec![other])),
            _ => Err(fail(ctx)),
        },
        Kind::Object => match value {
            Value::Object(_) => Ok(value),
            _ => Err(fail(ctx)),
        },
    }
}
