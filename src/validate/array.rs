//! Array structural validation: per-element recursion, then length bounds,
//! then element distinctness.
//!
//! Elements validate in index order against the single element descriptor;
//! `len` and `unique` both judge the validated output, so they run after
//! the recursion. A duplicate pair rejects at the array's own path.

use crate::errors::{Stage, ValidationError};
use crate::schema::normalize::Descriptor;
use crate::validate::context::Context;
use crate::validate::pipeline;
use crate::value::Value;

pub(crate) async fn validate(
    items: Vec<Value>,
    descriptor: &Descriptor,
    ctx: &mut Context<'_>,
) -> Result<Vec<Value>, ValidationError> {
    let output = match &descriptor.items {
        Some(element) => {
            let mut validated = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                ctx.push_index(index);
                let result = pipeline::run(Some(item), element, ctx).await;
                ctx.pop();
                validated.push(result?.unwrap_or(Value::Null));
            }
            validated
        }
        None => items,
    };

    if let Some(len) = &descriptor.len {
        if !len.contains(output.len() as f64) {
            return Err(ValidationError::reject(
                Stage::Len,
                ctx.path(),
                &descriptor.messages,
                format!("length must be {}", len.describe()),
            ));
        }
    }

    if ctx.unique(descriptor) {
        for i in 0..output.len() {
            for j in (i + 1)..output.len() {
                if output[i] == output[j] {
                    return Err(ValidationError::reject(
                        Stage::Unique,
                        ctx.path(),
                        &descriptor.messages,
                        "array values must be unique",
                    ));
                }
            }
        }
    }

    Ok(output)
}
