//! User-supplied validator chain.
//!
//! Every custom validator, whatever its calling style, produces one
//! [`Outcome`]. Three adapters normalize the styles: a direct synchronous
//! return, an awaited asynchronous return through the [`Custom`] trait, and
//! an explicit completion invocation. The chain runs strictly in declared
//! order, each step seeing the previous step's value; the first failure
//! aborts the remainder and becomes a `custom` rejection preserving the
//! underlying message.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::{Stage, ValidationError};
use crate::schema::normalize::Descriptor;
use crate::validate::context::Context;
use crate::validate::Options;
use crate::value::Value;

/// Result of one custom validator step.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Replace the chain's current value
    Replace(Value),
    /// Keep the current value and continue
    Unchanged,
    /// Abort the chain with this message
    Fail(String),
}

/// An asynchronous custom validator.
///
/// Implementors receive the current value (after all built-in stages and
/// any earlier chain steps), the governing descriptor, and the caller's
/// options, forwarded unchanged.
pub trait Custom: Send + Sync {
    fn apply<'a>(
        &'a self,
        value: &'a Value,
        descriptor: &'a Descriptor,
        options: &'a Options,
    ) -> Pin<Box<dyn Future<Output = Outcome> + Send + 'a>>;
}

/// Completion handle for callback-style validators.
///
/// Not invoking it means the value is unchanged; the first invocation wins
/// and later ones are ignored.
pub struct Completion {
    outcome: Option<Outcome>,
}

impl Completion {
    fn new() -> Self {
        Self { outcome: None }
    }

    /// Completes the step by replacing the chain's current value.
    pub fn replace(&mut self, value: impl Into<Value>) {
        if self.outcome.is_none() {
            self.outcome = Some(Outcome::Replace(value.into()));
        }
    }

    /// Completes the step as a failure.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.outcome.is_none() {
            self.outcome = Some(Outcome::Fail(message.into()));
        }
    }

    fn finish(self) -> Outcome {
        self.outcome.unwrap_or(Outcome::Unchanged)
    }
}

type SyncFn = dyn Fn(&Value, &Descriptor, &Options) -> Outcome + Send + Sync;
type CompletionFn = dyn Fn(&Value, &Descriptor, &Options, &mut Completion) + Send + Sync;

#[derive(Clone)]
enum Adapter {
    Sync(Arc<SyncFn>),
    Completion(Arc<CompletionFn>),
    Custom(Arc<dyn Custom>),
}

/// One entry in a custom validator chain, in any of the three styles.
#[derive(Clone)]
pub struct CustomValidator {
    adapter: Adapter,
}

impl CustomValidator {
    /// Wraps a validator with a direct synchronous return.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&Value, &Descriptor, &Options) -> Outcome + Send + Sync + 'static,
    {
        Self {
            adapter: Adapter::Sync(Arc::new(f)),
        }
    }

    /// Wraps a callback-style validator that reports through a completion
    /// handle.
    pub fn completion<F>(f: F) -> Self
    where
        F: Fn(&Value, &Descriptor, &Options, &mut Completion) + Send + Sync + 'static,
    {
        Self {
            adapter: Adapter::Completion(Arc::new(f)),
        }
    }

    /// Wraps an asynchronous validator.
    pub fn from_custom<C>(custom: C) -> Self
    where
        C: Custom + 'static,
    {
        Self {
            adapter: Adapter::Custom(Arc::new(custom)),
        }
    }

    pub(crate) async fn invoke(
        &self,
        value: &Value,
        descriptor: &Descriptor,
        options: &Options,
    ) -> Outcome {
        match &self.adapter {
            Adapter::Sync(f) => f(value, descriptor, options),
            Adapter::Completion(f) => {
                let mut completion = Completion::new();
                f(value, descriptor, options, &mut completion);
                completion.finish()
            }
            Adapter::Custom(custom) => custom.apply(value, descriptor, options).await,
        }
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = match self.adapter {
            Adapter::Sync(_) => "sync",
            Adapter::Completion(_) => "completion",
            Adapter::Custom(_) => "custom",
        };
        write!(f, "CustomValidator({})", style)
    }
}

/// Runs the descriptor's chain over the pipeline's current value.
pub(crate) async fn run_chain(
    mut value: Value,
    descriptor: &Descriptor,
    ctx: &Context<'_>,
) -> Result<Value, ValidationError> {
    for validator in &descriptor.custom {
        match validator.invoke(&value, descriptor, ctx.options()).await {
            Outcome::Replace(next) => value = next,
            Outcome::Unchanged => {}
            Outcome::Fail(message) => {
                return Err(ValidationError::reject(
                    Stage::Custom,
                    ctx.path(),
                    &descriptor.messages,
                    message,
                ));
            }
        }
    }
    Ok(value)
}
