//! datasieve - A strict, schema-driven data validation and coercion engine
//!
//! Declare a schema in shorthand or as a full rule, compile it once, and
//! validate untrusted input against it: output comes back normalized and
//! type-correct, and a rejection carries a validator name, a message, and
//! a path into the input.

pub mod errors;
pub mod schema;
pub mod validate;
pub mod value;

pub use errors::{
    Error, Messages, Path, SchemaError, SchemaResult, Segment, Stage, ValidationError,
};
pub use schema::{DefaultSource, Descriptor, Kind, Range, Registry, Rule, Schema, UnknownKeys};
pub use validate::custom::{Completion, Custom, CustomValidator, Outcome};
pub use validate::{validate, validate_compiled, validate_with, Defaults, Options};
pub use value::Value;
