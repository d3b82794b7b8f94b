//! Schema subsystem: the caller-facing shorthand forms, normalization into
//! the canonical descriptor, the JSON front-end, and the named registry.
//!
//! A schema is declared once, in any shorthand, and compiled into an
//! immutable descriptor that validation calls share read-only. All
//! interpretation of shorthand happens at compile time; the validation
//! path only ever sees descriptors.

pub mod normalize;
pub mod parse;
pub mod registry;
pub mod types;

pub use normalize::Descriptor;
pub use registry::Registry;
pub use types::{DefaultSource, Kind, Range, Rule, Schema, UnknownKeys};
