//! Structural schema inference
//!
//! This module builds the least-general JSON Schema consistent with every
//! value merged in, tracking required vs optional object keys and unioning
//! the kinds of values that conflict across observations.

pub mod node;

pub use node::{JsonType, SchemaDocument, SchemaNode, SCHEMA_URI};
