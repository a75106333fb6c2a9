//! Model types for RustStack projection expressions.
//!
//! This crate holds the document values a projection reads from, the request
//! and response shapes of a projection call, and the error envelope that
//! callers translate into their own transport format. All JSON uses the
//! DynamoDB wire conventions (`{"S": "x"}` values, `PascalCase` fields).
// "DynamoDB" appears in many doc comments in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_value;
pub mod error;
pub mod input;
pub mod output;

pub use attribute_value::{AttributeValue, Item};
pub use error::{ProjectionError, ProjectionErrorCode};
pub use input::ProjectionInput;
pub use output::ProjectionOutput;
