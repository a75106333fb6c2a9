//! Projection expression engine for RustStack.
//!
//! Given an item and a projection expression such as `a.b[0], #n`, produces a
//! new item containing only the requested document paths, nested as they are
//! in the source item.
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod expression;
pub mod handler;
pub mod provider;

pub use config::ProjectionConfig;
pub use expression::{ExpressionError, ProjectionRequest, evaluate_projection};
pub use handler::RustStackProjectionHandler;
pub use provider::RustStackProjection;
