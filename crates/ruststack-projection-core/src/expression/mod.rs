//! Projection expression compilation and evaluation.
//!
//! The pipeline is:
//!
//! 1. **Parsing**: tokenize the expression and build one [`AttributePath`] per
//!    comma-separated segment, substituting `#name` aliases.
//! 2. **Validation**: reject the whole expression if any two paths overlap.
//! 3. **Resolution**: walk each path through the item, yielding a value or
//!    nothing.
//! 4. **Merging**: fold the resolved values into a new item that keeps the
//!    original nesting.

pub mod ast;
pub mod evaluator;
pub mod overlap;
pub mod parser;
pub mod projection;

pub use ast::{AttributePath, PathElement};
pub use evaluator::{ProjectionMerger, merge, project_item, resolve_path};
pub use overlap::validate_no_overlap;
pub use parser::{ExpressionError, ParsedProjection, parse_projection, parse_projection_expression};
pub use projection::{ExpressionLimits, ProjectionRequest, evaluate_projection};
