//! Conversion of expression errors into the projection error envelope.

use ruststack_projection_model::error::ProjectionError;

use crate::expression::ExpressionError;

/// Wrap an expression error as a `ValidationException` with
/// `ProjectionExpression` context.
///
/// Takes `e` by value because this is used as a closure argument to `.map_err()`.
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn expression_error_to_projection(e: ExpressionError) -> ProjectionError {
    ProjectionError::validation(format!("Invalid ProjectionExpression: {e}"))
}
