//! Projection provider: the request-level entry point.
//!
//! The provider owns the rules that sit around the evaluator: choosing between
//! `ProjectionExpression` and the legacy `AttributesToGet`, checking the
//! alias table, and applying one compiled request to every item in a batch.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use ruststack_projection_model::error::ProjectionError;
use ruststack_projection_model::input::ProjectionInput;
use ruststack_projection_model::output::ProjectionOutput;
use tracing::debug;

use crate::config::ProjectionConfig;
use crate::error::expression_error_to_projection;
use crate::expression::ProjectionRequest;

/// Projection provider.
#[derive(Debug, Clone, Default)]
pub struct RustStackProjection {
    /// Configuration.
    pub config: Arc<ProjectionConfig>,
}

impl RustStackProjection {
    /// Create a new projection provider.
    #[must_use]
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Handle a projection call.
    ///
    /// Without either projection parameter the items are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationException` if both projection parameters are
    /// supplied, if `AttributesToGet` is empty or has duplicates, if aliases
    /// are supplied without an expression or left unused, or if the
    /// expression fails to compile.
    pub fn handle_projection(
        &self,
        input: ProjectionInput,
    ) -> Result<ProjectionOutput, ProjectionError> {
        let request = self.compile_request(&input)?;

        let Some(request) = request else {
            debug!(items = input.items.len(), "no projection requested");
            return Ok(ProjectionOutput { items: input.items });
        };

        debug!(
            items = input.items.len(),
            paths = request.paths().len(),
            "applying projection"
        );
        let items = input.items.iter().map(|item| request.apply(item)).collect();
        Ok(ProjectionOutput { items })
    }

    /// Turn the request parameters into a compiled projection, or `None` when
    /// the caller asked for whole items.
    ///
    /// # Errors
    ///
    /// See [`handle_projection`](Self::handle_projection).
    pub fn compile_request(
        &self,
        input: &ProjectionInput,
    ) -> Result<Option<ProjectionRequest>, ProjectionError> {
        match (&input.projection_expression, &input.attributes_to_get) {
            (Some(_), Some(_)) => Err(ProjectionError::validation(
                "Can not use both expression and non-expression parameters in the same request: \
                 Non-expression parameters: {AttributesToGet} \
                 Expression parameters: {ProjectionExpression}",
            )),
            (Some(expression), None) => {
                let request = ProjectionRequest::compile(
                    expression,
                    &input.expression_attribute_names,
                    &self.config.limits(),
                )
                .map_err(expression_error_to_projection)?;
                if self.config.reject_unused_names {
                    validate_no_unused_names(
                        &input.expression_attribute_names,
                        request.referenced_names(),
                    )?;
                }
                Ok(Some(request))
            }
            (None, Some(attributes)) => {
                validate_names_need_expression(&input.expression_attribute_names)?;
                validate_attributes_to_get(attributes)?;
                let request = ProjectionRequest::from_attribute_names(attributes.iter().cloned())
                    .map_err(expression_error_to_projection)?;
                Ok(Some(request))
            }
            (None, None) => {
                validate_names_need_expression(&input.expression_attribute_names)?;
                Ok(None)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate that `AttributesToGet` is non-empty and free of duplicates.
fn validate_attributes_to_get(attrs: &[String]) -> Result<(), ProjectionError> {
    if attrs.is_empty() {
        return Err(ProjectionError::validation(
            "One or more parameter values are not valid. The AttributesToGet parameter \
             must contain at least one element",
        ));
    }
    let mut seen = HashSet::new();
    for attr in attrs {
        if !seen.insert(attr.as_str()) {
            return Err(ProjectionError::validation(format!(
                "One or more parameter values are not valid. \
                 Duplicate value in AttributesToGet: {attr}"
            )));
        }
    }
    Ok(())
}

/// Aliases are only meaningful alongside an expression.
fn validate_names_need_expression(names: &HashMap<String, String>) -> Result<(), ProjectionError> {
    if names.is_empty() {
        Ok(())
    } else {
        Err(ProjectionError::validation(
            "ExpressionAttributeNames can only be specified when using expressions",
        ))
    }
}

/// Validate that all provided expression attribute names are used.
fn validate_no_unused_names(
    provided_names: &HashMap<String, String>,
    used_names: &BTreeSet<String>,
) -> Result<(), ProjectionError> {
    let mut unused: Vec<&str> = provided_names
        .keys()
        .filter(|k| !used_names.contains(k.as_str()))
        .map(String::as_str)
        .collect();
    if unused.is_empty() {
        return Ok(());
    }
    unused.sort_unstable();
    Err(ProjectionError::validation(format!(
        "Value provided in ExpressionAttributeNames unused in expressions: keys: {{{}}}",
        unused.join(", ")
    )))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
