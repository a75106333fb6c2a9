//! Compiled projection requests.
//!
//! A [`ProjectionRequest`] is an expression that has been parsed, checked
//! against size limits, and validated for overlaps. Compiling is independent
//! of any item, so a Query or Scan compiles once and applies the result to
//! every item it returns.

use std::collections::{BTreeSet, HashMap};

use ruststack_projection_model::{AttributeValue, Item};
use tracing::debug;

use super::ast::AttributePath;
use super::evaluator::project_item;
use super::overlap::validate_no_overlap;
use super::parser::{ExpressionError, parse_projection_expression};

/// Maximum projection expression size, in bytes.
pub const DEFAULT_MAX_EXPRESSION_LENGTH: usize = 4096;

/// Maximum number of steps in one document path, root included.
pub const DEFAULT_MAX_PATH_DEPTH: usize = 32;

/// Size limits applied while compiling an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionLimits {
    /// Maximum expression size, in bytes.
    pub max_expression_length: usize,
    /// Maximum number of steps in one path.
    pub max_path_depth: usize,
}

impl Default for ExpressionLimits {
    fn default() -> Self {
        Self {
            max_expression_length: DEFAULT_MAX_EXPRESSION_LENGTH,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
        }
    }
}

/// A validated, immutable set of document paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionRequest {
    paths: Vec<AttributePath>,
    referenced_names: BTreeSet<String>,
}

impl ProjectionRequest {
    /// Compile a projection expression.
    ///
    /// # Errors
    ///
    /// Returns `ExpressionError` if the expression is too long, malformed,
    /// references an undefined alias, has a path deeper than allowed, or
    /// requests overlapping paths.
    #[allow(clippy::implicit_hasher)]
    pub fn compile(
        expression: &str,
        names: &HashMap<String, String>,
        limits: &ExpressionLimits,
    ) -> Result<Self, ExpressionError> {
        if expression.len() > limits.max_expression_length {
            return Err(ExpressionError::ExpressionTooLong {
                size: expression.len(),
                max: limits.max_expression_length,
            });
        }

        let parsed = parse_projection_expression(expression, names)?;

        if let Some(depth) = parsed
            .paths
            .iter()
            .map(AttributePath::depth)
            .find(|depth| *depth > limits.max_path_depth)
        {
            return Err(ExpressionError::PathTooDeep {
                depth,
                max: limits.max_path_depth,
            });
        }

        validate_no_overlap(&parsed.paths)?;

        debug!(
            paths = parsed.paths.len(),
            aliases = parsed.referenced_names.len(),
            "compiled projection expression"
        );

        Ok(Self {
            paths: parsed.paths,
            referenced_names: parsed.referenced_names,
        })
    }

    /// Build a request selecting whole top-level attributes by name, as the
    /// legacy `AttributesToGet` parameter does.
    ///
    /// # Errors
    ///
    /// Returns `ExpressionError::PathOverlap` if a name is listed twice.
    pub fn from_attribute_names<I, S>(names: I) -> Result<Self, ExpressionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths: Vec<AttributePath> = names.into_iter().map(AttributePath::new).collect();
        validate_no_overlap(&paths)?;
        Ok(Self {
            paths,
            referenced_names: BTreeSet::new(),
        })
    }

    /// The requested paths, in expression order.
    #[must_use]
    pub fn paths(&self) -> &[AttributePath] {
        &self.paths
    }

    /// The `#alias` keys the expression referenced.
    #[must_use]
    pub fn referenced_names(&self) -> &BTreeSet<String> {
        &self.referenced_names
    }

    /// Project one item. Paths absent from the item are omitted; an item
    /// holding none of them projects to an empty item.
    #[must_use]
    #[allow(clippy::implicit_hasher)]
    pub fn apply(&self, item: &HashMap<String, AttributeValue>) -> Item {
        project_item(item, &self.paths)
    }
}

/// Compile `expression` with default limits and project `item` through it.
///
/// # Errors
///
/// Returns `ExpressionError` if the expression fails to compile. Errors never
/// depend on the contents of `item`.
#[allow(clippy::implicit_hasher)]
pub fn evaluate_projection(
    expression: &str,
    names: &HashMap<String, String>,
    item: &HashMap<String, AttributeValue>,
) -> Result<Item, ExpressionError> {
    let request = ProjectionRequest::compile(expression, names, &ExpressionLimits::default())?;
    Ok(request.apply(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_names() -> HashMap<String, String> {
        HashMap::new()
    }

    fn item(json: &str) -> Item {
        serde_json::from_str(json).unwrap()
    }

    fn sample_item() -> Item {
        item(
            r#"{
                "p": {"S": "key"},
                "a": {"M": {
                    "b": {"L": [{"N": "2"}, {"N": "4"}, {"M": {"x": {"S": "hi"}, "y": {"S": "yo"}}}]},
                    "c": {"N": "5"}
                }},
                "b": {"S": "hello"}
            }"#,
        )
    }

    #[test]
    fn test_should_evaluate_top_level_projection() {
        let source = sample_item();
        let result = evaluate_projection("a,b", &no_names(), &source).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result["a"], source["a"]);
        assert_eq!(result["b"], source["b"]);
        assert!(!result.contains_key("p"));
    }

    #[test]
    fn test_should_evaluate_with_alias() {
        let names: HashMap<String, String> = [("#name".to_owned(), "b".to_owned())].into();
        let result = evaluate_projection("#name", &names, &sample_item()).unwrap();
        assert_eq!(result, item(r#"{"b": {"S": "hello"}}"#));
    }

    #[test]
    fn test_should_evaluate_nested_projection() {
        let result = evaluate_projection("a.b[0]", &no_names(), &sample_item()).unwrap();
        assert_eq!(result, item(r#"{"a": {"M": {"b": {"L": [{"N": "2"}]}}}}"#));
    }

    #[test]
    fn test_should_return_empty_item_when_nothing_matches() {
        let result = evaluate_projection("a.b[3]", &no_names(), &sample_item()).unwrap();
        assert!(result.is_empty());
        let result = evaluate_projection("nonexistent", &no_names(), &sample_item()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_should_reject_invalid_expressions_regardless_of_item() {
        let empty = Item::new();
        for expr in ["", "a,a", "a,", ",a", "a,,b", "a,a.b[0]", "a.b[0],a.b[0]"] {
            assert!(
                evaluate_projection(expr, &no_names(), &sample_item()).is_err(),
                "expected error for {expr:?}"
            );
            assert!(
                evaluate_projection(expr, &no_names(), &empty).is_err(),
                "expected error for {expr:?} on empty item"
            );
        }
    }

    #[test]
    fn test_should_reject_overly_long_expression() {
        let limits = ExpressionLimits {
            max_expression_length: 8,
            ..ExpressionLimits::default()
        };
        let err = ProjectionRequest::compile("abcdefghi", &no_names(), &limits).unwrap_err();
        assert_eq!(err, ExpressionError::ExpressionTooLong { size: 9, max: 8 });
        assert!(ProjectionRequest::compile("abcdefgh", &no_names(), &limits).is_ok());
    }

    #[test]
    fn test_should_reject_overly_deep_path() {
        let limits = ExpressionLimits {
            max_path_depth: 3,
            ..ExpressionLimits::default()
        };
        assert!(ProjectionRequest::compile("a.b[0]", &no_names(), &limits).is_ok());
        let err = ProjectionRequest::compile("x, a.b[0].c", &no_names(), &limits).unwrap_err();
        assert_eq!(err, ExpressionError::PathTooDeep { depth: 4, max: 3 });
    }

    #[test]
    fn test_should_apply_compiled_request_to_many_items() {
        let request =
            ProjectionRequest::compile("a.c, b", &no_names(), &ExpressionLimits::default())
                .unwrap();
        assert_eq!(request.paths().len(), 2);

        let first = request.apply(&sample_item());
        let second = request.apply(&item(r#"{"b": {"N": "1"}}"#));
        let third = request.apply(&Item::new());

        assert_eq!(
            first,
            item(r#"{"a": {"M": {"c": {"N": "5"}}}, "b": {"S": "hello"}}"#)
        );
        assert_eq!(second, item(r#"{"b": {"N": "1"}}"#));
        assert!(third.is_empty());
    }

    #[test]
    fn test_should_build_request_from_attribute_names() {
        let request = ProjectionRequest::from_attribute_names(["p", "b", "missing"]).unwrap();
        let result = request.apply(&sample_item());
        assert_eq!(result, item(r#"{"p": {"S": "key"}, "b": {"S": "hello"}}"#));
        assert!(request.referenced_names().is_empty());

        assert!(ProjectionRequest::from_attribute_names(["a", "a"]).is_err());
    }

    #[test]
    fn test_should_record_referenced_aliases() {
        let names: HashMap<String, String> = [
            ("#a".to_owned(), "a".to_owned()),
            ("#unused".to_owned(), "z".to_owned()),
        ]
        .into();
        let request =
            ProjectionRequest::compile("#a.c, b", &names, &ExpressionLimits::default()).unwrap();
        assert_eq!(
            request.referenced_names().iter().collect::<Vec<_>>(),
            vec!["#a"]
        );
    }
}
