//! Projection request input.
//!
//! Uses `PascalCase` JSON field naming to match the DynamoDB wire protocol.
//! Optional fields are omitted when `None`; empty maps and lists are omitted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::Item;

/// Input for a projection call over a batch of already-materialized items.
///
/// At most one of `projection_expression` and `attributes_to_get` may be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectionInput {
    /// A string that identifies the attribute paths to retrieve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,

    /// Legacy list of top-level attribute names to retrieve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_get: Option<Vec<String>>,

    /// Substitution tokens for attribute names in an expression.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// The items to project.
    #[serde(default)]
    pub items: Vec<Item>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute_value::AttributeValue;

    #[test]
    fn test_should_deserialize_pascal_case_request() {
        let json = r##"{
            "ProjectionExpression": "#n, b[0]",
            "ExpressionAttributeNames": {"#n": "name"},
            "Items": [{"name": {"S": "x"}, "b": {"L": [{"N": "1"}]}}]
        }"##;
        let input: ProjectionInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.projection_expression.as_deref(), Some("#n, b[0]"));
        assert!(input.attributes_to_get.is_none());
        assert_eq!(input.expression_attribute_names["#n"], "name");
        assert_eq!(input.items.len(), 1);
        assert_eq!(input.items[0]["name"], AttributeValue::S("x".to_owned()));
    }

    #[test]
    fn test_should_omit_empty_fields_when_serializing() {
        let input = ProjectionInput {
            attributes_to_get: Some(vec!["a".to_owned()]),
            ..ProjectionInput::default()
        };
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(json, r#"{"AttributesToGet":["a"],"Items":[]}"#);
    }
}
