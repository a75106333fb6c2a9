//! JSON handler bridging raw request bodies to the projection provider.

use std::sync::Arc;

use ruststack_projection_model::error::{ProjectionError, ProjectionErrorCode};
use ruststack_projection_model::input::ProjectionInput;

use crate::provider::RustStackProjection;

/// Handler that decodes a JSON `ProjectionInput`, runs it through the
/// provider, and encodes the `ProjectionOutput`.
#[derive(Debug, Clone)]
pub struct RustStackProjectionHandler {
    provider: Arc<RustStackProjection>,
}

impl RustStackProjectionHandler {
    /// Create a new handler wrapping a provider.
    #[must_use]
    pub fn new(provider: Arc<RustStackProjection>) -> Self {
        Self { provider }
    }

    /// Handle one JSON request body and return the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns a `SerializationException` for malformed bodies, and whatever
    /// validation error the provider raises.
    pub fn handle_json(&self, body: &[u8]) -> Result<Vec<u8>, ProjectionError> {
        let input = decode_request(body)?;
        let output = self.provider.handle_projection(input)?;
        serialize(&output)
    }
}

/// Decode a JSON `ProjectionInput` body.
///
/// # Errors
///
/// Returns a `SerializationException` if the body is not a valid request.
pub fn decode_request(body: &[u8]) -> Result<ProjectionInput, ProjectionError> {
    deserialize(body)
}

/// Deserialize a JSON request body into the input type.
fn deserialize<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ProjectionError> {
    serde_json::from_slice(body).map_err(|e| {
        ProjectionError::serialization(format!("Failed to deserialize request body: {e}"))
            .with_source(e)
    })
}

/// Serialize an output type into a JSON body.
fn serialize<T: serde::Serialize>(output: &T) -> Result<Vec<u8>, ProjectionError> {
    serde_json::to_vec(output).map_err(|e| {
        ProjectionError::with_message(
            ProjectionErrorCode::InternalServerError,
            format!("Failed to serialize response: {e}"),
        )
        .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn handler() -> RustStackProjectionHandler {
        RustStackProjectionHandler::new(Arc::new(RustStackProjection::default()))
    }

    #[test]
    fn test_should_handle_json_request() {
        let body = json!({
            "ProjectionExpression": "#k, a.b[1]",
            "ExpressionAttributeNames": {"#k": "key"},
            "Items": [
                {"key": {"S": "x"}, "a": {"M": {"b": {"L": [{"N": "1"}, {"N": "2"}]}}}},
                {"other": {"S": "y"}}
            ]
        });
        let response = handler()
            .handle_json(&serde_json::to_vec(&body).unwrap())
            .unwrap();
        let response: Value = serde_json::from_slice(&response).unwrap();
        assert_eq!(
            response,
            json!({
                "Items": [
                    {"key": {"S": "x"}, "a": {"M": {"b": {"L": [{"N": "2"}]}}}},
                    {}
                ]
            })
        );
    }

    #[test]
    fn test_should_reject_malformed_body() {
        let err = handler().handle_json(b"{not json").unwrap_err();
        assert_eq!(err.code, ProjectionErrorCode::SerializationException);
        assert!(err.message.starts_with("Failed to deserialize request body"));
        let source = std::error::Error::source(&err).expect("serde error kept as source");
        assert!(source.is::<serde_json::Error>());
    }

    #[test]
    fn test_should_reject_unknown_attribute_type() {
        let body = br#"{"AttributesToGet": ["a"], "Items": [{"a": {"XYZ": "1"}}]}"#;
        let err = handler().handle_json(body).unwrap_err();
        assert_eq!(err.code, ProjectionErrorCode::SerializationException);
    }

    #[test]
    fn test_should_surface_validation_errors() {
        let body = br#"{"ProjectionExpression": "", "Items": []}"#;
        let err = handler().handle_json(body).unwrap_err();
        assert_eq!(err.code, ProjectionErrorCode::ValidationException);
        assert_eq!(
            err.to_json(),
            json!({
                "__type": "com.amazon.coral.validate#ValidationException",
                "Message": "Invalid ProjectionExpression: The expression can not be empty;"
            })
        );
    }
}
