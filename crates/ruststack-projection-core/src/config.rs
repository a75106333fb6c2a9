//! Projection engine configuration.

use std::env;

use crate::expression::ExpressionLimits;
use crate::expression::projection::{DEFAULT_MAX_EXPRESSION_LENGTH, DEFAULT_MAX_PATH_DEPTH};

/// Projection engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Maximum projection expression size, in bytes.
    pub max_expression_length: usize,
    /// Maximum number of steps in one document path.
    pub max_path_depth: usize,
    /// Reject `ExpressionAttributeNames` entries the expression never uses.
    pub reject_unused_names: bool,
}

impl ProjectionConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `PROJECTION_MAX_EXPRESSION_LENGTH` | `4096` |
    /// | `PROJECTION_MAX_PATH_DEPTH` | `32` |
    /// | `PROJECTION_REJECT_UNUSED_NAMES` | `true` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_expression_length: parse_usize(
                lookup("PROJECTION_MAX_EXPRESSION_LENGTH"),
                defaults.max_expression_length,
            ),
            max_path_depth: parse_usize(
                lookup("PROJECTION_MAX_PATH_DEPTH"),
                defaults.max_path_depth,
            ),
            reject_unused_names: parse_bool(
                lookup("PROJECTION_REJECT_UNUSED_NAMES"),
                defaults.reject_unused_names,
            ),
        }
    }

    /// The compile-time limits this configuration imposes.
    #[must_use]
    pub fn limits(&self) -> ExpressionLimits {
        ExpressionLimits {
            max_expression_length: self.max_expression_length,
            max_path_depth: self.max_path_depth,
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            max_expression_length: DEFAULT_MAX_EXPRESSION_LENGTH,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            reject_unused_names: true,
        }
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value.map_or(default, |v| {
        matches!(v.as_str(), "1" | "true" | "yes" | "TRUE" | "YES")
    })
}

fn parse_usize(value: Option<String>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_should_use_defaults_when_unset() {
        let config = ProjectionConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ProjectionConfig::default());
        assert_eq!(config.limits(), ExpressionLimits::default());
    }

    #[test]
    fn test_should_read_overrides() {
        let config = ProjectionConfig::from_lookup(lookup_from(&[
            ("PROJECTION_MAX_EXPRESSION_LENGTH", "128"),
            ("PROJECTION_MAX_PATH_DEPTH", " 4 "),
            ("PROJECTION_REJECT_UNUSED_NAMES", "no"),
        ]));
        assert_eq!(config.max_expression_length, 128);
        assert_eq!(config.max_path_depth, 4);
        assert!(!config.reject_unused_names);
    }

    #[test]
    fn test_should_fall_back_on_unparsable_numbers() {
        let config = ProjectionConfig::from_lookup(lookup_from(&[(
            "PROJECTION_MAX_PATH_DEPTH",
            "deep",
        )]));
        assert_eq!(config.max_path_depth, DEFAULT_MAX_PATH_DEPTH);
    }
}
