//! Overlap detection between requested document paths.
//!
//! A projection may not request the same content twice: two paths conflict
//! when they are equal or when one is a prefix of the other (`a` and
//! `a.b[0]`). The check is all-or-nothing.

use super::ast::AttributePath;
use super::parser::ExpressionError;

/// Reject the path set if any two paths overlap.
///
/// Pairs are compared in expression order, so the reported `first` path is
/// always the one that appeared earlier. Quadratic in the number of paths,
/// which request-size limits keep small.
///
/// # Errors
///
/// Returns `ExpressionError::PathOverlap` naming the first conflicting pair.
pub fn validate_no_overlap(paths: &[AttributePath]) -> Result<(), ExpressionError> {
    for (i, first) in paths.iter().enumerate() {
        if let Some(second) = paths[i + 1..].iter().find(|other| first.overlaps(other)) {
            return Err(ExpressionError::PathOverlap {
                first: first.to_step_list(),
                second: second.to_step_list(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_accept_disjoint_paths() {
        let paths = vec![
            AttributePath::new("a").member("b").index(0),
            AttributePath::new("a").member("b").index(1),
            AttributePath::new("a").member("c"),
            AttributePath::new("b"),
        ];
        assert!(validate_no_overlap(&paths).is_ok());
    }

    #[test]
    fn test_should_reject_duplicate_paths() {
        let paths = vec![AttributePath::new("a"), AttributePath::new("a")];
        let err = validate_no_overlap(&paths).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Two document paths overlap with each other; must remove or rewrite one of these \
             paths; path one: [a], path two: [a]"
        );
    }

    #[test]
    fn test_should_reject_containing_pair_in_either_order() {
        let outer = AttributePath::new("a");
        let inner = AttributePath::new("a").member("b").index(0);

        let err = validate_no_overlap(&[outer.clone(), inner.clone()]).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::PathOverlap {
                first: "[a]".to_owned(),
                second: "[a, b, [0]]".to_owned(),
            }
        );

        let err = validate_no_overlap(&[inner, outer]).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::PathOverlap {
                first: "[a, b, [0]]".to_owned(),
                second: "[a]".to_owned(),
            }
        );
    }

    #[test]
    fn test_should_find_conflict_among_many_paths() {
        let paths = vec![
            AttributePath::new("x"),
            AttributePath::new("a").member("b"),
            AttributePath::new("y"),
            AttributePath::new("a").member("b").member("c"),
        ];
        assert!(matches!(
            validate_no_overlap(&paths),
            Err(ExpressionError::PathOverlap { .. })
        ));
    }

    #[test]
    fn test_should_accept_empty_and_single_path_sets() {
        assert!(validate_no_overlap(&[]).is_ok());
        assert!(validate_no_overlap(&[AttributePath::new("a")]).is_ok());
    }
}
