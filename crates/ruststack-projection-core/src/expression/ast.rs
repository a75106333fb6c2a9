//! Document path model.
//!
//! A projection expression is a list of document paths. Each path starts at a
//! named top-level attribute and descends through any number of map members
//! (`.name`) and list indexes (`[3]`). Aliases (`#name`) have already been
//! substituted by the time a path is built, so every name here is literal.

use std::fmt;

/// A single step below the root of a document path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Enter the named member of a map.
    Attribute(String),
    /// Enter the element at a zero-based position of a list.
    Index(usize),
}

/// A document path such as `a.b[2].c`.
///
/// The root is always a named attribute; top-level attributes are never
/// indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributePath {
    root: String,
    elements: Vec<PathElement>,
}

impl AttributePath {
    /// Create a path selecting the whole top-level attribute `root`.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            elements: Vec::new(),
        }
    }

    /// Append a map member step.
    #[must_use]
    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.elements.push(PathElement::Attribute(name.into()));
        self
    }

    /// Append a list index step.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.elements.push(PathElement::Index(index));
        self
    }

    pub(crate) fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    /// The top-level attribute name.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The steps below the root, in order.
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Number of steps including the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.elements.len() + 1
    }

    /// Returns `true` if `other` lies inside the content selected by `self`,
    /// i.e. `self` is a prefix of `other`. A path contains itself.
    #[must_use]
    pub fn contains(&self, other: &AttributePath) -> bool {
        self.root == other.root && other.elements.starts_with(&self.elements)
    }

    /// Returns `true` if either path contains the other.
    #[must_use]
    pub fn overlaps(&self, other: &AttributePath) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// Render the path as a bracketed step list, e.g. `[a, b, [0]]`.
    ///
    /// Names are written verbatim, so a substituted name containing `.` or
    /// `[` reads as one step here, unlike in [`Display`](fmt::Display). A
    /// name containing `, ` or `]` can still look like several steps.
    #[must_use]
    pub fn to_step_list(&self) -> String {
        let mut out = String::with_capacity(self.root.len() + 2);
        out.push('[');
        out.push_str(&self.root);
        for element in &self.elements {
            out.push_str(", ");
            match element {
                PathElement::Attribute(name) => out.push_str(name),
                PathElement::Index(idx) => {
                    out.push('[');
                    out.push_str(&idx.to_string());
                    out.push(']');
                }
            }
        }
        out.push(']');
        out
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for element in &self.elements {
            match element {
                PathElement::Attribute(name) => write!(f, ".{name}")?,
                PathElement::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_display_as_document_path() {
        let path = AttributePath::new("a").member("b").index(2).member("c");
        assert_eq!(path.to_string(), "a.b[2].c");
        assert_eq!(path.depth(), 4);
    }

    #[test]
    fn test_should_render_step_list() {
        let path = AttributePath::new("a").member("b").index(0);
        assert_eq!(path.to_step_list(), "[a, b, [0]]");
        assert_eq!(AttributePath::new("a").to_step_list(), "[a]");
    }

    #[test]
    fn test_should_render_substituted_names_verbatim() {
        let path = AttributePath::new("a.b").member("c[1]").index(3);
        assert_eq!(path.to_string(), "a.b.c[1][3]");
        assert_eq!(path.to_step_list(), "[a.b, c[1], [3]]");
    }

    #[test]
    fn test_should_contain_itself_and_descendants() {
        let a = AttributePath::new("a");
        let ab0 = AttributePath::new("a").member("b").index(0);
        assert!(a.contains(&a));
        assert!(a.contains(&ab0));
        assert!(!ab0.contains(&a));
        assert!(ab0.overlaps(&a));
    }

    #[test]
    fn test_should_not_overlap_siblings() {
        let b0 = AttributePath::new("a").member("b").index(0);
        let b1 = AttributePath::new("a").member("b").index(1);
        let c = AttributePath::new("a").member("c");
        assert!(!b0.overlaps(&b1));
        assert!(!b0.overlaps(&c));
        assert!(!AttributePath::new("a").overlaps(&AttributePath::new("ab")));
    }

    #[test]
    fn test_should_distinguish_member_from_index_step() {
        let member = AttributePath::new("a").member("0");
        let index = AttributePath::new("a").index(0);
        assert_ne!(member, index);
        assert!(!member.overlaps(&index));
    }
}
