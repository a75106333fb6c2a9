//! Path resolution and projection merging.
//!
//! Resolution walks one path through an item and yields the value it names,
//! or nothing. Merging folds many `(path, value)` results back into a single
//! item that keeps the source nesting: maps keep only requested members, and
//! lists keep only requested elements, compacted in the order they were
//! merged.

use std::collections::HashMap;

use ruststack_projection_model::{AttributeValue, Item};

use super::ast::{AttributePath, PathElement};

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Walk `path` through `item`.
///
/// A missing attribute, a missing member, an out-of-range index, and a step
/// that does not match the value's shape (indexing a map, dotting into a
/// scalar) all yield `None`.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn resolve_path<'a>(
    item: &'a HashMap<String, AttributeValue>,
    path: &AttributePath,
) -> Option<&'a AttributeValue> {
    path.elements()
        .iter()
        .try_fold(item.get(path.root())?, |current, element| match element {
            PathElement::Attribute(name) => current.as_m()?.get(name),
            PathElement::Index(idx) => current.as_l()?.get(*idx),
        })
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Partially built output value.
///
/// List nodes remember which source index each kept element came from, so
/// two paths through the same source element (`a[2].x`, `a[2].y`) land in
/// the same output element.
#[derive(Debug)]
enum Node {
    Leaf(AttributeValue),
    Map(HashMap<String, Node>),
    List(Vec<(usize, Node)>),
}

impl Node {
    /// Place `value` under `node` at the relative path `elements`, building
    /// whatever maps and lists are missing along the way.
    fn place(node: Option<Node>, elements: &[PathElement], value: AttributeValue) -> Node {
        let Some((element, rest)) = elements.split_first() else {
            return Node::Leaf(value);
        };

        match element {
            PathElement::Attribute(name) => {
                let mut members = match node {
                    Some(Node::Map(members)) => members,
                    _ => HashMap::new(),
                };
                let child = members.remove(name);
                members.insert(name.clone(), Node::place(child, rest, value));
                Node::Map(members)
            }
            PathElement::Index(idx) => {
                let mut slots = match node {
                    Some(Node::List(slots)) => slots,
                    _ => Vec::new(),
                };
                match slots.iter().position(|(source, _)| source == idx) {
                    Some(pos) => {
                        let (_, child) = slots.remove(pos);
                        slots.insert(pos, (*idx, Node::place(Some(child), rest, value)));
                    }
                    None => slots.push((*idx, Node::place(None, rest, value))),
                }
                Node::List(slots)
            }
        }
    }

    fn into_value(self) -> AttributeValue {
        match self {
            Self::Leaf(value) => value,
            Self::Map(members) => AttributeValue::M(
                members
                    .into_iter()
                    .map(|(name, node)| (name, node.into_value()))
                    .collect(),
            ),
            Self::List(slots) => {
                AttributeValue::L(slots.into_iter().map(|(_, node)| node.into_value()).collect())
            }
        }
    }
}

/// Accumulates resolved paths into a projected item.
///
/// Paths fed to one merger must not overlap; see
/// [`validate_no_overlap`](super::overlap::validate_no_overlap). Under that
/// precondition insertion order only affects the order of elements within
/// output lists.
#[derive(Debug, Default)]
pub struct ProjectionMerger {
    roots: HashMap<String, Node>,
}

impl ProjectionMerger {
    /// Create an empty merger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `value` at `path`, creating intermediate maps and lists.
    pub fn insert(&mut self, path: &AttributePath, value: AttributeValue) {
        let current = self.roots.remove(path.root());
        let node = Node::place(current, path.elements(), value);
        self.roots.insert(path.root().to_owned(), node);
    }

    /// Finish merging and produce the projected item.
    #[must_use]
    pub fn finish(self) -> Item {
        self.roots
            .into_iter()
            .map(|(name, node)| (name, node.into_value()))
            .collect()
    }
}

/// Fold resolution results into one item, skipping absent values.
#[must_use]
pub fn merge<'a, I>(results: I) -> Item
where
    I: IntoIterator<Item = (&'a AttributePath, Option<AttributeValue>)>,
{
    let mut merger = ProjectionMerger::new();
    for (path, value) in results {
        if let Some(value) = value {
            merger.insert(path, value);
        }
    }
    merger.finish()
}

/// Resolve every path against `item` and merge the results.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn project_item(item: &HashMap<String, AttributeValue>, paths: &[AttributePath]) -> Item {
    merge(
        paths
            .iter()
            .map(|path| (path, resolve_path(item, path).cloned())),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
