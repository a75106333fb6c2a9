//! Projection response output.

use serde::{Deserialize, Serialize};

use crate::attribute_value::Item;

/// Output of a projection call.
///
/// `items[i]` is the projection of the i-th input item. An item that holds
/// none of the requested paths is present as an empty map, never dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectionOutput {
    /// The projected items, in input order.
    pub items: Vec<Item>,
}
