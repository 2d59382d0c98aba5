use std::cmp::Ordering;

use smallvec::SmallVec;
use uplift_core::{Config, NodeId, OrderMode, ViewTree};

pub type Order = SmallVec<[NodeId; 8]>;

/// Ordered focusable fields for next/previous navigation around `field`.
///
/// A `NAVIGATION_ORDER` ancestor wins and its depth-first descendant
/// order is used as-is. Otherwise the fields under the nearest shared
/// container are sorted by the configured mode; stable sorts keep tree
/// order as the tie-break.
pub fn resolve(tree: &ViewTree, field: NodeId, config: &Config) -> Order {
    if let Some(container) = tree.nearest_ancestor_with(field, |caps| (config.navigation_scope)(caps))
    {
        return tree.focusable_fields_under(container);
    }

    let Some(parent) = tree.parent_of(field) else {
        return Order::new();
    };
    let mut fields = tree.focusable_fields_under(parent);
    match config.order_mode {
        OrderMode::TreeOrder => {}
        OrderMode::ByTag => fields.sort_by_key(|&id| tree.field(id).map_or(0, |f| f.tag)),
        OrderMode::ByPosition => fields.sort_by(|&a, &b| {
            let ra = tree.frame_in_window(a).unwrap_or_default();
            let rb = tree.frame_in_window(b).unwrap_or_default();
            ra.y.partial_cmp(&rb.y)
                .unwrap_or(Ordering::Equal)
                .then(ra.x.partial_cmp(&rb.x).unwrap_or(Ordering::Equal))
        }),
    }
    fields
}
