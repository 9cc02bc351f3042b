//! Active-tab neighbor lookup within a tab list.

use crate::tree::{UiNode, UiTree};
use crate::Result;
use tracing::debug;

/// The active tab of a list plus its ring neighbors.
#[derive(Debug, Clone)]
pub struct TabNeighbors<N> {
    pub active: N,
    pub previous: N,
    pub next: N,
}

/// Walk `list`'s children in order and resolve the selected tab and its
/// neighbors.
///
/// Only children whose class matches `tab_class` count as tabs. The
/// neighbors wrap: when the first tab is active its predecessor is the
/// list's last child, and when the last tab is active its successor is
/// the list's first child. Lists with one or two tabs therefore yield
/// duplicate references, which is what the caller wants: "the other
/// tab" twice, or the active tab itself three times.
///
/// Returns `Ok(None)` when no child reports itself selected.
pub fn neighbors_of_selected<T: UiTree>(
    tree: &T,
    list: &T::Node,
    tab_class: &str,
) -> Result<Option<TabNeighbors<T::Node>>> {
    let first_child = tree.first_child(list)?;
    let mut child = first_child.clone();
    let mut before: Option<T::Node> = None;
    let mut active: Option<T::Node> = None;
    let mut previous: Option<T::Node> = None;
    let mut next: Option<T::Node> = None;

    while let Some(node) = child {
        if node.class_name().map(|c| c == tab_class).unwrap_or(false) {
            if active.is_none() && node.is_selected()? {
                debug!(tab = %node.name().unwrap_or_default(), "active tab found");
                previous = match before.take() {
                    Some(prev) => Some(prev),
                    // First tab is active; wrap to the end of the list.
                    None => tree.last_child(list)?,
                };
                active = Some(node.clone());
            } else if active.is_some() {
                next = Some(node);
                break;
            }
        }
        before = Some(node.clone());
        child = tree.next_sibling(&node)?;
    }

    let (Some(active), Some(previous)) = (active, previous) else {
        return Ok(None);
    };
    // Last tab is active; wrap to the start of the list.
    let next = match next {
        Some(node) => node,
        None => match first_child {
            Some(node) => node,
            None => return Ok(None),
        },
    };

    Ok(Some(TabNeighbors {
        active,
        previous,
        next,
    }))
}
