//! Per-host detection routines.
//!
//! Hosts are recognized purely by accessibility-tree shape: the (class,
//! framework) pair of the element under the pointer is only a hypothesis,
//! and each routine verifies it by walking to a structurally required
//! ancestor or sibling and checking its class. A failed verification
//! classifies as [`HostKind::Unsupported`], never as an error.

use super::tabs;
use super::{Classification, HostKind};
use crate::tree::{Point, UiNode, UiTree};
use crate::Result;
use tracing::debug;

pub(super) const FRAMEWORK_XAML: &str = "XAML";
pub(super) const FRAMEWORK_CHROME: &str = "Chrome";
pub(super) const FRAMEWORK_WIN32: &str = "Win32";

/// Explorer tab elements and their list share this class.
pub(super) const FILE_TAB_CLASS: &str = "ListViewItem";
const FILE_BRIDGE_CLASS: &str = "Microsoft.UI.Content.DesktopChildSiteBridge";
const FILE_WINDOW_CLASS: &str = "CabinetWClass";

pub(super) const BROWSER_STRIP_CLASS: &str = "TabStrip::TabDragContextImpl";
const BROWSER_WINDOW_CLASS: &str = "Chrome_WidgetWin_1";
const BROWSER_TAB_CLASS: &str = "EdgeTab";

pub(super) const TERMINAL_WINDOW_CLASS: &str = "CASCADIA_HOSTING_WINDOW_CLASS";
pub(super) const NOTEPAD_WINDOW_CLASS: &str = "Notepad";
const TERMINAL_LIST_CLASS: &str = "ListView";
const TERMINAL_LIST_ID: &str = "TabListView";
const TERMINAL_TAB_CLASS: &str = "ListViewItem";

pub(super) const VIEWER_PANE_CLASS: &str = "AVL_AVView";
pub(super) const VIEWER_PANE_NAME: &str = "AVTabLinksContainerViewForDocs";
const VIEWER_WINDOW_CLASS: &str = "AcrobatSDIWindow";

/// Hosts shown by `wheeltab hosts`: display name, verified window class,
/// switch mechanism.
pub const HOST_TABLE: &[(&str, &str, &str)] = &[
    ("File Explorer", FILE_WINDOW_CLASS, "tab selection"),
    ("Chromium tab strip (Edge, Chrome)", BROWSER_WINDOW_CLASS, "tab selection"),
    (
        "Windows Terminal / Notepad",
        "CASCADIA_HOSTING_WINDOW_CLASS, Notepad",
        "tab selection",
    ),
    ("Acrobat-style viewer", VIEWER_WINDOW_CLASS, "Ctrl+Tab keystroke"),
];

/// Explorer layers a tab's text and icon as separate XAML children on
/// top of the tab element itself; the hit test lands on those.
pub(super) fn is_label_overlay<N: UiNode>(node: &N) -> Result<bool> {
    let class = node.class_name()?;
    let overlay = matches!(class.as_str(), "TextBlock" | "Image" | "Button")
        && node.framework_id()? == FRAMEWORK_XAML;
    Ok(overlay)
}

/// The window hosting the hit element, resolved through the native
/// handle embedded in its runtime id.
fn hosting_element<T: UiTree>(tree: &T, node: &T::Node) -> Result<Option<T::Node>> {
    let Some(handle) = node.runtime_id()?.hosting_window() else {
        return Ok(None);
    };
    tree.element_from_window(handle)
}

/// File Explorer: the hit node is a `ListViewItem` whose hosting bridge
/// element sits directly under a `CabinetWClass` window. The tab list is
/// the hit node's parent, since tabs render above their list container.
pub(super) fn file_manager<T: UiTree>(
    tree: &T,
    node: &T::Node,
) -> Result<Classification<T::Node>> {
    let Some(bridge) = hosting_element(tree, node)? else {
        return Ok(Classification::not_a_tab(node));
    };
    if bridge.class_name()? != FILE_BRIDGE_CLASS {
        return Ok(Classification::not_a_tab(node));
    }
    let Some(window) = tree.parent(&bridge)? else {
        return Ok(Classification::not_a_tab(node));
    };
    if window.class_name()? != FILE_WINDOW_CLASS {
        return Ok(Classification::not_a_tab(node));
    }
    debug!("file manager tab strip under pointer");

    let Some(list) = tree.parent(node)? else {
        return Ok(Classification::not_a_tab(node));
    };
    match tabs::neighbors_of_selected(tree, &list, FILE_TAB_CLASS)? {
        Some(found) => Ok(Classification {
            kind: HostKind::FileManager,
            previous: found.previous,
            next: found.next,
        }),
        None => Ok(Classification::not_a_tab(node)),
    }
}

/// Chromium tab strip: the drag-context element's *previous sibling* is
/// the container holding the actual tab elements.
pub(super) fn browser_strip<T: UiTree>(
    tree: &T,
    node: &T::Node,
) -> Result<Classification<T::Node>> {
    let Some(window) = hosting_element(tree, node)? else {
        return Ok(Classification::not_a_tab(node));
    };
    if window.class_name()? != BROWSER_WINDOW_CLASS {
        return Ok(Classification::not_a_tab(node));
    }
    debug!("browser tab strip under pointer");

    let Some(list) = tree.prev_sibling(node)? else {
        return Ok(Classification::not_a_tab(node));
    };
    match tabs::neighbors_of_selected(tree, &list, BROWSER_TAB_CLASS)? {
        Some(found) => Ok(Classification {
            kind: HostKind::BrowserTabStrip,
            previous: found.previous,
            next: found.next,
        }),
        None => Ok(Classification::not_a_tab(node)),
    }
}

/// Windows Terminal (and the tabbed Notepad, which shares the layout):
/// a point lookup over these windows returns the oversized top-level
/// element, so the tab list is found by content-tree search and the
/// pointer is hit-tested against the list's own bounds.
pub(super) fn terminal<T: UiTree>(
    tree: &T,
    node: &T::Node,
    point: Point,
) -> Result<Classification<T::Node>> {
    let Some(list) = find_content_descendant(tree, node, TERMINAL_LIST_CLASS)? else {
        return Ok(Classification::not_a_tab(node));
    };
    if list.automation_id()? != TERMINAL_LIST_ID {
        return Ok(Classification::not_a_tab(node));
    }

    if !list.bounding_rect()?.contains(point) {
        debug!(x = point.x, y = point.y, "pointer outside the tab strip");
        return Ok(Classification {
            kind: HostKind::TerminalNonTabArea,
            previous: node.clone(),
            next: node.clone(),
        });
    }
    debug!("terminal tab strip under pointer");

    match tabs::neighbors_of_selected(tree, &list, TERMINAL_TAB_CLASS)? {
        Some(found) => Ok(Classification {
            kind: HostKind::TerminalTabs,
            previous: found.previous,
            next: found.next,
        }),
        None => Ok(Classification::not_a_tab(node)),
    }
}

/// Acrobat-style viewers expose no addressable tab elements; switching
/// is done by keystroke against the top-level window, so both neighbor
/// references become that window.
pub(super) fn document_viewer<T: UiTree>(
    tree: &T,
    node: &T::Node,
) -> Result<Classification<T::Node>> {
    let Some(window) = find_ancestor_by_class(tree, node, VIEWER_WINDOW_CLASS)? else {
        return Ok(Classification::not_a_tab(node));
    };
    debug!("document viewer tab links under pointer");
    Ok(Classification {
        kind: HostKind::DocumentViewerCtrlTab,
        previous: window.clone(),
        next: window,
    })
}

/// Depth-first content-view search for the first descendant with the
/// given class. Unreadable elements are skipped, not fatal.
fn find_content_descendant<T: UiTree>(
    tree: &T,
    root: &T::Node,
    class: &str,
) -> Result<Option<T::Node>> {
    let mut child = tree.content_first_child(root)?;
    while let Some(node) = child {
        if node.class_name().map(|c| c == class).unwrap_or(false) {
            return Ok(Some(node));
        }
        if let Some(found) = find_content_descendant(tree, &node, class)? {
            return Ok(Some(found));
        }
        child = tree.content_next_sibling(&node)?;
    }
    Ok(None)
}

/// Walk ancestors until one has the given class.
fn find_ancestor_by_class<T: UiTree>(
    tree: &T,
    node: &T::Node,
    class: &str,
) -> Result<Option<T::Node>> {
    let mut current = tree.parent(node)?;
    while let Some(ancestor) = current {
        if ancestor.class_name().map(|c| c == class).unwrap_or(false) {
            return Ok(Some(ancestor));
        }
        current = tree.parent(&ancestor)?;
    }
    Ok(None)
}
