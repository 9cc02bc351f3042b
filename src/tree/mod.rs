//! UI-tree abstraction
//!
//! The switch logic never touches UI Automation directly; it works
//! against the [`UiTree`]/[`UiNode`] traits defined here. The production
//! backend ([`uia`]) wraps `IUIAutomation`; tests substitute an in-memory
//! tree.
//!
//! Every attribute read returns `Result`: a node is a handle into another
//! process's live UI, and the element it names may be gone (or reshaped)
//! by the time it is read. Callers treat failures as "not a tab target",
//! never as fatal.

#[cfg(test)]
pub(crate) mod mock;
#[cfg(windows)]
pub mod uia;

use crate::Result;
use std::fmt;

/// A screen-space point in raw pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A screen-space rectangle (edges inclusive for hit tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Inclusive-edge containment test.
    ///
    /// Resolving an element purely by point can return an oversized
    /// enclosing container, so hosts like Windows Terminal need an
    /// explicit check of the pointer against the tab list's own bounds.
    pub fn contains(&self, p: Point) -> bool {
        self.left <= p.x && p.x <= self.right && self.top <= p.y && p.y <= self.bottom
    }
}

/// A native top-level window handle (HWND on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// Stable identity of a UI-tree element, derived from its runtime id.
///
/// Two handles that name the same underlying element produce equal
/// `NodeId`s, which is what makes the skip cache work across repeated
/// point lookups. For elements hosted in a native window, the second
/// slot of the runtime id carries that window's handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(Vec<i32>);

impl NodeId {
    pub fn new(parts: Vec<i32>) -> Self {
        Self(parts)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The hosting native window embedded in the runtime id, if any.
    pub fn hosting_window(&self) -> Option<WindowHandle> {
        match self.0.get(1) {
            Some(&raw) if raw != 0 => Some(WindowHandle(raw as isize)),
            _ => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// One element of the live UI tree.
///
/// Attributes are read on demand and may reflect a newer state of the
/// target window than the event that led here.
pub trait UiNode: Clone {
    /// Window class identifier (e.g. `CabinetWClass`)
    fn class_name(&self) -> Result<String>;

    /// UI framework identifier (e.g. `XAML`, `Chrome`, `Win32`)
    fn framework_id(&self) -> Result<String>;

    /// Human-readable element name
    fn name(&self) -> Result<String>;

    /// Automation id assigned by the host application
    fn automation_id(&self) -> Result<String>;

    /// Stable identity for equality/membership tests
    fn runtime_id(&self) -> Result<NodeId>;

    /// Screen bounds of the element
    fn bounding_rect(&self) -> Result<Rect>;

    /// Whether the element reports itself selected within its container.
    /// Elements without a selection capability report `false`.
    fn is_selected(&self) -> Result<bool>;

    /// Make this element the active item of its container
    fn select(&self) -> Result<()>;

    /// The element's own native window handle
    fn native_window(&self) -> Result<WindowHandle>;
}

/// Navigation over the live UI tree.
///
/// Parent/child/sibling walks use the control view; the `content_*`
/// variants use the content view, which some hosts need for descendant
/// searches. A walk off the edge of the tree yields `Ok(None)`.
pub trait UiTree {
    type Node: UiNode;

    /// Resolve the element under a screen point
    fn element_at(&self, point: Point) -> Result<Option<Self::Node>>;

    /// Resolve the element for a native window handle
    fn element_from_window(&self, handle: WindowHandle) -> Result<Option<Self::Node>>;

    fn parent(&self, node: &Self::Node) -> Result<Option<Self::Node>>;
    fn first_child(&self, node: &Self::Node) -> Result<Option<Self::Node>>;
    fn last_child(&self, node: &Self::Node) -> Result<Option<Self::Node>>;
    fn next_sibling(&self, node: &Self::Node) -> Result<Option<Self::Node>>;
    fn prev_sibling(&self, node: &Self::Node) -> Result<Option<Self::Node>>;

    fn content_first_child(&self, node: &Self::Node) -> Result<Option<Self::Node>>;
    fn content_next_sibling(&self, node: &Self::Node) -> Result<Option<Self::Node>>;
}
