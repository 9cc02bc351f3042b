//! Host detection over the UI tree
//!
//! Given the element under the pointer, decide which supported host (if
//! any) is being hovered and which tabs sit next to the active one. Host
//! routines are a closed dispatch over (class, framework) signatures;
//! hosts are identified by external structural shape, not by anything
//! the element itself advertises.

pub mod hosts;
pub mod skip_cache;
pub mod tabs;

pub use hosts::HOST_TABLE;
pub use skip_cache::SkipCache;

use crate::tree::{Point, UiNode, UiTree};
use crate::Result;
use std::fmt;

/// The supported hosts, plus the two "leave it alone" outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// File Explorer tabbed window
    FileManager,
    /// Chromium-based browser tab strip
    BrowserTabStrip,
    /// Windows Terminal / tabbed Notepad tab strip
    TerminalTabs,
    /// Inside a terminal-shaped window but outside its tab strip.
    /// Never acted on and never skip-cached: the same window yields tab
    /// switches when the pointer moves up onto the strip.
    TerminalNonTabArea,
    /// Viewer switched by Ctrl+Tab keystroke against its window
    DocumentViewerCtrlTab,
    /// Anything else on the desktop
    Unsupported,
}

impl HostKind {
    /// Whether a wheel event over this kind should switch a tab
    pub fn is_switch_target(&self) -> bool {
        matches!(
            self,
            HostKind::FileManager
                | HostKind::BrowserTabStrip
                | HostKind::TerminalTabs
                | HostKind::DocumentViewerCtrlTab
        )
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostKind::FileManager => "file manager",
            HostKind::BrowserTabStrip => "browser tab strip",
            HostKind::TerminalTabs => "terminal tabs",
            HostKind::TerminalNonTabArea => "terminal non-tab area",
            HostKind::DocumentViewerCtrlTab => "document viewer",
            HostKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Outcome of classifying one pointer location.
///
/// `previous`/`next` are the tabs adjacent to the active one (wrapping at
/// the ends). They are only meaningful when
/// [`HostKind::is_switch_target`] holds; for `DocumentViewerCtrlTab` both
/// are the host's top-level window element.
#[derive(Debug, Clone)]
pub struct Classification<N> {
    pub kind: HostKind,
    pub previous: N,
    pub next: N,
}

impl<N: Clone> Classification<N> {
    /// The element looked like a host but verification failed; the tab
    /// references are placeholders and must not be acted on.
    fn not_a_tab(node: &N) -> Self {
        Self {
            kind: HostKind::Unsupported,
            previous: node.clone(),
            next: node.clone(),
        }
    }
}

/// Classify the element under `point`.
///
/// `hit` is the element the point lookup returned. Any failed tree read
/// surfaces as `Err`; the worker treats that as a transient condition of
/// this one event.
pub fn identify<T: UiTree>(
    tree: &T,
    hit: &T::Node,
    point: Point,
) -> Result<Classification<T::Node>> {
    let mut node = hit.clone();
    if hosts::is_label_overlay(&node)? {
        if let Some(parent) = tree.parent(&node)? {
            node = parent;
        }
    }

    let class = node.class_name()?;
    let framework = node.framework_id()?;
    match (class.as_str(), framework.as_str()) {
        (hosts::FILE_TAB_CLASS, hosts::FRAMEWORK_XAML) => hosts::file_manager(tree, &node),
        (hosts::BROWSER_STRIP_CLASS, hosts::FRAMEWORK_CHROME) => hosts::browser_strip(tree, &node),
        (hosts::TERMINAL_WINDOW_CLASS, hosts::FRAMEWORK_WIN32)
        | (hosts::NOTEPAD_WINDOW_CLASS, hosts::FRAMEWORK_WIN32) => {
            hosts::terminal(tree, &node, point)
        }
        (hosts::VIEWER_PANE_CLASS, _) => {
            if node.name()? == hosts::VIEWER_PANE_NAME {
                hosts::document_viewer(tree, &node)
            } else {
                Ok(Classification::not_a_tab(hit))
            }
        }
        _ => Ok(Classification::not_a_tab(hit)),
    }
}
