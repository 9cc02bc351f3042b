//! # wheeltab
//!
//! Switch the active tab of a tabbed Windows application by rotating the
//! mouse wheel over its tab strip, without clicking the tab control first.
//!
//! ## Overview
//!
//! A system-wide `WH_MOUSE_LL` hook captures wheel messages before the
//! hovered application sees them. A background worker resolves the UI
//! Automation element under the pointer, decides whether a supported host
//! is being hovered and which tab is active, and then either selects the
//! adjacent tab through the UIA `SelectionItem` pattern or posts a
//! Ctrl(+Shift)+Tab keystroke sequence to the host window.
//!
//! ## Supported hosts
//!
//! - File Explorer (Windows 11 tabbed windows)
//! - Chromium-based browser tab strips (Edge, Chrome)
//! - Windows Terminal and the tabbed Notepad
//! - Acrobat-style document viewers (keystroke switching; these expose no
//!   addressable tab elements)
//!
//! ## Event Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │ WH_MOUSE_LL │───▶│ Wheel Queue │───▶│ Tab Lookup  │───▶│   Switch    │
//! │   (hook)    │    │ (unbounded) │    │ (UIA walk)  │    │  Actuator   │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//! ```
//!
//! The hook callback runs on the hook thread's message pump and never
//! blocks; everything after the queue runs on one dedicated worker thread,
//! strictly one event at a time.
//!
//! ## Architecture
//!
//! - [`capture`]: wheel hook, event types and the hook-to-worker queue
//! - [`tree`]: the UI-tree abstraction and its UI Automation backend
//! - [`classify`]: host detection heuristics and the skip cache
//! - [`actuate`]: tab selection and keystroke synthesis
//! - [`worker`]: the classify-and-switch consumer loop
//! - [`engine`]: hook + worker lifecycle (Windows only)
//! - [`app`]: CLI and configuration management

pub mod actuate;
pub mod app;
pub mod capture;
pub mod classify;
#[cfg(windows)]
pub mod engine;
pub mod tree;
pub mod worker;

// Re-export commonly used types
pub use capture::queue::{CancelHandle, WheelReceiver, WheelSender};
pub use capture::types::WheelEvent;
pub use classify::{Classification, HostKind};
pub use tree::{NodeId, Point, Rect, UiNode, UiTree, WindowHandle};

/// Result type alias for wheeltab
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for wheeltab
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Hook error: {0}")]
    Hook(String),

    #[error("Queue error: {0}")]
    Queue(String),

    #[error("Accessibility error: {0}")]
    Accessibility(String),

    #[error("Actuation error: {0}")]
    Actuation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
