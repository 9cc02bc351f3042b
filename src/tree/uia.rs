//! UI Automation backend
//!
//! Wraps `IUIAutomation` behind the [`UiTree`]/[`UiNode`] traits. One
//! instance per thread: COM apartment affinity means the worker creates
//! its own `UiaTree` after it starts, and every element handle stays on
//! that thread.
//!
//! Walker conventions follow the COM API: a walk that runs off the tree
//! (no parent, no sibling) comes back as an error from the wrapper and
//! is mapped to `Ok(None)` here, matching how the classify layer probes
//! structure.

use super::{NodeId, Point, Rect, UiNode, UiTree, WindowHandle};
use crate::{Error, Result};
use std::ffi::c_void;
use windows::core::Interface;
use windows::Win32::Foundation::POINT;
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CLSCTX_INPROC_SERVER, COINIT_MULTITHREADED,
};
use windows::Win32::System::Ole::{
    SafeArrayDestroy, SafeArrayGetElement, SafeArrayGetLBound, SafeArrayGetUBound,
};
use windows::Win32::UI::Accessibility::{
    CUIAutomation8, IUIAutomation, IUIAutomationElement, IUIAutomationSelectionItemPattern,
    IUIAutomationTreeWalker, UIA_SelectionItemPatternId,
};
use windows::Win32::UI::WindowsAndMessaging::IsWindow;

fn ax<T>(what: &str, result: windows::core::Result<T>) -> Result<T> {
    result.map_err(|e| Error::Accessibility(format!("{what} failed: {e}")))
}

/// Live UI Automation tree of the whole desktop.
pub struct UiaTree {
    automation: IUIAutomation,
    control: IUIAutomationTreeWalker,
    content: IUIAutomationTreeWalker,
}

impl UiaTree {
    /// Create the UIA connection on the calling thread (initializes COM
    /// as MTA there).
    pub fn new() -> Result<Self> {
        unsafe {
            let _ = CoInitializeEx(None, COINIT_MULTITHREADED);
            let automation: IUIAutomation = ax(
                "CoCreateInstance(CUIAutomation)",
                CoCreateInstance(&CUIAutomation8, None, CLSCTX_INPROC_SERVER),
            )?;
            let control = ax("ControlViewWalker", automation.ControlViewWalker())?;
            let content = ax("ContentViewWalker", automation.ContentViewWalker())?;
            Ok(Self {
                automation,
                control,
                content,
            })
        }
    }

    fn wrap(element: windows::core::Result<IUIAutomationElement>) -> Option<UiaNode> {
        element.ok().map(|element| UiaNode { element })
    }
}

/// One element of the UIA tree.
#[derive(Clone)]
pub struct UiaNode {
    element: IUIAutomationElement,
}

impl UiaNode {
    fn selection_pattern(&self) -> Option<IUIAutomationSelectionItemPattern> {
        let pattern = unsafe {
            self.element
                .GetCurrentPattern(UIA_SelectionItemPatternId)
                .ok()?
        };
        pattern.cast().ok()
    }
}

impl UiNode for UiaNode {
    fn class_name(&self) -> Result<String> {
        ax("CurrentClassName", unsafe { self.element.CurrentClassName() })
            .map(|s| s.to_string())
    }

    fn framework_id(&self) -> Result<String> {
        ax("CurrentFrameworkId", unsafe {
            self.element.CurrentFrameworkId()
        })
        .map(|s| s.to_string())
    }

    fn name(&self) -> Result<String> {
        ax("CurrentName", unsafe { self.element.CurrentName() }).map(|s| s.to_string())
    }

    fn automation_id(&self) -> Result<String> {
        ax("CurrentAutomationId", unsafe {
            self.element.CurrentAutomationId()
        })
        .map(|s| s.to_string())
    }

    fn runtime_id(&self) -> Result<NodeId> {
        unsafe {
            let array = ax("GetRuntimeId", self.element.GetRuntimeId())?;
            if array.is_null() {
                return Ok(NodeId::new(Vec::new()));
            }
            let mut parts = Vec::new();
            let lower = SafeArrayGetLBound(array, 1).unwrap_or(0);
            let upper = SafeArrayGetUBound(array, 1).unwrap_or(-1);
            for index in lower..=upper {
                let mut value: i32 = 0;
                if SafeArrayGetElement(array, &index, &mut value as *mut i32 as *mut c_void)
                    .is_ok()
                {
                    parts.push(value);
                }
            }
            let _ = SafeArrayDestroy(array);
            Ok(NodeId::new(parts))
        }
    }

    fn bounding_rect(&self) -> Result<Rect> {
        let rect = ax("CurrentBoundingRectangle", unsafe {
            self.element.CurrentBoundingRectangle()
        })?;
        Ok(Rect::new(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn is_selected(&self) -> Result<bool> {
        // Elements without the selection capability are simply never the
        // active tab.
        let Some(pattern) = self.selection_pattern() else {
            return Ok(false);
        };
        ax("CurrentIsSelected", unsafe { pattern.CurrentIsSelected() }).map(|b| b.as_bool())
    }

    fn select(&self) -> Result<()> {
        let Some(pattern) = self.selection_pattern() else {
            return Err(Error::Actuation(
                "element has no selection capability".into(),
            ));
        };
        unsafe { pattern.Select() }
            .map_err(|e| Error::Actuation(format!("SelectionItem.Select failed: {e}")))
    }

    fn native_window(&self) -> Result<WindowHandle> {
        let hwnd = ax("CurrentNativeWindowHandle", unsafe {
            self.element.CurrentNativeWindowHandle()
        })?;
        Ok(WindowHandle(hwnd.0 as isize))
    }
}

impl UiTree for UiaTree {
    type Node = UiaNode;

    fn element_at(&self, point: Point) -> Result<Option<UiaNode>> {
        let pt = POINT {
            x: point.x,
            y: point.y,
        };
        Ok(Self::wrap(unsafe { self.automation.ElementFromPoint(pt) }))
    }

    fn element_from_window(&self, handle: WindowHandle) -> Result<Option<UiaNode>> {
        let hwnd = windows::Win32::Foundation::HWND(handle.0 as *mut _);
        if !unsafe { IsWindow(hwnd) }.as_bool() {
            return Ok(None);
        }
        Ok(Self::wrap(unsafe { self.automation.ElementFromHandle(hwnd) }))
    }

    fn parent(&self, node: &UiaNode) -> Result<Option<UiaNode>> {
        Ok(Self::wrap(unsafe {
            self.control.GetParentElement(&node.element)
        }))
    }

    fn first_child(&self, node: &UiaNode) -> Result<Option<UiaNode>> {
        Ok(Self::wrap(unsafe {
            self.control.GetFirstChildElement(&node.element)
        }))
    }

    fn last_child(&self, node: &UiaNode) -> Result<Option<UiaNode>> {
        Ok(Self::wrap(unsafe {
            self.control.GetLastChildElement(&node.element)
        }))
    }

    fn next_sibling(&self, node: &UiaNode) -> Result<Option<UiaNode>> {
        Ok(Self::wrap(unsafe {
            self.control.GetNextSiblingElement(&node.element)
        }))
    }

    fn prev_sibling(&self, node: &UiaNode) -> Result<Option<UiaNode>> {
        Ok(Self::wrap(unsafe {
            self.control.GetPreviousSiblingElement(&node.element)
        }))
    }

    fn content_first_child(&self, node: &UiaNode) -> Result<Option<UiaNode>> {
        Ok(Self::wrap(unsafe {
            self.content.GetFirstChildElement(&node.element)
        }))
    }

    fn content_next_sibling(&self, node: &UiaNode) -> Result<Option<UiaNode>> {
        Ok(Self::wrap(unsafe {
            self.content.GetNextSiblingElement(&node.element)
        }))
    }
}
