//! In-memory UI tree for unit tests.
//!
//! Nodes live in an arena; parent/child/sibling order is the order of the
//! `children` lists. Reads can be made to fail per node to exercise the
//! worker's per-event recovery, and every `select()` call is recorded so
//! tests can assert which tab (if any) was actuated.

use super::{NodeId, Point, Rect, UiNode, UiTree, WindowHandle};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub class: String,
    pub framework: String,
    pub name: String,
    pub automation_id: String,
    pub runtime_id: Vec<i32>,
    pub rect: Rect,
    pub selected: bool,
    pub native_window: isize,
    pub fail_reads: bool,
}

impl NodeSpec {
    pub fn new(class: &str, framework: &str) -> Self {
        Self {
            class: class.to_string(),
            framework: framework.to_string(),
            name: String::new(),
            automation_id: String::new(),
            runtime_id: Vec::new(),
            rect: Rect::default(),
            selected: false,
            native_window: 0,
            fail_reads: false,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn automation_id(mut self, id: &str) -> Self {
        self.automation_id = id.to_string();
        self
    }

    pub fn runtime_id(mut self, id: Vec<i32>) -> Self {
        self.runtime_id = id;
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn native_window(mut self, handle: isize) -> Self {
        self.native_window = handle;
        self
    }

    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }
}

struct NodeData {
    spec: NodeSpec,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Default)]
struct Inner {
    nodes: Vec<NodeData>,
    at_point: HashMap<(i32, i32), usize>,
    windows: HashMap<isize, usize>,
    selections: Vec<usize>,
}

/// Shared-arena mock tree. Cloning is cheap; clones observe the same
/// selection log, which is what worker tests assert against.
#[derive(Clone, Default)]
pub struct MockTree {
    inner: Arc<Mutex<Inner>>,
}

impl MockTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, spec: NodeSpec) -> usize {
        let mut inner = self.inner.lock().unwrap();
        // Default identity: unique single-part runtime id so the skip
        // cache can always key the node.
        let idx = inner.nodes.len();
        let mut spec = spec;
        if spec.runtime_id.is_empty() {
            spec.runtime_id = vec![1000 + idx as i32];
        }
        inner.nodes.push(NodeData {
            spec,
            parent: None,
            children: Vec::new(),
        });
        idx
    }

    /// Append `child` to `parent`'s ordered child list.
    pub fn attach(&self, parent: usize, child: usize) {
        let mut inner = self.inner.lock().unwrap();
        inner.nodes[parent].children.push(child);
        inner.nodes[child].parent = Some(parent);
    }

    /// Route `element_at` for a screen point to a node.
    pub fn place(&self, x: i32, y: i32, idx: usize) {
        self.inner.lock().unwrap().at_point.insert((x, y), idx);
    }

    /// Route `element_from_window` for a handle to a node.
    pub fn register_window(&self, handle: isize, idx: usize) {
        self.inner.lock().unwrap().windows.insert(handle, idx);
    }

    pub fn node(&self, idx: usize) -> MockNode {
        MockNode {
            inner: Arc::clone(&self.inner),
            idx,
        }
    }

    /// Indices of every node selected so far, in call order.
    pub fn selections(&self) -> Vec<usize> {
        self.inner.lock().unwrap().selections.clone()
    }
}

#[derive(Clone)]
pub struct MockNode {
    inner: Arc<Mutex<Inner>>,
    idx: usize,
}

impl MockNode {
    pub fn index(&self) -> usize {
        self.idx
    }

    fn read<T>(&self, f: impl FnOnce(&NodeSpec) -> T) -> Result<T> {
        let inner = self.inner.lock().unwrap();
        let data = &inner.nodes[self.idx];
        if data.spec.fail_reads {
            return Err(Error::Accessibility("element is gone".into()));
        }
        Ok(f(&data.spec))
    }
}

impl UiNode for MockNode {
    fn class_name(&self) -> Result<String> {
        self.read(|s| s.class.clone())
    }

    fn framework_id(&self) -> Result<String> {
        self.read(|s| s.framework.clone())
    }

    fn name(&self) -> Result<String> {
        self.read(|s| s.name.clone())
    }

    fn automation_id(&self) -> Result<String> {
        self.read(|s| s.automation_id.clone())
    }

    fn runtime_id(&self) -> Result<NodeId> {
        self.read(|s| NodeId::new(s.runtime_id.clone()))
    }

    fn bounding_rect(&self) -> Result<Rect> {
        self.read(|s| s.rect)
    }

    fn is_selected(&self) -> Result<bool> {
        self.read(|s| s.selected)
    }

    fn select(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.nodes[self.idx].spec.fail_reads {
            return Err(Error::Actuation("select failed".into()));
        }
        inner.selections.push(self.idx);
        Ok(())
    }

    fn native_window(&self) -> Result<WindowHandle> {
        self.read(|s| WindowHandle(s.native_window))
    }
}

impl MockTree {
    fn wrap(&self, idx: Option<usize>) -> Option<MockNode> {
        idx.map(|idx| MockNode {
            inner: Arc::clone(&self.inner),
            idx,
        })
    }

    fn sibling(&self, node: &MockNode, offset: isize) -> Option<usize> {
        let inner = self.inner.lock().unwrap();
        let parent = inner.nodes[node.idx].parent?;
        let siblings = &inner.nodes[parent].children;
        let pos = siblings.iter().position(|&c| c == node.idx)?;
        let target = pos as isize + offset;
        if target < 0 {
            return None;
        }
        siblings.get(target as usize).copied()
    }
}

impl UiTree for MockTree {
    type Node = MockNode;

    fn element_at(&self, point: Point) -> Result<Option<MockNode>> {
        let idx = {
            let inner = self.inner.lock().unwrap();
            inner.at_point.get(&(point.x, point.y)).copied()
        };
        Ok(self.wrap(idx))
    }

    fn element_from_window(&self, handle: WindowHandle) -> Result<Option<MockNode>> {
        let idx = {
            let inner = self.inner.lock().unwrap();
            inner.windows.get(&handle.0).copied()
        };
        Ok(self.wrap(idx))
    }

    fn parent(&self, node: &MockNode) -> Result<Option<MockNode>> {
        let idx = self.inner.lock().unwrap().nodes[node.idx].parent;
        Ok(self.wrap(idx))
    }

    fn first_child(&self, node: &MockNode) -> Result<Option<MockNode>> {
        let idx = self.inner.lock().unwrap().nodes[node.idx]
            .children
            .first()
            .copied();
        Ok(self.wrap(idx))
    }

    fn last_child(&self, node: &MockNode) -> Result<Option<MockNode>> {
        let idx = self.inner.lock().unwrap().nodes[node.idx]
            .children
            .last()
            .copied();
        Ok(self.wrap(idx))
    }

    fn next_sibling(&self, node: &MockNode) -> Result<Option<MockNode>> {
        Ok(self.wrap(self.sibling(node, 1)))
    }

    fn prev_sibling(&self, node: &MockNode) -> Result<Option<MockNode>> {
        Ok(self.wrap(self.sibling(node, -1)))
    }

    fn content_first_child(&self, node: &MockNode) -> Result<Option<MockNode>> {
        self.first_child(node)
    }

    fn content_next_sibling(&self, node: &MockNode) -> Result<Option<MockNode>> {
        self.next_sibling(node)
    }
}
