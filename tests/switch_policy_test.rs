//! End-to-end switch policy tests against a synthetic UI tree
//!
//! Builds a terminal-shaped window out of the public `UiTree`/`UiNode`
//! traits and drives the worker through the public queue, asserting which
//! tabs end up selected: the whole pipeline minus the OS.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use wheeltab::actuate::{Actuator, Keystrokes};
use wheeltab::capture::queue;
use wheeltab::classify::SkipCache;
use wheeltab::worker::{self, SwitchWorker, WorkerSettings};
use wheeltab::{Error, NodeId, Point, Rect, Result, UiNode, UiTree, WheelEvent, WindowHandle};

/// Minimal in-memory tree: a terminal window whose tab strip covers
/// y in [0, 40] with three tabs, the middle one active.
#[derive(Clone)]
struct TerminalTree {
    selections: Arc<Mutex<Vec<String>>>,
}

#[derive(Clone)]
struct Node {
    id: i32,
    class: &'static str,
    framework: &'static str,
    automation_id: &'static str,
    name: &'static str,
    rect: Rect,
    selected: bool,
    selections: Arc<Mutex<Vec<String>>>,
}

const WINDOW: i32 = 1;
const LIST: i32 = 2;
const TAB0: i32 = 10;
const TAB1: i32 = 11;
const TAB2: i32 = 12;

impl TerminalTree {
    fn new() -> Self {
        Self {
            selections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn node(&self, id: i32) -> Node {
        let (class, framework, automation_id, name, rect, selected) = match id {
            WINDOW => (
                "CASCADIA_HOSTING_WINDOW_CLASS",
                "Win32",
                "",
                "",
                Rect::new(0, 0, 800, 600),
                false,
            ),
            LIST => (
                "ListView",
                "XAML",
                "TabListView",
                "",
                Rect::new(0, 0, 800, 40),
                false,
            ),
            TAB0 => ("ListViewItem", "XAML", "", "bash", Rect::new(0, 0, 200, 40), false),
            TAB1 => ("ListViewItem", "XAML", "", "zsh", Rect::new(200, 0, 400, 40), true),
            TAB2 => ("ListViewItem", "XAML", "", "ssh", Rect::new(400, 0, 600, 40), false),
            _ => unreachable!("unknown node {id}"),
        };
        Node {
            id,
            class,
            framework,
            automation_id,
            name,
            rect,
            selected,
            selections: Arc::clone(&self.selections),
        }
    }

    fn selected_names(&self) -> Vec<String> {
        self.selections.lock().unwrap().clone()
    }
}

impl UiNode for Node {
    fn class_name(&self) -> Result<String> {
        Ok(self.class.to_string())
    }

    fn framework_id(&self) -> Result<String> {
        Ok(self.framework.to_string())
    }

    fn name(&self) -> Result<String> {
        Ok(self.name.to_string())
    }

    fn automation_id(&self) -> Result<String> {
        Ok(self.automation_id.to_string())
    }

    fn runtime_id(&self) -> Result<NodeId> {
        Ok(NodeId::new(vec![7, 0, self.id]))
    }

    fn bounding_rect(&self) -> Result<Rect> {
        Ok(self.rect)
    }

    fn is_selected(&self) -> Result<bool> {
        Ok(self.selected)
    }

    fn select(&self) -> Result<()> {
        self.selections.lock().unwrap().push(self.name.to_string());
        Ok(())
    }

    fn native_window(&self) -> Result<WindowHandle> {
        Ok(WindowHandle(0))
    }
}

impl UiTree for TerminalTree {
    type Node = Node;

    fn element_at(&self, point: Point) -> Result<Option<Node>> {
        // Point lookups over this host resolve to the oversized
        // top-level window, exactly why the hit test exists.
        if self.node(WINDOW).rect.contains(point) {
            Ok(Some(self.node(WINDOW)))
        } else {
            Ok(None)
        }
    }

    fn element_from_window(&self, _handle: WindowHandle) -> Result<Option<Node>> {
        Ok(None)
    }

    fn parent(&self, node: &Node) -> Result<Option<Node>> {
        Ok(match node.id {
            LIST => Some(self.node(WINDOW)),
            TAB0 | TAB1 | TAB2 => Some(self.node(LIST)),
            _ => None,
        })
    }

    fn first_child(&self, node: &Node) -> Result<Option<Node>> {
        Ok(match node.id {
            WINDOW => Some(self.node(LIST)),
            LIST => Some(self.node(TAB0)),
            _ => None,
        })
    }

    fn last_child(&self, node: &Node) -> Result<Option<Node>> {
        Ok(match node.id {
            WINDOW => Some(self.node(LIST)),
            LIST => Some(self.node(TAB2)),
            _ => None,
        })
    }

    fn next_sibling(&self, node: &Node) -> Result<Option<Node>> {
        Ok(match node.id {
            TAB0 => Some(self.node(TAB1)),
            TAB1 => Some(self.node(TAB2)),
            _ => None,
        })
    }

    fn prev_sibling(&self, node: &Node) -> Result<Option<Node>> {
        Ok(match node.id {
            TAB1 => Some(self.node(TAB0)),
            TAB2 => Some(self.node(TAB1)),
            _ => None,
        })
    }

    fn content_first_child(&self, node: &Node) -> Result<Option<Node>> {
        self.first_child(node)
    }

    fn content_next_sibling(&self, node: &Node) -> Result<Option<Node>> {
        self.next_sibling(node)
    }
}

struct NoKeys;

impl Keystrokes for NoKeys {
    fn ctrl_held(&self) -> bool {
        false
    }

    fn post_ctrl_tab(&self, _target: WindowHandle, _reverse: bool, _gap: Duration) -> Result<()> {
        Err(Error::Actuation("no keystroke host in this fixture".into()))
    }
}

fn actuator() -> Actuator<NoKeys> {
    Actuator::new(NoKeys, Duration::from_millis(0), true)
}

#[test]
fn test_wheel_over_strip_switches_neighbors() {
    let tree = TerminalTree::new();
    let mut cache = SkipCache::default();

    worker::process_event(&tree, &mut cache, &actuator(), WheelEvent::new(300, 20, 120)).unwrap();
    worker::process_event(&tree, &mut cache, &actuator(), WheelEvent::new(300, 20, -120)).unwrap();

    // Middle tab "zsh" is active: wheel up goes to "bash", down to "ssh".
    assert_eq!(tree.selected_names(), vec!["bash", "ssh"]);
    assert!(cache.is_empty());
}

#[test]
fn test_wheel_over_terminal_body_neither_switches_nor_caches() {
    let tree = TerminalTree::new();
    let mut cache = SkipCache::default();

    for _ in 0..3 {
        worker::process_event(&tree, &mut cache, &actuator(), WheelEvent::new(300, 300, 120))
            .unwrap();
    }

    assert!(tree.selected_names().is_empty());
    // The window element stays uncached: the strip is a later hit away.
    assert!(cache.is_empty());
}

#[test]
fn test_zero_delta_is_inert() {
    let tree = TerminalTree::new();
    let mut cache = SkipCache::default();
    worker::process_event(&tree, &mut cache, &actuator(), WheelEvent::new(300, 20, 0)).unwrap();
    assert!(tree.selected_names().is_empty());
    assert!(cache.is_empty());
}

#[test]
fn test_full_pipeline_through_queue_and_worker() {
    let tree = TerminalTree::new();
    let (sender, receiver, cancel) = queue::channel();

    let mut worker = SwitchWorker::spawn(
        receiver,
        cancel,
        {
            let tree = tree.clone();
            move || Ok(tree)
        },
        NoKeys,
        WorkerSettings::default(),
    )
    .unwrap();

    sender.send(WheelEvent::new(300, 20, 120));
    sender.send(WheelEvent::new(300, 20, -120));

    let deadline = Instant::now() + Duration::from_secs(5);
    while tree.selected_names().len() < 2 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    worker.stop();

    assert_eq!(tree.selected_names(), vec!["bash", "ssh"]);
}
