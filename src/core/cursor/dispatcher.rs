//=========================================================================
// Message Dispatch
//=========================================================================
//
// Delivery of cursor messages to resolved targets.
//
// Architecture:
//   send(target, mode, msg)
//     HierarchyDispatcher   listeners keyed by target, walk via Hierarchy
//     ChannelDispatcher     crossbeam channel, consumer drains later
//
// Sending never fails. Listener errors and closed channels are logged
// and the fan-out continues.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::message::{CursorHandler, CursorMessage};
use super::target::{DispatchMode, Target};

//=== MessageDispatcher ===================================================

/// Delivers a message to `target` using `mode` for fan-out.
pub trait MessageDispatcher<T: Target> {
    fn send(&mut self, target: T, mode: DispatchMode, message: &CursorMessage<T>);
}

/// Shared dispatchers: the host keeps a handle to add listeners while the
/// cursor logic holds a clone for sending.
impl<T: Target, D: MessageDispatcher<T> + ?Sized> MessageDispatcher<T> for Rc<RefCell<D>> {
    fn send(&mut self, target: T, mode: DispatchMode, message: &CursorMessage<T>) {
        match self.try_borrow_mut() {
            Ok(mut dispatcher) => dispatcher.send(target, mode, message),
            Err(_) => warn!(
                target: "cursor",
                "dispatcher busy, dropped {:?} for {:?}", message.kind, target
            ),
        }
    }
}

//=== Hierarchy ===========================================================

/// Parent/child links between targets, supplied by the host scene.
pub trait Hierarchy<T: Target> {
    fn parent(&self, target: T) -> Option<T>;
    fn children(&self, target: T) -> Vec<T>;
}

/// Hierarchy with no links: every target is a root leaf.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatHierarchy;

impl<T: Target> Hierarchy<T> for FlatHierarchy {
    fn parent(&self, _target: T) -> Option<T> {
        None
    }

    fn children(&self, _target: T) -> Vec<T> {
        Vec::new()
    }
}

/// Explicit parent links with children kept in attach order.
#[derive(Debug, Clone)]
pub struct ParentMap<T> {
    parents: HashMap<T, T>,
    children: HashMap<T, Vec<T>>,
}

impl<T: Target> ParentMap<T> {
    pub fn new() -> Self {
        Self { parents: HashMap::new(), children: HashMap::new() }
    }

    /// Attaches `child` under `parent`, detaching it from any previous parent.
    pub fn attach(&mut self, child: T, parent: T) {
        self.detach(child);
        self.parents.insert(child, parent);
        self.children.entry(parent).or_default().push(child);
    }

    pub fn detach(&mut self, child: T) {
        if let Some(parent) = self.parents.remove(&child) {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|c| *c != child);
            }
        }
    }
}

impl<T: Target> Default for ParentMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Target> Hierarchy<T> for ParentMap<T> {
    fn parent(&self, target: T) -> Option<T> {
        self.parents.get(&target).copied()
    }

    fn children(&self, target: T) -> Vec<T> {
        self.children.get(&target).cloned().unwrap_or_default()
    }
}

//=== HierarchyDispatcher =================================================

/// Calls listeners registered on targets, walking the hierarchy per mode.
pub struct HierarchyDispatcher<T: Target, H: Hierarchy<T>> {
    hierarchy: H,
    listeners: HashMap<T, Vec<Box<dyn CursorHandler<T>>>>,
}

impl<T: Target, H: Hierarchy<T>> HierarchyDispatcher<T, H> {
    pub fn new(hierarchy: H) -> Self {
        Self { hierarchy, listeners: HashMap::new() }
    }

    pub fn add_listener(&mut self, target: T, handler: impl CursorHandler<T> + 'static) {
        self.listeners.entry(target).or_default().push(Box::new(handler));
    }

    /// Drops every listener on `target`. Returns how many were removed.
    pub fn remove_listeners(&mut self, target: T) -> usize {
        self.listeners.remove(&target).map_or(0, |l| l.len())
    }

    pub fn hierarchy(&self) -> &H {
        &self.hierarchy
    }

    pub fn hierarchy_mut(&mut self) -> &mut H {
        &mut self.hierarchy
    }

    /// Targets reached by `mode` starting at `target`, in delivery order.
    pub fn recipients(&self, target: T, mode: DispatchMode) -> Vec<T> {
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        match mode {
            DispatchMode::Signal => out.push(target),
            DispatchMode::Broadcast => {
                // Depth-first, parent before children.
                let mut stack = vec![target];
                while let Some(next) = stack.pop() {
                    if !visited.insert(next) {
                        continue;
                    }
                    out.push(next);
                    let children = self.hierarchy.children(next);
                    stack.extend(children.into_iter().rev());
                }
            }
            DispatchMode::SignalUpwards => {
                let mut next = Some(target);
                while let Some(current) = next {
                    if !visited.insert(current) {
                        break;
                    }
                    out.push(current);
                    next = self.hierarchy.parent(current);
                }
            }
        }
        out
    }
}

impl<T: Target, H: Hierarchy<T>> MessageDispatcher<T> for HierarchyDispatcher<T, H> {
    fn send(&mut self, target: T, mode: DispatchMode, message: &CursorMessage<T>) {
        for recipient in self.recipients(target, mode) {
            let Some(listeners) = self.listeners.get_mut(&recipient) else {
                continue;
            };
            for listener in listeners.iter_mut() {
                if let Err(err) = message.invoke(listener.as_mut()) {
                    error!(
                        target: "cursor",
                        "{:?} handler on {:?} failed: {:#}", message.kind, recipient, err
                    );
                }
            }
        }
    }
}

impl<T: Target, H: Hierarchy<T> + fmt::Debug> fmt::Debug for HierarchyDispatcher<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchyDispatcher")
            .field("hierarchy", &self.hierarchy)
            .field("targets", &self.listeners.len())
            .finish()
    }
}

//=== ChannelDispatcher ===================================================

/// A message together with its resolved delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedMessage<T> {
    pub target: T,
    pub mode: DispatchMode,
    pub message: CursorMessage<T>,
}

/// Queues messages on a crossbeam channel for a consumer to drain.
#[derive(Debug, Clone)]
pub struct ChannelDispatcher<T> {
    sender: Sender<DispatchedMessage<T>>,
}

impl<T: Target> ChannelDispatcher<T> {
    pub fn new(sender: Sender<DispatchedMessage<T>>) -> Self {
        Self { sender }
    }

    /// Dispatcher plus the receiving end of a fresh unbounded channel.
    pub fn unbounded() -> (Self, Receiver<DispatchedMessage<T>>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(sender), receiver)
    }
}

impl<T: Target> MessageDispatcher<T> for ChannelDispatcher<T> {
    fn send(&mut self, target: T, mode: DispatchMode, message: &CursorMessage<T>) {
        debug!(target: "cursor", "queue {:?} -> {:?} ({:?})", message.kind, target, mode);
        let dispatched = DispatchedMessage { target, mode, message: message.clone() };
        if self.sender.send(dispatched).is_err() {
            warn!(target: "cursor", "receiver dropped, {:?} discarded", message.kind);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
