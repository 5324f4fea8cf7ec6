//! Observer registry for network mutations.
//!
//! External trackers (arrival times, bindings, costs) register callbacks that
//! are invoked synchronously, in registration order, before the mutation that
//! triggered them returns. A callback must not mutate the network itself.

use std::fmt;

use crate::signal::Signal;
use crate::types::NodeId;

/// Handle returned on registration, used to release a callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EventHandle(u64);

type NodeCallback = Box<dyn FnMut(NodeId)>;
type ModifiedCallback = Box<dyn FnMut(NodeId, &[Signal])>;

pub struct Events {
    next_handle: u64,
    on_add: Vec<(EventHandle, NodeCallback)>,
    on_modified: Vec<(EventHandle, ModifiedCallback)>,
    on_delete: Vec<(EventHandle, NodeCallback)>,
}

impl Events {
    pub fn new() -> Self {
        Self {
            next_handle: 0,
            on_add: Vec::new(),
            on_modified: Vec::new(),
            on_delete: Vec::new(),
        }
    }

    fn handle(&mut self) -> EventHandle {
        let handle = EventHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Register a callback fired when a node is created or revived.
    pub fn register_add_event(&mut self, callback: impl FnMut(NodeId) + 'static) -> EventHandle {
        let handle = self.handle();
        self.on_add.push((handle, Box::new(callback)));
        handle
    }

    /// Register a callback fired when a node is rewritten in place.
    ///
    /// The callback receives the node and its fanins before the rewrite.
    pub fn register_modified_event(
        &mut self,
        callback: impl FnMut(NodeId, &[Signal]) + 'static,
    ) -> EventHandle {
        let handle = self.handle();
        self.on_modified.push((handle, Box::new(callback)));
        handle
    }

    /// Register a callback fired when a node is taken out.
    pub fn register_delete_event(
        &mut self,
        callback: impl FnMut(NodeId) + 'static,
    ) -> EventHandle {
        let handle = self.handle();
        self.on_delete.push((handle, Box::new(callback)));
        handle
    }

    pub fn release_add_event(&mut self, handle: EventHandle) {
        self.on_add.retain(|(h, _)| *h != handle);
    }

    pub fn release_modified_event(&mut self, handle: EventHandle) {
        self.on_modified.retain(|(h, _)| *h != handle);
    }

    pub fn release_delete_event(&mut self, handle: EventHandle) {
        self.on_delete.retain(|(h, _)| *h != handle);
    }

    pub(crate) fn on_add(&mut self, node: NodeId) {
        for (_, callback) in self.on_add.iter_mut() {
            callback(node);
        }
    }

    pub(crate) fn on_modified(&mut self, node: NodeId, old_fanins: &[Signal]) {
        for (_, callback) in self.on_modified.iter_mut() {
            callback(node, old_fanins);
        }
    }

    pub(crate) fn on_delete(&mut self, node: NodeId) {
        for (_, callback) in self.on_delete.iter_mut() {
            callback(node);
        }
    }

    /// Number of registered callbacks of all kinds.
    pub fn len(&self) -> usize {
        self.on_add.len() + self.on_modified.len() + self.on_delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Events")
            .field("on_add", &self.on_add.len())
            .field("on_modified", &self.on_modified.len())
            .field("on_delete", &self.on_delete.len())
            .finish()
    }
}
