use std::sync::Arc;

use spin::{Mutex, MutexGuard};

use crate::{error::VeilError, Result};

/// Maximum number of try-lock attempts before acquisition gives up.
pub const MAX_LOCK_ATTEMPTS: usize = 1 << 24;

/// Opaque handle to one slot of the registry arena.
///
/// A participant receives its `NodeId` when it registers and uses it for
/// every operation on its own entry. Links between entries are slot indices,
/// so detaching and reattaching are index operations rather than pointer
/// surgery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The sentinel head always lives in slot 0.
    pub(crate) const HEAD: NodeId = NodeId(0);

    /// Returns the stable arena address of this node.
    pub fn address(&self) -> usize {
        self.0
    }
}

/// A node of the ring: either the sentinel head or a payload-bearing entry.
///
/// Sentinel-vs-entry is a type-level distinction, so traversals test a
/// variant instead of comparing addresses.
#[derive(Debug)]
pub(crate) enum Node {
    Head,
    Entry { name: String },
}

#[derive(Debug)]
struct Slot {
    node: Node,
    prev: usize,
    next: usize,
}

/// Arena-backed circular doubly-linked registry.
///
/// Slot 0 holds the sentinel head; every other slot is an entry registered
/// by some participant. All access goes through the [`RegistryHandle`] lock.
#[derive(Debug)]
pub struct Registry {
    slots: Vec<Slot>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Registry {
            slots: vec![Slot { node: Node::Head, prev: 0, next: 0 }],
        }
    }

    /// Inserts a new entry immediately after `at` and returns its id.
    pub(crate) fn insert_after(&mut self, at: NodeId, name: &str) -> NodeId {
        let id = self.slots.len();
        let next = self.slots[at.0].next;
        self.slots.push(Slot {
            node: Node::Entry { name: name.to_string() },
            prev: at.0,
            next,
        });
        self.slots[at.0].next = id;
        self.slots[next].prev = id;
        NodeId(id)
    }

    /// Inserts a new entry at the tail of the ring, immediately before the
    /// sentinel head.
    pub(crate) fn insert_tail(&mut self, name: &str) -> NodeId {
        let tail = NodeId(self.slots[NodeId::HEAD.0].prev);
        self.insert_after(tail, name)
    }

    /// Removes an entry from the ring.
    ///
    /// Standard doubly-linked removal; the removed entry is left self-linked
    /// so that "currently linked" stays an observable property.
    pub(crate) fn unlink(&mut self, id: NodeId) {
        let Slot { prev, next, .. } = self.slots[id.0];
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
        self.slots[id.0].prev = id.0;
        self.slots[id.0].next = id.0;
    }

    /// Reinserts a self-linked entry immediately after `at`.
    pub(crate) fn link_after(&mut self, id: NodeId, at: NodeId) {
        let next = self.slots[at.0].next;
        self.slots[id.0].prev = at.0;
        self.slots[id.0].next = next;
        self.slots[at.0].next = id.0;
        self.slots[next].prev = id.0;
    }

    pub(crate) fn next(&self, id: NodeId) -> NodeId {
        NodeId(self.slots[id.0].next)
    }

    pub(crate) fn is_head(&self, id: NodeId) -> bool {
        matches!(self.slots[id.0].node, Node::Head)
    }

    /// Whether the node currently participates in the ring. A detached entry
    /// is self-linked, so linkage is just a next-pointer test.
    pub(crate) fn is_linked(&self, id: NodeId) -> bool {
        self.slots[id.0].next != id.0
    }

    /// Returns the entry's name, or a marker for the sentinel head.
    pub(crate) fn name(&self, id: NodeId) -> &str {
        match &self.slots[id.0].node {
            Node::Entry { name } => name,
            Node::Head => "<registry head>",
        }
    }
}

/// Cloneable shared handle to a registry.
///
/// The handle is injected into every core operation; all traversal and
/// mutation happens under its single lock.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    inner: Arc<Mutex<Registry>>,
}

impl RegistryHandle {
    /// Creates a fresh registry containing only the sentinel head.
    pub fn new() -> Self {
        RegistryHandle {
            inner: Arc::new(Mutex::new(Registry::new())),
        }
    }

    /// Registers a new participant at the tail of the ring.
    ///
    /// # Arguments
    ///
    /// * `name` - The identity of the new entry.
    ///
    /// # Returns
    ///
    /// * `Ok(NodeId)` - The id of the freshly linked entry.
    /// * `Err(VeilError)` - If the registry lock could not be acquired.
    pub fn register(&self, name: &str) -> Result<NodeId> {
        let mut registry = self.lock()?;
        let id = registry.insert_tail(name);
        drop(registry);

        log::debug!("Entry \"{}\" registered at slot {}", name, id.address());
        Ok(id)
    }

    /// Acquires the registry lock by bounded busy-polling.
    ///
    /// Spins with a processor hint between attempts, yielding the thread
    /// periodically, and gives up with [`VeilError::LockTimeout`] once the
    /// attempt budget is exhausted.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Registry>> {
        for attempt in 0..MAX_LOCK_ATTEMPTS {
            if let Some(guard) = self.inner.try_lock() {
                return Ok(guard);
            }

            if attempt % 64 == 63 {
                std::thread::yield_now();
            } else {
                core::hint::spin_loop();
            }
        }

        Err(VeilError::LockTimeout(MAX_LOCK_ATTEMPTS))
    }
}

impl Default for RegistryHandle {
    fn default() -> Self {
        Self::new()
    }
}
