use log::{error, info};

use crate::{
    error::VeilError,
    registry::{NodeId, RegistryHandle},
    Result,
};

/// Non-owning reference to the registry's sentinel head.
///
/// Only obtainable through [`locate_head`], so holding one proves discovery
/// ran against the registry. The head lives in a fixed arena slot for the
/// registry's whole lifetime, which is what makes caching the reference safe.
#[derive(Debug, Clone, Copy)]
pub struct HeadRef(pub(crate) NodeId);

impl HeadRef {
    /// Returns the arena address of the sentinel head.
    pub fn address(&self) -> usize {
        self.0.address()
    }
}

/// Discovers the registry's sentinel head by traversal.
///
/// Walks `next` starting at the successor of `self_entry` under the registry
/// lock; the first node carrying the head variant is the sentinel. A full
/// circuit back to `self_entry` without meeting one means the ring is
/// corrupted, reported as an error rather than looping forever.
///
/// # Arguments
///
/// * `registry` - Handle to the shared registry.
/// * `self_entry` - The caller's own, currently linked entry.
///
/// # Returns
///
/// * `Ok(HeadRef)` - A cacheable reference to the sentinel head.
/// * `Err(VeilError)` - If no head was found within one circuit, or the
///   registry lock could not be acquired.
pub fn locate_head(registry: &RegistryHandle, self_entry: NodeId) -> Result<HeadRef> {
    let guard = registry.lock()?;

    let mut pos = guard.next(self_entry);
    while pos != self_entry {
        if guard.is_head(pos) {
            drop(guard);
            info!("Found registry head @ slot {}", pos.address());
            return Ok(HeadRef(pos));
        }
        pos = guard.next(pos);
    }
    drop(guard);

    error!("Can't find registry head, aborting");
    Err(VeilError::HeadNotFound)
}
