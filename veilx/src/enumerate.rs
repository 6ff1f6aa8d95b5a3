use log::debug;

use crate::{
    locator::HeadRef,
    registry::{NodeId, Registry, RegistryHandle},
    Result,
};

/// One record of a registry enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// The stable arena address of the entry.
    pub address: usize,

    /// The entry's registered name.
    pub name: String,
}

/// Lazy traversal of the ring, one entry record per node.
///
/// Stops at the sentinel head or after a full circle, whichever comes
/// first, so a corrupted ring can never make it loop forever. Restartable
/// by calling [`Registry::iter_from`] again.
pub struct EntryIter<'a> {
    registry: &'a Registry,
    start: NodeId,
    pos: NodeId,
    done: bool,
}

impl Registry {
    /// Iterates over the entries reachable from the successor of `start`.
    pub(crate) fn iter_from(&self, start: NodeId) -> EntryIter<'_> {
        EntryIter {
            registry: self,
            start,
            pos: start,
            done: false,
        }
    }
}

impl Iterator for EntryIter<'_> {
    type Item = EntryRecord;

    fn next(&mut self) -> Option<EntryRecord> {
        if self.done {
            return None;
        }

        self.pos = self.registry.next(self.pos);
        if self.pos == self.start || self.registry.is_head(self.pos) {
            self.done = true;
            return None;
        }

        Some(EntryRecord {
            address: self.pos.address(),
            name: self.registry.name(self.pos).to_string(),
        })
    }
}

/// Enumerates every entry currently linked in the ring.
///
/// Traverses once under the registry lock, starting at the sentinel head's
/// successor, and emits one record per entry in ring order. Purely
/// observational.
///
/// # Arguments
///
/// * `registry` - Handle to the shared registry.
/// * `head` - Sentinel reference obtained from
///   [`locate_head`](crate::locate_head).
///
/// # Returns
///
/// * `Ok(Vec<EntryRecord>)` - The linked entries in ring order.
/// * `Err(VeilError)` - If the registry lock could not be acquired.
pub fn list_all(registry: &RegistryHandle, head: HeadRef) -> Result<Vec<EntryRecord>> {
    let guard = registry.lock()?;
    let records: Vec<EntryRecord> = guard.iter_from(head.0).collect();
    drop(guard);

    debug!("Registry listing ({} entries)", records.len());
    for record in &records {
        debug!("  slot {} \"{}\"", record.address, record.name);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::locate_head;

    fn names(records: &[EntryRecord]) -> Vec<&str> {
        records.iter().map(|record| record.name.as_str()).collect()
    }

    #[test]
    fn lists_entries_in_ring_order() {
        let registry = RegistryHandle::new();
        registry.register("a").unwrap();
        registry.register("b").unwrap();
        let self_entry = registry.register("self").unwrap();
        let head = locate_head(&registry, self_entry).unwrap();

        let records = list_all(&registry, head).unwrap();
        assert_eq!(names(&records), ["a", "b", "self"]);
    }

    #[test]
    fn empty_registry_lists_nothing() {
        let registry = RegistryHandle::new();
        let entry = registry.register("only").unwrap();
        let head = locate_head(&registry, entry).unwrap();
        registry.lock().unwrap().unlink(entry);

        assert!(list_all(&registry, head).unwrap().is_empty());
    }

    #[test]
    fn iteration_from_an_entry_stops_at_the_head() {
        let registry = RegistryHandle::new();
        let a = registry.register("a").unwrap();
        registry.register("b").unwrap();

        let guard = registry.lock().unwrap();
        let reached: Vec<EntryRecord> = guard.iter_from(a).collect();
        assert_eq!(names(&reached), ["b"]);
    }

    #[test]
    fn iteration_is_restartable() {
        let registry = RegistryHandle::new();
        registry.register("a").unwrap();
        let entry = registry.register("self").unwrap();
        let head = locate_head(&registry, entry).unwrap();

        let first = list_all(&registry, head).unwrap();
        let second = list_all(&registry, head).unwrap();
        assert_eq!(first, second);
    }
}
