use log::info;

use crate::{
    error::VeilError,
    locator::HeadRef,
    registry::{NodeId, RegistryHandle},
    Result,
};

/// Detaches and reattaches the caller's own entry.
pub struct Cloak;

impl Cloak {
    /// Unlinks the caller's entry from the ring, or reinserts it immediately
    /// after the sentinel head.
    ///
    /// The only edges mutated are the pair adjacent to `self_entry`; no
    /// other participant's links are ever touched. After either operation
    /// the ring remains a valid circular doubly-linked list for any reader
    /// that acquires the lock afterwards.
    ///
    /// # Arguments
    ///
    /// * `registry` - Handle to the shared registry.
    /// * `self_entry` - The caller's own entry.
    /// * `head` - Sentinel reference previously obtained from
    ///   [`locate_head`](crate::locate_head) against the same registry.
    /// * `attach` - `true` to reinsert the entry, `false` to unlink it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The transition was applied.
    /// * `Err(VeilError)` - If the entry was already in the requested state,
    ///   or the registry lock could not be acquired.
    pub fn set_attached(
        registry: &RegistryHandle,
        self_entry: NodeId,
        head: HeadRef,
        attach: bool,
    ) -> Result<()> {
        let mut guard = registry.lock()?;
        let name = guard.name(self_entry).to_string();

        if attach {
            if guard.is_linked(self_entry) {
                return Err(VeilError::InvalidTransition("attached"));
            }
            guard.link_after(self_entry, head.0);
            drop(guard);

            info!("Entry \"{name}\" linked again");
        } else {
            if !guard.is_linked(self_entry) {
                return Err(VeilError::InvalidTransition("detached"));
            }
            guard.unlink(self_entry);
            drop(guard);

            info!("Entry \"{name}\" unlinked");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::locate_head;

    fn fixture() -> (RegistryHandle, NodeId, HeadRef) {
        let registry = RegistryHandle::new();
        registry.register("a").unwrap();
        registry.register("b").unwrap();
        let self_entry = registry.register("self").unwrap();
        let head = locate_head(&registry, self_entry).unwrap();
        (registry, self_entry, head)
    }

    #[test]
    fn detach_then_attach_restores_the_head_successor() {
        let (registry, self_entry, head) = fixture();

        Cloak::set_attached(&registry, self_entry, head, false).unwrap();
        {
            let guard = registry.lock().unwrap();
            assert!(!guard.is_linked(self_entry));
        }

        Cloak::set_attached(&registry, self_entry, head, true).unwrap();
        let guard = registry.lock().unwrap();
        assert!(guard.is_linked(self_entry));
        assert_eq!(guard.next(head.0), self_entry);
    }

    #[test]
    fn detach_while_detached_is_an_error() {
        let (registry, self_entry, head) = fixture();

        Cloak::set_attached(&registry, self_entry, head, false).unwrap();
        assert!(matches!(
            Cloak::set_attached(&registry, self_entry, head, false),
            Err(VeilError::InvalidTransition("detached"))
        ));
    }

    #[test]
    fn attach_while_attached_is_an_error() {
        let (registry, self_entry, head) = fixture();

        assert!(matches!(
            Cloak::set_attached(&registry, self_entry, head, true),
            Err(VeilError::InvalidTransition("attached"))
        ));
    }
}
