use std::sync::Arc;

use hashbrown::HashMap;
use log::info;
use spin::Mutex;

use crate::{
    cloak::Cloak,
    enumerate::{list_all, EntryRecord},
    error::VeilError,
    locator::{locate_head, HeadRef},
    registry::{NodeId, RegistryHandle},
    Result,
};

/// Control value for the attached (visible) state.
pub const ATTACHED: i32 = 0;

/// Control value for the detached (hidden) state.
pub const DETACHED: i32 = 1;

/// Read/write integer control point driving attach/detach transitions.
///
/// Accepts only [`ATTACHED`] and [`DETACHED`]; every accepted state change
/// triggers exactly one registry mutation, and a write of the current value
/// is a silent no-op. The sentinel head is located once at installation and
/// cached for the control point's lifetime.
pub struct ControlPoint {
    registry: RegistryHandle,
    self_entry: NodeId,
    head: HeadRef,
    state: Mutex<i32>,
}

impl ControlPoint {
    /// Installs a control point for the caller's own entry.
    ///
    /// Runs the anchor locator once against `self_entry`; if no sentinel
    /// head is found the control point is not created and the registry is
    /// left untouched.
    ///
    /// # Arguments
    ///
    /// * `registry` - Handle to the shared registry.
    /// * `self_entry` - The caller's own, currently linked entry.
    ///
    /// # Returns
    ///
    /// * `Ok(ControlPoint)` - Initialized to [`ATTACHED`].
    /// * `Err(VeilError)` - If head discovery failed.
    pub fn install(registry: RegistryHandle, self_entry: NodeId) -> Result<Self> {
        let head = locate_head(&registry, self_entry)?;

        Ok(ControlPoint {
            registry,
            self_entry,
            head,
            state: Mutex::new(ATTACHED),
        })
    }

    /// Returns the currently stored control value.
    pub fn read(&self) -> i32 {
        *self.state.lock()
    }

    /// Writes a new control value.
    ///
    /// Values outside {0, 1} are rejected with the stored state unchanged.
    /// On a state change the entry is detached or reattached accordingly,
    /// and the new value is stored only if that mutation succeeds. The
    /// compare/mutate/store sequence holds the state lock throughout, so
    /// concurrent writers always observe it atomically.
    ///
    /// # Arguments
    ///
    /// * `value` - [`ATTACHED`] or [`DETACHED`].
    pub fn write(&self, value: i32) -> Result<()> {
        if value != ATTACHED && value != DETACHED {
            return Err(VeilError::ValueOutOfRange(value));
        }

        let mut state = self.state.lock();
        if *state == value {
            return Ok(());
        }

        Cloak::set_attached(&self.registry, self.self_entry, self.head, value == ATTACHED)?;
        *state = value;
        Ok(())
    }

    /// Writes a control value received in textual form.
    ///
    /// # Arguments
    ///
    /// * `raw` - The raw input; anything that does not parse as an integer
    ///   is rejected as malformed.
    pub fn write_str(&self, raw: &str) -> Result<()> {
        let value = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| VeilError::MalformedValue(raw.to_string()))?;
        self.write(value)
    }

    /// Returns the cached sentinel reference.
    pub fn head(&self) -> HeadRef {
        self.head
    }

    /// Enumerates the ring from the cached sentinel head.
    pub fn list(&self) -> Result<Vec<EntryRecord>> {
        list_all(&self.registry, self.head)
    }
}

/// Named registration table for control points.
///
/// Models the install/uninstall lifecycle of the control endpoint: a point
/// becomes reachable by name once registered, and registration fails if the
/// name is already taken. Unregistering performs no automatic reattachment;
/// an embedder that wants the entry visible after shutdown writes
/// [`ATTACHED`] first.
#[derive(Default)]
pub struct ControlTable {
    points: HashMap<String, Arc<ControlPoint>>,
}

impl ControlTable {
    pub fn new() -> Self {
        ControlTable {
            points: HashMap::new(),
        }
    }

    /// Registers a control point under a name.
    ///
    /// # Arguments
    ///
    /// * `name` - The name the point is reachable under.
    /// * `point` - The control point to install.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<ControlPoint>)` - A shared handle to the installed point.
    /// * `Err(VeilError)` - If the name is already registered.
    pub fn register(&mut self, name: &str, point: ControlPoint) -> Result<Arc<ControlPoint>> {
        if self.points.contains_key(name) {
            return Err(VeilError::AlreadyRegistered(name.to_string()));
        }

        let point = Arc::new(point);
        self.points.insert(name.to_string(), point.clone());

        info!("Control point \"{name}\" registered");
        Ok(point)
    }

    /// Looks up a registered control point by name.
    pub fn get(&self, name: &str) -> Option<Arc<ControlPoint>> {
        self.points.get(name).cloned()
    }

    /// Removes a control point from the table.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<ControlPoint>> {
        let point = self.points.remove(name);
        if point.is_some() {
            info!("Control point \"{name}\" unregistered");
        }
        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed() -> Arc<ControlPoint> {
        let registry = RegistryHandle::new();
        registry.register("a").unwrap();
        registry.register("b").unwrap();
        let self_entry = registry.register("self").unwrap();
        Arc::new(ControlPoint::install(registry, self_entry).unwrap())
    }

    fn names(records: &[EntryRecord]) -> Vec<&str> {
        records.iter().map(|record| record.name.as_str()).collect()
    }

    #[test]
    fn starts_attached() {
        let point = installed();
        assert_eq!(point.read(), ATTACHED);
        assert_eq!(names(&point.list().unwrap()), ["a", "b", "self"]);
    }

    #[test]
    fn out_of_range_write_is_rejected_without_state_change() {
        let point = installed();
        assert!(matches!(
            point.write(2),
            Err(VeilError::ValueOutOfRange(2))
        ));
        assert!(matches!(
            point.write(-1),
            Err(VeilError::ValueOutOfRange(-1))
        ));
        assert_eq!(point.read(), ATTACHED);
        assert_eq!(names(&point.list().unwrap()), ["a", "b", "self"]);
    }

    #[test]
    fn malformed_write_is_rejected_without_state_change() {
        let point = installed();
        assert!(matches!(
            point.write_str("on"),
            Err(VeilError::MalformedValue(_))
        ));
        assert_eq!(point.read(), ATTACHED);
    }

    #[test]
    fn textual_writes_accept_surrounding_whitespace() {
        let point = installed();
        point.write_str(" 1\n").unwrap();
        assert_eq!(point.read(), DETACHED);
    }

    #[test]
    fn repeated_write_is_a_no_op() {
        let point = installed();
        point.write(DETACHED).unwrap();
        // A second identical write must not touch the registry; if it did,
        // the detach would fail with an invalid transition.
        point.write(DETACHED).unwrap();
        assert_eq!(point.read(), DETACHED);
        assert_eq!(names(&point.list().unwrap()), ["a", "b"]);
    }

    #[test]
    fn table_rejects_duplicate_names() {
        let mut table = ControlTable::new();
        let registry = RegistryHandle::new();
        let first = registry.register("self").unwrap();

        let point = ControlPoint::install(registry.clone(), first).unwrap();
        table.register("veil", point).unwrap();

        let point = ControlPoint::install(registry.clone(), first).unwrap();
        assert!(matches!(
            table.register("veil", point),
            Err(VeilError::AlreadyRegistered(_))
        ));

        assert!(table.get("veil").is_some());
        assert!(table.unregister("veil").is_some());
        assert!(table.get("veil").is_none());
    }
}
