use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VeilError {
    /// Represents a failure to discover the registry's sentinel head.
    ///
    /// This error is returned when a full circuit of the ring completes
    /// without meeting a head node, which indicates a corrupted ring.
    /// It is fatal to installation of a control point.
    #[error("Can't find registry head")]
    HeadNotFound,

    /// Represents a control write whose value lies outside the accepted range.
    ///
    /// The control point only accepts `0` (attached) and `1` (detached);
    /// anything else is rejected at the boundary and no registry operation
    /// is attempted.
    ///
    /// * `{0}` - The rejected value.
    #[error("Control value {0} is out of range (expected 0 or 1)")]
    ValueOutOfRange(i32),

    /// Represents a control write that could not be parsed as an integer.
    ///
    /// * `{0}` - The raw input as received.
    #[error("Malformed control value: {0:?}")]
    MalformedValue(String),

    /// Represents a failure to install a control point under a name that is
    /// already taken.
    ///
    /// * `{0}` - The name of the control point that was already registered.
    #[error("Control point {0:?} is already registered")]
    AlreadyRegistered(String),

    /// Represents a detach of an already-detached entry, or an attach of an
    /// already-attached one.
    ///
    /// Performing either silently would corrupt the ring's links, so it is
    /// surfaced as an explicit error instead.
    ///
    /// * `{0}` - The state the entry was already in (`"attached"` or `"detached"`).
    #[error("Invalid transition: entry is already {0}")]
    InvalidTransition(&'static str),

    /// Represents a registry lock acquisition that exhausted its attempt
    /// budget.
    ///
    /// The registry lock is acquired by bounded busy-polling; hitting the
    /// bound means another holder never released the lock.
    ///
    /// * `{0}` - The number of acquisition attempts made.
    #[error("Registry lock not acquired after {0} attempts")]
    LockTimeout(usize),
}
