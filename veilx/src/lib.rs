//! # veilx: Shared-Registry Self-Detachment Library
//!
//! **veilx** implements safe self-detachment and reattachment inside a
//! shared, circular, doubly-linked registry guarded by a single lock. A
//! participant registers its own entry, discovers the registry's sentinel
//! head by traversal, and can then unlink or relink itself through a
//! validated boolean control point, leaving the ring intact for every
//! concurrent reader.

/// Shared registry: arena-backed circular ring and its lock.
mod registry;

/// Sentinel head discovery by traversal.
mod locator;

/// Self-detach/reattach of the caller's own entry.
mod cloak;

/// Validated control point and named registration table.
mod control;

/// Diagnostic enumeration of the ring.
mod enumerate;

/// Error handling utilities.
pub mod error;

// Re-export modules for easier access
pub use cloak::*;
pub use control::*;
pub use enumerate::*;
pub use locator::*;
pub use registry::*;

pub type Result<T> = core::result::Result<T, error::VeilError>;
