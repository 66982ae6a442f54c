//! Error types for trellis-layout.
//!
//! Every variant is a programmer-error contract caught during layout setup.
//! A correctly configured engine never produces an error at update time.

use thiserror::Error;

/// Usage errors surfaced during configuration or constraint building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// `configure` was called a second time on the same engine.
    #[error("engine is already configured; configure may be called exactly once")]
    AlreadyConfigured,

    /// A constraint registered during configuration was already active.
    ///
    /// Activation of registered constraints is owned by the engine; mixing
    /// in apply-immediately constraints would break the diff bookkeeping.
    #[error("constraint {identifier:?} (id {id}) is already active; dynamic constraints must be registered inactive")]
    AlreadyActive {
        /// Identity of the offending handle.
        id: u64,
        /// Debug identifier of the offending handle, when one was set.
        identifier: Option<String>,
    },

    /// A parent-relative constraint was requested for an item with no parent.
    #[error("item {item:?} has no parent; attach it before building parent-relative constraints")]
    MissingParent {
        /// Debug name of the parentless item.
        item: String,
    },
}
