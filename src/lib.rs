//! # trellis-layout
//!
//! Declarative constraint layout with an environment-driven dynamic
//! activation engine.
//!
//! ## Architecture
//!
//! Constraints are built once as inactive [`ConstraintHandle`]s (directly or
//! through the fluent anchor DSL), registered into a tree of predicate-gated
//! groups, and then switched on and off by the engine as the environment
//! changes:
//!
//! ```text
//! configure (once) → context tree → update(environment) → set diff → activate/deactivate + actions
//! ```
//!
//! The engine recomputes the active set from scratch on every update and
//! touches only the difference, so a constraint active before and after a
//! transition is never churned. Everything is single-threaded and
//! synchronous; the host's constraint solver does the actual geometry.
//!
//! ## Modules
//!
//! - [`types`] - Core value types (SizeClass, Size, priorities, environment)
//! - [`predicate`] - Composable boolean conditions over the environment
//! - [`constraint`] - Handles, items, and the constraint-literal DSL
//! - [`engine`] - The dynamic layout engine and configuration builder
//! - [`reactive`] - Signal-driven updates via spark-signals
//! - [`error`] - Usage-error contracts

pub mod constraint;
pub mod engine;
pub mod error;
pub mod predicate;
pub mod reactive;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use constraint::{
    activate_all, center_in, center_in_parent, deactivate_all, fixed_size, pin_edges,
    pin_edges_to_parent, Anchor, AnchorBuilder, Attribute, ConstraintHandle, ConstraintSpec,
    Edges, LayoutItem,
};

pub use engine::{config::LayoutConfiguration, DynamicLayoutEngine};

pub use error::LayoutError;

pub use predicate::{HasSize, HasSizeClasses, Predicate};

pub use reactive::{drive, DriveHandle};
