//! Constraint model: identity-bearing handles, constrainable items, and the
//! fluent constraint-literal DSL.
//!
//! The engine in [`crate::engine`] only depends on [`ConstraintHandle`]
//! identity and activation state; everything else in this module exists to
//! manufacture handles the way a host application would.

pub mod dsl;
pub mod handle;
pub mod item;

pub use dsl::{
    center_in, center_in_parent, fixed_size, pin_edges, pin_edges_to_parent, Anchor,
    AnchorBuilder, Edges,
};
pub use handle::{activate_all, deactivate_all, Attribute, ConstraintHandle, ConstraintSpec};
pub use item::LayoutItem;
