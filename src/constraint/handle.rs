//! Constraint Handle - Identity-bearing reference to a host constraint.
//!
//! The dynamic layout engine never looks inside a constraint; it only needs
//! stable identity (for set diffing) and an activate/deactivate lifecycle.
//! The handle carries a [`ConstraintSpec`] so the host solver can read what
//! the constraint means, but two handles built from identical specs are
//! still distinct entities.
//!
//! Activation is idempotent: activating an active handle or deactivating an
//! inactive one is a no-op, never an error.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::constraint::item::LayoutItem;
use crate::types::{LayoutPriority, Relation};

// =============================================================================
// Attribute
// =============================================================================

/// The anchor attribute a constraint refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Attribute {
    Top = 0,
    Bottom = 1,
    Leading = 2,
    Trailing = 3,
    CenterX = 4,
    CenterY = 5,
    Width = 6,
    Height = 7,
}

impl Attribute {
    /// Dimensional attributes may be constrained to a bare constant.
    #[inline]
    pub const fn is_dimension(&self) -> bool {
        matches!(self, Self::Width | Self::Height)
    }
}

// =============================================================================
// Constraint Spec
// =============================================================================

/// What a constraint means, in host-solver terms:
/// `item.attribute  relation  target.attribute * multiplier + constant`.
///
/// Opaque to the engine; read by the host when a handle is activated.
#[derive(Debug, Clone)]
pub struct ConstraintSpec {
    /// The constrained item.
    pub item: LayoutItem,
    /// The constrained attribute.
    pub attribute: Attribute,
    /// Relation between the two sides.
    pub relation: Relation,
    /// The target anchor; `None` for bare dimensional constants.
    pub target: Option<(LayoutItem, Attribute)>,
    /// Additive constant in points.
    pub constant: f64,
    /// Multiplier applied to the target side.
    pub multiplier: f64,
}

// =============================================================================
// Constraint Handle
// =============================================================================

thread_local! {
    /// Counter for generating unique constraint ids.
    static NEXT_CONSTRAINT_ID: Cell<u64> = const { Cell::new(0) };
}

fn next_constraint_id() -> u64 {
    NEXT_CONSTRAINT_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    })
}

struct HandleInner {
    id: u64,
    spec: ConstraintSpec,
    priority: LayoutPriority,
    identifier: RefCell<Option<String>>,
    active: Cell<bool>,
    times_activated: Cell<u32>,
    times_deactivated: Cell<u32>,
}

/// Cheaply clonable reference to a single host constraint.
///
/// Equality and hashing use the handle's id, never the spec: two handles
/// with identical parameters remain distinct instances for diffing.
#[derive(Clone)]
pub struct ConstraintHandle {
    inner: Rc<HandleInner>,
}

impl ConstraintHandle {
    /// Create an inactive handle for a spec, with default (required) priority.
    pub fn new(spec: ConstraintSpec) -> Self {
        Self::with_priority(spec, LayoutPriority::REQUIRED)
    }

    /// Create an inactive handle with an explicit priority.
    pub fn with_priority(spec: ConstraintSpec, priority: LayoutPriority) -> Self {
        Self {
            inner: Rc::new(HandleInner {
                id: next_constraint_id(),
                spec,
                priority,
                identifier: RefCell::new(None),
                active: Cell::new(false),
                times_activated: Cell::new(0),
                times_deactivated: Cell::new(0),
            }),
        }
    }

    /// Stable identity of this handle.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// The spec this handle was built from.
    pub fn spec(&self) -> &ConstraintSpec {
        &self.inner.spec
    }

    /// Priority baked in at build time.
    pub fn priority(&self) -> LayoutPriority {
        self.inner.priority
    }

    /// Debug identifier, if one was set.
    pub fn identifier(&self) -> Option<String> {
        self.inner.identifier.borrow().clone()
    }

    /// Set the debug identifier.
    pub fn set_identifier(&self, identifier: impl Into<String>) {
        *self.inner.identifier.borrow_mut() = Some(identifier.into());
    }

    /// Whether the host constraint is currently active.
    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    /// Activate. No-op if already active.
    pub fn activate(&self) {
        if self.inner.active.get() {
            return;
        }
        self.inner.active.set(true);
        self.inner
            .times_activated
            .set(self.inner.times_activated.get() + 1);
        tracing::trace!(id = self.inner.id, "constraint activated");
    }

    /// Deactivate. No-op if already inactive.
    pub fn deactivate(&self) {
        if !self.inner.active.get() {
            return;
        }
        self.inner.active.set(false);
        self.inner
            .times_deactivated
            .set(self.inner.times_deactivated.get() + 1);
        tracing::trace!(id = self.inner.id, "constraint deactivated");
    }

    /// Number of inactive-to-active transitions so far.
    ///
    /// Diagnostic counter; useful for asserting minimal activation churn.
    pub fn times_activated(&self) -> u32 {
        self.inner.times_activated.get()
    }

    /// Number of active-to-inactive transitions so far.
    pub fn times_deactivated(&self) -> u32 {
        self.inner.times_deactivated.get()
    }
}

impl PartialEq for ConstraintHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for ConstraintHandle {}

impl std::hash::Hash for ConstraintHandle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl std::fmt::Debug for ConstraintHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintHandle")
            .field("id", &self.inner.id)
            .field("identifier", &*self.inner.identifier.borrow())
            .field("active", &self.inner.active.get())
            .field("spec", &self.inner.spec)
            .finish()
    }
}

// =============================================================================
// Bulk Activation
// =============================================================================

/// Activate every handle. Idempotent per handle.
pub fn activate_all<'a>(handles: impl IntoIterator<Item = &'a ConstraintHandle>) {
    for handle in handles {
        handle.activate();
    }
}

/// Deactivate every handle. Idempotent per handle.
pub fn deactivate_all<'a>(handles: impl IntoIterator<Item = &'a ConstraintHandle>) {
    for handle in handles {
        handle.deactivate();
    }
}

// =============================================================================
// Tests
// =============================================================================
