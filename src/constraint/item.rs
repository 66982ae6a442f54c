//! Layout Item - Stand-in for a host view or layout guide.
//!
//! The constraint DSL needs two things from the host's "constrainable item"
//! capability: stable identity and logical-parent resolution. `LayoutItem`
//! models exactly that. Hosts map each real view/guide to one `LayoutItem`
//! and keep the parent links in sync with the view hierarchy.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

// =============================================================================
// Item Identity
// =============================================================================

thread_local! {
    /// Counter for generating unique item ids.
    static NEXT_ITEM_ID: RefCell<u64> = const { RefCell::new(0) };
}

fn next_item_id() -> u64 {
    NEXT_ITEM_ID.with(|next| {
        let mut next = next.borrow_mut();
        let id = *next;
        *next += 1;
        id
    })
}

// =============================================================================
// Layout Item
// =============================================================================

struct ItemInner {
    id: u64,
    name: String,
    parent: RefCell<Weak<ItemInner>>,
}

/// A constrainable item: a host view or guide with identity and an optional
/// logical parent.
///
/// Cloning is cheap (shared `Rc`); clones refer to the same item. Equality
/// is identity-based, never structural.
#[derive(Clone)]
pub struct LayoutItem {
    inner: Rc<ItemInner>,
}

impl LayoutItem {
    /// Create a root item with a debug name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ItemInner {
                id: next_item_id(),
                name: name.into(),
                parent: RefCell::new(Weak::new()),
            }),
        }
    }

    /// Stable identity of this item.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Debug name given at creation.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Attach `child` to this item.
    ///
    /// The child keeps a weak link back; items do not own their children.
    pub fn add_child(&self, child: &LayoutItem) {
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
    }

    /// Resolve the logical parent, if the item is attached to one.
    pub fn parent(&self) -> Option<LayoutItem> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| LayoutItem { inner })
    }
}

impl PartialEq for LayoutItem {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for LayoutItem {}

impl std::hash::Hash for LayoutItem {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl std::fmt::Debug for LayoutItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutItem")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
