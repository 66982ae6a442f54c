//! Constraint DSL - Fluent builders for constraint literals.
//!
//! Anchors come off a [`LayoutItem`] (`item.top()`, `item.width()`, ...),
//! relate to another anchor or a constant, and finish in a
//! [`ConstraintHandle`]. Built handles are always inactive; activation is
//! owned by the caller or by the dynamic layout engine.
//!
//! # Example
//!
//! ```ignore
//! use trellis_layout::constraint::{pin_edges_to_parent, Edges, LayoutItem};
//! use trellis_layout::types::LayoutPriority;
//!
//! let container = LayoutItem::new("container");
//! let sidebar = LayoutItem::new("sidebar");
//! container.add_child(&sidebar);
//!
//! let width = sidebar
//!     .width()
//!     .equal_to_constant(320.0)
//!     .priority(LayoutPriority::HIGH)
//!     .identifier("sidebar.width")
//!     .build();
//! let edges = pin_edges_to_parent(&sidebar, Edges::VERTICAL | Edges::LEADING, 0.0)?;
//! ```

use crate::constraint::handle::{Attribute, ConstraintHandle, ConstraintSpec};
use crate::constraint::item::LayoutItem;
use crate::error::LayoutError;
use crate::types::{LayoutPriority, Relation, Size};

// =============================================================================
// Edges (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Edge selection for group helpers.
    ///
    /// Combine with bitwise OR: `Edges::TOP | Edges::LEADING`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Edges: u8 {
        const TOP = 1 << 0;
        const LEADING = 1 << 1;
        const BOTTOM = 1 << 2;
        const TRAILING = 1 << 3;
        const HORIZONTAL = Self::LEADING.bits() | Self::TRAILING.bits();
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

// =============================================================================
// Anchor
// =============================================================================

/// One attribute of one item; the starting point of a constraint literal.
#[derive(Debug, Clone)]
pub struct Anchor {
    item: LayoutItem,
    attribute: Attribute,
}

impl LayoutItem {
    /// Top edge anchor.
    pub fn top(&self) -> Anchor {
        self.anchor(Attribute::Top)
    }

    /// Bottom edge anchor.
    pub fn bottom(&self) -> Anchor {
        self.anchor(Attribute::Bottom)
    }

    /// Leading edge anchor.
    pub fn leading(&self) -> Anchor {
        self.anchor(Attribute::Leading)
    }

    /// Trailing edge anchor.
    pub fn trailing(&self) -> Anchor {
        self.anchor(Attribute::Trailing)
    }

    /// Horizontal center anchor.
    pub fn center_x(&self) -> Anchor {
        self.anchor(Attribute::CenterX)
    }

    /// Vertical center anchor.
    pub fn center_y(&self) -> Anchor {
        self.anchor(Attribute::CenterY)
    }

    /// Width anchor.
    pub fn width(&self) -> Anchor {
        self.anchor(Attribute::Width)
    }

    /// Height anchor.
    pub fn height(&self) -> Anchor {
        self.anchor(Attribute::Height)
    }

    fn anchor(&self, attribute: Attribute) -> Anchor {
        Anchor {
            item: self.clone(),
            attribute,
        }
    }
}

impl Anchor {
    /// The item this anchor belongs to.
    pub fn item(&self) -> &LayoutItem {
        &self.item
    }

    /// The attribute this anchor refers to.
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// Relate this anchor to another with equality.
    pub fn equal_to(&self, target: &Anchor) -> AnchorBuilder {
        self.relate(Relation::Equal, Some(target))
    }

    /// Relate this anchor to another with a greater-or-equal relation.
    pub fn at_least(&self, target: &Anchor) -> AnchorBuilder {
        self.relate(Relation::AtLeast, Some(target))
    }

    /// Relate this anchor to another with a less-or-equal relation.
    pub fn at_most(&self, target: &Anchor) -> AnchorBuilder {
        self.relate(Relation::AtMost, Some(target))
    }

    /// Constrain a dimensional anchor to a bare constant.
    pub fn equal_to_constant(&self, constant: f64) -> AnchorBuilder {
        debug_assert!(
            self.attribute.is_dimension(),
            "bare constants only apply to width/height anchors"
        );
        self.relate(Relation::Equal, None).constant(constant)
    }

    fn relate(&self, relation: Relation, target: Option<&Anchor>) -> AnchorBuilder {
        AnchorBuilder {
            item: self.item.clone(),
            attribute: self.attribute,
            relation,
            target: target.map(|anchor| (anchor.item.clone(), anchor.attribute)),
            constant: 0.0,
            multiplier: 1.0,
            priority: LayoutPriority::REQUIRED,
            identifier: None,
        }
    }
}

// =============================================================================
// Anchor Builder
// =============================================================================

/// Fluent builder produced by relating two anchors.
///
/// Finish with [`AnchorBuilder::build`] to obtain an inactive
/// [`ConstraintHandle`].
#[derive(Debug)]
pub struct AnchorBuilder {
    item: LayoutItem,
    attribute: Attribute,
    relation: Relation,
    target: Option<(LayoutItem, Attribute)>,
    constant: f64,
    multiplier: f64,
    priority: LayoutPriority,
    identifier: Option<String>,
}

impl AnchorBuilder {
    /// Set the additive constant (offset) in points.
    pub fn constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    /// Set the multiplier applied to the target side.
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the priority baked into the handle.
    pub fn priority(mut self, priority: impl Into<LayoutPriority>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Set a debug identifier on the resulting handle.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Build the inactive constraint handle.
    pub fn build(self) -> ConstraintHandle {
        let handle = ConstraintHandle::with_priority(
            ConstraintSpec {
                item: self.item,
                attribute: self.attribute,
                relation: self.relation,
                target: self.target,
                constant: self.constant,
                multiplier: self.multiplier,
            },
            self.priority,
        );
        if let Some(identifier) = self.identifier {
            handle.set_identifier(identifier);
        }
        handle
    }
}

// =============================================================================
// Group Helpers
// =============================================================================

/// Pin the selected edges of `item` to the same edges of `target`.
///
/// `inset` moves top/leading inward by `+inset` and bottom/trailing inward
/// by `-inset`, matching host-toolkit inset conventions.
pub fn pin_edges(
    item: &LayoutItem,
    target: &LayoutItem,
    edges: Edges,
    inset: f64,
) -> Vec<ConstraintHandle> {
    let mut handles = Vec::new();
    if edges.contains(Edges::TOP) {
        handles.push(item.top().equal_to(&target.top()).constant(inset).build());
    }
    if edges.contains(Edges::LEADING) {
        handles.push(
            item.leading()
                .equal_to(&target.leading())
                .constant(inset)
                .build(),
        );
    }
    if edges.contains(Edges::BOTTOM) {
        handles.push(
            item.bottom()
                .equal_to(&target.bottom())
                .constant(-inset)
                .build(),
        );
    }
    if edges.contains(Edges::TRAILING) {
        handles.push(
            item.trailing()
                .equal_to(&target.trailing())
                .constant(-inset)
                .build(),
        );
    }
    handles
}

/// Pin the selected edges of `item` to its logical parent.
///
/// Errors with [`LayoutError::MissingParent`] if the item is not attached.
pub fn pin_edges_to_parent(
    item: &LayoutItem,
    edges: Edges,
    inset: f64,
) -> Result<Vec<ConstraintHandle>, LayoutError> {
    let parent = resolve_parent(item)?;
    Ok(pin_edges(item, &parent, edges, inset))
}

/// Center `item` on both axes of `target`.
pub fn center_in(item: &LayoutItem, target: &LayoutItem) -> Vec<ConstraintHandle> {
    vec![
        item.center_x().equal_to(&target.center_x()).build(),
        item.center_y().equal_to(&target.center_y()).build(),
    ]
}

/// Center `item` on both axes of its logical parent.
pub fn center_in_parent(item: &LayoutItem) -> Result<Vec<ConstraintHandle>, LayoutError> {
    let parent = resolve_parent(item)?;
    Ok(center_in(item, &parent))
}

/// Fix the width and height of `item` to a constant size.
pub fn fixed_size(item: &LayoutItem, size: Size) -> Vec<ConstraintHandle> {
    vec![
        item.width().equal_to_constant(size.width).build(),
        item.height().equal_to_constant(size.height).build(),
    ]
}

fn resolve_parent(item: &LayoutItem) -> Result<LayoutItem, LayoutError> {
    item.parent().ok_or_else(|| LayoutError::MissingParent {
        item: item.name().to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
