//! Core types for trellis-layout.
//!
//! These types define the foundation that everything builds on.
//! They flow through the predicate layer, the constraint DSL, and the
//! dynamic layout engine.

// =============================================================================
// Size Class
// =============================================================================

/// Coarse size classification of an environment axis.
///
/// Mirrors the host toolkit's trait classification: a dimension is either
/// compact (phone-width), regular (tablet-width), or unspecified when the
/// host has not resolved it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SizeClass {
    #[default]
    Unspecified = 0,
    Compact = 1,
    Regular = 2,
}

impl SizeClass {
    /// Check whether this class has been resolved to a concrete value.
    #[inline]
    pub const fn is_specified(&self) -> bool {
        !matches!(self, Self::Unspecified)
    }
}

// =============================================================================
// Size
// =============================================================================

/// A width/height pair in host points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self::new(0.0, 0.0);
}

// =============================================================================
// Relation
// =============================================================================

/// How a constraint relates its two anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Relation {
    #[default]
    Equal = 0,
    AtLeast = 1,
    AtMost = 2,
}

// =============================================================================
// Layout Priority
// =============================================================================

/// Constraint priority, matching host-toolkit conventions (0..=1000).
///
/// Priority is baked into the handle at build time; the engine never
/// inspects it, the host solver does.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LayoutPriority(pub f32);

impl LayoutPriority {
    /// The constraint must be satisfied.
    pub const REQUIRED: Self = Self(1000.0);
    /// High-priority optional constraint.
    pub const HIGH: Self = Self(750.0);
    /// Low-priority optional constraint.
    pub const LOW: Self = Self(250.0);

    /// Raw priority value.
    #[inline]
    pub const fn value(&self) -> f32 {
        self.0
    }
}

impl Default for LayoutPriority {
    fn default() -> Self {
        Self::REQUIRED
    }
}

impl From<f32> for LayoutPriority {
    fn from(value: f32) -> Self {
        Self(value)
    }
}

// =============================================================================
// Layout Environment
// =============================================================================

/// Ready-made environment value: a snapshot of size-class state plus the
/// container size.
///
/// The engine itself is generic over the environment type; this type is a
/// convenience for hosts whose condition space is the usual size-class and
/// size pair. Custom environments only need to implement the capability
/// traits in [`crate::predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutEnvironment {
    /// Horizontal size class.
    pub horizontal: SizeClass,
    /// Vertical size class.
    pub vertical: SizeClass,
    /// Current container size in points.
    pub size: Size,
}

impl LayoutEnvironment {
    /// Create an environment snapshot.
    pub const fn new(horizontal: SizeClass, vertical: SizeClass, size: Size) -> Self {
        Self {
            horizontal,
            vertical,
            size,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
