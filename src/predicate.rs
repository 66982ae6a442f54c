//! Predicate - Composable boolean conditions over an environment.
//!
//! A [`Predicate`] wraps a pure function `&E -> bool` and composes with
//! `and` / `or` / `not`. The engine may evaluate a predicate zero, one, or
//! many times per update, so evaluation must be side-effect free. Both
//! operands of `and` / `or` are always evaluated; there is no short-circuit
//! to rely on.
//!
//! # Example
//!
//! ```ignore
//! use trellis_layout::predicate::Predicate;
//! use trellis_layout::types::LayoutEnvironment;
//!
//! let wide = Predicate::<LayoutEnvironment>::width_at_least(1024.0);
//! let regular = Predicate::horizontally_regular();
//! let split_view = regular.and(&wide);
//! ```

use std::rc::Rc;

use crate::types::{Size, SizeClass};

// =============================================================================
// Capability Traits
// =============================================================================

/// Environments that carry a size-class classification.
///
/// Size-class convenience predicates are only available when the environment
/// type opts into this capability.
pub trait HasSizeClasses {
    /// Horizontal size class of the environment.
    fn horizontal_size_class(&self) -> SizeClass;
    /// Vertical size class of the environment.
    fn vertical_size_class(&self) -> SizeClass;
}

/// Environments that carry a concrete container size.
pub trait HasSize {
    /// Current container size.
    fn size(&self) -> Size;
}

impl HasSizeClasses for crate::types::LayoutEnvironment {
    fn horizontal_size_class(&self) -> SizeClass {
        self.horizontal
    }

    fn vertical_size_class(&self) -> SizeClass {
        self.vertical
    }
}

impl HasSize for crate::types::LayoutEnvironment {
    fn size(&self) -> Size {
        self.size
    }
}

// =============================================================================
// Predicate
// =============================================================================

/// A pure boolean condition over an environment value.
///
/// Cloning is cheap (shared `Rc`). Combinators never mutate their operands.
pub struct Predicate<E> {
    eval: Rc<dyn Fn(&E) -> bool>,
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<E> std::fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Predicate")
    }
}

impl<E: 'static> Predicate<E> {
    /// Wrap a boolean function of the environment.
    pub fn new(eval: impl Fn(&E) -> bool + 'static) -> Self {
        Self {
            eval: Rc::new(eval),
        }
    }

    /// The identity predicate: true for every environment.
    ///
    /// Used as the root node's predicate.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Evaluate against an environment.
    pub fn evaluate(&self, environment: &E) -> bool {
        (self.eval)(environment)
    }

    /// Conjunction. Both operands are evaluated unconditionally.
    pub fn and(&self, other: &Self) -> Self {
        let lhs = Rc::clone(&self.eval);
        let rhs = Rc::clone(&other.eval);
        Self::new(move |env| {
            let a = lhs(env);
            let b = rhs(env);
            a && b
        })
    }

    /// Disjunction. Both operands are evaluated unconditionally.
    pub fn or(&self, other: &Self) -> Self {
        let lhs = Rc::clone(&self.eval);
        let rhs = Rc::clone(&other.eval);
        Self::new(move |env| {
            let a = lhs(env);
            let b = rhs(env);
            a || b
        })
    }

    /// Negation.
    pub fn not(&self) -> Self {
        let inner = Rc::clone(&self.eval);
        Self::new(move |env| !inner(env))
    }
}

impl<E: PartialEq + 'static> Predicate<E> {
    /// Equality against a fixed environment value.
    ///
    /// Backs the `when(value, ...)` convenience on the configuration builder.
    pub fn equals(value: E) -> Self {
        Self::new(move |env| *env == value)
    }
}

// =============================================================================
// Size-Class Convenience Predicates
// =============================================================================

impl<E: HasSizeClasses + 'static> Predicate<E> {
    /// Horizontal size class is regular.
    pub fn horizontally_regular() -> Self {
        Self::new(|env| env.horizontal_size_class() == SizeClass::Regular)
    }

    /// Horizontal size class is compact.
    pub fn horizontally_compact() -> Self {
        Self::new(|env| env.horizontal_size_class() == SizeClass::Compact)
    }

    /// Vertical size class is regular.
    pub fn vertically_regular() -> Self {
        Self::new(|env| env.vertical_size_class() == SizeClass::Regular)
    }

    /// Vertical size class is compact.
    pub fn vertically_compact() -> Self {
        Self::new(|env| env.vertical_size_class() == SizeClass::Compact)
    }
}

// =============================================================================
// Size Convenience Predicates
// =============================================================================

impl<E: HasSize + 'static> Predicate<E> {
    /// Width is at least `min` points.
    pub fn width_at_least(min: f64) -> Self {
        Self::new(move |env| env.size().width >= min)
    }

    /// Width is strictly less than `max` points.
    pub fn width_less_than(max: f64) -> Self {
        Self::new(move |env| env.size().width < max)
    }

    /// Height is at least `min` points.
    pub fn height_at_least(min: f64) -> Self {
        Self::new(move |env| env.size().height >= min)
    }

    /// Height is strictly less than `max` points.
    pub fn height_less_than(max: f64) -> Self {
        Self::new(move |env| env.size().height < max)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LayoutEnvironment;
    use std::cell::Cell;

    fn env(horizontal: SizeClass, width: f64) -> LayoutEnvironment {
        LayoutEnvironment::new(horizontal, SizeClass::Regular, Size::new(width, 768.0))
    }

    #[test]
    fn test_always_is_true_for_any_environment() {
        let always = Predicate::<LayoutEnvironment>::always();
        assert!(always.evaluate(&env(SizeClass::Compact, 0.0)));
        assert!(always.evaluate(&env(SizeClass::Regular, 9999.0)));
    }

    #[test]
    fn test_combinators() {
        let regular = Predicate::<LayoutEnvironment>::horizontally_regular();
        let wide = Predicate::<LayoutEnvironment>::width_at_least(1024.0);

        let both = regular.and(&wide);
        assert!(both.evaluate(&env(SizeClass::Regular, 1024.0)));
        assert!(!both.evaluate(&env(SizeClass::Regular, 1023.0)));
        assert!(!both.evaluate(&env(SizeClass::Compact, 1024.0)));

        let either = regular.or(&wide);
        assert!(either.evaluate(&env(SizeClass::Compact, 1024.0)));
        assert!(either.evaluate(&env(SizeClass::Regular, 320.0)));
        assert!(!either.evaluate(&env(SizeClass::Compact, 320.0)));

        let narrow = wide.not();
        assert!(narrow.evaluate(&env(SizeClass::Regular, 320.0)));
        assert!(!narrow.evaluate(&env(SizeClass::Regular, 1024.0)));
    }

    #[test]
    fn test_and_evaluates_both_operands() {
        // No short-circuit: the right operand runs even when the left is false.
        let rhs_calls = std::rc::Rc::new(Cell::new(0u32));
        let rhs_calls_inner = rhs_calls.clone();

        let falsy = Predicate::<LayoutEnvironment>::new(|_| false);
        let counting = Predicate::<LayoutEnvironment>::new(move |_| {
            rhs_calls_inner.set(rhs_calls_inner.get() + 1);
            true
        });

        assert!(!falsy.and(&counting).evaluate(&env(SizeClass::Regular, 100.0)));
        assert_eq!(rhs_calls.get(), 1, "AND must evaluate both operands");
    }

    #[test]
    fn test_or_evaluates_both_operands() {
        let rhs_calls = std::rc::Rc::new(Cell::new(0u32));
        let rhs_calls_inner = rhs_calls.clone();

        let truthy = Predicate::<LayoutEnvironment>::new(|_| true);
        let counting = Predicate::<LayoutEnvironment>::new(move |_| {
            rhs_calls_inner.set(rhs_calls_inner.get() + 1);
            false
        });

        assert!(truthy.or(&counting).evaluate(&env(SizeClass::Regular, 100.0)));
        assert_eq!(rhs_calls.get(), 1, "OR must evaluate both operands");
    }

    #[test]
    fn test_equals_predicate() {
        let is_portrait = Predicate::equals("portrait");
        assert!(is_portrait.evaluate(&"portrait"));
        assert!(!is_portrait.evaluate(&"landscape"));
    }

    #[test]
    fn test_size_class_predicates() {
        let compact = Predicate::<LayoutEnvironment>::horizontally_compact();
        assert!(compact.evaluate(&env(SizeClass::Compact, 320.0)));
        assert!(!compact.evaluate(&env(SizeClass::Regular, 320.0)));
        assert!(!compact.evaluate(&env(SizeClass::Unspecified, 320.0)));
    }

    #[test]
    fn test_width_threshold_boundary() {
        let wide = Predicate::<LayoutEnvironment>::width_at_least(1024.0);
        assert!(wide.evaluate(&env(SizeClass::Regular, 1024.0)));
        assert!(!wide.evaluate(&env(SizeClass::Regular, 1023.0)));

        let narrow = Predicate::<LayoutEnvironment>::width_less_than(1024.0);
        assert!(narrow.evaluate(&env(SizeClass::Regular, 1023.0)));
        assert!(!narrow.evaluate(&env(SizeClass::Regular, 1024.0)));
    }
}
