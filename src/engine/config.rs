//! Configuration builder - One-time mutation surface for the context tree.
//!
//! The builder carries an explicit reference to the node it is currently
//! registering against; `when` swaps that reference for the duration of a
//! branch block and restores it afterwards. There is no ambient "current
//! node" state, so nested builders are plain reentrant function calls.
//!
//! Blocks return `Result` so a misuse error (registering an already-active
//! constraint) aborts configuration at the point of the mistake via `?`.
//!
//! # Example
//!
//! ```ignore
//! engine.configure(|root| {
//!     root.add_constraints(base_constraints)?;
//!     root.when_or_else(
//!         Predicate::horizontally_regular(),
//!         |regular| regular.add_constraints([wide_layout.clone()]),
//!         |compact| compact.add_constraints([stacked_layout.clone()]),
//!     )?;
//!     Ok(())
//! })?;
//! ```

use std::rc::Rc;

use crate::constraint::ConstraintHandle;
use crate::engine::context::ContextNode;
use crate::error::LayoutError;
use crate::predicate::Predicate;

/// Builder handed to configuration blocks; registers constraints, actions,
/// and conditional branches against one context node.
pub struct LayoutConfiguration<'node, E> {
    node: &'node mut ContextNode<E>,
}

impl<'node, E: 'static> LayoutConfiguration<'node, E> {
    pub(crate) fn new(node: &'node mut ContextNode<E>) -> Self {
        Self { node }
    }

    /// Register a single constraint on the current node.
    ///
    /// The handle must be inactive: activation of registered constraints is
    /// owned by the engine, and a handle that is already active would
    /// corrupt the diff bookkeeping.
    pub fn add_constraint(&mut self, handle: ConstraintHandle) -> Result<(), LayoutError> {
        if handle.is_active() {
            return Err(LayoutError::AlreadyActive {
                id: handle.id(),
                identifier: handle.identifier(),
            });
        }
        self.node.constraints.push(handle);
        Ok(())
    }

    /// Register a batch of constraints on the current node, in order.
    ///
    /// Fails fast on the first already-active handle.
    pub fn add_constraints(
        &mut self,
        handles: impl IntoIterator<Item = ConstraintHandle>,
    ) -> Result<(), LayoutError> {
        for handle in handles {
            self.add_constraint(handle)?;
        }
        Ok(())
    }

    /// Register a side-effect action on the current node.
    ///
    /// Actions run after constraint activation on every update for which
    /// the node is active, in pre-order registration order.
    pub fn add_action(&mut self, action: impl Fn(&E) + 'static) {
        self.node.actions.push(Rc::new(action));
    }

    /// Open a conditional branch gated by `predicate`.
    ///
    /// Registrations inside `block` land on the new branch node; afterwards
    /// the builder reverts to the surrounding node.
    pub fn when(
        &mut self,
        predicate: Predicate<E>,
        block: impl FnOnce(&mut LayoutConfiguration<'_, E>) -> Result<(), LayoutError>,
    ) -> Result<(), LayoutError> {
        self.attach_branch(predicate, block, None::<BranchFn<E>>)
    }

    /// Open a conditional branch with a negation branch.
    ///
    /// The otherwise node is gated by the logical negation of `predicate`
    /// and is only attached if `otherwise_block` (or anything nested in it)
    /// actually registered constraints or actions; an empty branch could
    /// never contribute to the active set.
    pub fn when_or_else(
        &mut self,
        predicate: Predicate<E>,
        block: impl FnOnce(&mut LayoutConfiguration<'_, E>) -> Result<(), LayoutError>,
        otherwise_block: impl FnOnce(&mut LayoutConfiguration<'_, E>) -> Result<(), LayoutError>,
    ) -> Result<(), LayoutError> {
        self.attach_branch(predicate, block, Some(otherwise_block))
    }

    fn attach_branch(
        &mut self,
        predicate: Predicate<E>,
        block: impl FnOnce(&mut LayoutConfiguration<'_, E>) -> Result<(), LayoutError>,
        otherwise_block: Option<impl FnOnce(&mut LayoutConfiguration<'_, E>) -> Result<(), LayoutError>>,
    ) -> Result<(), LayoutError> {
        let mut branch = ContextNode::new(predicate.clone());
        block(&mut LayoutConfiguration::new(&mut branch))?;

        if let Some(otherwise_block) = otherwise_block {
            let mut otherwise = ContextNode::new(predicate.not());
            otherwise_block(&mut LayoutConfiguration::new(&mut otherwise))?;
            if !otherwise.is_empty() {
                branch.otherwise = Some(Box::new(otherwise));
            }
        }

        self.node.children.push(branch);
        Ok(())
    }
}

/// Plain-fn block type used to spell `None` where no otherwise branch is
/// provided.
type BranchFn<E> = fn(&mut LayoutConfiguration<'_, E>) -> Result<(), LayoutError>;

impl<E: Clone + PartialEq + 'static> LayoutConfiguration<'_, E> {
    /// Equality convenience: branch active when the environment equals
    /// `value`.
    pub fn when_value(
        &mut self,
        value: E,
        block: impl FnOnce(&mut LayoutConfiguration<'_, E>) -> Result<(), LayoutError>,
    ) -> Result<(), LayoutError> {
        self.when(Predicate::equals(value), block)
    }

    /// Equality convenience with a negation branch.
    pub fn when_value_or_else(
        &mut self,
        value: E,
        block: impl FnOnce(&mut LayoutConfiguration<'_, E>) -> Result<(), LayoutError>,
        otherwise_block: impl FnOnce(&mut LayoutConfiguration<'_, E>) -> Result<(), LayoutError>,
    ) -> Result<(), LayoutError> {
        self.when_or_else(Predicate::equals(value), block, otherwise_block)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Attribute, ConstraintSpec, LayoutItem};
    use crate::types::Relation;

    fn handle() -> ConstraintHandle {
        ConstraintHandle::new(ConstraintSpec {
            item: LayoutItem::new("view"),
            attribute: Attribute::Top,
            relation: Relation::Equal,
            target: None,
            constant: 0.0,
            multiplier: 1.0,
        })
    }

    fn root() -> ContextNode<bool> {
        ContextNode::new(Predicate::always())
    }

    #[test]
    fn test_add_constraints_rejects_active_handle() {
        let mut node = root();
        let mut config = LayoutConfiguration::new(&mut node);

        let active = handle();
        active.set_identifier("preactivated");
        active.activate();

        let err = config
            .add_constraints([handle(), active.clone(), handle()])
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::AlreadyActive {
                id: active.id(),
                identifier: Some("preactivated".to_string()),
            }
        );
    }

    #[test]
    fn test_when_registers_against_branch_node() {
        let mut node = root();
        let mut config = LayoutConfiguration::new(&mut node);

        let outer = handle();
        let inner = handle();
        config.add_constraint(outer.clone()).unwrap();
        config
            .when(Predicate::new(|env: &bool| *env), |branch| {
                branch.add_constraint(inner.clone())
            })
            .unwrap();

        assert_eq!(node.constraints, vec![outer]);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].constraints, vec![inner]);
        assert!(node.children[0].otherwise.is_none());
    }

    #[test]
    fn test_empty_otherwise_is_not_attached() {
        let mut node = root();
        let mut config = LayoutConfiguration::new(&mut node);

        config
            .when_or_else(
                Predicate::new(|env: &bool| *env),
                |branch| branch.add_constraint(handle()),
                |_otherwise| Ok(()),
            )
            .unwrap();

        assert!(node.children[0].otherwise.is_none());
    }

    #[test]
    fn test_otherwise_with_nested_registration_is_attached() {
        let mut node = root();
        let mut config = LayoutConfiguration::new(&mut node);

        config
            .when_or_else(
                Predicate::new(|env: &bool| *env),
                |branch| branch.add_constraint(handle()),
                |otherwise| {
                    // Nothing directly on the otherwise node, but a nested
                    // branch registers an action.
                    otherwise.when(Predicate::always(), |nested| {
                        nested.add_action(|_| {});
                        Ok(())
                    })
                },
            )
            .unwrap();

        assert!(node.children[0].otherwise.is_some());
    }

    #[test]
    fn test_error_inside_block_propagates() {
        let mut node = root();
        let mut config = LayoutConfiguration::new(&mut node);

        let active = handle();
        active.activate();

        let result = config.when(Predicate::always(), |branch| {
            branch.add_constraint(active.clone())
        });
        assert!(matches!(result, Err(LayoutError::AlreadyActive { .. })));
        assert!(
            node.children.is_empty(),
            "failed branch must not be attached"
        );
    }

    #[test]
    fn test_when_value_builds_equality_predicate() {
        let mut node = ContextNode::<u8>::new(Predicate::always());
        let mut config = LayoutConfiguration::new(&mut node);

        config
            .when_value(3, |branch| {
                branch.add_action(|_| {});
                Ok(())
            })
            .unwrap();

        assert!(node.children[0].predicate.evaluate(&3));
        assert!(!node.children[0].predicate.evaluate(&4));
    }
}
