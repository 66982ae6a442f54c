//! Dynamic layout engine - Environment-driven constraint activation.
//!
//! The engine owns a tree of predicate-gated constraint/action groups.
//! `configure` populates the tree exactly once; every `update` walks it
//! from scratch against the new environment, diffs the resulting constraint
//! set against the previously active one, and touches only the difference:
//!
//! 1. Collect active nodes (depth-first pre-order, otherwise branches for
//!    false predicates)
//! 2. Gather the new constraint set and the action list
//! 3. Deactivate `active - new`, activate `new - active`
//! 4. Store the new set, then run the actions in collection order
//!
//! Updates never mutate the tree and are not incremental across calls;
//! predicates may depend on arbitrary environment state, so each call
//! recomputes from scratch.
//!
//! # Example
//!
//! ```ignore
//! use trellis_layout::engine::DynamicLayoutEngine;
//! use trellis_layout::predicate::Predicate;
//!
//! let mut engine = DynamicLayoutEngine::new();
//! engine.configure(|root| {
//!     root.when_or_else(
//!         Predicate::horizontally_regular(),
//!         |regular| regular.add_constraints(side_by_side.clone()),
//!         |compact| compact.add_constraints(stacked.clone()),
//!     )
//! })?;
//!
//! engine.update(&environment);
//! ```

pub mod config;
mod context;

use std::collections::HashSet;

use crate::constraint::{self, ConstraintHandle};
use crate::error::LayoutError;
use crate::predicate::Predicate;
use config::LayoutConfiguration;
use context::{Action, ContextNode};

/// The dynamic layout engine.
///
/// Single-threaded by design: the engine owns its tree and active set
/// exclusively and expects `configure`/`update` to be called from the
/// thread that owns the host UI graph.
pub struct DynamicLayoutEngine<E> {
    root: ContextNode<E>,
    active: HashSet<ConstraintHandle>,
    configured: bool,
}

impl<E: 'static> DynamicLayoutEngine<E> {
    /// Create an empty, unconfigured engine.
    pub fn new() -> Self {
        Self {
            root: ContextNode::new(Predicate::always()),
            active: HashSet::new(),
            configured: false,
        }
    }

    /// Populate the context tree. Callable exactly once.
    ///
    /// A second call returns [`LayoutError::AlreadyConfigured`] without
    /// touching the existing tree. Errors raised inside `build` abort
    /// configuration at the point of misuse; treat them as fatal to setup.
    pub fn configure(
        &mut self,
        build: impl FnOnce(&mut LayoutConfiguration<'_, E>) -> Result<(), LayoutError>,
    ) -> Result<(), LayoutError> {
        if self.configured {
            return Err(LayoutError::AlreadyConfigured);
        }
        self.configured = true;
        build(&mut LayoutConfiguration::new(&mut self.root))
    }

    /// Whether `configure` has run.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Re-evaluate the tree against `environment` and reconcile activation
    /// state.
    ///
    /// Guarantees at most one activation lifecycle transition per constraint
    /// per call: constraints active both before and after are untouched.
    /// Safe to call before `configure`; the active set is simply empty.
    pub fn update(&mut self, environment: &E) {
        let mut active_nodes = Vec::new();
        self.root.collect_active(environment, &mut active_nodes);

        // Gather the new constraint set (deduplicated) and the action list
        // (order-preserving) in one pre-order pass.
        let mut new_set = HashSet::with_capacity(self.active.len());
        let mut actions: Vec<Action<E>> = Vec::new();
        for node in &active_nodes {
            for handle in &node.constraints {
                new_set.insert(handle.clone());
            }
            actions.extend(node.actions.iter().cloned());
        }

        let to_deactivate: Vec<ConstraintHandle> =
            self.active.difference(&new_set).cloned().collect();
        let to_activate: Vec<ConstraintHandle> =
            new_set.difference(&self.active).cloned().collect();

        constraint::deactivate_all(&to_deactivate);
        constraint::activate_all(&to_activate);

        tracing::debug!(
            active = new_set.len(),
            activated = to_activate.len(),
            deactivated = to_deactivate.len(),
            actions = actions.len(),
            "dynamic layout updated"
        );

        self.active = new_set;

        for action in actions {
            action(environment);
        }
    }

    /// The constraints activated by the most recent update.
    ///
    /// Read-only introspection; ordering is unspecified (it is a set).
    pub fn active_constraints(&self) -> Vec<ConstraintHandle> {
        self.active.iter().cloned().collect()
    }

    /// Whether a specific handle is in the active set.
    pub fn is_constraint_active(&self, handle: &ConstraintHandle) -> bool {
        self.active.contains(handle)
    }
}

impl<E: 'static> Default for DynamicLayoutEngine<E> {
    fn default() -> Self {
        Self::new()
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
    use std::cell::RefCell;
    use std::rc::Rc;

    fn handle(identifier: &str) -> ConstraintHandle {
        let built = ConstraintHandle::new(ConstraintSpec {
            item: LayoutItem::new("view"),
            attribute: Attribute::Top,
            relation: Relation::Equal,
            target: None,
            constant: 0.0,
            multiplier: 1.0,
        });
        built.set_identifier(identifier);
        built
    }

    fn active_identifiers(engine: &DynamicLayoutEngine<bool>) -> Vec<String> {
        let mut names: Vec<String> = engine
            .active_constraints()
            .iter()
            .filter_map(ConstraintHandle::identifier)
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_update_before_configure_is_empty() {
        let mut engine = DynamicLayoutEngine::<bool>::new();
        engine.update(&true);
        assert!(engine.active_constraints().is_empty());
        assert!(!engine.is_configured());
    }

    #[test]
    fn test_configure_twice_errors_and_preserves_tree() {
        let mut engine = DynamicLayoutEngine::<bool>::new();
        let base = handle("base");

        engine
            .configure(|root| root.add_constraint(base.clone()))
            .unwrap();
        assert_eq!(
            engine.configure(|root| {
                root.add_constraint(handle("intruder"))
            }),
            Err(LayoutError::AlreadyConfigured)
        );

        engine.update(&true);
        assert_eq!(active_identifiers(&engine), vec!["base".to_string()]);
    }

    #[test]
    fn test_branch_switching_and_minimal_churn() {
        let mut engine = DynamicLayoutEngine::<bool>::new();
        let base = handle("base");
        let on_true = handle("true");
        let on_false = handle("false");

        engine
            .configure(|root| {
                root.add_constraint(base.clone())?;
                root.when_or_else(
                    Predicate::new(|env: &bool| *env),
                    |branch| branch.add_constraint(on_true.clone()),
                    |otherwise| otherwise.add_constraint(on_false.clone()),
                )
            })
            .unwrap();

        engine.update(&true);
        assert_eq!(active_identifiers(&engine), vec!["base".to_string(), "true".to_string()]);
        assert!(base.is_active() && on_true.is_active() && !on_false.is_active());

        engine.update(&false);
        assert_eq!(active_identifiers(&engine), vec!["base".to_string(), "false".to_string()]);
        assert!(!on_true.is_active() && on_false.is_active());

        // base survived both updates with a single activation.
        assert_eq!(base.times_activated(), 1);
        assert_eq!(base.times_deactivated(), 0);
    }

    #[test]
    fn test_idempotent_update() {
        let mut engine = DynamicLayoutEngine::<bool>::new();
        let only = handle("only");

        engine
            .configure(|root| {
                root.when(Predicate::new(|env: &bool| *env), |branch| {
                    branch.add_constraint(only.clone())
                })
            })
            .unwrap();

        engine.update(&true);
        engine.update(&true);

        assert_eq!(only.times_activated(), 1, "second identical update is a no-op");
        assert_eq!(only.times_deactivated(), 0);
    }

    #[test]
    fn test_duplicate_registration_activates_once() {
        // The same handle registered on two branches that are both active
        // still gets exactly one lifecycle transition (set semantics).
        let mut engine = DynamicLayoutEngine::<bool>::new();
        let shared = handle("shared");

        engine
            .configure(|root| {
                root.when(Predicate::always(), |branch| {
                    branch.add_constraint(shared.clone())
                })?;
                root.when(Predicate::always(), |branch| {
                    branch.add_constraint(shared.clone())
                })
            })
            .unwrap();

        engine.update(&true);
        assert_eq!(shared.times_activated(), 1);
        assert_eq!(engine.active_constraints().len(), 1);
    }

    #[test]
    fn test_actions_run_in_preorder_after_activation() {
        let mut engine = DynamicLayoutEngine::<bool>::new();
        let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let gated = handle("gated");

        engine
            .configure(|root| {
                let log = order.clone();
                root.add_action(move |_| log.borrow_mut().push("root"));

                let gated_probe = gated.clone();
                let log = order.clone();
                root.when(Predicate::always(), move |branch| {
                    branch.add_constraint(gated_probe.clone())?;
                    let inner_log = log.clone();
                    let probe = gated_probe.clone();
                    branch.add_action(move |_| {
                        // Activation happens before actions run.
                        assert!(probe.is_active());
                        inner_log.borrow_mut().push("first-branch");
                    });
                    let nested_log = log.clone();
                    branch.when(Predicate::always(), move |nested| {
                        nested.add_action(move |_| nested_log.borrow_mut().push("nested"));
                        Ok(())
                    })
                })?;

                let log = order.clone();
                root.when(Predicate::always(), move |branch| {
                    branch.add_action(move |_| log.borrow_mut().push("second-branch"));
                    Ok(())
                })
            })
            .unwrap();

        engine.update(&true);
        assert_eq!(
            *order.borrow(),
            vec!["root", "first-branch", "nested", "second-branch"]
        );
    }

    #[test]
    fn test_actions_receive_environment() {
        let mut engine = DynamicLayoutEngine::<u32>::new();
        let seen: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));

        engine
            .configure(|root| {
                let log = seen.clone();
                root.add_action(move |env| log.borrow_mut().push(*env));
                Ok(())
            })
            .unwrap();

        engine.update(&7);
        engine.update(&11);
        assert_eq!(*seen.borrow(), vec![7, 11]);
    }

    #[test]
    fn test_failed_configuration_consumes_the_slot() {
        let mut engine = DynamicLayoutEngine::<bool>::new();
        let active = handle("active");
        active.activate();

        assert!(matches!(
            engine.configure(|root| root.add_constraint(active.clone())),
            Err(LayoutError::AlreadyActive { .. })
        ));
        assert!(engine.is_configured());
        assert_eq!(
            engine.configure(|_| Ok(())),
            Err(LayoutError::AlreadyConfigured)
        );
    }
}
