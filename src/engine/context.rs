//! Context tree - Predicate-gated groups of constraints and actions.
//!
//! Each node pairs a predicate with the constraints/actions registered
//! directly on it, an ordered list of child nodes, and an optional
//! `otherwise` sibling holding the negation branch. Traversal is
//! depth-first pre-order: a node contributes its own registrations, then
//! its children's, in registration order. When a node's predicate is false
//! its `otherwise` node (with its own nested structure) contributes
//! instead.
//!
//! The tree is only mutated through the configuration builder; after
//! `configure` returns it is effectively frozen.

use std::rc::Rc;

use crate::constraint::ConstraintHandle;
use crate::predicate::Predicate;

/// Side-effect action registered on a node, invoked with the environment
/// whenever the node is active after an update.
pub(crate) type Action<E> = Rc<dyn Fn(&E)>;

/// One node of the context tree.
pub(crate) struct ContextNode<E> {
    pub(crate) predicate: Predicate<E>,
    pub(crate) constraints: Vec<ConstraintHandle>,
    pub(crate) actions: Vec<Action<E>>,
    pub(crate) children: Vec<ContextNode<E>>,
    pub(crate) otherwise: Option<Box<ContextNode<E>>>,
}

impl<E: 'static> ContextNode<E> {
    /// Create an empty node gated by `predicate`.
    pub(crate) fn new(predicate: Predicate<E>) -> Self {
        Self {
            predicate,
            constraints: Vec::new(),
            actions: Vec::new(),
            children: Vec::new(),
            otherwise: None,
        }
    }

    /// Collect the active nodes for `environment` into `out`, depth-first
    /// pre-order.
    ///
    /// A node's predicate is only evaluated when the node is reachable, and
    /// exactly one of {node, node.otherwise} contributes at any scope.
    pub(crate) fn collect_active<'tree>(
        &'tree self,
        environment: &E,
        out: &mut Vec<&'tree ContextNode<E>>,
    ) {
        if self.predicate.evaluate(environment) {
            out.push(self);
            for child in &self.children {
                child.collect_active(environment, out);
            }
        } else if let Some(otherwise) = &self.otherwise {
            otherwise.collect_active(environment, out);
        }
    }

    /// Whether this node and its entire substructure registered nothing.
    ///
    /// Used by the builder to skip attaching an otherwise branch that could
    /// never contribute to the active set.
    pub(crate) fn is_empty(&self) -> bool {
        self.constraints.is_empty()
            && self.actions.is_empty()
            && self.children.iter().all(ContextNode::is_empty)
            && self.otherwise.as_ref().is_none_or(|node| node.is_empty())
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

    fn active_constraint_ids(root: &ContextNode<bool>, env: bool) -> Vec<u64> {
        let mut nodes = Vec::new();
        root.collect_active(&env, &mut nodes);
        nodes
            .iter()
            .flat_map(|node| node.constraints.iter().map(ConstraintHandle::id))
            .collect()
    }

    #[test]
    fn test_traversal_is_preorder() {
        // root -> [child_a -> [grandchild], child_b]
        let mut root = ContextNode::<bool>::new(Predicate::always());
        let root_handle = handle();
        root.constraints.push(root_handle.clone());

        let mut child_a = ContextNode::new(Predicate::always());
        let a_handle = handle();
        child_a.constraints.push(a_handle.clone());

        let mut grandchild = ContextNode::new(Predicate::always());
        let grand_handle = handle();
        grandchild.constraints.push(grand_handle.clone());
        child_a.children.push(grandchild);

        let mut child_b = ContextNode::new(Predicate::always());
        let b_handle = handle();
        child_b.constraints.push(b_handle.clone());

        root.children.push(child_a);
        root.children.push(child_b);

        assert_eq!(
            active_constraint_ids(&root, true),
            vec![root_handle.id(), a_handle.id(), grand_handle.id(), b_handle.id()]
        );
    }

    #[test]
    fn test_false_predicate_without_otherwise_contributes_nothing() {
        let mut root = ContextNode::<bool>::new(Predicate::always());
        let mut child = ContextNode::new(Predicate::new(|env: &bool| *env));
        child.constraints.push(handle());
        root.children.push(child);

        assert_eq!(active_constraint_ids(&root, false), Vec::<u64>::new());
        assert_eq!(active_constraint_ids(&root, true).len(), 1);
    }

    #[test]
    fn test_otherwise_branch_contributes_recursively() {
        let mut node = ContextNode::new(Predicate::new(|env: &bool| *env));
        let when_handle = handle();
        node.constraints.push(when_handle.clone());

        // otherwise branch with its own nested child
        let mut otherwise = ContextNode::new(Predicate::new(|env: &bool| !*env));
        let else_handle = handle();
        otherwise.constraints.push(else_handle.clone());
        let mut nested = ContextNode::new(Predicate::always());
        let nested_handle = handle();
        nested.constraints.push(nested_handle.clone());
        otherwise.children.push(nested);
        node.otherwise = Some(Box::new(otherwise));

        let mut root = ContextNode::<bool>::new(Predicate::always());
        root.children.push(node);

        assert_eq!(active_constraint_ids(&root, true), vec![when_handle.id()]);
        assert_eq!(
            active_constraint_ids(&root, false),
            vec![else_handle.id(), nested_handle.id()]
        );
    }

    #[test]
    fn test_child_predicate_is_independent_of_parent() {
        // The child predicate ignores the parent's condition entirely;
        // nesting only controls whether it gets evaluated.
        let mut parent = ContextNode::new(Predicate::new(|env: &bool| *env));
        let mut child = ContextNode::new(Predicate::new(|env: &bool| !*env));
        child.constraints.push(handle());
        parent.children.push(child);

        let mut root = ContextNode::<bool>::new(Predicate::always());
        root.children.push(parent);

        // Parent active, child predicate false on its own terms.
        assert_eq!(active_constraint_ids(&root, true).len(), 0);
        // Parent inactive, child never evaluated.
        assert_eq!(active_constraint_ids(&root, false).len(), 0);
    }

    #[test]
    fn test_is_empty_sees_nested_registrations() {
        let mut node = ContextNode::<bool>::new(Predicate::always());
        assert!(node.is_empty());

        let mut nested = ContextNode::new(Predicate::always());
        let mut deep = ContextNode::new(Predicate::always());
        deep.actions.push(Rc::new(|_: &bool| {}));
        nested.children.push(deep);
        node.children.push(nested);

        assert!(!node.is_empty(), "an action three levels down still counts");
    }
}
