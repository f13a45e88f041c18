//! The `ContextTree` contract: ordered, labeled trees.
//!
//! A context tree is a tree where
//!
//! 1. each node carries a label,
//! 2. the labels of sibling nodes differ (value equality), and
//! 3. at least one *inclusive* numeric attribute exists, i.e. one where the
//!    value for a parent is greater or equal to the sum of the values of its
//!    children.
//!
//! Property 2 allows the children of a node to be brought into a canonical
//! order, so the tree can be processed as an *ordered* tree. Property 3 is
//! fulfilled by [`crate::attribute::DescendantCount`] for every tree.
//!
//! Implement this trait for your own tree representation; `contree` ships two
//! ([`crate::profile::ProfileTree`] and [`crate::arena::CtxArena`]).

use crate::errors::{TreeError, TreeResult};

/// Abstract ordered labeled tree over an opaque node handle.
///
/// Whenever a tree is fed into the combination engine, `children` must yield
/// the canonical order (consistent with the factory comparator).
///
/// # Preconditions
///
/// Node handles passed to these methods must belong to this tree. Passing a
/// handle from another tree is a programmer error; implementations are free
/// to panic with a descriptive message.
pub trait ContextTree {
    /// Opaque node handle. Equality must mean "same node" wherever the
    /// handle type can express identity (e.g. arena indices, pointer-equal
    /// ref-counted nodes).
    type Node: Clone + PartialEq;

    /// Node label. Compared by value, never by identity.
    type Label: Clone + Eq + std::fmt::Debug;

    /// The single root node of this tree.
    fn root(&self) -> Self::Node;

    /// Short description of the whole tree (e.g. "run-17 call tree").
    fn name(&self) -> &str;

    fn label(&self, node: &Self::Node) -> Self::Label;

    /// Parent of `node`, or `None` for the root.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Children of `node`, finite and restartable, in canonical order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn child_count(&self, node: &Self::Node) -> usize {
        self.children(node).len()
    }

    /// Child at `index`, bounds-checked. Out of range is an error, not a
    /// silent clamp.
    fn child(&self, node: &Self::Node, index: usize) -> TreeResult<Self::Node> {
        let children = self.children(node);
        let count = children.len();
        children
            .into_iter()
            .nth(index)
            .ok_or(TreeError::ChildIndexOutOfRange { index, count })
    }

    /// The child carrying the given label, if any. Well-defined because
    /// sibling labels are pairwise distinct.
    fn child_with_label(&self, node: &Self::Node, label: &Self::Label) -> Option<Self::Node> {
        self.children(node)
            .into_iter()
            .find(|child| self.label(child) == *label)
    }

    fn index_of_child(&self, node: &Self::Node, child: &Self::Node) -> Option<usize> {
        self.children(node).iter().position(|c| c == child)
    }

    fn is_root(&self, node: &Self::Node) -> bool {
        self.parent(node).is_none()
    }
}
