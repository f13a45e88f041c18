//! ASCII rendering of context trees for logs and debugging.

use std::fmt::Display;

use termtree::Tree;

use crate::tree::ContextTree;

/// Render any context tree as a `termtree::Tree` of its labels, preserving
/// child order.
pub fn to_termtree<C>(tree: &C) -> Tree<String>
where
    C: ContextTree,
    C::Label: Display,
{
    subtree_to_termtree(tree, &tree.root())
}

fn subtree_to_termtree<C>(tree: &C, node: &C::Node) -> Tree<String>
where
    C: ContextTree,
    C::Label: Display,
{
    let leaves: Vec<_> = tree
        .children(node)
        .iter()
        .map(|child| subtree_to_termtree(tree, child))
        .collect();
    Tree::new(tree.label(node).to_string()).with_leaves(leaves)
}
