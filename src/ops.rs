//! Algebraic combination operations over context trees.
//!
//! Union, intersection, and subtraction of two trees, plus deep cloning.
//! Union is useful for example to compute the tree representing a whole
//! cluster of trees; intersection for highlighting the nodes two trees have
//! in common; subtraction for diffing two profiles of the same program.
//!
//! All three binary operations are one merge-join over the canonically
//! ordered child sequences of corresponding nodes, differing only in the
//! node-local combination rule and the disposition of unmatched children.
//! One private merge routine implements the traversal; the per-operation
//! differences are a small policy value.
//!
//! Inputs are never mutated. Output trees are built one node at a time
//! through a caller-supplied [`CombineFactory`]; a precondition failure
//! detected deep in the recursion propagates out and the partially built
//! output is simply dropped.

use std::cmp::Ordering;

use itertools::Itertools;
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};
use crate::tree::ContextTree;

/// Node-level strategy the combination engine calls back into.
///
/// A factory owns no tree state of the inputs; it knows how to read children
/// in canonical order, how to order sibling nodes, and how to produce nodes
/// of the output tree. All four node-producing methods must return a node
/// identity distinct from any input node (no aliasing of input structure
/// into the output), and `connect_parent_and_child` must preserve call order
/// as child order.
pub trait CombineFactory<C: ContextTree> {
    /// Children of `node` in the canonical order, i.e. strictly increasing
    /// under [`compare_nodes`](Self::compare_nodes).
    fn ordered_children(&self, node: &C::Node) -> Vec<C::Node>;

    /// Strict total order over sibling nodes, consistent across both input
    /// trees of a combination.
    fn compare_nodes(&self, a: &C::Node, b: &C::Node) -> Ordering;

    /// New output node holding the union of the two nodes' own content
    /// (children are wired by the engine, not here).
    fn union_nodes(&mut self, a: &C::Node, b: &C::Node) -> C::Node;

    /// New output node holding the intersection of the two nodes' own content.
    fn intersect_nodes(&mut self, a: &C::Node, b: &C::Node) -> C::Node;

    /// New output node holding the difference of the two nodes' own content.
    fn subtract_nodes(&mut self, a: &C::Node, b: &C::Node) -> C::Node;

    /// New output node copying `node`'s own content.
    fn clone_node(&mut self, node: &C::Node) -> C::Node;

    /// Wire `child` under `parent` in the output tree, appending in call
    /// order.
    fn connect_parent_and_child(&mut self, parent: &C::Node, child: &C::Node);

    /// Wrap a completed root node as a full tree value.
    fn create_tree(&mut self, root: C::Node) -> C;
}

/// Which binary combination is running; decides the node-local rule and the
/// disposition of unmatched children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeOp {
    Union,
    Intersection,
    Subtract,
}

impl MergeOp {
    fn combine_nodes<C, F>(self, factory: &mut F, a: &C::Node, b: &C::Node) -> C::Node
    where
        C: ContextTree,
        F: CombineFactory<C>,
    {
        match self {
            MergeOp::Union => factory.union_nodes(a, b),
            MergeOp::Intersection => factory.intersect_nodes(a, b),
            MergeOp::Subtract => factory.subtract_nodes(a, b),
        }
    }

    /// Is an a-only child cloned into the output (true) or dropped (false)?
    fn keeps_left_only(self) -> bool {
        matches!(self, MergeOp::Union | MergeOp::Subtract)
    }

    /// Is a b-only child cloned into the output (true) or dropped (false)?
    fn keeps_right_only(self) -> bool {
        matches!(self, MergeOp::Union)
    }
}

/// Create a tree where each node contains the union of the corresponding
/// nodes of `a` and `b`; children present on only one side are cloned.
#[instrument(level = "debug", skip_all, fields(a = a.name(), b = b.name()))]
pub fn union<C, F>(a: &C, b: &C, factory: &mut F) -> TreeResult<C>
where
    C: ContextTree,
    F: CombineFactory<C>,
{
    combine(MergeOp::Union, a, b, factory)
}

/// Create a tree containing only the nodes present in both `a` and `b`,
/// combined pairwise; children present on only one side are dropped.
#[instrument(level = "debug", skip_all, fields(a = a.name(), b = b.name()))]
pub fn intersection<C, F>(a: &C, b: &C, factory: &mut F) -> TreeResult<C>
where
    C: ContextTree,
    F: CombineFactory<C>,
{
    combine(MergeOp::Intersection, a, b, factory)
}

/// Create a tree representing `a - b`. Matched children are subtracted and
/// still wired (even when the node-local result becomes a zero); a-only
/// children are cloned, b-only children are dropped.
#[instrument(level = "debug", skip_all, fields(a = a.name(), b = b.name()))]
pub fn subtract<C, F>(a: &C, b: &C, factory: &mut F) -> TreeResult<C>
where
    C: ContextTree,
    F: CombineFactory<C>,
{
    combine(MergeOp::Subtract, a, b, factory)
}

fn combine<C, F>(op: MergeOp, a: &C, b: &C, factory: &mut F) -> TreeResult<C>
where
    C: ContextTree,
    F: CombineFactory<C>,
{
    let a_root = a.root();
    let b_root = b.root();
    let out_root = op.combine_nodes(factory, &a_root, &b_root);
    merge_children(op, a, b, &a_root, &b_root, &out_root, factory)?;
    Ok(factory.create_tree(out_root))
}

/// The shared merge-join. Walks the two ordered child sequences with
/// parallel cursors; equal children are combined and recursed into, the
/// smaller side's child is disposed of per the operation's policy.
fn merge_children<C, F>(
    op: MergeOp,
    a_tree: &C,
    b_tree: &C,
    a_node: &C::Node,
    b_node: &C::Node,
    out_node: &C::Node,
    factory: &mut F,
) -> TreeResult<()>
where
    C: ContextTree,
    F: CombineFactory<C>,
{
    let a_children = checked_children(factory, a_node, "left")?;
    let b_children = checked_children(factory, b_node, "right")?;
    let mut a = 0;
    let mut b = 0;
    while a < a_children.len() || b < b_children.len() {
        if a < a_children.len() && b < b_children.len() {
            let a_child = &a_children[a];
            let b_child = &b_children[b];
            match factory.compare_nodes(a_child, b_child) {
                Ordering::Equal => {
                    let out_child = op.combine_nodes(factory, a_child, b_child);
                    factory.connect_parent_and_child(out_node, &out_child);
                    merge_children(op, a_tree, b_tree, a_child, b_child, &out_child, factory)?;
                    a += 1;
                    b += 1;
                }
                Ordering::Less => {
                    if op.keeps_left_only() {
                        let out_child = clone_subtree(a_tree, a_child, factory);
                        factory.connect_parent_and_child(out_node, &out_child);
                    }
                    a += 1;
                }
                Ordering::Greater => {
                    if op.keeps_right_only() {
                        let out_child = clone_subtree(b_tree, b_child, factory);
                        factory.connect_parent_and_child(out_node, &out_child);
                    }
                    b += 1;
                }
            }
        } else if a < a_children.len() {
            if op.keeps_left_only() {
                let out_child = clone_subtree(a_tree, &a_children[a], factory);
                factory.connect_parent_and_child(out_node, &out_child);
            }
            a += 1;
        } else {
            if op.keeps_right_only() {
                let out_child = clone_subtree(b_tree, &b_children[b], factory);
                factory.connect_parent_and_child(out_node, &out_child);
            }
            b += 1;
        }
    }
    Ok(())
}

/// Fetch children via the factory and verify they are strictly increasing
/// under the factory comparator. A violation would make the merge-join
/// silently mismatch nodes, so it is flagged loudly instead. Strictness also
/// catches duplicate sibling labels and comparator ties.
fn checked_children<C, F>(factory: &F, node: &C::Node, side: &'static str) -> TreeResult<Vec<C::Node>>
where
    C: ContextTree,
    F: CombineFactory<C>,
{
    let children = factory.ordered_children(node);
    let sorted = children
        .iter()
        .tuple_windows()
        .all(|(x, y)| factory.compare_nodes(x, y) == Ordering::Less);
    if !sorted {
        return Err(TreeError::NonCanonicalOrder { side });
    }
    Ok(children)
}

/// Deep-clone a complete tree.
#[instrument(level = "debug", skip_all, fields(tree = tree.name()))]
pub fn clone_tree<C, F>(tree: &C, factory: &mut F) -> C
where
    C: ContextTree,
    F: CombineFactory<C>,
{
    let out_root = clone_subtree(tree, &tree.root(), factory);
    factory.create_tree(out_root)
}

/// Deep-clone the subtree rooted at `node`, preserving child order. The
/// returned root is not yet wired under any parent.
pub fn clone_subtree<C, F>(tree: &C, node: &C::Node, factory: &mut F) -> C::Node
where
    C: ContextTree,
    F: CombineFactory<C>,
{
    let out_node = factory.clone_node(node);
    for child in tree.children(node) {
        let out_child = clone_subtree(tree, &child, factory);
        factory.connect_parent_and_child(&out_node, &out_child);
    }
    out_node
}
