//! Shared-ownership profiling call-tree representation.
//!
//! Nodes are `Rc<RefCell<...>>` wrapped in [`ProfileNodeRef`] so a node
//! handle is self-contained: it carries its own children, and the same
//! handle type works for nodes of either input tree and of the output tree
//! during a combination. Parent links are `Weak` so dropping a tree does not
//! leak cycles.
//!
//! The payload is a stack frame label plus an exclusive call count. The
//! canonical sibling order is alphabetical by frame.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::ops::CombineFactory;
use crate::render::to_termtree;
use crate::tree::ContextTree;

#[derive(Debug)]
struct ProfileNode {
    frame: String,
    calls: i64,
    parent: Option<Weak<RefCell<ProfileNode>>>,
    children: Vec<ProfileNodeRef>,
}

/// Handle to a profile node. Cloning the handle shares the node; equality is
/// node identity (pointer equality), matching the contract that distinct
/// output nodes never alias input nodes.
#[derive(Debug, Clone)]
pub struct ProfileNodeRef(Rc<RefCell<ProfileNode>>);

impl PartialEq for ProfileNodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ProfileNodeRef {}

impl ProfileNodeRef {
    pub fn new(frame: impl Into<String>, calls: i64) -> Self {
        Self(Rc::new(RefCell::new(ProfileNode {
            frame: frame.into(),
            calls,
            parent: None,
            children: Vec::new(),
        })))
    }

    pub fn frame(&self) -> String {
        self.0.borrow().frame.clone()
    }

    /// Exclusive call count (this node only, not its descendants).
    pub fn calls(&self) -> i64 {
        self.0.borrow().calls
    }

    pub fn parent(&self) -> Option<ProfileNodeRef> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(ProfileNodeRef)
    }

    pub fn children(&self) -> Vec<ProfileNodeRef> {
        self.0.borrow().children.clone()
    }

    /// Append `child` and set its parent back-link. Call order becomes child
    /// order; use [`sort_by_frame`](Self::sort_by_frame) to canonicalize a
    /// hand-built tree afterwards.
    pub fn add_child(&self, child: &ProfileNodeRef) {
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Recursively sort all sibling sequences alphabetically by frame,
    /// establishing the canonical order the combination engine requires.
    pub fn sort_by_frame(&self) {
        self.0
            .borrow_mut()
            .children
            .sort_by(|x, y| x.frame().cmp(&y.frame()));
        for child in self.children() {
            child.sort_by_frame();
        }
    }
}

/// A named profiling call tree.
#[derive(Debug)]
pub struct ProfileTree {
    name: String,
    root: ProfileNodeRef,
}

impl ProfileTree {
    pub fn new(name: impl Into<String>, root: ProfileNodeRef) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }
}

impl ContextTree for ProfileTree {
    type Node = ProfileNodeRef;
    type Label = String;

    fn root(&self) -> Self::Node {
        self.root.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self, node: &Self::Node) -> Self::Label {
        node.frame()
    }

    fn parent(&self, node: &Self::Node) -> Option<Self::Node> {
        node.parent()
    }

    fn children(&self, node: &Self::Node) -> Vec<Self::Node> {
        node.children()
    }
}

impl fmt::Display for ProfileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_termtree(self))
    }
}

/// Combination factory for [`ProfileTree`]s: union adds call counts,
/// intersection keeps the minimum, subtraction saturates at zero. Nodes are
/// matched by frame label, alphabetically.
pub struct ProfileFactory {
    out_name: String,
}

impl ProfileFactory {
    /// `out_name` becomes the name of the tree built by
    /// [`create_tree`](CombineFactory::create_tree).
    pub fn new(out_name: impl Into<String>) -> Self {
        Self {
            out_name: out_name.into(),
        }
    }
}

impl CombineFactory<ProfileTree> for ProfileFactory {
    fn ordered_children(&self, node: &ProfileNodeRef) -> Vec<ProfileNodeRef> {
        node.children()
    }

    fn compare_nodes(&self, a: &ProfileNodeRef, b: &ProfileNodeRef) -> Ordering {
        a.frame().cmp(&b.frame())
    }

    fn union_nodes(&mut self, a: &ProfileNodeRef, b: &ProfileNodeRef) -> ProfileNodeRef {
        ProfileNodeRef::new(a.frame(), a.calls() + b.calls())
    }

    fn intersect_nodes(&mut self, a: &ProfileNodeRef, b: &ProfileNodeRef) -> ProfileNodeRef {
        ProfileNodeRef::new(a.frame(), a.calls().min(b.calls()))
    }

    fn subtract_nodes(&mut self, a: &ProfileNodeRef, b: &ProfileNodeRef) -> ProfileNodeRef {
        // Call counts never go negative; clamp at zero.
        ProfileNodeRef::new(a.frame(), (a.calls() - b.calls()).max(0))
    }

    fn clone_node(&mut self, node: &ProfileNodeRef) -> ProfileNodeRef {
        ProfileNodeRef::new(node.frame(), node.calls())
    }

    fn connect_parent_and_child(&mut self, parent: &ProfileNodeRef, child: &ProfileNodeRef) {
        parent.add_child(child);
    }

    fn create_tree(&mut self, root: ProfileNodeRef) -> ProfileTree {
        ProfileTree::new(self.out_name.clone(), root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_equality_is_identity() {
        let a = ProfileNodeRef::new("main", 1);
        let b = ProfileNodeRef::new("main", 1);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_add_child_sets_parent_link() {
        let root = ProfileNodeRef::new("main", 0);
        let child = ProfileNodeRef::new("parse", 3);
        root.add_child(&child);

        assert_eq!(child.parent().unwrap(), root);
        assert_eq!(root.children(), vec![child]);
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_subtract_nodes_clamps_at_zero() {
        let mut factory = ProfileFactory::new("diff");
        let a = ProfileNodeRef::new("q", 2);
        let b = ProfileNodeRef::new("q", 5);

        let out = factory.subtract_nodes(&a, &b);
        assert_eq!(out.calls(), 0);

        let positive = factory.subtract_nodes(&b, &a);
        assert_eq!(positive.calls(), 3);
    }

    #[test]
    fn test_sort_by_frame_canonicalizes_recursively() {
        let root = ProfileNodeRef::new("main", 0);
        let b = ProfileNodeRef::new("b", 1);
        let a = ProfileNodeRef::new("a", 1);
        let z = ProfileNodeRef::new("z", 1);
        let y = ProfileNodeRef::new("y", 1);
        root.add_child(&b);
        root.add_child(&a);
        a.add_child(&z);
        a.add_child(&y);

        root.sort_by_frame();

        let frames: Vec<String> = root.children().iter().map(|c| c.frame()).collect();
        assert_eq!(frames, vec!["a", "b"]);
        let sub: Vec<String> = a.children().iter().map(|c| c.frame()).collect();
        assert_eq!(sub, vec!["y", "z"]);
    }
}
