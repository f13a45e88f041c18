//! Arena-backed context-tree representation.
//!
//! Uses a generational arena for memory-safe node handles and O(1) lookups;
//! one `CtxArena` owns one complete tree. Handles are plain `Index` values,
//! so traversal never touches reference counts, and the explicit-stack
//! iterators walk arbitrarily deep trees without growing the call stack.

use generational_arena::Arena;
pub use generational_arena::Index;
use std::fmt;
use tracing::instrument;

use crate::tree::ContextTree;

/// Payload of an arena node: a context label plus an exclusive sample
/// weight.
#[derive(Debug, Clone)]
pub struct CtxData {
    pub label: String,
    pub weight: i64,
}

impl CtxData {
    pub fn new(label: impl Into<String>, weight: i64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }
}

impl fmt::Display for CtxData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Tree node stored in the arena.
#[derive(Debug)]
pub struct CtxNode {
    pub data: CtxData,
    /// Arena index of the parent, `None` for the root.
    pub parent: Option<Index>,
    /// Arena indices of the children, in canonical order.
    pub children: Vec<Index>,
}

/// Arena-based context tree.
///
/// Children keep the order they were inserted in; the caller is responsible
/// for inserting them in the canonical order when the tree will be read as
/// an ordered tree.
#[derive(Debug)]
pub struct CtxArena {
    name: String,
    arena: Arena<CtxNode>,
    root: Option<Index>,
}

impl CtxArena {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert a node under `parent`, or as the root when `parent` is `None`.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: CtxData, parent: Option<Index>) -> Index {
        let node = CtxNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            let name = &self.name;
            self.arena
                .get_mut(parent_idx)
                .unwrap_or_else(|| panic!("parent handle does not belong to tree '{name}'"))
                .children
                .push(node_idx);
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&CtxNode> {
        self.arena.get(idx)
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Preorder iterator over `(index, node)` pairs.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    /// Postorder iterator over `(index, node)` pairs (leaves first).
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Resolve a handle that must belong to this tree.
    fn node(&self, idx: Index) -> &CtxNode {
        self.arena
            .get(idx)
            .unwrap_or_else(|| panic!("node handle does not belong to tree '{}'", self.name))
    }
}

impl ContextTree for CtxArena {
    type Node = Index;
    type Label = String;

    fn root(&self) -> Index {
        self.root
            .unwrap_or_else(|| panic!("tree '{}' has no root", self.name))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self, node: &Index) -> String {
        self.node(*node).data.label.clone()
    }

    fn parent(&self, node: &Index) -> Option<Index> {
        self.node(*node).parent
    }

    fn children(&self, node: &Index) -> Vec<Index> {
        self.node(*node).children.clone()
    }

    fn child_count(&self, node: &Index) -> usize {
        self.node(*node).children.len()
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a CtxArena,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a CtxArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a CtxNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a CtxArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a CtxArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a CtxNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
