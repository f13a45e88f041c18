//! Derived per-node metrics ("attributes").
//!
//! An attribute is a named, described, pure function from a node to a value.
//! Attributes are stateless across calls; callers may memoize but the
//! framework never caches. Evaluating an attribute against a node that does
//! not belong to the attribute's tree is a precondition violation the caller
//! must avoid, not a recoverable error.

use crate::tree::ContextTree;

/// Common surface of every attribute: a short name and a description.
pub trait Attribute {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
}

/// Integer-valued attribute over nodes of type `N`.
pub trait LongAttribute<N>: Attribute {
    fn evaluate(&self, node: &N) -> i64;
}

/// Float-valued attribute over nodes of type `N`.
pub trait DoubleAttribute<N>: Attribute {
    fn evaluate(&self, node: &N) -> f64;
}

/// Boolean-valued attribute over nodes of type `N`.
pub trait BooleanAttribute<N>: Attribute {
    fn evaluate(&self, node: &N) -> bool;
}

/// Depth of a node: 0 at the root, `1 + depth(parent)` elsewhere.
///
/// Works against any [`ContextTree`] representation.
pub struct Depth<'a, C: ContextTree> {
    tree: &'a C,
}

impl<'a, C: ContextTree> Depth<'a, C> {
    pub fn new(tree: &'a C) -> Self {
        Self { tree }
    }
}

impl<C: ContextTree> Attribute for Depth<'_, C> {
    fn name(&self) -> &str {
        "Depth"
    }

    fn description(&self) -> &str {
        "Depth of node (length of path to root)"
    }
}

impl<C: ContextTree> LongAttribute<C::Node> for Depth<'_, C> {
    fn evaluate(&self, node: &C::Node) -> i64 {
        match self.tree.parent(node) {
            None => 0,
            Some(parent) => 1 + self.evaluate(&parent),
        }
    }
}

/// Height of a node: `1 + max(height(child))`, where the max over no
/// children is 0.
///
/// Under this recursive formula a leaf has height 1, not the 0 the textbook
/// "longest downward path" definition would give. The off-by-one is kept
/// deliberately; downstream consumers depend on it.
pub struct Height<'a, C: ContextTree> {
    tree: &'a C,
}

impl<'a, C: ContextTree> Height<'a, C> {
    pub fn new(tree: &'a C) -> Self {
        Self { tree }
    }
}

impl<C: ContextTree> Attribute for Height<'_, C> {
    fn name(&self) -> &str {
        "Height"
    }

    fn description(&self) -> &str {
        "Height of node (length of longest downward path to a leaf)"
    }
}

impl<C: ContextTree> LongAttribute<C::Node> for Height<'_, C> {
    fn evaluate(&self, node: &C::Node) -> i64 {
        let max_child_height = self
            .tree
            .children(node)
            .iter()
            .map(|child| self.evaluate(child))
            .max()
            .unwrap_or(0);
        1 + max_child_height
    }
}

/// Number of descendants of a node; a leaf has 0.
///
/// This is the canonical *inclusive* attribute: a parent's value is always
/// greater or equal to the sum of its children's values, which is what
/// guarantees that siblings can be brought into a canonical total order.
pub struct DescendantCount<'a, C: ContextTree> {
    tree: &'a C,
}

impl<'a, C: ContextTree> DescendantCount<'a, C> {
    pub fn new(tree: &'a C) -> Self {
        Self { tree }
    }
}

impl<C: ContextTree> Attribute for DescendantCount<'_, C> {
    fn name(&self) -> &str {
        "Descendants"
    }

    fn description(&self) -> &str {
        "Number of descendants"
    }
}

impl<C: ContextTree> LongAttribute<C::Node> for DescendantCount<'_, C> {
    fn evaluate(&self, node: &C::Node) -> i64 {
        let childrens_descendants: i64 = self
            .tree
            .children(node)
            .iter()
            .map(|child| self.evaluate(child))
            .sum();
        self.tree.child_count(node) as i64 + childrens_descendants
    }
}

/// Number of leaf descendants; for a leaf itself, 1.
pub struct LeafCount<'a, C: ContextTree> {
    tree: &'a C,
}

impl<'a, C: ContextTree> LeafCount<'a, C> {
    pub fn new(tree: &'a C) -> Self {
        Self { tree }
    }
}

impl<C: ContextTree> Attribute for LeafCount<'_, C> {
    fn name(&self) -> &str {
        "Leaves"
    }

    fn description(&self) -> &str {
        "Number of leaf descendants"
    }
}

impl<C: ContextTree> LongAttribute<C::Node> for LeafCount<'_, C> {
    fn evaluate(&self, node: &C::Node) -> i64 {
        let children = self.tree.children(node);
        if children.is_empty() {
            1
        } else {
            children.iter().map(|child| self.evaluate(child)).sum()
        }
    }
}

/// Whether the given node is a leaf.
pub struct IsLeaf<'a, C: ContextTree> {
    tree: &'a C,
}

impl<'a, C: ContextTree> IsLeaf<'a, C> {
    pub fn new(tree: &'a C) -> Self {
        Self { tree }
    }
}

impl<C: ContextTree> Attribute for IsLeaf<'_, C> {
    fn name(&self) -> &str {
        "IsLeaf"
    }

    fn description(&self) -> &str {
        "Is the node a leaf node?"
    }
}

impl<C: ContextTree> BooleanAttribute<C::Node> for IsLeaf<'_, C> {
    fn evaluate(&self, node: &C::Node) -> bool {
        self.tree.child_count(node) == 0
    }
}

/// Whether the given node is the root.
pub struct IsRoot<'a, C: ContextTree> {
    tree: &'a C,
}

impl<'a, C: ContextTree> IsRoot<'a, C> {
    pub fn new(tree: &'a C) -> Self {
        Self { tree }
    }
}

impl<C: ContextTree> Attribute for IsRoot<'_, C> {
    fn name(&self) -> &str {
        "IsRoot"
    }

    fn description(&self) -> &str {
        "Is the node the root node?"
    }
}

impl<C: ContextTree> BooleanAttribute<C::Node> for IsRoot<'_, C> {
    fn evaluate(&self, node: &C::Node) -> bool {
        self.tree.parent(node).is_none()
    }
}

/// Given an exclusive (value only for the given node) integer attribute,
/// computes the inclusive value: the value for the node plus all its
/// descendants.
pub struct InclusiveLong<'a, C: ContextTree, A> {
    tree: &'a C,
    exclusive: A,
    name: String,
    description: String,
}

impl<'a, C: ContextTree, A: LongAttribute<C::Node>> InclusiveLong<'a, C, A> {
    pub fn new(tree: &'a C, exclusive: A) -> Self {
        let name = format!("Inclusive({})", exclusive.name());
        let description = format!("Inclusive({})", exclusive.description());
        Self {
            tree,
            exclusive,
            name,
            description,
        }
    }
}

impl<C: ContextTree, A> Attribute for InclusiveLong<'_, C, A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<C: ContextTree, A: LongAttribute<C::Node>> LongAttribute<C::Node>
    for InclusiveLong<'_, C, A>
{
    fn evaluate(&self, node: &C::Node) -> i64 {
        let mut value = self.exclusive.evaluate(node);
        for child in self.tree.children(node) {
            value += self.evaluate(&child);
        }
        value
    }
}

/// Inclusive wrapper for float attributes, see [`InclusiveLong`].
pub struct InclusiveDouble<'a, C: ContextTree, A> {
    tree: &'a C,
    exclusive: A,
    name: String,
    description: String,
}

impl<'a, C: ContextTree, A: DoubleAttribute<C::Node>> InclusiveDouble<'a, C, A> {
    pub fn new(tree: &'a C, exclusive: A) -> Self {
        let name = format!("Inclusive({})", exclusive.name());
        let description = format!("Inclusive({})", exclusive.description());
        Self {
            tree,
            exclusive,
            name,
            description,
        }
    }
}

impl<C: ContextTree, A> Attribute for InclusiveDouble<'_, C, A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<C: ContextTree, A: DoubleAttribute<C::Node>> DoubleAttribute<C::Node>
    for InclusiveDouble<'_, C, A>
{
    fn evaluate(&self, node: &C::Node) -> f64 {
        let mut value = self.exclusive.evaluate(node);
        for child in self.tree.children(node) {
            value += self.evaluate(&child);
        }
        value
    }
}

/// Generated name for a binary comparison: `"a <op> b"`.
fn build_comparison_label(op: &str, a: &impl Attribute, b: &impl Attribute) -> String {
    format!("{} {} {}", a.name(), op, b.name())
}

/// Pointwise comparison (`!=`) of two integer attributes.
///
/// Name and description default to the generated `"a != b"` string; caller
/// supplied strings are used verbatim.
pub struct LongNotEqual<A, B> {
    a: A,
    b: B,
    name: String,
    description: String,
}

impl<A: Attribute, B: Attribute> LongNotEqual<A, B> {
    pub fn new(a: A, b: B) -> Self {
        let generated = build_comparison_label("!=", &a, &b);
        Self {
            name: generated.clone(),
            description: generated,
            a,
            b,
        }
    }

    pub fn named(name: impl Into<String>, a: A, b: B) -> Self {
        let description = build_comparison_label("!=", &a, &b);
        Self {
            name: name.into(),
            description,
            a,
            b,
        }
    }

    pub fn with_description(
        name: impl Into<String>,
        description: impl Into<String>,
        a: A,
        b: B,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            a,
            b,
        }
    }
}

impl<A, B> Attribute for LongNotEqual<A, B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<N, A: LongAttribute<N>, B: LongAttribute<N>> BooleanAttribute<N> for LongNotEqual<A, B> {
    fn evaluate(&self, node: &N) -> bool {
        self.a.evaluate(node) != self.b.evaluate(node)
    }
}
