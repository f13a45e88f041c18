//! contree: ordered labeled trees ("context trees") for hierarchical
//! measurement data, with derived per-node attributes and algebraic
//! combination operations.
//!
//! The crate has three layers:
//!
//! - [`tree::ContextTree`], the contract every tree representation
//!   satisfies, plus two shipped representations
//!   ([`profile::ProfileTree`], [`arena::CtxArena`]);
//! - [`attribute`], typed pure metrics over any conforming tree (depth,
//!   height, descendant/leaf counts, inclusive wrapping, predicates);
//! - [`ops`], union / intersection / subtraction / cloning of trees, driven
//!   by a caller-supplied [`ops::CombineFactory`] and a shared merge-join
//!   over canonically ordered sibling sequences.

pub mod arena;
pub mod attribute;
pub mod errors;
pub mod ops;
pub mod profile;
pub mod render;
pub mod tree;
pub mod util;

pub use arena::{CtxArena, CtxData};
pub use errors::{TreeError, TreeResult};
pub use ops::CombineFactory;
pub use profile::{ProfileFactory, ProfileNodeRef, ProfileTree};
pub use tree::ContextTree;
