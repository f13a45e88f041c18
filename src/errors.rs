//! Error taxonomy for context-tree operations.
//!
//! The core is total over its documented preconditions, so the taxonomy is
//! narrow: absent values (no parent at root, no child with a label) are
//! `Option`s, not errors. Everything here is a detected precondition
//! violation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("child index {index} out of range for node with {count} children")]
    ChildIndexOutOfRange { index: usize, count: usize },

    #[error("sibling nodes out of canonical order in {side} input tree")]
    NonCanonicalOrder { side: &'static str },
}

pub type TreeResult<T> = Result<T, TreeError>;
