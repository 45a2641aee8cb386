//! Traversal engine
//!
//! Bounded-depth, cycle-safe exploration from a start concept.
//!
//! # Invariants
//!
//! - A concept is expanded at most once, whatever depth it is reached at
//! - No concept first reached at `depth >= max_depth` is expanded
//! - Output order depends only on graph content and inputs

mod engine;
mod errors;
mod result;

pub use engine::TraversalEngine;
pub use errors::{TraversalError, TraversalResult};
pub use result::{MaxDepth, Traversal, Visit};
