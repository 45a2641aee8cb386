//! Traversal output

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::Triple;

use super::errors::{TraversalError, TraversalResult};

/// Depth cutoff for a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum MaxDepth {
    Unbounded,
    /// Exclusive: a concept first reached at this depth is not expanded
    Limited(usize),
}

impl MaxDepth {
    /// Interprets the conventional signed form: -1 is unbounded
    pub fn from_signed(depth: i64) -> TraversalResult<MaxDepth> {
        match depth {
            -1 => Ok(MaxDepth::Unbounded),
            d if d >= 0 => Ok(MaxDepth::Limited(d as usize)),
            d => Err(TraversalError::InvalidMaxDepth(d)),
        }
    }

    pub fn as_signed(&self) -> i64 {
        match self {
            MaxDepth::Unbounded => -1,
            MaxDepth::Limited(d) => *d as i64,
        }
    }

    /// Whether a concept reached at `depth` may be expanded
    pub fn allows(&self, depth: usize) -> bool {
        match self {
            MaxDepth::Unbounded => true,
            MaxDepth::Limited(limit) => depth < *limit,
        }
    }
}

impl From<MaxDepth> for i64 {
    fn from(depth: MaxDepth) -> i64 {
        depth.as_signed()
    }
}

impl TryFrom<i64> for MaxDepth {
    type Error = TraversalError;

    fn try_from(depth: i64) -> Result<Self, Self::Error> {
        MaxDepth::from_signed(depth)
    }
}

impl fmt::Display for MaxDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxDepth::Unbounded => write!(f, "unbounded"),
            MaxDepth::Limited(d) => write!(f, "{}", d),
        }
    }
}

/// A concept expansion, in the order traversal performed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub label: String,
    pub depth: usize,
}

/// Triples reachable from a start concept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traversal {
    /// Triples per depth, unique within a bucket, in discovery order.
    /// Every expanded concept opens its bucket, so buckets may be empty.
    pub by_depth: BTreeMap<usize, Vec<Triple>>,
    /// Triples across all depths, unique, in first-discovery order
    pub triples: Vec<Triple>,
    /// Concepts expanded, each exactly once
    pub visits: Vec<Visit>,
}

impl Traversal {
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Deepest bucket opened, if any concept was expanded
    pub fn max_depth_reached(&self) -> Option<usize> {
        self.by_depth.keys().next_back().copied()
    }

    /// Depth at which a concept was first expanded
    pub fn depth_of(&self, label: &str) -> Option<usize> {
        self.visits
            .iter()
            .find(|v| v.label == label)
            .map(|v| v.depth)
    }
}
