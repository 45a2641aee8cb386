//! faultgraph - knowledge-graph failure diagnosis over equipment telemetry
//!
//! A failure concept is expanded through the relationship graph, every
//! trigger found is verified against one run's telemetry, and the confirmed
//! root-cause / trigger / data-channel chains are reported.

pub mod cli;
pub mod diagnosis;
pub mod evidence;
pub mod graph;
pub mod observability;
pub mod rules;
pub mod traversal;
