//! Annotation and root-cause assembly
//!
//! Turns a traversal and its evaluation outcomes into an annotated
//! subgraph, the root-cause chains of the selected failure, a drawable
//! graph and a report.

mod annotate;
mod chains;
mod diagnoser;
mod errors;
mod report;
mod visual;

pub use annotate::{annotate, evaluated_view, AnnotatedTriple};
pub use chains::{assemble_root_causes, has_root_causes, RootCauseChain};
pub use diagnoser::{DiagnosticRequest, Diagnoser};
pub use errors::{DiagnosisError, DiagnosisResult};
pub use report::{DiagnosticReport, CONFIRMED_MARKER, NO_ROOT_CAUSES};
pub use visual::{
    VisualEdge, VisualGraph, VisualNode, CLEARED_COLOR, CONFIRMED_COLOR, DEFAULT_COLOR,
    FAILURE_COLOR, ROOT_CAUSE_COLOR, TRIGGER_COLOR,
};
