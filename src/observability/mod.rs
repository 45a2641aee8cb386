//! Observability for faultgraph
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Scope-based begin/complete tracing
//!
//! Observability is read-only: nothing here influences a diagnostic outcome.
//!
//! ```ignore
//! use faultgraph::observability::{Logger, Event, ObservationScope};
//!
//! Logger::info("TRIGGER_EVALUATED", &[("trigger", "VoltageDrop")]);
//!
//! let scope = ObservationScope::new("DIAGNOSIS");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

/// Log a lifecycle event at INFO, or ERROR for run-ending events
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_failure() {
        Severity::Error
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
