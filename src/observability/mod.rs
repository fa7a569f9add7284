//! Observability for the snapshot toolkit
//!
//! Structured JSON logging only: one synchronous line per event, severity
//! levels, deterministic field ordering. Restore and surgery milestones are
//! logged so an operator can reconstruct what a one-shot run did; pure
//! queries (status) stay silent.

mod logger;

pub use logger::{Logger, Severity};
