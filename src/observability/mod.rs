//! Observability subsystem.
//!
//! All subsystems emit structured tracing events; this module owns the
//! subscriber setup. Panic reports from the dispatch boundary go through
//! the same pipeline at ERROR level.

pub mod logging;
