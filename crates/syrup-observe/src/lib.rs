//! Observability for Syrup: tracing subscriber setup and optional
//! OpenTelemetry trace export.

pub mod tracing_setup;
