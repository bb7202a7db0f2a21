// ============================================================
// Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong to any one adapter:
//
//   config.rs     — AdapterConfig: paths, sampling knobs,
//                   seed, unknown-type policy. Saved and
//                   loaded as JSON.
//
//   telemetry.rs  — tracing subscriber setup with an
//                   env-driven filter.

/// Adapter configuration and JSON persistence
pub mod config;

/// Tracing subscriber initialisation
pub mod telemetry;
