//! The incremental staged pipeline: per-stage freshness decisions, the per-song orchestrator and
//! the run report.

/// Catalog-wide driver.
pub mod orchestrator;
/// Run report types.
pub mod report;
/// Per-stage freshness decisions and image reconciliation.
pub mod resolver;
