// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Statement Pipeline - Core Library
//!
//! Deterministic analytics over daily per-account trading statements.
//! Ingestion hands this crate validated per-day records; the pipeline
//! derives return and drawdown series, daily risk metrics, cohort scores
//! and ranks, behavioral anomaly alerts and threshold alerts, and upserts
//! the results through a repository boundary for the risk dashboard.
//!
//! # Layout
//!
//! - `models`: record types keyed by their natural keys
//! - `pipeline`: the derivation stages and the orchestrating runner
//! - `config`: every policy table (bands, thresholds, weights) as YAML
//! - `storage`: upsert ports plus the in-memory adapter
//! - `ingest`: statement batch loading (the producer boundary)
//! - `snapshot`: the dashboard projection (the consumer boundary)
//!
//! # Guarantees
//!
//! - Reruns over identical input produce identical stored records.
//! - One strategy's data defect never aborts the cohort.
//! - Missing data flows as `None`, never as zero.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration loading and policy tables.
pub mod config;

/// Error taxonomy.
pub mod error;

/// Statement batch loading.
pub mod ingest;

/// Record types.
pub mod models;

/// Derivation stages and the pipeline runner.
pub mod pipeline;

/// Dashboard snapshot projection.
pub mod snapshot;

/// Persistence ports and adapters.
pub mod storage;

/// Tracing setup.
pub mod telemetry;

pub use config::{Config, load_config};
pub use error::PipelineError;
pub use ingest::{StatementBatch, load_batch};
pub use pipeline::{Pipeline, PipelineOutput};
pub use snapshot::{DashboardSnapshot, build_snapshot};
pub use storage::{DerivedStore, InMemoryDerivedStore, persist_output};
