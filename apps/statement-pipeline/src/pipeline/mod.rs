//! The metrics, scoring and behavior-detection pipeline.
//!
//! Stage order per strategy: normalize → returns → drawdowns → daily risk
//! metrics → behavior detection → statistics. Strategies are independent
//! until the cohort ranking barrier in the runner.

pub mod alerts;
pub mod behavior;
pub mod drawdown;
pub mod math;
pub mod normalizer;
pub mod returns;
pub mod risk_metrics;
pub mod runner;
pub mod scoring;

pub use normalizer::NormalizedSeries;
pub use runner::{Pipeline, PipelineOutput, StrategyFailure};
pub use scoring::CompositeScore;
