//! # Frontier Engine
//!
//! Orchestrates a single efficient-frontier analysis: fetching prices, deriving
//! returns and statistics, sampling portfolios, selecting the best one and
//! measuring its cumulative return and drawdown. The finished `AnalysisReport`
//! can be exported as JSON and CSV for a presentation layer.
//!
//! ## Public API
//!
//! - `AnalysisEngine`: runs the pipeline against a `PriceSource` and `SymbolDirectory`.
//! - `AnalysisReport`: everything a run produced, serializable with `serde`.
//! - `export`: JSON and CSV writers for a report.
//! - `AnalysisError`: a failed run, tagged with its `AnalysisStage` and run context.

pub mod analysis;
pub mod error;
pub mod export;
pub mod report;

pub use analysis::AnalysisEngine;
pub use error::{AnalysisError, AnalysisStage, ExportError, StageError};
pub use export::{export_all, write_frontier_csv, write_json, write_paths_csv};
pub use report::{AllocationRow, AnalysisReport, RunParameters};
