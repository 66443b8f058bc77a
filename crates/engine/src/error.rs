use analytics::AnalyticsError;
use chrono::NaiveDate;
use configuration::AnalysisConfig;
use core_types::CoreError;
use market_data::MarketDataError;
use optimizer::OptimizerError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The step of an analysis run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    Fetch,
    Returns,
    Statistics,
    Sampling,
    Selection,
    Drawdown,
    Metadata,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisStage::Fetch => "fetch",
            AnalysisStage::Returns => "returns",
            AnalysisStage::Statistics => "statistics",
            AnalysisStage::Sampling => "sampling",
            AnalysisStage::Selection => "selection",
            AnalysisStage::Drawdown => "drawdown",
            AnalysisStage::Metadata => "metadata",
        };
        f.write_str(name)
    }
}

/// The underlying cause of a failed stage.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Optimizer error: {0}")]
    Optimizer(#[from] OptimizerError),

    #[error("Invalid input: {0}")]
    Core(#[from] CoreError),
}

/// A failed analysis run, with the stage it failed in and the run it belonged to.
#[derive(Error, Debug)]
#[error(
    "Analysis failed during {stage} for [{}] from {start} to {end}: {source}",
    .symbols.join(", ")
)]
pub struct AnalysisError {
    pub stage: AnalysisStage,
    pub symbols: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[source]
    pub source: StageError,
}

impl AnalysisError {
    pub fn new(
        stage: AnalysisStage,
        config: &AnalysisConfig,
        source: impl Into<StageError>,
    ) -> Self {
        Self {
            stage,
            symbols: config.symbols.clone(),
            start: config.start_date,
            end: config.end_date,
            source: source.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
