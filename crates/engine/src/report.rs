use chrono::NaiveDate;
use core_types::{CumulativePolicy, CumulativeReturnPath, DrawdownPath, PortfolioSample};
use serde::Serialize;

/// The inputs an analysis ran with, enough to replay it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunParameters {
    pub symbols: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sample_count: usize,
    pub periods_per_year: u32,
    pub cumulative_policy: CumulativePolicy,
    /// The seed the sampler was started from; `None` for a caller-supplied source.
    pub seed: Option<u64>,
    /// Aligned return observations the statistics were computed from.
    pub observations: usize,
}

/// One line of the optimal allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationRow {
    pub symbol: String,
    pub name: String,
    pub weight: f64,
}

/// Everything an analysis run produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub parameters: RunParameters,
    /// Every sampled portfolio, in draw order.
    pub samples: Vec<PortfolioSample>,
    /// Position of `best` within `samples`.
    pub best_index: usize,
    pub best: PortfolioSample,
    pub allocation: Vec<AllocationRow>,
    /// Cumulative return path of the best portfolio.
    pub cumulative: CumulativeReturnPath,
    pub drawdown: DrawdownPath,
    pub max_drawdown: f64,
}
