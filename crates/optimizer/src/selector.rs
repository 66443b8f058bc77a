use crate::error::OptimizerError;
use core_types::PortfolioSample;

/// Picks the maximum-Sharpe portfolio out of a set of samples.
#[derive(Debug, Default)]
pub struct FrontierSelector {}

impl FrontierSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index and sample with the highest Sharpe ratio.
    ///
    /// Ties go to the earliest sample. `+inf` beats every finite ratio and a
    /// `NaN` ratio never beats a comparable one; when every ratio is `NaN` the
    /// first sample is returned.
    pub fn select_best<'a>(
        &self,
        samples: &'a [PortfolioSample],
    ) -> Result<(usize, &'a PortfolioSample), OptimizerError> {
        let (first, rest) = samples.split_first().ok_or_else(|| {
            OptimizerError::EmptyInput("no portfolio samples to select from".to_string())
        })?;

        let mut best = (0, first);
        for (offset, candidate) in rest.iter().enumerate() {
            if beats(candidate.sharpe_ratio, best.1.sharpe_ratio) {
                best = (offset + 1, candidate);
            }
        }

        tracing::debug!(
            index = best.0,
            sharpe = best.1.sharpe_ratio,
            candidates = samples.len(),
            "Selected maximum-Sharpe portfolio."
        );
        Ok(best)
    }
}

fn beats(candidate: f64, incumbent: f64) -> bool {
    match (candidate.is_nan(), incumbent.is_nan()) {
        (true, _) => false,
        (false, true) => true,
        (false, false) => candidate > incumbent,
    }
}
