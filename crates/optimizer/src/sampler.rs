use crate::error::OptimizerError;
use analytics::{ReturnStatistics, ReturnStats};
use core_types::{AssetUniverse, PortfolioSample, ReturnTable, WeightVector};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator};
use rand::Rng;
use rayon::prelude::*;

pub const DEFAULT_PERIODS_PER_YEAR: u32 = 252;
pub const DEFAULT_MAX_DRAW_ATTEMPTS: u32 = 16;

/// Monte Carlo sampler of long-only portfolios.
///
/// Each draw takes one uniform value in `[0, 1)` per asset and rescales the
/// vector to sum to one. The result is not uniform over the simplex; weights
/// cluster around the equal-weight portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioSampler {
    periods_per_year: u32,
    max_draw_attempts: u32,
    parallel: bool,
    progress: ProgressBar,
}

impl Default for PortfolioSampler {
    fn default() -> Self {
        Self {
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            max_draw_attempts: DEFAULT_MAX_DRAW_ATTEMPTS,
            parallel: true,
            progress: ProgressBar::hidden(),
        }
    }
}

impl PortfolioSampler {
    /// Creates a sampler annualizing over `periods_per_year` return periods.
    pub fn new(periods_per_year: u32) -> Result<Self, OptimizerError> {
        if periods_per_year == 0 {
            return Err(OptimizerError::InvalidParameters(
                "periods_per_year must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            periods_per_year,
            ..Self::default()
        })
    }

    /// Bounds the redraws of a zero-sum weight vector before giving up.
    pub fn with_max_draw_attempts(mut self, attempts: u32) -> Result<Self, OptimizerError> {
        if attempts == 0 {
            return Err(OptimizerError::InvalidParameters(
                "max_draw_attempts must be greater than 0".to_string(),
            ));
        }
        self.max_draw_attempts = attempts;
        Ok(self)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reports evaluation progress on `progress`; its length is set per run.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Computes statistics for `returns` and draws `count` portfolios from them.
    pub fn sample<R: Rng>(
        &self,
        returns: &ReturnTable,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<PortfolioSample>, OptimizerError> {
        let stats = ReturnStatistics::new().compute(returns)?;
        self.sample_from_stats(&stats, count, rng)
    }

    /// Draws `count` portfolios and evaluates them against `stats`.
    ///
    /// The random source is consumed on the calling thread only, before any
    /// evaluation starts, so a fixed seed yields the same samples whether or
    /// not evaluation runs in parallel. Output order is draw order.
    pub fn sample_from_stats<R: Rng>(
        &self,
        stats: &ReturnStats,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<PortfolioSample>, OptimizerError> {
        // 1. Draw all weight vectors sequentially.
        let draws = (0..count)
            .map(|_| self.draw_weights(&stats.assets, rng))
            .collect::<Result<Vec<_>, _>>()?;

        // 2. Evaluate them, possibly on the rayon pool.
        self.progress.set_length(count as u64);
        let samples: Vec<PortfolioSample> = if self.parallel {
            draws
                .into_par_iter()
                .progress_with(self.progress.clone())
                .map(|weights| self.evaluate(stats, weights))
                .collect()
        } else {
            draws
                .into_iter()
                .progress_with(self.progress.clone())
                .map(|weights| self.evaluate(stats, weights))
                .collect()
        };

        tracing::debug!(
            count,
            assets = stats.assets.len(),
            parallel = self.parallel,
            "Sampled portfolios."
        );
        Ok(samples)
    }

    /// Annualized return, volatility and Sharpe ratio of a fixed allocation.
    pub fn evaluate(&self, stats: &ReturnStats, weights: WeightVector) -> PortfolioSample {
        let ppy = f64::from(self.periods_per_year);
        let w = weights.values();

        let annual_return = dot(&stats.mean, w) * ppy;

        let variance = dot(w, &mat_vec_mul(&stats.covariance, w)) * ppy;
        let annual_volatility = variance.max(0.0).sqrt();

        PortfolioSample {
            weights,
            annual_return,
            annual_volatility,
            sharpe_ratio: sharpe_ratio(annual_return, annual_volatility),
        }
    }

    fn draw_weights<R: Rng>(
        &self,
        assets: &AssetUniverse,
        rng: &mut R,
    ) -> Result<WeightVector, OptimizerError> {
        for attempt in 1..=self.max_draw_attempts {
            let raw: Vec<f64> = (0..assets.len()).map(|_| rng.random::<f64>()).collect();
            if let Some(weights) = WeightVector::normalized(assets.clone(), raw) {
                return Ok(weights);
            }
            tracing::warn!(
                attempt,
                max_attempts = self.max_draw_attempts,
                "Weight draw summed to zero, drawing again."
            );
        }
        Err(OptimizerError::DegenerateWeightDraw {
            attempts: self.max_draw_attempts,
        })
    }
}

/// `return / volatility`, with a sign-carrying sentinel when volatility is zero.
pub fn sharpe_ratio(annual_return: f64, annual_volatility: f64) -> f64 {
    if annual_volatility > 0.0 {
        annual_return / annual_volatility
    } else if annual_return > 0.0 {
        f64::INFINITY
    } else if annual_return < 0.0 {
        f64::NEG_INFINITY
    } else {
        f64::NAN
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn mat_vec_mul(matrix: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    matrix.iter().map(|row| dot(row, v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use core_types::WEIGHT_SUM_TOLERANCE;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn returns() -> ReturnTable {
        let assets = AssetUniverse::new(["A", "B", "C"]).unwrap();
        let rows = vec![
            vec![0.010, 0.020, -0.004],
            vec![-0.010, 0.000, 0.003],
            vec![0.020, 0.010, 0.001],
            vec![0.005, -0.015, 0.002],
            vec![-0.002, 0.012, -0.001],
        ];
        let dates = (0..rows.len())
            .map(|i| NaiveDate::from_ymd_opt(2023, 3, 1 + i as u32).unwrap())
            .collect();
        ReturnTable::new(assets, dates, rows).unwrap()
    }

    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn weights_lie_on_the_simplex() {
        let sampler = PortfolioSampler::default();
        let mut rng = StdRng::seed_from_u64(7);

        let samples = sampler.sample(&returns(), 500, &mut rng).unwrap();

        assert_eq!(samples.len(), 500);
        for sample in &samples {
            let total: f64 = sample.weights.values().iter().sum();
            assert!((total - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
            assert!(sample.weights.values().iter().all(|w| *w >= 0.0));
            assert!(sample.annual_volatility >= 0.0);
        }
    }

    #[test]
    fn fixed_seed_is_reproducible_across_execution_modes() {
        let table = returns();
        let parallel = PortfolioSampler::default().with_parallel(true);
        let sequential = PortfolioSampler::default().with_parallel(false);

        let a = parallel
            .sample(&table, 200, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = sequential
            .sample(&table, 200, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let c = parallel
            .sample(&table, 200, &mut StdRng::seed_from_u64(43))
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn evaluation_annualizes_mean_and_covariance() {
        let table = returns();
        let stats = ReturnStatistics::new().compute(&table).unwrap();
        let sampler = PortfolioSampler::new(12).unwrap();

        let weights = WeightVector::new(table.assets().clone(), vec![1.0, 0.0, 0.0]).unwrap();
        let sample = sampler.evaluate(&stats, weights);

        assert_relative_eq!(sample.annual_return, stats.mean[0] * 12.0, epsilon = 1e-12);
        assert_relative_eq!(
            sample.annual_volatility,
            (stats.covariance[0][0] * 12.0).sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            sample.sharpe_ratio,
            sample.annual_return / sample.annual_volatility,
            epsilon = 1e-12
        );
    }

    #[test]
    fn zero_volatility_yields_sentinels() {
        assert_eq!(sharpe_ratio(0.1, 0.0), f64::INFINITY);
        assert_eq!(sharpe_ratio(-0.1, 0.0), f64::NEG_INFINITY);
        assert!(sharpe_ratio(0.0, 0.0).is_nan());

        let assets = AssetUniverse::new(["CASH"]).unwrap();
        let dates = (1..=3)
            .map(|d| NaiveDate::from_ymd_opt(2023, 1, d).unwrap())
            .collect();
        let flat = ReturnTable::new(assets, dates, vec![vec![0.25]; 3]).unwrap();

        let samples = PortfolioSampler::default()
            .sample(&flat, 3, &mut StdRng::seed_from_u64(1))
            .unwrap();

        for sample in samples {
            assert_eq!(sample.annual_volatility, 0.0);
            assert_eq!(sample.sharpe_ratio, f64::INFINITY);
            assert!(!sample.sharpe_is_defined());
        }
    }

    #[test]
    fn exhausted_redraws_are_fatal() {
        let sampler = PortfolioSampler::default()
            .with_max_draw_attempts(3)
            .unwrap();

        let result = sampler.sample(&returns(), 1, &mut ZeroRng);

        assert_eq!(
            result,
            Err(OptimizerError::DegenerateWeightDraw { attempts: 3 })
        );
    }

    #[test]
    fn insufficient_history_is_reported() {
        let assets = AssetUniverse::new(["A"]).unwrap();
        let single = ReturnTable::new(
            assets,
            vec![NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()],
            vec![vec![0.01]],
        )
        .unwrap();

        assert!(matches!(
            PortfolioSampler::default().sample(&single, 10, &mut StdRng::seed_from_u64(0)),
            Err(OptimizerError::Analytics(_))
        ));
    }

    #[test]
    fn zero_periods_per_year_is_rejected() {
        assert!(PortfolioSampler::new(0).is_err());
    }
}
