use crate::error::{AnalysisError, AnalysisStage, StageError};
use crate::report::{AllocationRow, AnalysisReport, RunParameters};
use analytics::{DrawdownEngine, ReturnStatistics, cumulative_returns, returns_from_prices};
use configuration::AnalysisConfig;
use indicatif::ProgressBar;
use market_data::{PriceSource, SymbolDirectory};
use optimizer::{FrontierSelector, PortfolioSampler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::info;

/// Runs one efficient-frontier analysis from price fetch to drawdown.
pub struct AnalysisEngine {
    prices: Arc<dyn PriceSource>,
    directory: Arc<dyn SymbolDirectory>,
    progress: ProgressBar,
}

impl AnalysisEngine {
    pub fn new(prices: Arc<dyn PriceSource>, directory: Arc<dyn SymbolDirectory>) -> Self {
        Self {
            prices,
            directory,
            progress: ProgressBar::hidden(),
        }
    }

    /// Reports sampling progress on `progress`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Runs the analysis with a random source seeded from the configuration.
    ///
    /// Without a configured seed a fresh one is drawn, logged and recorded in
    /// the report so the run can be replayed.
    pub fn run(&self, config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
        let seed = match config.random_seed {
            Some(seed) => seed,
            None => {
                let seed = rand::rng().random::<u64>();
                info!(seed, "No random seed configured, drew a fresh one.");
                seed
            }
        };

        let mut rng = StdRng::seed_from_u64(seed);
        let mut report = self.run_with_rng(config, &mut rng)?;
        report.parameters.seed = Some(seed);
        Ok(report)
    }

    /// Runs the analysis drawing weights from `rng`.
    pub fn run_with_rng<R: Rng>(
        &self,
        config: &AnalysisConfig,
        rng: &mut R,
    ) -> Result<AnalysisReport, AnalysisError> {
        let fail =
            |stage: AnalysisStage, source: StageError| AnalysisError::new(stage, config, source);

        info!(
            symbols = ?config.symbols,
            start = %config.start_date,
            end = %config.end_date,
            samples = config.sample_count,
            "Starting efficient-frontier analysis."
        );

        // --- 1. Fetch ---
        let series = config
            .symbols
            .iter()
            .map(|symbol| {
                self.prices
                    .fetch(symbol, config.start_date, config.end_date)
                    .map_err(|e| fail(AnalysisStage::Fetch, e.into()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!(stage = %AnalysisStage::Fetch, series = series.len(), "Price histories loaded.");

        // --- 2. Returns ---
        let returns =
            returns_from_prices(&series).map_err(|e| fail(AnalysisStage::Returns, e.into()))?;
        info!(stage = %AnalysisStage::Returns, observations = returns.len(), "Returns aligned.");

        // --- 3. Statistics ---
        let stats = ReturnStatistics::new()
            .compute(&returns)
            .map_err(|e| fail(AnalysisStage::Statistics, e.into()))?;

        // --- 4. Sampling ---
        let sampler = PortfolioSampler::new(config.periods_per_year)
            .and_then(|s| s.with_max_draw_attempts(config.max_draw_attempts))
            .map_err(|e| fail(AnalysisStage::Sampling, e.into()))?
            .with_parallel(config.parallel)
            .with_progress(self.progress.clone());
        let samples = sampler
            .sample_from_stats(&stats, config.sample_count, rng)
            .map_err(|e| fail(AnalysisStage::Sampling, e.into()))?;
        info!(stage = %AnalysisStage::Sampling, samples = samples.len(), "Portfolios sampled.");

        // --- 5. Selection ---
        let (best_index, best) = FrontierSelector::new()
            .select_best(&samples)
            .map_err(|e| fail(AnalysisStage::Selection, e.into()))?;
        let best = best.clone();
        info!(
            stage = %AnalysisStage::Selection,
            index = best_index,
            annual_return = best.annual_return,
            annual_volatility = best.annual_volatility,
            sharpe = best.sharpe_ratio,
            "Best portfolio selected."
        );

        // --- 6. Cumulative path and drawdown of the selected weights ---
        let cumulative = cumulative_returns(&returns, &best.weights, config.cumulative_policy)
            .map_err(|e| fail(AnalysisStage::Drawdown, e.into()))?;
        let drawdown = DrawdownEngine::new()
            .compute_path(&cumulative)
            .map_err(|e| fail(AnalysisStage::Drawdown, e.into()))?;
        let max_drawdown = drawdown.max_drawdown();
        info!(stage = %AnalysisStage::Drawdown, max_drawdown, "Drawdown computed.");

        // --- 7. Metadata ---
        let allocation: Vec<AllocationRow> = best
            .weights
            .iter()
            .map(|(symbol, weight)| AllocationRow {
                symbol: symbol.to_string(),
                name: self.directory.display_name_or_symbol(symbol),
                weight,
            })
            .collect();
        tracing::debug!(stage = %AnalysisStage::Metadata, rows = allocation.len(), "Allocation resolved.");

        Ok(AnalysisReport {
            parameters: RunParameters {
                symbols: config.symbols.clone(),
                start_date: config.start_date,
                end_date: config.end_date,
                sample_count: config.sample_count,
                periods_per_year: config.periods_per_year,
                cumulative_policy: config.cumulative_policy,
                seed: None,
                observations: stats.observations,
            },
            samples,
            best_index,
            best,
            allocation,
            cumulative,
            drawdown,
            max_drawdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use market_data::{InMemoryPriceSource, StaticSymbolDirectory};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn engine() -> AnalysisEngine {
        let prices = InMemoryPriceSource::new()
            .with_series("X", vec![(day(1), 10.0), (day(2), 11.0), (day(3), 10.5), (day(4), 11.2)])
            .with_series("Y", vec![(day(1), 20.0), (day(2), 19.0), (day(3), 19.5), (day(4), 21.0)]);
        let directory = StaticSymbolDirectory::new().with_name("X", "Ex Corp");
        AnalysisEngine::new(Arc::new(prices), Arc::new(directory))
    }

    fn config(symbols: &[&str]) -> AnalysisConfig {
        AnalysisConfig {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            start_date: day(1),
            end_date: day(31),
            sample_count: 50,
            random_seed: Some(5),
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn configured_seed_is_recorded_and_replayable() {
        let engine = engine();
        let first = engine.run(&config(&["X", "Y"])).unwrap();
        let second = engine.run(&config(&["X", "Y"])).unwrap();

        assert_eq!(first.parameters.seed, Some(5));
        assert_eq!(first.samples, second.samples);
        assert_eq!(first.parameters.observations, 3);
    }

    #[test]
    fn missing_seed_is_drawn_and_recorded() {
        let mut config = config(&["X", "Y"]);
        config.random_seed = None;

        let report = engine().run(&config).unwrap();

        assert!(report.parameters.seed.is_some());
    }

    #[test]
    fn allocation_names_fall_back_to_symbols() {
        let report = engine().run(&config(&["X", "Y"])).unwrap();

        assert_eq!(report.allocation[0].name, "Ex Corp");
        assert_eq!(report.allocation[1].name, "Y");
    }

    #[test]
    fn unknown_symbol_fails_in_fetch_stage() {
        let err = engine().run(&config(&["X", "NOPE"])).unwrap_err();

        assert_eq!(err.stage, AnalysisStage::Fetch);
        assert_eq!(err.symbols, vec!["X".to_string(), "NOPE".to_string()]);
        assert!(err.to_string().contains("fetch"));
    }
}
