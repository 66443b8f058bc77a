use crate::error::ConfigError;
use chrono::NaiveDate;
use core_types::CumulativePolicy;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Contains the parameters of a single efficient-frontier analysis run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// The asset symbols to analyze, in the order they are reported.
    pub symbols: Vec<String>,
    /// The first date (inclusive) of the price history.
    pub start_date: NaiveDate,
    /// The last date (exclusive) of the price history.
    pub end_date: NaiveDate,
    /// How many random portfolios to sample.
    pub sample_count: usize,
    /// Periods per year used to annualize return and volatility (252 for daily data).
    pub periods_per_year: u32,
    /// Seed for the random weight sampler. A fresh seed is drawn when absent.
    pub random_seed: Option<u64>,
    /// How many times a zero-sum weight draw is retried before the run fails.
    pub max_draw_attempts: u32,
    /// How periodic returns are accumulated into the cumulative path.
    pub cumulative_policy: CumulativePolicy,
    /// Evaluate sampled portfolios on the rayon thread pool.
    pub parallel: bool,
}

/// Where price histories and symbol display names are read from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding one `<SYMBOL>.csv` price file per asset.
    pub price_dir: PathBuf,
    /// Optional `symbol,name` file with human-readable asset names.
    pub symbols_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub ansi: bool,
}

// --- Default Implementations ---
// These allow a user to omit any section (or the whole file) and still get a
// runnable configuration.

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbols: ["AAPL", "GOOGL", "MSFT", "AMZN", "META"]
                .into_iter()
                .map(String::from)
                .collect(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            sample_count: 10_000,
            periods_per_year: 252,
            random_seed: None,
            max_draw_attempts: 16,
            cumulative_policy: CumulativePolicy::Sum,
            parallel: true,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            price_dir: PathBuf::from("data/prices"),
            symbols_file: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            ansi: true,
        }
    }
}

impl Config {
    /// Normalizes the symbol list and checks that the configuration is runnable.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.analysis.normalize_symbols();
        self.analysis.validate()
    }
}

impl AnalysisConfig {
    /// Trims symbols and removes duplicates, keeping the first occurrence.
    pub fn normalize_symbols(&mut self) {
        let mut seen = HashSet::new();
        self.symbols = self
            .symbols
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::invalid(
                "analysis.symbols",
                "must contain at least one symbol",
            ));
        }
        if self.start_date >= self.end_date {
            return Err(ConfigError::invalid(
                "analysis.start_date",
                format!("{} must be before analysis.end_date ({})", self.start_date, self.end_date),
            ));
        }
        if self.sample_count == 0 {
            return Err(ConfigError::invalid("analysis.sample_count", "must be greater than 0"));
        }
        if self.periods_per_year == 0 {
            return Err(ConfigError::invalid("analysis.periods_per_year", "must be greater than 0"));
        }
        if self.max_draw_attempts == 0 {
            return Err(ConfigError::invalid("analysis.max_draw_attempts", "must be greater than 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.sample_count, 10_000);
        assert_eq!(config.analysis.periods_per_year, 252);
    }

    #[test]
    fn duplicate_symbols_are_removed_in_order() {
        let mut analysis = AnalysisConfig {
            symbols: vec!["MSFT".into(), " AAPL ".into(), "MSFT".into(), "".into()],
            ..AnalysisConfig::default()
        };
        analysis.normalize_symbols();
        assert_eq!(analysis.symbols, vec!["MSFT".to_string(), "AAPL".to_string()]);
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let analysis = AnalysisConfig {
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            analysis.validate(),
            Err(ConfigError::Invalid { field: "analysis.start_date", .. })
        ));
    }

    #[test]
    fn zero_samples_and_empty_symbols_are_rejected() {
        let no_samples = AnalysisConfig {
            sample_count: 0,
            ..AnalysisConfig::default()
        };
        assert!(no_samples.validate().is_err());

        let mut no_symbols = Config::default();
        no_symbols.analysis.symbols = vec!["  ".into()];
        assert!(no_symbols.validate().is_err());
    }
}
