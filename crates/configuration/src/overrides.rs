use crate::settings::Config;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Per-invocation values that take precedence over the loaded configuration.
///
/// With the `clap` feature enabled this struct can be flattened directly into a
/// command's arguments.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct AnalysisOverrides {
    /// Comma-separated asset symbols (e.g., "AAPL,MSFT,AMZN").
    #[cfg_attr(feature = "clap", arg(long, value_delimiter = ','))]
    pub symbols: Option<Vec<String>>,

    /// The start date of the price history (format: YYYY-MM-DD).
    #[cfg_attr(feature = "clap", arg(long))]
    pub from: Option<NaiveDate>,

    /// The end date of the price history, exclusive (format: YYYY-MM-DD).
    #[cfg_attr(feature = "clap", arg(long))]
    pub to: Option<NaiveDate>,

    /// Number of random portfolios to sample.
    #[cfg_attr(feature = "clap", arg(long))]
    pub samples: Option<usize>,

    /// Periods per year used for annualization.
    #[cfg_attr(feature = "clap", arg(long))]
    pub periods_per_year: Option<u32>,

    /// Seed for the random weight sampler, for reproducible runs.
    #[cfg_attr(feature = "clap", arg(long))]
    pub seed: Option<u64>,

    /// Directory holding one `<SYMBOL>.csv` price file per asset.
    #[cfg_attr(feature = "clap", arg(long))]
    pub price_dir: Option<PathBuf>,

    /// Evaluate sampled portfolios on a single thread.
    #[cfg_attr(feature = "clap", arg(long))]
    pub sequential: bool,
}

impl Config {
    /// Applies command-line overrides on top of the file/environment values.
    ///
    /// Call `validate` afterwards; overrides are not checked here.
    pub fn apply_overrides(&mut self, overrides: &AnalysisOverrides) {
        if let Some(symbols) = &overrides.symbols {
            self.analysis.symbols = symbols.clone();
        }
        if let Some(from) = overrides.from {
            self.analysis.start_date = from;
        }
        if let Some(to) = overrides.to {
            self.analysis.end_date = to;
        }
        if let Some(samples) = overrides.samples {
            self.analysis.sample_count = samples;
        }
        if let Some(periods) = overrides.periods_per_year {
            self.analysis.periods_per_year = periods;
        }
        if let Some(seed) = overrides.seed {
            self.analysis.random_seed = Some(seed);
        }
        if let Some(dir) = &overrides.price_dir {
            self.data.price_dir = dir.clone();
        }
        if overrides.sequential {
            self.analysis.parallel = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut config = Config::default();
        let overrides = AnalysisOverrides {
            symbols: Some(vec!["SPY".into(), "TLT".into()]),
            seed: Some(42),
            sequential: true,
            ..AnalysisOverrides::default()
        };

        config.apply_overrides(&overrides);

        assert_eq!(config.analysis.symbols, vec!["SPY".to_string(), "TLT".to_string()]);
        assert_eq!(config.analysis.random_seed, Some(42));
        assert!(!config.analysis.parallel);
        assert_eq!(config.analysis.sample_count, 10_000);
    }
}
