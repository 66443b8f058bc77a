use crate::error::MarketDataError;
use chrono::NaiveDate;
use core_types::PriceSeries;
use std::collections::HashMap;
use std::path::PathBuf;

/// The abstract interface for a source of historical prices.
///
/// Implementations may return partial histories (missing dates); the analytics
/// alignment step tolerates that. The range is half-open: `[start, end)`.
pub trait PriceSource: Send + Sync {
    /// Fetches the price history of one symbol over `[start, end)`.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, MarketDataError>;
}

/// An in-memory `PriceSource`, useful for tests and for embedding the engine.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
    series: HashMap<String, Vec<(NaiveDate, f64)>>,
}

impl InMemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the full history of a symbol.
    pub fn insert(&mut self, symbol: impl Into<String>, points: Vec<(NaiveDate, f64)>) {
        self.series.insert(symbol.into(), points);
    }

    pub fn with_series(mut self, symbol: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        self.insert(symbol, points);
        self
    }
}

impl PriceSource for InMemoryPriceSource {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, MarketDataError> {
        let points = self
            .series
            .get(symbol)
            .ok_or_else(|| MarketDataError::SymbolNotFound {
                symbol: symbol.to_string(),
                location: PathBuf::from("<memory>"),
            })?;

        let in_range: Vec<(NaiveDate, f64)> = points
            .iter()
            .filter(|(date, _)| *date >= start && *date < end)
            .copied()
            .collect();

        if in_range.is_empty() {
            return Err(MarketDataError::NoData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        Ok(PriceSeries::new(symbol, in_range)?)
    }
}
