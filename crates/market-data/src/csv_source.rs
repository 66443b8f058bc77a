use crate::error::MarketDataError;
use crate::source::PriceSource;
use chrono::NaiveDate;
use core_types::PriceSeries;
use std::path::PathBuf;

/// Price columns accepted by the loader, in order of preference.
const PRICE_COLUMNS: [&str; 3] = ["adj_close", "adj close", "close"];

/// Reads price histories from a directory holding one `<SYMBOL>.csv` per asset.
///
/// Each file needs a header row with a `date` column (`YYYY-MM-DD`) and a price
/// column; `adj_close` is preferred over `close` when both exist. Empty, `NaN`
/// or `null` price cells are treated as missing quotes and skipped.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol))
    }
}

impl PriceSource for CsvPriceSource {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, MarketDataError> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(MarketDataError::SymbolNotFound {
                symbol: symbol.to_string(),
                location: path,
            });
        }

        let origin = path.display().to_string();
        let invalid = |reason: String| MarketDataError::InvalidData {
            origin: origin.clone(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)?;

        // 1. Locate the date and price columns from the header row.
        let headers = reader.headers()?.clone();
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let date_idx = find("date").ok_or_else(|| invalid("missing 'date' column".to_string()))?;
        let price_idx = PRICE_COLUMNS
            .iter()
            .find_map(|name| find(name))
            .ok_or_else(|| invalid("missing 'adj_close' or 'close' column".to_string()))?;

        // 2. Parse rows inside the requested range, skipping missing quotes.
        let mut points = Vec::new();
        let mut missing = 0usize;
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let line = i + 2;

            let raw_date = record.get(date_idx).unwrap_or_default();
            let raw_date = raw_date.get(..10).unwrap_or(raw_date);
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
                .map_err(|e| invalid(format!("line {}: bad date '{}': {}", line, raw_date, e)))?;
            if date < start || date >= end {
                continue;
            }

            let raw_price = record.get(price_idx).unwrap_or_default();
            if raw_price.is_empty()
                || raw_price.eq_ignore_ascii_case("nan")
                || raw_price.eq_ignore_ascii_case("null")
            {
                missing += 1;
                continue;
            }
            let price: f64 = raw_price
                .parse()
                .map_err(|e| invalid(format!("line {}: bad price '{}': {}", line, raw_price, e)))?;
            points.push((date, price));
        }

        // 3. Files are not required to be sorted, but dates must be unique.
        points.sort_by_key(|(date, _)| *date);
        if let Some(window) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(invalid(format!("duplicate date {}", window[0].0)));
        }

        if points.is_empty() {
            return Err(MarketDataError::NoData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        tracing::debug!(
            symbol,
            rows = points.len(),
            missing,
            path = %path.display(),
            "Loaded price history."
        );

        Ok(PriceSeries::new(symbol, points)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, m, d).unwrap()
    }

    #[test]
    fn loads_adjusted_close_within_range() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("AAPL.csv"),
            "date,open,close,adj_close\n\
             2021-01-05,1,10.0,9.5\n\
             2021-01-04,1,9.0,8.5\n\
             2021-01-06,1,11.0,\n\
             2021-01-07,1,12.0,11.5\n\
             2021-02-01,1,13.0,12.5\n",
        )
        .unwrap();

        let source = CsvPriceSource::new(dir.path());
        let series = source.fetch("AAPL", day(1, 1), day(2, 1)).unwrap();

        assert_eq!(
            series.points(),
            &[(day(1, 4), 8.5), (day(1, 5), 9.5), (day(1, 7), 11.5)]
        );
    }

    #[test]
    fn falls_back_to_close_column() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("MSFT.csv"),
            "Date,Close\n2021-01-04 00:00:00,200.0\n2021-01-05,201.0\n",
        )
        .unwrap();

        let series = CsvPriceSource::new(dir.path())
            .fetch("MSFT", day(1, 1), day(12, 31))
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0], (day(1, 4), 200.0));
    }

    #[test]
    fn missing_file_is_symbol_not_found() {
        let dir = tempdir().unwrap();
        let result = CsvPriceSource::new(dir.path()).fetch("NOPE", day(1, 1), day(2, 1));
        assert!(matches!(result, Err(MarketDataError::SymbolNotFound { .. })));
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("DUP.csv"),
            "date,close\n2021-01-04,1.0\n2021-01-04,2.0\n",
        )
        .unwrap();

        let result = CsvPriceSource::new(dir.path()).fetch("DUP", day(1, 1), day(2, 1));
        assert!(matches!(result, Err(MarketDataError::InvalidData { .. })));
    }
}
