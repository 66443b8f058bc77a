use crate::error::CoreError;
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::sync::Arc;

/// Tolerance used when checking that a weight vector sums to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

// ==============================================================================
// Asset Universe
// ==============================================================================

/// The explicit, immutable ordering of assets for one analysis run.
///
/// Every table, statistic and weight vector of a run carries the same universe,
/// so positional data can never be combined across mismatched orderings.
/// Cloning is cheap: the symbol list is shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AssetUniverse {
    symbols: Arc<[String]>,
}

impl AssetUniverse {
    /// Builds a universe from an ordered list of symbols.
    ///
    /// The list must be non-empty and free of blank or duplicate symbols.
    pub fn new<I, S>(symbols: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols
            .into_iter()
            .map(|s| s.into().trim().to_string())
            .collect();

        if symbols.is_empty() {
            return Err(CoreError::InvalidInput(
                "asset universe".to_string(),
                "at least one symbol is required".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if symbol.is_empty() {
                return Err(CoreError::InvalidInput(
                    "asset universe".to_string(),
                    "symbols must not be blank".to_string(),
                ));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(CoreError::InvalidInput(
                    "asset universe".to_string(),
                    format!("duplicate symbol '{}'", symbol),
                ));
            }
        }

        Ok(Self {
            symbols: symbols.into(),
        })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Number of assets; a constructed universe always holds at least one.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// Fails unless `other` has exactly the same symbols in the same order.
    pub fn ensure_same(&self, other: &AssetUniverse) -> Result<(), CoreError> {
        if Arc::ptr_eq(&self.symbols, &other.symbols) || self.symbols == other.symbols {
            Ok(())
        } else {
            Err(CoreError::AssetMismatch {
                expected: self.symbols.to_vec(),
                found: other.symbols.to_vec(),
            })
        }
    }
}

impl TryFrom<Vec<String>> for AssetUniverse {
    type Error = CoreError;

    fn try_from(symbols: Vec<String>) -> Result<Self, Self::Error> {
        AssetUniverse::new(symbols)
    }
}

impl From<AssetUniverse> for Vec<String> {
    fn from(universe: AssetUniverse) -> Self {
        universe.symbols.to_vec()
    }
}

// ==============================================================================
// Prices and Returns
// ==============================================================================

/// The price history of a single asset, ordered by strictly increasing date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<(NaiveDate, f64)>,
}

impl PriceSeries {
    /// Creates a series, validating date order and price positivity.
    pub fn new(symbol: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Result<Self, CoreError> {
        let symbol = symbol.into();

        if let Some(window) = points.windows(2).find(|w| w[1].0 <= w[0].0) {
            return Err(CoreError::InvalidInput(
                format!("price series '{}'", symbol),
                format!("dates must be strictly increasing ({} then {})", window[0].0, window[1].0),
            ));
        }
        if let Some((date, price)) = points.iter().find(|(_, p)| !p.is_finite() || *p <= 0.0) {
            return Err(CoreError::InvalidInput(
                format!("price series '{}'", symbol),
                format!("price on {} must be finite and positive, got {}", date, price),
            ));
        }

        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Several price series aligned on the union of their dates.
///
/// Each row holds one optional price per asset, in universe order; `None` marks
/// a date on which that asset had no quote.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    assets: AssetUniverse,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    pub fn new(
        assets: AssetUniverse,
        dates: Vec<NaiveDate>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, CoreError> {
        check_dated_rows(&assets, &dates, &rows, "price table")?;
        Ok(Self { assets, dates, rows })
    }

    pub fn assets(&self) -> &AssetUniverse {
        &self.assets
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Per-period fractional returns, one row per date and one column per asset.
///
/// Every row is complete: rows with missing data never enter a return table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReturnTableFields")]
pub struct ReturnTable {
    assets: AssetUniverse,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
}

impl ReturnTable {
    pub fn new(
        assets: AssetUniverse,
        dates: Vec<NaiveDate>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, CoreError> {
        check_dated_rows(&assets, &dates, &rows, "return table")?;
        if let Some((t, _)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.iter().any(|r| !r.is_finite()))
        {
            return Err(CoreError::InvalidInput(
                "return table".to_string(),
                format!("non-finite return on {}", dates[t]),
            ));
        }
        Ok(Self { assets, dates, rows })
    }

    pub fn assets(&self) -> &AssetUniverse {
        &self.assets
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Iterates over the returns of the asset at `index`, in date order.
    pub fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[index])
    }

    /// Number of aligned observations (rows).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Deserialized form of a `ReturnTable`, checked by `ReturnTable::new`.
#[derive(Deserialize)]
struct ReturnTableFields {
    assets: AssetUniverse,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
}

impl TryFrom<ReturnTableFields> for ReturnTable {
    type Error = CoreError;

    fn try_from(fields: ReturnTableFields) -> Result<Self, Self::Error> {
        ReturnTable::new(fields.assets, fields.dates, fields.rows)
    }
}

fn check_dated_rows<T>(
    assets: &AssetUniverse,
    dates: &[NaiveDate],
    rows: &[Vec<T>],
    what: &'static str,
) -> Result<(), CoreError> {
    if dates.len() != rows.len() {
        return Err(CoreError::LengthMismatch {
            what,
            expected: dates.len(),
            found: rows.len(),
        });
    }
    if let Some(row) = rows.iter().find(|row| row.len() != assets.len()) {
        return Err(CoreError::LengthMismatch {
            what,
            expected: assets.len(),
            found: row.len(),
        });
    }
    if let Some(window) = dates.windows(2).find(|w| w[1] <= w[0]) {
        return Err(CoreError::InvalidInput(
            what.to_string(),
            format!("dates must be strictly increasing ({} then {})", window[0], window[1]),
        ));
    }
    Ok(())
}

// ==============================================================================
// Portfolios
// ==============================================================================

/// Non-negative allocation fractions over an asset universe, summing to one.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    assets: AssetUniverse,
    values: Vec<f64>,
}

impl WeightVector {
    /// Creates a weight vector from values that already satisfy the simplex invariant.
    pub fn new(assets: AssetUniverse, values: Vec<f64>) -> Result<Self, CoreError> {
        if values.len() != assets.len() {
            return Err(CoreError::LengthMismatch {
                what: "weight vector",
                expected: assets.len(),
                found: values.len(),
            });
        }
        if values.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CoreError::InvalidInput(
                "weight vector".to_string(),
                "weights must be finite and non-negative".to_string(),
            ));
        }
        let total: f64 = values.iter().sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CoreError::InvalidInput(
                "weight vector".to_string(),
                format!("weights must sum to 1.0, got {}", total),
            ));
        }
        Ok(Self { assets, values })
    }

    /// Rescales raw non-negative values so they sum to one.
    ///
    /// Returns `None` when the raw values sum to zero (or to anything that is not
    /// a positive finite number), which callers treat as a degenerate draw.
    pub fn normalized(assets: AssetUniverse, raw: Vec<f64>) -> Option<Self> {
        if raw.len() != assets.len() || raw.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let total: f64 = raw.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return None;
        }
        let values = raw.into_iter().map(|w| w / total).collect();
        Some(Self { assets, values })
    }

    /// The equally weighted portfolio.
    pub fn equal(assets: AssetUniverse) -> Self {
        let n = assets.len();
        Self {
            values: vec![1.0 / n as f64; n],
            assets,
        }
    }

    pub fn assets(&self) -> &AssetUniverse {
        &self.assets
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.assets.index_of(symbol).map(|i| self.values[i])
    }

    /// Iterates over `(symbol, weight)` pairs in universe order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.assets.iter().zip(self.values.iter().copied())
    }
}

impl Serialize for WeightVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (symbol, weight) in self.iter() {
            map.serialize_entry(symbol, &weight)?;
        }
        map.end()
    }
}

/// One evaluated candidate portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSample {
    pub weights: WeightVector,
    /// Annualized expected return.
    pub annual_return: f64,
    /// Annualized volatility (standard deviation), never negative.
    pub annual_volatility: f64,
    /// `annual_return / annual_volatility`, or a sentinel when volatility is zero:
    /// `+inf` for a positive return, `-inf` for a negative one, `NaN` for zero.
    pub sharpe_ratio: f64,
}

impl PortfolioSample {
    /// False when the Sharpe ratio is one of the zero-volatility sentinels.
    pub fn sharpe_is_defined(&self) -> bool {
        self.sharpe_ratio.is_finite()
    }
}

// ==============================================================================
// Paths
// ==============================================================================

/// Cumulative portfolio returns indexed by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeReturnPath {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl CumulativeReturnPath {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, CoreError> {
        if dates.len() != values.len() {
            return Err(CoreError::LengthMismatch {
                what: "cumulative return path",
                expected: dates.len(),
                found: values.len(),
            });
        }
        Ok(Self { dates, values })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The underwater curve of a cumulative return path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownPath {
    dates: Vec<NaiveDate>,
    drawdowns: Vec<f64>,
    high_water_marks: Vec<f64>,
}

impl DrawdownPath {
    pub fn new(
        dates: Vec<NaiveDate>,
        drawdowns: Vec<f64>,
        high_water_marks: Vec<f64>,
    ) -> Result<Self, CoreError> {
        for (what, found) in [
            ("drawdown series", drawdowns.len()),
            ("high-water-mark series", high_water_marks.len()),
        ] {
            if found != dates.len() {
                return Err(CoreError::LengthMismatch {
                    what,
                    expected: dates.len(),
                    found,
                });
            }
        }
        Ok(Self {
            dates,
            drawdowns,
            high_water_marks,
        })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn drawdowns(&self) -> &[f64] {
        &self.drawdowns
    }

    pub fn high_water_marks(&self) -> &[f64] {
        &self.high_water_marks
    }

    /// The most negative drawdown, or 0.0 for a path that never dipped.
    pub fn max_drawdown(&self) -> f64 {
        self.drawdowns.iter().copied().fold(0.0, f64::min)
    }

    pub fn len(&self) -> usize {
        self.drawdowns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawdowns.is_empty()
    }
}
