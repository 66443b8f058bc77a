use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::{AssetUniverse, PriceSeries, PriceTable, ReturnTable};
use std::collections::{BTreeSet, HashMap};

/// Aligns several price series on the union of their dates.
///
/// The asset order of the resulting table is the order of `series`. Dates on
/// which an asset has no quote are left as `None`.
pub fn align_prices(series: &[PriceSeries]) -> Result<PriceTable, AnalyticsError> {
    if series.is_empty() {
        return Err(AnalyticsError::EmptyInput(
            "no price series to align".to_string(),
        ));
    }

    let assets = AssetUniverse::new(series.iter().map(|s| s.symbol().to_string()))?;

    let dates: BTreeSet<NaiveDate> = series
        .iter()
        .flat_map(|s| s.points().iter().map(|(date, _)| *date))
        .collect();

    let lookups: Vec<HashMap<NaiveDate, f64>> = series
        .iter()
        .map(|s| s.points().iter().copied().collect())
        .collect();

    let rows = dates
        .iter()
        .map(|date| lookups.iter().map(|prices| prices.get(date).copied()).collect())
        .collect();

    Ok(PriceTable::new(assets, dates.into_iter().collect(), rows)?)
}

/// Converts an aligned price table into per-period fractional returns.
///
/// The return of an asset at row `t` is `price[t] / price[t-1] - 1`, defined only
/// when that asset has a quote at both rows. Any row where some asset's return
/// is undefined is dropped, so every asset has values for the same dates.
pub fn to_returns(table: &PriceTable) -> Result<ReturnTable, AnalyticsError> {
    let mut dates = Vec::with_capacity(table.len().saturating_sub(1));
    let mut rows = Vec::with_capacity(table.len().saturating_sub(1));

    for (t, window) in table.rows().windows(2).enumerate() {
        let (previous, current) = (&window[0], &window[1]);
        let row: Option<Vec<f64>> = previous
            .iter()
            .zip(current.iter())
            .map(|(p0, p1)| match (p0, p1) {
                (Some(p0), Some(p1)) => Some(p1 / p0 - 1.0),
                _ => None,
            })
            .collect();

        if let Some(row) = row {
            dates.push(table.dates()[t + 1]);
            rows.push(row);
        }
    }

    let dropped = table.len().saturating_sub(1) - rows.len();
    if dropped > 0 {
        tracing::debug!(
            dropped,
            kept = rows.len(),
            "Dropped return rows with missing prices."
        );
    }

    Ok(ReturnTable::new(table.assets().clone(), dates, rows)?)
}

/// Aligns the series and derives the return table in one step.
pub fn returns_from_prices(series: &[PriceSeries]) -> Result<ReturnTable, AnalyticsError> {
    to_returns(&align_prices(series)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 6, d).unwrap()
    }

    fn series(symbol: &str, points: &[(u32, f64)]) -> PriceSeries {
        PriceSeries::new(symbol, points.iter().map(|&(d, p)| (day(d), p)).collect()).unwrap()
    }

    #[test]
    fn aligns_on_union_of_dates() {
        let a = series("A", &[(1, 10.0), (2, 11.0), (3, 12.0)]);
        let b = series("B", &[(2, 20.0), (3, 21.0), (4, 22.0)]);

        let table = align_prices(&[a, b]).unwrap();

        assert_eq!(table.dates(), &[day(1), day(2), day(3), day(4)]);
        assert_eq!(table.rows()[0], vec![Some(10.0), None]);
        assert_eq!(table.rows()[3], vec![None, Some(22.0)]);
    }

    #[test]
    fn pct_change_drops_rows_with_missing_data() {
        let a = series("A", &[(1, 100.0), (2, 110.0), (3, 99.0), (4, 99.0), (5, 108.9)]);
        // B has no quote on the 3rd, so returns on the 3rd and 4th are undefined for it.
        let b = series("B", &[(1, 50.0), (2, 55.0), (4, 60.0), (5, 66.0)]);

        let returns = returns_from_prices(&[a, b]).unwrap();

        assert_eq!(returns.dates(), &[day(2), day(5)]);
        assert_relative_eq!(returns.rows()[0][0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns.rows()[0][1], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns.rows()[1][0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns.rows()[1][1], 0.10, epsilon = 1e-12);
    }

    #[test]
    fn return_length_is_one_less_than_prices() {
        let a = series("A", &[(1, 1.0), (2, 2.0), (3, 4.0)]);
        let returns = returns_from_prices(&[a]).unwrap();

        assert_eq!(returns.len(), 2);
        assert_eq!(returns.column(0).collect::<Vec<_>>(), vec![1.0, 1.0]);
    }

    #[test]
    fn duplicate_symbols_and_no_series_are_errors() {
        assert!(matches!(
            align_prices(&[]),
            Err(AnalyticsError::EmptyInput(_))
        ));

        let a = series("A", &[(1, 1.0)]);
        assert!(matches!(
            align_prices(&[a.clone(), a]),
            Err(AnalyticsError::Core(_))
        ));
    }
}
