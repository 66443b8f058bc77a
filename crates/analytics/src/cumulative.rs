use crate::error::AnalyticsError;
use core_types::{CumulativePolicy, CumulativeReturnPath, ReturnTable, WeightVector};

/// Weighted portfolio return for every row of `returns`.
pub fn portfolio_returns(
    returns: &ReturnTable,
    weights: &WeightVector,
) -> Result<Vec<f64>, AnalyticsError> {
    returns.assets().ensure_same(weights.assets())?;

    Ok(returns
        .rows()
        .iter()
        .map(|row| row.iter().zip(weights.values()).map(|(r, w)| r * w).sum::<f64>())
        .collect())
}

/// Accumulates the weighted portfolio returns into a dated path.
pub fn cumulative_returns(
    returns: &ReturnTable,
    weights: &WeightVector,
    policy: CumulativePolicy,
) -> Result<CumulativeReturnPath, AnalyticsError> {
    let values = portfolio_returns(returns, weights)?
        .into_iter()
        .scan(0.0, |cumulative, r| {
            *cumulative = policy.accumulate(*cumulative, r);
            Some(*cumulative)
        })
        .collect();

    Ok(CumulativeReturnPath::new(returns.dates().to_vec(), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use core_types::{AssetUniverse, CoreError};

    fn returns() -> ReturnTable {
        let assets = AssetUniverse::new(["A", "B"]).unwrap();
        let dates = (1..=3)
            .map(|d| NaiveDate::from_ymd_opt(2023, 5, d).unwrap())
            .collect();
        ReturnTable::new(
            assets,
            dates,
            vec![vec![0.10, 0.00], vec![0.10, -0.10], vec![-0.20, 0.10]],
        )
        .unwrap()
    }

    #[test]
    fn sum_policy_is_a_running_sum() {
        let table = returns();
        let weights = WeightVector::new(table.assets().clone(), vec![0.5, 0.5]).unwrap();

        let path = cumulative_returns(&table, &weights, CumulativePolicy::Sum).unwrap();

        assert_eq!(path.dates(), table.dates());
        assert_relative_eq!(path.values()[0], 0.05, epsilon = 1e-12);
        assert_relative_eq!(path.values()[1], 0.05, epsilon = 1e-12);
        assert_relative_eq!(path.values()[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn compound_policy_multiplies_growth() {
        let table = returns();
        let weights = WeightVector::new(table.assets().clone(), vec![1.0, 0.0]).unwrap();

        let path = cumulative_returns(&table, &weights, CumulativePolicy::Compound).unwrap();

        assert_relative_eq!(path.values()[1], 1.1 * 1.1 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(path.values()[2], 1.1 * 1.1 * 0.8 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn mismatched_weights_are_rejected() {
        let table = returns();
        let other = AssetUniverse::new(["A", "C"]).unwrap();
        let weights = WeightVector::equal(other);

        assert!(matches!(
            cumulative_returns(&table, &weights, CumulativePolicy::Sum),
            Err(AnalyticsError::Core(CoreError::AssetMismatch { .. }))
        ));
    }
}
