use crate::error::AnalyticsError;
use core_types::{AssetUniverse, ReturnTable};
use serde::Serialize;

/// The minimum number of aligned observations for a sample covariance.
pub const MIN_OBSERVATIONS: usize = 2;

/// Per-period mean returns and the sample covariance matrix of a return table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStats {
    pub assets: AssetUniverse,
    /// Mean period return per asset, in universe order.
    pub mean: Vec<f64>,
    /// Symmetric covariance matrix, `covariance[i][j]` between assets `i` and `j`.
    pub covariance: Vec<Vec<f64>>,
    /// Number of aligned return rows the statistics were computed from.
    pub observations: usize,
}

/// A stateless calculator for mean returns and their covariance.
#[derive(Debug, Default)]
pub struct ReturnStatistics {}

impl ReturnStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes column means and the N-1 sample covariance of `returns`.
    ///
    /// Every asset is measured over the same set of dates, which the
    /// `ReturnTable` guarantees by construction.
    pub fn compute(&self, returns: &ReturnTable) -> Result<ReturnStats, AnalyticsError> {
        let n = returns.len();
        if n < MIN_OBSERVATIONS {
            return Err(AnalyticsError::InsufficientData {
                required: MIN_OBSERVATIONS,
                available: n,
            });
        }

        let assets = returns.assets().len();
        let rows = returns.rows();

        // 1. Means
        let mut mean = vec![0.0; assets];
        for row in rows {
            for (m, r) in mean.iter_mut().zip(row) {
                *m += r;
            }
        }
        for m in mean.iter_mut() {
            *m /= n as f64;
        }

        // 2. Covariance over centred values, upper triangle mirrored.
        let mut covariance = vec![vec![0.0; assets]; assets];
        for row in rows {
            for i in 0..assets {
                let di = row[i] - mean[i];
                for j in i..assets {
                    covariance[i][j] += di * (row[j] - mean[j]);
                }
            }
        }
        let denominator = (n - 1) as f64;
        for i in 0..assets {
            for j in i..assets {
                let value = covariance[i][j] / denominator;
                covariance[i][j] = value;
                covariance[j][i] = value;
            }
        }

        tracing::debug!(assets, observations = n, "Computed return statistics.");

        Ok(ReturnStats {
            assets: returns.assets().clone(),
            mean,
            covariance,
            observations: n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn table(rows: Vec<Vec<f64>>) -> ReturnTable {
        let assets = AssetUniverse::new(["A", "B"]).unwrap();
        let dates = (0..rows.len())
            .map(|i| NaiveDate::from_ymd_opt(2023, 1, 2 + i as u32).unwrap())
            .collect();
        ReturnTable::new(assets, dates, rows).unwrap()
    }

    #[test]
    fn mean_and_covariance_of_two_assets() {
        let returns = table(vec![
            vec![0.01, 0.02],
            vec![-0.01, 0.00],
            vec![0.02, 0.01],
        ]);

        let stats = ReturnStatistics::new().compute(&returns).unwrap();

        assert_eq!(stats.observations, 3);
        assert_relative_eq!(stats.mean[0], 0.02 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(stats.mean[1], 0.01, epsilon = 1e-12);

        assert_relative_eq!(stats.covariance[0][0], 7.0 / 30_000.0, epsilon = 1e-12);
        assert_relative_eq!(stats.covariance[1][1], 1.0e-4, epsilon = 1e-12);
        assert_relative_eq!(stats.covariance[0][1], 1.0e-4, epsilon = 1e-12);
        assert_eq!(stats.covariance[0][1], stats.covariance[1][0]);
    }

    #[test]
    fn constant_returns_have_zero_variance() {
        let returns = table(vec![vec![0.01, 0.0], vec![0.01, 0.0]]);
        let stats = ReturnStatistics::new().compute(&returns).unwrap();

        assert_relative_eq!(stats.covariance[0][0], 0.0);
        assert_relative_eq!(stats.covariance[1][1], 0.0);
    }

    #[test]
    fn fewer_than_two_rows_is_insufficient() {
        let returns = table(vec![vec![0.01, 0.02]]);
        assert_eq!(
            ReturnStatistics::new().compute(&returns),
            Err(AnalyticsError::InsufficientData {
                required: 2,
                available: 1
            })
        );
    }
}
