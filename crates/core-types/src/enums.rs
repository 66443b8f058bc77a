use serde::{Deserialize, Serialize};

/// How periodic portfolio returns are accumulated into a cumulative path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CumulativePolicy {
    /// Running sum of periodic returns.
    #[default]
    Sum,
    /// Running compounded product, `prod(1 + r) - 1`.
    Compound,
}

impl CumulativePolicy {
    /// Folds one more periodic return into the running cumulative value.
    pub fn accumulate(&self, cumulative: f64, period_return: f64) -> f64 {
        match self {
            CumulativePolicy::Sum => cumulative + period_return,
            CumulativePolicy::Compound => (1.0 + cumulative) * (1.0 + period_return) - 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sum_and_compound_accumulate_differently() {
        let sum = CumulativePolicy::Sum.accumulate(0.10, 0.10);
        let compound = CumulativePolicy::Compound.accumulate(0.10, 0.10);

        assert_relative_eq!(sum, 0.20, epsilon = 1e-12);
        assert_relative_eq!(compound, 0.21, epsilon = 1e-12);
    }
}
