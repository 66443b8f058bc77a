use crate::error::AnalyticsError;
use core_types::{CumulativeReturnPath, DrawdownPath};

/// A stateless calculator for the underwater curve of a cumulative return path.
///
/// The high-water mark starts at `0.0` rather than at the first cumulative
/// value, and the scan starts at index 1, so `drawdown[0]` is always `0.0`.
/// A path that opens below zero therefore measures its first dip against 0.
#[derive(Debug, Default)]
pub struct DrawdownEngine {}

impl DrawdownEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the drawdown at each point of `cumulative`.
    ///
    /// # Returns
    ///
    /// The drawdowns and the high-water marks, both the length of the input.
    pub fn compute(&self, cumulative: &[f64]) -> Result<(Vec<f64>, Vec<f64>), AnalyticsError> {
        if cumulative.is_empty() {
            return Err(AnalyticsError::EmptyInput(
                "cumulative return path has no points".to_string(),
            ));
        }
        if let Some(index) = cumulative.iter().position(|v| !v.is_finite()) {
            return Err(AnalyticsError::NonFinite {
                what: "cumulative return path",
                index,
            });
        }

        let mut drawdowns = Vec::with_capacity(cumulative.len());
        let mut high_water_marks = Vec::with_capacity(cumulative.len());
        drawdowns.push(0.0);
        high_water_marks.push(0.0);

        let mut peak = 0.0_f64;
        for &value in &cumulative[1..] {
            peak = peak.max(value);
            // peak >= 0, so the denominator is at least 1.
            let drawdown = (1.0 + value) / (1.0 + peak) - 1.0;
            drawdowns.push(drawdown);
            high_water_marks.push(peak);
        }

        Ok((drawdowns, high_water_marks))
    }

    /// Computes the dated drawdown path of `path`.
    pub fn compute_path(&self, path: &CumulativeReturnPath) -> Result<DrawdownPath, AnalyticsError> {
        let (drawdowns, high_water_marks) = self.compute(path.values())?;
        Ok(DrawdownPath::new(
            path.dates().to_vec(),
            drawdowns,
            high_water_marks,
        )?)
    }
}
