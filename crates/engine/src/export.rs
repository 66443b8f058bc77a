use crate::error::ExportError;
use crate::report::AnalysisReport;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const REPORT_FILE: &str = "report.json";
pub const FRONTIER_FILE: &str = "frontier.csv";
pub const PATHS_FILE: &str = "paths.csv";

/// Writes the full report as pretty-printed JSON.
///
/// Zero-volatility Sharpe sentinels are not representable in JSON and are
/// written as `null`.
pub fn write_json(report: &AnalysisReport, path: &Path) -> Result<(), ExportError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// Writes one row per sampled portfolio: its statistics, then one weight column per asset.
pub fn write_frontier_csv(report: &AnalysisReport, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![
        "index".to_string(),
        "annual_return".to_string(),
        "annual_volatility".to_string(),
        "sharpe_ratio".to_string(),
    ];
    header.extend(report.parameters.symbols.iter().cloned());
    writer.write_record(&header)?;

    for (index, sample) in report.samples.iter().enumerate() {
        let mut record = vec![
            index.to_string(),
            sample.annual_return.to_string(),
            sample.annual_volatility.to_string(),
            sample.sharpe_ratio.to_string(),
        ];
        record.extend(sample.weights.values().iter().map(f64::to_string));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the cumulative return and drawdown of the best portfolio, one row per date.
pub fn write_paths_csv(report: &AnalysisReport, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["date", "cumulative_return", "drawdown", "high_water_mark"])?;

    // Rows stop at the shorter of the two paths.
    let cumulative = report.cumulative.dates().iter().zip(report.cumulative.values());
    let drawdown = report
        .drawdown
        .drawdowns()
        .iter()
        .zip(report.drawdown.high_water_marks());
    for ((date, value), (drawdown, peak)) in cumulative.zip(drawdown) {
        writer.write_record([
            date.to_string(),
            value.to_string(),
            drawdown.to_string(),
            peak.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the JSON report and both CSV files into `dir`, creating it if needed.
pub fn export_all(report: &AnalysisReport, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;

    let report_path = dir.join(REPORT_FILE);
    let frontier_path = dir.join(FRONTIER_FILE);
    let paths_path = dir.join(PATHS_FILE);

    write_json(report, &report_path)?;
    write_frontier_csv(report, &frontier_path)?;
    write_paths_csv(report, &paths_path)?;

    tracing::info!(dir = %dir.display(), "Analysis report exported.");
    Ok(vec![report_path, frontier_path, paths_path])
}
