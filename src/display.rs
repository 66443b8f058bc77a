use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use engine::AnalysisReport;

/// Prints the optimal-portfolio summary and its allocation table to stdout.
pub fn print_summary(report: &AnalysisReport) {
    let best = &report.best;
    let params = &report.parameters;

    println!(
        "Optimal portfolio for {} ({} to {}, {} samples, {} observations)",
        params.symbols.join(", "),
        params.start_date,
        params.end_date,
        params.sample_count,
        params.observations
    );
    if let Some(seed) = params.seed {
        println!("Seed:                  {}", seed);
    }
    println!("Expected annual return: {}", percent(best.annual_return));
    println!("Annual volatility:      {}", percent(best.annual_volatility));
    println!("Sharpe ratio:           {}", sharpe(best.sharpe_ratio));
    println!("Maximum drawdown:       {}", percent(report.max_drawdown));
    println!("{}", allocation_table(report));
}

fn allocation_table(report: &AnalysisReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Symbol", "Name", "Weight"]);

    for row in &report.allocation {
        table.add_row(vec![
            row.symbol.clone(),
            row.name.clone(),
            format!("{:.4}", row.weight),
        ]);
    }

    if let Some(column) = table.column_mut(2) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Two decimals, or a note when volatility was zero.
fn sharpe(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        format!("{} (zero volatility)", value)
    }
}
