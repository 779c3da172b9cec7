//! End-of-run summary table

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::runner::{CollectorOutcome, RunSummary};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Collector")]
    collector: &'static str,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Records")]
    records: String,
    #[tabled(rename = "Output")]
    output: String,
}

fn row(collector: &'static str, outcome: &CollectorOutcome) -> SummaryRow {
    match outcome {
        Ok(report) => SummaryRow {
            collector,
            status: "ok".green().to_string(),
            records: report.records.to_string(),
            output: report.path.display().to_string(),
        },
        Err(err) => SummaryRow {
            collector,
            status: "skipped".yellow().to_string(),
            records: "-".to_string(),
            output: err.to_string(),
        },
    }
}

/// Render both collectors' outcomes as a table
pub fn format_summary(summary: &RunSummary) -> String {
    let rows = vec![
        row("news", &summary.news),
        row("financial", &summary.financial),
    ];
    let title = format!("Results for {}", summary.company).bold();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    format!("\n{}\n{}", title, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectorError;
    use crate::runner::CollectorReport;
    use std::path::PathBuf;

    #[test]
    fn test_summary_lists_both_collectors() {
        colored::control::set_override(false);
        let summary = RunSummary {
            company: "Apple".to_string(),
            news: Ok(CollectorReport {
                records: 12,
                path: PathBuf::from("data/Apple.json"),
            }),
            financial: Err(CollectorError::Browser("no chrome".to_string())),
        };

        let out = format_summary(&summary);

        assert!(out.contains("Results for Apple"));
        assert!(out.contains("data/Apple.json"));
        assert!(out.contains("12"));
        assert!(out.contains("skipped"));
        assert!(out.contains("browser error: no chrome"));
    }
}
