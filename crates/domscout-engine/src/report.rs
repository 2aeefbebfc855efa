use chrono::NaiveDateTime;
use domscout_common::formatter;
use domscout_common::record::{self, StrategyOutcome};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No strategy was run, nothing to summarize")]
    EmptyRun,
}

/// Success tally of a mapping run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub successes: usize,
    /// Percentage in `0.0..=100.0`.
    pub rate: f64,
}

pub fn summarize(outcomes: &[StrategyOutcome]) -> Result<Summary, ReportError> {
    if outcomes.is_empty() {
        return Err(ReportError::EmptyRun);
    }
    let total = outcomes.len();
    let successes = outcomes.iter().filter(|o| o.is_success()).count();
    Ok(Summary {
        total,
        successes,
        rate: successes as f64 / total as f64 * 100.0,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub site: String,
    pub url: String,
    #[serde(with = "record::timestamp")]
    pub run_at: NaiveDateTime,
    pub total_strategies: usize,
    pub successful_strategies: usize,
}

/// Persisted form of a mapping run.
#[derive(Debug, Clone, Serialize)]
pub struct MappingReport<'a> {
    pub metadata: ReportMetadata,
    pub results: &'a [StrategyOutcome],
}

impl<'a> MappingReport<'a> {
    pub fn new(
        site: impl Into<String>,
        url: impl Into<String>,
        outcomes: &'a [StrategyOutcome],
    ) -> Result<Self, ReportError> {
        let summary = summarize(outcomes)?;
        Ok(Self {
            metadata: ReportMetadata {
                site: site.into(),
                url: url.into(),
                run_at: record::now(),
                total_strategies: summary.total,
                successful_strategies: summary.successes,
            },
            results: outcomes,
        })
    }
}

/// Console rendering of the final report: one line per strategy in run
/// order, then the tally.
pub fn render_lines(outcomes: &[StrategyOutcome]) -> Result<Vec<String>, ReportError> {
    let summary = summarize(outcomes)?;

    let mut lines = Vec::with_capacity(outcomes.len() + 6);
    lines.push("=".repeat(60));
    lines.push("📊 FINAL REPORT - LOCATION STRATEGIES".to_string());
    lines.push("=".repeat(60));
    lines.push(formatter::format_summary(
        summary.successes,
        summary.total,
        summary.rate,
    ));
    lines.push(String::new());
    lines.push("📋 Details per strategy:".to_string());
    for (i, outcome) in outcomes.iter().enumerate() {
        lines.push(formatter::format_outcome_line(i + 1, outcome));
    }
    Ok(lines)
}
