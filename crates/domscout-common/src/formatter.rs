use crate::record::{StrategyOutcome, StrategyResult, TableRecord};

pub const OK_MARK: &str = "✅";
pub const FAIL_MARK: &str = "❌";

/// Placeholder used when a column is missing from a record.
const MISSING: &str = "N/A";

pub fn mark(success: bool) -> &'static str {
    if success { OK_MARK } else { FAIL_MARK }
}

/// First `max` characters of `text` (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Like [`truncate_chars`] but appends `...` when something was cut.
pub fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", truncate_chars(text, max))
    } else {
        text.to_string()
    }
}

/// Console line for a single lookup, e.g. `✅ 3 element(s) - Links with href`.
pub fn format_result(result: &StrategyResult) -> String {
    if result.found() {
        format!(
            "{} {} element(s) - {} [{}]",
            OK_MARK,
            result.match_count(),
            result.target_description(),
            result.selector_value()
        )
    } else {
        format!(
            "{} {} - {}",
            FAIL_MARK,
            result.target_description(),
            result.error_detail().unwrap_or("not found")
        )
    }
}

/// One numbered line of the final report.
pub fn format_outcome_line(position: usize, outcome: &StrategyOutcome) -> String {
    let count = outcome
        .found_hint()
        .map(|n| format!(" ({} found)", n))
        .unwrap_or_default();
    format!(
        "  {}. {} {}: {}{}",
        position,
        mark(outcome.is_success()),
        outcome.strategy_name(),
        outcome.target_description(),
        count
    )
}

pub fn format_summary(successes: usize, total: usize, rate: f64) -> String {
    format!(
        "{} Successful strategies: {}/{}\n📈 Success rate: {:.1}%",
        OK_MARK, successes, total, rate
    )
}

/// Row of the table overview: the first two columns padded to ten
/// characters, then the available actions.
pub fn format_table_row(record: &TableRecord, columns: &[&str]) -> String {
    let cells: Vec<String> = columns
        .iter()
        .map(|c| {
            let value = record.fields.get(*c).map(String::as_str).unwrap_or(MISSING);
            format!("{:<10}", value)
        })
        .collect();
    format!(
        "Row {:2}: {} | [{}]",
        record.row_index,
        cells.join(" | "),
        record.available_actions.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CompositeResult, SampleAttributes};

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_chars("Olá, mundo", 3), "Olá");
        assert_eq!(ellipsize("Promoções do dia", 9), "Promoções...");
        assert_eq!(ellipsize("curto", 9), "curto");
    }

    #[test]
    fn test_outcome_line_with_count() {
        let details = vec![
            StrategyResult::hit("pseudo", "Links", "a[href]", 12, SampleAttributes::new()),
            StrategyResult::miss("pseudo", "Inputs", "input", "none"),
        ];
        let outcome = StrategyOutcome::Composite(CompositeResult::new(
            "pseudo-selectors",
            "Pseudo-selector elements",
            details,
        ));
        assert_eq!(
            format_outcome_line(9, &outcome),
            "  9. ✅ pseudo-selectors: Pseudo-selector elements (1 found)"
        );
    }

    #[test]
    fn test_outcome_line_for_miss_has_no_count() {
        let outcome =
            StrategyOutcome::Singular(StrategyResult::miss("by-id", "Search bar", "#q", "none"));
        assert_eq!(format_outcome_line(1, &outcome), "  1. ❌ by-id: Search bar");
    }

    #[test]
    fn test_summary_rounds_to_one_decimal() {
        let text = format_summary(2, 3, 200.0 / 3.0);
        assert!(text.contains("2/3"));
        assert!(text.ends_with("66.7%"));
    }

    #[test]
    fn test_table_row_pads_and_fills_missing() {
        let mut record = TableRecord::new(2);
        record.fields.insert("Lorem".into(), "c".into());
        record.available_actions = vec!["edit".into()];
        assert_eq!(
            format_table_row(&record, &["Lorem", "Ipsum"]),
            "Row  2: c          | N/A        | [edit]"
        );
    }
}
