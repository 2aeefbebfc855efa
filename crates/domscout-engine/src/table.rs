//! Table extraction and row actions for the challenge page.

use crate::backend::{Backend, BackendError, LocateError};
use crate::cli::OutputHandlers;
use domscout_common::formatter::{FAIL_MARK, OK_MARK};
use domscout_common::protocol::{ActionKind, ElementHandle, Interaction, LocatorKind};
use domscout_common::record::TableRecord;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Missing <{0}> in the page")]
    MissingSection(&'static str),
    #[error("Column header '{0}' clashes with a record field")]
    ReservedHeader(String),
    #[error("Row {row_index} does not exist (maximum: {rows})")]
    RowOutOfRange { row_index: usize, rows: usize },
    #[error("Button '{kind}' not found in row {row_index}")]
    ActionNotFound { row_index: usize, kind: ActionKind },
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Maps a missing element onto the table section that was expected.
fn section(name: &'static str) -> impl FnOnce(LocateError) -> ExtractError {
    move |e| {
        if e.is_no_match() {
            ExtractError::MissingSection(name)
        } else {
            ExtractError::Locate(e)
        }
    }
}

/// Which action a link stands for. The target URL decides; the link label
/// is only consulted when the URL names neither action. Case-sensitive.
pub fn classify_link(href: &str, label: &str) -> Option<ActionKind> {
    let by_text = |text: &str| {
        if text.contains("edit") {
            Some(ActionKind::Edit)
        } else if text.contains("delete") {
            Some(ActionKind::Delete)
        } else {
            None
        }
    };
    by_text(href).or_else(|| by_text(label))
}

/// Case-insensitive variant used when choosing a link to click.
fn link_matches(href: &str, label: &str, kind: ActionKind) -> bool {
    let needle = kind.as_str();
    href.to_lowercase().contains(needle) || label.to_lowercase().contains(needle)
}

pub struct TableExtractor {
    output: OutputHandlers,
    action_pause: Duration,
}

impl TableExtractor {
    pub fn new(output: OutputHandlers, action_pause: Duration) -> Self {
        Self {
            output,
            action_pause,
        }
    }

    /// Read the page's table into one record per body row.
    ///
    /// The last header is the action column: it never becomes a field key.
    /// Rows with fewer cells than headers only fill the pairs they have.
    pub async fn extract<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
    ) -> Result<Vec<TableRecord>, ExtractError> {
        (self.output.out)("📊 Extracting table data...");

        let table = backend
            .find_one(None, LocatorKind::Css, "table")
            .await
            .map_err(section("table"))?;
        let thead = backend
            .find_one(Some(table), LocatorKind::TagName, "thead")
            .await
            .map_err(section("thead"))?;

        let mut headers = Vec::new();
        for th in backend.find_all(Some(thead), LocatorKind::TagName, "th").await? {
            headers.push(backend.text(th).await?.trim().to_string());
        }
        // The action column never becomes a key, so it may use any name.
        let data_columns = headers.len().saturating_sub(1);
        if let Some(clash) = headers[..data_columns]
            .iter()
            .find(|h| TableRecord::is_reserved_key(h))
        {
            return Err(ExtractError::ReservedHeader(clash.clone()));
        }

        let tbody = backend
            .find_one(Some(table), LocatorKind::TagName, "tbody")
            .await
            .map_err(section("tbody"))?;
        let rows = backend.find_all(Some(tbody), LocatorKind::TagName, "tr").await?;

        (self.output.out)(&format!(
            "📋 Found {} rows with {} columns: {:?}",
            rows.len(),
            headers.len(),
            headers
        ));

        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            let record = extract_row(backend, row, i + 1, &headers).await?;
            let values: Vec<&str> = record.fields.values().map(String::as_str).collect();
            (self.output.out)(&format!("  📝 Row {}: {:?}", record.row_index, values));
            records.push(record);
        }

        info!(records = records.len(), "table extracted");
        (self.output.out)(&format!(
            "{} Extraction finished: {} records collected.",
            OK_MARK,
            records.len()
        ));
        Ok(records)
    }

    /// Click the `kind` link of body row `row_index` (1-based).
    ///
    /// Returns `false` when the row does not exist, has no such link, or the
    /// click fails. Errors never leave this function.
    pub async fn click_row_action<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        row_index: usize,
        kind: ActionKind,
    ) -> bool {
        (self.output.out)(&format!(
            "🖱️  Clicking '{}' on row {}...",
            kind, row_index
        ));

        match click_action(backend, row_index, kind).await {
            Ok(()) => {
                (self.output.out)(&format!(
                    "{} Button '{}' on row {} clicked!",
                    OK_MARK, kind, row_index
                ));
                if !self.action_pause.is_zero() {
                    tokio::time::sleep(self.action_pause).await;
                }
                true
            }
            Err(e) => {
                warn!(row_index, %kind, "row action failed: {}", e);
                (self.output.err)(&format!("{} {}", FAIL_MARK, e));
                false
            }
        }
    }
}

async fn extract_row<B: Backend + ?Sized>(
    backend: &mut B,
    row: ElementHandle,
    row_index: usize,
    headers: &[String],
) -> Result<TableRecord, ExtractError> {
    let cells = backend.find_all(Some(row), LocatorKind::TagName, "td").await?;
    let mut record = TableRecord::new(row_index);

    let Some((&action_cell, data_cells)) = cells.split_last() else {
        debug!(row_index, "row without cells");
        return Ok(record);
    };

    let data_columns = headers.len().saturating_sub(1);
    for (header, &cell) in headers.iter().take(data_columns).zip(data_cells) {
        let text = backend.text(cell).await?;
        record.fields.insert(header.clone(), text.trim().to_string());
    }

    for link in backend
        .find_all(Some(action_cell), LocatorKind::TagName, "a")
        .await?
    {
        let label = backend.text(link).await?.trim().to_string();
        let href = backend.attribute(link, "href").await?.unwrap_or_default();
        match classify_link(&href, &label) {
            Some(ActionKind::Edit) => record.edit_link = Some(href),
            Some(ActionKind::Delete) => record.delete_link = Some(href),
            None => {}
        }
        record.available_actions.push(label);
    }

    Ok(record)
}

async fn click_action<B: Backend + ?Sized>(
    backend: &mut B,
    row_index: usize,
    kind: ActionKind,
) -> Result<(), ExtractError> {
    let tbody = backend
        .find_one(None, LocatorKind::TagName, "tbody")
        .await
        .map_err(section("tbody"))?;
    let rows = backend.find_all(Some(tbody), LocatorKind::TagName, "tr").await?;

    if row_index == 0 || row_index > rows.len() {
        return Err(ExtractError::RowOutOfRange {
            row_index,
            rows: rows.len(),
        });
    }

    let row = rows[row_index - 1];
    let cells = backend.find_all(Some(row), LocatorKind::TagName, "td").await?;
    let Some(&action_cell) = cells.last() else {
        return Err(ExtractError::ActionNotFound { row_index, kind });
    };

    for link in backend
        .find_all(Some(action_cell), LocatorKind::TagName, "a")
        .await?
    {
        let href = backend.attribute(link, "href").await?.unwrap_or_default();
        let label = backend.text(link).await?;
        if link_matches(&href, &label, kind) {
            backend.interact(link, Interaction::Click).await?;
            return Ok(());
        }
    }

    Err(ExtractError::ActionNotFound { row_index, kind })
}
