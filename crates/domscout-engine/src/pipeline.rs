//! The two end-to-end flows: strategy mapping and table extraction.

use crate::backend::{Backend, BackendError};
use crate::catalog::StrategyDescriptor;
use crate::cli::{self, OutputHandlers};
use crate::config::DomscoutConfig;
use crate::export::{self, ExportError};
use crate::report::{self, MappingReport, ReportError};
use crate::runner::{RunnerOptions, StrategyRunner};
use crate::table::{ExtractError, TableExtractor};
use domscout_common::formatter::{self, FAIL_MARK, OK_MARK};
use domscout_common::protocol::{ActionKind, LocatorKind};
use domscout_common::record::{StrategyOutcome, TableRecord};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to open {url}: {source}")]
    Navigation { url: String, source: BackendError },
    #[error("Page did not load (waiting for <{selector}>): {source}")]
    PageLoad {
        selector: &'static str,
        source: BackendError,
    },
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Menu failed: {0}")]
    Menu(String),
}

async fn open_page<B: Backend + ?Sized>(
    backend: &mut B,
    url: &str,
    ready_selector: &'static str,
    timeout: Duration,
    output: OutputHandlers,
) -> Result<(), PipelineError> {
    (output.out)(&format!("🌐 Opening {}...", url));
    let nav = backend
        .navigate(url)
        .await
        .map_err(|source| PipelineError::Navigation {
            url: url.to_string(),
            source,
        })?;
    info!(url = %nav.url, title = %nav.title, "page opened");

    backend
        .wait_for(LocatorKind::TagName, ready_selector, timeout)
        .await
        .map_err(|source| PipelineError::PageLoad {
            selector: ready_selector,
            source,
        })?;
    (output.out)(&format!("{} Page loaded: {}", OK_MARK, nav.title));
    Ok(())
}

/// Result of a mapping run.
pub struct MappingRun {
    pub outcomes: Vec<StrategyOutcome>,
    /// Where the report was written, `None` when saving failed.
    pub report_path: Option<PathBuf>,
}

/// Load the configured store page, apply every strategy of `catalog`, print
/// the final report and save it as JSON.
pub async fn run_mapping<B: Backend + ?Sized>(
    backend: &mut B,
    config: &DomscoutConfig,
    catalog: &[StrategyDescriptor],
    output: OutputHandlers,
) -> Result<MappingRun, PipelineError> {
    let mapping = &config.mapping;
    (output.out)(&format!("🚀 Mapping location strategies on {}", mapping.site));

    open_page(backend, &mapping.url, "body", mapping.ready_timeout(), output).await?;
    if !mapping.settle().is_zero() {
        tokio::time::sleep(mapping.settle()).await;
    }

    let runner = StrategyRunner::new(
        RunnerOptions {
            pacing: Duration::from_millis(mapping.pacing_ms),
            demo_query: mapping.demo_query.clone(),
            demo_pause: Duration::from_millis(mapping.demo_pause_ms),
        },
        output,
    );
    let outcomes = runner.run(backend, catalog).await;

    for line in report::render_lines(&outcomes)? {
        (output.out)(&line);
    }

    let report = MappingReport::new(&mapping.site, &mapping.url, &outcomes)?;
    let path = export::output_path(&config.output.dir, export::MAPPING_PREFIX, "json");
    let report_path = match export::write_report_json(&path, &report) {
        Ok(()) => {
            (output.out)(&format!("💾 Results saved to: {}", path.display()));
            Some(path)
        }
        Err(e) => {
            error!(path = %path.display(), "failed to save report: {}", e);
            (output.err)(&format!("{} Failed to save results: {}", FAIL_MARK, e));
            None
        }
    };

    Ok(MappingRun {
        outcomes,
        report_path,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct TableOptions {
    /// Click the configured demo actions after extraction.
    pub demo: bool,
    /// Enter the interactive menu once the data is saved.
    pub interactive: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            demo: true,
            interactive: true,
        }
    }
}

/// Extracted table state the menu operates on.
pub struct TableSession {
    pub records: Vec<TableRecord>,
    url: String,
    ready_timeout: Duration,
    output_dir: PathBuf,
    extractor: TableExtractor,
    output: OutputHandlers,
}

impl TableSession {
    pub fn new(config: &DomscoutConfig, output: OutputHandlers) -> Self {
        Self {
            records: Vec::new(),
            url: config.table.url.clone(),
            ready_timeout: config.table.ready_timeout(),
            output_dir: config.output.dir.clone(),
            extractor: TableExtractor::new(
                output,
                Duration::from_millis(config.table.action_pause_ms),
            ),
            output,
        }
    }

    /// Navigate to the table page and extract it again. The previous records
    /// are dropped first, so a failed reload leaves the session empty.
    pub async fn reload<B: Backend + ?Sized>(&mut self, backend: &mut B) -> Result<(), PipelineError> {
        self.records.clear();
        open_page(backend, &self.url, "table", self.ready_timeout, self.output).await?;
        self.records = self.extractor.extract(backend).await?;
        Ok(())
    }

    pub fn show_summary(&self) {
        let out = self.output.out;
        out(&format!("\n📊 DATA SUMMARY ({} records)", self.records.len()));
        out(&"-".repeat(50));

        let Some(first) = self.records.first() else {
            out("No data extracted.");
            return;
        };
        let columns: Vec<&str> = first.fields.keys().take(2).map(String::as_str).collect();
        for record in &self.records {
            out(&formatter::format_table_row(record, &columns));
        }
    }

    pub async fn click_row_action<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        row_index: usize,
        kind: ActionKind,
    ) -> bool {
        self.extractor.click_row_action(backend, row_index, kind).await
    }

    /// Save the records as CSV in the output directory.
    pub fn save_csv(&self) -> Option<PathBuf> {
        let path = export::output_path(&self.output_dir, export::TABLE_PREFIX, "csv");
        self.save("CSV", &path, export::write_records_csv)
    }

    /// Save the records as JSON in the output directory.
    pub fn save_json(&self) -> Option<PathBuf> {
        let path = export::output_path(&self.output_dir, export::TABLE_PREFIX, "json");
        self.save("JSON", &path, export::write_records_json)
    }

    fn save(
        &self,
        format: &str,
        path: &Path,
        write: fn(&Path, &[TableRecord]) -> Result<(), ExportError>,
    ) -> Option<PathBuf> {
        match write(path, &self.records) {
            Ok(()) => {
                (self.output.out)(&format!("💾 {} saved to: {}", format, path.display()));
                Some(path.to_path_buf())
            }
            Err(e) => {
                warn!(path = %path.display(), "failed to save {}: {}", format, e);
                (self.output.err)(&format!("{} Failed to save {}: {}", FAIL_MARK, format, e));
                None
            }
        }
    }
}

/// Load the challenge page, extract its table, run the demo clicks, save
/// both exports and optionally hand over to the interactive menu.
pub async fn run_table<B: Backend + ?Sized>(
    backend: &mut B,
    config: &DomscoutConfig,
    options: TableOptions,
    output: OutputHandlers,
) -> Result<TableSession, PipelineError> {
    (output.out)("🚀 Extracting the challenging DOM table");

    let mut session = TableSession::new(config, output);
    session.reload(backend).await?;
    session.show_summary();

    if options.demo {
        (output.out)("\n🎯 Demonstrating row actions...");
        for click in &config.table.demo_clicks {
            match click.action.parse::<ActionKind>() {
                Ok(kind) => {
                    session.click_row_action(backend, click.row, kind).await;
                }
                Err(e) => warn!("skipping demo click: {}", e),
            }
        }
    }

    session.save_csv();
    session.save_json();

    if options.interactive {
        cli::run_menu(backend, &mut session, output)
            .await
            .map_err(|e| PipelineError::Menu(e.to_string()))?;
    }

    Ok(session)
}
