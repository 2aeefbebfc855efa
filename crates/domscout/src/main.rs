use anyhow::Context;
use clap::{Parser, Subcommand};
use domscout_e::backend::WebDriverBackend;
use domscout_engine::backend::Backend;
use domscout_engine::catalog::DEFAULT_CATALOG;
use domscout_engine::cli::OutputHandlers;
use domscout_engine::config::{ConfigLoader, DomscoutConfig};
use domscout_engine::pipeline::{self, TableOptions};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "domscout", version, about = "Element-location strategy mapper and table extractor")]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Config file (defaults to ./domscout.yaml, then ~/.domscout/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// External WebDriver URL. chromedriver is launched when omitted.
    #[arg(long, global = true)]
    webdriver_url: Option<String>,

    /// Run Chrome without a window
    #[arg(long, global = true)]
    headless: bool,

    /// Directory the JSON/CSV files are written to
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Apply every location strategy to the store home page
    Map,
    /// Extract the challenging DOM table
    Table {
        /// Skip the demo row clicks
        #[arg(long)]
        no_demo: bool,
        /// Exit after saving instead of opening the menu
        #[arg(long)]
        no_interactive: bool,
    },
}

async fn load_config(args: &Args) -> anyhow::Result<DomscoutConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigLoader::load_default().await?,
    };

    if let Some(url) = &args.webdriver_url {
        config.driver.webdriver_url = Some(url.clone());
    }
    if args.headless {
        config.driver.headless = true;
    }
    if let Some(dir) = &args.out_dir {
        config.output.dir = dir.clone();
    }
    ConfigLoader::validate(&config)?;
    Ok(config)
}

async fn run<B: Backend + ?Sized>(
    backend: &mut B,
    mode: &Mode,
    config: &DomscoutConfig,
    output: OutputHandlers,
) -> anyhow::Result<()> {
    backend.launch().await.context("Failed to launch browser")?;

    match mode {
        Mode::Map => {
            let run = pipeline::run_mapping(backend, config, DEFAULT_CATALOG, output).await?;
            info!(strategies = run.outcomes.len(), "mapping finished");
        }
        Mode::Table {
            no_demo,
            no_interactive,
        } => {
            let options = TableOptions {
                demo: !no_demo,
                interactive: !no_interactive,
            };
            let session = pipeline::run_table(backend, config, options, output).await?;
            info!(records = session.records.len(), "table pipeline finished");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout only carries the console report.
    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args).await?;
    let output = OutputHandlers::default();
    let mut backend = WebDriverBackend::from_config(&config.driver);

    let result = run(&mut backend, &args.mode, &config, output).await;

    if let Err(e) = backend.close().await {
        error!("Failed to close browser: {}", e);
    }
    info!("Browser closed");

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
