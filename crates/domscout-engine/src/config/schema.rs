use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomscoutConfig {
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub mapping: MappingConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Remote WebDriver endpoint. When unset a local chromedriver is started.
    #[serde(default)]
    pub webdriver_url: Option<String>,
    #[serde(default)]
    pub headless: bool,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_stealth")]
    pub stealth: bool,
    #[serde(default)]
    pub chromedriver_path: Option<PathBuf>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            webdriver_url: None,
            headless: false,
            port: default_port(),
            stealth: default_stealth(),
            chromedriver_path: None,
        }
    }
}

fn default_port() -> u16 {
    9515
}

fn default_stealth() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default = "default_site")]
    pub site: String,
    #[serde(default = "default_mapping_url")]
    pub url: String,
    #[serde(default = "default_mapping_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
    #[serde(default = "default_demo_query")]
    pub demo_query: String,
    #[serde(default = "default_pause_ms")]
    pub demo_pause_ms: u64,
}

impl MappingConfig {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            site: default_site(),
            url: default_mapping_url(),
            ready_timeout_secs: default_mapping_ready_timeout_secs(),
            settle_ms: default_settle_ms(),
            pacing_ms: default_pacing_ms(),
            demo_query: default_demo_query(),
            demo_pause_ms: default_pause_ms(),
        }
    }
}

fn default_site() -> String {
    "Amazon Brasil".to_string()
}

fn default_mapping_url() -> String {
    "https://www.amazon.com.br".to_string()
}

fn default_mapping_ready_timeout_secs() -> u64 {
    15
}

fn default_settle_ms() -> u64 {
    3000
}

fn default_pacing_ms() -> u64 {
    2000
}

fn default_demo_query() -> String {
    "smartphone".to_string()
}

fn default_pause_ms() -> u64 {
    1000
}

/// A row action clicked right after extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoClick {
    pub row: usize,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_table_url")]
    pub url: String,
    #[serde(default = "default_table_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
    #[serde(default = "default_pause_ms")]
    pub action_pause_ms: u64,
    #[serde(default = "default_demo_clicks")]
    pub demo_clicks: Vec<DemoClick>,
}

impl TableConfig {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            url: default_table_url(),
            ready_timeout_secs: default_table_ready_timeout_secs(),
            action_pause_ms: default_pause_ms(),
            demo_clicks: default_demo_clicks(),
        }
    }
}

fn default_table_url() -> String {
    "https://the-internet.herokuapp.com/challenging_dom".to_string()
}

fn default_table_ready_timeout_secs() -> u64 {
    10
}

fn default_demo_clicks() -> Vec<DemoClick> {
    vec![
        DemoClick {
            row: 1,
            action: "edit".to_string(),
        },
        DemoClick {
            row: 3,
            action: "delete".to_string(),
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
