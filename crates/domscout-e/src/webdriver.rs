//! Session plumbing shared by the WebDriver backend: connecting, Chrome
//! capabilities and the translation of locator kinds into W3C locators.

use domscout_engine::backend::BackendError;
use domscout_engine::protocol::LocatorKind;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use tracing::debug;

/// Hides `navigator.webdriver` from page scripts.
pub const STEALTH_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined});";

/// Lists attribute names of `arguments[0]`.
pub const ATTRIBUTE_NAMES_SCRIPT: &str =
    "return Array.from(arguments[0].attributes).map(function (a) { return a.name; });";

pub async fn connect(url: &str, capabilities: Map<String, Value>) -> Result<Client, BackendError> {
    debug!("Connecting to WebDriver at {}", url);
    ClientBuilder::native()
        .capabilities(capabilities)
        .connect(url)
        .await
        .map_err(|e| BackendError::Other(format!("Failed to connect to WebDriver at {}: {}", url, e)))
}

/// `goog:chromeOptions` for the configured browser mode.
pub fn chrome_capabilities(headless: bool, stealth: bool) -> Map<String, Value> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--window-size=1366,768".to_string(),
    ];
    if headless {
        args.push("--headless=new".to_string());
    }

    let mut chrome_opts = Map::new();
    if stealth {
        args.push("--disable-blink-features=AutomationControlled".to_string());
        chrome_opts.insert("excludeSwitches".to_string(), json!(["enable-automation"]));
        chrome_opts.insert("useAutomationExtension".to_string(), json!(false));
    }
    chrome_opts.insert("args".to_string(), json!(args));

    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), Value::Object(chrome_opts));
    caps
}

/// A selector rewritten into one of the four W3C locator strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Css(String),
    Id(String),
    LinkText(String),
    XPath(String),
}

impl Query {
    pub fn new(kind: LocatorKind, selector: &str) -> Self {
        match kind {
            LocatorKind::Css | LocatorKind::TagName => Query::Css(selector.to_string()),
            LocatorKind::Id => Query::Id(selector.to_string()),
            LocatorKind::Name => Query::Css(format!("[name={}]", css_string(selector))),
            LocatorKind::ClassName => Query::Css(format!(".{}", selector.trim())),
            LocatorKind::XPath => Query::XPath(selector.to_string()),
            LocatorKind::LinkText => Query::LinkText(selector.to_string()),
            LocatorKind::PartialLinkText => Query::XPath(format!(
                ".//a[contains(normalize-space(.), {})]",
                xpath_literal(selector)
            )),
        }
    }

    pub fn locator(&self) -> Locator<'_> {
        match self {
            Query::Css(s) => Locator::Css(s),
            Query::Id(s) => Locator::Id(s),
            Query::LinkText(s) => Locator::LinkText(s),
            Query::XPath(s) => Locator::XPath(s),
        }
    }
}

/// Double-quoted CSS string.
fn css_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// XPath 1.0 has no escapes, so strings holding both quote kinds are built
/// with `concat()`.
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

pub fn map_cmd_error(e: CmdError) -> BackendError {
    let message = e.to_string();
    if message.contains("stale element") {
        BackendError::StaleElement(message)
    } else if message.contains("invalid selector") || message.contains("invalid argument") {
        BackendError::InvalidSelector(message)
    } else {
        BackendError::Other(message)
    }
}
