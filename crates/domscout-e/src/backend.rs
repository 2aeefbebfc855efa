use crate::chromedriver::{self, ChromeDriverProcess};
use crate::webdriver::{self, Query, map_cmd_error};
use async_trait::async_trait;
use domscout_engine::backend::{Backend, BackendError, LocateError, NavigationResult};
use domscout_engine::config::schema::DriverConfig;
use domscout_engine::protocol::{ElementHandle, Interaction, LocatorKind, Rect};
use fantoccini::Client;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Chrome driven over WebDriver.
///
/// Elements found on the current page are kept in an arena and handed out
/// as indexes into it; navigating clears the arena.
pub struct WebDriverBackend {
    client: Option<Client>,
    webdriver_url: Option<String>,
    driver_process: Option<ChromeDriverProcess>,
    chromedriver_path: Option<PathBuf>,
    headless: bool,
    stealth: bool,
    port: u16,
    elements: Vec<Element>,
}

impl WebDriverBackend {
    /// Create a backend that will auto-launch chromedriver.
    pub fn new() -> Self {
        Self {
            client: None,
            webdriver_url: None,
            driver_process: None,
            chromedriver_path: None,
            headless: false,
            stealth: true,
            port: chromedriver::DEFAULT_PORT,
            elements: Vec::new(),
        }
    }

    pub fn from_config(config: &DriverConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            chromedriver_path: config.chromedriver_path.clone(),
            headless: config.headless,
            stealth: config.stealth,
            port: config.port,
            ..Self::new()
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    fn client(&self) -> Result<&Client, BackendError> {
        self.client.as_ref().ok_or(BackendError::NotReady)
    }

    fn element(&self, handle: ElementHandle) -> Result<&Element, BackendError> {
        self.elements
            .get(handle.0 as usize)
            .ok_or_else(|| BackendError::StaleElement(format!("unknown element {}", handle)))
    }

    fn register(&mut self, found: Vec<Element>) -> Vec<ElementHandle> {
        let start = self.elements.len();
        self.elements.extend(found);
        (start..self.elements.len())
            .map(|i| ElementHandle(i as u32))
            .collect()
    }
}

impl Default for WebDriverBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for WebDriverBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        let webdriver_url = if let Some(url) = &self.webdriver_url {
            info!("Connecting to external WebDriver at {}...", url);
            url.clone()
        } else {
            info!("Launching chromedriver on port {}...", self.port);
            let process =
                chromedriver::launch_chromedriver(self.port, self.chromedriver_path.as_deref())
                    .await
                    .map_err(BackendError::Other)?;
            let url = process.webdriver_url();
            self.driver_process = Some(process);
            url
        };

        let caps = webdriver::chrome_capabilities(self.headless, self.stealth);
        let client = webdriver::connect(&webdriver_url, caps).await?;
        self.client = Some(client);
        info!("WebDriver session ready (headless: {})", self.headless);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.elements.clear();
        let result = match self.client.take() {
            Some(client) => client
                .close()
                .await
                .map_err(|e| BackendError::Other(format!("Failed to close session: {}", e))),
            None => Ok(()),
        };
        // Dropping the process handle stops chromedriver.
        self.driver_process = None;
        result
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let client = self.client()?.clone();
        self.elements.clear();

        info!("Navigating to: {}", url);
        client
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        if self.stealth
            && let Err(e) = client.execute(webdriver::STEALTH_SCRIPT, vec![]).await
        {
            warn!("Failed to hide navigator.webdriver: {}", e);
        }

        let title = client.title().await.unwrap_or_default();
        let url = client
            .current_url()
            .await
            .map(|u| u.to_string())
            .unwrap_or_else(|_| url.to_string());
        Ok(NavigationResult { url, title })
    }

    async fn wait_for(
        &mut self,
        kind: LocatorKind,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        let client = self.client()?;
        let query = Query::new(kind, selector);
        debug!(?query, ?timeout, "waiting for element");

        match client.wait().at_most(timeout).for_element(query.locator()).await {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(BackendError::Timeout(timeout.as_secs())),
            Err(e) => Err(map_cmd_error(e)),
        }
    }

    async fn find_all(
        &mut self,
        scope: Option<ElementHandle>,
        kind: LocatorKind,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, LocateError> {
        let query = Query::new(kind, selector);
        let found = match scope {
            Some(handle) => self.element(handle)?.find_all(query.locator()).await,
            None => self.client()?.find_all(query.locator()).await,
        }
        .map_err(map_cmd_error)?;

        debug!(?query, matches = found.len(), "lookup");
        Ok(self.register(found))
    }

    async fn tag_name(&mut self, element: ElementHandle) -> Result<String, BackendError> {
        self.element(element)?
            .tag_name()
            .await
            .map_err(map_cmd_error)
    }

    async fn attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BackendError> {
        self.element(element)?
            .attr(name)
            .await
            .map_err(map_cmd_error)
    }

    async fn attribute_names(&mut self, element: ElementHandle) -> Result<Vec<String>, BackendError> {
        let arg = serde_json::to_value(self.element(element)?)?;
        let value = self
            .client()?
            .execute(webdriver::ATTRIBUTE_NAMES_SCRIPT, vec![arg])
            .await
            .map_err(map_cmd_error)?;
        Ok(serde_json::from_value(value)?)
    }

    async fn text(&mut self, element: ElementHandle) -> Result<String, BackendError> {
        self.element(element)?.text().await.map_err(map_cmd_error)
    }

    async fn rect(&mut self, element: ElementHandle) -> Result<Rect, BackendError> {
        let (x, y, width, height) = self
            .element(element)?
            .rectangle()
            .await
            .map_err(map_cmd_error)?;
        Ok(Rect {
            x,
            y,
            width,
            height,
        })
    }

    async fn is_displayed(&mut self, element: ElementHandle) -> Result<bool, BackendError> {
        self.element(element)?
            .is_displayed()
            .await
            .map_err(map_cmd_error)
    }

    async fn interact(
        &mut self,
        element: ElementHandle,
        action: Interaction,
    ) -> Result<(), BackendError> {
        let el = self.element(element)?;
        let result = match &action {
            Interaction::Click => el.click().await,
            Interaction::Clear => el.clear().await,
            Interaction::SendKeys(text) => el.send_keys(text).await,
        };
        result.map_err(map_cmd_error)
    }
}
