#![allow(dead_code)]

use async_trait::async_trait;
use domscout_engine::backend::{Backend, BackendError, LocateError, NavigationResult};
use domscout_engine::cli::OutputHandlers;
use domscout_engine::config::DomscoutConfig;
use domscout_engine::protocol::{ElementHandle, Interaction, LocatorKind, Rect};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct MockElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub value: String,
    pub displayed: bool,
    pub children: Vec<usize>,
}

/// In-memory page. Elements are stored in document order; selector lookups
/// are answered from an explicit table, falling back to tag names.
#[derive(Default)]
pub struct MockBackend {
    pub elements: Vec<MockElement>,
    pub selectors: HashMap<(LocatorKind, String), Vec<usize>>,
    /// Selectors whose lookup fails with a driver error.
    pub broken_selectors: HashSet<String>,
    /// Every wait times out.
    pub never_ready: bool,
    pub navigations: Vec<String>,
    pub interactions: Vec<(ElementHandle, Interaction)>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element under `parent` and return its index.
    pub fn add(&mut self, parent: Option<usize>, tag: &str) -> usize {
        let index = self.elements.len();
        self.elements.push(MockElement {
            tag: tag.to_string(),
            displayed: true,
            ..Default::default()
        });
        if let Some(parent) = parent {
            self.elements[parent].children.push(index);
        }
        index
    }

    pub fn add_text(&mut self, parent: Option<usize>, tag: &str, text: &str) -> usize {
        let index = self.add(parent, tag);
        self.elements[index].text = text.to_string();
        index
    }

    pub fn set_attr(&mut self, element: usize, name: &str, value: &str) {
        self.elements[element]
            .attributes
            .push((name.to_string(), value.to_string()));
    }

    /// Register the elements a selector resolves to.
    pub fn route(&mut self, kind: LocatorKind, selector: &str, elements: &[usize]) {
        self.selectors
            .insert((kind, selector.to_string()), elements.to_vec());
    }

    pub fn value_of(&self, element: usize) -> &str {
        &self.elements[element].value
    }

    /// Build `<table>` with a header row and one body row per entry. Each
    /// row is its data cells plus `(label, href)` links for the action cell.
    pub fn table_page(headers: &[&str], rows: &[(Vec<&str>, Vec<(&str, &str)>)]) -> Self {
        let mut page = Self::new();
        let body = page.add(None, "body");
        let table = page.add(Some(body), "table");
        let thead = page.add(Some(table), "thead");
        let head_row = page.add(Some(thead), "tr");
        for header in headers {
            page.add_text(Some(head_row), "th", header);
        }
        let tbody = page.add(Some(table), "tbody");
        for (cells, links) in rows {
            let tr = page.add(Some(tbody), "tr");
            for cell in cells {
                page.add_text(Some(tr), "td", cell);
            }
            if !links.is_empty() {
                let actions = page.add(Some(tr), "td");
                for (label, href) in links {
                    let a = page.add_text(Some(actions), "a", label);
                    page.set_attr(a, "href", href);
                }
            }
        }
        page
    }

    /// Elements in `scope` (or the whole page) whose tag is `tag`.
    fn by_tag(&self, scope: Option<usize>, tag: &str) -> Vec<usize> {
        let mut found = Vec::new();
        match scope {
            Some(root) => self.collect(root, tag, &mut found),
            None => {
                for (i, el) in self.elements.iter().enumerate() {
                    if el.tag == tag {
                        found.push(i);
                    }
                }
            }
        }
        found
    }

    fn collect(&self, node: usize, tag: &str, found: &mut Vec<usize>) {
        for &child in &self.elements[node].children {
            if self.elements[child].tag == tag {
                found.push(child);
            }
            self.collect(child, tag, found);
        }
    }

    fn element(&self, handle: ElementHandle) -> Result<&MockElement, BackendError> {
        self.elements
            .get(handle.0 as usize)
            .ok_or_else(|| BackendError::StaleElement(handle.to_string()))
    }

    fn element_mut(&mut self, handle: ElementHandle) -> Result<&mut MockElement, BackendError> {
        self.elements
            .get_mut(handle.0 as usize)
            .ok_or_else(|| BackendError::StaleElement(handle.to_string()))
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        true
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        self.navigations.push(url.to_string());
        Ok(NavigationResult {
            url: url.to_string(),
            title: "Mock page".to_string(),
        })
    }

    async fn wait_for(
        &mut self,
        kind: LocatorKind,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        if self.never_ready {
            return Err(BackendError::Timeout(timeout.as_secs()));
        }
        match self.find_all(None, kind, selector).await {
            Ok(found) if !found.is_empty() => Ok(()),
            _ => Err(BackendError::Timeout(timeout.as_secs())),
        }
    }

    async fn find_all(
        &mut self,
        scope: Option<ElementHandle>,
        kind: LocatorKind,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, LocateError> {
        if self.broken_selectors.contains(selector) {
            return Err(BackendError::InvalidSelector(selector.to_string()).into());
        }

        let found = match (scope, self.selectors.get(&(kind, selector.to_string()))) {
            (None, Some(routed)) => routed.clone(),
            _ => {
                let is_tag = matches!(kind, LocatorKind::TagName | LocatorKind::Css)
                    && selector.chars().all(|c| c.is_ascii_alphanumeric());
                if is_tag {
                    self.by_tag(scope.map(|h| h.0 as usize), selector)
                } else {
                    Vec::new()
                }
            }
        };

        Ok(found.into_iter().map(|i| ElementHandle(i as u32)).collect())
    }

    async fn tag_name(&mut self, element: ElementHandle) -> Result<String, BackendError> {
        Ok(self.element(element)?.tag.clone())
    }

    async fn attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BackendError> {
        Ok(self
            .element(element)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone()))
    }

    async fn attribute_names(&mut self, element: ElementHandle) -> Result<Vec<String>, BackendError> {
        Ok(self
            .element(element)?
            .attributes
            .iter()
            .map(|(n, _)| n.clone())
            .collect())
    }

    async fn text(&mut self, element: ElementHandle) -> Result<String, BackendError> {
        Ok(self.element(element)?.text.clone())
    }

    async fn rect(&mut self, element: ElementHandle) -> Result<Rect, BackendError> {
        self.element(element)?;
        Ok(Rect {
            x: 10.0,
            y: 20.0 * element.0 as f64,
            width: 100.0,
            height: 20.0,
        })
    }

    async fn is_displayed(&mut self, element: ElementHandle) -> Result<bool, BackendError> {
        Ok(self.element(element)?.displayed)
    }

    async fn interact(
        &mut self,
        element: ElementHandle,
        action: Interaction,
    ) -> Result<(), BackendError> {
        let el = self.element_mut(element)?;
        match &action {
            Interaction::Click => {}
            Interaction::Clear => el.value.clear(),
            Interaction::SendKeys(text) => el.value.push_str(text),
        }
        self.interactions.push((element, action));
        Ok(())
    }
}

/// Config with every delay disabled and output under `dir`.
pub fn fast_config(dir: &Path) -> DomscoutConfig {
    let mut config = DomscoutConfig::default();
    config.mapping.settle_ms = 0;
    config.mapping.pacing_ms = 0;
    config.mapping.demo_pause_ms = 0;
    config.table.action_pause_ms = 0;
    config.output.dir = dir.to_path_buf();
    config
}

pub fn quiet() -> OutputHandlers {
    OutputHandlers::silent()
}
