use async_trait::async_trait;
pub use domscout_common::error::{BackendError, LocateError};
pub use domscout_common::protocol::NavigationResult;
use domscout_common::protocol::{ElementHandle, Interaction, LocatorKind, Rect};
use std::time::Duration;

/// The Backend trait is the locate capability every browser driver must
/// provide. Runner and extractor only ever talk to a page through it.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start the driver, open a session).
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the session and cleanup resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check if the backend is ready to accept commands.
    async fn is_ready(&self) -> bool;

    /// Navigate to a specific URL. Invalidates every handle handed out so far.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    /// Wait until `selector` matches at least one element.
    /// Returns `BackendError::Timeout` once `timeout` has elapsed.
    async fn wait_for(
        &mut self,
        kind: LocatorKind,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BackendError>;

    /// All elements matching `selector`, in document order. An empty vector
    /// is a valid answer; `scope` restricts the search to descendants.
    async fn find_all(
        &mut self,
        scope: Option<ElementHandle>,
        kind: LocatorKind,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, LocateError>;

    /// First element matching `selector`.
    async fn find_one(
        &mut self,
        scope: Option<ElementHandle>,
        kind: LocatorKind,
        selector: &str,
    ) -> Result<ElementHandle, LocateError> {
        self.find_all(scope, kind, selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LocateError::no_match(kind, selector))
    }

    async fn tag_name(&mut self, element: ElementHandle) -> Result<String, BackendError>;

    /// Attribute value, `None` when the attribute is absent.
    async fn attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BackendError>;

    /// Names of every attribute set on the element.
    async fn attribute_names(&mut self, _element: ElementHandle) -> Result<Vec<String>, BackendError> {
        Err(BackendError::NotSupported("attribute_names".into()))
    }

    /// Rendered (visible) text of the element.
    async fn text(&mut self, element: ElementHandle) -> Result<String, BackendError>;

    async fn rect(&mut self, element: ElementHandle) -> Result<Rect, BackendError>;

    async fn is_displayed(&mut self, element: ElementHandle) -> Result<bool, BackendError>;

    /// Simulate a click or keyboard input on the element.
    async fn interact(
        &mut self,
        element: ElementHandle,
        action: Interaction,
    ) -> Result<(), BackendError>;
}
