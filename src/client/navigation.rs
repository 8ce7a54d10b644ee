use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

use super::History;
use crate::dispatcher::{ClientOutput, ViewRouter};
use crate::error::DispatchError;

/// The parts of a DOM element navigation cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    node_name: String,
    attributes: BTreeMap<String, String>,
}

impl Element {
    #[must_use]
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// An `<a href="...">` element.
    #[must_use]
    pub fn anchor(href: impl Into<String>) -> Self {
        Self::new("A").with_attribute("href", href)
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn is_anchor(&self) -> bool {
        self.node_name.eq_ignore_ascii_case("a")
    }

    /// Raw `href` attribute value, as written in the markup.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.attribute("href")
    }
}

/// A document click as seen by the listener.
#[derive(Debug, Clone, Default)]
pub struct ClickEvent {
    target: Option<Element>,
    default_prevented: bool,
}

impl ClickEvent {
    #[must_use]
    pub fn new(target: Option<Element>) -> Self {
        Self {
            target,
            default_prevented: false,
        }
    }

    #[must_use]
    pub fn target(&self) -> Option<&Element> {
        self.target.as_ref()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Client-side navigation driven by the History API.
///
/// Returned by [`ViewRouter::start`]. The host binding forwards document
/// clicks to [`Navigator::on_click`] and `popstate` events to
/// [`Navigator::on_pop_state`].
pub struct Navigator {
    router: Arc<ViewRouter>,
    client: Arc<ClientOutput>,
    history: Arc<dyn History>,
}

impl Navigator {
    pub(crate) fn new(
        router: Arc<ViewRouter>,
        client: Arc<ClientOutput>,
        history: Arc<dyn History>,
    ) -> Self {
        Self {
            router,
            client,
            history,
        }
    }

    /// Initial resolution against the current location.
    pub(crate) fn init(&self) {
        let path = self.history.current_path();
        if self.dispatch(&path).is_err() {
            debug!(path = %path, "Initial location has no client route");
        }
    }

    /// Document-level click listener.
    ///
    /// Anchors without the pass-thru attribute, or with it set to `"false"`,
    /// are routed client-side and their default navigation is prevented.
    /// Returns whether the click was intercepted.
    pub fn on_click(&self, event: &mut ClickEvent) -> bool {
        let Some(href) = event.target().and_then(|el| self.intercepted_href(el)) else {
            return false;
        };
        let href = href.to_string();
        event.prevent_default();
        trace!(href = %href, "Intercepted anchor click");
        // Unmatched hrefs are already logged by dispatch.
        self.set_route(&href).ok();
        true
    }

    fn intercepted_href<'e>(&self, element: &'e Element) -> Option<&'e str> {
        if !element.is_anchor() {
            return None;
        }
        match element.attribute(&self.client.pass_thru_attribute) {
            None | Some("false") => element.href(),
            Some(_) => None,
        }
    }

    /// Push `path` onto the history and dispatch it.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NotFound`] when no route matches; the history entry
    /// is still pushed.
    pub fn set_route(&self, path: &str) -> Result<(), DispatchError> {
        self.history.push_state(path);
        self.dispatch(path)
    }

    /// Re-dispatch after back/forward navigation, without pushing history.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NotFound`] when no route matches.
    pub fn on_pop_state(&self, path: &str) -> Result<(), DispatchError> {
        self.dispatch(path)
    }

    fn dispatch(&self, path: &str) -> Result<(), DispatchError> {
        let result = self.router.dispatch_client(&self.client, path);
        if let Err(err) = &result {
            debug!(path = %path, error = %err, "Client navigation not routed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_builder() {
        let el = Element::anchor("/widgets/1").with_attribute("data-pass-thru", "true");
        assert!(el.is_anchor());
        assert_eq!(el.href(), Some("/widgets/1"));
        assert_eq!(el.attribute("data-pass-thru"), Some("true"));
        assert!(!Element::new("BUTTON").is_anchor());
        assert!(Element::new("a").is_anchor());
    }

    #[test]
    fn test_click_event_prevent_default() {
        let mut event = ClickEvent::new(None);
        assert!(event.target().is_none());
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
