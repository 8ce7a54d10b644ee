use http::Method;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

use super::RouteParams;
use crate::dispatcher::{Completion, HandlerWrapper};
use crate::Environment;

/// A registered route in the shape its environment dispatches on.
///
/// The variant is chosen once at registration time; dispatch matches on it
/// rather than inspecting handler shapes at runtime.
#[derive(Clone)]
pub enum RouteEntry {
    /// Client routes are a bare handler.
    Client(Arc<HandlerWrapper>),
    /// Server routes are keyed by HTTP method.
    Server(HashMap<Method, Arc<HandlerWrapper>>),
}

impl RouteEntry {
    /// Handler for the given method. Client entries ignore the method.
    #[must_use]
    pub fn handler_for(&self, method: &Method) -> Option<&Arc<HandlerWrapper>> {
        match self {
            RouteEntry::Client(handler) => Some(handler),
            RouteEntry::Server(by_method) => by_method.get(method),
        }
    }
}

/// Mapping from route pattern to entry.
///
/// One entry per distinct pattern; registering a pattern again replaces the
/// earlier entry.
#[derive(Clone, Default)]
pub struct RouteTable {
    entries: BTreeMap<String, RouteEntry>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pattern: &str, entry: RouteEntry) {
        if self.entries.insert(pattern.to_string(), entry).is_some() {
            debug!(pattern = %pattern, "Replaced existing route entry");
        }
    }

    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<&RouteEntry> {
        self.entries.get(pattern)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Handed to the routes callback; each `register` call captures one route.
pub struct Registrar<'a> {
    environment: Environment,
    table: &'a mut RouteTable,
}

impl<'a> Registrar<'a> {
    pub(crate) fn new(environment: Environment, table: &'a mut RouteTable) -> Self {
        Self { environment, table }
    }

    /// Register `handler` under `pattern`.
    ///
    /// The handler receives the matched parameters and a [`Completion`] it must
    /// eventually call to pick the view to render.
    pub fn register<H>(&mut self, pattern: &str, handler: H) -> &mut Self
    where
        H: Fn(&RouteParams, Completion) + Send + Sync + 'static,
    {
        let wrapper = Arc::new(HandlerWrapper::new(pattern, handler));
        // Server routes only answer GET.
        let entry = match self.environment {
            Environment::Client => RouteEntry::Client(wrapper),
            Environment::Server => RouteEntry::Server(HashMap::from([(Method::GET, wrapper)])),
        };
        self.table.insert(pattern, entry);
        info!(
            pattern = %pattern,
            environment = ?self.environment,
            total_routes = self.table.len(),
            "Route registered"
        );
        self
    }
}
