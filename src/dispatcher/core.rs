use http::Method;
use std::backtrace::Backtrace;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::handler::HandlerWrapper;
use crate::client::{Document, ErrorSink, History, LogErrorSink, Navigator};
use crate::config::{ClientConfig, DEFAULT_CONTAINER_ID, DEFAULT_PASS_THRU_ATTRIBUTE};
use crate::error::{ConfigError, DispatchError};
use crate::ids::DispatchId;
use crate::router::{PathRouter, PatternRouter, Registrar, RouteParams, RouteTable};
use crate::server::{ServerContext, ViewMiddleware};
use crate::view::ViewRenderer;

/// Which side of the wire a router runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Browser navigation: output replaces a container element.
    Client,
    /// Request pipeline: output becomes a full HTTP response.
    Server,
}

/// Client output sink plus the per-instance first-render state.
pub(crate) struct ClientOutput {
    pub(crate) document: Arc<dyn Document>,
    pub(crate) alerts: Arc<dyn ErrorSink>,
    pub(crate) container_id: Arc<str>,
    pub(crate) pass_thru_attribute: Arc<str>,
    /// True until the first client-side handler invocation.
    pub(crate) first_render: AtomicBool,
}

impl ClientOutput {
    /// Client terminal action for a failed dispatch.
    pub(crate) fn fail(&self, id: DispatchId, pattern: &str, err: DispatchError) {
        report_error(id, pattern, &err);
        self.alerts.alert(&err.to_string());
    }
}

enum Output {
    Client(Arc<ClientOutput>),
    Server,
}

/// The single logging point every dispatch failure passes through.
pub(crate) fn report_error(id: DispatchId, pattern: &str, err: &DispatchError) {
    error!(
        dispatch_id = %id,
        pattern = %pattern,
        status = err.status(),
        error = %err,
        detail = ?err,
        backtrace = %Backtrace::force_capture(),
        "Route dispatch failed"
    );
}

type RoutesFn = Box<dyn FnOnce(&mut Registrar<'_>)>;

/// Isomorphic route dispatcher.
///
/// Built once from a routes callback; the route table is never mutated
/// afterwards. The same callback can be used to build a client router and a
/// server router.
///
/// ```rust
/// use isoview::{ViewRouter, view::TemplateViews};
/// use std::sync::Arc;
///
/// let views = TemplateViews::from_sources([
///     ("widgets/show", "<div>{{ id }}</div>"),
///     ("layout", "<main>{{ body }}</main>"),
/// ]).unwrap();
///
/// let router = ViewRouter::server()
///     .views(Arc::new(views))
///     .routes(|r| {
///         r.register("/widgets/:id", |params, done| {
///             done.render("widgets/show", serde_json::json!({ "id": params.get("id") }));
///         });
///     })
///     .build()
///     .unwrap();
/// assert_eq!(router.route_count(), 1);
/// ```
pub struct ViewRouter {
    table: RouteTable,
    matcher: Box<dyn PatternRouter>,
    views: Arc<dyn ViewRenderer>,
    output: Output,
}

impl ViewRouter {
    /// Start building a client router that writes into `document`.
    #[must_use]
    pub fn client(document: Arc<dyn Document>) -> ViewRouterBuilder {
        ViewRouterBuilder::new(Environment::Client, Some(document))
    }

    /// Start building a server router.
    #[must_use]
    pub fn server() -> ViewRouterBuilder {
        ViewRouterBuilder::new(Environment::Server, None)
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        match self.output {
            Output::Client(_) => Environment::Client,
            Output::Server => Environment::Server,
        }
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Middleware that dispatches requests through this router.
    ///
    /// # Errors
    ///
    /// [`ConfigError::WrongEnvironment`] for a client router.
    pub fn middleware(self: &Arc<Self>) -> Result<ViewMiddleware, ConfigError> {
        match self.output {
            Output::Server => Ok(ViewMiddleware::new(Arc::clone(self))),
            Output::Client(_) => Err(ConfigError::WrongEnvironment {
                operation: "middleware",
            }),
        }
    }

    /// Wire client navigation and resolve the current location.
    ///
    /// Intended to run once per page load. The returned [`Navigator`] is the
    /// document-level click listener and the history entry point.
    ///
    /// # Errors
    ///
    /// [`ConfigError::WrongEnvironment`] for a server router.
    pub fn start(self: &Arc<Self>, history: Arc<dyn History>) -> Result<Navigator, ConfigError> {
        let Output::Client(client) = &self.output else {
            return Err(ConfigError::WrongEnvironment { operation: "start" });
        };
        let navigator = Navigator::new(Arc::clone(self), Arc::clone(client), history);
        info!(
            container = %client.container_id,
            routes = self.table.len(),
            "Client navigation started"
        );
        navigator.init();
        Ok(navigator)
    }

    fn resolve(
        &self,
        method: &Method,
        path: &str,
    ) -> Result<(Arc<HandlerWrapper>, RouteParams), DispatchError> {
        let not_found = || DispatchError::NotFound {
            path: path.to_string(),
        };
        let matched = self.matcher.recognize(path).ok_or_else(not_found)?;
        let entry = self.table.get(&matched.pattern).ok_or_else(not_found)?;
        // Routing is per method: a pattern without a handler for this method
        // does not match.
        let handler = entry.handler_for(method).ok_or_else(|| {
            debug!(method = %method, pattern = %matched.pattern, "No handler for method");
            not_found()
        })?;
        Ok((Arc::clone(handler), matched.params))
    }

    /// Dispatch a client navigation to `path`.
    ///
    /// Only the not-found signal is returned; failures after a handler was
    /// found go through the error funnel and the error sink.
    pub(crate) fn dispatch_client(
        &self,
        client: &Arc<ClientOutput>,
        path: &str,
    ) -> Result<(), DispatchError> {
        let id = DispatchId::new();
        let (handler, params) = self.resolve(&Method::GET, path)?;
        debug!(dispatch_id = %id, path = %path, pattern = %handler.pattern(), "Client dispatch");
        handler.invoke_client(id, &self.views, client, params);
        Ok(())
    }

    pub(crate) fn dispatch_server(&self, ctx: ServerContext<'_>) {
        match self.resolve(&ctx.request.method, &ctx.request.path) {
            Ok((handler, params)) => {
                debug!(
                    dispatch_id = %ctx.id,
                    method = %ctx.request.method,
                    path = %ctx.request.path,
                    pattern = %handler.pattern(),
                    "Server dispatch"
                );
                handler.invoke_server(ctx, self.views.as_ref(), params);
            }
            Err(_) => {
                debug!(
                    dispatch_id = %ctx.id,
                    method = %ctx.request.method,
                    path = %ctx.request.path,
                    "No route, forwarding"
                );
                ctx.forward();
            }
        }
    }
}

/// Builder for [`ViewRouter`].
pub struct ViewRouterBuilder {
    environment: Environment,
    routes: Option<RoutesFn>,
    views: Option<Arc<dyn ViewRenderer>>,
    document: Option<Arc<dyn Document>>,
    alerts: Arc<dyn ErrorSink>,
    container_id: String,
    pass_thru_attribute: String,
}

impl ViewRouterBuilder {
    fn new(environment: Environment, document: Option<Arc<dyn Document>>) -> Self {
        Self {
            environment,
            routes: None,
            views: None,
            document,
            alerts: Arc::new(LogErrorSink),
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            pass_thru_attribute: DEFAULT_PASS_THRU_ATTRIBUTE.to_string(),
        }
    }

    /// The routes callback; it receives a [`Registrar`] to register patterns on.
    #[must_use]
    pub fn routes<F>(mut self, routes: F) -> Self
    where
        F: FnOnce(&mut Registrar<'_>) + 'static,
    {
        self.routes = Some(Box::new(routes));
        self
    }

    #[must_use]
    pub fn views(mut self, views: Arc<dyn ViewRenderer>) -> Self {
        self.views = Some(views);
        self
    }

    /// Client only: where dispatch errors are surfaced to the user.
    #[must_use]
    pub fn error_sink(mut self, alerts: Arc<dyn ErrorSink>) -> Self {
        self.alerts = alerts;
        self
    }

    /// Client only: id of the element whose contents are replaced.
    #[must_use]
    pub fn container_id(mut self, id: impl Into<String>) -> Self {
        self.container_id = id.into();
        self
    }

    /// Client only: attribute that opts an anchor out of interception.
    #[must_use]
    pub fn pass_thru_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.pass_thru_attribute = attribute.into();
        self
    }

    /// Client only: container id and pass-thru attribute from the `client`
    /// configuration section.
    #[must_use]
    pub fn client_config(self, config: &ClientConfig) -> Self {
        self.container_id(config.container_id.as_str())
            .pass_thru_attribute(config.pass_thru_attribute.as_str())
    }

    /// Capture the routes and compile the pattern table.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingRoutes`] without a routes callback,
    /// [`ConfigError::MissingViews`] without a renderer,
    /// [`ConfigError::InvalidPattern`] when a pattern does not compile.
    pub fn build(self) -> Result<ViewRouter, ConfigError> {
        let routes = self.routes.ok_or(ConfigError::MissingRoutes)?;
        let views = self.views.ok_or(ConfigError::MissingViews)?;

        let mut table = RouteTable::new();
        routes(&mut Registrar::new(self.environment, &mut table));
        let matcher = PathRouter::new(table.patterns())?;

        let output = match (self.environment, self.document) {
            (Environment::Client, Some(document)) => Output::Client(Arc::new(ClientOutput {
                document,
                alerts: self.alerts,
                container_id: Arc::from(self.container_id),
                pass_thru_attribute: Arc::from(self.pass_thru_attribute),
                first_render: AtomicBool::new(true),
            })),
            _ => Output::Server,
        };

        info!(
            environment = ?self.environment,
            routes = table.len(),
            "Router built"
        );
        Ok(ViewRouter {
            table,
            matcher: Box::new(matcher),
            views,
            output,
        })
    }
}
