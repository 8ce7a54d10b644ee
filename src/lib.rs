//! # isoview
//!
//! **isoview** is an isomorphic route dispatcher: one route definition drives
//! both server-side page rendering and client-side single-page navigation.
//!
//! ## Overview
//!
//! An application supplies a routes callback that registers URL patterns
//! (`/widgets/:id`) with handlers. The same callback builds a router for either
//! environment:
//!
//! - on the **server** the router is a [`Middleware`](server::Middleware)
//!   stage; a matched GET request renders the handler's view inside the
//!   `layout` view and becomes the HTTP response;
//! - on the **client** the router renders the view alone and writes it into a
//!   container element, driven by intercepted anchor clicks and the History API.
//!
//! Handlers never return: they signal through a single-use
//! [`Completion`], which may be called after the handler returns.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern compilation, path matching and the route table
//! - **[`dispatcher`]** - The [`ViewRouter`], handler invocation and completions
//! - **[`view`]** - The [`ViewRenderer`](view::ViewRenderer) seam and minijinja-backed views
//! - **[`server`]** - Request pipeline, view middleware and the `may_minihttp` transport
//! - **[`client`]** - Document, history and alert seams plus the click-driven [`Navigator`](client::Navigator)
//! - **[`config`]** - YAML configuration with environment overrides
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`error`]** - Configuration, view and dispatch error types
//!
//! ### Server Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer<br/>(may_minihttp)
//!     participant Pipeline as Pipeline
//!     participant Views as ViewMiddleware
//!     participant Handler as Route handler
//!     participant Renderer as ViewRenderer
//!
//!     Client->>Server: GET /widgets/42
//!     Server->>Pipeline: ServerRequest
//!     Pipeline->>Views: handle(req, res, next)
//!     Views->>Views: recognize("/widgets/42")<br/>{id: "42"}
//!
//!     alt No Route Match
//!         Views->>Pipeline: next.run()
//!     end
//!
//!     Views->>Handler: handler(params, completion)
//!     Handler-->>Views: completion.render("widgets/show", data)
//!
//!     alt Handler Error / Panic
//!         Views->>Pipeline: next.fail(err)
//!         Pipeline-->>Client: 500 error page
//!     end
//!
//!     Views->>Renderer: render("widgets/show", data)
//!     Views->>Renderer: render_layout(body)
//!     Views-->>Server: 200 text/html
//!     Server-->>Client: HTTP Response
//! ```
//!
//! ### Client Navigation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Browser
//!     participant Nav as Navigator
//!     participant Router as ViewRouter
//!     participant Handler as Route handler
//!     participant Doc as Document
//!
//!     Browser->>Nav: start(history)
//!     Nav->>Router: dispatch(current path)
//!     Note over Router: first render skipped,<br/>server markup kept
//!     Browser->>Nav: on_click(anchor)
//!     Nav->>Nav: prevent_default, push_state
//!     Nav->>Router: dispatch(href)
//!     Router->>Handler: handler(params, completion)
//!     Handler-->>Router: completion.render(view, data)
//!     Router->>Doc: set_inner_html(container, html)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use isoview::server::{Pipeline, ServerRequest};
//! use isoview::view::TemplateViews;
//! use isoview::ViewRouter;
//! use std::sync::Arc;
//!
//! let views = TemplateViews::from_sources([
//!     ("widgets/show", "<p>Widget {{ id }}</p>"),
//!     ("layout", "<html><body>{{ body }}</body></html>"),
//! ])
//! .unwrap();
//!
//! let router = Arc::new(
//!     ViewRouter::server()
//!         .views(Arc::new(views))
//!         .routes(|r| {
//!             r.register("/widgets/:id", |params, done| {
//!                 done.render("widgets/show", serde_json::json!({ "id": params.get("id") }));
//!             });
//!         })
//!         .build()
//!         .unwrap(),
//! );
//!
//! let pipeline = Pipeline::new().with(Arc::new(router.middleware().unwrap()));
//! let res = pipeline.handle(&ServerRequest::new(http::Method::GET, "/widgets/42"));
//! assert_eq!(res.status(), 200);
//! assert_eq!(res.body(), "<html><body><p>Widget 42</p></body></html>");
//! ```

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod logging;
pub mod router;
pub mod server;
pub mod view;

pub use dispatcher::{Completion, Environment, View, ViewRouter, ViewRouterBuilder};
pub use error::{ConfigError, DispatchError, ViewError};
pub use router::{Registrar, RouteParams};
