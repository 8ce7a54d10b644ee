//! # Server Module
//!
//! Server-side request pipeline and HTTP transport.
//!
//! - [`Pipeline`] is a connect-style chain of [`Middleware`] stages; each stage
//!   receives the request, the response and a [`Next`] continuation.
//! - [`ViewMiddleware`] mounts a server [`ViewRouter`](crate::ViewRouter) into
//!   that chain: matched routes render into the response, unmatched paths are
//!   forwarded with `next`, dispatch failures are forwarded with `next.fail`.
//! - [`HttpServer`] serves a pipeline over `may_minihttp`.

pub mod http_server;
mod middleware;
pub mod request;
pub mod response;

pub use http_server::{HttpServer, PipelineService, ServerHandle};
pub use middleware::{
    ErrorHandler, ErrorPage, Middleware, Next, Pipeline, ServerContext, ViewMiddleware,
};
pub use request::ServerRequest;
pub use response::{status_reason, ContentType, ServerResponse};
