use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span};

use super::request::ServerRequest;
use super::response::{status_reason, ContentType, ServerResponse};
use crate::dispatcher::ViewRouter;
use crate::error::DispatchError;
use crate::ids::DispatchId;

/// A stage in the request pipeline.
pub trait Middleware: Send + Sync {
    /// Handle the request, or hand it on with `next`.
    fn handle(&self, req: &ServerRequest, res: &mut ServerResponse, next: Next<'_>);
}

/// Terminal handler for errors forwarded with [`Next::fail`].
pub trait ErrorHandler: Send + Sync {
    fn handle_error(&self, req: &ServerRequest, res: &mut ServerResponse, err: DispatchError);
}

/// Default error handler: a minimal HTML page carrying the error's status.
///
/// The error message is logged upstream and never echoed to the client.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorPage;

impl ErrorHandler for ErrorPage {
    fn handle_error(&self, req: &ServerRequest, res: &mut ServerResponse, err: DispatchError) {
        let status = err.status();
        debug!(
            dispatch_id = %req.id,
            path = %req.path,
            status = status,
            "Writing error page"
        );
        res.send(status, ContentType::Html, error_page(status));
    }
}

fn error_page(status: u16) -> String {
    let reason = status_reason(status);
    format!(
        "<!DOCTYPE html><html><head><title>{status} {reason}</title></head>\
         <body><h1>{status} {reason}</h1></body></html>"
    )
}

/// The continuation handed to each stage.
///
/// Consumed on use, so a stage can continue at most once.
pub struct Next<'a> {
    stages: &'a [Arc<dyn Middleware>],
    errors: &'a dyn ErrorHandler,
    request: &'a ServerRequest,
}

impl Next<'_> {
    /// Continue with the following stage; past the last stage answer 404.
    pub fn run(self, res: &mut ServerResponse) {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.handle(
                self.request,
                res,
                Next {
                    stages: rest,
                    errors: self.errors,
                    request: self.request,
                },
            ),
            None => {
                debug!(dispatch_id = %self.request.id, path = %self.request.path, "End of pipeline");
                self.errors.handle_error(
                    self.request,
                    res,
                    DispatchError::NotFound {
                        path: self.request.path.clone(),
                    },
                );
            }
        }
    }

    /// Skip the remaining stages and hand `err` to the error handler.
    pub fn fail(self, res: &mut ServerResponse, err: DispatchError) {
        self.errors.handle_error(self.request, res, err);
    }

    /// `run` without an error, `fail` with one.
    pub fn call(self, res: &mut ServerResponse, err: Option<DispatchError>) {
        match err {
            Some(err) => self.fail(res, err),
            None => self.run(res),
        }
    }
}

/// Ordered chain of middleware stages with a terminal error handler.
pub struct Pipeline {
    stages: Vec<Arc<dyn Middleware>>,
    errors: Arc<dyn ErrorHandler>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            errors: Arc::new(ErrorPage),
        }
    }

    /// Append a stage; stages run in the order they are added.
    #[must_use]
    pub fn with(mut self, stage: Arc<dyn Middleware>) -> Self {
        self.stages.push(stage);
        self
    }

    #[must_use]
    pub fn on_error(mut self, errors: Arc<dyn ErrorHandler>) -> Self {
        self.errors = errors;
        self
    }

    /// Run `req` through the chain and return the resulting response.
    #[must_use]
    pub fn handle(&self, req: &ServerRequest) -> ServerResponse {
        let span = info_span!(
            "request",
            dispatch_id = %req.id,
            method = %req.method,
            path = %req.path
        );
        let _entered = span.enter();
        let started = Instant::now();

        let mut res = ServerResponse::new();
        Next {
            stages: &self.stages,
            errors: self.errors.as_ref(),
            request: req,
        }
        .run(&mut res);

        info!(
            status = res.status(),
            latency_us = started.elapsed().as_micros() as u64,
            "Request complete"
        );
        res
    }
}

/// Per-dispatch context on the server.
///
/// Carries the request, the response and the pipeline continuation
/// explicitly through the dispatch call chain.
pub struct ServerContext<'a> {
    pub id: DispatchId,
    pub request: &'a ServerRequest,
    pub response: &'a mut ServerResponse,
    next: Next<'a>,
}

impl<'a> ServerContext<'a> {
    pub(crate) fn new(
        request: &'a ServerRequest,
        response: &'a mut ServerResponse,
        next: Next<'a>,
    ) -> Self {
        Self {
            id: request.id,
            request,
            response,
            next,
        }
    }

    /// Not handled here; continue with the next stage.
    pub fn forward(self) {
        self.next.run(self.response);
    }

    /// Hand `err` to the host pipeline's error handling.
    pub fn fail(self, err: DispatchError) {
        self.next.fail(self.response, err);
    }
}

/// Mounts a server [`ViewRouter`] into a [`Pipeline`].
///
/// Obtained from [`ViewRouter::middleware`].
#[derive(Clone)]
pub struct ViewMiddleware {
    router: Arc<ViewRouter>,
}

impl ViewMiddleware {
    pub(crate) fn new(router: Arc<ViewRouter>) -> Self {
        Self { router }
    }
}

impl Middleware for ViewMiddleware {
    fn handle(&self, req: &ServerRequest, res: &mut ServerResponse, next: Next<'_>) {
        self.router.dispatch_server(ServerContext::new(req, res, next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    struct Hello;

    impl Middleware for Hello {
        fn handle(&self, req: &ServerRequest, res: &mut ServerResponse, next: Next<'_>) {
            if req.path == "/hello" {
                res.send(200, ContentType::Text, "hello".to_string());
            } else {
                next.run(res);
            }
        }
    }

    struct Broken;

    impl Middleware for Broken {
        fn handle(&self, _req: &ServerRequest, res: &mut ServerResponse, next: Next<'_>) {
            next.call(res, Some(DispatchError::CompletionDropped));
        }
    }

    #[test]
    fn test_stage_answers() {
        let pipeline = Pipeline::new().with(Arc::new(Hello));
        let res = pipeline.handle(&ServerRequest::new(Method::GET, "/hello"));
        assert_eq!(res.status(), 200);
        assert_eq!(res.body(), "hello");
    }

    #[test]
    fn test_exhausted_chain_is_404_page() {
        let pipeline = Pipeline::new().with(Arc::new(Hello));
        let res = pipeline.handle(&ServerRequest::new(Method::GET, "/missing"));
        assert_eq!(res.status(), 404);
        assert_eq!(res.content_type(), ContentType::Html);
        assert!(res.body().contains("404 Not Found"));
    }

    #[test]
    fn test_fail_skips_remaining_stages() {
        let pipeline = Pipeline::new().with(Arc::new(Broken)).with(Arc::new(Hello));
        let res = pipeline.handle(&ServerRequest::new(Method::GET, "/hello"));
        assert_eq!(res.status(), 500);
        assert!(res.body().contains("Internal Server Error"));
    }
}
