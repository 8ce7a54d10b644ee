use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use may::sync::mpsc;
use tracing::{debug, info};

use super::completion::{Completion, Outcome, View};
use super::core::{report_error, ClientOutput};
use crate::error::DispatchError;
use crate::ids::DispatchId;
use crate::router::RouteParams;
use crate::server::ServerContext;
use crate::view::ViewRenderer;

type UserHandler = Box<dyn Fn(&RouteParams, Completion) + Send + Sync>;

/// A user handler adapted to the dispatch sequence.
///
/// Invocation order:
/// 1. client only: the first invocation since the router was built is
///    swallowed, the server-rendered markup already shows this route;
/// 2. the user handler runs with the params and a [`Completion`], panics are
///    caught;
/// 3. on completion the view is rendered and delivered to the sink;
/// 4. any failure goes through the error funnel.
pub struct HandlerWrapper {
    pattern: Arc<str>,
    handler: UserHandler,
}

impl HandlerWrapper {
    pub(crate) fn new<H>(pattern: &str, handler: H) -> Self
    where
        H: Fn(&RouteParams, Completion) + Send + Sync + 'static,
    {
        Self {
            pattern: Arc::from(pattern),
            handler: Box::new(handler),
        }
    }

    /// Pattern this handler was registered under.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Run the user handler in a protected scope.
    pub(crate) fn call(
        &self,
        id: DispatchId,
        params: &RouteParams,
        completion: Completion,
    ) -> Result<(), DispatchError> {
        info!(
            dispatch_id = %id,
            pattern = %self.pattern,
            params = ?params,
            "Handler execution start"
        );
        let started = Instant::now();
        catch_unwind(AssertUnwindSafe(|| (self.handler)(params, completion))).map_err(
            |panic| {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                DispatchError::HandlerPanic(message)
            },
        )?;
        debug!(
            dispatch_id = %id,
            pattern = %self.pattern,
            execution_time_us = started.elapsed().as_micros() as u64,
            "Handler returned"
        );
        Ok(())
    }

    pub(crate) fn invoke_client(
        &self,
        id: DispatchId,
        views: &Arc<dyn ViewRenderer>,
        client: &Arc<ClientOutput>,
        params: RouteParams,
    ) {
        if client.first_render.swap(false, Ordering::AcqRel) {
            debug!(
                dispatch_id = %id,
                pattern = %self.pattern,
                "First render, keeping server markup"
            );
            return;
        }

        let views = Arc::clone(views);
        let sink = Arc::clone(client);
        let pattern = Arc::clone(&self.pattern);
        let completion = Completion::new(move |outcome| {
            match outcome.and_then(|view| render(views.as_ref(), view)) {
                Ok(html) => {
                    sink.document.set_inner_html(&sink.container_id, &html);
                    debug!(
                        dispatch_id = %id,
                        pattern = %pattern,
                        container = %sink.container_id,
                        "View written to container"
                    );
                }
                Err(err) => sink.fail(id, &pattern, err),
            }
        });

        if let Err(err) = self.call(id, &params, completion) {
            client.fail(id, &self.pattern, err);
        }
    }

    /// Server dispatch blocks the request coroutine until the completion fires.
    pub(crate) fn invoke_server(
        &self,
        ctx: ServerContext<'_>,
        views: &dyn ViewRenderer,
        params: RouteParams,
    ) {
        let (tx, rx) = mpsc::channel::<Outcome>();
        let completion = Completion::new(move |outcome| {
            if tx.send(outcome).is_err() {
                debug!("Completion fired after the request was abandoned");
            }
        });

        let outcome = self
            .call(ctx.id, &params, completion)
            .and_then(|()| rx.recv().unwrap_or(Err(DispatchError::CompletionDropped)));

        let page = outcome
            .and_then(|view| render(views, view))
            .and_then(|html| views.render_layout(&html).map_err(DispatchError::Layout));

        match page {
            Ok(page) => {
                debug!(
                    dispatch_id = %ctx.id,
                    pattern = %self.pattern,
                    bytes = page.len(),
                    "Page rendered"
                );
                ctx.response.send_html(page);
            }
            Err(err) => {
                report_error(ctx.id, &self.pattern, &err);
                ctx.fail(err);
            }
        }
    }
}

fn render(views: &dyn ViewRenderer, view: View) -> Result<String, DispatchError> {
    views
        .render(&view.name, &view.data)
        .map_err(DispatchError::Render)
}
