use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::DispatchError;

/// What a handler asked to render.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// View identifier, e.g. `widgets/show`
    pub name: String,
    /// Template data; an empty object when the handler supplied none
    pub data: Value,
}

impl View {
    /// Build a view, replacing absent or `null` data with an empty object.
    #[must_use]
    pub fn new(name: impl Into<String>, data: Option<Value>) -> Self {
        let data = match data {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(data) => data,
        };
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Result a handler delivers through its completion.
pub type Outcome = Result<View, DispatchError>;

type Deliver = Box<dyn FnOnce(Outcome) + Send>;

/// Single-use continuation handed to every route handler.
///
/// Every method consumes the completion, so a handler can signal at most once.
/// It may be moved elsewhere and called after the handler has returned. A
/// completion dropped without being called reports
/// [`DispatchError::CompletionDropped`], unless it is dropped while unwinding
/// from a handler panic (the panic itself is reported instead).
#[must_use = "a route handler must call its completion"]
pub struct Completion {
    deliver: Option<Deliver>,
}

impl Completion {
    pub(crate) fn new<F>(deliver: F) -> Self
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        Self {
            deliver: Some(Box::new(deliver)),
        }
    }

    /// Render `view` with `data`.
    ///
    /// `data` that fails to serialize is reported as a handler error.
    pub fn render<S: Serialize>(self, view: impl Into<String>, data: S) {
        let outcome = serde_json::to_value(data)
            .map(|data| View::new(view, Some(data)))
            .map_err(|e| DispatchError::Handler(e.into()));
        self.settle(outcome);
    }

    /// Render `view` with an empty data mapping.
    pub fn render_view(self, view: impl Into<String>) {
        self.settle(Ok(View::new(view, None)));
    }

    /// Skip rendering and report `err`.
    pub fn fail<E: Into<anyhow::Error>>(self, err: E) {
        self.settle(Err(DispatchError::Handler(err.into())));
    }

    /// Signal with the full `(error, view, data)` triple.
    ///
    /// An error wins over everything else. Without an error a view is
    /// required; `data` defaults to an empty mapping.
    pub fn respond(self, err: Option<anyhow::Error>, view: Option<&str>, data: Option<Value>) {
        let outcome = match (err, view) {
            (Some(err), _) => Err(DispatchError::Handler(err)),
            (None, Some(view)) => Ok(View::new(view, data)),
            (None, None) => Err(DispatchError::MissingView),
        };
        self.settle(outcome);
    }

    fn settle(mut self, outcome: Outcome) {
        if let Some(deliver) = self.deliver.take() {
            deliver(outcome);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        let Some(deliver) = self.deliver.take() else {
            return;
        };
        if std::thread::panicking() {
            return;
        }
        warn!("Route completion dropped without being called");
        deliver(Err(DispatchError::CompletionDropped));
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.deliver.is_some())
            .finish()
    }
}
