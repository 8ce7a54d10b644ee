//! Error types shared by registration, rendering and dispatch.
//!
//! Every failure detected while dispatching a route is a [`DispatchError`]. All of
//! them flow through a single logging point before reaching one of two terminal
//! actions: the host pipeline's `next` continuation on the server, or the
//! configured [`ErrorSink`](crate::client::ErrorSink) on the client.

use std::fmt;

/// Failure raised while building a [`ViewRouter`](crate::ViewRouter).
///
/// These are fatal and returned synchronously from
/// [`ViewRouterBuilder::build`](crate::ViewRouterBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No routes callback was supplied to the builder.
    MissingRoutes,
    /// No view renderer was supplied to the builder.
    MissingViews,
    /// The pattern router could not compile a route pattern.
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Why it was rejected
        reason: String,
    },
    /// An operation was requested on a router built for the other environment.
    WrongEnvironment {
        /// Name of the operation
        operation: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRoutes => write!(f, "Must provide routes."),
            ConfigError::MissingViews => write!(f, "Must provide a view renderer."),
            ConfigError::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid route pattern '{}': {}", pattern, reason)
            }
            ConfigError::WrongEnvironment { operation } => {
                write!(
                    f,
                    "'{}' is not available for a router built for this environment",
                    operation
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure raised by a [`ViewRenderer`](crate::view::ViewRenderer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The view identifier does not resolve to a template.
    NotFound {
        /// The unresolved view identifier
        view: String,
    },
    /// The template was found but rendering it failed.
    Render {
        /// The view being rendered
        view: String,
        /// Engine error message
        message: String,
    },
    /// A template file could not be read or compiled while loading.
    Load {
        /// File or template name
        path: String,
        /// Underlying error message
        message: String,
    },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::NotFound { view } => write!(f, "View '{}' not found", view),
            ViewError::Render { view, message } => {
                write!(f, "Failed to render view '{}': {}", view, message)
            }
            ViewError::Load { path, message } => {
                write!(f, "Failed to load template '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for ViewError {}

/// Failure detected while dispatching a single route.
///
/// Every dispatch failure is terminal for that dispatch; nothing is retried.
#[derive(Debug)]
pub enum DispatchError {
    /// The handler reported an error through its completion.
    Handler(anyhow::Error),
    /// The handler panicked while being invoked.
    HandlerPanic(String),
    /// The handler dropped its completion without ever calling it.
    CompletionDropped,
    /// The completion was called without an error and without a view.
    MissingView,
    /// Rendering the selected view failed.
    Render(ViewError),
    /// Wrapping the rendered view in the layout failed (server only).
    Layout(ViewError),
    /// No pattern matched the path, or the matched pattern has no handler
    /// for the request method.
    NotFound {
        /// The unmatched path
        path: String,
    },
}

impl DispatchError {
    /// HTTP status the host pipeline should answer with for this error.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::NotFound { .. } => 404,
            _ => 500,
        }
    }

    /// True for the router's not-found signal, which is not treated as an error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, DispatchError::NotFound { .. })
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Handler(err) => write!(f, "{}", err),
            DispatchError::HandlerPanic(message) => write!(f, "Handler panicked: {}", message),
            DispatchError::CompletionDropped => {
                write!(f, "Handler finished without calling its completion")
            }
            DispatchError::MissingView => write!(f, "Handler completed without a view"),
            DispatchError::Render(err) => write!(f, "{}", err),
            DispatchError::Layout(err) => write!(f, "Layout: {}", err),
            DispatchError::NotFound { path } => write!(f, "No route matches '{}'", path),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Handler(err) => Some(err.as_ref()),
            DispatchError::Render(err) | DispatchError::Layout(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            DispatchError::NotFound {
                path: "/x".to_string()
            }
            .status(),
            404
        );
        assert_eq!(DispatchError::CompletionDropped.status(), 500);
        assert_eq!(
            DispatchError::Layout(ViewError::NotFound {
                view: "layout".to_string()
            })
            .status(),
            500
        );
    }

    #[test]
    fn test_handler_error_keeps_message_and_source() {
        use std::error::Error;

        let err = DispatchError::Handler(anyhow::anyhow!("widget 7 is gone"));
        assert_eq!(err.to_string(), "widget 7 is gone");
        assert!(err.source().is_some());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(ConfigError::MissingRoutes.to_string(), "Must provide routes.");
        let err = ConfigError::InvalidPattern {
            pattern: "/a/:".to_string(),
            reason: "empty parameter name".to_string(),
        };
        assert!(err.to_string().contains("/a/:"));
    }
}
