//! # Client Module
//!
//! Browser-side collaborators and single-page navigation.
//!
//! The DOM, the History API and the blocking alert are host facilities; this
//! module only defines the narrow traits the dispatcher writes through and the
//! [`Navigator`] that turns anchor clicks into client-side route transitions.
//!
//! ```rust,ignore
//! let router = Arc::new(
//!     ViewRouter::client(document)
//!         .views(views)
//!         .error_sink(alerts)
//!         .routes(app_routes)
//!         .build()?,
//! );
//! let navigator = router.start(history)?;
//! // host binding: forward every document click
//! navigator.on_click(&mut event);
//! ```

mod navigation;

pub use navigation::{ClickEvent, Element, Navigator};

use tracing::warn;

/// Container writes. Implemented by the host DOM binding.
pub trait Document: Send + Sync {
    /// Replace the contents of the element with `element_id` by `html`.
    fn set_inner_html(&self, element_id: &str, html: &str);
}

/// Where client dispatch errors are surfaced to the user.
pub trait ErrorSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// History API access. Implemented by the host binding.
pub trait History: Send + Sync {
    /// Path (with query) of the current location.
    fn current_path(&self) -> String;
    /// Push a new history entry for `path` without reloading.
    fn push_state(&self, path: &str);
}

/// Error sink that only logs; the default until the host supplies one.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn alert(&self, message: &str) {
        warn!(message = %message, "Route error (no alert sink configured)");
    }
}
