//! # Dispatcher Module
//!
//! Handler wrapping and render/dispatch sequencing.
//!
//! ## Overview
//!
//! [`ViewRouter`] owns the route table, the pattern router and the view
//! renderer. Every registered handler is wrapped in a [`HandlerWrapper`] that
//! funnels its [`Completion`] through one render step and then into the
//! environment's sink:
//!
//! - **client**: the rendered view replaces the contents of the container
//!   element; the very first invocation after page load is skipped because the
//!   server-rendered markup is already correct;
//! - **server**: the rendered view is wrapped in the `layout` template and sent
//!   as the response body.
//!
//! ## Error Handling
//!
//! Handler errors, handler panics, dropped completions and render failures are
//! logged once and then either forwarded to the host pipeline's `next`
//! (server) or surfaced through the [`ErrorSink`](crate::client::ErrorSink)
//! (client). Nothing is retried.
//!
//! ## Completion Semantics
//!
//! A [`Completion`] is consumed when called, so a handler cannot render twice.
//! On the server the request coroutine waits on a `may` channel until the
//! completion fires, which lets handlers complete from another coroutine or
//! thread.

mod completion;
mod core;
mod handler;

pub use completion::{Completion, Outcome, View};
pub use core::{Environment, ViewRouter, ViewRouterBuilder};
pub use handler::HandlerWrapper;

pub(crate) use core::ClientOutput;
