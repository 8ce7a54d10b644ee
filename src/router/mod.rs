//! # Router Module
//!
//! Route capture and path recognition.
//!
//! ## Overview
//!
//! - [`RouteTable`] maps each registered pattern to a [`RouteEntry`] whose shape is
//!   fixed by the environment at registration time (a bare handler on the client,
//!   a method-keyed map on the server).
//! - [`Registrar`] is what the routes callback receives; every `register` call
//!   wraps the user handler and stores it in the table.
//! - [`PatternRouter`] is the matching engine seam; [`PathRouter`] is the
//!   regex-backed default.
//!
//! ## Example
//!
//! ```rust
//! use isoview::router::{PathRouter, PatternRouter};
//!
//! let router = PathRouter::new(["/widgets/:id"]).unwrap();
//! let matched = router.recognize("/widgets/42").unwrap();
//! assert_eq!(matched.params.get("id"), Some("42"));
//! ```

mod core;
mod table;
#[cfg(test)]
mod tests;

pub use core::{
    ParamVec, PathRouter, PatternMatch, PatternRouter, RouteParams, MAX_INLINE_PARAMS,
    SPLAT_PARAM,
};
pub use table::{Registrar, RouteEntry, RouteTable};
