//! # Router Module
//!
//! The verb → handler table owned by the application's composition root.
//!
//! ## Overview
//!
//! The router is an explicit object constructed once at startup and passed
//! into the dispatch path, never ambient global state. Registering two
//! handlers for the same verb is an unrecoverable configuration error and
//! fails at registration time, before any request is dispatched.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut router = Router::new();
//! router
//!     .get(|req: &Request| Response::payload(json!({"ok": true})))?
//!     .post(handle_create)?;
//!
//! let response = router.dispatch(&Method::GET, &request)?;
//! ```

mod core;

pub use core::{Handler, Router, RouterError};
