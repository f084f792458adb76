//! # Body Module
//!
//! The body module provides lazy, memoized access to the single raw request
//! payload handed over by the transport bridge.
//!
//! ## Overview
//!
//! A payload is exactly one of: text, JSON, form fields, or binary. The kind
//! is fixed at construction from the payload's own metadata tag and
//! determines which single decode operation is legal. Calling an accessor
//! whose required kind does not match fails immediately with
//! [`BodyError::KindMismatch`] and never attempts a decode.
//!
//! ## Decode Semantics
//!
//! Bridge decodes are expensive and may not be idempotent (a stream-draining
//! call, for instance), so each decode path owns an independent one-shot
//! memoization cell:
//!
//! - `text()` and `binary()` cache the decoded value itself
//! - `json()` and `fields()` cache the raw encoded bytes once and re-parse
//!   them on every call
//! - `files()` is deliberately not memoized: the file list is expected to be
//!   read at most once per request, and each part's bytes are copied into an
//!   owned buffer before they are returned
//!
//! Decode errors are cached exactly like values; retrying would re-read a
//! cache that will not change.
//!
//! ## Example
//!
//! ```rust,ignore
//! let body = Body::new(Box::new(bridge_payload));
//! let schema = Schema::new([("age", FieldType::Int)]);
//!
//! match body.kind() {
//!     Kind::Json => {
//!         let data = body.json_with(&schema)?;
//!         println!("age = {}", data["age"]);
//!     }
//!     Kind::Text => println!("{}", body.text()?),
//!     _ => {}
//! }
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use core::{Body, BodyError, DecodeError, FilePart, FilePartRef, Kind, PayloadSource};
