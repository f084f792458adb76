//! # Portico
//!
//! **Portico** is a request facade for host-bridged handlers: it turns one
//! opaque request payload plus a handful of loosely-typed key/value maps into
//! an immutable, fully-typed per-request view, with lazy exactly-once payload
//! decoding and schema-driven field coercion.
//!
//! ## Overview
//!
//! The engine sits between a transport bridge (which owns HTTP parsing,
//! network I/O, and serialization; none of that lives here) and business
//! handlers. Per inbound call it assembles a [`Request`] from raw inputs:
//!
//! - **[`body`]** - lazy, memoized, kind-gated decoding of the single raw
//!   payload into text, JSON, form fields, or binary form
//! - **[`schema`]** - primitive field types plus a schema that validates or
//!   coerces a whole mapping, fail-fast
//! - **[`bag`]** - immutable, named string→string bags over the decoded
//!   query, header, path-capture, and cookie maps
//! - **[`request`]** - URL decomposition and the per-request assembly
//! - **[`response`]** - the response values handed back across the bridge
//! - **[`router`]** - the verb → handler table owned by the composition root
//!
//! ## Architecture
//!
//! A raw payload and raw maps enter at the boundary. [`Body`] defers every
//! decode until first use and caches the outcome (including decode errors)
//! behind a one-shot guard, so concurrent first access runs the expensive
//! bridge call exactly once. [`Bag`]s stringify their raw maps once at
//! construction. [`Schema`] turns the loosely-typed contents of either into
//! concretely typed values, with coercion for string-only sources such as
//! query parameters.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use portico::body::DecodeError;
//! use portico::{Body, Dict, FieldType, PayloadSource, Request, Response, Router, Schema, Url};
//!
//! struct JsonPayload(&'static str);
//!
//! impl PayloadSource for JsonPayload {
//!     fn kind_tag(&self) -> &str {
//!         "json"
//!     }
//!
//!     fn read_json(&self) -> Result<Vec<u8>, DecodeError> {
//!         Ok(self.0.as_bytes().to_vec())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let url = Url::parse("https://example.com/pets?limit=10")?;
//! let body = Body::new(Box::new(JsonPayload(r#"{"name":"Fluffy","age":"3"}"#)));
//! let request = Request::new(url, body, &Dict::new(), &Dict::new(), &Dict::new(), &Dict::new());
//!
//! let mut router = Router::new();
//! router.post(|req: &Request| {
//!     let schema = Schema::new([("name", FieldType::String), ("age", FieldType::Int)]);
//!     match req.body.json_with(&schema) {
//!         Ok(pet) => Response::payload(pet.into()),
//!         Err(_) => Response::error(),
//!     }
//! })?;
//!
//! let response = router.dispatch(&Method::POST, &request)?;
//! assert_eq!(response.into_value()["age"], 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a returned value: kind mismatches never trigger a decode,
//! decode failures are cached and surfaced on every access, schema validation
//! stops at the first offending field, and duplicate handler registration
//! fails at registration time rather than at dispatch.

pub mod bag;
pub mod body;
pub mod request;
pub mod response;
pub mod router;
pub mod schema;

pub use bag::{Bag, BagError};
pub use body::{Body, BodyError, FilePart, Kind, PayloadSource};
pub use request::{Request, Url, UrlError};
pub use response::Response;
pub use router::{Handler, Router, RouterError};
pub use schema::{FieldType, Schema, SchemaError};

/// Loosely-typed string-keyed mapping exchanged with the host bridge.
///
/// Decoded JSON payloads, form fields, bag snapshots, and schema results all
/// share this shape.
pub type Dict = serde_json::Map<String, serde_json::Value>;
