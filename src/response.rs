//! # Response Module
//!
//! The values a handler returns across the transport bridge.
//!
//! Plain data responses are serialized as-is; view, redirect, and error
//! responses become tagged mappings the bridge recognizes by their
//! `handler` entry. The bridge owns the wire encoding; this module only
//! fixes the shape.

use crate::Dict;
use serde_json::{json, Value};

/// Status sent for redirects unless the handler overrides it.
const DEFAULT_REDIRECT_STATUS: u16 = 302;

/// A handler's return value.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Plain serializable data, passed through unchanged
    Payload(Value),
    /// Render a view component with the given props
    View {
        /// Component name the host resolves
        component: String,
        /// Props handed to the component
        props: Dict,
        /// Render options
        options: Dict,
    },
    /// Redirect the client
    Redirect {
        /// Target location
        location: String,
        /// HTTP status for the redirect
        status: u16,
    },
    /// Surface an error page
    Error {
        /// Error page options
        options: Dict,
    },
}

impl Response {
    /// A plain data response.
    #[must_use]
    pub fn payload(value: Value) -> Self {
        Response::Payload(value)
    }

    /// A view response with default options.
    #[must_use]
    pub fn view(component: impl Into<String>, props: Dict) -> Self {
        Response::View {
            component: component.into(),
            props,
            options: Dict::new(),
        }
    }

    /// A view response with explicit options.
    #[must_use]
    pub fn view_with(component: impl Into<String>, props: Dict, options: Dict) -> Self {
        Response::View {
            component: component.into(),
            props,
            options,
        }
    }

    /// A redirect with the default 302 status.
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        Response::Redirect {
            location: location.into(),
            status: DEFAULT_REDIRECT_STATUS,
        }
    }

    /// A redirect with an explicit status.
    #[must_use]
    pub fn redirect_with_status(location: impl Into<String>, status: u16) -> Self {
        Response::Redirect {
            location: location.into(),
            status,
        }
    }

    /// An error response with default options.
    #[must_use]
    pub fn error() -> Self {
        Response::Error {
            options: Dict::new(),
        }
    }

    /// An error response with explicit options.
    #[must_use]
    pub fn error_with(options: Dict) -> Self {
        Response::Error { options }
    }

    /// The serializable form handed to the transport bridge.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Response::Payload(value) => value,
            Response::View {
                component,
                props,
                options,
            } => json!({
                "handler": "view",
                "component": component,
                "props": props,
                "options": options,
            }),
            Response::Redirect { location, status } => json!({
                "handler": "redirect",
                "location": location,
                "status": status,
            }),
            Response::Error { options } => json!({
                "handler": "error",
                "options": options,
            }),
        }
    }
}

impl From<Value> for Response {
    fn from(value: Value) -> Self {
        Response::Payload(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Response;
    use crate::Dict;
    use serde_json::json;

    #[test]
    fn test_payload_passes_through() {
        let value = json!({"id": 1});
        assert_eq!(Response::payload(value.clone()).into_value(), value);
    }

    #[test]
    fn test_view_is_tagged() {
        let mut props = Dict::new();
        props.insert("name".to_string(), json!("Ada"));
        let value = Response::view("profile", props).into_value();
        assert_eq!(value["handler"], "view");
        assert_eq!(value["component"], "profile");
        assert_eq!(value["props"]["name"], "Ada");
    }

    #[test]
    fn test_redirect_defaults_to_302() {
        let value = Response::redirect("/login").into_value();
        assert_eq!(value["handler"], "redirect");
        assert_eq!(value["location"], "/login");
        assert_eq!(value["status"], 302);
    }

    #[test]
    fn test_redirect_status_override() {
        let value = Response::redirect_with_status("/moved", 301).into_value();
        assert_eq!(value["status"], 301);
    }

    #[test]
    fn test_error_is_tagged() {
        let value = Response::error().into_value();
        assert_eq!(value["handler"], "error");
    }
}
