use crate::request::Request;
use crate::response::Response;
use http::Method;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, error, info};

/// A registered request handler.
pub type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// Router configuration or dispatch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A handler is already registered for this verb. Raised at
    /// registration time, never deferred to dispatch.
    DuplicateHandler(Method),
    /// No handler is registered for this verb.
    NoHandler(Method),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::DuplicateHandler(method) => {
                write!(f, "duplicate handler registered for {method}")
            }
            RouterError::NoHandler(method) => {
                write!(f, "no handler registered for {method}")
            }
        }
    }
}

impl std::error::Error for RouterError {}

/// Verb → handler table.
///
/// Owned by the composition root, constructed once at startup, and passed by
/// reference into the dispatch path. Immutable once registration finishes;
/// dispatch reads are safe for unsynchronized concurrent access.
#[derive(Default)]
pub struct Router {
    handlers: HashMap<Method, Handler>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("verbs", &self.verbs())
            .finish()
    }
}

impl Router {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Router {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for `method`.
    ///
    /// Fails with [`RouterError::DuplicateHandler`] when a handler already
    /// exists for the verb; this is a configuration error surfaced at
    /// startup, not at dispatch time. Returns `&mut Self` so registrations
    /// chain.
    pub fn route<F>(&mut self, method: Method, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        if self.handlers.contains_key(&method) {
            error!(method = %method, "duplicate handler registration");
            return Err(RouterError::DuplicateHandler(method));
        }
        info!(
            method = %method,
            total_handlers = self.handlers.len() + 1,
            "handler registered"
        );
        self.handlers.insert(method, Box::new(handler));
        Ok(self)
    }

    /// Register a GET handler.
    pub fn get<F>(&mut self, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.route(Method::GET, handler)
    }

    /// Register a POST handler.
    pub fn post<F>(&mut self, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.route(Method::POST, handler)
    }

    /// Register a PUT handler.
    pub fn put<F>(&mut self, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.route(Method::PUT, handler)
    }

    /// Register a PATCH handler.
    pub fn patch<F>(&mut self, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.route(Method::PATCH, handler)
    }

    /// Register a DELETE handler.
    pub fn delete<F>(&mut self, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.route(Method::DELETE, handler)
    }

    /// Register a HEAD handler.
    pub fn head<F>(&mut self, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.route(Method::HEAD, handler)
    }

    /// Register a CONNECT handler.
    pub fn connect<F>(&mut self, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.route(Method::CONNECT, handler)
    }

    /// Register an OPTIONS handler.
    pub fn options<F>(&mut self, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.route(Method::OPTIONS, handler)
    }

    /// Register a TRACE handler.
    pub fn trace<F>(&mut self, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.route(Method::TRACE, handler)
    }

    /// The registered verbs, for export to the host bridge.
    #[must_use]
    pub fn verbs(&self) -> Vec<Method> {
        self.handlers.keys().cloned().collect()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler registered for `method`.
    ///
    /// Fails with [`RouterError::NoHandler`] for an unregistered verb; no
    /// handler is invoked in that case.
    pub fn dispatch(&self, method: &Method, request: &Request) -> Result<Response, RouterError> {
        let handler = self.handlers.get(method).ok_or_else(|| {
            error!(method = %method, available = self.handlers.len(), "handler not found");
            RouterError::NoHandler(method.clone())
        })?;
        debug!(method = %method, path = %request.url.pathname, "dispatching request");
        Ok(handler(request))
    }
}
