//! hashbatch request router.
//!
//! The service exposes a single hashing endpoint plus a health probe:
//!
//! ```text
//! POST /foo      -> hash a batch
//! GET  /health   -> pool statistics
//! ```
//!
//! The hashing path is configurable; the health paths are fixed.

/// Outcome of routing one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Hash the request body.
    HashBatch,
    /// Report server and pool health.
    Health,
    /// Known path, unsupported method.
    MethodNotAllowed,
    /// Unknown path.
    NotFound,
}

impl Route {
    /// Returns the route name used in log fields.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HashBatch => "HashBatch",
            Self::Health => "Health",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::NotFound => "NotFound",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary health probe path.
pub const HEALTH_PATH: &str = "/health";

/// Alternate health probe path.
pub const HEALTH_PATH_ALT: &str = "/_health";

/// Check whether `path` is one of the health probe paths.
fn is_health_path(path: &str) -> bool {
    path == HEALTH_PATH || path == HEALTH_PATH_ALT
}

/// Resolve the route for a request.
#[must_use]
pub fn resolve_route(method: &http::Method, path: &str, endpoint_path: &str) -> Route {
    if path == endpoint_path {
        if *method == http::Method::POST {
            Route::HashBatch
        } else {
            Route::MethodNotAllowed
        }
    } else if is_health_path(path) {
        if *method == http::Method::GET {
            Route::Health
        } else {
            Route::MethodNotAllowed
        }
    } else {
        Route::NotFound
    }
}
