use std::time::Duration;

use tracing::{debug, warn};

use super::{Flow, Middleware};
use crate::method::{MethodFlag, MethodSet};
use crate::server::{Request, Response};

/// Allowed-origin value that accepts every origin
pub const WILDCARD_ORIGIN: &str = "*";

/// `Access-Control-Max-Age` for an answered preflight (20 days)
pub const PREFLIGHT_MAX_AGE: u32 = 1_728_000;

/// `Access-Control-Max-Age` for every other request
pub const DEFAULT_MAX_AGE: u32 = 3600;

/// `Access-Control-Allow-Headers` set before dispatch
pub const REQUEST_ALLOW_HEADERS: &str =
    "Content-Type, Access-Control-Allow-Headers, Authorization, X-Requested-With";

/// `Access-Control-Allow-Headers` set after dispatch
pub const RESPONSE_ALLOW_HEADERS: &str =
    "Authorization, Origin, X-Requested-With, Content-Type, Accept";

/// Raw status line added to rejected responses
pub const FORBIDDEN_STATUS_LINE: &str = "HTTP/1.1 403 Access Forbidden";

/// CORS (Cross-Origin Resource Sharing) middleware
///
/// Configured with a single allowed origin (default `*`).
///
/// - `OPTIONS` requests whose origin passes the origin check are answered
///   directly (200, `text/plain`, long max-age) and never dispatched.
/// - Every other request gets a 3600s max-age and the request-side
///   allow-headers list, then goes to dispatch.
/// - After dispatch, `Access-Control-Allow-Origin`,
///   `Access-Control-Allow-Headers` and `Access-Control-Allow-Methods` are set
///   on every response. The methods list is every method the route table
///   accepts, in canonical order.
///
/// # Origin check
///
/// The check rejects a request (403, `text/plain`, plus the raw
/// `HTTP/1.1 403 Access Forbidden` line) when a specific origin is configured
/// and the request's `Origin` *equals* it. Requests from any other origin pass.
/// The check only runs for `OPTIONS` requests; a rejected `OPTIONS` request is
/// still dispatched.
///
/// # Header order
///
/// All three after-dispatch headers are written once the handler has run, so
/// a non-preflight response carries `Access-Control-Max-Age`,
/// `Access-Control-Allow-Headers` (the response-side list, overwriting the
/// request-side one in place), `Access-Control-Allow-Origin`, then
/// `Access-Control-Allow-Methods`. Routers that set `Allow-Origin` before
/// dispatch emit it first and keep the request-side `Allow-Headers` list.
///
/// ```rust
/// use maskrouter::middleware::CorsMiddleware;
///
/// let cors = CorsMiddleware::new("https://app.example");
/// assert_eq!(cors.allowed_origin(), "https://app.example");
/// assert!(CorsMiddleware::default().is_wildcard());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsMiddleware {
    allowed_origin: String,
}

impl CorsMiddleware {
    #[must_use]
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        Self {
            allowed_origin: allowed_origin.into(),
        }
    }

    /// Accept every origin
    #[must_use]
    pub fn permissive() -> Self {
        Self::new(WILDCARD_ORIGIN)
    }

    #[must_use]
    pub fn allowed_origin(&self) -> &str {
        &self.allowed_origin
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.allowed_origin == WILDCARD_ORIGIN
    }

    /// Run the origin check, writing the 403 response on rejection.
    ///
    /// Returns `true` when the request may proceed as a preflight.
    pub fn check_origin(&self, req: &Request, res: &mut Response) -> bool {
        if !self.is_wildcard() && req.origin.as_deref() == Some(self.allowed_origin.as_str()) {
            warn!(
                origin = %self.allowed_origin,
                path = %req.path,
                "CORS: origin rejected"
            );
            res.add_raw_header(FORBIDDEN_STATUS_LINE);
            res.set_content_type("text/plain");
            res.set_status(403);
            return false;
        }
        true
    }
}

impl Default for CorsMiddleware {
    fn default() -> Self {
        Self::permissive()
    }
}

impl Middleware for CorsMiddleware {
    fn before(&self, req: &Request, res: &mut Response) -> Flow {
        if req.method == MethodFlag::Options && self.check_origin(req, res) {
            debug!(path = %req.path, origin = ?req.origin, "CORS preflight answered");
            res.set_header("Access-Control-Max-Age", PREFLIGHT_MAX_AGE.to_string());
            res.set_header("Content-Length", "0");
            res.set_content_type("text/plain");
            res.set_status(200);
            return Flow::Handled;
        }

        res.set_header("Access-Control-Max-Age", DEFAULT_MAX_AGE.to_string());
        res.set_header("Access-Control-Allow-Headers", REQUEST_ALLOW_HEADERS);
        Flow::Continue
    }

    fn after(&self, _req: &Request, res: &mut Response, allowed: MethodSet, _latency: Duration) {
        res.set_header("Access-Control-Allow-Origin", self.allowed_origin.as_str());
        res.set_header("Access-Control-Allow-Headers", RESPONSE_ALLOW_HEADERS);
        res.set_header("Access-Control-Allow-Methods", allowed.names().join(", "));
    }
}
