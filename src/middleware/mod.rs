//! Request middleware.
//!
//! [`Middleware`] hooks run around dispatch. A `before` hook can finish the
//! response and return [`Flow::Handled`] to skip the route table; `after`
//! hooks always run.

mod core;
mod cors;
mod tracing;

pub use self::core::{Flow, Middleware};
pub use cors::{
    CorsMiddleware, DEFAULT_MAX_AGE, FORBIDDEN_STATUS_LINE, PREFLIGHT_MAX_AGE,
    REQUEST_ALLOW_HEADERS, RESPONSE_ALLOW_HEADERS, WILDCARD_ORIGIN,
};
pub use self::tracing::TracingMiddleware;
