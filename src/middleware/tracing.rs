use std::time::Duration;

use tracing::{debug, info, warn};

use super::{Flow, Middleware};
use crate::method::MethodSet;
use crate::server::{Request, Response};

/// Logs one line per request once the response is complete.
///
/// Status 4xx/5xx are logged at `warn`, everything else at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&self, req: &Request, _res: &mut Response) -> Flow {
        debug!(
            method = %req.method,
            path = %req.path,
            origin = ?req.origin,
            "Request received"
        );
        Flow::Continue
    }

    fn after(&self, req: &Request, res: &mut Response, _allowed: MethodSet, latency: Duration) {
        let latency_us = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        if res.status() >= 400 {
            warn!(
                method = %req.method,
                path = %req.path,
                status = res.status(),
                latency_us,
                "Request completed"
            );
        } else {
            info!(
                method = %req.method,
                path = %req.path,
                status = res.status(),
                latency_us,
                "Request completed"
            );
        }
    }
}
