//! Dispatcher core module - request hot path.
//!
//! Walks the route table in registration order, invokes handlers for matching
//! masks and runs middleware around the whole thing.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::method::MethodSet;
use crate::middleware::{Flow, Middleware};
use crate::router::{ParamVec, RegisterError, RouteTable};
use crate::server::{Request, Response};

/// Result of dispatching one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// At least one handler ran
    Matched {
        /// Parameters captured by every matched mask, in match order
        params: ParamVec,
        /// How many handlers were invoked (one per eligible method-set group at most)
        handlers_invoked: usize,
    },
    /// No eligible route matched; the response status was set to 404
    NotFound,
}

impl Outcome {
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Outcome::Matched { .. })
    }
}

/// Owns the route table and middleware chain.
///
/// Build it at startup, then share it read-only between requests.
#[derive(Default)]
pub struct Dispatcher {
    table: RouteTable,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_table(table: RouteTable) -> Self {
        Self {
            table,
            middlewares: Vec::new(),
        }
    }

    /// Register a handler, see [`RouteTable::register`].
    ///
    /// # Errors
    ///
    /// Fails when the mask is malformed or `methods` is empty.
    pub fn register<H>(
        &mut self,
        methods: impl Into<MethodSet>,
        mask: &str,
        handler: H,
    ) -> Result<(), RegisterError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.table.register(methods, mask, handler)
    }

    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Match `req` against the route table and invoke handlers.
    ///
    /// Groups are tried in registration order; a group is eligible when its
    /// method set contains the request method. Within a group the first
    /// matching mask wins. Iteration then carries on into later groups, so a
    /// request can reach one handler per overlapping group.
    ///
    /// When nothing matches the response status is set to 404.
    pub fn dispatch(&self, req: &mut Request, res: &mut Response) -> Outcome {
        let match_start = Instant::now();
        let mut matched = ParamVec::new();
        let mut handlers_invoked = 0;

        for group in self.table.groups() {
            if !group.methods().contains(req.method) {
                continue;
            }
            for route in group.routes() {
                let Some(params) = route.mask().captures(&req.path) else {
                    continue;
                };

                info!(
                    method = %req.method,
                    path = %req.path,
                    methods = %group.methods(),
                    mask = %route.mask(),
                    path_params = ?params,
                    duration_us = match_start.elapsed().as_micros(),
                    "Route matched"
                );

                matched.extend(params.iter().cloned());
                req.add_params(params);
                route.invoke(req, res);
                handlers_invoked += 1;
                break;
            }
        }

        if handlers_invoked == 0 {
            warn!(
                method = %req.method,
                path = %req.path,
                duration_us = match_start.elapsed().as_micros(),
                "No route matched"
            );
            res.set_status(404);
            return Outcome::NotFound;
        }

        if handlers_invoked > 1 {
            debug!(
                method = %req.method,
                path = %req.path,
                handlers_invoked,
                "Request matched routes in several method groups"
            );
        }

        Outcome::Matched {
            params: matched,
            handlers_invoked,
        }
    }

    /// Run the full pipeline for one request and return the unsent response.
    ///
    /// Every middleware's `before` runs in order; if any reports
    /// [`Flow::Handled`] dispatch is skipped. Every `after` then runs in order
    /// with the table's eligible methods and the elapsed time.
    pub fn handle(&self, req: &mut Request) -> Response {
        let start = Instant::now();
        let mut res = Response::new();

        let mut handled = false;
        for mw in &self.middlewares {
            if mw.before(req, &mut res) == Flow::Handled && !handled {
                debug!(
                    method = %req.method,
                    path = %req.path,
                    middleware_name = std::any::type_name_of_val(mw.as_ref()),
                    "Middleware handled request"
                );
                handled = true;
            }
        }

        if !handled {
            self.dispatch(req, &mut res);
        }

        let allowed = self.table.eligible_methods();
        let latency: Duration = start.elapsed();
        for mw in &self.middlewares {
            mw.after(req, &mut res, allowed, latency);
        }

        res
    }
}
