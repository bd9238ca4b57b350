use std::time::Duration;

use crate::method::MethodSet;
use crate::server::{Request, Response};

/// What the pipeline should do after a `before` hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Dispatch the request to the route table
    Continue,
    /// The response is complete; skip dispatch
    Handled,
}

pub trait Middleware: Send + Sync {
    fn before(&self, _req: &Request, _res: &mut Response) -> Flow {
        Flow::Continue
    }

    /// `allowed` is every method the route table accepts.
    fn after(&self, _req: &Request, _res: &mut Response, _allowed: MethodSet, _latency: Duration) {
    }
}
