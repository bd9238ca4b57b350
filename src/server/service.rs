use std::io::{self, Write};
use std::sync::Arc;

use tracing::{debug, info};

use super::{Request, Response};
use crate::config::RouterConfig;
use crate::dispatcher::Dispatcher;
use crate::method::{MethodFlag, MethodSet};
use crate::middleware::{CorsMiddleware, Middleware, TracingMiddleware};
use crate::router::{RegisterError, RouteTable};

/// The application: route registration plus the request pipeline.
///
/// A new service installs [`CorsMiddleware`] followed by
/// [`TracingMiddleware`]. Further middleware runs after those two.
pub struct AppService {
    dispatcher: Dispatcher,
    cors: CorsMiddleware,
}

impl AppService {
    pub fn new(cors: CorsMiddleware) -> Self {
        let mut dispatcher = Dispatcher::new();
        dispatcher.add_middleware(Arc::new(cors.clone()));
        dispatcher.add_middleware(Arc::new(TracingMiddleware));
        info!(allowed_origin = %cors.allowed_origin(), "Service created");
        Self { dispatcher, cors }
    }

    /// Service with the CORS origin taken from `config`. Routes in the
    /// config are not registered; they carry no handler.
    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(CorsMiddleware::new(config.cors.allowed_origin.clone()))
    }

    pub fn cors(&self) -> &CorsMiddleware {
        &self.cors
    }

    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.dispatcher.add_middleware(mw);
    }

    /// Register `handler` for `mask` under every method in `methods`.
    ///
    /// # Errors
    ///
    /// Fails when the mask is malformed or `methods` is empty.
    pub fn add<H>(
        &mut self,
        methods: impl Into<MethodSet>,
        mask: &str,
        handler: H,
    ) -> Result<(), RegisterError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.dispatcher.register(methods, mask, handler)
    }

    /// # Errors
    ///
    /// Fails when the mask is malformed.
    pub fn get<H>(&mut self, mask: &str, handler: H) -> Result<(), RegisterError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(MethodFlag::Get, mask, handler)
    }

    /// # Errors
    ///
    /// Fails when the mask is malformed.
    pub fn post<H>(&mut self, mask: &str, handler: H) -> Result<(), RegisterError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(MethodFlag::Post, mask, handler)
    }

    /// # Errors
    ///
    /// Fails when the mask is malformed.
    pub fn put<H>(&mut self, mask: &str, handler: H) -> Result<(), RegisterError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(MethodFlag::Put, mask, handler)
    }

    /// # Errors
    ///
    /// Fails when the mask is malformed.
    pub fn delete<H>(&mut self, mask: &str, handler: H) -> Result<(), RegisterError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(MethodFlag::Delete, mask, handler)
    }

    /// # Errors
    ///
    /// Fails when the mask is malformed.
    pub fn head<H>(&mut self, mask: &str, handler: H) -> Result<(), RegisterError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(MethodFlag::Head, mask, handler)
    }

    /// # Errors
    ///
    /// Fails when the mask is malformed.
    pub fn patch<H>(&mut self, mask: &str, handler: H) -> Result<(), RegisterError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(MethodFlag::Patch, mask, handler)
    }

    /// Register an `OPTIONS` handler. Accepted preflights never reach it.
    ///
    /// # Errors
    ///
    /// Fails when the mask is malformed.
    pub fn options<H>(&mut self, mask: &str, handler: H) -> Result<(), RegisterError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(MethodFlag::Options, mask, handler)
    }

    pub fn table(&self) -> &RouteTable {
        self.dispatcher.table()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run `req` through middleware and dispatch; the response is not yet sent.
    pub fn handle(&self, req: &mut Request) -> Response {
        self.dispatcher.handle(req)
    }

    /// Handle `req` and write the response to `out` exactly once.
    ///
    /// Returns the final status code.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn serve<W: Write>(&self, req: &mut Request, out: &mut W) -> io::Result<u16> {
        let mut res = self.handle(req);
        let status = res.status();
        res.write_to(out)?;
        debug!(method = %req.method, path = %req.path, status, "Response written");
        Ok(status)
    }
}

impl Default for AppService {
    fn default() -> Self {
        Self::new(CorsMiddleware::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_writes_cors_headers() {
        let mut app = AppService::default();
        app.get("/ping", |_, res| {
            res.set_body(Some("pong".to_string()));
        })
        .unwrap();

        let mut req = Request::new(MethodFlag::Get, "/ping");
        let mut out = Vec::new();
        assert_eq!(app.serve(&mut req, &mut out).unwrap(), 200);
        let wire = String::from_utf8(out).unwrap();
        assert!(wire.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(wire.contains("Access-Control-Allow-Origin: *\r\n"));
        assert!(wire.contains("Access-Control-Allow-Methods: GET\r\n"));
        assert!(wire.ends_with("\r\n\r\npong"));
    }

    #[test]
    fn test_verb_helpers_register_single_flags() {
        let mut app = AppService::default();
        app.put("/a", |_, _| {}).unwrap();
        app.patch("/a", |_, _| {}).unwrap();
        app.head("/a", |_, _| {}).unwrap();
        app.delete("/a", |_, _| {}).unwrap();
        assert_eq!(app.table().groups().len(), 4);
        assert_eq!(
            app.table().eligible_methods().names(),
            vec!["PUT", "DELETE", "HEAD", "PATCH"]
        );
    }
}
