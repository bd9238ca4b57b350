//! # maskrouter
//!
//! **maskrouter** is a small synchronous HTTP request router. Handlers are
//! registered against URL *masks*: path templates with named parameters,
//! per-parameter regex constraints and nested optional segments, under one or
//! more HTTP methods. A CORS gate answers preflights and decorates every
//! response.
//!
//! ## Architecture
//!
//! - **[`method`]** - HTTP method flags and method sets (bitmask)
//! - **[`router`]** - Mask compiler and the ordered route table
//! - **[`dispatcher`]** - Middleware pipeline and first-match dispatch
//! - **[`middleware`]** - CORS gate and request logging
//! - **[`server`]** - Request value, response sink and the [`AppService`] facade
//! - **[`config`]** - YAML router configuration
//! - **[`otel`]** - Structured logging setup
//! - **[`cli`]** - `maskrouter` operator commands
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Service as AppService
//!     participant Cors as CorsMiddleware
//!     participant Dispatcher as Dispatcher
//!     participant Table as RouteTable
//!     participant Handler
//!
//!     Caller->>Service: handle(Request)
//!     Service->>Cors: before(req, res)
//!     alt OPTIONS preflight accepted
//!         Cors-->>Service: Handled (200, Max-Age 1728000)
//!     else any other request
//!         Cors-->>Service: Continue (Max-Age 3600)
//!         Service->>Dispatcher: dispatch(req, res)
//!         Dispatcher->>Table: eligible groups in registration order
//!         Table-->>Dispatcher: first matching mask per group
//!         Dispatcher->>Handler: invoke(req + params, res)
//!         alt nothing matched
//!             Dispatcher->>Dispatcher: status 404
//!         end
//!     end
//!     Service->>Cors: after(req, res, eligible methods)
//!     Service-->>Caller: Response
//!     Caller->>Caller: send() exactly once
//! ```
//!
//! ## Masks
//!
//! | Mask | Matches |
//! |---|---|
//! | `/about` | exactly `/about` |
//! | `/user/{id}` | `/user/42`, `/user/bob` (one segment) |
//! | `/user/{id:\d+}` | `/user/42` only |
//! | `/archive[/{year}[/{month}]]` | `/archive`, `/archive/2024`, `/archive/2024/05` |
//!
//! ## Quick Start
//!
//! ```rust
//! use maskrouter::method::MethodFlag;
//! use maskrouter::server::{AppService, Request};
//! use maskrouter::middleware::CorsMiddleware;
//!
//! let mut app = AppService::new(CorsMiddleware::new("https://app.example"));
//! app.add(MethodFlag::Get | MethodFlag::Post, "/user/{id:\\d+}", |req, res| {
//!     let id = req.param("id").unwrap_or_default().to_string();
//!     res.set_content_type("text/plain");
//!     res.set_body(Some(id));
//! })
//! .unwrap();
//!
//! let mut req = Request::new(MethodFlag::Get, "/user/42");
//! let mut res = app.handle(&mut req);
//! let sent = res.send().unwrap();
//! assert_eq!(sent.status, 200);
//! assert_eq!(sent.body.as_deref(), Some("42"));
//! assert_eq!(sent.header("Access-Control-Allow-Methods"), Some("GET, POST"));
//!
//! let mut req = Request::new(MethodFlag::Get, "/user/bob");
//! assert_eq!(app.handle(&mut req).status(), 404);
//! ```
//!
//! ## Logging
//!
//! Every component emits `tracing` events. Binaries install a subscriber with
//! [`otel::init_logging_with_config`]; see [`otel`] for the `MASKR_LOG_*`
//! variables.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod echo;
pub mod method;
pub mod middleware;
pub mod otel;
pub mod router;
pub mod server;

pub use config::RouterConfig;
pub use dispatcher::{Dispatcher, Outcome};
pub use method::{MethodFlag, MethodSet};
pub use middleware::{CorsMiddleware, Flow, Middleware, TracingMiddleware};
pub use router::{MaskPattern, RegisterError, RouteTable};
pub use server::{AppService, Request, Response};
