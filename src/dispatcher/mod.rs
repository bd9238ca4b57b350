//! # Dispatcher Module
//!
//! Runs a [`Request`](crate::server::Request) through the middleware chain and
//! the route table, invoking the handlers of matching routes.
//!
//! ## Request Flow
//!
//! 1. Middleware `before` hooks (CORS may answer a preflight here)
//! 2. Route table walk: eligible method groups in registration order, first
//!    matching mask per group
//! 3. Captured parameters are merged into the request and the handler runs
//! 4. Nothing matched: status 404
//! 5. Middleware `after` hooks (CORS headers, request logging)
//!
//! ## Concurrency
//!
//! Dispatch is synchronous. Handlers run on the caller's thread and may block;
//! the dispatcher imposes no timeout. A built `Dispatcher` is `Send + Sync` and
//! can be shared behind an `Arc` as long as nothing registers routes anymore.
//!
//! ## Example
//!
//! ```rust
//! use maskrouter::dispatcher::{Dispatcher, Outcome};
//! use maskrouter::method::MethodFlag;
//! use maskrouter::server::{Request, Response};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher
//!     .register(MethodFlag::Get, "/user/{id}", |req, res| {
//!         res.set_body(req.param("id").map(str::to_string));
//!     })
//!     .unwrap();
//!
//! let mut req = Request::new(MethodFlag::Get, "/user/42");
//! let mut res = Response::new();
//! assert!(dispatcher.dispatch(&mut req, &mut res).is_matched());
//! assert_eq!(res.body(), Some("42"));
//!
//! let mut req = Request::new(MethodFlag::Post, "/user/42");
//! let mut res = Response::new();
//! assert_eq!(dispatcher.dispatch(&mut req, &mut res), Outcome::NotFound);
//! assert_eq!(res.status(), 404);
//! ```

mod core;

pub use self::core::{Dispatcher, Outcome};
