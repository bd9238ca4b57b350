//! # Router Module
//!
//! Path matching for maskrouter: masks (path templates) are compiled into
//! regex matchers and stored in a [`RouteTable`] grouped by the method set
//! they were registered under.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling masks such as `/user/{id}/[edit]` or `/item/{id:\d+}`
//! - Rejecting malformed masks at registration time
//! - Keeping routes in registration order for first-match dispatch
//! - Reporting which methods the application accepts at all
//!
//! ## Example
//!
//! ```rust
//! use maskrouter::method::MethodFlag;
//! use maskrouter::router::RouteTable;
//!
//! let mut table = RouteTable::new();
//! table
//!     .register(MethodFlag::Get, "/user/{id}", |req, res| {
//!         let id = req.param("id").unwrap_or_default().to_string();
//!         res.set_body(Some(id));
//!     })
//!     .unwrap();
//!
//! assert!(table.register(MethodFlag::Get, "/broken[", |_, _| {}).is_err());
//! assert_eq!(table.eligible_methods().names(), vec!["GET"]);
//! ```

mod core;
mod error;
mod mask;

pub use self::core::{Handler, ParamVec, Route, RouteGroup, RouteTable, MAX_INLINE_PARAMS};
pub use error::{MalformedMaskError, RegisterError};
pub use mask::{tokenize, MaskPattern, MaskToken, DEFAULT_SEGMENT_PATTERN};
