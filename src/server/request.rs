use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::method::{MethodFlag, UnknownMethodError};
use crate::router::ParamVec;

/// An incoming request as seen by the router.
///
/// Built by the transport from the method, request target and `Origin`
/// header. The dispatcher merges captured path parameters into `params`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method (exactly one flag)
    pub method: MethodFlag,
    /// Request path without the query string
    pub path: String,
    /// `Origin` header, if the client sent one
    pub origin: Option<String>,
    /// Decoded query string parameters
    pub query_params: HashMap<String, String>,
    /// Path parameters captured by matched masks
    pub params: ParamVec,
}

impl Request {
    #[must_use]
    pub fn new(method: MethodFlag, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            origin: None,
            query_params: HashMap::new(),
            params: ParamVec::new(),
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        self.query_params = parse_query_string(query);
        self
    }

    /// Build a request from raw transport values.
    ///
    /// `target` is the request target (`/users?limit=10`); everything after
    /// the first `?` is decoded into `query_params`.
    ///
    /// # Errors
    ///
    /// Fails when `method` is not one of the seven supported methods.
    pub fn from_parts(
        method: &str,
        target: &str,
        origin: Option<&str>,
    ) -> Result<Self, UnknownMethodError> {
        let method: MethodFlag = method.parse()?;
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        let path = if path.is_empty() { "/" } else { path };

        debug!(method = %method, path = %path, origin = ?origin, "Request parsed");

        Ok(Self {
            method,
            path: path.to_string(),
            origin: origin.map(str::to_string),
            query_params: parse_query_string(query),
            params: ParamVec::new(),
        })
    }

    /// Merge captured parameters into this request
    pub fn add_params(&mut self, params: ParamVec) {
        self.params.extend(params);
    }

    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics: when several matched masks captured
    /// the same name, the most recent capture is returned.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    #[must_use]
    pub fn has_param(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    #[inline]
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Path parameters as an owned map
    /// Note: This allocates - use param() in hot paths instead
    #[must_use]
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Insert a single parameter (used by tests and custom transports)
    pub fn insert_param(&mut self, name: &str, value: impl Into<String>) {
        self.params.push((Arc::from(name), value.into()));
    }
}

/// Decode an `application/x-www-form-urlencoded` query string.
///
/// Later duplicates overwrite earlier ones (`?a=1&a=2` yields `a=2`).
#[must_use]
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
