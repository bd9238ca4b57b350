//! Route table: compiled masks grouped by method set.
//!
//! Registration happens once at startup; afterwards the table is only read.
//! Both levels (method-set groups, masks within a group) keep insertion order,
//! which is the order the dispatcher tries them in.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, info};

use super::error::RegisterError;
use super::mask::MaskPattern;
use crate::method::MethodSet;
use crate::server::{Request, Response};

/// Maximum number of path parameters before heap allocation.
/// Most masks have ≤4 parameters (e.g., /users/{id}/posts/{post_id}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Parameter storage: `(name, value)` pairs in mask order.
///
/// Names are shared with the compiled mask; values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Application callback invoked for a matched route
pub type Handler = Box<dyn Fn(&mut Request, &mut Response) + Send + Sync>;

/// A compiled mask and the handler registered for it
pub struct Route {
    mask: MaskPattern,
    handler: Handler,
}

impl Route {
    #[must_use]
    pub fn mask(&self) -> &MaskPattern {
        &self.mask
    }

    /// Run the handler
    pub fn invoke(&self, req: &mut Request, res: &mut Response) {
        (self.handler)(req, res);
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("mask", &self.mask.mask())
            .field("handler", &"<function>")
            .finish()
    }
}

/// All routes registered under one exact method set
#[derive(Debug)]
pub struct RouteGroup {
    methods: MethodSet,
    routes: Vec<Route>,
}

impl RouteGroup {
    #[must_use]
    pub fn methods(&self) -> MethodSet {
        self.methods
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

/// Ordered mapping `MethodSet -> mask -> handler`
#[derive(Debug, Default)]
pub struct RouteTable {
    groups: Vec<RouteGroup>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `mask` under `methods`.
    ///
    /// The mask is compiled immediately. Registering an existing
    /// `(methods, mask)` pair again replaces its handler without moving it.
    ///
    /// # Errors
    ///
    /// [`RegisterError::MalformedMask`] when the mask does not compile,
    /// [`RegisterError::EmptyMethodSet`] when `methods` is empty.
    pub fn register<H>(
        &mut self,
        methods: impl Into<MethodSet>,
        mask: &str,
        handler: H,
    ) -> Result<(), RegisterError>
    where
        H: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        let methods = methods.into();
        if methods.is_empty() {
            return Err(RegisterError::EmptyMethodSet {
                mask: mask.to_string(),
            });
        }
        let compiled = MaskPattern::compile(mask)?;
        let handler: Handler = Box::new(handler);

        let group_idx = match self.groups.iter().position(|g| g.methods == methods) {
            Some(idx) => idx,
            None => {
                self.groups.push(RouteGroup {
                    methods,
                    routes: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        let group = &mut self.groups[group_idx];

        if let Some(existing) = group.routes.iter_mut().find(|r| r.mask.mask() == mask) {
            existing.handler = handler;
            debug!(methods = %methods, mask = %mask, "Route handler replaced");
            return Ok(());
        }

        info!(
            methods = %methods,
            mask = %mask,
            literal = compiled.is_literal(),
            pattern = compiled.regex_source().unwrap_or(mask),
            "Route registered"
        );
        group.routes.push(Route {
            mask: compiled,
            handler,
        });
        Ok(())
    }

    /// Method-set groups in registration order
    #[must_use]
    pub fn groups(&self) -> &[RouteGroup] {
        &self.groups
    }

    /// Every `(methods, route)` pair in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = (MethodSet, &Route)> {
        self.groups
            .iter()
            .flat_map(|g| g.routes.iter().map(move |r| (g.methods, r)))
    }

    /// Number of registered routes across all groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.routes.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Union of every method any route accepts.
    ///
    /// Iterate the result (or call `names()`) for canonical order.
    #[must_use]
    pub fn eligible_methods(&self) -> MethodSet {
        self.groups.iter().fold(MethodSet::EMPTY, |acc, g| {
            match g.methods.as_single() {
                Some(single) => acc | single,
                None => g.methods.iter().fold(acc, |acc, m| acc | m),
            }
        })
    }
}
