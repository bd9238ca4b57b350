//! Router configuration loaded from a YAML (or JSON) file.
//!
//! ```yaml
//! cors:
//!   allowed_origin: "https://app.example"
//! routes:
//!   - methods: [GET, POST]
//!     mask: /user/{id:\d+}
//!   - methods: [GET]
//!     mask: /archive[/{year}[/{month}]]
//! ```
//!
//! `MASKR_ALLOWED_ORIGIN` overrides `cors.allowed_origin`.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::method::{MethodFlag, MethodSet, UnknownMethodError};
use crate::middleware::WILDCARD_ORIGIN;

/// Environment variable overriding the configured CORS origin
pub const ALLOWED_ORIGIN_ENV: &str = "MASKR_ALLOWED_ORIGIN";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RouterConfig {
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
        }
    }
}

fn default_allowed_origin() -> String {
    WILDCARD_ORIGIN.to_string()
}

/// One configured route: method names plus a mask
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteConfig {
    pub methods: Vec<String>,
    pub mask: String,
}

impl RouteConfig {
    /// Method names folded into a set
    ///
    /// # Errors
    ///
    /// Fails on the first name that is not a supported method.
    pub fn method_set(&self) -> Result<MethodSet, UnknownMethodError> {
        self.methods
            .iter()
            .map(|m| m.parse::<MethodFlag>())
            .collect()
    }
}

impl RouterConfig {
    /// Parse a config document. JSON is accepted as well, being valid YAML.
    ///
    /// # Errors
    ///
    /// Fails when the document does not deserialize.
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse router config")
    }

    /// Load `path` (`.json` via serde_json, anything else as YAML) and apply
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read router config: {}", path.display()))?;

        let mut config: RouterConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse router config: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse router config: {}", path.display()))?
        };

        config.apply_env_overrides();
        info!(
            path = %path.display(),
            routes = config.routes.len(),
            allowed_origin = %config.cors.allowed_origin,
            "Router config loaded"
        );
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(origin) = std::env::var(ALLOWED_ORIGIN_ENV) {
            let origin = origin.trim();
            if !origin.is_empty() {
                debug!(origin, "Allowed origin overridden from environment");
                self.cors.allowed_origin = origin.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = RouterConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.cors.allowed_origin, "*");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_parse_routes() {
        let yaml = r#"
cors:
  allowed_origin: https://app.test
routes:
  - methods: [GET, POST]
    mask: /user/{id}
"#;
        let config = RouterConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.cors.allowed_origin, "https://app.test");
        assert_eq!(config.routes[0].mask, "/user/{id}");
        assert_eq!(
            config.routes[0].method_set().unwrap(),
            MethodFlag::Get | MethodFlag::Post
        );
    }

    #[test]
    fn test_unknown_method_name() {
        let route = RouteConfig {
            methods: vec!["GET".into(), "FETCH".into()],
            mask: "/".into(),
        };
        assert_eq!(route.method_set().unwrap_err().method, "FETCH");
    }
}
