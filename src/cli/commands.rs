use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::RouterConfig;
use crate::echo::echo_handler;
use crate::router::MaskPattern;
use crate::server::{AppService, Request};

/// Command-line interface for maskrouter
#[derive(Parser, Debug)]
#[command(name = "maskrouter")]
#[command(about = "Mask router CLI", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile every configured mask and print its tokens
    Check {
        /// Router config file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Run one request through the configured routes and print the response
    ///
    /// Every configured route is served by the echo handler.
    Route {
        /// Router config file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Request method (GET, POST, PUT, DELETE, HEAD, PATCH, OPTIONS)
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request target, optionally with a query string
        #[arg(short, long)]
        path: String,

        /// Value of the request's `Origin` header
        #[arg(short, long)]
        origin: Option<String>,
    },
}

/// Run the parsed command, writing its output to stdout.
///
/// # Errors
///
/// Fails when the config cannot be loaded, a route is invalid, or the
/// request method is unknown.
pub fn run_cli(cli: &Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli, &mut out)
}

/// Run the parsed command, writing its output to `out`.
///
/// # Errors
///
/// See [`run_cli`].
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Check { config } => {
            let config = RouterConfig::load(config)?;
            check_routes(&config, out)
        }
        Commands::Route {
            config,
            method,
            path,
            origin,
        } => {
            let config = RouterConfig::load(config)?;
            let app = build_echo_service(&config)?;
            let mut req = Request::from_parts(method, path, origin.as_deref())?;
            let status = app.serve(&mut req, out)?;
            writeln!(out)?;
            info!(method = %req.method, path = %req.path, status, "Route command finished");
            Ok(())
        }
    }
}

fn check_routes<W: Write>(config: &RouterConfig, out: &mut W) -> anyhow::Result<()> {
    for (idx, route) in config.routes.iter().enumerate() {
        let methods = route
            .method_set()
            .with_context(|| format!("route #{} ({})", idx + 1, route.mask))?;
        if methods.is_empty() {
            anyhow::bail!("route #{} ({}): no methods", idx + 1, route.mask);
        }
        let pattern = MaskPattern::compile(&route.mask)
            .with_context(|| format!("route #{}", idx + 1))?;

        writeln!(out, "{} {}", methods, pattern.mask())?;
        if pattern.is_literal() {
            writeln!(out, "    literal")?;
        } else {
            let tokens: Vec<String> = pattern.tokens().iter().map(ToString::to_string).collect();
            writeln!(out, "    tokens: {}", tokens.join(" "))?;
        }
    }
    writeln!(out, "{} route(s) OK", config.routes.len())?;
    Ok(())
}

/// Service with `echo_handler` registered for every configured route.
///
/// # Errors
///
/// Fails on the first route with an unknown method or malformed mask.
pub fn build_echo_service(config: &RouterConfig) -> anyhow::Result<AppService> {
    let mut app = AppService::from_config(config);
    for (idx, route) in config.routes.iter().enumerate() {
        let methods = route
            .method_set()
            .with_context(|| format!("route #{} ({})", idx + 1, route.mask))?;
        app.add(methods, &route.mask, echo_handler)
            .with_context(|| format!("route #{}", idx + 1))?;
    }
    Ok(app)
}
