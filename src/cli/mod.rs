//! # CLI Module
//!
//! Operator commands for a router config file.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Compile every configured mask and print its token breakdown:
//!
//! ```bash
//! maskrouter check --config routes.yaml
//! ```
//!
//! Exits non-zero on the first route with an unknown method or a malformed mask.
//!
//! ### `route`
//!
//! Register the echo handler for every configured route, run one request
//! through the full pipeline (CORS included) and print the HTTP response:
//!
//! ```bash
//! maskrouter route --config routes.yaml --method OPTIONS --path /user/7 \
//!     --origin https://app.example
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use maskrouter::cli::{Cli, run_cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run_cli(&cli)?;
//! ```

mod commands;


pub use commands::{build_echo_service, execute, run_cli, Cli, Commands};
