//! # Hardhat Core
//!
//! The task layer of a build automation framework: user-defined tasks with
//! typed parameters, tasks that override earlier definitions of the same
//! name, and a two-pass command line parser that turns raw tokens into
//! typed arguments.
//!
//! ## Architecture Overview
//!
//! - **[`errors`]**: Numbered error catalog with message templates
//! - **[`params`]**: Argument types, parameter definitions and the global parameter table
//! - **[`task`]**: Task definitions, override chains, scopes and the runtime that runs them
//! - **[`cli`]**: Argument parsing, config discovery, help and the command line entry point
//! - **[`env`]**: Environment constants and path utilities
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hardhat_core::params::{ParamOptions, types};
//! use hardhat_core::task::TasksDsl;
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let argv: Vec<String> = std::env::args().skip(1).collect();
//!     let env_variables = std::env::vars().collect();
//!     let cwd = std::env::current_dir()?;
//!
//!     hardhat_core::cli::run_cli_with_tasks(&argv, &env_variables, &cwd, |dsl: &mut TasksDsl| {
//!         dsl.task("greet")?
//!             .set_description("Prints a greeting")
//!             .add_optional_param(
//!                 "times",
//!                 ParamOptions::new().of_type(types::INT).default_value(1),
//!             )?
//!             .set_action(|args, _env, _run_super| async move {
//!                 let times = args["times"].as_i64().unwrap_or(1);
//!                 for _ in 0..times {
//!                     println!("Hello!");
//!                 }
//!                 Ok::<_, anyhow::Error>(Value::Null)
//!             });
//!         Ok(())
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

/// Error catalog shared by every layer.
///
/// Each error carries a stable `HH<number>` code, a category and a message
/// rendered from a `%placeholder%` template.
pub mod errors;

/// Argument types and parameter definitions.
pub mod params;

/// Task definitions, override chains, scopes and the runtime environment.
pub mod task;

/// Command line surface.
pub mod cli;

/// Environment constants and path utilities.
///
/// Centralizes the file, directory and variable names used throughout
/// the crate.
pub mod env;

// Re-export main error types
pub use errors::{ErrorCategory, ErrorKind, HardhatError};

// Re-export main parameter types
pub use params::{ArgumentType, CliArgumentType, HardhatArguments, ParamDefinition, ParamOptions, TaskArguments};

// Re-export main task types
pub use task::{RunSuper, RuntimeEnvironment, TaskDefinition, TaskIdentifier, TasksDsl};

// Re-export CLI entry points
pub use cli::{ProjectConfig, run_cli, run_cli_with_tasks};
