//! Command line surface of the task runner
//!
//! This module contains the two-pass argument parser, project configuration
//! discovery, help rendering, the built-in tasks and the entry point that
//! ties them together.

pub mod arguments_parser;
pub mod builtin_tasks;
pub mod config;
pub mod help;
pub mod run;

pub use arguments_parser::{ArgumentsParser, ParsedHardhatArguments, ScopeAndTaskNames, PARAM_PREFIX};
pub use builtin_tasks::register_builtin_tasks;
pub use config::{ConfigDiscovery, ProjectConfig, ProjectPaths};
pub use help::HelpPrinter;
pub use run::{run_cli, run_cli_with_tasks};
