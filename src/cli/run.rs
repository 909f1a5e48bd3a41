//! Command line entry point: from raw tokens to a finished task run.

use crate::cli::arguments_parser::ArgumentsParser;
use crate::cli::builtin_tasks::register_builtin_tasks;
use crate::cli::config::ConfigDiscovery;
use crate::env::TASK_HELP;
use crate::errors::{ErrorKind, HardhatError};
use crate::params::{
    HardhatArguments, TaskArguments, get_env_hardhat_arguments_relative_to,
    hardhat_param_definitions,
};
use crate::task::runtime::unrecognized_task;
use crate::task::{RuntimeEnvironment, TaskIdentifier, TasksDsl};
use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Run the command line with only the built-in tasks defined
pub async fn run_cli<S: AsRef<str>>(
    argv: &[S],
    env_variables: &HashMap<String, String>,
    cwd: &Path,
) -> Result<Value> {
    run_cli_with_tasks(argv, env_variables, cwd, |_| Ok(())).await
}

/// Run the command line after `define_tasks` has added the project's tasks
/// on top of the built-in ones.
///
/// `argv` excludes the executable name.
pub async fn run_cli_with_tasks<S, F>(
    argv: &[S],
    env_variables: &HashMap<String, String>,
    cwd: &Path,
    define_tasks: F,
) -> Result<Value>
where
    S: AsRef<str>,
    F: FnOnce(&mut TasksDsl) -> Result<(), HardhatError>,
{
    let parser = ArgumentsParser::with_base_dir(cwd);
    let hardhat_param_definitions = hardhat_param_definitions();

    let env_arguments =
        get_env_hardhat_arguments_relative_to(hardhat_param_definitions, env_variables, cwd)?;
    let parsed = parser.parse_hardhat_arguments(hardhat_param_definitions, &env_arguments, argv)?;
    let hardhat_arguments = HardhatArguments::from_arguments(&parsed.hardhat_arguments)?;

    if hardhat_arguments.version {
        let version = env!("CARGO_PKG_VERSION");
        println!("{}", version);
        return Ok(Value::String(version.to_string()));
    }

    let config = ConfigDiscovery::discover_config(hardhat_arguments.config.as_deref(), cwd)?;

    let mut dsl = TasksDsl::new();
    register_builtin_tasks(&mut dsl)?;
    define_tasks(&mut dsl)?;

    let names = parser.parse_scope_and_task_names(
        &parsed.all_unparsed_clas,
        dsl.task_definitions(),
        dsl.scope_definitions(),
    )?;
    debug!(
        "Selected task '{}' (scope: {:?})",
        names.task_name, names.scope_name
    );

    let (identifier, task_arguments) = if hardhat_arguments.help && names.task_name != TASK_HELP {
        (TaskIdentifier::new(TASK_HELP), help_arguments(names.scope_name, names.task_name))
    } else {
        let identifier = TaskIdentifier {
            scope: names.scope_name,
            task: names.task_name,
        };
        let definition = dsl
            .task_definition(&identifier)
            .ok_or_else(|| unrecognized_task(&identifier))?;

        if definition.is_subtask() {
            let name = identifier.to_string();
            return Err(HardhatError::new(
                ErrorKind::RunningSubtaskFromCli,
                &[("name", name.as_str())],
            )
            .into());
        }

        let task_arguments = parser.parse_task_arguments(definition, &names.unparsed_clas)?;
        (identifier, task_arguments)
    };

    let env = RuntimeEnvironment::new(dsl, hardhat_arguments, config);
    info!("Running '{}' on network '{}'", identifier, env.network());
    env.run(identifier, task_arguments).await
}

// `hardhat [scope] <task> --help` is `hardhat help [scope] <task>`
fn help_arguments(scope_name: Option<String>, task_name: String) -> TaskArguments {
    let mut arguments = TaskArguments::new();
    match scope_name {
        Some(scope) => {
            arguments.insert("scopeOrTask".to_string(), Value::String(scope));
            arguments.insert("task".to_string(), Value::String(task_name));
        }
        None => {
            arguments.insert("scopeOrTask".to_string(), Value::String(task_name));
        }
    }
    arguments
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unknown_task() {
        let temp_dir = TempDir::new().unwrap();
        let err = run_cli(&["deploy"], &HashMap::new(), temp_dir.path())
            .await
            .unwrap_err();
        assert!(HardhatError::is_kind(&err, ErrorKind::UnrecognizedTask));
    }

    #[tokio::test]
    async fn test_subtask_rejected_from_command_line() {
        let temp_dir = TempDir::new().unwrap();
        let err = run_cli_with_tasks(&["compile:solidity"], &HashMap::new(), temp_dir.path(), |dsl| {
            dsl.subtask("compile:solidity")?;
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(HardhatError::is_kind(&err, ErrorKind::RunningSubtaskFromCli));
    }

    #[tokio::test]
    async fn test_help_flag_rewrites_to_help_task() {
        let temp_dir = TempDir::new().unwrap();
        let output = run_cli(&["clean", "--help"], &HashMap::new(), temp_dir.path())
            .await
            .unwrap();
        assert!(output.as_str().unwrap().contains("clean: Clears the cache"));
    }

    #[test]
    fn test_help_arguments_for_scoped_task() {
        let arguments = help_arguments(Some("vars".to_string()), "set".to_string());
        assert_eq!(arguments["scopeOrTask"], Value::from("vars"));
        assert_eq!(arguments["task"], Value::from("set"));
    }
}
