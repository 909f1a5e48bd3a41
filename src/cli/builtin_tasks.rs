//! Tasks every project gets before user definitions are loaded.

use crate::cli::help::HelpPrinter;
use crate::env::{TASK_CLEAN, TASK_HELP};
use crate::errors::HardhatError;
use crate::params::{ParamOptions, TaskArguments, hardhat_param_definitions};
use crate::task::{RuntimeEnvironment, TaskIdentifier, TasksDsl};
use serde_json::Value;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Register `help` and `clean`
pub fn register_builtin_tasks(dsl: &mut TasksDsl) -> Result<(), HardhatError> {
    dsl.task(TASK_HELP)?
        .set_description("Prints this message")
        .add_optional_positional_param(
            "scopeOrTask",
            ParamOptions::new().description("An optional scope or task to print more info about"),
        )?
        .add_optional_positional_param(
            "task",
            ParamOptions::new().description("An optional task to print more info about"),
        )?
        .set_action(|arguments, env, _| async move {
            let help = render_help(&arguments, &env)?;
            print!("{}", help);
            Ok::<_, anyhow::Error>(Value::String(help))
        });

    dsl.task(TASK_CLEAN)?
        .set_description("Clears the cache and deletes all artifacts")
        .set_action(|_, env, _| async move {
            let paths = &env.config().paths;
            remove_dir_if_exists(&paths.cache).await?;
            remove_dir_if_exists(&paths.artifacts).await?;
            Ok::<_, anyhow::Error>(Value::Null)
        });

    Ok(())
}

fn render_help(arguments: &TaskArguments, env: &RuntimeEnvironment) -> Result<String, HardhatError> {
    let printer = HelpPrinter::new(
        "hardhat",
        env!("CARGO_PKG_VERSION"),
        hardhat_param_definitions(),
        env.tasks(),
        env.scopes(),
    );

    let scope_or_task = arguments.get("scopeOrTask").and_then(Value::as_str);
    let task = arguments.get("task").and_then(Value::as_str);

    match (scope_or_task, task) {
        (None, _) => Ok(printer.global_help()),
        (Some(scope), None) if env.scopes().contains_key(scope) => printer.scope_help(scope),
        (Some(scope), Some(task)) => printer.task_help(&TaskIdentifier::scoped(scope, task)),
        (Some(task), None) => printer.task_help(&TaskIdentifier::new(task)),
    }
}

async fn remove_dir_if_exists(path: &Path) -> anyhow::Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => {
            info!("Removed {:?}", path);
            Ok(())
        }
        Err(err) if err.kind() == IoErrorKind::NotFound => {
            debug!("Nothing to remove at {:?}", path);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::config::ProjectConfig;
    use crate::params::HardhatArguments;
    use tempfile::TempDir;

    fn runtime(root: &Path) -> RuntimeEnvironment {
        let mut dsl = TasksDsl::new();
        register_builtin_tasks(&mut dsl).unwrap();
        RuntimeEnvironment::new(dsl, HardhatArguments::default(), ProjectConfig::with_root(root))
    }

    #[tokio::test]
    async fn test_clean_removes_build_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let env = runtime(temp_dir.path());
        std::fs::create_dir_all(env.config().paths.cache.join("solc")).unwrap();

        env.run(TASK_CLEAN, TaskArguments::new()).await.unwrap();
        assert!(!env.config().paths.cache.exists());
        assert!(!env.config().paths.artifacts.exists());

        // Running again with nothing to delete still succeeds
        env.run(TASK_CLEAN, TaskArguments::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_help_for_task() {
        let temp_dir = TempDir::new().unwrap();
        let env = runtime(temp_dir.path());

        let mut arguments = TaskArguments::new();
        arguments.insert("scopeOrTask".to_string(), Value::from("clean"));
        let help = env.run(TASK_HELP, arguments).await.unwrap();

        let help = help.as_str().unwrap();
        assert!(help.contains("clean: Clears the cache and deletes all artifacts"));
    }
}
