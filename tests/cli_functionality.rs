//! Integration tests for CLI functionality
//!
//! These tests verify that env defaults, config discovery, the parser and the
//! runtime work together through the command line entry point.
//! Unit tests for individual functions are located in the respective module files.

use hardhat_core::cli::{ConfigDiscovery, run_cli, run_cli_with_tasks};
use hardhat_core::errors::{ErrorKind, HardhatError};
use hardhat_core::params::{ParamOptions, types};
use hardhat_core::task::TasksDsl;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

// Registers a task echoing its arguments plus the selected network
fn define_echo_tasks(dsl: &mut TasksDsl) -> Result<(), HardhatError> {
    dsl.task("echo")?
        .set_description("Echoes its arguments")
        .add_optional_param("times", ParamOptions::new().of_type(types::INT).default_value(1))?
        .add_flag("loud", None)?
        .add_optional_variadic_positional_param("words", ParamOptions::new())?
        .set_action(|args, env, _| async move {
            Ok::<_, anyhow::Error>(json!({
                "args": args,
                "network": env.network(),
            }))
        });

    dsl.scope("vars", Some("Manage configuration variables"))?
        .task("get")?
        .add_positional_param("key", ParamOptions::new())?
        .set_action(|args, _, _| async move {
            Ok::<_, anyhow::Error>(json!(format!("value of {}", args["key"].as_str().unwrap_or_default())))
        });

    Ok(())
}

async fn run_echo(argv: &[&str], env_variables: &HashMap<String, String>, cwd: &TempDir) -> anyhow::Result<Value> {
    run_cli_with_tasks(argv, env_variables, cwd.path(), define_echo_tasks).await
}

#[tokio::test]
async fn test_task_runs_with_parsed_arguments() {
    let temp_dir = TempDir::new().unwrap();

    let result = run_echo(
        &["--network", "local", "echo", "--times", "3", "hello", "--loud", "world"],
        &HashMap::new(),
        &temp_dir,
    )
    .await
    .unwrap();

    assert_eq!(result["network"], json!("local"));
    assert_eq!(result["args"]["times"], json!(3));
    assert_eq!(result["args"]["loud"], json!(true));
    assert_eq!(result["args"]["words"], json!(["hello", "world"]));
}

#[tokio::test]
async fn test_network_from_environment_and_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("hardhat.toml"),
        "default_network = \"sepolia\"\n",
    )
    .unwrap();

    let result = run_echo(&["echo"], &HashMap::new(), &temp_dir).await.unwrap();
    assert_eq!(result["network"], json!("sepolia"));

    let env_variables: HashMap<String, String> =
        [("HARDHAT_NETWORK".to_string(), "mainnet".to_string())].into();
    let result = run_echo(&["echo"], &env_variables, &temp_dir).await.unwrap();
    assert_eq!(result["network"], json!("mainnet"));
}

#[tokio::test]
async fn test_explicit_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "default_network = \"devnet\"\n").unwrap();
    let config_arg = config_path.to_string_lossy().to_string();

    let result = run_echo(&["--config", config_arg.as_str(), "echo"], &HashMap::new(), &temp_dir)
        .await
        .unwrap();
    assert_eq!(result["network"], json!("devnet"));
}

#[tokio::test]
async fn test_relative_config_file_resolves_against_cwd() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("custom.toml"), "default_network = \"devnet\"\n").unwrap();

    let result = run_echo(&["--config", "custom.toml", "echo"], &HashMap::new(), &temp_dir)
        .await
        .unwrap();
    assert_eq!(result["network"], json!("devnet"));

    let env_variables: HashMap<String, String> =
        [("HARDHAT_CONFIG".to_string(), "custom.toml".to_string())].into();
    let result = run_echo(&["echo"], &env_variables, &temp_dir).await.unwrap();
    assert_eq!(result["network"], json!("devnet"));

    run_cli(&["--config", "custom.toml", "clean"], &HashMap::new(), temp_dir.path())
        .await
        .unwrap();

    let err = run_echo(&["--config", "missing.toml", "echo"], &HashMap::new(), &temp_dir)
        .await
        .unwrap_err();
    assert!(HardhatError::is_kind(&err, ErrorKind::InvalidInputFile));
}

#[tokio::test]
async fn test_malformed_config_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("hardhat.toml"), "paths = 3").unwrap();

    let err = run_echo(&["echo"], &HashMap::new(), &temp_dir).await.unwrap_err();
    assert!(HardhatError::is_kind(&err, ErrorKind::InvalidConfig));
    assert!(ConfigDiscovery::find_config_file(temp_dir.path()).is_some());
}

#[tokio::test]
async fn test_scoped_task() {
    let temp_dir = TempDir::new().unwrap();

    let result = run_echo(&["vars", "get", "API_KEY"], &HashMap::new(), &temp_dir)
        .await
        .unwrap();
    assert_eq!(result, json!("value of API_KEY"));

    let err = run_echo(&["vars", "set", "API_KEY"], &HashMap::new(), &temp_dir)
        .await
        .unwrap_err();
    assert!(HardhatError::is_kind(&err, ErrorKind::UnrecognizedScopedTask));
}

#[tokio::test]
async fn test_help_output() {
    let temp_dir = TempDir::new().unwrap();

    let no_tokens: [&str; 0] = [];
    let help = run_echo(&no_tokens, &HashMap::new(), &temp_dir).await.unwrap();
    let help = help.as_str().unwrap();
    assert!(help.contains("AVAILABLE TASKS:"));
    assert!(help.contains("echo"));
    assert!(help.contains("AVAILABLE TASK SCOPES:"));

    let help = run_echo(&["vars"], &HashMap::new(), &temp_dir).await.unwrap();
    assert!(help.as_str().unwrap().contains("get"));

    let help = run_echo(&["vars", "get", "--help"], &HashMap::new(), &temp_dir)
        .await
        .unwrap();
    assert!(help.as_str().unwrap().contains("<key>"));
}

#[tokio::test]
async fn test_version_short_circuits() {
    let temp_dir = TempDir::new().unwrap();
    // A broken config is never loaded when only the version is requested
    fs::write(temp_dir.path().join("hardhat.toml"), "[[[").unwrap();

    let result = run_cli(&["--version"], &HashMap::new(), temp_dir.path())
        .await
        .unwrap();
    assert_eq!(result, json!(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_clean_uses_config_paths() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("hardhat.toml"),
        "[paths]\ncache = \"out/cache\"\nartifacts = \"out/artifacts\"\n",
    )
    .unwrap();
    fs::create_dir_all(temp_dir.path().join("out/cache/solc")).unwrap();
    fs::create_dir_all(temp_dir.path().join("out/artifacts/contracts")).unwrap();
    fs::create_dir_all(temp_dir.path().join("cache")).unwrap();

    run_cli(&["clean"], &HashMap::new(), temp_dir.path())
        .await
        .unwrap();

    assert!(!temp_dir.path().join("out/cache").exists());
    assert!(!temp_dir.path().join("out/artifacts").exists());
    assert!(temp_dir.path().join("cache").exists());
}

#[tokio::test]
async fn test_argument_errors_reach_the_caller() {
    let temp_dir = TempDir::new().unwrap();

    let err = run_echo(&["echo", "--times"], &HashMap::new(), &temp_dir)
        .await
        .unwrap_err();
    assert!(HardhatError::is_kind(&err, ErrorKind::MissingTaskArgument));
    assert_eq!(
        err.to_string(),
        "HH306: The '--times' parameter of task 'echo' expects a value, but none was passed."
    );

    let err = run_echo(&["echo", "--nope"], &HashMap::new(), &temp_dir)
        .await
        .unwrap_err();
    assert!(HardhatError::is_kind(&err, ErrorKind::UnrecognizedParamName));

    let err = run_echo(&["--nope", "echo"], &HashMap::new(), &temp_dir)
        .await
        .unwrap_err();
    assert!(HardhatError::is_kind(&err, ErrorKind::UnrecognizedCommandLineArg));
}
