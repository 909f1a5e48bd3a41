//! Mapping between global parameters and `HARDHAT_*` environment variables.

use crate::env::ENV_VARIABLE_PREFIX;
use crate::errors::{ErrorKind, HardhatError};
use crate::params::definitions::{HardhatArguments, ParamDefinitionsMap, TaskArguments};
use crate::params::types::{self, display_value};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

/// `showStackTraces` becomes `HARDHAT_SHOW_STACK_TRACES`
pub fn param_name_to_env_variable(param_name: &str) -> String {
    let mut name = String::from(ENV_VARIABLE_PREFIX);
    let mut previous_upper = true;

    for c in param_name.chars() {
        let upper = c.is_ascii_uppercase();
        if upper && !previous_upper {
            name.push('_');
        }
        name.push(c.to_ascii_uppercase());
        previous_upper = upper;
    }

    name
}

/// Read defaults for every global param from the environment.
///
/// Params whose variable is absent fall back to their declared default (and
/// are left out entirely when they have none).
pub fn get_env_hardhat_arguments(
    param_definitions: &ParamDefinitionsMap,
    env_variables: &HashMap<String, String>,
) -> Result<TaskArguments, HardhatError> {
    read_env_arguments(param_definitions, env_variables, None)
}

/// [`get_env_hardhat_arguments`] with relative `inputFile` values resolved
/// against `base_dir`
pub fn get_env_hardhat_arguments_relative_to(
    param_definitions: &ParamDefinitionsMap,
    env_variables: &HashMap<String, String>,
    base_dir: &Path,
) -> Result<TaskArguments, HardhatError> {
    read_env_arguments(param_definitions, env_variables, Some(base_dir))
}

fn read_env_arguments(
    param_definitions: &ParamDefinitionsMap,
    env_variables: &HashMap<String, String>,
    base_dir: Option<&Path>,
) -> Result<TaskArguments, HardhatError> {
    let mut arguments = TaskArguments::new();

    for (param_name, definition) in param_definitions {
        let var_name = param_name_to_env_variable(param_name);

        let Some(raw) = env_variables.get(&var_name) else {
            if let Some(default) = &definition.default_value {
                arguments.insert(param_name.clone(), default.clone());
            }
            continue;
        };

        let value = if definition.ty == types::BOOLEAN {
            Value::Bool(raw.eq_ignore_ascii_case("true"))
        } else {
            let invalid = || {
                HardhatError::new(
                    ErrorKind::InvalidEnvVarValue,
                    &[("varName", var_name.as_str()), ("value", raw.as_str())],
                )
            };
            let cli = definition.ty.as_cli().ok_or_else(invalid)?;
            let parsed = match base_dir {
                Some(base_dir) => cli.parse_relative_to(param_name, raw, base_dir),
                None => cli.parse(param_name, raw),
            };
            parsed.map_err(|err| invalid().with_parent(err))?
        };

        debug!("Using {} from the environment for '{}'", var_name, param_name);
        arguments.insert(param_name.clone(), value);
    }

    Ok(arguments)
}

/// Inverse of [`get_env_hardhat_arguments`]: one variable per defined argument
pub fn get_env_variables_map(hardhat_arguments: &HardhatArguments) -> BTreeMap<String, String> {
    let Ok(Value::Object(values)) = serde_json::to_value(hardhat_arguments) else {
        return BTreeMap::new();
    };

    values
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| (param_name_to_env_variable(name), display_value(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::definitions::hardhat_param_definitions;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_param_name_to_env_variable() {
        assert_eq!(
            param_name_to_env_variable("showStackTraces"),
            "HARDHAT_SHOW_STACK_TRACES"
        );
        assert_eq!(param_name_to_env_variable("network"), "HARDHAT_NETWORK");
        assert_eq!(param_name_to_env_variable("maxMemory"), "HARDHAT_MAX_MEMORY");
        assert_eq!(param_name_to_env_variable("useHTTPs"), "HARDHAT_USE_HTTPS");
    }

    #[test]
    fn test_env_arguments_with_defaults() {
        let arguments = get_env_hardhat_arguments(hardhat_param_definitions(), &env(&[])).unwrap();

        assert_eq!(arguments["showStackTraces"], json!(false));
        assert_eq!(arguments["version"], json!(false));
        assert!(!arguments.contains_key("network"));
        assert!(!arguments.contains_key("config"));
    }

    #[test]
    fn test_env_arguments_parsed_by_type() {
        let arguments = get_env_hardhat_arguments(
            hardhat_param_definitions(),
            &env(&[
                ("HARDHAT_NETWORK", "local"),
                ("HARDHAT_SHOW_STACK_TRACES", "true"),
                ("HARDHAT_VERBOSE", "nope"),
                ("HARDHAT_MAX_MEMORY", "2048"),
            ]),
        )
        .unwrap();

        assert_eq!(arguments["network"], json!("local"));
        assert_eq!(arguments["showStackTraces"], json!(true));
        assert_eq!(arguments["verbose"], json!(false));
        assert_eq!(arguments["maxMemory"], json!(2048));
    }

    #[test]
    fn test_invalid_env_value() {
        let err = get_env_hardhat_arguments(
            hardhat_param_definitions(),
            &env(&[("HARDHAT_MAX_MEMORY", "lots")]),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidEnvVarValue);
        assert!(err.message().contains("HARDHAT_MAX_MEMORY"));
        assert!(err.parent().is_some());
    }

    #[test]
    fn test_env_variables_map() {
        let arguments = HardhatArguments {
            network: Some("local".to_string()),
            show_stack_traces: true,
            max_memory: Some(512),
            ..Default::default()
        };

        let variables = get_env_variables_map(&arguments);
        assert_eq!(variables["HARDHAT_NETWORK"], "local");
        assert_eq!(variables["HARDHAT_SHOW_STACK_TRACES"], "true");
        assert_eq!(variables["HARDHAT_VERBOSE"], "false");
        assert_eq!(variables["HARDHAT_MAX_MEMORY"], "512");
        assert!(!variables.contains_key("HARDHAT_CONFIG"));
    }
}
