use crate::params::types::{self, ArgumentType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Parsed or supplied arguments, keyed by camelCase param name
pub type TaskArguments = BTreeMap<String, Value>;

/// Named (non-positional) parameters, keyed by name
pub type ParamDefinitionsMap = BTreeMap<String, ParamDefinition>;

/// Description of a single task or global parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDefinition {
    pub name: String,
    pub description: Option<String>,
    pub default_value: Option<Value>,
    pub ty: ArgumentType,
    pub is_optional: bool,
    pub is_flag: bool,
    pub is_variadic: bool,
}

impl ParamDefinition {
    /// A boolean flag: optional, defaults to `false`, never variadic
    pub fn flag(name: &str, description: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            description,
            default_value: Some(Value::Bool(false)),
            ty: types::BOOLEAN,
            is_optional: true,
            is_flag: true,
            is_variadic: false,
        }
    }

    /// An optional, valued parameter without default
    fn optional(name: &str, ty: ArgumentType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            default_value: None,
            ty,
            is_optional: true,
            is_flag: false,
            is_variadic: false,
        }
    }
}

/// Optional fields accepted by the `add_*param` builder methods.
///
/// `is_optional` left unset means "optional if a default value is given".
#[derive(Debug, Clone, Default)]
pub struct ParamOptions {
    pub description: Option<String>,
    pub default_value: Option<Value>,
    pub ty: Option<ArgumentType>,
    pub is_optional: Option<bool>,
}

impl ParamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn of_type(mut self, ty: ArgumentType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn optional(mut self, is_optional: bool) -> Self {
        self.is_optional = Some(is_optional);
        self
    }

    /// Effective optionality
    pub fn resolved_is_optional(&self) -> bool {
        self.is_optional.unwrap_or(self.default_value.is_some())
    }
}

static HARDHAT_PARAM_DEFINITIONS: LazyLock<ParamDefinitionsMap> = LazyLock::new(|| {
    [
        ParamDefinition::optional("config", types::INPUT_FILE, "A Hardhat config file."),
        ParamDefinition::flag("emoji", Some("Use emoji in messages.".to_string())),
        ParamDefinition::flag(
            "help",
            Some("Shows this message, or a task's help if its name is provided".to_string()),
        ),
        ParamDefinition::optional(
            "maxMemory",
            types::INT,
            "The maximum amount of memory that Hardhat can use.",
        ),
        ParamDefinition::optional("network", types::STRING, "The network to connect to."),
        ParamDefinition::flag(
            "showStackTraces",
            Some("Show stack traces (always enabled on CI servers).".to_string()),
        ),
        ParamDefinition::flag(
            "verbose",
            Some("Enables Hardhat verbose logging".to_string()),
        ),
        ParamDefinition::flag("version", Some("Shows hardhat's version.".to_string())),
    ]
    .into_iter()
    .map(|definition| (definition.name.clone(), definition))
    .collect()
});

/// The fixed table of global (framework) parameters
pub fn hardhat_param_definitions() -> &'static ParamDefinitionsMap {
    &HARDHAT_PARAM_DEFINITIONS
}

/// Typed view of the parsed global arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HardhatArguments {
    pub config: Option<PathBuf>,
    pub emoji: bool,
    pub help: bool,
    pub max_memory: Option<i64>,
    pub network: Option<String>,
    pub show_stack_traces: bool,
    pub verbose: bool,
    pub version: bool,
}

impl HardhatArguments {
    /// Build from a parsed arguments map, ignoring unknown entries
    pub fn from_arguments(arguments: &TaskArguments) -> Result<Self, serde_json::Error> {
        let object: serde_json::Map<String, Value> = arguments
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        serde_json::from_value(Value::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flag_shape() {
        let flag = ParamDefinition::flag("dryRun", None);
        assert_eq!(flag.default_value, Some(json!(false)));
        assert_eq!(flag.ty, types::BOOLEAN);
        assert!(flag.is_optional && flag.is_flag && !flag.is_variadic);
    }

    #[test]
    fn test_optionality_follows_default() {
        assert!(!ParamOptions::new().resolved_is_optional());
        assert!(ParamOptions::new().default_value("x").resolved_is_optional());
        assert!(ParamOptions::new().optional(true).resolved_is_optional());
        assert!(
            !ParamOptions::new()
                .default_value("x")
                .optional(false)
                .resolved_is_optional()
        );
    }

    #[test]
    fn test_global_table() {
        let definitions = hardhat_param_definitions();
        assert!(definitions["showStackTraces"].is_flag);
        assert_eq!(definitions["network"].ty, types::STRING);
        assert_eq!(definitions["config"].ty, types::INPUT_FILE);
        assert!(definitions.values().all(|d| d.ty.is_cli()));
    }

    #[test]
    fn test_hardhat_arguments_from_map() {
        let mut arguments = TaskArguments::new();
        arguments.insert("showStackTraces".to_string(), json!(true));
        arguments.insert("network".to_string(), json!("local"));
        arguments.insert("maxMemory".to_string(), json!(4096));
        arguments.insert("config".to_string(), Value::Null);

        let parsed = HardhatArguments::from_arguments(&arguments).unwrap();
        assert!(parsed.show_stack_traces);
        assert!(!parsed.verbose);
        assert_eq!(parsed.network.as_deref(), Some("local"));
        assert_eq!(parsed.max_memory, Some(4096));
        assert_eq!(parsed.config, None);
    }
}
