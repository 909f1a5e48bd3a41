use crate::errors::{ErrorKind, HardhatError};
use crate::params::types::{self, ArgumentType};
use crate::params::{
    ParamDefinition, ParamDefinitionsMap, ParamOptions, TaskArguments, hardhat_param_definitions,
};
use crate::task::runtime::{RunSuper, RuntimeEnvironment};
use crate::task::types::{TaskAction, TaskIdentifier, action};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, LazyLock};

static PARAM_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+([a-zA-Z0-9])*$").expect("valid param name pattern"));

/// A task definition that owns its parameters.
///
/// Every mutator validates first, then mutates, then hands `self` back so
/// calls can be chained.
pub struct SimpleTaskDefinition {
    identifier: TaskIdentifier,
    is_subtask: bool,
    description: Option<String>,
    action: TaskAction,
    param_definitions: ParamDefinitionsMap,
    positional_param_definitions: Vec<ParamDefinition>,
    positional_param_names: HashSet<String>,
    has_variadic_param: bool,
    has_optional_positional_param: bool,
}

impl SimpleTaskDefinition {
    pub fn new(identifier: impl Into<TaskIdentifier>, is_subtask: bool) -> Self {
        let identifier = identifier.into();
        let task_name = identifier.task.clone();

        let action_not_set: TaskAction = Arc::new(move |_, _, _| {
            let task_name = task_name.clone();
            Box::pin(async move {
                Err(HardhatError::new(
                    ErrorKind::ActionNotSet,
                    &[("taskName", task_name.as_str())],
                )
                .into())
            })
        });

        Self {
            identifier,
            is_subtask,
            description: None,
            action: action_not_set,
            param_definitions: ParamDefinitionsMap::new(),
            positional_param_definitions: Vec::new(),
            positional_param_names: HashSet::new(),
            has_variadic_param: false,
            has_optional_positional_param: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.identifier.task
    }

    pub fn scope(&self) -> Option<&str> {
        self.identifier.scope.as_deref()
    }

    pub fn identifier(&self) -> &TaskIdentifier {
        &self.identifier
    }

    pub fn is_subtask(&self) -> bool {
        self.is_subtask
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn action(&self) -> &TaskAction {
        &self.action
    }

    pub fn param_definitions(&self) -> &ParamDefinitionsMap {
        &self.param_definitions
    }

    pub fn positional_param_definitions(&self) -> &[ParamDefinition] {
        &self.positional_param_definitions
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_action<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(TaskArguments, RuntimeEnvironment, RunSuper) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.action = action(f);
        self
    }

    /// Add a named parameter. Without a type, `string` is inferred and the
    /// default (if any) must be a string.
    pub fn add_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        let is_optional = options.resolved_is_optional();
        let ty = self.resolve_scalar_type(name, &options)?;

        self.validate_param_name_casing(name)?;
        self.validate_name_not_used(name)?;
        self.validate_no_default_value_for_mandatory_param(&options, is_optional, name)?;
        self.validate_cli_argument_type(ty)?;

        self.param_definitions.insert(
            name.to_string(),
            ParamDefinition {
                name: name.to_string(),
                description: options.description,
                default_value: options.default_value,
                ty,
                is_optional,
                is_flag: false,
                is_variadic: false,
            },
        );
        Ok(self)
    }

    pub fn add_optional_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        self.add_param(name, options.optional(true))
    }

    pub fn add_flag(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<&mut Self, HardhatError> {
        self.validate_param_name_casing(name)?;
        self.validate_name_not_used(name)?;

        self.param_definitions.insert(
            name.to_string(),
            ParamDefinition::flag(name, description.map(str::to_string)),
        );
        Ok(self)
    }

    pub fn add_positional_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        let ty = self.resolve_scalar_type(name, &options)?;
        self.add_positional(name, options, ty, false)
    }

    pub fn add_optional_positional_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        self.add_positional_param(name, options.optional(true))
    }

    /// Add the positional param that absorbs every remaining token. A scalar
    /// default is normalized into a one-element array.
    pub fn add_variadic_positional_param(
        &mut self,
        name: &str,
        mut options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        options.default_value = options.default_value.map(|value| match value {
            Value::Array(_) => value,
            scalar => Value::Array(vec![scalar]),
        });

        let ty = match options.ty {
            Some(ty) => ty,
            None => {
                let all_strings = match &options.default_value {
                    Some(Value::Array(values)) => values.iter().all(Value::is_string),
                    _ => true,
                };
                if !all_strings {
                    return Err(self.definition_error(ErrorKind::DefaultValueWrongType, name));
                }
                types::STRING
            }
        };

        self.add_positional(name, options, ty, true)
    }

    pub fn add_optional_variadic_positional_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        self.add_variadic_positional_param(name, options.optional(true))
    }

    fn add_positional(
        &mut self,
        name: &str,
        options: ParamOptions,
        ty: ArgumentType,
        is_variadic: bool,
    ) -> Result<&mut Self, HardhatError> {
        let is_optional = options.resolved_is_optional();

        self.validate_param_name_casing(name)?;
        self.validate_name_not_used(name)?;
        self.validate_not_after_variadic_param(name)?;
        self.validate_no_mandatory_param_after_optional_ones(name, is_optional)?;
        self.validate_no_default_value_for_mandatory_param(&options, is_optional, name)?;
        self.validate_cli_argument_type(ty)?;

        if is_variadic {
            self.has_variadic_param = true;
        }
        if is_optional {
            self.has_optional_positional_param = true;
        }
        self.positional_param_names.insert(name.to_string());
        self.positional_param_definitions.push(ParamDefinition {
            name: name.to_string(),
            description: options.description,
            default_value: options.default_value,
            ty,
            is_optional,
            is_flag: false,
            is_variadic,
        });
        Ok(self)
    }

    fn resolve_scalar_type(
        &self,
        name: &str,
        options: &ParamOptions,
    ) -> Result<ArgumentType, HardhatError> {
        if let Some(ty) = options.ty {
            return Ok(ty);
        }
        match &options.default_value {
            Some(default) if !default.is_string() => {
                Err(self.definition_error(ErrorKind::DefaultValueWrongType, name))
            }
            _ => Ok(types::STRING),
        }
    }

    fn validate_param_name_casing(&self, name: &str) -> Result<(), HardhatError> {
        if PARAM_NAME_PATTERN.is_match(name) {
            Ok(())
        } else {
            Err(self.definition_error(ErrorKind::InvalidParamNameCasing, name))
        }
    }

    fn validate_name_not_used(&self, name: &str) -> Result<(), HardhatError> {
        if self.param_definitions.contains_key(name) || self.positional_param_names.contains(name) {
            return Err(self.definition_error(ErrorKind::ParamAlreadyDefined, name));
        }
        if hardhat_param_definitions().contains_key(name) {
            return Err(self.definition_error(ErrorKind::ParamClashesWithHardhatParam, name));
        }
        Ok(())
    }

    fn validate_not_after_variadic_param(&self, name: &str) -> Result<(), HardhatError> {
        if self.has_variadic_param {
            return Err(self.definition_error(ErrorKind::ParamAfterVariadic, name));
        }
        Ok(())
    }

    fn validate_no_mandatory_param_after_optional_ones(
        &self,
        name: &str,
        is_optional: bool,
    ) -> Result<(), HardhatError> {
        if !is_optional && self.has_optional_positional_param {
            return Err(self.definition_error(ErrorKind::MandatoryParamAfterOptional, name));
        }
        Ok(())
    }

    fn validate_no_default_value_for_mandatory_param(
        &self,
        options: &ParamOptions,
        is_optional: bool,
        name: &str,
    ) -> Result<(), HardhatError> {
        if options.default_value.is_some() && !is_optional {
            return Err(self.definition_error(ErrorKind::DefaultInMandatoryParam, name));
        }
        Ok(())
    }

    // Only subtasks may use types that can't be parsed from a command line
    fn validate_cli_argument_type(&self, ty: ArgumentType) -> Result<(), HardhatError> {
        if self.is_subtask || ty.is_cli() {
            return Ok(());
        }
        Err(HardhatError::new(
            ErrorKind::CliArgumentTypeRequired,
            &[("task", self.name()), ("type", ty.name())],
        ))
    }

    fn definition_error(&self, kind: ErrorKind, param_name: &str) -> HardhatError {
        HardhatError::new(kind, &[("paramName", param_name), ("taskName", self.name())])
    }
}

impl fmt::Debug for SimpleTaskDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleTaskDefinition")
            .field("identifier", &self.identifier)
            .field("is_subtask", &self.is_subtask)
            .field("description", &self.description)
            .field("param_definitions", &self.param_definitions)
            .field("positional_param_definitions", &self.positional_param_definitions)
            .finish_non_exhaustive()
    }
}
