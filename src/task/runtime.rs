use crate::cli::config::ProjectConfig;
use crate::errors::{ErrorKind, HardhatError};
use crate::params::{HardhatArguments, ParamDefinition, TaskArguments};
use crate::task::definition::TaskDefinition;
use crate::task::dsl::{ScopesMap, TasksDsl, TasksMap, lookup};
use crate::task::types::{ActionFuture, TaskIdentifier};
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Frozen view of the registered tasks plus the parsed global arguments.
///
/// Built once the registration phase is over; cloning is cheap and every
/// action receives its own handle so it can run other tasks.
#[derive(Clone)]
pub struct RuntimeEnvironment {
    inner: Arc<RuntimeInner>,
}

struct RuntimeInner {
    tasks: TasksMap,
    scopes: ScopesMap,
    hardhat_arguments: HardhatArguments,
    config: ProjectConfig,
}

impl RuntimeEnvironment {
    pub fn new(dsl: TasksDsl, hardhat_arguments: HardhatArguments, config: ProjectConfig) -> Self {
        let (tasks, scopes) = dsl.into_definitions();
        Self {
            inner: Arc::new(RuntimeInner {
                tasks,
                scopes,
                hardhat_arguments,
                config,
            }),
        }
    }

    pub fn hardhat_arguments(&self) -> &HardhatArguments {
        &self.inner.hardhat_arguments
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.inner.config
    }

    /// Network selected on the command line or environment, else the config default
    pub fn network(&self) -> &str {
        self.inner
            .hardhat_arguments
            .network
            .as_deref()
            .unwrap_or(&self.inner.config.default_network)
    }

    pub fn tasks(&self) -> &TasksMap {
        &self.inner.tasks
    }

    pub fn scopes(&self) -> &ScopesMap {
        &self.inner.scopes
    }

    pub fn task_definition(&self, identifier: &TaskIdentifier) -> Option<&TaskDefinition> {
        lookup(&self.inner.tasks, &self.inner.scopes, identifier)
    }

    /// Run a task: resolve and validate its arguments, then await its action
    pub async fn run(
        &self,
        identifier: impl Into<TaskIdentifier>,
        arguments: TaskArguments,
    ) -> Result<Value> {
        let identifier = identifier.into();
        let definition = self
            .task_definition(&identifier)
            .ok_or_else(|| unrecognized_task(&identifier))?;
        let arguments = resolve_valid_task_arguments(definition, arguments)?;

        info!("Running task '{}'", identifier);
        let result = self.run_definition(identifier.clone(), 0, arguments).await;
        debug!("Task '{}' finished (ok: {})", identifier, result.is_ok());
        result
    }

    // `depth` selects the link of the override chain whose action runs
    fn run_definition(
        &self,
        identifier: TaskIdentifier,
        depth: usize,
        arguments: TaskArguments,
    ) -> ActionFuture {
        let env = self.clone();

        Box::pin(async move {
            let (action, has_parent) = {
                let definition = env
                    .task_definition(&identifier)
                    .and_then(|def| def.ancestor(depth))
                    .ok_or_else(|| unrecognized_task(&identifier))?;
                (definition.action().clone(), definition.parent().is_some())
            };

            let run_super = RunSuper {
                env: env.clone(),
                identifier,
                parent_depth: has_parent.then_some(depth + 1),
                arguments: arguments.clone(),
            };

            action(arguments, env, run_super).await
        })
    }
}

/// Handle to the action of the definition an override wraps
#[derive(Clone)]
pub struct RunSuper {
    env: RuntimeEnvironment,
    identifier: TaskIdentifier,
    parent_depth: Option<usize>,
    arguments: TaskArguments,
}

impl RunSuper {
    /// Whether there is a wrapped definition to run
    pub fn is_defined(&self) -> bool {
        self.parent_depth.is_some()
    }

    /// Run the wrapped definition with the arguments this task received
    pub async fn run(&self) -> Result<Value> {
        self.run_with(self.arguments.clone()).await
    }

    /// Run the wrapped definition with other arguments
    pub async fn run_with(&self, arguments: TaskArguments) -> Result<Value> {
        let Some(depth) = self.parent_depth else {
            return Err(HardhatError::new(
                ErrorKind::RunSuperNotAvailable,
                &[("taskName", self.identifier.task.as_str())],
            )
            .into());
        };

        debug!("Running super of task '{}' (depth {})", self.identifier, depth);
        self.env
            .run_definition(self.identifier.clone(), depth, arguments)
            .await
    }
}

/// Fill defaults and type-check programmatically supplied arguments.
///
/// Entries not matching any param are kept untouched.
pub fn resolve_valid_task_arguments(
    definition: &TaskDefinition,
    arguments: TaskArguments,
) -> Result<TaskArguments, HardhatError> {
    let mut resolved = arguments;

    let all_params = definition
        .param_definitions()
        .values()
        .chain(definition.positional_param_definitions());

    for param in all_params {
        match resolved.get(&param.name).filter(|value| !value.is_null()) {
            Some(value) => check_type_validation(param, value)?,
            None if param.is_optional => match &param.default_value {
                Some(default) => {
                    resolved.insert(param.name.clone(), default.clone());
                }
                None => {
                    resolved.remove(&param.name);
                }
            },
            None => {
                return Err(HardhatError::new(
                    ErrorKind::MissingTaskArgument,
                    &[("param", param.name.as_str()), ("task", definition.name())],
                ));
            }
        }
    }

    Ok(resolved)
}

fn check_type_validation(param: &ParamDefinition, value: &Value) -> Result<(), HardhatError> {
    if !param.is_variadic {
        return param.ty.validate(&param.name, value);
    }

    match value {
        Value::Array(values) => values
            .iter()
            .try_for_each(|value| param.ty.validate(&param.name, value)),
        other => Err(HardhatError::new(
            ErrorKind::InvalidValueForType,
            &[
                ("value", other.to_string().as_str()),
                ("name", param.name.as_str()),
                ("type", param.ty.name()),
            ],
        )),
    }
}

pub(crate) fn unrecognized_task(identifier: &TaskIdentifier) -> HardhatError {
    match &identifier.scope {
        Some(scope) => HardhatError::new(
            ErrorKind::UnrecognizedScopedTask,
            &[("scope", scope.as_str()), ("task", identifier.task.as_str())],
        ),
        None => HardhatError::new(
            ErrorKind::UnrecognizedTask,
            &[("task", identifier.task.as_str())],
        ),
    }
}
