use crate::errors::{ErrorKind, HardhatError};
use crate::task::definition::TaskDefinition;
use crate::task::overridden::OverriddenTaskDefinition;
use crate::task::simple::SimpleTaskDefinition;
use crate::task::types::TaskIdentifier;
use std::collections::BTreeMap;
use tracing::debug;

/// Registry of task definitions keyed by name
pub type TasksMap = BTreeMap<String, TaskDefinition>;

/// Registry of scopes keyed by name
pub type ScopesMap = BTreeMap<String, ScopeDefinition>;

/// A named group of tasks
#[derive(Debug)]
pub struct ScopeDefinition {
    name: String,
    description: Option<String>,
    tasks: TasksMap,
}

impl ScopeDefinition {
    fn new(name: &str, description: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            description: description.map(str::to_string),
            tasks: TasksMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tasks(&self) -> &TasksMap {
        &self.tasks
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }
}

/// Entry point for declaring tasks, subtasks and scopes.
///
/// Declaring a name that already exists wraps the existing definition in an
/// [`OverriddenTaskDefinition`]; the registry never holds two entries under one
/// name.
#[derive(Debug, Default)]
pub struct TasksDsl {
    tasks: TasksMap,
    scopes: ScopesMap,
}

impl TasksDsl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or override a task that can be run from the command line
    pub fn task(&mut self, name: &str) -> Result<&mut TaskDefinition, HardhatError> {
        self.add_task(TaskIdentifier::new(name), false)
    }

    /// Create or override a task that is only run programmatically
    pub fn subtask(&mut self, name: &str) -> Result<&mut TaskDefinition, HardhatError> {
        self.add_task(TaskIdentifier::new(name), true)
    }

    /// Alias of [`TasksDsl::subtask`]
    pub fn internal_task(&mut self, name: &str) -> Result<&mut TaskDefinition, HardhatError> {
        self.subtask(name)
    }

    /// Create a scope, or reopen it (replacing the description when given)
    pub fn scope(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ScopeBuilder<'_>, HardhatError> {
        if self.tasks.contains_key(name) {
            return Err(HardhatError::new(
                ErrorKind::TaskScopeClash,
                &[("scopeName", name)],
            ));
        }

        let scope = self
            .scopes
            .entry(name.to_string())
            .or_insert_with(|| ScopeDefinition::new(name, None));
        if let Some(description) = description {
            scope.set_description(description);
        }

        Ok(ScopeBuilder {
            dsl: self,
            scope: name.to_string(),
        })
    }

    /// The live registry of top-level tasks
    pub fn task_definitions(&self) -> &TasksMap {
        &self.tasks
    }

    pub fn scope_definitions(&self) -> &ScopesMap {
        &self.scopes
    }

    pub fn task_definition(&self, identifier: &TaskIdentifier) -> Option<&TaskDefinition> {
        lookup(&self.tasks, &self.scopes, identifier)
    }

    /// Hand the registries over once the registration phase is done
    pub fn into_definitions(self) -> (TasksMap, ScopesMap) {
        (self.tasks, self.scopes)
    }

    fn add_task(
        &mut self,
        identifier: TaskIdentifier,
        is_subtask: bool,
    ) -> Result<&mut TaskDefinition, HardhatError> {
        let tasks = match &identifier.scope {
            Some(scope) => {
                &mut self
                    .scopes
                    .entry(scope.clone())
                    .or_insert_with(|| ScopeDefinition::new(scope, None))
                    .tasks
            }
            None => {
                if self.scopes.contains_key(&identifier.task) {
                    return Err(HardhatError::new(
                        ErrorKind::ScopeTaskClash,
                        &[("taskName", identifier.task.as_str())],
                    ));
                }
                &mut self.tasks
            }
        };

        let definition = match tasks.remove(&identifier.task) {
            Some(existing) => {
                debug!("Overriding task '{}'", identifier);
                TaskDefinition::from(OverriddenTaskDefinition::new(existing, is_subtask))
            }
            None => {
                debug!("Defining task '{}'", identifier);
                TaskDefinition::from(SimpleTaskDefinition::new(identifier.clone(), is_subtask))
            }
        };

        Ok(tasks.entry(identifier.task).or_insert(definition))
    }
}

/// Looks a task up either at top level or inside its scope
pub fn lookup<'a>(
    tasks: &'a TasksMap,
    scopes: &'a ScopesMap,
    identifier: &TaskIdentifier,
) -> Option<&'a TaskDefinition> {
    match &identifier.scope {
        Some(scope) => scopes.get(scope)?.tasks.get(&identifier.task),
        None => tasks.get(&identifier.task),
    }
}

/// Handle returned by [`TasksDsl::scope`]; creates tasks tagged with the scope
pub struct ScopeBuilder<'a> {
    dsl: &'a mut TasksDsl,
    scope: String,
}

impl ScopeBuilder<'_> {
    pub fn task(&mut self, name: &str) -> Result<&mut TaskDefinition, HardhatError> {
        self.dsl
            .add_task(TaskIdentifier::scoped(self.scope.as_str(), name), false)
    }

    pub fn subtask(&mut self, name: &str) -> Result<&mut TaskDefinition, HardhatError> {
        self.dsl
            .add_task(TaskIdentifier::scoped(self.scope.as_str(), name), true)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        if let Some(scope) = self.dsl.scopes.get_mut(&self.scope) {
            scope.set_description(description);
        }
        self
    }

    pub fn definition(&self) -> Option<&ScopeDefinition> {
        self.dsl.scopes.get(&self.scope)
    }
}
