use crate::errors::{ErrorKind, HardhatError};
use crate::params::{ParamOptions, TaskArguments};
use crate::task::definition::TaskDefinition;
use crate::task::runtime::{RunSuper, RuntimeEnvironment};
use crate::task::types::{TaskAction, action};
use serde_json::Value;
use std::fmt;
use std::future::Future;

/// A redefinition of an existing task.
///
/// Name and parameters are read through the parent. Description and action
/// shadow the parent's once set. Only flags and optional named params can be
/// added, and those land on the parent so every link of the chain sees them.
pub struct OverriddenTaskDefinition {
    parent: Box<TaskDefinition>,
    is_subtask: bool,
    description: Option<String>,
    action: Option<TaskAction>,
}

impl OverriddenTaskDefinition {
    pub fn new(parent: TaskDefinition, is_subtask: bool) -> Self {
        Self {
            parent: Box::new(parent),
            is_subtask,
            description: None,
            action: None,
        }
    }

    pub fn parent(&self) -> &TaskDefinition {
        &self.parent
    }

    pub fn is_subtask(&self) -> bool {
        self.is_subtask
    }

    /// Description set on this link only
    pub fn own_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Action set on this link only
    pub fn own_action(&self) -> Option<&TaskAction> {
        self.action.as_ref()
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
        self.action = Some(action(f));
        self
    }

    /// Only accepted when the param is explicitly optional
    pub fn add_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        if options.is_optional != Some(true) {
            return Err(self.override_error(ErrorKind::OverrideNoMandatoryParams));
        }
        self.add_optional_param(name, options)
    }

    pub fn add_optional_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        self.parent.add_optional_param(name, options)?;
        Ok(self)
    }

    pub fn add_flag(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<&mut Self, HardhatError> {
        self.parent.add_flag(name, description)?;
        Ok(self)
    }

    pub fn add_positional_param(
        &mut self,
        _name: &str,
        _options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        Err(self.override_error(ErrorKind::OverrideNoPositionalParams))
    }

    pub fn add_optional_positional_param(
        &mut self,
        _name: &str,
        _options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        Err(self.override_error(ErrorKind::OverrideNoPositionalParams))
    }

    pub fn add_variadic_positional_param(
        &mut self,
        _name: &str,
        _options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        Err(self.override_error(ErrorKind::OverrideNoVariadicParams))
    }

    pub fn add_optional_variadic_positional_param(
        &mut self,
        _name: &str,
        _options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        Err(self.override_error(ErrorKind::OverrideNoVariadicParams))
    }

    fn override_error(&self, kind: ErrorKind) -> HardhatError {
        HardhatError::new(kind, &[("taskName", self.parent.name())])
    }
}

impl fmt::Debug for OverriddenTaskDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverriddenTaskDefinition")
            .field("is_subtask", &self.is_subtask)
            .field("description", &self.description)
            .field("has_action", &self.action.is_some())
            .field("parent", &self.parent)
            .finish()
    }
}
