use crate::errors::HardhatError;
use crate::params::{ParamDefinition, ParamDefinitionsMap, ParamOptions, TaskArguments};
use crate::task::overridden::OverriddenTaskDefinition;
use crate::task::runtime::{RunSuper, RuntimeEnvironment};
use crate::task::simple::SimpleTaskDefinition;
use crate::task::types::{TaskAction, TaskIdentifier};
use serde_json::Value;
use std::future::Future;

/// A task definition: either the original one or an override wrapping it.
///
/// Overrides form a parent-pointer chain that always ends in a
/// [`SimpleTaskDefinition`]. Reads walk the chain from the outermost link.
#[derive(Debug)]
pub enum TaskDefinition {
    Simple(SimpleTaskDefinition),
    Overridden(OverriddenTaskDefinition),
}

impl TaskDefinition {
    /// The wrapped definition, for overrides
    pub fn parent(&self) -> Option<&TaskDefinition> {
        match self {
            Self::Simple(_) => None,
            Self::Overridden(def) => Some(def.parent()),
        }
    }

    /// Every link, starting with `self` and ending with the original definition
    pub fn chain(&self) -> impl Iterator<Item = &TaskDefinition> {
        std::iter::successors(Some(self), |def| def.parent())
    }

    /// The link `depth` steps down the chain (`0` is `self`)
    pub fn ancestor(&self, depth: usize) -> Option<&TaskDefinition> {
        self.chain().nth(depth)
    }

    /// The original definition at the end of the chain
    pub fn root(&self) -> &SimpleTaskDefinition {
        let mut current = self;
        loop {
            match current {
                Self::Simple(def) => return def,
                Self::Overridden(def) => current = def.parent(),
            }
        }
    }

    pub fn is_overridden(&self) -> bool {
        matches!(self, Self::Overridden(_))
    }

    pub fn name(&self) -> &str {
        self.root().name()
    }

    pub fn scope(&self) -> Option<&str> {
        self.root().scope()
    }

    pub fn identifier(&self) -> &TaskIdentifier {
        self.root().identifier()
    }

    pub fn is_subtask(&self) -> bool {
        match self {
            Self::Simple(def) => def.is_subtask(),
            Self::Overridden(def) => def.is_subtask(),
        }
    }

    /// The most recently set description along the chain
    pub fn description(&self) -> Option<&str> {
        self.chain().find_map(|def| match def {
            Self::Simple(def) => def.description(),
            Self::Overridden(def) => def.own_description(),
        })
    }

    /// The most recently set action along the chain
    pub fn action(&self) -> &TaskAction {
        for def in self.chain() {
            if let Self::Overridden(def) = def
                && let Some(action) = def.own_action()
            {
                return action;
            }
        }
        self.root().action()
    }

    pub fn param_definitions(&self) -> &ParamDefinitionsMap {
        self.root().param_definitions()
    }

    pub fn positional_param_definitions(&self) -> &[ParamDefinition] {
        self.root().positional_param_definitions()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        match self {
            Self::Simple(def) => {
                def.set_description(description);
            }
            Self::Overridden(def) => {
                def.set_description(description);
            }
        }
        self
    }

    pub fn set_action<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(TaskArguments, RuntimeEnvironment, RunSuper) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        match self {
            Self::Simple(def) => {
                def.set_action(f);
            }
            Self::Overridden(def) => {
                def.set_action(f);
            }
        }
        self
    }

    pub fn add_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        match self {
            Self::Simple(def) => {
                def.add_param(name, options)?;
            }
            Self::Overridden(def) => {
                def.add_param(name, options)?;
            }
        }
        Ok(self)
    }

    pub fn add_optional_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        match self {
            Self::Simple(def) => {
                def.add_optional_param(name, options)?;
            }
            Self::Overridden(def) => {
                def.add_optional_param(name, options)?;
            }
        }
        Ok(self)
    }

    pub fn add_flag(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<&mut Self, HardhatError> {
        match self {
            Self::Simple(def) => {
                def.add_flag(name, description)?;
            }
            Self::Overridden(def) => {
                def.add_flag(name, description)?;
            }
        }
        Ok(self)
    }

    pub fn add_positional_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        match self {
            Self::Simple(def) => {
                def.add_positional_param(name, options)?;
            }
            Self::Overridden(def) => {
                def.add_positional_param(name, options)?;
            }
        }
        Ok(self)
    }

    pub fn add_optional_positional_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        match self {
            Self::Simple(def) => {
                def.add_optional_positional_param(name, options)?;
            }
            Self::Overridden(def) => {
                def.add_optional_positional_param(name, options)?;
            }
        }
        Ok(self)
    }

    pub fn add_variadic_positional_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        match self {
            Self::Simple(def) => {
                def.add_variadic_positional_param(name, options)?;
            }
            Self::Overridden(def) => {
                def.add_variadic_positional_param(name, options)?;
            }
        }
        Ok(self)
    }

    pub fn add_optional_variadic_positional_param(
        &mut self,
        name: &str,
        options: ParamOptions,
    ) -> Result<&mut Self, HardhatError> {
        match self {
            Self::Simple(def) => {
                def.add_optional_variadic_positional_param(name, options)?;
            }
            Self::Overridden(def) => {
                def.add_optional_variadic_positional_param(name, options)?;
            }
        }
        Ok(self)
    }
}

impl From<SimpleTaskDefinition> for TaskDefinition {
    fn from(def: SimpleTaskDefinition) -> Self {
        Self::Simple(def)
    }
}

impl From<OverriddenTaskDefinition> for TaskDefinition {
    fn from(def: OverriddenTaskDefinition) -> Self {
        Self::Overridden(def)
    }
}
