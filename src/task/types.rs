use crate::params::TaskArguments;
use crate::task::runtime::{RunSuper, RuntimeEnvironment};
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future returned by a task action
pub type ActionFuture = BoxFuture<'static, anyhow::Result<Value>>;

/// A task's action: receives its resolved arguments, the runtime (to run other
/// tasks) and a handle to the overridden definition's action.
pub type TaskAction =
    Arc<dyn Fn(TaskArguments, RuntimeEnvironment, RunSuper) -> ActionFuture + Send + Sync>;

/// Wrap an async closure into a [`TaskAction`]
pub fn action<F, Fut>(f: F) -> TaskAction
where
    F: Fn(TaskArguments, RuntimeEnvironment, RunSuper) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(move |arguments, env, run_super| Box::pin(f(arguments, env, run_super)))
}

/// Addresses a task either by bare name or inside a scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskIdentifier {
    pub scope: Option<String>,
    pub task: String,
}

impl TaskIdentifier {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            scope: None,
            task: task.into(),
        }
    }

    pub fn scoped(scope: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            task: task.into(),
        }
    }
}

impl From<&str> for TaskIdentifier {
    fn from(task: &str) -> Self {
        Self::new(task)
    }
}

impl From<String> for TaskIdentifier {
    fn from(task: String) -> Self {
        Self::new(task)
    }
}

impl From<(&str, &str)> for TaskIdentifier {
    fn from((scope, task): (&str, &str)) -> Self {
        Self::scoped(scope, task)
    }
}

impl fmt::Display for TaskIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{} {}", scope, self.task),
            None => write!(f, "{}", self.task),
        }
    }
}
