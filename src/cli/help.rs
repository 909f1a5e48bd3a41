//! Help text rendering for the global options, scopes and tasks.

use crate::cli::arguments_parser::ArgumentsParser;
use crate::errors::{ErrorKind, HardhatError};
use crate::params::{ParamDefinition, ParamDefinitionsMap};
use crate::task::{ScopeDefinition, ScopesMap, TaskDefinition, TaskIdentifier, TasksMap};
use std::fmt::Write;

pub struct HelpPrinter<'a> {
    executable: &'a str,
    version: &'a str,
    hardhat_param_definitions: &'a ParamDefinitionsMap,
    tasks: &'a TasksMap,
    scopes: &'a ScopesMap,
}

impl<'a> HelpPrinter<'a> {
    pub fn new(
        executable: &'a str,
        version: &'a str,
        hardhat_param_definitions: &'a ParamDefinitionsMap,
        tasks: &'a TasksMap,
        scopes: &'a ScopesMap,
    ) -> Self {
        Self {
            executable,
            version,
            hardhat_param_definitions,
            tasks,
            scopes,
        }
    }

    /// Usage line, global options, tasks and scopes
    pub fn global_help(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Hardhat version {}\n", self.version);
        let _ = writeln!(
            out,
            "Usage: {} [GLOBAL OPTIONS] [SCOPE] <TASK> [TASK OPTIONS]\n",
            self.executable
        );

        out.push_str("GLOBAL OPTIONS:\n\n");
        out.push_str(&params_list(self.hardhat_param_definitions.values()));

        out.push_str("\nAVAILABLE TASKS:\n\n");
        out.push_str(&tasks_list(self.tasks));

        if !self.scopes.is_empty() {
            out.push_str("\nAVAILABLE TASK SCOPES:\n\n");
            let entries: Vec<(String, &str)> = self
                .scopes
                .values()
                .map(|scope| (scope.name().to_string(), scope.description().unwrap_or("")))
                .collect();
            out.push_str(&aligned(&entries));
        }

        let _ = writeln!(
            out,
            "\nTo get help for a specific task run: {} help [SCOPE] <TASK>",
            self.executable
        );
        out
    }

    /// Usage line and task list of one scope
    pub fn scope_help(&self, scope_name: &str) -> Result<String, HardhatError> {
        let scope = self.scope(scope_name)?;

        let mut out = String::new();
        if let Some(description) = scope.description() {
            let _ = writeln!(out, "{}\n", description);
        }
        let _ = writeln!(
            out,
            "Usage: {} [GLOBAL OPTIONS] {} <TASK> [TASK OPTIONS]\n",
            self.executable, scope_name
        );
        out.push_str("AVAILABLE TASKS:\n\n");
        out.push_str(&tasks_list(scope.tasks()));
        let _ = writeln!(
            out,
            "\nTo get help for a specific task run: {} help {} <TASK>",
            self.executable, scope_name
        );
        Ok(out)
    }

    /// Usage line, options and positional arguments of one task
    pub fn task_help(&self, identifier: &TaskIdentifier) -> Result<String, HardhatError> {
        let definition = self.task(identifier)?;

        let mut out = String::new();
        let _ = writeln!(out, "Hardhat version {}\n", self.version);
        let _ = writeln!(
            out,
            "Usage: {} [GLOBAL OPTIONS] {}{}\n",
            self.executable,
            identifier,
            usage_params(definition)
        );

        if !definition.param_definitions().is_empty() {
            out.push_str("OPTIONS:\n\n");
            out.push_str(&params_list(definition.param_definitions().values()));
            out.push('\n');
        }

        if !definition.positional_param_definitions().is_empty() {
            out.push_str("POSITIONAL ARGUMENTS:\n\n");
            let entries: Vec<(String, String)> = definition
                .positional_param_definitions()
                .iter()
                .map(|param| (param.name.clone(), param_help_text(param)))
                .collect();
            out.push_str(&aligned(&entries));
            out.push('\n');
        }

        let _ = writeln!(
            out,
            "{}: {}\n",
            identifier,
            definition.description().unwrap_or("")
        );
        let _ = writeln!(out, "For global options help run: {} help", self.executable);
        Ok(out)
    }

    fn scope(&self, scope_name: &str) -> Result<&ScopeDefinition, HardhatError> {
        self.scopes.get(scope_name).ok_or_else(|| {
            HardhatError::new(ErrorKind::UnrecognizedTask, &[("task", scope_name)])
        })
    }

    fn task(&self, identifier: &TaskIdentifier) -> Result<&TaskDefinition, HardhatError> {
        match &identifier.scope {
            Some(scope) => self
                .scope(scope)?
                .tasks()
                .get(&identifier.task)
                .ok_or_else(|| {
                    HardhatError::new(
                        ErrorKind::UnrecognizedScopedTask,
                        &[("scope", scope.as_str()), ("task", identifier.task.as_str())],
                    )
                }),
            None => self.tasks.get(&identifier.task).ok_or_else(|| {
                HardhatError::new(
                    ErrorKind::UnrecognizedTask,
                    &[("task", identifier.task.as_str())],
                )
            }),
        }
    }
}

// ` [--opt <TYPE>] --mandatory <TYPE> [--flag] <pos> [opt] [...rest]`
fn usage_params(definition: &TaskDefinition) -> String {
    let mut usage = String::new();

    for param in definition.param_definitions().values() {
        let cla = ArgumentsParser::param_name_to_cla(&param.name);
        let entry = if param.is_flag {
            cla
        } else {
            format!("{} <{}>", cla, param.ty.name().to_uppercase())
        };

        if param.is_optional {
            let _ = write!(usage, " [{}]", entry);
        } else {
            let _ = write!(usage, " {}", entry);
        }
    }

    let positionals = definition.positional_param_definitions();
    if !positionals.is_empty() {
        usage.push_str(" [--]");
    }
    for param in positionals {
        let name = if param.is_variadic {
            format!("...{}", param.name)
        } else {
            param.name.clone()
        };

        if param.is_optional {
            let _ = write!(usage, " [{}]", name);
        } else {
            let _ = write!(usage, " <{}>", name);
        }
    }

    usage
}

fn params_list<'p>(params: impl Iterator<Item = &'p ParamDefinition>) -> String {
    let entries: Vec<(String, String)> = params
        .map(|param| {
            (
                ArgumentsParser::param_name_to_cla(&param.name),
                param_help_text(param),
            )
        })
        .collect();
    aligned(&entries)
}

fn tasks_list(tasks: &TasksMap) -> String {
    let entries: Vec<(String, &str)> = tasks
        .iter()
        .filter(|(_, definition)| !definition.is_subtask())
        .map(|(name, definition)| (name.clone(), definition.description().unwrap_or("")))
        .collect();
    aligned(&entries)
}

fn param_help_text(param: &ParamDefinition) -> String {
    let mut text = param.description.clone().unwrap_or_default();
    if param.is_optional
        && !param.is_flag
        && let Some(default) = &param.default_value
    {
        let _ = write!(text, " (default: {})", default);
    }
    text
}

// One `  name<padding>\tdescription` line per entry
fn aligned<D: AsRef<str>>(entries: &[(String, D)]) -> String {
    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    entries
        .iter()
        .map(|(name, description)| {
            format!("  {:width$}\t{}\n", name, description.as_ref(), width = width)
        })
        .collect()
}
