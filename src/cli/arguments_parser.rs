//! Command line argument parsing
//!
//! Parsing happens in two passes over the same grammar:
//! `[global options] [scope] <task> [task options] [positional args...]`
//!
//! 1. [`ArgumentsParser::parse_hardhat_arguments`] folds every recognized
//!    global `--param [value]` into the global arguments and finds the scope or
//!    task name. Everything else is left unparsed, task name included.
//! 2. [`ArgumentsParser::parse_task_arguments`] parses the task's own tokens
//!    against its named and positional parameter definitions.

use crate::env::TASK_HELP;
use crate::errors::{ErrorKind, HardhatError};
use crate::params::{CliArgumentType, ParamDefinition, ParamDefinitionsMap, TaskArguments};
use crate::task::{ScopesMap, TaskDefinition, TasksMap};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Prefix of every named command line parameter
pub const PARAM_PREFIX: &str = "--";

/// Result of the first pass
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedHardhatArguments {
    /// Environment defaults overridden by the command line
    pub hardhat_arguments: TaskArguments,
    pub scope_or_task_name: Option<String>,
    /// Every token that is not a global param, starting with the task name
    pub all_unparsed_clas: Vec<String>,
}

/// Scope and task selected by the unparsed tokens of the first pass
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeAndTaskNames {
    pub scope_name: Option<String>,
    pub task_name: String,
    pub unparsed_clas: Vec<String>,
}

/// Parses command line tokens. Relative `inputFile` values resolve against
/// the base directory when one is set, else against the process directory.
#[derive(Debug, Default, Clone)]
pub struct ArgumentsParser {
    base_dir: Option<PathBuf>,
}

impl ArgumentsParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// `showStackTraces` becomes `--show-stack-traces`
    pub fn param_name_to_cla(param_name: &str) -> String {
        let mut cla = String::from(PARAM_PREFIX);
        for c in param_name.chars() {
            if c.is_uppercase() {
                cla.push('-');
                cla.extend(c.to_lowercase());
            } else {
                cla.push(c);
            }
        }
        cla
    }

    /// `--show-stack-traces` becomes `showStackTraces`. Tokens with any
    /// uppercase letter are rejected.
    ///
    /// This is the exact inverse of [`Self::param_name_to_cla`]: a `-` only
    /// uppercases the character after it when that character is not another
    /// `-`, so malformed tokens such as `---network` or `--network-` never map
    /// onto a real param name.
    pub fn cla_to_param_name(cla: &str) -> Result<String, HardhatError> {
        if cla.to_lowercase() != cla {
            return Err(HardhatError::new(
                ErrorKind::ParamNameInvalidCasing,
                &[("param", cla)],
            ));
        }

        let body = cla.strip_prefix(PARAM_PREFIX).unwrap_or(cla);
        let mut name = String::with_capacity(body.len());
        let mut chars = body.chars().peekable();
        while let Some(c) = chars.next() {
            match (c, chars.peek()) {
                ('-', Some(&next)) if next != '-' => {
                    chars.next();
                    name.extend(next.to_uppercase());
                }
                _ => name.push(c),
            }
        }
        Ok(name)
    }

    /// First pass: separate global params from the scope or task name and
    /// whatever follows it.
    pub fn parse_hardhat_arguments<S: AsRef<str>>(
        &self,
        hardhat_param_definitions: &ParamDefinitionsMap,
        env_variable_arguments: &TaskArguments,
        raw_clas: &[S],
    ) -> Result<ParsedHardhatArguments, HardhatError> {
        let mut hardhat_arguments = TaskArguments::new();
        let mut scope_or_task_name: Option<String> = None;
        let mut all_unparsed_clas = Vec::new();

        let mut i = 0;
        while i < raw_clas.len() {
            let arg = raw_clas[i].as_ref();

            match &scope_or_task_name {
                None => {
                    if !Self::has_cla_param_name_format(arg) {
                        debug!("Detected scope or task name '{}'", arg);
                        scope_or_task_name = Some(arg.to_string());
                        all_unparsed_clas.push(arg.to_string());
                        i += 1;
                        continue;
                    }

                    if !Self::is_cla_param_name(arg, hardhat_param_definitions)? {
                        return Err(HardhatError::new(
                            ErrorKind::UnrecognizedCommandLineArg,
                            &[("argument", arg)],
                        ));
                    }

                    i = self.parse_argument_at(
                        raw_clas,
                        i,
                        hardhat_param_definitions,
                        &mut hardhat_arguments,
                        TASK_HELP,
                    )?;
                }
                Some(task_name) => {
                    if !Self::is_cla_param_name(arg, hardhat_param_definitions)? {
                        all_unparsed_clas.push(arg.to_string());
                        i += 1;
                        continue;
                    }

                    let task_name = task_name.clone();
                    i = self.parse_argument_at(
                        raw_clas,
                        i,
                        hardhat_param_definitions,
                        &mut hardhat_arguments,
                        &task_name,
                    )?;
                }
            }
            i += 1;
        }

        let mut merged = env_variable_arguments.clone();
        merged.extend(hardhat_arguments);

        Ok(ParsedHardhatArguments {
            hardhat_arguments: merged,
            scope_or_task_name,
            all_unparsed_clas,
        })
    }

    /// Decide which scope and task the unparsed tokens select
    pub fn parse_scope_and_task_names<S: AsRef<str>>(
        &self,
        all_unparsed_clas: &[S],
        task_definitions: &TasksMap,
        scope_definitions: &ScopesMap,
    ) -> Result<ScopeAndTaskNames, HardhatError> {
        let clas: Vec<String> = all_unparsed_clas
            .iter()
            .map(|cla| cla.as_ref().to_string())
            .collect();

        let names = match clas.as_slice() {
            [] => ScopeAndTaskNames {
                scope_name: None,
                task_name: TASK_HELP.to_string(),
                unparsed_clas: Vec::new(),
            },
            // A lone scope name prints that scope's help
            [single] if scope_definitions.contains_key(single) => ScopeAndTaskNames {
                scope_name: None,
                task_name: TASK_HELP.to_string(),
                unparsed_clas: vec![single.clone()],
            },
            [single] => ScopeAndTaskNames {
                scope_name: None,
                task_name: single.clone(),
                unparsed_clas: Vec::new(),
            },
            [first, second, rest @ ..] => match scope_definitions.get(first) {
                Some(scope) => {
                    if !scope.tasks().contains_key(second) {
                        return Err(HardhatError::new(
                            ErrorKind::UnrecognizedScopedTask,
                            &[("scope", first.as_str()), ("task", second.as_str())],
                        ));
                    }
                    ScopeAndTaskNames {
                        scope_name: Some(first.clone()),
                        task_name: second.clone(),
                        unparsed_clas: rest.to_vec(),
                    }
                }
                None => {
                    if !task_definitions.contains_key(first) {
                        debug!("'{}' is neither a scope nor a task", first);
                    }
                    ScopeAndTaskNames {
                        scope_name: None,
                        task_name: first.clone(),
                        unparsed_clas: clas[1..].to_vec(),
                    }
                }
            },
        };

        Ok(names)
    }

    /// Second pass: parse a task's tokens into typed arguments
    pub fn parse_task_arguments<S: AsRef<str>>(
        &self,
        task_definition: &TaskDefinition,
        raw_clas: &[S],
    ) -> Result<TaskArguments, HardhatError> {
        let (mut arguments, raw_positional_arguments) =
            self.parse_task_param_arguments(task_definition, raw_clas)?;

        let positional_arguments = self.parse_positional_param_args(
            &raw_positional_arguments,
            task_definition.positional_param_definitions(),
            task_definition.name(),
        )?;

        arguments.extend(positional_arguments);
        Ok(arguments)
    }

    fn parse_task_param_arguments<S: AsRef<str>>(
        &self,
        task_definition: &TaskDefinition,
        raw_clas: &[S],
    ) -> Result<(TaskArguments, Vec<String>), HardhatError> {
        let param_definitions = task_definition.param_definitions();
        let mut arguments = TaskArguments::new();
        let mut raw_positional_arguments = Vec::new();

        let mut i = 0;
        while i < raw_clas.len() {
            let arg = raw_clas[i].as_ref();

            if !Self::has_cla_param_name_format(arg) {
                raw_positional_arguments.push(arg.to_string());
                i += 1;
                continue;
            }

            if !Self::is_cla_param_name(arg, param_definitions)? {
                return Err(HardhatError::new(
                    ErrorKind::UnrecognizedParamName,
                    &[("param", arg)],
                ));
            }

            i = self.parse_argument_at(
                raw_clas,
                i,
                param_definitions,
                &mut arguments,
                task_definition.name(),
            )?;
            i += 1;
        }

        self.add_task_default_arguments(task_definition, &mut arguments)?;
        Ok((arguments, raw_positional_arguments))
    }

    fn add_task_default_arguments(
        &self,
        task_definition: &TaskDefinition,
        arguments: &mut TaskArguments,
    ) -> Result<(), HardhatError> {
        for (param_name, definition) in task_definition.param_definitions() {
            if arguments.contains_key(param_name) {
                continue;
            }
            if !definition.is_optional {
                return Err(missing_task_argument(param_name, task_definition.name()));
            }
            if let Some(default) = &definition.default_value {
                arguments.insert(param_name.clone(), default.clone());
            }
        }
        Ok(())
    }

    fn parse_positional_param_args(
        &self,
        raw_positional_args: &[String],
        positional_param_definitions: &[ParamDefinition],
        task_name: &str,
    ) -> Result<TaskArguments, HardhatError> {
        let mut arguments = TaskArguments::new();

        for (i, definition) in positional_param_definitions.iter().enumerate() {
            let Some(raw_arg) = raw_positional_args.get(i) else {
                if let Some(default) = &definition.default_value {
                    arguments.insert(definition.name.clone(), default.clone());
                } else if definition.is_variadic && !definition.is_optional {
                    return Err(HardhatError::new(
                        ErrorKind::MissingPositionalArg,
                        &[("param", definition.name.as_str())],
                    ));
                } else if !definition.is_optional {
                    return Err(missing_task_argument(&definition.name, task_name));
                }
                continue;
            };

            let ty = cli_type(definition, task_name)?;
            let value = if definition.is_variadic {
                let values = raw_positional_args[i..]
                    .iter()
                    .map(|raw| self.parse_value(ty, &definition.name, raw))
                    .collect::<Result<Vec<_>, _>>()?;
                Value::Array(values)
            } else {
                self.parse_value(ty, &definition.name, raw_arg)?
            };
            arguments.insert(definition.name.clone(), value);
        }

        let has_variadic_param = positional_param_definitions
            .last()
            .is_some_and(|definition| definition.is_variadic);

        if !has_variadic_param && raw_positional_args.len() > positional_param_definitions.len() {
            return Err(HardhatError::new(
                ErrorKind::UnrecognizedPositionalArg,
                &[(
                    "argument",
                    raw_positional_args[positional_param_definitions.len()].as_str(),
                )],
            ));
        }

        Ok(arguments)
    }

    fn has_cla_param_name_format(arg: &str) -> bool {
        arg.starts_with(PARAM_PREFIX)
    }

    fn is_cla_param_name(
        arg: &str,
        param_definitions: &ParamDefinitionsMap,
    ) -> Result<bool, HardhatError> {
        if !Self::has_cla_param_name_format(arg) {
            return Ok(false);
        }
        let name = Self::cla_to_param_name(arg)?;
        Ok(param_definitions.contains_key(&name))
    }

    // Returns the index of the last token consumed
    fn parse_argument_at<S: AsRef<str>>(
        &self,
        raw_clas: &[S],
        index: usize,
        param_definitions: &ParamDefinitionsMap,
        parsed_arguments: &mut TaskArguments,
        task_name: &str,
    ) -> Result<usize, HardhatError> {
        let cla = raw_clas[index].as_ref();
        let param_name = Self::cla_to_param_name(cla)?;
        let Some(definition) = param_definitions.get(&param_name) else {
            return Err(HardhatError::new(
                ErrorKind::UnrecognizedParamName,
                &[("param", cla)],
            ));
        };

        if parsed_arguments.contains_key(&param_name) {
            return Err(HardhatError::new(
                ErrorKind::RepeatedParam,
                &[("param", cla)],
            ));
        }

        if definition.is_flag {
            parsed_arguments.insert(param_name, Value::Bool(true));
            return Ok(index);
        }

        let value_index = index + 1;
        let Some(raw_value) = raw_clas.get(value_index) else {
            return Err(missing_task_argument(&param_name, task_name));
        };

        let ty = cli_type(definition, task_name)?;
        let value = self.parse_value(ty, &param_name, raw_value.as_ref())?;
        parsed_arguments.insert(param_name, value);
        Ok(value_index)
    }

    fn parse_value(
        &self,
        ty: CliArgumentType,
        param_name: &str,
        raw: &str,
    ) -> Result<Value, HardhatError> {
        match &self.base_dir {
            Some(base_dir) => ty.parse_relative_to(param_name, raw, base_dir),
            None => ty.parse(param_name, raw),
        }
    }
}

fn missing_task_argument(param_name: &str, task_name: &str) -> HardhatError {
    let cla = ArgumentsParser::param_name_to_cla(param_name);
    HardhatError::new(
        ErrorKind::MissingTaskArgument,
        &[("param", cla.as_str()), ("task", task_name)],
    )
}

// Tasks reachable from a command line only declare parseable types
fn cli_type(definition: &ParamDefinition, task_name: &str) -> Result<CliArgumentType, HardhatError> {
    definition.ty.as_cli().ok_or_else(|| {
        HardhatError::new(
            ErrorKind::CliArgumentTypeRequired,
            &[("task", task_name), ("type", definition.ty.name())],
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_name_to_cla() {
        assert_eq!(
            ArgumentsParser::param_name_to_cla("showStackTraces"),
            "--show-stack-traces"
        );
        assert_eq!(ArgumentsParser::param_name_to_cla("f"), "--f");
        assert_eq!(ArgumentsParser::param_name_to_cla("aBC"), "--a-b-c");
    }

    #[test]
    fn test_cla_to_param_name() {
        assert_eq!(
            ArgumentsParser::cla_to_param_name("--show-stack-traces").unwrap(),
            "showStackTraces"
        );
        assert_eq!(ArgumentsParser::cla_to_param_name("--f").unwrap(), "f");

        let err = ArgumentsParser::cla_to_param_name("--showStackTraces").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParamNameInvalidCasing);
    }

    #[test]
    fn test_casing_round_trip() {
        for name in ["a", "network", "showStackTraces", "x1Y2", "aBC", "maxMemory"] {
            let cla = ArgumentsParser::param_name_to_cla(name);
            assert_eq!(ArgumentsParser::cla_to_param_name(&cla).unwrap(), name);
        }
    }

    #[test]
    fn test_malformed_dashes_do_not_resolve() {
        assert_eq!(ArgumentsParser::cla_to_param_name("---network").unwrap(), "Network");
        assert_eq!(ArgumentsParser::cla_to_param_name("--network-").unwrap(), "network-");
        assert_eq!(ArgumentsParser::cla_to_param_name("--net--work").unwrap(), "net-Work");

        let definitions = crate::params::hardhat_param_definitions();
        for token in ["---network", "--network-", "--net--work", "---verbose"] {
            assert!(
                !ArgumentsParser::is_cla_param_name(token, definitions).unwrap(),
                "{token} should not be a global param"
            );
        }
    }

    #[test]
    fn test_malformed_global_param_before_task_name() {
        let err = ArgumentsParser::new()
            .parse_hardhat_arguments(
                crate::params::hardhat_param_definitions(),
                &TaskArguments::new(),
                &["---verbose", "--network-", "local", "compile"],
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedCommandLineArg);
        assert_eq!(err.params()["argument"], "---verbose");
    }

    #[test]
    fn test_bare_prefix_is_not_a_known_param() {
        let definitions = crate::params::hardhat_param_definitions();
        assert!(!ArgumentsParser::is_cla_param_name("--", definitions).unwrap());
    }
}
