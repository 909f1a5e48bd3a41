//! Error catalog shared by the task builder, the arguments parser and the runtime.
//!
//! Every failure is a [`HardhatError`] tagged with an [`ErrorKind`]. Each kind
//! owns a stable number (rendered as `HH<number>`), a category and a message
//! template with `%named%` placeholders that are filled in exactly once.

use std::collections::BTreeMap;
use std::error::Error as StdError;

/// Boxed parent error kept for diagnostics
pub type ParentError = Box<dyn StdError + Send + Sync + 'static>;

/// Error category, derived from the numeric range of the error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Project level problems (1-99)
    General,
    /// Misuse of the task builder API (200-299)
    TaskDefinitions,
    /// Malformed, missing or unrecognized command line input (300-399)
    Arguments,
}

/// Every failure mode of the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidConfig,

    ParamAfterVariadic,
    ParamAlreadyDefined,
    ParamClashesWithHardhatParam,
    MandatoryParamAfterOptional,
    ActionNotSet,
    RunSuperNotAvailable,
    DefaultValueWrongType,
    DefaultInMandatoryParam,
    InvalidParamNameCasing,
    OverrideNoMandatoryParams,
    OverrideNoPositionalParams,
    OverrideNoVariadicParams,
    CliArgumentTypeRequired,
    TaskScopeClash,
    ScopeTaskClash,

    InvalidEnvVarValue,
    InvalidValueForType,
    InvalidInputFile,
    UnrecognizedTask,
    UnrecognizedCommandLineArg,
    UnrecognizedParamName,
    MissingTaskArgument,
    MissingPositionalArg,
    UnrecognizedPositionalArg,
    RepeatedParam,
    ParamNameInvalidCasing,
    RunningSubtaskFromCli,
    UnrecognizedScopedTask,
}

impl ErrorKind {
    /// All kinds, in numeric order
    pub const ALL: [ErrorKind; 29] = [
        ErrorKind::InvalidConfig,
        ErrorKind::ParamAfterVariadic,
        ErrorKind::ParamAlreadyDefined,
        ErrorKind::ParamClashesWithHardhatParam,
        ErrorKind::MandatoryParamAfterOptional,
        ErrorKind::ActionNotSet,
        ErrorKind::RunSuperNotAvailable,
        ErrorKind::DefaultValueWrongType,
        ErrorKind::DefaultInMandatoryParam,
        ErrorKind::InvalidParamNameCasing,
        ErrorKind::OverrideNoMandatoryParams,
        ErrorKind::OverrideNoPositionalParams,
        ErrorKind::OverrideNoVariadicParams,
        ErrorKind::CliArgumentTypeRequired,
        ErrorKind::TaskScopeClash,
        ErrorKind::ScopeTaskClash,
        ErrorKind::InvalidEnvVarValue,
        ErrorKind::InvalidValueForType,
        ErrorKind::InvalidInputFile,
        ErrorKind::UnrecognizedTask,
        ErrorKind::UnrecognizedCommandLineArg,
        ErrorKind::UnrecognizedParamName,
        ErrorKind::MissingTaskArgument,
        ErrorKind::MissingPositionalArg,
        ErrorKind::UnrecognizedPositionalArg,
        ErrorKind::RepeatedParam,
        ErrorKind::ParamNameInvalidCasing,
        ErrorKind::RunningSubtaskFromCli,
        ErrorKind::UnrecognizedScopedTask,
    ];

    /// Stable numeric code
    pub fn number(self) -> u16 {
        match self {
            Self::InvalidConfig => 8,

            Self::ParamAfterVariadic => 200,
            Self::ParamAlreadyDefined => 201,
            Self::ParamClashesWithHardhatParam => 202,
            Self::MandatoryParamAfterOptional => 203,
            Self::ActionNotSet => 204,
            Self::RunSuperNotAvailable => 205,
            Self::DefaultValueWrongType => 206,
            Self::DefaultInMandatoryParam => 207,
            Self::InvalidParamNameCasing => 208,
            Self::OverrideNoMandatoryParams => 210,
            Self::OverrideNoPositionalParams => 211,
            Self::OverrideNoVariadicParams => 212,
            Self::CliArgumentTypeRequired => 213,
            Self::TaskScopeClash => 217,
            Self::ScopeTaskClash => 218,

            Self::InvalidEnvVarValue => 300,
            Self::InvalidValueForType => 301,
            Self::InvalidInputFile => 302,
            Self::UnrecognizedTask => 303,
            Self::UnrecognizedCommandLineArg => 304,
            Self::UnrecognizedParamName => 305,
            Self::MissingTaskArgument => 306,
            Self::MissingPositionalArg => 307,
            Self::UnrecognizedPositionalArg => 308,
            Self::RepeatedParam => 309,
            Self::ParamNameInvalidCasing => 310,
            Self::RunningSubtaskFromCli => 312,
            Self::UnrecognizedScopedTask => 314,
        }
    }

    /// Short code shown to users, e.g. `HH306`
    pub fn code(self) -> String {
        format!("HH{}", self.number())
    }

    pub fn category(self) -> ErrorCategory {
        match self.number() {
            200..=299 => ErrorCategory::TaskDefinitions,
            300..=399 => ErrorCategory::Arguments,
            _ => ErrorCategory::General,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::InvalidConfig => "Invalid config file",
            Self::ParamAfterVariadic => "Could not add positional param after variadic param",
            Self::ParamAlreadyDefined => "Could not add param because its name is already used",
            Self::ParamClashesWithHardhatParam => {
                "Could not add param because its name is used by a global param"
            }
            Self::MandatoryParamAfterOptional => {
                "Could not add mandatory positional param after an optional one"
            }
            Self::ActionNotSet => "Tried to run a task without an action",
            Self::RunSuperNotAvailable => "Tried to run super from a non-overridden task",
            Self::DefaultValueWrongType => "Default value has the wrong type",
            Self::DefaultInMandatoryParam => "Default value set for a mandatory param",
            Self::InvalidParamNameCasing => "Invalid param name casing",
            Self::OverrideNoMandatoryParams => "Attempted to add mandatory params to an overridden task",
            Self::OverrideNoPositionalParams => {
                "Attempted to add positional params to an overridden task"
            }
            Self::OverrideNoVariadicParams => "Attempted to add variadic params to an overridden task",
            Self::CliArgumentTypeRequired => "Invalid argument type for a task",
            Self::TaskScopeClash => "Scope name clashes with a task",
            Self::ScopeTaskClash => "Task name clashes with a scope",
            Self::InvalidEnvVarValue => "Invalid environment variable value",
            Self::InvalidValueForType => "Invalid argument value",
            Self::InvalidInputFile => "Invalid input file",
            Self::UnrecognizedTask => "Unrecognized task",
            Self::UnrecognizedCommandLineArg => "Unrecognized command line argument",
            Self::UnrecognizedParamName => "Unrecognized param",
            Self::MissingTaskArgument => "Missing task argument",
            Self::MissingPositionalArg => "Missing positional argument",
            Self::UnrecognizedPositionalArg => "Unrecognized positional argument",
            Self::RepeatedParam => "Repeated parameter",
            Self::ParamNameInvalidCasing => "Invalid casing in command line parameter",
            Self::RunningSubtaskFromCli => "Subtasks can't be run from the command line",
            Self::UnrecognizedScopedTask => "Unrecognized scoped task",
        }
    }

    /// Message template with `%name%` placeholders
    pub fn template(self) -> &'static str {
        match self {
            Self::InvalidConfig => {
                "There's one or more errors in your config file %path%:\n\n%errors%"
            }
            Self::ParamAfterVariadic => {
                "Could not set positional param %paramName% for task %taskName% because there is already a variadic positional param and it has to be the last positional one."
            }
            Self::ParamAlreadyDefined => {
                "Could not set param %paramName% for task %taskName% because its name is already used."
            }
            Self::ParamClashesWithHardhatParam => {
                "Could not set param %paramName% for task %taskName% because its name is used as a param for Hardhat."
            }
            Self::MandatoryParamAfterOptional => {
                "Could not set param %paramName% for task %taskName% because it is mandatory and it was added after an optional positional param."
            }
            Self::ActionNotSet => "No action set for task %taskName%.",
            Self::RunSuperNotAvailable => {
                "Tried to call runSuper from a non-overridden definition of task %taskName%"
            }
            Self::DefaultValueWrongType => {
                "Default value for param %paramName% of task %taskName% doesn't match the default one, try specifying it."
            }
            Self::DefaultInMandatoryParam => {
                "Default value for param %paramName% of task %taskName% shouldn't be set."
            }
            Self::InvalidParamNameCasing => {
                "Invalid param name %paramName% in task %taskName%. Param names must be camelCase."
            }
            Self::OverrideNoMandatoryParams => {
                "Redefinition of task %taskName% failed. Unsupported operation adding mandatory (non optional) param definitions in an overridden task."
            }
            Self::OverrideNoPositionalParams => {
                "Redefinition of task %taskName% failed. Unsupported operation adding positional param definitions in an overridden task."
            }
            Self::OverrideNoVariadicParams => {
                "Redefinition of task %taskName% failed. Unsupported operation adding variadic param definitions in an overridden task."
            }
            Self::CliArgumentTypeRequired => {
                "Task %task% is not a subtask but one of its arguments uses the type %type%, which is not parseable.\n\nOnly subtasks can have non-parseable argument types."
            }
            Self::TaskScopeClash => {
                "A clash was found while creating scope '%scopeName%', since a task with that name already exists."
            }
            Self::ScopeTaskClash => {
                "A clash was found while creating task '%taskName%', since a scope with that name already exists."
            }
            Self::InvalidEnvVarValue => "Invalid environment variable %varName%'s value: %value%",
            Self::InvalidValueForType => "Invalid value %value% for argument %name% of type %type%",
            Self::InvalidInputFile => {
                "Invalid argument %name%: File %value% doesn't exist or is not a readable file."
            }
            Self::UnrecognizedTask => "Unrecognized task '%task%'",
            Self::UnrecognizedCommandLineArg => {
                "Unrecognised command line argument %argument%.\nNote that task arguments must come after the task name."
            }
            Self::UnrecognizedParamName => "Unrecognized param %param%",
            Self::MissingTaskArgument => {
                "The '%param%' parameter of task '%task%' expects a value, but none was passed."
            }
            Self::MissingPositionalArg => "Missing positional argument %param%",
            Self::UnrecognizedPositionalArg => "Unrecognized positional argument %argument%",
            Self::RepeatedParam => "Repeated parameter %param%",
            Self::ParamNameInvalidCasing => {
                "Invalid param %param%. Command line params must be lowercase."
            }
            Self::RunningSubtaskFromCli => "Trying to run the %name% subtask from the CLI",
            Self::UnrecognizedScopedTask => "Unrecognized task '%task%' under scope '%scope%'",
        }
    }
}

/// The single error type of the core
#[derive(Debug, thiserror::Error)]
#[error("{}: {}", .kind.code(), .message)]
pub struct HardhatError {
    kind: ErrorKind,
    message: String,
    params: BTreeMap<String, String>,
    #[source]
    parent: Option<ParentError>,
}

impl HardhatError {
    /// Build an error of `kind`, rendering its template with `params`
    pub fn new(kind: ErrorKind, params: &[(&str, &str)]) -> Self {
        let params: BTreeMap<String, String> = params
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        debug_assert!(
            template_placeholders(kind.template())
                .iter()
                .all(|name| params.contains_key(*name)),
            "{:?} is missing one of {:?}",
            kind,
            template_placeholders(kind.template())
        );
        let message = apply_error_message_template(kind.template(), &params);

        Self {
            kind,
            message,
            params,
            parent: None,
        }
    }

    /// Attach the error that caused this one
    pub fn with_parent(mut self, parent: impl Into<ParentError>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn number(&self) -> u16 {
        self.kind.number()
    }

    pub fn code(&self) -> String {
        self.kind.code()
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Rendered message without the `HHxxx: ` prefix
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn parent(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.parent.as_deref()
    }

    /// True if `err` is a [`HardhatError`] of the given kind
    pub fn is_kind(err: &anyhow::Error, kind: ErrorKind) -> bool {
        err.downcast_ref::<HardhatError>()
            .is_some_and(|e| e.kind() == kind)
    }
}

/// Render `template`, replacing each `%name%` with its value.
///
/// The template is scanned once from left to right, so substituted values are
/// never interpreted as placeholders. `%%` renders a single `%`. Placeholders
/// without a value are kept verbatim.
pub fn apply_error_message_template(template: &str, params: &BTreeMap<String, String>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('%') else {
            rendered.push_str(&rest[start..]);
            return rendered;
        };

        let name = &after[..end];
        if name.is_empty() {
            rendered.push('%');
        } else if let Some(value) = params.get(name) {
            rendered.push_str(value);
        } else {
            rendered.push('%');
            rendered.push_str(name);
            rendered.push('%');
        }
        rest = &after[end + 1..];
    }

    rendered.push_str(rest);
    rendered
}

/// Names of the placeholders used by `template`, in order of appearance
pub fn template_placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('%') else {
            break;
        };
        if end > 0 {
            names.push(&after[..end]);
        }
        rest = &after[end + 1..];
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_template_substitution() {
        let rendered = apply_error_message_template(
            "The '%param%' parameter of task '%task%' expects a value",
            &params(&[("param", "--param"), ("task", "compile")]),
        );
        assert_eq!(
            rendered,
            "The '--param' parameter of task 'compile' expects a value"
        );
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let rendered =
            apply_error_message_template("%a% and %b%", &params(&[("a", "%b%"), ("b", "x")]));
        assert_eq!(rendered, "%b% and x");
    }

    #[test]
    fn test_double_percent_is_literal() {
        let rendered = apply_error_message_template("100%% of %name%", &params(&[("name", "it")]));
        assert_eq!(rendered, "100% of it");
    }

    #[test]
    fn test_every_template_renders_without_leftovers() {
        for kind in ErrorKind::ALL {
            let names = template_placeholders(kind.template());
            let pairs: Vec<(&str, &str)> = names.iter().map(|n| (*n, "value")).collect();
            let error = HardhatError::new(kind, &pairs);

            assert!(
                !error.message().contains('%'),
                "leftover placeholder in {:?}: {}",
                kind,
                error.message()
            );
            assert!(!error.message().contains("%s"));
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "MissingTaskArgument is missing one of")]
    fn test_missing_template_value_is_caught() {
        HardhatError::new(ErrorKind::MissingTaskArgument, &[("param", "--param")]);
    }

    #[test]
    fn test_numbers_are_unique_and_categorized() {
        let mut numbers: Vec<u16> = ErrorKind::ALL.iter().map(|k| k.number()).collect();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), ErrorKind::ALL.len());

        assert_eq!(ErrorKind::InvalidConfig.category(), ErrorCategory::General);
        assert_eq!(
            ErrorKind::ParamAlreadyDefined.category(),
            ErrorCategory::TaskDefinitions
        );
        assert_eq!(
            ErrorKind::MissingTaskArgument.category(),
            ErrorCategory::Arguments
        );
    }

    #[test]
    fn test_display_is_prefixed_with_code() {
        let error = HardhatError::new(
            ErrorKind::MissingTaskArgument,
            &[("param", "--param"), ("task", "compile")],
        );
        assert_eq!(
            error.to_string(),
            "HH306: The '--param' parameter of task 'compile' expects a value, but none was passed."
        );
    }

    #[test]
    fn test_parent_is_exposed_as_source() {
        let parent = HardhatError::new(
            ErrorKind::InvalidValueForType,
            &[("value", "x"), ("name", "n"), ("type", "int")],
        );
        let error = HardhatError::new(
            ErrorKind::InvalidEnvVarValue,
            &[("varName", "HARDHAT_MAX_MEMORY"), ("value", "x")],
        )
        .with_parent(parent);

        let source = std::error::Error::source(&error).unwrap();
        assert!(source.to_string().starts_with("HH301"));
        assert!(error.parent().is_some());
    }
}
