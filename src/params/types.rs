//! Catalog of argument types.
//!
//! Every type can validate an already-typed [`Value`]. Only command line types
//! ([`CliArgumentType`]) can also parse a raw string token, which is what
//! parameters of tasks invoked from a command line require.

use crate::errors::{ErrorKind, HardhatError};
use regex::Regex;
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use std::sync::LazyLock;

static DECIMAL_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:[eE]\d+)?$").expect("valid int pattern"));

static DECIMAL_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d*)?|\.\d+)(?:[eE]\d+)?$").expect("valid float pattern")
});

static HEXADECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]+$").expect("valid hex pattern"));

// Largest integer a float holds without losing precision
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Types that can be supplied from a literal command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CliArgumentType {
    String,
    Boolean,
    Int,
    Float,
    InputFile,
}

/// Any argument type known to the framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentType {
    Cli(CliArgumentType),
    /// Arbitrary JSON, only for programmatic invocation or defaults
    Json,
    /// No validation at all
    Any,
}

pub const STRING: ArgumentType = ArgumentType::Cli(CliArgumentType::String);
pub const BOOLEAN: ArgumentType = ArgumentType::Cli(CliArgumentType::Boolean);
pub const INT: ArgumentType = ArgumentType::Cli(CliArgumentType::Int);
pub const FLOAT: ArgumentType = ArgumentType::Cli(CliArgumentType::Float);
pub const INPUT_FILE: ArgumentType = ArgumentType::Cli(CliArgumentType::InputFile);
pub const JSON: ArgumentType = ArgumentType::Json;
pub const ANY: ArgumentType = ArgumentType::Any;

impl ArgumentType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cli(cli) => cli.name(),
            Self::Json => "json",
            Self::Any => "any",
        }
    }

    /// The command line capable view of this type, if any
    pub fn as_cli(&self) -> Option<CliArgumentType> {
        match self {
            Self::Cli(cli) => Some(*cli),
            Self::Json | Self::Any => None,
        }
    }

    pub fn is_cli(&self) -> bool {
        self.as_cli().is_some()
    }

    /// Check that `value` has the runtime shape this type expects
    pub fn validate(&self, arg_name: &str, value: &Value) -> Result<(), HardhatError> {
        match self {
            Self::Cli(cli) => cli.validate(arg_name, value),
            Self::Json | Self::Any => Ok(()),
        }
    }
}

impl From<CliArgumentType> for ArgumentType {
    fn from(cli: CliArgumentType) -> Self {
        Self::Cli(cli)
    }
}

impl CliArgumentType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Float => "float",
            Self::InputFile => "inputFile",
        }
    }

    /// Convert a raw command line token into a typed value
    pub fn parse(&self, arg_name: &str, raw: &str) -> Result<Value, HardhatError> {
        match self {
            Self::String => Ok(Value::String(raw.to_string())),
            Self::Boolean => match raw.to_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(self.invalid_value(arg_name, raw)),
            },
            Self::Int => parse_int(raw)
                .ok_or_else(|| self.invalid_value(arg_name, raw)),
            Self::Float => parse_float(raw)
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| self.invalid_value(arg_name, raw)),
            Self::InputFile => {
                check_input_file(arg_name, raw)?;
                Ok(Value::String(raw.to_string()))
            }
        }
    }

    /// Like [`Self::parse`], but a relative `inputFile` path is joined onto
    /// `base_dir` and the joined path becomes the value.
    pub fn parse_relative_to(
        &self,
        arg_name: &str,
        raw: &str,
        base_dir: &Path,
    ) -> Result<Value, HardhatError> {
        match self {
            Self::InputFile => {
                let path = base_dir.join(raw);
                let path = path.to_string_lossy();
                check_input_file(arg_name, &path)?;
                Ok(Value::String(path.into_owned()))
            }
            _ => self.parse(arg_name, raw),
        }
    }

    pub fn validate(&self, arg_name: &str, value: &Value) -> Result<(), HardhatError> {
        let valid = match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Int => is_integer(value),
            // serde_json numbers are never NaN
            Self::Float => value.is_number(),
            Self::InputFile => match value.as_str() {
                Some(path) => return check_input_file(arg_name, path),
                None => false,
            },
        };

        if valid {
            Ok(())
        } else {
            Err(self.invalid_value(arg_name, &display_value(value)))
        }
    }

    fn invalid_value(&self, arg_name: &str, value: &str) -> HardhatError {
        HardhatError::new(
            ErrorKind::InvalidValueForType,
            &[("value", value), ("name", arg_name), ("type", self.name())],
        )
    }
}

// Integers outside the u64 range become floats, like any other large number
fn parse_int(raw: &str) -> Option<Value> {
    if HEXADECIMAL.is_match(raw) {
        let digits = &raw[2..];
        return Some(match u64::from_str_radix(digits, 16) {
            Ok(value) => Value::from(value),
            Err(_) => Value::from(hex_to_f64(digits)),
        });
    }
    if !DECIMAL_INT.is_match(raw) {
        return None;
    }
    if let Ok(value) = raw.parse::<u64>() {
        return Some(Value::from(value));
    }

    // Exponent notation such as 1e3, or more digits than u64 holds
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value <= MAX_SAFE_INTEGER {
        Some(Value::from(value as i64))
    } else {
        serde_json::Number::from_f64(value).map(Value::Number)
    }
}

fn parse_float(raw: &str) -> Option<f64> {
    if HEXADECIMAL.is_match(raw) {
        return Some(hex_to_f64(&raw[2..]));
    }
    if !DECIMAL_FLOAT.is_match(raw) {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn hex_to_f64(digits: &str) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0.0, |acc, digit| acc * 16.0 + f64::from(digit))
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(number) => {
            number.is_i64()
                || number.is_u64()
                || number.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

fn check_input_file(arg_name: &str, path: &str) -> Result<(), HardhatError> {
    let readable = std::fs::metadata(path).is_ok_and(|meta| meta.is_file())
        && File::open(path).is_ok();

    if readable {
        Ok(())
    } else {
        Err(HardhatError::new(
            ErrorKind::InvalidInputFile,
            &[("name", arg_name), ("value", path)],
        ))
    }
}

/// Render a value the way it appears in error messages
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
