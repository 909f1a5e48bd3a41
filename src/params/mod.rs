pub mod definitions;
pub mod env_variables;
pub mod types;

pub use definitions::*;
pub use env_variables::*;
pub use types::{ArgumentType, CliArgumentType};
