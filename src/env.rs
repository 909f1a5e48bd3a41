//! Environment constants and path utilities.
//!
//! This module centralizes the names used to find project configuration and
//! to map global parameters onto environment variables.

/// Prefix of every environment variable mapped to a global parameter
pub const ENV_VARIABLE_PREFIX: &str = "HARDHAT_";

/// Configuration file name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "hardhat.toml";

/// Network used when neither the command line nor the config names one
pub const DEFAULT_NETWORK: &str = "hardhat";

/// Name of the task run when no task is given
pub const TASK_HELP: &str = "help";

/// Name of the built-in task removing build outputs
pub const TASK_CLEAN: &str = "clean";

/// Project directory names, relative to the project root
pub mod paths {
    /// Cache directory name
    pub const CACHE_DIR_NAME: &str = "cache";

    /// Artifacts directory name
    pub const ARTIFACTS_DIR_NAME: &str = "artifacts";
}

use std::path::{Path, PathBuf};

/// Build the config file path inside a project root
pub fn config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Build the default cache directory path
pub fn cache_dir_path(root: &Path) -> PathBuf {
    root.join(paths::CACHE_DIR_NAME)
}

/// Build the default artifacts directory path
pub fn artifacts_dir_path(root: &Path) -> PathBuf {
    root.join(paths::ARTIFACTS_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_construction() {
        let root = Path::new("/work/project");

        assert_eq!(
            config_file_path(root),
            Path::new("/work/project/hardhat.toml")
        );
        assert_eq!(cache_dir_path(root), Path::new("/work/project/cache"));
        assert_eq!(
            artifacts_dir_path(root),
            Path::new("/work/project/artifacts")
        );
    }
}
