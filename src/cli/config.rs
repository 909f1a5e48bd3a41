//! Project configuration discovery and loading
//!
//! The configuration is resolved in this order:
//! 1. The file given with the global `--config` argument
//! 2. The first `hardhat.toml` found walking up from the start directory
//! 3. Built-in defaults rooted at the start directory

use crate::env::{self, DEFAULT_NETWORK};
use crate::errors::{ErrorKind, HardhatError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Network used when `--network` is not given
    pub default_network: String,
    pub paths: ProjectPaths,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_network: DEFAULT_NETWORK.to_string(),
            paths: ProjectPaths::default(),
        }
    }
}

/// Project directories. Empty entries are filled in by [`ProjectConfig::resolve_paths`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub cache: PathBuf,
    pub artifacts: PathBuf,
}

impl ProjectConfig {
    /// Defaults with every path rooted at `root`
    pub fn with_root(root: &Path) -> Self {
        let mut config = Self::default();
        config.resolve_paths(root);
        config
    }

    /// Load from a TOML file, resolving relative paths against its directory
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, HardhatError> {
        let path = path.as_ref();
        let invalid_config = |errors: String| {
            let path = path.display().to_string();
            HardhatError::new(
                ErrorKind::InvalidConfig,
                &[("path", path.as_str()), ("errors", errors.as_str())],
            )
        };

        let content = fs::read_to_string(path)
            .map_err(|err| invalid_config(err.to_string()).with_parent(err))?;
        let mut config: ProjectConfig = toml::from_str(&content)
            .map_err(|err| invalid_config(err.message().to_string()).with_parent(err))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base_dir);
        Ok(config)
    }

    /// Save to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Make `root` absolute against `base_dir`, then `cache` and `artifacts`
    /// against `root`, filling in the default directory names
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        let root = std::mem::take(&mut self.paths.root);
        self.paths.root = if root.as_os_str().is_empty() {
            base_dir.to_path_buf()
        } else {
            base_dir.join(root)
        };

        let root = self.paths.root.clone();
        self.paths.cache = match std::mem::take(&mut self.paths.cache) {
            cache if cache.as_os_str().is_empty() => env::cache_dir_path(&root),
            cache => root.join(cache),
        };
        self.paths.artifacts = match std::mem::take(&mut self.paths.artifacts) {
            artifacts if artifacts.as_os_str().is_empty() => env::artifacts_dir_path(&root),
            artifacts => root.join(artifacts),
        };
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load the project configuration using the resolution order above
    pub fn discover_config(
        explicit_path: Option<&Path>,
        start_dir: &Path,
    ) -> Result<ProjectConfig, HardhatError> {
        if let Some(path) = explicit_path {
            let path = start_dir.join(path);
            info!("Loading configuration from: {:?}", path);
            return ProjectConfig::from_toml_file(path);
        }

        if let Some(config_path) = Self::find_config_file(start_dir) {
            info!("Loading configuration from: {:?}", config_path);
            return ProjectConfig::from_toml_file(config_path);
        }

        info!("No configuration file found, using defaults");
        Ok(ProjectConfig::with_root(start_dir))
    }

    /// Find the closest `hardhat.toml` in `start_dir` or one of its ancestors
    pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        for dir in start_dir.ancestors() {
            let candidate = env::config_file_path(dir);
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found walking up from {:?}", start_dir);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::with_root(Path::new("/project"));
        assert_eq!(config.default_network, "hardhat");
        assert_eq!(config.paths.root, PathBuf::from("/project"));
        assert_eq!(config.paths.cache, PathBuf::from("/project/cache"));
        assert_eq!(config.paths.artifacts, PathBuf::from("/project/artifacts"));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("hardhat.toml");
        fs::write(
            &config_path,
            "default_network = \"localhost\"\n\n[paths]\ncache = \"build/cache\"\n",
        )
        .unwrap();

        let config = ProjectConfig::from_toml_file(&config_path).unwrap();
        assert_eq!(config.default_network, "localhost");
        assert_eq!(config.paths.root, temp_dir.path());
        assert_eq!(config.paths.cache, temp_dir.path().join("build/cache"));
        assert_eq!(config.paths.artifacts, temp_dir.path().join("artifacts"));
    }

    #[test]
    fn test_malformed_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("hardhat.toml");
        fs::write(&config_path, "default_network = [").unwrap();

        let err = ProjectConfig::from_toml_file(&config_path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert!(err.parent().is_some());
    }

    #[test]
    fn test_discovery_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("contracts").join("tokens");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("hardhat.toml"), "").unwrap();

        let found = ConfigDiscovery::find_config_file(&nested).unwrap();
        assert_eq!(found, temp_dir.path().join("hardhat.toml"));

        let config = ConfigDiscovery::discover_config(None, &nested).unwrap();
        assert_eq!(config.paths.root, temp_dir.path());
    }

    #[test]
    fn test_toml_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("hardhat.toml");

        let config = ProjectConfig::with_root(temp_dir.path());
        config.to_toml_file(&config_path).unwrap();

        let loaded = ProjectConfig::from_toml_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }
}
