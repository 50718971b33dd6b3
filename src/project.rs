//! Project discovery and configuration.
//!
//! A project is identified by a `webscaffold.json` file at its root, or by a
//! `Cargo.toml` whose `[package].name` supplies the project name when no
//! config file exists. Discovery walks upward from a starting directory
//! until one of the two is found.

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the project configuration searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "webscaffold.json";

/// Manifest consulted when no `webscaffold.json` is present.
pub const MANIFEST_FILE_NAME: &str = "Cargo.toml";

/// Project configuration as stored in `webscaffold.json`.
///
/// Missing fields are filled with defaults after loading, so a config file
/// containing only `project_name` is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Module identity used as the prefix of every generated import path.
    #[serde(default)]
    pub project_name: String,
    /// Directory holding application code, relative to the project root.
    #[serde(default)]
    pub default_app_root: String,
    /// Directory scanned for controllers when no explicit root is given.
    #[serde(default)]
    pub default_api_root: String,
}

impl ProjectConfig {
    fn fill_defaults(&mut self) {
        if self.default_app_root.is_empty() {
            self.default_app_root = "app".to_string();
        }
        if self.default_api_root.is_empty() {
            self.default_api_root = format!("{}/api/home", self.default_app_root);
        }
    }
}

/// A discovered project: the directory where `webscaffold.json` or
/// `Cargo.toml` was found, plus the loaded configuration.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Discovers the project enclosing the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no config file or usable manifest is found in any
    /// ancestor directory, or if the project name resolves to an empty
    /// string. Nothing is generated in that case.
    pub fn discover() -> Result<Self> {
        let cwd = env::current_dir().context("cannot get working directory")?;
        Self::discover_from(&cwd)
    }

    /// Discovers the project enclosing `start`, walking up to the
    /// filesystem root.
    ///
    /// Each directory is probed first for [`CONFIG_FILE_NAME`], then for
    /// [`MANIFEST_FILE_NAME`]. A file that exists but cannot be loaded is
    /// logged and skipped so a parseable ancestor can still win.
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut tried = Vec::new();
        let mut dir = start.to_path_buf();

        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            tried.push(config_path.display().to_string());
            if config_path.is_file() {
                match load_config(&config_path) {
                    Ok(config) => return Self::from_parts(dir, config),
                    Err(e) => warn!("ignoring {}: {:#}", config_path.display(), e),
                }
            }

            let manifest_path = dir.join(MANIFEST_FILE_NAME);
            tried.push(manifest_path.display().to_string());
            if manifest_path.is_file() {
                match load_manifest_name(&manifest_path) {
                    Ok(name) => {
                        let config = ProjectConfig {
                            project_name: name,
                            ..ProjectConfig::default()
                        };
                        return Self::from_parts(dir, config);
                    }
                    Err(e) => warn!("ignoring {}: {:#}", manifest_path.display(), e),
                }
            }

            match dir.parent() {
                Some(parent) => dir = parent.to_path_buf(),
                None => break,
            }
        }

        bail!(
            "could not find {} nor a usable {}; attempted: {}",
            CONFIG_FILE_NAME,
            MANIFEST_FILE_NAME,
            tried.join("; ")
        )
    }

    fn from_parts(root: PathBuf, mut config: ProjectConfig) -> Result<Self> {
        if config.project_name.is_empty() {
            bail!(
                "project name is empty in {} or {}",
                CONFIG_FILE_NAME,
                MANIFEST_FILE_NAME
            );
        }
        config.fill_defaults();
        debug!(
            "project {} discovered at {}",
            config.project_name,
            root.display()
        );
        Ok(Self { root, config })
    }

    /// Absolute path of the directory where the project was discovered.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The declared module/package identity of the project.
    pub fn name(&self) -> &str {
        &self.config.project_name
    }

    /// Resolves a possibly-relative path against the project root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Absolute path of the application root.
    pub fn app_root(&self) -> PathBuf {
        self.resolve(&self.config.default_app_root)
    }

    /// Absolute path of the default API root scanned by `mkrt`.
    pub fn api_root(&self) -> PathBuf {
        self.resolve(&self.config.default_api_root)
    }
}

fn load_config(path: &Path) -> Result<ProjectConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))
}

/// Reads `[package].name` out of a Cargo manifest.
fn load_manifest_name(path: &Path) -> Result<String> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let manifest: toml::Value = toml::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    manifest
        .get("package")
        .and_then(|package| package.get("name"))
        .and_then(|name| name.as_str())
        .map(str::to_string)
        .with_context(|| format!("no [package].name in {}", path.display()))
}
