//! New-project bootstrap.
//!
//! Renders the embedded project skeleton into a fresh directory. Entity
//! templates (controller, middleware, model, router) are not materialized
//! here; they are rendered on demand by the other subcommands.

use anyhow::{bail, Result};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::renderer;

/// One file of the embedded project skeleton.
struct SkeletonFile {
    relative_path: &'static str,
    template: &'static str,
    /// Whether the file needs project-name substitution or is copied
    /// verbatim.
    substitute: bool,
}

const SKELETON: &[SkeletonFile] = &[
    SkeletonFile {
        relative_path: "webscaffold.json",
        template: include_str!("../../templates/init/webscaffold.json.tmpl"),
        substitute: true,
    },
    SkeletonFile {
        relative_path: "Cargo.toml",
        template: include_str!("../../templates/init/Cargo.toml.tmpl"),
        substitute: true,
    },
    SkeletonFile {
        relative_path: "src/main.rs",
        template: include_str!("../../templates/init/main.rs.tmpl"),
        substitute: true,
    },
    SkeletonFile {
        relative_path: "app/api/home/controller/index.rs",
        template: include_str!("../../templates/init/index.rs.tmpl"),
        substitute: false,
    },
    SkeletonFile {
        relative_path: "lib/middleware/logger.rs",
        template: include_str!("../../templates/init/logger.rs.tmpl"),
        substitute: false,
    },
];

#[derive(Serialize)]
struct InitTemplateData {
    project_name: String,
    package_name: String,
}

/// Bootstraps `./<name>` in the current directory.
pub fn init_project(name: &str) -> Result<PathBuf> {
    init_project_in(Path::new("."), name)
}

/// Bootstraps a new project directory `name` under `parent`.
///
/// The name may be a module path like `example.com/myapp`; the last
/// segment becomes the Cargo package name.
pub fn init_project_in(parent: &Path, name: &str) -> Result<PathBuf> {
    if name.is_empty() {
        bail!("project name is empty");
    }

    let target = parent.join(name);
    if target.exists() {
        bail!("target directory already exists: {}", target.display());
    }

    let package_name = name.rsplit('/').next().unwrap_or(name).to_string();
    let data = InitTemplateData {
        project_name: name.to_string(),
        package_name,
    };

    for file in SKELETON {
        let path = target.join(file.relative_path);
        if file.substitute {
            renderer::create_file(file.template, &data, &path)?;
        } else {
            renderer::write_atomic(file.template, &path)?;
        }
    }

    info!("project {} created at {}", name, target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Project;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_skeleton() {
        let temp_dir = TempDir::new().unwrap();

        let target = init_project_in(temp_dir.path(), "myapp").unwrap();

        assert!(target.join("webscaffold.json").is_file());
        assert!(target.join("Cargo.toml").is_file());
        assert!(target.join("src/main.rs").is_file());
        assert!(target.join("app/api/home/controller/index.rs").is_file());
        assert!(target.join("lib/middleware/logger.rs").is_file());
    }

    #[test]
    fn test_initialized_project_is_discoverable() {
        let temp_dir = TempDir::new().unwrap();

        let target = init_project_in(temp_dir.path(), "myapp").unwrap();
        let project = Project::discover_from(&target).unwrap();

        assert_eq!(project.name(), "myapp");
        assert_eq!(project.api_root(), target.join("app/api/home"));
    }

    #[test]
    fn test_init_substitutes_project_name() {
        let temp_dir = TempDir::new().unwrap();

        let target = init_project_in(temp_dir.path(), "myapp").unwrap();

        let config = fs::read_to_string(target.join("webscaffold.json")).unwrap();
        assert!(config.contains("\"project_name\": \"myapp\""));
        let manifest = fs::read_to_string(target.join("Cargo.toml")).unwrap();
        assert!(manifest.contains("name = \"myapp\""));
    }

    #[test]
    fn test_init_with_module_path_name() {
        let temp_dir = TempDir::new().unwrap();

        let target = init_project_in(temp_dir.path(), "example.com/myapp").unwrap();

        assert_eq!(target, temp_dir.path().join("example.com/myapp"));
        let manifest = fs::read_to_string(target.join("Cargo.toml")).unwrap();
        assert!(manifest.contains("name = \"myapp\""));
        let config = fs::read_to_string(target.join("webscaffold.json")).unwrap();
        assert!(config.contains("\"project_name\": \"example.com/myapp\""));
    }

    #[test]
    fn test_init_refuses_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("taken")).unwrap();

        let result = init_project_in(temp_dir.path(), "taken");

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }

    #[test]
    fn test_init_rejects_empty_name() {
        let temp_dir = TempDir::new().unwrap();

        assert!(init_project_in(temp_dir.path(), "").is_err());
    }
}
