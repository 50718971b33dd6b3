//! Controller file generation and action appending.

use anyhow::{bail, Context, Result};
use log::info;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use super::{capitalize_first, file_by_route, resolve_api_root, validate_controller_name};
use crate::parser::CONTROLLER_SUFFIX;
use crate::project::Project;
use crate::renderer;

#[derive(Serialize)]
struct ControllerTemplateData {
    controller_struct_name: String,
}

/// An action to append: method name plus its resolved HTTP verb.
#[derive(Debug, PartialEq, Eq)]
struct ActionSpec {
    name: String,
    http_method: String,
}

/// Generates a new controller file for `route`, optionally seeding it with
/// `actions`.
///
/// Refuses to overwrite an existing controller.
pub fn add_controller(
    project: &Project,
    controller_template: &str,
    api_root: Option<&str>,
    route: &str,
    actions: &[String],
) -> Result<()> {
    if route.is_empty() {
        bail!("controller route is empty");
    }

    let root = resolve_api_root(project, api_root);
    let (relative_path, name) = file_by_route(route)?;
    validate_controller_name(&name)?;

    let controller_path = root.join(relative_path);
    if controller_path.exists() {
        bail!("controller already exists: {}", controller_path.display());
    }

    let struct_name = format!("{}{}", capitalize_first(&name), CONTROLLER_SUFFIX);
    renderer::create_file(
        controller_template,
        &ControllerTemplateData {
            controller_struct_name: struct_name.clone(),
        },
        &controller_path,
    )?;
    info!("controller written to {}", controller_path.display());

    if !actions.is_empty() {
        write_actions(&controller_path, &struct_name, actions)?;
    }
    Ok(())
}

/// Appends actions to an existing controller.
pub fn add_action(
    project: &Project,
    api_root: Option<&str>,
    route: &str,
    actions: &[String],
) -> Result<()> {
    let root = resolve_api_root(project, api_root);
    let (relative_path, name) = file_by_route(route)?;
    validate_controller_name(&name)?;

    let controller_path = root.join(relative_path);
    if !controller_path.is_file() {
        bail!("controller does not exist: {}", controller_path.display());
    }

    let struct_name = format!("{}{}", capitalize_first(&name), CONTROLLER_SUFFIX);
    write_actions(&controller_path, &struct_name, actions)
}

/// Appends one annotated impl block per action. Inherent impl blocks may
/// repeat, so appending keeps the file valid without re-parsing it.
fn write_actions(path: &Path, struct_name: &str, actions: &[String]) -> Result<()> {
    let specs = parse_actions(actions)?;

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    for spec in specs {
        let block = format!(
            "\nimpl {} {{\n    /// @http_method {}\n    pub fn {}(&self) {{\n    }}\n}}\n",
            struct_name, spec.http_method, spec.name
        );
        file.write_all(block.as_bytes())
            .with_context(|| format!("failed to append to {}", path.display()))?;
    }
    Ok(())
}

/// Parses `name` / `name:get` / `name:post` action arguments.
fn parse_actions(actions: &[String]) -> Result<Vec<ActionSpec>> {
    actions
        .iter()
        .map(|raw| {
            let (name, verb) = match raw.split_once(':') {
                None => (raw.as_str(), None),
                Some((name, verb)) => (name, Some(verb)),
            };

            let http_method = match verb.map(str::to_lowercase).as_deref() {
                None | Some("") => "POST".to_string(),
                Some("post") => "POST".to_string(),
                Some("get") => "GET".to_string(),
                Some(other) => bail!("invalid method: {}", other),
            };

            Ok(ActionSpec {
                name: name.to_string(),
                http_method,
            })
        })
        .collect()
}
