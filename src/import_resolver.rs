//! Import path resolution and alias assignment.
//!
//! A controller file's import path is the slash-normalized path of its
//! directory relative to the project root, prefixed with the project name.
//! Each distinct import path gets one short generated alias so controllers
//! from different packages never collide in the generated registration
//! table.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Component, Path};

/// One imported controller package: the generated alias and the canonical
/// import path it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub alias: String,
    pub import_path: String,
}

/// Assigns deduplicated aliases to import paths.
///
/// The first time a path is seen it receives `controller<N>`, where N is
/// the count of distinct paths seen so far; later controllers sharing the
/// path reuse the same alias. The counter only grows, so aliases are
/// unique for the whole run.
#[derive(Debug, Default)]
pub struct ImportAliasTable {
    aliases: HashMap<String, String>,
    entries: Vec<ImportEntry>,
}

impl ImportAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the alias for `import_path`, assigning a fresh one on first
    /// sight.
    pub fn alias_for(&mut self, import_path: &str) -> String {
        if let Some(alias) = self.aliases.get(import_path) {
            return alias.clone();
        }

        let alias = format!("controller{}", self.entries.len());
        self.aliases
            .insert(import_path.to_string(), alias.clone());
        self.entries.push(ImportEntry {
            alias: alias.clone(),
            import_path: import_path.to_string(),
        });
        alias
    }

    /// Imported packages in first-seen order.
    pub fn entries(&self) -> &[ImportEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Computes the canonical import path for the package containing `file`.
///
/// The file's directory is made absolute and slash-normalized, then taken
/// relative to the absolute project root. A file sitting at the project
/// root imports as the project name alone. If the directory does not live
/// under the root, the full directory path is used as the relative part,
/// mirroring the fallback of the relative-path computation.
pub fn resolve_import_path(
    project_name: &str,
    project_root: &Path,
    file: &Path,
) -> Result<String> {
    let absolute_file = std::path::absolute(file)
        .with_context(|| format!("cannot resolve absolute path of {}", file.display()))?;
    let dir = absolute_file
        .parent()
        .with_context(|| format!("{} has no parent directory", absolute_file.display()))?;

    let absolute_root = std::path::absolute(project_root).with_context(|| {
        format!(
            "cannot resolve absolute path of project root {}",
            project_root.display()
        )
    })?;

    let relative = dir.strip_prefix(&absolute_root).unwrap_or(dir);
    let relative = slash_join(relative);

    if relative.is_empty() {
        return Ok(project_name.to_string());
    }
    Ok(format!(
        "{}/{}",
        project_name.trim_end_matches('/'),
        relative
    ))
}

/// Joins the normal components of a path with forward slashes, dropping
/// root and prefix components.
fn slash_join(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
