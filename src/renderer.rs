//! Template rendering with atomic file replacement.
//!
//! Output is staged in a temporary file inside the destination directory
//! and renamed into place only after the full render succeeded, so the
//! destination is always either the complete old version or the complete
//! new version, never a partial write.

use anyhow::{Context, Result};
use log::debug;
use minijinja::Environment;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Renders a template string against `data`.
///
/// # Errors
///
/// Returns an error if the template fails to parse or render; nothing is
/// written in that case.
pub fn render_template(template: &str, data: &impl Serialize) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("file", template)
        .context("failed to parse template")?;
    let tmpl = env
        .get_template("file")
        .context("failed to load template")?;
    tmpl.render(data).context("failed to render template")
}

/// Renders `template` with `data` and writes the result to `path`,
/// creating parent directories as needed and atomically replacing any
/// existing file.
pub fn create_file(template: &str, data: &impl Serialize, path: &Path) -> Result<()> {
    let content = render_template(template, data)?;
    write_atomic(&content, path)
}

/// Writes `content` to `path` via a staged temporary file and rename.
pub fn write_atomic(content: &str, path: &Path) -> Result<()> {
    debug!("writing {} bytes to {}", content.len(), path.display());

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    // Staging in the destination directory keeps the rename on one
    // filesystem; the staged file is removed on drop if anything fails.
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    staged
        .write_all(content.as_bytes())
        .with_context(|| format!("failed to write temp file {}", staged.path().display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .with_context(|| format!("failed to chmod temp file {}", staged.path().display()))?;
    }

    staged
        .persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    Ok(())
}
