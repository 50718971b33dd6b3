//! Middleware file generation.

use anyhow::Result;
use log::info;
use serde::Serialize;

use super::capitalize_first;
use crate::project::Project;
use crate::renderer;

#[derive(Serialize)]
struct MiddlewareTemplateData {
    middleware_name: String,
}

/// Generates one middleware file per name under `lib/middleware/`.
///
/// The file keeps the given (lower-case) name; the type inside is the
/// capitalized form referenced by `@middleware` directives.
pub fn add_middleware(
    project: &Project,
    middleware_template: &str,
    names: &[String],
) -> Result<()> {
    for name in names {
        let middleware_name = capitalize_first(name);
        let path = project.resolve(format!("lib/middleware/{}.rs", name));

        renderer::create_file(
            middleware_template,
            &MiddlewareTemplateData { middleware_name },
            &path,
        )?;
        info!("middleware written to {}", path.display());
    }
    Ok(())
}
