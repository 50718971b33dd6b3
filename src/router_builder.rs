//! Route table synthesis.
//!
//! One synthesis run walks the API tree, parses every controller source
//! file, resolves import paths and aliases, extracts method annotations
//! and flattens everything into [`RouterTemplateData`] for the template
//! renderer. All state lives in a [`RouterBuilder`] value owned by the
//! run; nothing is shared or cached between runs.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::annotations::{extract_annotations, AnnotationRecord};
use crate::import_resolver::{resolve_import_path, ImportAliasTable};
use crate::parser::{controller_types, AstParser};
use crate::project::Project;
use crate::renderer;
use crate::scanner::ControllerScanner;

/// File name of the generated router table.
pub const GENERATED_FILE_NAME: &str = "router.rs";

/// Flattened, string-rendered projection of a synthesis run, consumed once
/// by the template renderer and then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterTemplateData {
    /// Base name of the scanned API root directory.
    pub api_root_dir_name: String,
    /// Method key → HTTP verb table body.
    pub http_method_tags: String,
    /// Method key → middleware chain table body.
    pub middleware_tags: String,
    /// One registration statement per discovered controller.
    pub register_controllers: String,
    /// Import line for the middleware package, empty when unused.
    pub middleware_import_path: String,
    /// Import lines for every discovered controller package.
    pub controllers_import_path: String,
}

/// Accumulator for one synthesis run.
///
/// The builder is handed to each pipeline step by exclusive ownership, so
/// the run has no global mutable state to corrupt.
pub struct RouterBuilder<'a> {
    project: &'a Project,
    imports: ImportAliasTable,
    registrations: Vec<String>,
    annotations: AnnotationRecord,
}

impl<'a> RouterBuilder<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            imports: ImportAliasTable::new(),
            registrations: Vec::new(),
            annotations: AnnotationRecord::default(),
        }
    }

    /// Runs the full synthesis pass over `root` and returns the assembled
    /// template data.
    ///
    /// # Errors
    ///
    /// Returns an error as soon as any controller source file fails to
    /// read or parse; a table built from partially-parsed input would
    /// silently corrupt the generated router.
    pub fn synthesize(mut self, root: &Path) -> Result<RouterTemplateData> {
        let files = ControllerScanner::new(root.to_path_buf()).scan();
        info!("found {} controller source files", files.len());

        for file in &files {
            self.process_file(file)
                .with_context(|| format!("controller processing failed: {}", file.display()))?;
        }

        Ok(RouterTemplateData {
            api_root_dir_name: root_dir_name(root),
            http_method_tags: self.format_http_methods(),
            middleware_tags: self.format_middlewares(),
            register_controllers: self.registrations.concat(),
            middleware_import_path: self.middleware_import(),
            controllers_import_path: self.format_imports(),
        })
    }

    /// Parses one source file and folds its controllers into the run.
    fn process_file(&mut self, path: &Path) -> Result<()> {
        let parsed = AstParser::parse_file(path)?;

        let types = controller_types(&parsed);
        if types.is_empty() {
            debug!("no controllers in {}", path.display());
            return Ok(());
        }

        let import_path = resolve_import_path(self.project.name(), self.project.root(), path)?;

        for type_name in types {
            let alias = self.imports.alias_for(&import_path);
            debug!("registering {}.{}", alias, type_name);

            self.registrations.push(format!(
                "\n\tRegisterController({}.{}{{}})",
                alias, type_name
            ));

            let key_prefix = format!("{}.{}", import_path, type_name);
            extract_annotations(&parsed, &type_name, &key_prefix, &mut self.annotations);
        }

        Ok(())
    }

    fn format_imports(&self) -> String {
        self.imports
            .entries()
            .iter()
            .map(|entry| format!("\t{} \"{}\"", entry.alias, entry.import_path))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn middleware_import(&self) -> String {
        if self.annotations.middlewares.is_empty() {
            return String::new();
        }
        format!("\t\"{}/lib/middleware\"", self.project.name())
    }

    fn format_http_methods(&self) -> String {
        let mut out = String::new();
        for (key, verb) in &self.annotations.http_methods {
            out.push_str(&format!("\t\t\"{}\": \"{}\",\n", key, verb));
        }
        out
    }

    fn format_middlewares(&self) -> String {
        let mut out = String::new();
        for (key, chain) in &self.annotations.middlewares {
            if chain.is_empty() {
                continue;
            }
            let components: Vec<String> = chain
                .iter()
                .map(|name| format!("middleware.{}", name.trim()))
                .collect();
            out.push_str(&format!(
                "\t\t\"{}\": {{{}}},\n",
                key,
                components.join(", ")
            ));
        }
        out
    }
}

/// Synthesizes the route table under `root` and renders it through
/// `router_template` to `<root>/router.rs`, atomically replacing any
/// previous version. Returns the output path.
pub fn make_router(project: &Project, router_template: &str, root: &Path) -> Result<PathBuf> {
    let data = RouterBuilder::new(project)
        .synthesize(root)
        .context("template data generation failed")?;

    let output_path = root.join(GENERATED_FILE_NAME);
    renderer::create_file(router_template, &data, &output_path)?;
    info!("router written to {}", output_path.display());

    Ok(output_path)
}

fn root_dir_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Project, CONFIG_FILE_NAME};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_file(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn test_project(root: &Path) -> Project {
        write_file(root, CONFIG_FILE_NAME, r#"{ "project_name": "myapp" }"#);
        Project::discover_from(root).unwrap()
    }

    #[test]
    fn test_synthesis_over_two_controller_packages() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let project = test_project(root);

        write_file(
            root,
            "app/api/home/controller/user.rs",
            r#"
            pub struct UserController;
            impl UserController {
                /// @http_method get
                pub fn get_info(&self) {}
            }
        "#,
        );
        write_file(
            root,
            "app/api/home/order/controller/order.rs",
            r#"
            pub struct OrderController;
            impl OrderController {
                pub fn create(&self) {}
            }
        "#,
        );

        let data = RouterBuilder::new(&project)
            .synthesize(&root.join("app/api/home"))
            .unwrap();

        assert_eq!(data.api_root_dir_name, "home");
        assert_eq!(
            data.controllers_import_path,
            "\tcontroller0 \"myapp/app/api/home/controller\"\n\
             \tcontroller1 \"myapp/app/api/home/order/controller\""
        );
        assert_eq!(
            data.register_controllers,
            "\n\tRegisterController(controller0.UserController{})\
             \n\tRegisterController(controller1.OrderController{})"
        );
        assert!(data.http_method_tags.contains(
            "\t\t\"myapp/app/api/home/controller.UserController.get_info\": \"GET\",\n"
        ));
        assert!(data.http_method_tags.contains(
            "\t\t\"myapp/app/api/home/order/controller.OrderController.create\": \"POST\",\n"
        ));
        assert_eq!(data.middleware_tags, "");
        assert_eq!(data.middleware_import_path, "");
    }

    #[test]
    fn test_controllers_in_one_package_share_an_alias() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let project = test_project(root);

        write_file(
            root,
            "api/controller/user.rs",
            "pub struct UserController;",
        );
        write_file(
            root,
            "api/controller/order.rs",
            "pub struct OrderController;",
        );

        let data = RouterBuilder::new(&project)
            .synthesize(&root.join("api"))
            .unwrap();

        assert_eq!(
            data.controllers_import_path,
            "\tcontroller0 \"myapp/api/controller\""
        );
        // Discovery order is sorted by file name: order.rs before user.rs.
        assert_eq!(
            data.register_controllers,
            "\n\tRegisterController(controller0.OrderController{})\
             \n\tRegisterController(controller0.UserController{})"
        );
    }

    #[test]
    fn test_middleware_table_and_import_line() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let project = test_project(root);

        write_file(
            root,
            "api/controller/user.rs",
            r#"
            pub struct UserController;
            impl UserController {
                /// @http_method get
                /// @middleware auth logging
                pub fn get_info(&self) {}
            }
        "#,
        );

        let data = RouterBuilder::new(&project)
            .synthesize(&root.join("api"))
            .unwrap();

        assert_eq!(
            data.middleware_tags,
            "\t\t\"myapp/api/controller.UserController.get_info\": \
             {middleware.auth, middleware.logging},\n"
        );
        assert_eq!(data.middleware_import_path, "\t\"myapp/lib/middleware\"");
    }

    #[test]
    fn test_non_controller_types_are_not_registered() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let project = test_project(root);

        write_file(
            root,
            "api/controller/mixed.rs",
            r#"
            pub struct UserController;
            pub struct UserRepository;
            pub fn helper() {}
        "#,
        );

        let data = RouterBuilder::new(&project)
            .synthesize(&root.join("api"))
            .unwrap();

        assert_eq!(
            data.register_controllers,
            "\n\tRegisterController(controller0.UserController{})"
        );
    }

    #[test]
    fn test_parse_failure_aborts_the_run() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let project = test_project(root);

        write_file(root, "api/controller/good.rs", "pub struct GoodController;");
        write_file(root, "api/controller/broken.rs", "pub struct {");

        let result = RouterBuilder::new(&project).synthesize(&root.join("api"));

        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("broken.rs"));
    }

    #[test]
    fn test_empty_tree_yields_empty_tables() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let project = test_project(root);
        fs::create_dir_all(root.join("api")).unwrap();

        let data = RouterBuilder::new(&project)
            .synthesize(&root.join("api"))
            .unwrap();

        assert_eq!(data.controllers_import_path, "");
        assert_eq!(data.register_controllers, "");
        assert_eq!(data.http_method_tags, "");
        assert_eq!(data.middleware_tags, "");
        assert_eq!(data.middleware_import_path, "");
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let project = test_project(root);

        write_file(root, "api/b/controller/beta.rs", "pub struct BetaController;");
        write_file(
            root,
            "api/a/controller/alpha.rs",
            "pub struct AlphaController;",
        );

        let first = RouterBuilder::new(&project)
            .synthesize(&root.join("api"))
            .unwrap();
        let second = RouterBuilder::new(&project)
            .synthesize(&root.join("api"))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first.controllers_import_path,
            "\tcontroller0 \"myapp/api/a/controller\"\n\
             \tcontroller1 \"myapp/api/b/controller\""
        );
    }
}
