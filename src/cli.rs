use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;

use crate::project::Project;
use crate::router_builder;
use crate::scaffold;

/// Templates are compiled into the binary so generation works anywhere
/// without an asset directory next to the executable.
pub const ROUTER_TEMPLATE: &str = include_str!("../templates/router.rs.tmpl");
pub const CONTROLLER_TEMPLATE: &str = include_str!("../templates/controller.rs.tmpl");
pub const MIDDLEWARE_TEMPLATE: &str = include_str!("../templates/middleware.rs.tmpl");
pub const MODEL_RECORD_TEMPLATE: &str = include_str!("../templates/model_record.rs.tmpl");
pub const MODEL_LIST_TEMPLATE: &str = include_str!("../templates/model_list.rs.tmpl");

/// webscaffold - accelerate Rust web application development with code
/// generation and project scaffolding
#[derive(Parser, Debug)]
#[command(name = "webscaffold")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project with the basic structure
    Init {
        /// Project name, e.g. `myapp` or `example.com/myapp`
        name: String,
    },

    /// Create a new controller with optional initial actions
    #[command(name = "addc")]
    AddController {
        /// Controller route, e.g. `user` or `admin/user`
        route: String,

        /// Initial actions, e.g. `list` or `search:get`
        actions: Vec<String>,

        /// API root path (e.g. 'api/v1')
        #[arg(short = 'a', long = "api-root")]
        api_root: Option<String>,
    },

    /// Add actions to an existing controller
    #[command(name = "adda")]
    AddAction {
        /// Controller route, e.g. `user` or `admin/user`
        route: String,

        /// Actions to append, e.g. `list` or `search:get`
        #[arg(required = true)]
        actions: Vec<String>,

        /// API root path (e.g. 'api/v1')
        #[arg(short = 'a', long = "api-root")]
        api_root: Option<String>,
    },

    /// Create new middleware components
    #[command(name = "addm")]
    AddMiddleware {
        /// Middleware names, e.g. `auth logging`
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Generate model files from SQL schema definitions
    #[command(name = "mkmd")]
    MakeModel {
        /// Path to SQL file containing table definitions
        #[arg(short = 's', long = "sql-path")]
        sql_path: PathBuf,
    },

    /// Generate the API router from existing controllers
    #[command(name = "mkrt")]
    MakeRouter {
        /// API root path (e.g. 'api/v1')
        #[arg(short = 'a', long = "api-root")]
        api_root: Option<String>,
    },
}

/// Run the selected subcommand.
pub fn run(cli: Cli) -> Result<()> {
    debug!("parsed arguments: {:?}", cli);

    match cli.command {
        Command::Init { name } => {
            let target = scaffold::init::init_project(&name)?;
            info!("initialized project at {}", target.display());
            Ok(())
        }
        Command::AddController {
            route,
            actions,
            api_root,
        } => {
            let project = Project::discover()?;
            scaffold::controller::add_controller(
                &project,
                CONTROLLER_TEMPLATE,
                api_root.as_deref(),
                &route,
                &actions,
            )
        }
        Command::AddAction {
            route,
            actions,
            api_root,
        } => {
            let project = Project::discover()?;
            scaffold::controller::add_action(&project, api_root.as_deref(), &route, &actions)
        }
        Command::AddMiddleware { names } => {
            let project = Project::discover()?;
            scaffold::middleware::add_middleware(&project, MIDDLEWARE_TEMPLATE, &names)
        }
        Command::MakeModel { sql_path } => {
            let project = Project::discover()?;
            scaffold::model::make_model(
                &project,
                &sql_path,
                MODEL_RECORD_TEMPLATE,
                MODEL_LIST_TEMPLATE,
            )
        }
        Command::MakeRouter { api_root } => {
            let project = Project::discover()?;
            let root = scaffold::resolve_api_root(&project, api_root.as_deref());
            info!("synthesizing router for {}", root.display());
            router_builder::make_router(&project, ROUTER_TEMPLATE, &root)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_make_router() {
        let cli = Cli::try_parse_from(["webscaffold", "mkrt", "--api-root", "api/v1"]).unwrap();

        match cli.command {
            Command::MakeRouter { api_root } => {
                assert_eq!(api_root.as_deref(), Some("api/v1"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_add_controller_with_actions() {
        let cli =
            Cli::try_parse_from(["webscaffold", "addc", "user", "list", "search:get"]).unwrap();

        match cli.command {
            Command::AddController { route, actions, .. } => {
                assert_eq!(route, "user");
                assert_eq!(actions, vec!["list", "search:get"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_requires_actions_for_add_action() {
        assert!(Cli::try_parse_from(["webscaffold", "adda", "user"]).is_err());
    }

    #[test]
    fn test_cli_verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["webscaffold", "mkrt", "-v"]).unwrap();

        assert!(cli.verbose);
    }
}
