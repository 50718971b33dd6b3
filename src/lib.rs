//! webscaffold - project scaffolding and route synthesis for Rust web
//! applications.
//!
//! The crate generates source files (controllers, middleware, models, a
//! router) from templates and keeps the routing table synchronized with
//! controller code by introspecting the project's source. The heart of it
//! is the route-synthesis engine behind `webscaffold mkrt`.
//!
//! # Architecture
//!
//! The engine is a strict left-to-right pipeline:
//!
//! 1. [`project`] - discovers the project root and module name
//! 2. [`scanner`] - finds controller directories and their source files
//! 3. [`parser`] - parses source files and extracts controller declarations
//! 4. [`import_resolver`] - maps file locations to import paths and aliases
//! 5. [`annotations`] - reads routing directives out of doc comments
//! 6. [`router_builder`] - assembles the registration and method tables
//! 7. [`renderer`] - renders the router template and replaces the output
//!    file atomically
//!
//! Each run rebuilds the whole table from scratch; nothing is cached
//! between invocations.
//!
//! # Example
//!
//! ```no_run
//! use webscaffold::project::Project;
//! use webscaffold::router_builder::RouterBuilder;
//!
//! let project = Project::discover().unwrap();
//! let root = project.api_root();
//! let data = RouterBuilder::new(&project).synthesize(&root).unwrap();
//! println!("{}", data.register_controllers);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module, which also hosts the
//! embedded templates handed to the scaffolding commands.

pub mod annotations;
pub mod cli;
pub mod import_resolver;
pub mod parser;
pub mod project;
pub mod renderer;
pub mod router_builder;
pub mod scaffold;
pub mod scanner;
