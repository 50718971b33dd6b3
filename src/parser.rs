//! Source parsing and controller declaration extraction.
//!
//! Files are parsed with `syn`, which carries documentation comments along
//! as `#[doc]` attributes, so the annotation extractor can read them later
//! without a second pass over the text. A malformed source file cannot be
//! reliably introspected, so a parse failure aborts the whole run instead
//! of producing a half-built table.

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use syn::Item;

/// Suffix that qualifies a top-level type declaration as a controller.
pub const CONTROLLER_SUFFIX: &str = "Controller";

/// Parser turning one source file into an abstract syntax tree.
pub struct AstParser;

/// A successfully parsed source file with its abstract syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parses a single source file into an AST.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid
    /// syntax. Both are fatal for a synthesis run.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("parsing {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read file: {}", path.display()))?;

        let syntax_tree = syn::parse_file(&content)
            .with_context(|| format!("failed to parse source in file: {}", path.display()))?;

        Ok(ParsedFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }
}

/// Returns the names of every top-level type declaration in `file` whose
/// name ends with [`CONTROLLER_SUFFIX`], in declaration order.
///
/// Structs, enums and type aliases all count as type declarations; items
/// nested inside modules or functions do not.
pub fn controller_types(file: &ParsedFile) -> Vec<String> {
    file.syntax_tree
        .items
        .iter()
        .filter_map(|item| match item {
            Item::Struct(item) => Some(item.ident.to_string()),
            Item::Enum(item) => Some(item.ident.to_string()),
            Item::Type(item) => Some(item.ident.to_string()),
            _ => None,
        })
        .filter(|name| name.ends_with(CONTROLLER_SUFFIX))
        .collect()
}
