//! Model generation from SQL schema definitions.
//!
//! `CREATE TABLE` statements are pulled out of a schema file with a line
//! scanner and parsed with regular expressions; each table becomes a
//! record struct plus a list type alias under `model/<table>/`. Existing
//! files are never overwritten, so hand-edited models survive a re-run.

use anyhow::{Context, Result};
use log::{debug, info};
use regex::Regex;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::to_camel_case;
use crate::project::Project;
use crate::renderer;

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldInfo {
    name: String,
    type_name: String,
}

/// One parsed `CREATE TABLE` statement, ready for the model templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    /// Table name as written in the schema.
    pub table_name: String,
    /// CamelCase struct name derived from the table name.
    pub struct_name: String,
    /// Rendered struct definition text.
    pub struct_text: String,
}

#[derive(Serialize)]
struct ModelTemplateData {
    model_pkg: String,
    project_name: String,
    model_struct: String,
    model_struct_name: String,
}

/// Generates record and list files for every table in `sql_path`.
pub fn make_model(
    project: &Project,
    sql_path: &Path,
    record_template: &str,
    list_template: &str,
) -> Result<()> {
    let statements = extract_create_tables(sql_path).context("error extracting SQL statements")?;
    info!("found {} CREATE TABLE statements", statements.len());

    for sql in &statements {
        let table = parse_create_table(sql)?;
        generate_model_files(project, &table, record_template, list_template)?;
    }
    Ok(())
}

fn generate_model_files(
    project: &Project,
    table: &ParsedTable,
    record_template: &str,
    list_template: &str,
) -> Result<()> {
    let model_pkg = table.table_name.to_lowercase();
    let data = ModelTemplateData {
        model_pkg: model_pkg.clone(),
        project_name: project.name().to_string(),
        model_struct: table.struct_text.clone(),
        model_struct_name: table.struct_name.clone(),
    };

    for (template, file_name) in [(record_template, "record.rs"), (list_template, "list.rs")] {
        let path = project.resolve(format!("model/{}/{}", model_pkg, file_name));
        if path.exists() {
            debug!("{} exists, skipping", path.display());
            continue;
        }
        renderer::create_file(template, &data, &path)?;
        info!("model file written to {}", path.display());
    }
    Ok(())
}

/// Collects the `CREATE TABLE ... ;` statements out of a schema file.
///
/// Comment lines (`--`, `/*`) are skipped; a trailing statement without a
/// closing `);` is still captured.
pub fn extract_create_tables(path: &Path) -> Result<Vec<String>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut statements = Vec::new();
    let mut current = String::new();
    let mut capturing = false;

    for line in reader.lines() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        let line = line.trim();

        if line.starts_with("--") || line.starts_with("/*") {
            continue;
        }
        if line.starts_with("CREATE TABLE") {
            capturing = true;
            current.push_str(line);
            current.push('\n');
            continue;
        }
        if capturing && line.starts_with(')') && line.ends_with(';') {
            capturing = false;
            current.push_str(line);
            current.push('\n');
            statements.push(std::mem::take(&mut current));
            continue;
        }
        if capturing {
            current.push_str(line);
            current.push('\n');
        }
    }

    if capturing && !current.is_empty() {
        statements.push(current);
    }
    Ok(statements)
}

/// Parses a single `CREATE TABLE` statement into struct text.
pub fn parse_create_table(sql: &str) -> Result<ParsedTable> {
    let table_name = extract_table_name(sql)?;
    let struct_name = to_camel_case(&table_name);

    let mut fields = Vec::new();
    for definition in extract_field_definitions(sql)? {
        if let Some(field) = parse_field(&definition)? {
            fields.push(field);
        }
    }

    Ok(ParsedTable {
        struct_text: build_struct(&struct_name, &fields),
        table_name,
        struct_name,
    })
}

fn extract_table_name(sql: &str) -> Result<String> {
    let re = Regex::new(r"(?i)CREATE\s+TABLE\s+`?(\w+)`?").unwrap();
    re.captures(sql)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .context("table name not found")
}

fn extract_field_definitions(sql: &str) -> Result<Vec<String>> {
    let body_re = Regex::new(r"(?s)\((.*)\)").unwrap();
    let body = body_re
        .captures(sql)
        .and_then(|captures| captures.get(1))
        .context("field definitions not found")?;

    let field_re = Regex::new(r"`?(\w+)`?\s+[^,]+").unwrap();
    Ok(field_re
        .find_iter(body.as_str())
        .map(|m| m.as_str().to_string())
        .collect())
}

/// Parses one column definition. Definitions whose name does not start
/// with a lowercase letter (KEY, PRIMARY, CONSTRAINT...) yield `None`.
fn parse_field(definition: &str) -> Result<Option<FieldInfo>> {
    let re = Regex::new(r"`?(\w+)`?\s+(.+)").unwrap();
    let captures = re
        .captures(definition)
        .with_context(|| format!("invalid field definition: {}", definition))?;

    let name = captures[1].to_string();
    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Ok(None);
    }

    let type_info = captures[2].trim().to_lowercase();
    Ok(Some(FieldInfo {
        type_name: map_column_type(&type_info).to_string(),
        name,
    }))
}

/// Maps a SQL column type to the Rust type used in the generated struct.
fn map_column_type(sql_type: &str) -> &'static str {
    let base = Regex::new(r"^\w+")
        .unwrap()
        .find(sql_type)
        .map(|m| m.as_str())
        .unwrap_or("");
    let unsigned = sql_type.contains("unsigned");

    if base.starts_with("tinyint") {
        if unsigned {
            "u8"
        } else {
            "i8"
        }
    } else if base.starts_with("int") || base.starts_with("bigint") {
        if unsigned {
            "u64"
        } else {
            "i64"
        }
    } else if base.starts_with("decimal") {
        "rust_decimal::Decimal"
    } else if base.contains("datetime") || base.contains("timestamp") {
        "chrono::NaiveDateTime"
    } else if base.starts_with("varchar") || base.starts_with("text") {
        "String"
    } else if base.starts_with("boolean") {
        "bool"
    } else {
        "String"
    }
}

fn build_struct(struct_name: &str, fields: &[FieldInfo]) -> String {
    let mut out = String::new();
    out.push_str(&format!("pub struct {} {{\n", struct_name));
    for field in fields {
        out.push_str(&format!("    pub {}: {},\n", field.name, field.type_name));
    }
    out.push('}');
    out
}
