//! Method annotation extraction.
//!
//! Controller methods declare their routing metadata in documentation
//! comments. Two directives are recognized, each by a fixed prefix:
//!
//! ```text
//! /// @http_method get
//! /// @middleware auth logging
//! pub fn info(&self) { ... }
//! ```
//!
//! Every doc line is classified exactly once into a [`Directive`]; when the
//! same directive kind appears on several lines, the last line wins.

use log::debug;
use std::collections::BTreeMap;
use syn::{Attribute, Expr, ImplItem, Item, Lit, Meta, Type};

use crate::parser::ParsedFile;

/// Directive prefix selecting the HTTP verb of a method.
pub const HTTP_METHOD_DIRECTIVE: &str = "@http_method";

/// Directive prefix naming the middleware chain of a method.
pub const MIDDLEWARE_DIRECTIVE: &str = "@middleware";

/// Verb recorded for methods without an HTTP-method directive.
pub const DEFAULT_HTTP_METHOD: &str = "POST";

/// One classified documentation-comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `@http_method <verb>`: verb stored upper-cased, otherwise verbatim.
    HttpMethod(String),
    /// `@middleware <name> [<name> ...]`: whitespace-split, order kept.
    Middleware(Vec<String>),
    /// Anything else, including directives with an empty remainder.
    Unrecognized,
}

/// Classifies a single doc-comment line.
pub fn classify_line(line: &str) -> Directive {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix(HTTP_METHOD_DIRECTIVE) {
        let verb = rest.trim();
        if !verb.is_empty() {
            return Directive::HttpMethod(verb.to_uppercase());
        }
    } else if let Some(rest) = line.strip_prefix(MIDDLEWARE_DIRECTIVE) {
        let chain: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
        if !chain.is_empty() {
            return Directive::Middleware(chain);
        }
    }

    Directive::Unrecognized
}

/// Routing metadata accumulated per fully-qualified method identity
/// (`importPath.TypeName.method`).
///
/// Ordered maps keep the rendered tables stable between runs.
#[derive(Debug, Default)]
pub struct AnnotationRecord {
    /// Method key → HTTP verb.
    pub http_methods: BTreeMap<String, String>,
    /// Method key → ordered middleware chain. Absent when the method
    /// carries no middleware directive.
    pub middlewares: BTreeMap<String, Vec<String>>,
}

/// Records the annotations of every method of `type_name` defined anywhere
/// in `file`.
///
/// A method is a function with a `self` receiver inside an inherent impl
/// whose target resolves to `type_name` (a reference target resolves to
/// the same bare name). `key_prefix` is the import-path-qualified type
/// name the method name is appended to.
pub fn extract_annotations(
    file: &ParsedFile,
    type_name: &str,
    key_prefix: &str,
    record: &mut AnnotationRecord,
) {
    walk_items(&file.syntax_tree.items, type_name, key_prefix, record);
}

fn walk_items(
    items: &[Item],
    type_name: &str,
    key_prefix: &str,
    record: &mut AnnotationRecord,
) {
    for item in items {
        match item {
            Item::Impl(item_impl) => {
                if item_impl.trait_.is_some() {
                    continue;
                }
                match receiver_type_name(&item_impl.self_ty) {
                    Some(name) if name == type_name => {}
                    _ => continue,
                }

                for impl_item in &item_impl.items {
                    let method = match impl_item {
                        ImplItem::Fn(method) if method.sig.receiver().is_some() => method,
                        _ => continue,
                    };

                    let key = format!("{}.{}", key_prefix, method.sig.ident);
                    debug!("method {}", key);
                    record_method(&method.attrs, key, record);
                }
            }
            // Methods may live in inline modules within the same file.
            Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content {
                    walk_items(nested, type_name, key_prefix, record);
                }
            }
            _ => {}
        }
    }
}

fn record_method(attrs: &[Attribute], key: String, record: &mut AnnotationRecord) {
    let mut verb: Option<String> = None;
    let mut chain: Option<Vec<String>> = None;

    for line in doc_lines(attrs) {
        match classify_line(&line) {
            Directive::HttpMethod(value) => verb = Some(value),
            Directive::Middleware(value) => chain = Some(value),
            Directive::Unrecognized => {}
        }
    }

    record
        .http_methods
        .insert(key.clone(), verb.unwrap_or_else(|| DEFAULT_HTTP_METHOD.to_string()));
    if let Some(chain) = chain {
        record.middlewares.insert(key, chain);
    }
}

/// The bare type name an impl target resolves to.
fn receiver_type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        Type::Reference(reference) => receiver_type_name(&reference.elem),
        _ => None,
    }
}

/// Flattens `#[doc]` attributes into trimmed lines.
fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        let Meta::NameValue(name_value) = &attr.meta else {
            continue;
        };
        let Expr::Lit(expr_lit) = &name_value.value else {
            continue;
        };
        let Lit::Str(lit_str) = &expr_lit.lit else {
            continue;
        };
        for line in lit_str.value().lines() {
            lines.push(line.trim().to_string());
        }
    }
    lines
}
