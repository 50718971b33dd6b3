//! Project scaffolding: bootstrap, controller, middleware and model
//! generation.
//!
//! Everything here writes files into an existing (or freshly created)
//! project tree through the template renderer; the route-synthesis engine
//! then picks the generated controllers up on the next `mkrt` run.

pub mod controller;
pub mod init;
pub mod middleware;
pub mod model;

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::project::Project;

/// Splits a controller route into the controller file path (relative to
/// the API root) and the controller's leaf name.
///
/// `user` maps to `controller/user.rs`; `admin/user` maps to
/// `admin/controller/user.rs`. Routes must not start or end with `/`.
pub fn file_by_route(route: &str) -> Result<(String, String)> {
    if route.starts_with('/') || route.ends_with('/') {
        bail!("route must not start or end with '/'");
    }

    match route.rsplit_once('/') {
        None => Ok((format!("controller/{}.rs", route), route.to_string())),
        Some((dir, name)) => Ok((
            format!("{}/controller/{}.rs", dir, name),
            name.to_string(),
        )),
    }
}

/// Controller names become type names, so they must be single words.
pub fn validate_controller_name(name: &str) -> Result<()> {
    if name.contains(' ') {
        bail!("controller name can not contain spaces");
    }
    if name.contains('_') {
        bail!("controller name can not contain _");
    }
    if name.contains('-') {
        bail!("controller name can not contain -");
    }
    Ok(())
}

/// Upper-cases the first character, leaving the rest unchanged.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `snake_or_plain` → `SnakeOrPlain`.
pub fn to_camel_case(s: &str) -> String {
    s.split('_').map(capitalize_first).collect()
}

/// Picks the API root: an explicit non-empty flag wins, otherwise the
/// project's configured default.
pub fn resolve_api_root(project: &Project, api_root: Option<&str>) -> PathBuf {
    match api_root {
        Some(root) if !root.is_empty() => project.resolve(root),
        _ => project.api_root(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_by_route_without_directory() {
        let (path, name) = file_by_route("user").unwrap();

        assert_eq!(path, "controller/user.rs");
        assert_eq!(name, "user");
    }

    #[test]
    fn test_file_by_route_with_directory() {
        let (path, name) = file_by_route("admin/shop/user").unwrap();

        assert_eq!(path, "admin/shop/controller/user.rs");
        assert_eq!(name, "user");
    }

    #[test]
    fn test_file_by_route_rejects_leading_and_trailing_slash() {
        assert!(file_by_route("/user").is_err());
        assert!(file_by_route("user/").is_err());
    }

    #[test]
    fn test_validate_controller_name() {
        assert!(validate_controller_name("user").is_ok());
        assert!(validate_controller_name("user name").is_err());
        assert!(validate_controller_name("user_name").is_err());
        assert!(validate_controller_name("user-name").is_err());
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("user"), "User");
        assert_eq!(capitalize_first("User"), "User");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("user_order"), "UserOrder");
        assert_eq!(to_camel_case("user"), "User");
    }
}
