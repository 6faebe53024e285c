//! Deriving route paths and access levels from file names
//!
//! `functions/api/hello.protected.js` is served at `/api/hello` as protected;
//! `assets/secret.private.html` is served at `/secret.html` as private. Anything
//! without an access marker is public.

use super::{AccessLevel, RouteInfo};
use crate::fs::{walk_dir_content, FileInfo};
use std::io;
use std::path::{Component, Path};

const ACCESS_MARKERS: &[(&str, AccessLevel)] = &[
    (".protected", AccessLevel::Protected),
    (".private", AccessLevel::Private),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Function,
    Asset,
}

/// Turns a discovered file into a typed route
pub trait RouteClassifier {
    /// `root` is the `functions/` or `assets/` directory `file` was found under
    fn classify(&self, root: &Path, file: &FileInfo, kind: ResourceKind) -> RouteInfo;
}

/// Classifies by file-name convention
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionClassifier;

impl RouteClassifier for ConventionClassifier {
    fn classify(&self, root: &Path, file: &FileInfo, kind: ResourceKind) -> RouteInfo {
        let relative = file.path.strip_prefix(root).unwrap_or(&file.path);
        let mut segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let last = segments.pop().unwrap_or_else(|| file.name.clone());
        let last = match kind {
            ResourceKind::Function => last.strip_suffix(".js").unwrap_or(&last).to_string(),
            ResourceKind::Asset => last,
        };
        let (last, access) = split_access(&last);
        segments.push(last);

        RouteInfo {
            name: file.name.clone(),
            path: file.path.clone(),
            route_path: format!("/{}", segments.join("/")),
            access,
        }
    }
}

/// Remove an access marker from a file name, either right before the extension or at the end
fn split_access(name: &str) -> (String, AccessLevel) {
    if let Some(dot) = name.rfind('.') {
        let (stem, ext) = name.split_at(dot);
        for (marker, level) in ACCESS_MARKERS {
            if let Some(bare) = stem.strip_suffix(marker) {
                return (format!("{}{}", bare, ext), *level);
            }
        }
    }
    for (marker, level) in ACCESS_MARKERS {
        if let Some(bare) = name.strip_suffix(marker) {
            return (bare.to_string(), *level);
        }
    }
    (name.to_string(), AccessLevel::Public)
}

/// Functions and assets found in one project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    pub functions: Vec<RouteInfo>,
    pub assets: Vec<RouteInfo>,
}

/// Scan `base_dir/functions` for `.js` files and `base_dir/assets` for anything.
/// Missing directories yield empty lists. Results are in file-system order.
pub fn discover<C: RouteClassifier + ?Sized>(base_dir: &Path, classifier: &C) -> io::Result<Discovered> {
    let scan = |dir: &str, ext: &str, kind: ResourceKind| -> io::Result<Vec<RouteInfo>> {
        let root = base_dir.join(dir);
        if !root.is_dir() {
            return Ok(Vec::new());
        }
        Ok(walk_dir_content(&root, ext)?
            .iter()
            .map(|file| classifier.classify(&root, file, kind))
            .collect())
    };

    let discovered = Discovered {
        functions: scan("functions", ".js", ResourceKind::Function)?,
        assets: scan("assets", "", ResourceKind::Asset)?,
    };
    tracing::debug!(
        functions = discovered.functions.len(),
        assets = discovered.assets.len(),
        dir = %base_dir.display(),
        "discovered routes"
    );
    Ok(discovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn classify(root: &str, relative: &str, kind: ResourceKind) -> RouteInfo {
        let path = PathBuf::from(root).join(relative);
        let file = FileInfo {
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            path,
        };
        ConventionClassifier.classify(Path::new(root), &file, kind)
    }

    #[test]
    fn test_function_routes_drop_js_extension() {
        let info = classify("/p/functions", "hello.js", ResourceKind::Function);
        assert_eq!(info.route_path, "/hello");
        assert_eq!(info.access, AccessLevel::Public);
        assert_eq!(info.name, "hello.js");

        let nested = classify("/p/functions", "api/v1/users.js", ResourceKind::Function);
        assert_eq!(nested.route_path, "/api/v1/users");
    }

    #[test]
    fn test_function_access_markers() {
        let protected = classify("/p/functions", "admin.protected.js", ResourceKind::Function);
        assert_eq!(protected.route_path, "/admin");
        assert_eq!(protected.access, AccessLevel::Protected);

        let private = classify("/p/functions", "lib/util.private.js", ResourceKind::Function);
        assert_eq!(private.route_path, "/lib/util");
        assert_eq!(private.access, AccessLevel::Private);
    }

    #[test]
    fn test_asset_routes_keep_extension() {
        let public = classify("/p/assets", "css/style.css", ResourceKind::Asset);
        assert_eq!(public.route_path, "/css/style.css");
        assert_eq!(public.access, AccessLevel::Public);

        let private = classify("/p/assets", "secret.private.html", ResourceKind::Asset);
        assert_eq!(private.route_path, "/secret.html");
        assert_eq!(private.access, AccessLevel::Private);

        let bare = classify("/p/assets", "notes.protected", ResourceKind::Asset);
        assert_eq!(bare.route_path, "/notes");
        assert_eq!(bare.access, AccessLevel::Protected);
    }

    #[test]
    fn test_discover_project() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        std::fs::create_dir_all(base.join("functions/api")).unwrap();
        std::fs::create_dir_all(base.join("assets")).unwrap();
        std::fs::write(base.join("functions/hello.js"), "").unwrap();
        std::fs::write(base.join("functions/api/token.protected.js"), "").unwrap();
        std::fs::write(base.join("functions/README.md"), "").unwrap();
        std::fs::write(base.join("assets/index.html"), "").unwrap();

        let mut found = discover(base, &ConventionClassifier).unwrap();
        found.functions.sort_by(|a, b| a.route_path.cmp(&b.route_path));

        let routes: Vec<_> = found
            .functions
            .iter()
            .map(|f| (f.route_path.as_str(), f.access))
            .collect();
        assert_eq!(
            routes,
            vec![
                ("/api/token", AccessLevel::Protected),
                ("/hello", AccessLevel::Public)
            ]
        );
        assert_eq!(found.assets.len(), 1);
        assert_eq!(found.assets[0].route_path, "/index.html");
        assert_eq!(found.assets[0].path, base.join("assets/index.html"));
    }

    #[test]
    fn test_discover_without_directories_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover(dir.path(), &ConventionClassifier).unwrap();
        assert_eq!(found, Discovered::default());
    }
}
