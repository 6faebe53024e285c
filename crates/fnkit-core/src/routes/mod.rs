//! Functions and assets discovered in a project, with their routes and access levels

pub mod classifier;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

pub use classifier::{discover, ConventionClassifier, Discovered, ResourceKind, RouteClassifier};

/// Who may call a function or fetch an asset
///
/// Variants are ordered from most to least exposed, which is also the order in
/// which every listing presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    Protected,
    Private,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Public => "public",
            AccessLevel::Protected => "protected",
            AccessLevel::Private => "private",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, AccessLevel::Public)
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function or asset with the route it is served at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    /// File name on disk
    #[serde(default)]
    pub name: String,
    /// Path of the file on disk
    #[serde(default)]
    pub path: PathBuf,
    /// URL path, always starting with `/`
    pub route_path: String,
    pub access: AccessLevel,
}

pub type FunctionInfo = RouteInfo;
pub type AssetInfo = RouteInfo;

/// Ordering shared by every listing: access level, then route path
pub fn compare_routes(a: &RouteInfo, b: &RouteInfo) -> Ordering {
    a.access
        .cmp(&b.access)
        .then_with(|| a.route_path.cmp(&b.route_path))
}

/// Return `routes` in listing order
pub fn sort_by_access(routes: &[RouteInfo]) -> Vec<&RouteInfo> {
    let mut sorted: Vec<&RouteInfo> = routes.iter().collect();
    sorted.sort_by(|a, b| compare_routes(a, b));
    sorted
}
