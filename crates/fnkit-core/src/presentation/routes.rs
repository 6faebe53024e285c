//! Listing the routes a local run would serve

use super::context::OutputContext;
use super::style::{boxed, branch, columns, terminal_link, warning_symbol};
use crate::routes::{sort_by_access, AssetInfo, Discovered, FunctionInfo, RouteInfo};
use colored::Colorize;

const NGROK_INSPECTOR: &str = "http://127.0.0.1:4040";

/// Everything needed to describe where functions and assets are served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteListing {
    /// Base URL without trailing slash, e.g. `http://localhost:3000`
    pub base_url: String,
    /// Serve assets under `/asset` like older runtimes did
    pub legacy_mode: bool,
    pub functions: Vec<FunctionInfo>,
    pub assets: Vec<AssetInfo>,
}

impl RouteListing {
    pub fn new(base_url: impl Into<String>, legacy_mode: bool, discovered: Discovered) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            legacy_mode,
            functions: discovered.functions,
            assets: discovered.assets,
        }
    }

    fn asset_path(&self, asset: &RouteInfo) -> String {
        let prefix = if self.legacy_mode { "/asset" } else { "" };
        format!("{}{}", prefix, asset.route_path)
    }

    fn uses_ngrok(&self) -> bool {
        self.base_url.contains("ngrok.io")
    }
}

pub(crate) fn render_plain(listing: &RouteListing) -> String {
    let section = |routes: &[RouteInfo], empty: &str, path_of: &dyn Fn(&RouteInfo) -> String| {
        if routes.is_empty() {
            return empty.to_string();
        }
        columns(sort_by_access(routes).into_iter().map(|route| {
            let path = path_of(route);
            let url = format!("{}{}", listing.base_url, path);
            vec![route.access.to_string(), path, url]
        }))
    };

    let mut sections = vec![
        "Functions".to_string(),
        section(&listing.functions, "No functions found", &|f| f.route_path.clone()),
        String::new(),
        "Assets".to_string(),
        section(&listing.assets, "No assets found", &|a| listing.asset_path(a)),
    ];
    if listing.uses_ngrok() {
        sections.push(String::new());
        sections.push(format!("ngrok request inspector available: {}", NGROK_INSPECTOR));
    }
    sections.join("\n")
}

pub(crate) fn render_pretty(listing: &RouteListing, ctx: &OutputContext) -> String {
    let entry = |route: &RouteInfo, path: String| {
        let access = if route.access.is_public() {
            String::new()
        } else {
            format!("{} ", format!("[{}]", route.access).bold())
        };
        let url = format!("{}{}", listing.base_url, path);
        format!("{}{}", access, terminal_link(&path, &url))
    };

    let tree = |routes: &[RouteInfo], empty: &str, path_of: &dyn Fn(&RouteInfo) -> String| {
        if routes.is_empty() {
            return format!(
                "  {} {}",
                warning_symbol(ctx.supports_emoji).yellow(),
                empty
            );
        }
        let sorted = sort_by_access(routes);
        let len = sorted.len();
        sorted
            .into_iter()
            .enumerate()
            .map(|(idx, route)| {
                format!(
                    "{} {}",
                    branch(idx, len, ctx.supports_emoji),
                    entry(route, path_of(route))
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut sections = vec![
        "Functions available:".green().bold().to_string(),
        tree(&listing.functions, "No functions found", &|f| f.route_path.clone()),
        String::new(),
        "Assets available:".green().bold().to_string(),
        tree(&listing.assets, "No assets found", &|a| listing.asset_path(a)),
    ];
    if listing.uses_ngrok() {
        sections.push(String::new());
        sections.push("ngrok request inspector available:".green().bold().to_string());
        sections.push(NGROK_INSPECTOR.to_string());
    }

    boxed(&sections.join("\n"), ctx.supports_emoji)
}
