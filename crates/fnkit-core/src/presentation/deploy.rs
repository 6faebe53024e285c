//! Reporting a deployment's configuration and result

use super::style::columns;
use crate::routes::{sort_by_access, AssetInfo, FunctionInfo, RouteInfo};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project settings a deployment runs with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    pub account: String,
    pub project_name: String,
    pub environment: String,
    #[serde(default)]
    pub root_directory: PathBuf,
    /// Dependency names from the project's package manifest
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Names only; values are never printed
    #[serde(default)]
    pub env_variables: Vec<String>,
}

/// What the deployment engine reports back
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResult {
    pub domain: String,
    pub service_id: String,
    pub environment_id: String,
    pub build_id: String,
    #[serde(default)]
    pub functions: Vec<FunctionInfo>,
    #[serde(default)]
    pub assets: Vec<AssetInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSummary {
    pub config: DeployConfig,
    pub result: DeployResult,
}

fn resource_url(domain: &str, route: &RouteInfo) -> String {
    format!("https://{}{}", domain, route.route_path)
}

pub(crate) fn config_plain(config: &DeployConfig) -> String {
    let rows = vec![
        vec!["account".to_string(), config.account.clone()],
        vec!["projectName".to_string(), config.project_name.clone()],
        vec!["environment".to_string(), config.environment.clone()],
        vec![
            "rootDirectory".to_string(),
            config.root_directory.display().to_string(),
        ],
        vec!["dependencies".to_string(), config.dependencies.join(",")],
        vec![
            "environmentVariables".to_string(),
            config.env_variables.join(","),
        ],
    ];
    format!("configInfo\n{}\n", columns(rows))
}

pub(crate) fn config_pretty(config: &DeployConfig) -> String {
    let rows = [
        ("Account", config.account.clone()),
        ("Project Name", config.project_name.clone()),
        ("Environment", config.environment.clone()),
        ("Root Directory", config.root_directory.display().to_string()),
        ("Dependencies", config.dependencies.join(", ")),
        ("Env Variables", config.env_variables.join(", ")),
    ];

    let mut out = vec![
        String::new(),
        "Deploying functions & assets".to_string(),
        String::new(),
    ];
    for (label, value) in rows {
        out.push(format!("{} {}", format!("{:<16}", label).cyan().bold(), value));
    }
    out.push(String::new());
    out.join("\n")
}

pub(crate) fn result_plain(summary: &DeploymentSummary) -> String {
    let result = &summary.result;
    let resources = |routes: &[RouteInfo]| {
        columns(sort_by_access(routes).into_iter().map(|route| {
            vec![
                route.access.to_string(),
                route.route_path.clone(),
                resource_url(&result.domain, route),
            ]
        }))
    };

    let info = columns(vec![
        vec!["domain".to_string(), result.domain.clone()],
        vec!["projectName".to_string(), summary.config.project_name.clone()],
        vec!["serviceId".to_string(), result.service_id.clone()],
        vec![
            "environmentSuffix".to_string(),
            summary.config.environment.clone(),
        ],
        vec!["environmentId".to_string(), result.environment_id.clone()],
        vec!["buildId".to_string(), result.build_id.clone()],
    ]);

    [
        format!("deploymentInfo\n{}", info),
        format!("functions\n{}", resources(&result.functions)),
        format!("assets\n{}", resources(&result.assets)),
    ]
    .join("\n\n")
}

pub(crate) fn result_pretty(summary: &DeploymentSummary) -> String {
    let result = &summary.result;
    let config = &summary.config;
    let label = |text: &str| text.cyan().bold().to_string();

    let mut out = vec![
        "Deployment Details".cyan().bold().underline().to_string(),
        format!("{} {}", label("Domain:"), result.domain),
        label("Service:"),
        format!(
            "   {} {}",
            config.project_name,
            format!("({})", result.service_id).dimmed()
        ),
        label("Environment:"),
        format!(
            "   {} {}",
            config.environment,
            format!("({})", result.environment_id).dimmed()
        ),
        label("Build:"),
        format!("   {}", result.build_id),
    ];

    let resources = |routes: &[RouteInfo]| -> Vec<String> {
        sort_by_access(routes)
            .into_iter()
            .map(|route| {
                let access = if route.access.is_public() {
                    String::new()
                } else {
                    format!("{} ", format!("[{}]", route.access).bold())
                };
                format!(
                    "   {}{}{}",
                    access,
                    format!("https://{}", result.domain).dimmed(),
                    route.route_path
                )
            })
            .collect()
    };

    out.push(label("Functions:"));
    out.extend(resources(&result.functions));
    out.push(label("Assets:"));
    out.extend(resources(&result.assets));
    out.join("\n")
}
