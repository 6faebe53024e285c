//! Template catalog access and name binding
//!
//! This module provides:
//! - Template manifest types (RootManifest, TemplateManifest, TemplateDescriptor)
//! - The `TemplateProvider` seam and its remote/local implementation
//! - Binding of the chosen function name into template files
//! - Version compatibility checking

pub mod binding;
pub mod fetcher;
pub mod manifest;
pub mod version;

use crate::error::Result as ScaffoldResult;
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use std::path::Path;

pub use binding::{TemplateFile, NAME_PLACEHOLDER};
pub use fetcher::{TemplateFetcher, TemplateSource};
pub use manifest::{RootManifest, SharedFile, TemplateDescriptor, TemplateManifest};
pub use version::check_compatibility;

/// Source of templates: the catalog listing plus the files of one template
#[async_trait]
pub trait TemplateProvider: Send + Sync {
    /// Fetch the current catalog. Never cached.
    async fn list_templates(&self) -> ScaffoldResult<Vec<TemplateDescriptor>>;

    /// Fetch a template's files with `function_name` bound into paths and contents
    async fn get_template_files(
        &self,
        template_id: &str,
        function_name: &str,
    ) -> ScaffoldResult<Vec<TemplateFile>>;
}

/// Build zip files for all templates in a catalog directory
pub async fn build_zips(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        anyhow::bail!("Template directory not found: {}", dir.display());
    }

    let manifest_path = dir.join("template.yaml");
    if !manifest_path.exists() {
        anyhow::bail!("Root template.yaml not found in {}", dir.display());
    }

    let manifest_content = tokio::fs::read_to_string(&manifest_path)
        .await
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let root_manifest: RootManifest = serde_yaml::from_str(&manifest_content)
        .context("Failed to parse root template.yaml")?;

    println!("{}", "Building template zips...".cyan().bold());
    println!();

    let mut built = 0;
    for template in &root_manifest.templates {
        let template_path = dir.join(&template.id);
        if !template_path.exists() {
            eprintln!(
                "{} Template directory not found: {}",
                "Warning:".yellow(),
                template_path.display()
            );
            continue;
        }

        print!("  {} {}...", "->".blue(), template.id);

        match TemplateFetcher::build_local_zip(dir, &template.id, &root_manifest.shared_files) {
            Ok(zip_bytes) => {
                let zip_path = dir.join(format!("{}.zip", template.id));
                tokio::fs::write(&zip_path, &zip_bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", zip_path.display()))?;
                println!(" {} ({} bytes)", "done".green(), zip_bytes.len());
                built += 1;
            }
            Err(e) => {
                println!(" {}", "failed".red());
                eprintln!("    Error: {:#}", e);
            }
        }
    }

    println!();
    println!(
        "{} {} template zip(s) in {}",
        "Built".green().bold(),
        built,
        dir.display()
    );

    Ok(built)
}
