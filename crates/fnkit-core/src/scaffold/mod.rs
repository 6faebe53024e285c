//! Materialising a template into the user's project

pub mod writer;

use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::templates::TemplateProvider;
use std::path::Path;

pub use writer::{resolve_target_dir, write_files, ScaffoldReport, PROJECT_SUBDIRECTORIES};

/// Fetch the configured template bound to the function name and write it under `target_dir`
pub async fn scaffold<T: TemplateProvider + ?Sized>(
    provider: &T,
    config: &ResolvedConfig,
    target_dir: &Path,
) -> Result<ScaffoldReport> {
    let function_name = config.function_name();
    let files = provider
        .get_template_files(config.template(), function_name)
        .await?;
    write_files(&files, target_dir, function_name).await
}
