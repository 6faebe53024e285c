//! Writing bound template files into the user's project

use crate::error::{Result, ScaffoldError};
use crate::fs::file_exists;
use crate::templates::TemplateFile;
use futures::future::join_all;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Directory names that live inside a project; running from one of them scaffolds
/// into the parent instead
pub const PROJECT_SUBDIRECTORIES: &[&str] = &["functions", "assets", "src", "static"];

/// Outcome of a successful scaffold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub function_name: String,
    pub target_dir: PathBuf,
    /// Written files in template order
    pub written: Vec<PathBuf>,
}

/// Pick the project root for `cwd`
pub fn resolve_target_dir(cwd: &Path) -> PathBuf {
    let in_subdirectory = cwd
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| PROJECT_SUBDIRECTORIES.contains(&name));

    match cwd.parent() {
        Some(parent) if in_subdirectory => parent.to_path_buf(),
        _ => cwd.to_path_buf(),
    }
}

/// Join a template-relative path onto `target_dir`, refusing anything that escapes it.
/// `.` components are dropped so equivalent spellings map to the same target.
fn target_path(target_dir: &Path, relative: &str) -> Result<PathBuf> {
    let unsafe_path = || ScaffoldError::UnsafeTemplatePath(relative.to_string());
    let mut normalized = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            _ => return Err(unsafe_path()),
        }
    }
    if normalized.as_os_str().is_empty() {
        return Err(unsafe_path());
    }
    Ok(target_dir.join(normalized))
}

/// Write `files` under `target_dir`.
///
/// Every target is checked before anything is written; an existing file (or
/// symlink) or a path listed twice aborts the whole operation untouched. Writes then
/// run concurrently and never replace a file that appeared in the meantime. If one
/// fails the others still finish, nothing is rolled back, and the first failure in
/// template order is returned.
pub async fn write_files(
    files: &[TemplateFile],
    target_dir: &Path,
    function_name: &str,
) -> Result<ScaffoldReport> {
    let targets = files
        .iter()
        .map(|file| target_path(target_dir, &file.relative_path))
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    for target in &targets {
        if !seen.insert(target) {
            return Err(ScaffoldError::DuplicateTemplatePath(target.clone()));
        }
    }

    for target in &targets {
        if file_exists(target).await {
            return Err(ScaffoldError::FileExists(target.clone()));
        }
    }

    tracing::debug!(
        function = function_name,
        files = files.len(),
        dir = %target_dir.display(),
        "writing template files"
    );

    let results = join_all(
        files
            .iter()
            .zip(&targets)
            .map(|(file, target)| write_one(target, &file.content)),
    )
    .await;

    let mut written = Vec::new();
    let mut first_failure = None;
    for (target, result) in targets.into_iter().zip(results) {
        match result {
            Ok(()) => written.push(target),
            Err(failure) => {
                tracing::debug!(path = %target.display(), error = ?failure, "write failed");
                if first_failure.is_none() {
                    first_failure = Some((target, failure));
                }
            }
        }
    }

    match first_failure {
        Some((path, WriteFailure::Exists)) => return Err(ScaffoldError::FileExists(path)),
        Some((path, WriteFailure::Io(source))) => {
            return Err(ScaffoldError::ScaffoldWriteFailed {
                path,
                written,
                source,
            })
        }
        None => {}
    }

    Ok(ScaffoldReport {
        function_name: function_name.to_string(),
        target_dir: target_dir.to_path_buf(),
        written,
    })
}

#[derive(Debug)]
enum WriteFailure {
    /// Something appeared at the target after the pre-flight check
    Exists,
    Io(std::io::Error),
}

async fn write_one(target: &Path, content: &[u8]) -> std::result::Result<(), WriteFailure> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await.map_err(WriteFailure::Io)?;
    }
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => WriteFailure::Exists,
            _ => WriteFailure::Io(e),
        })?;
    file.write_all(content).await.map_err(WriteFailure::Io)?;
    file.flush().await.map_err(WriteFailure::Io)
}
