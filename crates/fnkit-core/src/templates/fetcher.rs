//! Template fetching from a remote catalog or a local directory
//!
//! Both remote and local templates are read from zip bundles:
//! - Remote: downloads `{base}/{id}.zip` to a temporary file
//! - Local: zips the template folder in memory, then reads it back
//!
//! This keeps extraction identical between development and production.
//! Nothing is cached: every call goes back to the source.

use super::binding::{bind_file, TemplateFile};
use super::manifest::{RootManifest, SharedFile, TemplateDescriptor, TemplateManifest};
use super::version;
use super::TemplateProvider;
use crate::error::{Result as ScaffoldResult, ScaffoldError};
use crate::fs::download_file;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Template source - either remote URL or local directory
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Remote(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Create a remote template source from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.template_url_env())
            .unwrap_or_else(|_| config.default_template_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid template URL: {}", url_str))?;
        Ok(Self::Remote(url))
    }

    /// Create a local template source from a path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

/// A template bundle extracted from its zip
#[derive(Debug, Clone)]
struct TemplateBundle {
    manifest: TemplateManifest,
    files: HashMap<String, Vec<u8>>,
}

/// Running CLI version and how to upgrade it, for template compatibility warnings
#[derive(Debug, Clone)]
struct CliVersion {
    version: String,
    upgrade_command: String,
}

/// Template fetcher - handles retrieving templates from remote or local sources
pub struct TemplateFetcher {
    source: TemplateSource,
    client: reqwest::Client,
    cli_version: Option<CliVersion>,
}

impl TemplateFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: TemplateSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            cli_version: None,
        }
    }

    /// Create a fetcher from a product config
    pub fn from_config<C: ProductConfig>(config: &C, cli_version: &str) -> Result<Self> {
        let source = TemplateSource::from_config(config)?;
        Ok(Self::new(source, config.user_agent())
            .with_cli_version(cli_version, config.upgrade_command()))
    }

    /// Create a fetcher for local templates
    pub fn from_local(path: PathBuf, user_agent: &str) -> Self {
        Self::new(TemplateSource::local(path), user_agent)
    }

    /// Warn when a template asks for a newer CLI than `version`
    pub fn with_cli_version(mut self, version: &str, upgrade_command: &str) -> Self {
        self.cli_version = Some(CliVersion {
            version: version.to_string(),
            upgrade_command: upgrade_command.to_string(),
        });
        self
    }

    /// Get the template source
    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    /// Fetch the root manifest listing available templates
    pub async fn fetch_root_manifest(&self) -> Result<RootManifest> {
        match &self.source {
            TemplateSource::Remote(base_url) => {
                let url = Self::build_url(base_url, "template.yaml")?;
                tracing::debug!(%url, "fetching template catalog");
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| {
                        format!("Failed to fetch root template manifest from {}", url)
                    })?;

                if !response.status().is_success() {
                    anyhow::bail!(
                        "Failed to fetch root manifest from {}: HTTP {}",
                        url,
                        response.status()
                    );
                }

                let content = response.text().await?;
                serde_yaml::from_str(&content).context("Failed to parse root manifest")
            }
            TemplateSource::Local(path) => {
                let manifest_path = path.join("template.yaml");
                tracing::debug!(path = %manifest_path.display(), "reading template catalog");
                let content = fs::read_to_string(&manifest_path)
                    .await
                    .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
                serde_yaml::from_str(&content).context("Failed to parse root manifest")
            }
        }
    }

    /// Build a zip file for a local template (reads files list from template.yaml)
    /// Includes shared files from root templates directory with optional renaming
    pub fn build_local_zip(
        template_dir: &Path,
        template_id: &str,
        shared_files: &[SharedFile],
    ) -> Result<Vec<u8>> {
        let template_path = template_dir.join(template_id);
        let manifest_path = template_path.join("template.yaml");

        let manifest_content = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        let mut manifest: TemplateManifest = serde_yaml::from_str(&manifest_content)
            .with_context(|| format!("Failed to parse template '{}' manifest", template_id))?;

        // Shared file destinations become part of the file list
        for shared in shared_files {
            let dest = shared.destination().to_string();
            if !manifest.files.contains(&dest) {
                manifest.files.push(dest);
            }
        }

        let manifest_content =
            serde_yaml::to_string(&manifest).context("Failed to serialize updated manifest")?;

        let mut zip_buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            // template.yaml goes first, with the updated files list
            zip.start_file(format!("{}/template.yaml", template_id), options)?;
            zip.write_all(manifest_content.as_bytes())?;

            for shared in shared_files {
                let source_path = template_dir.join(&shared.source);
                if source_path.exists() {
                    let content = std::fs::read(&source_path).with_context(|| {
                        format!("Failed to read shared file {}", source_path.display())
                    })?;
                    zip.start_file(format!("{}/{}", template_id, shared.destination()), options)?;
                    zip.write_all(&content)?;
                } else {
                    tracing::warn!(
                        source = %shared.source,
                        dir = %template_dir.display(),
                        "shared file not found"
                    );
                }
            }

            let shared_dests: HashSet<_> = shared_files.iter().map(|s| s.destination()).collect();

            for file_path in &manifest.files {
                if shared_dests.contains(file_path.as_str()) {
                    continue;
                }

                let full_path = template_path.join(file_path);
                if full_path.exists() {
                    let content = std::fs::read(&full_path)
                        .with_context(|| format!("Failed to read {}", full_path.display()))?;
                    zip.start_file(format!("{}/{}", template_id, file_path), options)?;
                    zip.write_all(&content)?;
                } else {
                    anyhow::bail!(
                        "File '{}' listed in {} does not exist",
                        full_path.display(),
                        manifest_path.display()
                    );
                }
            }

            zip.finish()?;
        }

        Ok(zip_buffer)
    }

    /// Read a template bundle out of a zip archive
    fn read_bundle<R: Read + Seek>(reader: R, template_id: &str) -> Result<TemplateBundle> {
        let mut archive = ZipArchive::new(reader).with_context(|| {
            format!("Failed to read zip archive for template '{}'", template_id)
        })?;

        let mut files: HashMap<String, Vec<u8>> = HashMap::new();
        let mut manifest: Option<TemplateManifest> = None;

        // Entries are stored as {template_id}/relative/path
        let prefix = format!("{}/", template_id);

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let full_path = file.name().to_string();
            let relative_path = full_path
                .strip_prefix(&prefix)
                .unwrap_or(&full_path)
                .to_string();

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;

            if relative_path == "template.yaml" {
                let content_str = String::from_utf8_lossy(&contents);
                manifest = Some(serde_yaml::from_str(&content_str).with_context(|| {
                    format!("Failed to parse template '{}' manifest", template_id)
                })?);
                continue;
            }

            files.insert(relative_path, contents);
        }

        let manifest = manifest
            .ok_or_else(|| anyhow::anyhow!("Template '{}' zip missing template.yaml", template_id))?;

        Ok(TemplateBundle { manifest, files })
    }

    /// Download or build a template's bundle
    async fn fetch_bundle(
        &self,
        template_id: &str,
        root: &RootManifest,
    ) -> ScaffoldResult<TemplateBundle> {
        let fetch_failed = |source: anyhow::Error| ScaffoldError::TemplateFetchFailed {
            id: template_id.to_string(),
            source,
        };

        match &self.source {
            TemplateSource::Remote(base_url) => {
                let zip_url = Self::build_url(base_url, &format!("{}.zip", template_id))
                    .map_err(fetch_failed)?;
                let scratch = tempfile::tempdir()
                    .context("Failed to create a temporary directory")
                    .map_err(fetch_failed)?;
                let zip_path = scratch.path().join(format!("{}.zip", template_id));

                tracing::debug!(url = %zip_url, "downloading template bundle");
                if let Err(err) = download_file(&self.client, &zip_url, &zip_path).await {
                    if err.status() == Some(404) {
                        return Err(ScaffoldError::TemplateNotFound {
                            id: template_id.to_string(),
                            available: root.available_ids(),
                        });
                    }
                    return Err(fetch_failed(err.into()));
                }

                let file = std::fs::File::open(&zip_path)
                    .with_context(|| format!("Failed to open {}", zip_path.display()))
                    .map_err(fetch_failed)?;
                Self::read_bundle(file, template_id).map_err(fetch_failed)
            }
            TemplateSource::Local(path) => {
                tracing::debug!(template = template_id, dir = %path.display(), "building local template bundle");
                let zip_bytes = Self::build_local_zip(path, template_id, &root.shared_files)
                    .map_err(fetch_failed)?;
                Self::read_bundle(Cursor::new(zip_bytes), template_id).map_err(fetch_failed)
            }
        }
    }

    fn warn_if_incompatible(&self, template_id: &str, manifest: &TemplateManifest) {
        let (Some(cli), Some(required)) = (&self.cli_version, &manifest.version) else {
            return;
        };
        if let Some(warning) =
            version::check_compatibility(&cli.version, required, &cli.upgrade_command)
        {
            tracing::warn!(template = template_id, "{}", warning);
        }
    }
}

#[async_trait]
impl TemplateProvider for TemplateFetcher {
    async fn list_templates(&self) -> ScaffoldResult<Vec<TemplateDescriptor>> {
        let root = self
            .fetch_root_manifest()
            .await
            .map_err(ScaffoldError::CatalogFetchFailed)?;
        Ok(root.templates)
    }

    async fn get_template_files(
        &self,
        template_id: &str,
        function_name: &str,
    ) -> ScaffoldResult<Vec<TemplateFile>> {
        let root = self
            .fetch_root_manifest()
            .await
            .map_err(ScaffoldError::CatalogFetchFailed)?;

        if root.find(template_id).is_none() {
            return Err(ScaffoldError::TemplateNotFound {
                id: template_id.to_string(),
                available: root.available_ids(),
            });
        }

        let bundle = self.fetch_bundle(template_id, &root).await?;
        self.warn_if_incompatible(template_id, &bundle.manifest);

        bundle
            .manifest
            .files
            .iter()
            .map(|path| {
                let content = bundle.files.get(path).ok_or_else(|| {
                    ScaffoldError::TemplateFetchFailed {
                        id: template_id.to_string(),
                        source: anyhow::anyhow!("File '{}' missing from template bundle", path),
                    }
                })?;
                Ok(bind_file(path, content, function_name))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ROOT_YAML: &str = r#"
templates:
  - id: blank
    name: Blank
    description: Empty function
  - id: auth
    name: Authenticated
    description: Requires auth
shared_files:
  - source: shared/env
    dest: .env
"#;

    /// Lay out a catalog directory with a `blank` template
    fn local_catalog(template_version: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("template.yaml"), ROOT_YAML).unwrap();
        std::fs::create_dir_all(root.join("shared")).unwrap();
        std::fs::write(root.join("shared/env"), "ACCOUNT=\n").unwrap();

        let blank = root.join("blank");
        std::fs::create_dir_all(blank.join("functions")).unwrap();
        std::fs::create_dir_all(blank.join("assets")).unwrap();
        std::fs::write(
            blank.join("template.yaml"),
            format!(
                "name: Blank\ndescription: Empty function\nversion: \"{}\"\nfiles:\n  - \"functions/{{{{name}}}}.js\"\n  - assets/logo.bin\n",
                template_version
            ),
        )
        .unwrap();
        std::fs::write(
            blank.join("functions/{{name}}.js"),
            "// {{name}}\nexports.handler = (ctx, event, cb) => cb(null, '{{name}}');\n",
        )
        .unwrap();
        std::fs::write(blank.join("assets/logo.bin"), [0u8, 159, 146, 150]).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_local_list_templates() {
        let catalog = local_catalog("0.1.0");
        let fetcher = TemplateFetcher::from_local(catalog.path().to_path_buf(), "test");

        let templates = fetcher.list_templates().await.unwrap();
        let ids: Vec<_> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["blank", "auth"]);
        assert_eq!(templates[1].description, "Requires auth");
    }

    #[tokio::test]
    async fn test_local_get_template_files_binds_name() {
        let catalog = local_catalog("0.1.0");
        let fetcher = TemplateFetcher::from_local(catalog.path().to_path_buf(), "test");

        let files = fetcher.get_template_files("blank", "hello").await.unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["functions/hello.js", "assets/logo.bin", ".env"]);

        let function = String::from_utf8(files[0].content.clone()).unwrap();
        assert!(function.starts_with("// hello\n"));
        assert!(!function.contains("{{name}}"));
        assert_eq!(files[1].content, vec![0u8, 159, 146, 150]);
        assert_eq!(files[2].content, b"ACCOUNT=\n");
    }

    #[tokio::test]
    async fn test_get_template_files_is_idempotent() {
        let catalog = local_catalog("0.1.0");
        let fetcher = TemplateFetcher::from_local(catalog.path().to_path_buf(), "test");

        let first = fetcher.get_template_files("blank", "hello").await.unwrap();
        let second = fetcher.get_template_files("blank", "hello").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_template_is_not_found() {
        let catalog = local_catalog("0.1.0");
        let fetcher = TemplateFetcher::from_local(catalog.path().to_path_buf(), "test");

        let err = fetcher.get_template_files("nope", "hello").await.unwrap_err();
        match err {
            ScaffoldError::TemplateNotFound { id, available } => {
                assert_eq!(id, "nope");
                assert_eq!(available, "blank, auth");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_listed_template_without_directory_fails_to_fetch() {
        let catalog = local_catalog("0.1.0");
        let fetcher = TemplateFetcher::from_local(catalog.path().to_path_buf(), "test");

        let err = fetcher.get_template_files("auth", "hello").await.unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateFetchFailed { ref id, .. } if id == "auth"));
    }

    #[tokio::test]
    async fn test_newer_template_version_still_fetches() {
        let catalog = local_catalog("99.0.0");
        let fetcher = TemplateFetcher::from_local(catalog.path().to_path_buf(), "test")
            .with_cli_version("0.1.0", "cargo install fnkit --force");

        let files = fetcher.get_template_files("blank", "hello").await.unwrap();
        assert_eq!(files.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_local_catalog_is_catalog_failure() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = TemplateFetcher::from_local(dir.path().join("missing"), "test");

        let err = fetcher.list_templates().await.unwrap_err();
        assert!(matches!(err, ScaffoldError::CatalogFetchFailed(_)));
    }

    #[tokio::test]
    async fn test_remote_fetch_round_trip() {
        let catalog = local_catalog("0.1.0");
        let zip = TemplateFetcher::build_local_zip(catalog.path(), "blank", &[]).unwrap();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/templates/template.yaml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ROOT_YAML))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/templates/blank.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(zip))
            .mount(&server)
            .await;

        let base = Url::parse(&format!("{}/templates", server.uri())).unwrap();
        let fetcher = TemplateFetcher::new(TemplateSource::Remote(base), "test");

        assert_eq!(fetcher.list_templates().await.unwrap().len(), 2);
        let files = fetcher.get_template_files("blank", "greet").await.unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["functions/greet.js", "assets/logo.bin"]);
    }

    #[tokio::test]
    async fn test_remote_missing_bundle_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/template.yaml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ROOT_YAML))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth.zip"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let base = Url::parse(&server.uri()).unwrap();
        let fetcher = TemplateFetcher::new(TemplateSource::Remote(base), "test");

        let err = fetcher.get_template_files("auth", "x").await.unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateNotFound { .. }));
    }

    #[tokio::test]
    async fn test_remote_catalog_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let base = Url::parse(&server.uri()).unwrap();
        let fetcher = TemplateFetcher::new(TemplateSource::Remote(base), "test");

        let err = fetcher.list_templates().await.unwrap_err();
        assert!(matches!(err, ScaffoldError::CatalogFetchFailed(_)));
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_build_url_preserves_query() {
        let base = Url::parse("https://example.com/templates/?ref=main").unwrap();
        let url = TemplateFetcher::build_url(&base, "blank.zip").unwrap();
        assert_eq!(url.as_str(), "https://example.com/templates/blank.zip?ref=main");
    }

    #[test]
    fn test_source_from_config_uses_default_url() {
        let source =
            TemplateSource::from_config(&crate::product::testing::TestProduct).unwrap();
        match source {
            TemplateSource::Remote(url) => {
                assert_eq!(url.host_str(), Some("templates.example.invalid"))
            }
            TemplateSource::Local(_) => panic!("expected remote source"),
        }
    }
}
