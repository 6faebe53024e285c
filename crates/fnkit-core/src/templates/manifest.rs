//! Template manifest types and parsing

use serde::{Deserialize, Serialize};

/// A catalog entry describing one available template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// Identifier passed to `--template`
    pub id: String,

    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    #[serde(default)]
    pub description: String,
}

/// A shared file from the root templates directory that gets bundled into every template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedFile {
    /// Source path relative to templates/ directory
    pub source: String,

    /// Destination path in each template (defaults to source if not specified)
    #[serde(default)]
    pub dest: Option<String>,
}

impl SharedFile {
    /// Get the destination path (falls back to source if dest not specified)
    pub fn destination(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.source)
    }
}

/// Root template manifest (templates/template.yaml), the template catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootManifest {
    /// Available templates; each id is also the template's directory name
    pub templates: Vec<TemplateDescriptor>,

    /// Shared files from root templates/ directory to include in every template
    /// Supports renaming via source/dest mapping
    #[serde(default)]
    pub shared_files: Vec<SharedFile>,
}

impl RootManifest {
    pub fn find(&self, id: &str) -> Option<&TemplateDescriptor> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Comma-separated template ids, for error messages
    pub fn available_ids(&self) -> String {
        self.templates
            .iter()
            .map(|t| t.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Per-template manifest (templates/<id>/template.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    #[serde(default)]
    pub description: String,

    /// Minimum CLI version (semver) this template was written for
    #[serde(default)]
    pub version: Option<String>,

    /// Explicit list of files to copy, relative to the project root.
    /// Paths may contain the `{{name}}` placeholder.
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root_manifest() {
        let yaml = r#"
templates:
  - id: blank
    name: Blank
    description: Empty function
  - id: auth
    name: Authenticated
shared_files:
  - source: shared/gitignore
    dest: .gitignore
"#;
        let manifest: RootManifest = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(manifest.templates.len(), 2);
        assert_eq!(manifest.find("auth").unwrap().description, "");
        assert!(manifest.find("missing").is_none());
        assert_eq!(manifest.available_ids(), "blank, auth");
        assert_eq!(manifest.shared_files[0].destination(), ".gitignore");
    }

    #[test]
    fn test_parse_template_manifest_without_version() {
        let yaml = r#"
name: Blank
description: Empty function
files:
  - "functions/{{name}}.js"
"#;
        let manifest: TemplateManifest = serde_yaml::from_str(yaml).unwrap();
        assert!(manifest.version.is_none());
        assert_eq!(manifest.files, vec!["functions/{{name}}.js"]);
    }

    #[test]
    fn test_shared_file_destination_defaults_to_source() {
        let shared = SharedFile {
            source: ".env".to_string(),
            dest: None,
        };
        assert_eq!(shared.destination(), ".env");
    }
}
