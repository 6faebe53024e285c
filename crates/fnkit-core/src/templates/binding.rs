//! Binding a chosen function name into generic template files

use std::borrow::Cow;

/// Placeholder that templates use wherever the function name belongs
pub const NAME_PLACEHOLDER: &str = "{{name}}";

/// A file ready to be written into the user's project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the project root, always `/`-separated
    pub relative_path: String,
    pub content: Vec<u8>,
}

/// Substitute the function name into a template path
pub fn bind_path(path: &str, function_name: &str) -> String {
    path.replace(NAME_PLACEHOLDER, function_name)
}

/// Substitute the function name into file contents.
///
/// Only UTF-8 text is rewritten; anything else is returned unchanged.
pub fn bind_content<'a>(content: &'a [u8], function_name: &str) -> Cow<'a, [u8]> {
    match std::str::from_utf8(content) {
        Ok(text) if text.contains(NAME_PLACEHOLDER) => {
            Cow::Owned(text.replace(NAME_PLACEHOLDER, function_name).into_bytes())
        }
        _ => Cow::Borrowed(content),
    }
}

/// Bind a raw template file to `function_name`
pub fn bind_file(path: &str, content: &[u8], function_name: &str) -> TemplateFile {
    TemplateFile {
        relative_path: bind_path(path, function_name),
        content: bind_content(content, function_name).into_owned(),
    }
}
