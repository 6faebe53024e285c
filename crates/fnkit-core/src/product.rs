//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to tell the core library where templates live,
//! what to call itself in user-facing messages and how users upgrade it.

/// Configuration trait for the CLI product
///
/// Implementors define:
/// - Product identity (name, display name)
/// - Template source URLs
/// - Documentation links
/// - Upgrade instructions shown in version warnings
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default URL for fetching templates
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding template URL
    fn template_url_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
