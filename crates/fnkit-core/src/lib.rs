//! fnkit Core - Shared library behind the `fnkit` CLI
//!
//! This library scaffolds serverless functions from a template catalog and renders
//! the reports a functions project produces (served routes, deployment results).
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - File helpers, template fetching and binding,
//!   conflict-safe writing, route discovery
//! - **Layer 2: Workflow Orchestration** - `ProductConfig`, configuration resolution
//!   through the `Prompter` and `TemplateProvider` seams, dual-mode `presentation`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts and the `new` command flow
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use fnkit_core::{config, scaffold, templates::TemplateFetcher};
//!
//! let fetcher = TemplateFetcher::from_config(&MyConfig, "0.1.0")?;
//! let flags = config::NewFlags {
//!     filename: Some("hello.js".into()),
//!     template: Some("blank".into()),
//!     list: false,
//! };
//! let resolved = config::resolve(&flags, &mut my_prompter, &fetcher).await?;
//! let report = scaffold::scaffold(&fetcher, &resolved, &target_dir).await?;
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod presentation;
pub mod product;
pub mod routes;
pub mod scaffold;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{resolve, NewFlags, Prompter, ResolvedConfig};
pub use error::{ScaffoldError, Result};
pub use presentation::{render, OutputContext, OutputMode, Report};
pub use product::ProductConfig;
pub use routes::{AccessLevel, AssetInfo, FunctionInfo, RouteInfo};
pub use scaffold::{scaffold, ScaffoldReport};
pub use templates::{TemplateDescriptor, TemplateFetcher, TemplateProvider, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::{run_new, NewArgs, NewOutcome};
