//! Dual-mode reports
//!
//! Every report renders in one of two modes chosen once per process by
//! [`OutputContext::detect`]: an interactive mode with colour, boxes and tree
//! glyphs for people at a terminal, and a plain columnar mode for pipes, CI
//! logs and scripts. Both modes carry the same information in the same order.
//!
//! ```ignore
//! let ctx = OutputContext::detect();
//! println!("{}", render(Report::Routes(&listing), &ctx));
//! ```

pub mod context;
pub mod deploy;
pub mod routes;
pub mod style;
mod templates;

pub use context::{OutputContext, OutputMode};
pub use deploy::{DeployConfig, DeployResult, DeploymentSummary};
pub use routes::RouteListing;

use crate::templates::TemplateDescriptor;

/// Something the CLI can print
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    /// Settings a deployment is about to run with
    ConfigSummary(&'a DeployConfig),
    /// Outcome of a finished deployment
    Deployment(&'a DeploymentSummary),
    /// Routes served by a local run
    Routes(&'a RouteListing),
    /// Templates `new` can scaffold from
    TemplateList(&'a [TemplateDescriptor]),
}

pub fn render(report: Report<'_>, ctx: &OutputContext) -> String {
    let interactive = ctx.is_interactive();
    match report {
        Report::ConfigSummary(config) if interactive => deploy::config_pretty(config),
        Report::ConfigSummary(config) => deploy::config_plain(config),
        Report::Deployment(summary) if interactive => deploy::result_pretty(summary),
        Report::Deployment(summary) => deploy::result_plain(summary),
        Report::Routes(listing) if interactive => routes::render_pretty(listing, ctx),
        Report::Routes(listing) => routes::render_plain(listing),
        Report::TemplateList(templates) => {
            templates::render(templates, interactive, ctx.supports_emoji)
        }
    }
}
