//! fnkit CLI - Create, run and deploy serverless functions

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::Colorize;
use fnkit_core::config::NewFlags;
use fnkit_core::presentation::{render, DeploymentSummary, OutputContext, Report, RouteListing};
use fnkit_core::routes::{discover, ConventionClassifier};
use fnkit_core::tui::{run_new, NewArgs};
use fnkit_core::{ProductConfig, ScaffoldError};
use std::path::PathBuf;
use std::process::ExitCode;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// fnkit product configuration
#[derive(Clone)]
pub struct FnkitConfig;

impl ProductConfig for FnkitConfig {
    fn name(&self) -> &'static str {
        "fnkit"
    }

    fn display_name(&self) -> &'static str {
        "fnkit"
    }

    fn default_template_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/fnkit/fnkit/main/templates"
    }

    fn template_url_env(&self) -> &'static str {
        "FNKIT_TEMPLATE_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://github.com/fnkit/fnkit#readme"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for creating, running and deploying serverless functions"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install fnkit --force"
    }
}

#[derive(Parser, Debug)]
#[command(name = "fnkit")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new function from a template
    New(NewCommand),
    /// List the functions and assets a local run would serve
    Routes(RoutesCommand),
    /// Print a deployment summary saved as JSON
    Report(ReportCommand),
    /// Build zip files for all templates in the template directory (for development use)
    BuildZips(BuildZipsCommand),
}

#[derive(Args, Debug)]
pub struct NewCommand {
    /// Name of the function file, e.g. `hello` or `hello.js`
    pub filename: Option<String>,

    /// Template to scaffold from
    #[arg(short, long)]
    pub template: Option<String>,

    /// List the available templates
    #[arg(short, long)]
    pub list: bool,

    /// Local directory to use for templates instead of fetching from remote (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

impl From<NewCommand> for NewArgs {
    fn from(cmd: NewCommand) -> Self {
        NewArgs {
            flags: NewFlags {
                filename: cmd.filename,
                template: cmd.template,
                list: cmd.list,
            },
            template_dir: cmd.template_dir,
        }
    }
}

#[derive(Args, Debug)]
pub struct RoutesCommand {
    /// Project directory containing `functions/` and `assets/`
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Port of the local server
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Public base URL, e.g. an ngrok tunnel. Overrides --port.
    #[arg(long)]
    pub url: Option<String>,

    /// Serve assets under /asset
    #[arg(long)]
    pub legacy: bool,
}

#[derive(Args, Debug)]
pub struct ReportCommand {
    /// JSON file holding the deployment config and result
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct BuildZipsCommand {
    /// Local directory containing templates to build zips from
    #[arg(long = "template-dir", default_value = "templates")]
    pub template_dir: PathBuf,
}

fn configure_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_error(message: impl std::fmt::Display) {
    eprintln!("{} {}", "ERROR".red().bold(), message);
}

impl Cli {
    /// Parse the process arguments, with help text taken from `config`
    fn parse_for<C: ProductConfig>(config: &C) -> Self {
        let matches = Self::command().about(config.cli_description()).get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }
}

/// Report a command's outcome and pick the process exit status.
/// Every failure, including a failed `new --list` catalog fetch, exits 1.
fn finish(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        // Scaffold errors already embed their cause
        Err(e) if e.is::<ScaffoldError>() => {
            print_error(e);
            1
        }
        Err(e) => {
            print_error(format!("{:#}", e));
            1
        }
    }
}

async fn routes(cmd: RoutesCommand, ctx: &OutputContext) -> Result<()> {
    let discovered = discover(&cmd.dir, &ConventionClassifier)
        .with_context(|| format!("Failed to scan {}", cmd.dir.display()))?;
    let base_url = cmd
        .url
        .unwrap_or_else(|| format!("http://localhost:{}", cmd.port));
    let listing = RouteListing::new(base_url, cmd.legacy, discovered);
    println!("{}", render(Report::Routes(&listing), ctx));
    Ok(())
}

async fn report(cmd: ReportCommand, ctx: &OutputContext) -> Result<()> {
    let content = tokio::fs::read_to_string(&cmd.file)
        .await
        .with_context(|| format!("Failed to read {}", cmd.file.display()))?;
    let summary: DeploymentSummary = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", cmd.file.display()))?;

    println!("{}", render(Report::ConfigSummary(&summary.config), ctx));
    println!("{}", render(Report::Deployment(&summary), ctx));
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let config = FnkitConfig;
    let cli = Cli::parse_for(&config);
    configure_logging(cli.verbose);
    tracing::debug!(version = CLI_VERSION, "starting fnkit");

    let ctx = OutputContext::detect();

    let result = match cli.command {
        Command::New(cmd) => run_new(&config, cmd.into(), CLI_VERSION, &ctx)
            .await
            .map(|_| ())
            .map_err(anyhow::Error::from),
        Command::Routes(cmd) => routes(cmd, &ctx).await,
        Command::Report(cmd) => report(cmd, &ctx).await,
        Command::BuildZips(cmd) => fnkit_core::templates::build_zips(&cmd.template_dir)
            .await
            .map(|_| ()),
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    ExitCode::from(finish(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_new_flags_map_to_args() {
        let cli = Cli::parse_from(["fnkit", "new", "hello.js", "--template", "blank"]);
        let Command::New(cmd) = cli.command else {
            panic!("expected new");
        };
        let args: NewArgs = cmd.into();
        assert_eq!(args.flags.filename.as_deref(), Some("hello.js"));
        assert_eq!(args.flags.template.as_deref(), Some("blank"));
        assert!(!args.flags.list);
    }

    #[test]
    fn test_list_short_flag_and_verbosity() {
        let cli = Cli::parse_from(["fnkit", "-vv", "new", "-l"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::New(NewCommand { list: true, .. })));
    }

    #[tokio::test]
    async fn test_report_reads_summary_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("deploy.json");
        std::fs::write(
            &file,
            r#"{"config":{"account":"AC1","projectName":"p","environment":"dev"},
                "result":{"domain":"p.example.io","serviceId":"S","environmentId":"E","buildId":"B"}}"#,
        )
        .unwrap();

        report(ReportCommand { file }, &OutputContext::plain()).await.unwrap();
    }

    #[tokio::test]
    async fn test_report_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("deploy.json");
        std::fs::write(&file, "not json").unwrap();

        let err = report(ReportCommand { file }, &OutputContext::plain())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }

    #[test]
    fn test_new_failures_exit_nonzero() {
        let exists = ScaffoldError::FileExists(PathBuf::from("functions/hello.js"));
        assert_eq!(finish(Err(exists.into())), 1);

        let write_failed = ScaffoldError::ScaffoldWriteFailed {
            path: PathBuf::from("functions/hello.js"),
            written: vec![PathBuf::from("assets/hello.html")],
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(finish(Err(write_failed.into())), 1);
        assert_eq!(finish(Ok(())), 0);
    }

    #[tokio::test]
    async fn test_list_exit_status_follows_catalog_fetch() {
        let empty = tempfile::tempdir().unwrap();
        let list = |dir: &Path| NewCommand {
            filename: None,
            template: None,
            list: true,
            template_dir: Some(dir.to_path_buf()),
        };

        let failed = run_new(&FnkitConfig, list(empty.path()).into(), CLI_VERSION, &OutputContext::plain())
            .await
            .map(|_| ())
            .map_err(anyhow::Error::from);
        assert_eq!(finish(failed), 1);

        let catalog = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates");
        let listed = run_new(&FnkitConfig, list(&catalog).into(), CLI_VERSION, &OutputContext::plain())
            .await
            .map(|_| ())
            .map_err(anyhow::Error::from);
        assert_eq!(finish(listed), 0);
    }

    #[test]
    fn test_help_uses_product_description() {
        let help = Cli::command()
            .about(FnkitConfig.cli_description())
            .render_help()
            .to_string();
        assert!(help.contains("serverless functions"));
    }
}
