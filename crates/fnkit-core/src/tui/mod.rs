//! Inline prompts and the `new` command flow, using cliclack
//!
//! Only available with the `tui` feature. Everything here is a thin layer over
//! [`crate::config::resolve`] and [`crate::scaffold::scaffold`]; the prompts are
//! the only part that talks to the terminal directly.

use crate::config::{resolve, validate_filename, NewFlags, PartialConfig, Prompter, Question};
use crate::error::{Result, ScaffoldError};
use crate::presentation::{render, OutputContext, Report};
use crate::product::ProductConfig;
use crate::scaffold::{resolve_target_dir, scaffold, ScaffoldReport};
use crate::templates::{TemplateFetcher, TemplateProvider};
use colored::Colorize;
use std::path::PathBuf;

/// Arguments of the `new` command
#[derive(Debug, Clone, Default)]
pub struct NewArgs {
    pub flags: NewFlags,
    /// Read templates from this directory instead of the remote catalog
    pub template_dir: Option<PathBuf>,
}

/// What `new` ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewOutcome {
    /// Printed the catalog with this many templates
    Listed(usize),
    Created(ScaffoldReport),
}

/// Asks questions one after another with cliclack
#[derive(Debug, Default)]
pub struct CliclackPrompter;

impl Prompter for CliclackPrompter {
    fn ask(&mut self, questions: &[Question]) -> Result<PartialConfig> {
        let mut answers = PartialConfig::default();
        for question in questions {
            match question {
                Question::SelectTemplate { choices } => {
                    let mut select = cliclack::select("Which template would you like to use?");
                    for choice in choices {
                        select = select.item(choice.value.clone(), choice.label(), "");
                    }
                    answers.template = Some(select.interact().map_err(ScaffoldError::Prompt)?);
                }
                Question::Filename => {
                    let filename: String =
                        cliclack::input("What should be the name of your function?")
                            .placeholder("my-function")
                            .validate(|input: &String| validate_filename(input))
                            .interact()
                            .map_err(ScaffoldError::Prompt)?;
                    answers.filename = Some(filename);
                }
            }
        }
        Ok(answers)
    }
}

/// Build the template fetcher for `template_dir`, or the product's remote catalog
pub fn setup_fetcher<C: ProductConfig>(
    config: &C,
    template_dir: Option<PathBuf>,
    cli_version: &str,
) -> Result<TemplateFetcher> {
    match template_dir {
        Some(path) => {
            tracing::info!(path = %path.display(), "using local templates");
            Ok(TemplateFetcher::from_local(path, config.user_agent())
                .with_cli_version(cli_version, config.upgrade_command()))
        }
        None => TemplateFetcher::from_config(config, cli_version)
            .map_err(ScaffoldError::CatalogFetchFailed),
    }
}

/// Print the template catalog. Returns how many templates it holds.
pub async fn list_templates<T: TemplateProvider + ?Sized>(
    provider: &T,
    ctx: &OutputContext,
) -> Result<usize> {
    let spinner = ctx.is_interactive().then(cliclack::spinner);
    if let Some(spinner) = &spinner {
        spinner.start("Loading templates...");
    }

    let templates = match provider.list_templates().await {
        Ok(templates) => templates,
        Err(e) => {
            if let Some(spinner) = &spinner {
                spinner.stop("Failed to load templates");
            }
            return Err(e);
        }
    };
    if let Some(spinner) = &spinner {
        spinner.stop(format!("Found {} templates", templates.len()));
    }

    println!("{}", render(Report::TemplateList(&templates), ctx));
    Ok(templates.len())
}

/// Run `new`: list templates, or resolve the configuration and scaffold a function
/// into the project containing the current directory
pub async fn run_new<C: ProductConfig>(
    config: &C,
    args: NewArgs,
    cli_version: &str,
    ctx: &OutputContext,
) -> Result<NewOutcome> {
    let fetcher = setup_fetcher(config, args.template_dir, cli_version)?;

    if args.flags.list {
        return list_templates(&fetcher, ctx).await.map(NewOutcome::Listed);
    }

    if ctx.is_interactive() {
        cliclack::intro(config.display_name()).map_err(ScaffoldError::Prompt)?;
    }
    let resolved = resolve(&args.flags, &mut CliclackPrompter, &fetcher).await?;
    let cwd = std::env::current_dir().map_err(ScaffoldError::CurrentDir)?;
    let target_dir = resolve_target_dir(&cwd);
    tracing::info!(
        template = resolved.template(),
        function = resolved.function_name(),
        target = %target_dir.display(),
        "scaffolding function"
    );

    let report = scaffold(&fetcher, &resolved, &target_dir).await?;
    println!(
        "{} Created new function {}",
        "SUCCESS".green().bold(),
        report.function_name
    );
    if ctx.is_interactive() {
        for path in &report.written {
            let shown = path.strip_prefix(&target_dir).unwrap_or(path);
            println!("  {}", shown.display().to_string().dimmed());
        }
        cliclack::outro(format!("Docs: {}", config.docs_url())).map_err(ScaffoldError::Prompt)?;
    }
    Ok(NewOutcome::Created(report))
}
