//! Resolving `new` flags into a complete configuration
//!
//! Explicit flags always win. Whatever is missing is asked for in a single batched
//! prompt session, and the answers are merged through [`ConfigBuilder`].

use crate::error::{ConfigField, NameError, Result, ScaffoldError};
use crate::templates::{TemplateDescriptor, TemplateProvider};

/// Flags accepted by the `new` command, as parsed from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFlags {
    /// Function file name, e.g. `hello` or `hello.js`
    pub filename: Option<String>,
    /// Template identifier
    pub template: Option<String>,
    /// List templates instead of creating a function
    pub list: bool,
}

impl NewFlags {
    /// The configuration values these flags provide. Empty strings count as missing.
    pub fn partial(&self) -> PartialConfig {
        PartialConfig {
            template: non_empty(&self.template),
            filename: non_empty(&self.filename),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// A possibly incomplete set of configuration values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialConfig {
    pub template: Option<String>,
    pub filename: Option<String>,
}

/// Fully resolved configuration for scaffolding a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    template: String,
    filename: String,
}

impl ResolvedConfig {
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The filename with one trailing `.js` removed
    pub fn function_name(&self) -> &str {
        strip_js(&self.filename)
    }
}

fn strip_js(filename: &str) -> &str {
    filename.strip_suffix(".js").unwrap_or(filename)
}

/// Validate a function file name typed at the prompt
pub fn validate_filename(input: &str) -> std::result::Result<(), NameError> {
    if input.is_empty() {
        return Err(NameError::Empty);
    }
    if input.chars().any(char::is_whitespace) {
        return Err(NameError::Whitespace);
    }
    Ok(())
}

/// Merges flag values and prompt answers, flags taking precedence
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    flags: PartialConfig,
    answers: PartialConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(mut self, flags: PartialConfig) -> Self {
        self.flags = flags;
        self
    }

    pub fn answers(mut self, answers: PartialConfig) -> Self {
        self.answers = answers;
        self
    }

    pub fn build(self) -> Result<ResolvedConfig> {
        let template = self
            .flags
            .template
            .or(self.answers.template)
            .ok_or(ScaffoldError::MissingField(ConfigField::Template))?;
        let filename = self
            .flags
            .filename
            .or(self.answers.filename)
            .ok_or(ScaffoldError::MissingField(ConfigField::Filename))?;

        let invalid = |reason| ScaffoldError::InvalidFunctionName {
            name: filename.clone(),
            reason,
        };
        validate_filename(&filename).map_err(invalid)?;
        if strip_js(&filename).is_empty() {
            return Err(invalid(NameError::Empty));
        }

        Ok(ResolvedConfig { template, filename })
    }
}

/// One entry of the template selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateChoice {
    /// Template id returned when chosen
    pub value: String,
    pub name: String,
    pub description: String,
}

impl TemplateChoice {
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.description)
    }
}

impl From<&TemplateDescriptor> for TemplateChoice {
    fn from(template: &TemplateDescriptor) -> Self {
        Self {
            value: template.id.clone(),
            name: template.name.clone(),
            description: template.description.clone(),
        }
    }
}

/// A question for the interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    /// Single choice among the catalog's templates
    SelectTemplate { choices: Vec<TemplateChoice> },
    /// Free text, validated with [`validate_filename`] until it passes
    Filename,
}

/// Asks the user a batch of questions in one session
pub trait Prompter {
    fn ask(&mut self, questions: &[Question]) -> Result<PartialConfig>;
}

/// Resolve `flags` into a complete configuration, prompting only for what is missing
pub async fn resolve<P, T>(flags: &NewFlags, prompter: &mut P, provider: &T) -> Result<ResolvedConfig>
where
    P: Prompter + ?Sized,
    T: TemplateProvider + ?Sized,
{
    let given = flags.partial();
    let mut questions = Vec::new();

    if given.template.is_none() {
        let templates = provider.list_templates().await?;
        if templates.is_empty() {
            return Err(ScaffoldError::EmptyCatalog);
        }
        questions.push(Question::SelectTemplate {
            choices: templates.iter().map(TemplateChoice::from).collect(),
        });
    }

    if given.filename.is_none() {
        questions.push(Question::Filename);
    }

    let builder = ConfigBuilder::new().flags(given);
    if questions.is_empty() {
        return builder.build();
    }

    tracing::debug!(count = questions.len(), "prompting for missing configuration");
    let answers = prompter.ask(&questions)?;
    builder.answers(answers).build()
}
