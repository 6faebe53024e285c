//! Configuration resolution for the `new` command

pub mod resolver;

pub use resolver::{
    resolve, validate_filename, ConfigBuilder, NewFlags, PartialConfig, Prompter, Question,
    ResolvedConfig, TemplateChoice,
};
