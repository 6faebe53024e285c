//! Output mode detection, done once at startup and passed to every renderer

/// How reports are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Colour, boxes, tree glyphs and link decoration
    Interactive,
    /// Unstyled columnar text that greps well
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputContext {
    pub mode: OutputMode,
    pub supports_emoji: bool,
}

const CI_KEYS: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "BUILD_NUMBER",
    "RUN_ID",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "JENKINS_HOME",
    "BUILDKITE",
    "CIRCLECI",
    "TRAVIS",
    "TEAMCITY_VERSION",
];

impl OutputContext {
    pub fn interactive() -> Self {
        Self {
            mode: OutputMode::Interactive,
            supports_emoji: true,
        }
    }

    pub fn plain() -> Self {
        Self {
            mode: OutputMode::Plain,
            supports_emoji: true,
        }
    }

    /// Detect from the real process environment and stdout
    pub fn detect() -> Self {
        Self::detect_impl(
            |key| std::env::var(key).ok(),
            console::Term::stdout().is_term(),
            std::env::consts::OS,
        )
    }

    pub(crate) fn detect_impl(
        get_env: impl Fn(&str) -> Option<String>,
        is_tty: bool,
        platform: &str,
    ) -> Self {
        let is_ci = is_ci_env(&get_env);
        let mode = if is_tty && !is_ci {
            OutputMode::Interactive
        } else {
            OutputMode::Plain
        };
        let supports_emoji = platform != "windows"
            || is_ci
            || get_env("TERM").as_deref() == Some("xterm-256color");

        tracing::debug!(?mode, supports_emoji, is_ci, is_tty, "detected output context");
        Self {
            mode,
            supports_emoji,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == OutputMode::Interactive
    }
}

fn is_ci_env(get_env: &impl Fn(&str) -> Option<String>) -> bool {
    if get_env("CI").is_some_and(|v| v.eq_ignore_ascii_case("false")) {
        return false;
    }
    CI_KEYS.iter().any(|k| get_env(k).is_some())
}
