//! Terminal detection and capability utilities

use is_terminal::IsTerminal;
use std::env;
use std::io::stdout;

/// Check if stdout is connected to an interactive terminal
pub fn is_interactive() -> bool {
    // Check if stdout is a terminal
    if !stdout().is_terminal() {
        return false;
    }

    // Check for CI environments that might have TTY but shouldn't be interactive
    if is_ci_environment() {
        return false;
    }

    true
}

/// Check if the terminal supports ANSI escape codes for colored output
pub fn supports_ansi() -> bool {
    if !is_interactive() {
        return false;
    }

    let term = env::var("TERM").unwrap_or_default();
    if term == "dumb" || term.is_empty() {
        return false;
    }

    true
}

/// Detect if running in a CI environment
fn is_ci_environment() -> bool {
    let ci_vars = [
        "CI",
        "CONTINUOUS_INTEGRATION",
        "JENKINS_URL",
        "GITHUB_ACTIONS",
        "GITLAB_CI",
        "TRAVIS",
        "CIRCLECI",
        "BUILDKITE",
    ];

    ci_vars.iter().any(|var| env::var(var).is_ok())
}
