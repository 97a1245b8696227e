//! Interactive app selection
//!
//! A numbered menu over the app catalog, read from any `BufRead` so the
//! binary can use stdin and tests can use a byte slice.

use crate::config::AppEntry;
use crate::ConfigError;
use std::io::{self, BufRead, Write};

/// Builds the one-line menu, e.g. `1.Burnfit  2.Fleek`
pub fn menu_line(apps: &[AppEntry]) -> String {
    apps.iter()
        .enumerate()
        .map(|(i, app)| format!("{}.{}", i + 1, capitalize(&app.name)))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Resolves a 1-based menu choice
pub fn select_app<'a>(apps: &'a [AppEntry], choice: &str) -> Result<&'a AppEntry, ConfigError> {
    choice
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n >= 1)
        .and_then(|n| apps.get(n - 1))
        .ok_or_else(|| {
            ConfigError::UnknownApp(format!(
                "'{}': enter a number between 1 and {}",
                choice.trim(),
                apps.len()
            ))
        })
}

/// Prints the menu, reads one line and returns the chosen app
pub fn prompt_for_app<'a, R: BufRead, W: Write>(
    apps: &'a [AppEntry],
    mut input: R,
    mut output: W,
) -> Result<&'a AppEntry, ConfigError> {
    write!(
        output,
        "Please specify the number for app crawling. {}:  ",
        menu_line(apps)
    )?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    select_app(apps, &line)
}

/// Prompts on the process's stdin/stdout
pub fn prompt_stdin(apps: &[AppEntry]) -> Result<&AppEntry, ConfigError> {
    prompt_for_app(apps, io::stdin().lock(), io::stdout())
}

/// Upper-cases the first character of an app name, e.g. `fleek` -> `Fleek`
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
