//! Progress spinners for commands that wait on the chain.

use std::future::Future;
use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

use crate::output::OutputFormat;

/// Create a spinner progress bar with a message.
///
/// The spinner animates while waiting for an operation to complete.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Create a hidden progress bar (no-op).
///
/// Use this when running in non-interactive mode or JSON output.
pub fn hidden() -> ProgressBar {
    ProgressBar::hidden()
}

/// Spinner for human output on a terminal, hidden otherwise.
pub fn for_format(format: OutputFormat, enabled: bool, msg: &str) -> ProgressBar {
    if enabled && format == OutputFormat::Human && std::io::stderr().is_terminal() {
        spinner(msg)
    } else {
        hidden()
    }
}

/// Run an async operation with a spinner, returning the result.
///
/// The spinner is cleared on completion, success or not.
pub async fn with_spinner<F, T>(pb: ProgressBar, fut: F) -> T
where
    F: Future<Output = T>,
{
    let result = fut.await;
    pb.finish_and_clear();
    result
}
