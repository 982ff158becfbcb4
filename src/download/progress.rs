//! Progress bars for data file transfers.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::constants::PROGRESS_TICK_MS;

/// Whether transfers draw a progress bar on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// No output; used for small files, quiet runs and tests.
    #[default]
    Hidden,
    /// Byte progress bar, or a spinner when the length is unknown.
    Bar,
}

impl ProgressMode {
    /// Picks a mode from terminal capabilities and user flags.
    #[must_use]
    pub fn detect(stderr_is_terminal: bool, disabled: bool, dumb_terminal: bool) -> Self {
        if stderr_is_terminal && !disabled && !dumb_terminal {
            Self::Bar
        } else {
            Self::Hidden
        }
    }

    /// Creates the bar for one transfer.
    #[must_use]
    pub fn bar(self, label: &str, content_length: Option<u64>) -> ProgressBar {
        match self {
            Self::Hidden => ProgressBar::hidden(),
            Self::Bar => match content_length {
                Some(total) => {
                    let bar = ProgressBar::new(total);
                    bar.set_style(
                        ProgressStyle::with_template(
                            "{msg} [{bar:30}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                        )
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=> "),
                    );
                    bar.set_message(label.to_string());
                    bar
                }
                None => {
                    let spinner = ProgressBar::new_spinner();
                    spinner.set_style(
                        ProgressStyle::with_template("{spinner} {msg} {bytes}")
                            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                    );
                    spinner.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
                    spinner.set_message(label.to_string());
                    spinner
                }
            },
        }
    }
}
