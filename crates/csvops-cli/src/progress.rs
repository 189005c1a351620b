//! Terminal progress bars for long-running commands.

use std::io::{self, IsTerminal};
use std::path::Path;

use csvops_io::{CsvFormat, Progress, count_records};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

const BAR_TEMPLATE: &str = "{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len} {per_sec}";

/// An `indicatif` bar drawn on stderr, or a hidden one.
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    /// A bar that never draws.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// A bar of `len` units labelled with `message`.
    pub fn new(len: u64, message: &str) -> Self {
        let bar = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(message.to_string());
        Self { bar }
    }

    /// A bar over the data records of `input`, or hidden when `enabled` is
    /// false or stderr is not a terminal.
    ///
    /// Counting costs one extra pass over the file. A failed count only
    /// hides the bar; the command reports the real error itself.
    pub fn for_records(
        enabled: bool,
        input: &Path,
        format: &CsvFormat,
        has_header: bool,
        message: &str,
    ) -> Self {
        if !should_draw(enabled) {
            return Self::hidden();
        }
        match count_records(input, format, has_header) {
            Ok(len) => Self::new(len, message),
            Err(error) => {
                debug!(%error, "could not size progress bar");
                Self::hidden()
            }
        }
    }

    /// A bar over `len` items when drawing is enabled.
    pub fn for_items(enabled: bool, len: u64, message: &str) -> Self {
        if should_draw(enabled) {
            Self::new(len, message)
        } else {
            Self::hidden()
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }
}

fn should_draw(enabled: bool) -> bool {
    enabled && io::stderr().is_terminal()
}

impl Progress for TerminalProgress {
    fn advance(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
