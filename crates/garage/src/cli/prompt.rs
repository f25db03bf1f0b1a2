//! Terminal confirmation prompt.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::app::Confirm;

/// Asks yes/no questions on a terminal.
///
/// Anything other than `y` or `yes` (case-insensitive) counts as no,
/// including end of input.
#[derive(Debug)]
pub struct TerminalConfirm<R, W> {
    input: R,
    output: W,
}

impl TerminalConfirm<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr and read answers from stdin.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalConfirm<R, W> {
    /// Prompt on `output` and read answers from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, message: &str) -> io::Result<bool> {
        write!(self.output, "{message} [y/N] ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirm<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        self.ask(message).unwrap_or_else(|e| {
            warn!("Could not read confirmation, treating as no: {}", e);
            false
        })
    }
}
