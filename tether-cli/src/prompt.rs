//! Interactive prompts
//!
//! Every question the reconciler asks goes through [`Prompter`], so decisions
//! can be driven by scripted answers instead of a terminal.

use colored::*;
use std::io::{self, BufRead, Stdout, StdinLock, Write};
use thiserror::Error;

/// Errors raised while prompting
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input closed before an answer was given")]
    Closed,

    #[error("nothing to choose from for \"{0}\"")]
    NoOptions(String),

    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PromptError>;

/// Capability to ask the operator questions
pub trait Prompter {
    /// Presents `options` and returns the index of the selected one
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize>;

    /// Asks a yes/no question; anything but an explicit yes is a no
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Reads a single line of free text, trimmed
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Line-based prompter over any reader/writer pair
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    /// Prompter bound to the process stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn next_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        if options.is_empty() {
            return Err(PromptError::NoOptions(prompt.to_string()));
        }

        writeln!(self.output, "{}", prompt.bold())?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  [{}] {}", (i + 1).to_string().cyan(), option)?;
        }

        loop {
            write!(self.output, "Your choice [1-{}]: ", options.len())?;
            self.output.flush()?;

            let answer = self.next_line()?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(self.output, "{}", format!("Invalid choice '{}'", answer).red())?,
            }
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        loop {
            write!(self.output, "{} [y/N]: ", prompt)?;
            self.output.flush()?;

            match self.next_line()?.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                other => writeln!(self.output, "{}", format!("Please answer y or n, not '{}'", other).red())?,
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;
        self.next_line()
    }
}
