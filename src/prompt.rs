//! Overwrite confirmation for `interactive` copies.

use crate::error::{Error, Result};
use std::io::{self, BufRead, BufReader, IsTerminal, Stdin, Write};

/// Source of yes/no answers.
pub trait Prompt {
    /// Write `question` to `err` and return whether the answer was yes.
    ///
    /// # Errors
    ///
    /// [`Error::UserCancelled`] if no answer could be read.
    fn confirm(&mut self, err: &mut dyn Write, question: &str) -> Result<bool>;
}

/// Reads answers line by line; anything starting with `y` or `Y` is yes.
///
/// When the input is not a terminal nothing is read and every question is
/// answered "no", so scripted runs never block on stdin.
#[derive(Debug)]
pub struct TerminalPrompt<R = BufReader<Stdin>> {
    input: R,
    interactive: bool,
}

impl TerminalPrompt {
    /// Prompt on the process's standard input.
    #[must_use]
    pub fn stdin() -> Self {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        Self {
            input: BufReader::new(stdin),
            interactive,
        }
    }
}

impl<R: BufRead> TerminalPrompt<R> {
    /// Prompt on an arbitrary reader.
    pub fn from_reader(input: R, interactive: bool) -> Self {
        Self { input, interactive }
    }
}

impl<R: BufRead> Prompt for TerminalPrompt<R> {
    fn confirm(&mut self, err: &mut dyn Write, question: &str) -> Result<bool> {
        let _ = write!(err, "{question}");
        let _ = err.flush();

        if !self.interactive {
            let _ = writeln!(err);
            return Ok(false);
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) => Ok(false),
            Ok(_) => Ok(matches!(answer.trim_start().chars().next(), Some('y' | 'Y'))),
            Err(_) => Err(Error::UserCancelled),
        }
    }
}

/// Gives the same answer to every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl FixedAnswer {
    /// Always yes.
    #[must_use]
    pub fn yes() -> Self {
        Self(true)
    }

    /// Always no.
    #[must_use]
    pub fn no() -> Self {
        Self(false)
    }
}

impl Prompt for FixedAnswer {
    fn confirm(&mut self, err: &mut dyn Write, question: &str) -> Result<bool> {
        let _ = writeln!(err, "{question}{}", if self.0 { "y" } else { "n" });
        Ok(self.0)
    }
}
