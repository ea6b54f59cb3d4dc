use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use mindmuscle_core::prompt::Prompter;

/// Typing this at a text prompt submits an empty answer instead of the default.
pub const CLEAR_ANSWER: &str = "-";

/// Asks questions on stderr and reads answers from `input`, one line each.
///
/// Answers given up front (e.g. `--weight`) are consumed before any line is
/// read. End of input cancels.
pub struct TerminalPrompter<R: BufRead> {
    input: R,
    assume_yes: bool,
    preset: VecDeque<String>,
}

impl TerminalPrompter<io::StdinLock<'static>> {
    pub fn stdin(assume_yes: bool) -> Self {
        Self::new(io::stdin().lock(), assume_yes)
    }
}

impl<R: BufRead> TerminalPrompter<R> {
    pub fn new(input: R, assume_yes: bool) -> Self {
        Self {
            input,
            assume_yes,
            preset: VecDeque::new(),
        }
    }

    /// Queue answers for the next text prompts.
    pub fn queue_answers(&mut self, answers: impl IntoIterator<Item = String>) {
        self.preset.extend(answers);
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead> Prompter for TerminalPrompter<R> {
    fn confirm(&mut self, message: &str) -> bool {
        let mut err = io::stderr();
        if self.assume_yes {
            let _ = writeln!(err, "{} [y/N] y", message);
            return true;
        }
        let _ = write!(err, "{} [y/N] ", message);
        let _ = err.flush();
        match self.read_line() {
            Some(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }

    fn input(&mut self, message: &str, default: &str) -> Option<String> {
        if let Some(answer) = self.preset.pop_front() {
            return Some(answer);
        }
        let mut err = io::stderr();
        let _ = write!(err, "{} [{}] ", message, default);
        let _ = err.flush();
        let answer = self.read_line()?;
        let answer = answer.trim();
        if answer.is_empty() {
            Some(default.to_string())
        } else if answer == CLEAR_ANSWER {
            Some(String::new())
        } else {
            Some(answer.to_string())
        }
    }

    fn info(&mut self, message: &str) {
        println!("{}", message);
    }
}
