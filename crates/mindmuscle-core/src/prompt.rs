use std::collections::VecDeque;

/// The presentation side of an interactive transaction.
///
/// Handlers never assume how a question is shown, only that it resolves to
/// confirm/cancel or submitted text/cancel.
pub trait Prompter {
    /// Ask a yes/no question; `false` means cancel.
    fn confirm(&mut self, message: &str) -> bool;
    /// Ask for text with a pre-filled default; `None` means cancel.
    fn input(&mut self, message: &str, default: &str) -> Option<String>;
    /// Show a message that only needs acknowledging.
    fn info(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm(bool),
    Text(Option<String>),
}

/// Replays queued answers and records every message it was shown.
///
/// An exhausted queue cancels, so a script that is too short can never
/// commit a transaction by accident.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub confirmations: Vec<String>,
    pub inputs: Vec<String>,
    pub infos: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirming() -> Self {
        Self::new().then_confirm(true)
    }

    pub fn then_confirm(mut self, yes: bool) -> Self {
        self.answers.push_back(Answer::Confirm(yes));
        self
    }

    pub fn then_input(mut self, text: &str) -> Self {
        self.answers.push_back(Answer::Text(Some(text.to_string())));
        self
    }

    pub fn then_cancel_input(mut self) -> Self {
        self.answers.push_back(Answer::Text(None));
        self
    }

    pub fn last_info(&self) -> Option<&str> {
        self.infos.last().map(|s| s.as_str())
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        match self.answers.pop_front() {
            Some(Answer::Confirm(yes)) => yes,
            _ => false,
        }
    }

    fn input(&mut self, message: &str, _default: &str) -> Option<String> {
        self.inputs.push(message.to_string());
        match self.answers.pop_front() {
            Some(Answer::Text(text)) => text,
            _ => None,
        }
    }

    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }
}
