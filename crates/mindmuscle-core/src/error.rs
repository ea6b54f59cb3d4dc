use thiserror::Error;

/// Input rejected before any state changed. The display text is the message
/// shown to the user.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Please fill in the Exercise and Weight fields for the PR.")]
    MissingPrFields,
    #[error("Please enter a valid number for PR weight.")]
    InvalidWeight(String),
    #[error("Please enter a valid date in YYYY-MM-DD format or leave it empty.")]
    InvalidPrDate(String),
    #[error("A PR with the exact same exercise, weight, and date already exists.")]
    DuplicatePr,
    #[error("Please fill in all Goal fields.")]
    MissingGoalFields,
    #[error("Please enter a positive number for the goal target.")]
    InvalidTarget(String),
    #[error("Please enter the goal due date in YYYY-MM-DD format.")]
    InvalidDueDate(String),
    #[error("Please fill in all Topic fields.")]
    MissingTopicFields,
    #[error("Unknown priority: {0} (expected High, Medium or Low)")]
    InvalidPriority(String),
    #[error("Unknown completion filter: {0} (expected All, Completed or Pending)")]
    InvalidCompletionFilter(String),
    #[error("Unknown subject: {subject} (expected one of: {allowed})")]
    UnknownSubject { subject: String, allowed: String },
    #[error("No {collection} entry at index {index} ({len} entries)")]
    NoSuchEntry {
        collection: &'static str,
        index: usize,
        len: usize,
    },
}

/// How an interactive transaction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State was mutated (and a write attempted).
    Committed,
    /// The user declined or cancelled; nothing changed.
    Aborted,
}

impl Outcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed)
    }
}
