use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key for the personal record collection.
pub const PRS_KEY: &str = "prs";
/// Storage key for the goal collection.
pub const GOALS_KEY: &str = "goals";
/// Storage key for the study topic collection.
pub const STUDY_TOPICS_KEY: &str = "studyTopics";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub exercise: String,
    pub weight: f64,
    /// `YYYY-MM-DD`, or empty when no date was given.
    #[serde(default)]
    pub date: String,
}

impl PersonalRecord {
    pub fn matches_exercise(&self, exercise: &str) -> bool {
        same_exercise(&self.exercise, exercise)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub name: String,
    pub exercise: String,
    pub target: f64,
    /// Best PR weight for `exercise`. Owned by the derivation engine.
    #[serde(default)]
    pub current: f64,
    pub due_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown priority: {0} (expected High, Medium or Low)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(ParsePriorityError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTopic {
    pub topic_name: String,
    pub subject: String,
    pub priority: Priority,
    pub date_added: String,
    /// Set exactly when `is_completed` is true.
    pub date_completed: Option<String>,
    pub is_completed: bool,
}

impl StudyTopic {
    pub fn new(topic_name: String, subject: String, priority: Priority, today: &str) -> Self {
        Self {
            topic_name,
            subject,
            priority,
            date_added: today.to_string(),
            date_completed: None,
            is_completed: false,
        }
    }

    /// Flip completion and its date together.
    pub fn set_completed(&mut self, completed: bool, today: &str) {
        self.is_completed = completed;
        self.date_completed = if completed {
            Some(today.to_string())
        } else {
            None
        };
    }
}

pub fn same_exercise(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Today's date as `YYYY-MM-DD` (UTC).
pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Shape check only; `2024-13-45` passes, like the date inputs it replaces.
pub fn is_iso_date(value: &str) -> bool {
    let re = Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("regex");
    re.is_match(value)
}
