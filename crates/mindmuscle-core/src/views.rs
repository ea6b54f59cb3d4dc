use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::derive::calculate_progress;
use crate::error::ValidationError;
use crate::record::{Goal, Priority, StudyTopic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CompletionFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl CompletionFilter {
    pub fn admits(&self, topic: &StudyTopic) -> bool {
        match self {
            CompletionFilter::All => true,
            CompletionFilter::Completed => topic.is_completed,
            CompletionFilter::Pending => !topic.is_completed,
        }
    }
}

impl fmt::Display for CompletionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompletionFilter::All => "All",
            CompletionFilter::Completed => "Completed",
            CompletionFilter::Pending => "Pending",
        })
    }
}

impl FromStr for CompletionFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "" | "all" => Ok(CompletionFilter::All),
            "completed" => Ok(CompletionFilter::Completed),
            "pending" => Ok(CompletionFilter::Pending),
            _ => Err(format!(
                "Unknown completion filter: {} (expected All, Completed or Pending)",
                value
            )),
        }
    }
}

/// The three independent topic filters. `None` means "All" on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyFilter {
    pub subject: Option<String>,
    pub priority: Option<Priority>,
    pub completion: CompletionFilter,
}

impl StudyFilter {
    /// Build from control values, where `"All"` (or blank) disables an axis.
    pub fn from_controls(
        subject: &str,
        priority: &str,
        completion: &str,
    ) -> Result<Self, ValidationError> {
        let subject = match subject.trim() {
            "" => None,
            s if s.eq_ignore_ascii_case("all") => None,
            s => Some(s.to_string()),
        };
        let priority = match priority.trim() {
            "" => None,
            p if p.eq_ignore_ascii_case("all") => None,
            p => Some(
                p.parse::<Priority>()
                    .map_err(|_| ValidationError::InvalidPriority(p.to_string()))?,
            ),
        };
        let completion = completion
            .parse::<CompletionFilter>()
            .map_err(|_| ValidationError::InvalidCompletionFilter(completion.to_string()))?;
        Ok(Self {
            subject,
            priority,
            completion,
        })
    }

    pub fn admits(&self, topic: &StudyTopic) -> bool {
        if let Some(subject) = &self.subject {
            if &topic.subject != subject {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if topic.priority != priority {
                return false;
            }
        }
        self.completion.admits(topic)
    }
}

/// Topics passing `filter`, in collection order, each with its position in
/// the full collection so handlers can address it.
pub fn filter_topics<'a>(
    topics: &'a [StudyTopic],
    filter: &StudyFilter,
) -> Vec<(usize, &'a StudyTopic)> {
    topics
        .iter()
        .enumerate()
        .filter(|(_, topic)| filter.admits(topic))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StudySummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub pending_high: usize,
    pub pending_medium: usize,
    pub pending_low: usize,
}

impl StudySummary {
    pub fn pending_for(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.pending_high,
            Priority::Medium => self.pending_medium,
            Priority::Low => self.pending_low,
        }
    }
}

pub fn summarize<'a>(topics: impl IntoIterator<Item = &'a StudyTopic>) -> StudySummary {
    let mut summary = StudySummary::default();
    for topic in topics {
        summary.total += 1;
        if topic.is_completed {
            summary.completed += 1;
            continue;
        }
        summary.pending += 1;
        match topic.priority {
            Priority::High => summary.pending_high += 1,
            Priority::Medium => summary.pending_medium += 1,
            Priority::Low => summary.pending_low += 1,
        }
    }
    summary
}

/// Cached result of the last projection: the source positions that passed
/// the active filter, and their summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyProjection {
    pub indices: Vec<usize>,
    pub summary: StudySummary,
}

impl StudyProjection {
    pub fn compute(topics: &[StudyTopic], filter: &StudyFilter) -> Self {
        let visible = filter_topics(topics, filter);
        let summary = summarize(visible.iter().map(|(_, topic)| *topic));
        Self {
            indices: visible.into_iter().map(|(index, _)| index).collect(),
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalView<'a> {
    pub index: usize,
    #[serde(flatten)]
    pub goal: &'a Goal,
    pub progress: f64,
}

pub fn goal_views(goals: &[Goal]) -> Vec<GoalView<'_>> {
    goals
        .iter()
        .enumerate()
        .map(|(index, goal)| GoalView {
            index,
            goal,
            progress: calculate_progress(goal.current, goal.target),
        })
        .collect()
}
