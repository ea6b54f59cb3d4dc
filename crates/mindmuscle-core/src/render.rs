use crate::derive::calculate_progress;
use crate::record::{Goal, PersonalRecord, Priority, StudyTopic};
use crate::views::StudySummary;

pub fn render_pr_line(index: usize, pr: &PersonalRecord, unit: &str) -> String {
    let date = if pr.date.is_empty() {
        String::new()
    } else {
        format!(" on {}", pr.date)
    };
    format!("{}. {} - {} {}{}", index, pr.exercise, pr.weight, unit, date)
}

/// Percent as a whole number, the way the progress bar label shows it.
pub fn format_progress(progress: f64) -> String {
    format!("{:.0}%", progress)
}

pub fn render_goal_line(index: usize, goal: &Goal, unit: &str) -> String {
    let progress = calculate_progress(goal.current, goal.target);
    format!(
        "{}. {} (Exercise: {}) | Target: {} {} by {} | Current Best PR: {} {} | {}",
        index,
        goal.name,
        goal.exercise,
        goal.target,
        unit,
        goal.due_date,
        goal.current,
        unit,
        format_progress(progress)
    )
}

pub fn render_topic_line(index: usize, topic: &StudyTopic) -> String {
    let mark = if topic.is_completed { "[x]" } else { "[ ]" };
    let completed = topic
        .date_completed
        .as_deref()
        .map(|date| format!(" (Completed: {})", date))
        .unwrap_or_default();
    format!(
        "{}. {} {} ({}) - Priority: {} | Added: {}{}",
        index, mark, topic.topic_name, topic.subject, topic.priority, topic.date_added, completed
    )
}

pub fn render_study_summary(summary: &StudySummary) -> String {
    let by_priority: Vec<String> = Priority::ALL
        .iter()
        .map(|priority| format!("{}: {}", priority, summary.pending_for(*priority)))
        .collect();
    format!(
        "Topics: {} | Completed: {} | Pending: {}\nPending by Priority: {}",
        summary.total,
        summary.completed,
        summary.pending,
        by_priority.join(" | ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pr_line_omits_missing_date() {
        let pr = PersonalRecord {
            exercise: "Bench".to_string(),
            weight: 82.5,
            date: String::new(),
        };
        assert_eq!(render_pr_line(0, &pr, "kg"), "0. Bench - 82.5 kg");
        let dated = PersonalRecord {
            date: "2024-01-01".to_string(),
            ..pr
        };
        assert_eq!(render_pr_line(3, &dated, "lb"), "3. Bench - 82.5 lb on 2024-01-01");
    }

    #[test]
    fn goal_line_rounds_progress() {
        let goal = Goal {
            name: "Bench Strength".to_string(),
            exercise: "Bench".to_string(),
            target: 120.0,
            current: 80.0,
            due_date: "2024-06-01".to_string(),
        };
        let line = render_goal_line(0, &goal, "kg");
        assert!(line.ends_with("| 67%"), "{line}");
        assert!(line.contains("Target: 120 kg by 2024-06-01"));
    }

    #[test]
    fn topic_line_shows_completion() {
        let mut topic = StudyTopic::new(
            "Algebra".to_string(),
            "Math".to_string(),
            Priority::High,
            "2024-01-01",
        );
        assert_eq!(
            render_topic_line(0, &topic),
            "0. [ ] Algebra (Math) - Priority: High | Added: 2024-01-01"
        );
        topic.set_completed(true, "2024-02-01");
        assert!(render_topic_line(0, &topic).ends_with("(Completed: 2024-02-01)"));
    }

    #[test]
    fn summary_lists_every_priority() {
        let summary = StudySummary {
            total: 3,
            completed: 1,
            pending: 2,
            pending_high: 2,
            pending_medium: 0,
            pending_low: 0,
        };
        assert_eq!(
            render_study_summary(&summary),
            "Topics: 3 | Completed: 1 | Pending: 2\nPending by Priority: High: 2 | Medium: 0 | Low: 0"
        );
    }
}
