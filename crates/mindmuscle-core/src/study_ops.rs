use tracing::debug;

use crate::collections::{check_index, remove_at};
use crate::error::{Outcome, ValidationError};
use crate::form::FormMode;
use crate::prompt::Prompter;
use crate::record::{Priority, StudyTopic};

pub const COLLECTION: &str = "study topic";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicInput {
    pub topic_name: String,
    pub subject: String,
    pub priority: String,
}

impl TopicInput {
    pub fn new(topic_name: &str, subject: &str, priority: &str) -> Self {
        Self {
            topic_name: topic_name.to_string(),
            subject: subject.to_string(),
            priority: priority.to_string(),
        }
    }

    pub fn from_topic(topic: &StudyTopic) -> Self {
        Self {
            topic_name: topic.topic_name.clone(),
            subject: topic.subject.clone(),
            priority: topic.priority.to_string(),
        }
    }
}

struct ValidTopic {
    topic_name: String,
    subject: String,
    priority: Priority,
}

/// `subjects` is the configured subject list; empty accepts any subject.
fn validate(input: &TopicInput, subjects: &[String]) -> Result<ValidTopic, ValidationError> {
    let topic_name = input.topic_name.trim();
    let subject = input.subject.trim();
    let priority = input.priority.trim();
    if topic_name.is_empty() || subject.is_empty() || priority.is_empty() {
        return Err(ValidationError::MissingTopicFields);
    }
    let priority: Priority = priority
        .parse()
        .map_err(|_| ValidationError::InvalidPriority(input.priority.clone()))?;
    if !subjects.is_empty() && !subjects.iter().any(|s| s == subject) {
        return Err(ValidationError::UnknownSubject {
            subject: subject.to_string(),
            allowed: subjects.join(", "),
        });
    }
    Ok(ValidTopic {
        topic_name: topic_name.to_string(),
        subject: subject.to_string(),
        priority,
    })
}

pub fn add_topic(
    topics: &mut Vec<StudyTopic>,
    input: &TopicInput,
    subjects: &[String],
    today: &str,
    prompter: &mut dyn Prompter,
) -> Result<Outcome, ValidationError> {
    let valid = validate(input, subjects)?;
    debug!(topic = %valid.topic_name, subject = %valid.subject, "study topic added");
    topics.push(StudyTopic::new(
        valid.topic_name,
        valid.subject,
        valid.priority,
        today,
    ));
    prompter.info("New study topic added successfully!");
    Ok(Outcome::Committed)
}

/// Name, subject and priority only; completion is left exactly as it was.
pub fn edit_topic(
    topics: &mut [StudyTopic],
    index: usize,
    input: &TopicInput,
    subjects: &[String],
    prompter: &mut dyn Prompter,
) -> Result<Outcome, ValidationError> {
    check_index(topics, index, COLLECTION)?;
    let valid = validate(input, subjects)?;
    let topic = &mut topics[index];
    topic.topic_name = valid.topic_name;
    topic.subject = valid.subject;
    topic.priority = valid.priority;
    debug!(index, topic = %topic.topic_name, "study topic updated");
    prompter.info("Study topic updated successfully!");
    Ok(Outcome::Committed)
}

pub fn set_topic_completed(
    topics: &mut [StudyTopic],
    index: usize,
    completed: bool,
    today: &str,
    prompter: &mut dyn Prompter,
) -> Result<Outcome, ValidationError> {
    check_index(topics, index, COLLECTION)?;
    let topic = &mut topics[index];
    topic.set_completed(completed, today);
    debug!(index, topic = %topic.topic_name, completed, "study topic completion changed");
    prompter.info(&format!(
        "Topic \"{}\" marked as {}.",
        topic.topic_name,
        if completed { "completed" } else { "pending" }
    ));
    Ok(Outcome::Committed)
}

pub fn delete_topic(
    topics: &mut Vec<StudyTopic>,
    index: usize,
    prompter: &mut dyn Prompter,
) -> Result<Outcome, ValidationError> {
    check_index(topics, index, COLLECTION)?;
    if !prompter.confirm("Delete this study topic?") {
        return Ok(Outcome::Aborted);
    }
    let removed = remove_at(topics, index, COLLECTION)?;
    debug!(index, topic = %removed.topic_name, "study topic deleted");
    Ok(Outcome::Committed)
}

#[derive(Debug, Clone, Default)]
pub struct StudyForm {
    mode: FormMode,
}

impl StudyForm {
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Idle => "Add Topic",
            FormMode::Editing(_) => "Update Topic",
        }
    }

    pub fn begin_edit(
        &mut self,
        topics: &[StudyTopic],
        index: usize,
    ) -> Result<TopicInput, ValidationError> {
        check_index(topics, index, COLLECTION)?;
        self.mode = FormMode::Editing(index);
        Ok(TopicInput::from_topic(&topics[index]))
    }

    pub fn cancel(&mut self) {
        self.mode = FormMode::Idle;
    }

    pub fn note_removal(&mut self, index: usize) {
        self.mode = self.mode.after_removal(index);
    }

    pub fn submit(
        &mut self,
        topics: &mut Vec<StudyTopic>,
        input: &TopicInput,
        subjects: &[String],
        today: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, ValidationError> {
        match self.mode {
            FormMode::Idle => add_topic(topics, input, subjects, today, prompter),
            FormMode::Editing(index) => {
                let outcome = edit_topic(topics, index, input, subjects, prompter)?;
                self.mode = FormMode::Idle;
                Ok(outcome)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::prompt::ScriptedPrompter;

    fn subjects() -> Vec<String> {
        vec!["Math".to_string(), "History".to_string()]
    }

    #[test]
    fn add_sets_creation_fields() {
        let mut topics = Vec::new();
        let mut prompter = ScriptedPrompter::new();
        add_topic(
            &mut topics,
            &TopicInput::new(" Algebra ", "Math", "High"),
            &subjects(),
            "2024-03-01",
            &mut prompter,
        )
        .expect("add");
        assert_eq!(
            topics,
            vec![StudyTopic {
                topic_name: "Algebra".to_string(),
                subject: "Math".to_string(),
                priority: Priority::High,
                date_added: "2024-03-01".to_string(),
                date_completed: None,
                is_completed: false,
            }]
        );
    }

    #[test]
    fn add_validates_fields_and_subject_list() {
        let mut topics = Vec::new();
        let mut prompter = ScriptedPrompter::new();
        let missing = add_topic(
            &mut topics,
            &TopicInput::new("Algebra", "", "High"),
            &subjects(),
            "2024-03-01",
            &mut prompter,
        )
        .expect_err("missing");
        assert_eq!(missing, ValidationError::MissingTopicFields);

        let priority = add_topic(
            &mut topics,
            &TopicInput::new("Algebra", "Math", "Urgent"),
            &subjects(),
            "2024-03-01",
            &mut prompter,
        )
        .expect_err("priority");
        assert_eq!(priority, ValidationError::InvalidPriority("Urgent".to_string()));

        let subject = add_topic(
            &mut topics,
            &TopicInput::new("Algebra", "Art", "High"),
            &subjects(),
            "2024-03-01",
            &mut prompter,
        )
        .expect_err("subject");
        assert!(matches!(subject, ValidationError::UnknownSubject { .. }));
        assert!(topics.is_empty());

        add_topic(
            &mut topics,
            &TopicInput::new("Algebra", "Art", "High"),
            &[],
            "2024-03-01",
            &mut prompter,
        )
        .expect("any subject without a list");
        assert_eq!(topics.len(), 1);
    }

    #[test]
    fn edit_leaves_completion_alone() {
        let mut topics = vec![StudyTopic::new(
            "Algebra".to_string(),
            "Math".to_string(),
            Priority::High,
            "2024-03-01",
        )];
        let mut prompter = ScriptedPrompter::new();
        set_topic_completed(&mut topics, 0, true, "2024-03-05", &mut prompter).expect("toggle");
        edit_topic(
            &mut topics,
            0,
            &TopicInput::new("Linear Algebra", "Math", "low"),
            &subjects(),
            &mut prompter,
        )
        .expect("edit");
        let topic = &topics[0];
        assert_eq!(topic.topic_name, "Linear Algebra");
        assert_eq!(topic.priority, Priority::Low);
        assert!(topic.is_completed);
        assert_eq!(topic.date_completed.as_deref(), Some("2024-03-05"));
        assert_eq!(topic.date_added, "2024-03-01");
    }

    #[test]
    fn toggle_sets_and_clears_completion_date() {
        let mut topics = vec![StudyTopic::new(
            "Algebra".to_string(),
            "Math".to_string(),
            Priority::High,
            "2024-03-01",
        )];
        let mut prompter = ScriptedPrompter::new();
        set_topic_completed(&mut topics, 0, true, "2024-03-05", &mut prompter).expect("done");
        assert_eq!(prompter.last_info(), Some("Topic \"Algebra\" marked as completed."));
        assert_eq!(topics[0].date_completed.as_deref(), Some("2024-03-05"));

        set_topic_completed(&mut topics, 0, false, "2024-03-06", &mut prompter).expect("undo");
        assert_eq!(prompter.last_info(), Some("Topic \"Algebra\" marked as pending."));
        assert!(!topics[0].is_completed);
        assert_eq!(topics[0].date_completed, None);
    }

    #[test]
    fn form_edit_then_back_to_idle() {
        let mut topics = Vec::new();
        let mut form = StudyForm::default();
        let mut prompter = ScriptedPrompter::new();
        form.submit(
            &mut topics,
            &TopicInput::new("Algebra", "Math", "High"),
            &subjects(),
            "2024-03-01",
            &mut prompter,
        )
        .expect("add");
        let mut prefill = form.begin_edit(&topics, 0).expect("begin");
        assert_eq!(form.submit_label(), "Update Topic");
        prefill.subject = "History".to_string();
        form.submit(&mut topics, &prefill, &subjects(), "2024-03-09", &mut prompter)
            .expect("edit");
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].subject, "History");
        assert_eq!(topics[0].date_added, "2024-03-01");
        assert_eq!(form.mode(), FormMode::Idle);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut topics = vec![
            StudyTopic::new("A".to_string(), "Math".to_string(), Priority::High, "2024-03-01"),
            StudyTopic::new("B".to_string(), "Math".to_string(), Priority::Low, "2024-03-01"),
        ];
        let mut no = ScriptedPrompter::new().then_confirm(false);
        assert_eq!(delete_topic(&mut topics, 1, &mut no).expect("delete"), Outcome::Aborted);
        let mut yes = ScriptedPrompter::confirming();
        assert_eq!(delete_topic(&mut topics, 0, &mut yes).expect("delete"), Outcome::Committed);
        assert_eq!(topics[0].topic_name, "B");
    }
}
