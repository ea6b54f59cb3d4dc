use tracing::debug;

use crate::collections::{check_index, remove_at};
use crate::derive::highest_pr;
use crate::error::{Outcome, ValidationError};
use crate::form::FormMode;
use crate::prompt::Prompter;
use crate::record::{is_iso_date, Goal, PersonalRecord};

pub const COLLECTION: &str = "goal";

/// Raw goal form values. `current` is derived, never entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalInput {
    pub name: String,
    pub exercise: String,
    pub target: String,
    pub due_date: String,
}

impl GoalInput {
    pub fn new(name: &str, exercise: &str, target: &str, due_date: &str) -> Self {
        Self {
            name: name.to_string(),
            exercise: exercise.to_string(),
            target: target.to_string(),
            due_date: due_date.to_string(),
        }
    }

    pub fn from_goal(goal: &Goal) -> Self {
        Self {
            name: goal.name.clone(),
            exercise: goal.exercise.clone(),
            target: goal.target.to_string(),
            due_date: goal.due_date.clone(),
        }
    }
}

struct ValidGoal {
    name: String,
    exercise: String,
    target: f64,
    due_date: String,
}

fn validate(input: &GoalInput) -> Result<ValidGoal, ValidationError> {
    let name = input.name.trim();
    let exercise = input.exercise.trim();
    let target_raw = input.target.trim();
    let due_date = input.due_date.trim();
    if name.is_empty() || exercise.is_empty() || target_raw.is_empty() || due_date.is_empty() {
        return Err(ValidationError::MissingGoalFields);
    }
    let target: f64 = target_raw
        .parse()
        .map_err(|_| ValidationError::InvalidTarget(input.target.clone()))?;
    if !target.is_finite() || target <= 0.0 {
        return Err(ValidationError::InvalidTarget(input.target.clone()));
    }
    if !is_iso_date(due_date) {
        return Err(ValidationError::InvalidDueDate(input.due_date.clone()));
    }
    Ok(ValidGoal {
        name: name.to_string(),
        exercise: exercise.to_string(),
        target,
        due_date: due_date.to_string(),
    })
}

pub fn add_goal(
    goals: &mut Vec<Goal>,
    prs: &[PersonalRecord],
    input: &GoalInput,
    prompter: &mut dyn Prompter,
) -> Result<Outcome, ValidationError> {
    let valid = validate(input)?;
    let current = highest_pr(prs, &valid.exercise);
    debug!(name = %valid.name, exercise = %valid.exercise, current, "goal added");
    goals.push(Goal {
        name: valid.name,
        exercise: valid.exercise,
        target: valid.target,
        current,
        due_date: valid.due_date,
    });
    prompter.info("New goal set successfully!");
    Ok(Outcome::Committed)
}

pub fn edit_goal(
    goals: &mut [Goal],
    prs: &[PersonalRecord],
    index: usize,
    input: &GoalInput,
    prompter: &mut dyn Prompter,
) -> Result<Outcome, ValidationError> {
    check_index(goals, index, COLLECTION)?;
    let valid = validate(input)?;
    let goal = &mut goals[index];
    goal.current = highest_pr(prs, &valid.exercise);
    goal.name = valid.name;
    goal.exercise = valid.exercise;
    goal.target = valid.target;
    goal.due_date = valid.due_date;
    debug!(index, name = %goal.name, current = goal.current, "goal updated");
    prompter.info("Goal details updated successfully!");
    Ok(Outcome::Committed)
}

pub fn delete_goal(
    goals: &mut Vec<Goal>,
    index: usize,
    prompter: &mut dyn Prompter,
) -> Result<Outcome, ValidationError> {
    check_index(goals, index, COLLECTION)?;
    if !prompter.confirm("Delete this goal?") {
        return Ok(Outcome::Aborted);
    }
    let removed = remove_at(goals, index, COLLECTION)?;
    debug!(index, name = %removed.name, "goal deleted");
    Ok(Outcome::Committed)
}

/// The goal form: adds while idle, saves over the selected goal while editing.
#[derive(Debug, Clone, Default)]
pub struct GoalForm {
    mode: FormMode,
}

impl GoalForm {
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Idle => "Set Goal",
            FormMode::Editing(_) => "Update Goal",
        }
    }

    /// Switch to editing `index` and hand back its current values to pre-fill.
    pub fn begin_edit(&mut self, goals: &[Goal], index: usize) -> Result<GoalInput, ValidationError> {
        check_index(goals, index, COLLECTION)?;
        self.mode = FormMode::Editing(index);
        Ok(GoalInput::from_goal(&goals[index]))
    }

    pub fn cancel(&mut self) {
        self.mode = FormMode::Idle;
    }

    pub fn note_removal(&mut self, index: usize) {
        self.mode = self.mode.after_removal(index);
    }

    /// Stays in edit mode when validation fails so the user can correct the input.
    pub fn submit(
        &mut self,
        goals: &mut Vec<Goal>,
        prs: &[PersonalRecord],
        input: &GoalInput,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, ValidationError> {
        match self.mode {
            FormMode::Idle => add_goal(goals, prs, input, prompter),
            FormMode::Editing(index) => {
                let outcome = edit_goal(goals, prs, index, input, prompter)?;
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

    fn prs() -> Vec<PersonalRecord> {
        vec![
            PersonalRecord {
                exercise: "Bench".to_string(),
                weight: 80.0,
                date: "2024-01-01".to_string(),
            },
            PersonalRecord {
                exercise: "squat".to_string(),
                weight: 120.0,
                date: String::new(),
            },
        ]
    }

    #[test]
    fn add_derives_current_from_existing_prs() {
        let mut goals = Vec::new();
        let mut prompter = ScriptedPrompter::new();
        let input = GoalInput::new("Bench Strength", "bench", "100", "2024-06-01");
        add_goal(&mut goals, &prs(), &input, &mut prompter).expect("add");
        assert_eq!(goals[0].current, 80.0);
        assert_eq!(goals[0].exercise, "bench");
        assert_eq!(prompter.last_info(), Some("New goal set successfully!"));
    }

    #[test]
    fn add_rejects_missing_or_invalid_fields() {
        let mut goals = Vec::new();
        let mut prompter = ScriptedPrompter::new();
        let cases = [
            (GoalInput::new("", "Bench", "100", "2024-06-01"), ValidationError::MissingGoalFields),
            (GoalInput::new("G", "Bench", "", "2024-06-01"), ValidationError::MissingGoalFields),
            (GoalInput::new("G", "Bench", "100", ""), ValidationError::MissingGoalFields),
            (
                GoalInput::new("G", "Bench", "0", "2024-06-01"),
                ValidationError::InvalidTarget("0".to_string()),
            ),
            (
                GoalInput::new("G", "Bench", "-3", "2024-06-01"),
                ValidationError::InvalidTarget("-3".to_string()),
            ),
            (
                GoalInput::new("G", "Bench", "lots", "2024-06-01"),
                ValidationError::InvalidTarget("lots".to_string()),
            ),
            (
                GoalInput::new("G", "Bench", "100", "June"),
                ValidationError::InvalidDueDate("June".to_string()),
            ),
        ];
        for (input, expected) in cases {
            let err = add_goal(&mut goals, &prs(), &input, &mut prompter).expect_err("invalid");
            assert_eq!(err, expected);
        }
        assert!(goals.is_empty());
    }

    #[test]
    fn edit_recomputes_current_for_new_exercise() {
        let mut goals = Vec::new();
        let mut prompter = ScriptedPrompter::new();
        add_goal(
            &mut goals,
            &prs(),
            &GoalInput::new("Bench Strength", "Bench", "100", "2024-06-01"),
            &mut prompter,
        )
        .expect("add");

        edit_goal(
            &mut goals,
            &prs(),
            0,
            &GoalInput::new("Leg Day", "Squat", "150", "2024-09-01"),
            &mut prompter,
        )
        .expect("edit");
        assert_eq!(
            goals[0],
            Goal {
                name: "Leg Day".to_string(),
                exercise: "Squat".to_string(),
                target: 150.0,
                current: 120.0,
                due_date: "2024-09-01".to_string(),
            }
        );
    }

    #[test]
    fn form_dispatches_on_mode() {
        let mut goals = Vec::new();
        let mut form = GoalForm::default();
        let mut prompter = ScriptedPrompter::new();
        assert_eq!(form.submit_label(), "Set Goal");

        form.submit(
            &mut goals,
            &prs(),
            &GoalInput::new("Bench Strength", "Bench", "100", "2024-06-01"),
            &mut prompter,
        )
        .expect("add");
        assert_eq!(goals.len(), 1);

        let mut prefill = form.begin_edit(&goals, 0).expect("begin");
        assert_eq!(form.mode(), FormMode::Editing(0));
        assert_eq!(form.submit_label(), "Update Goal");
        assert_eq!(prefill.target, "100");
        prefill.target = "110".to_string();

        form.submit(&mut goals, &prs(), &prefill, &mut prompter)
            .expect("edit");
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].target, 110.0);
        assert_eq!(form.mode(), FormMode::Idle);
    }

    #[test]
    fn failed_edit_keeps_form_in_edit_mode() {
        let mut goals = vec![Goal {
            name: "Bench Strength".to_string(),
            exercise: "Bench".to_string(),
            target: 100.0,
            current: 80.0,
            due_date: "2024-06-01".to_string(),
        }];
        let mut form = GoalForm::default();
        let mut prompter = ScriptedPrompter::new();
        form.begin_edit(&goals, 0).expect("begin");
        let err = form
            .submit(&mut goals, &prs(), &GoalInput::default(), &mut prompter)
            .expect_err("invalid");
        assert_eq!(err, ValidationError::MissingGoalFields);
        assert_eq!(form.mode(), FormMode::Editing(0));
        form.cancel();
        assert_eq!(form.mode(), FormMode::Idle);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut goals = vec![
            Goal {
                name: "A".to_string(),
                exercise: "Bench".to_string(),
                target: 100.0,
                current: 80.0,
                due_date: "2024-06-01".to_string(),
            },
            Goal {
                name: "B".to_string(),
                exercise: "Squat".to_string(),
                target: 150.0,
                current: 120.0,
                due_date: "2024-06-01".to_string(),
            },
        ];
        let mut no = ScriptedPrompter::new().then_confirm(false);
        assert_eq!(delete_goal(&mut goals, 0, &mut no).expect("delete"), Outcome::Aborted);
        let mut yes = ScriptedPrompter::confirming();
        assert_eq!(delete_goal(&mut goals, 0, &mut yes).expect("delete"), Outcome::Committed);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].name, "B");
    }
}
