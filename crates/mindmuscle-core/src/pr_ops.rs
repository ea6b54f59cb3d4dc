use tracing::debug;

use crate::collections::{check_index, remove_at};
use crate::error::{Outcome, ValidationError};
use crate::prompt::Prompter;
use crate::record::{is_iso_date, same_exercise, PersonalRecord};

pub const COLLECTION: &str = "personal record";

/// Raw form values for a new personal record.
#[derive(Debug, Clone, Default)]
pub struct PrInput {
    pub exercise: String,
    pub weight: String,
    pub date: String,
}

impl PrInput {
    pub fn new(exercise: &str, weight: &str, date: &str) -> Self {
        Self {
            exercise: exercise.to_string(),
            weight: weight.to_string(),
            date: date.to_string(),
        }
    }
}

pub fn parse_weight(raw: &str) -> Result<f64, ValidationError> {
    let weight: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidWeight(raw.to_string()))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(ValidationError::InvalidWeight(raw.to_string()));
    }
    Ok(weight)
}

/// Empty means "no date".
pub fn parse_pr_date(raw: &str) -> Result<String, ValidationError> {
    let date = raw.trim();
    if date.is_empty() || is_iso_date(date) {
        Ok(date.to_string())
    } else {
        Err(ValidationError::InvalidPrDate(raw.to_string()))
    }
}

pub fn add_pr(
    prs: &mut Vec<PersonalRecord>,
    input: &PrInput,
    prompter: &mut dyn Prompter,
) -> Result<Outcome, ValidationError> {
    let exercise = input.exercise.trim();
    if exercise.is_empty() || input.weight.trim().is_empty() {
        return Err(ValidationError::MissingPrFields);
    }
    let weight = parse_weight(&input.weight)?;
    let date = parse_pr_date(&input.date)?;

    let exact_duplicate = prs.iter().any(|pr| {
        same_exercise(&pr.exercise, exercise) && pr.weight == weight && pr.date == date
    });
    if exact_duplicate {
        return Err(ValidationError::DuplicatePr);
    }

    let better = prs
        .iter()
        .find(|pr| same_exercise(&pr.exercise, exercise) && pr.weight > weight)
        .map(|pr| pr.weight);
    if let Some(better) = better {
        let question = format!(
            "You already have a PR for \"{}\" of {}kg. Do you still want to add this {}kg PR?",
            exercise, better, weight
        );
        if !prompter.confirm(&question) {
            prompter.info("PR not added.");
            return Ok(Outcome::Aborted);
        }
    }

    prs.push(PersonalRecord {
        exercise: exercise.to_string(),
        weight,
        date,
    });
    debug!(exercise, weight, "personal record added");
    prompter.info(if better.is_some() {
        "New PR entry added."
    } else {
        "New PR added successfully!"
    });
    Ok(Outcome::Committed)
}

/// Where a two-step PR edit currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum PrEditStep {
    AwaitingWeight,
    AwaitingDate { weight: f64 },
    Committed { weight: f64, date: String },
    Aborted,
}

/// Short-lived state machine for editing one record: weight first, then date.
/// Nothing is written to the record until both answers are in.
#[derive(Debug, Clone)]
pub struct PrEdit {
    index: usize,
    step: PrEditStep,
}

impl PrEdit {
    pub fn begin(prs: &[PersonalRecord], index: usize) -> Result<Self, ValidationError> {
        check_index(prs, index, COLLECTION)?;
        Ok(Self {
            index,
            step: PrEditStep::AwaitingWeight,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step(&self) -> &PrEditStep {
        &self.step
    }

    /// The question for the current step with its pre-filled answer, or
    /// `None` once the edit has finished.
    pub fn question(&self, current: &PersonalRecord) -> Option<(&'static str, String)> {
        match &self.step {
            PrEditStep::AwaitingWeight => {
                Some(("Update PR Weight (kg):", current.weight.to_string()))
            }
            PrEditStep::AwaitingDate { .. } => Some((
                "Update PR Date (YYYY-MM-DD, optional):",
                current.date.clone(),
            )),
            PrEditStep::Committed { .. } | PrEditStep::Aborted => None,
        }
    }

    /// Feed the answer to the current question; `None` cancels.
    ///
    /// An invalid answer aborts the edit and returns the validation error.
    pub fn answer(&mut self, answer: Option<&str>) -> Result<(), ValidationError> {
        let Some(answer) = answer else {
            self.step = PrEditStep::Aborted;
            return Ok(());
        };
        let next = match &self.step {
            PrEditStep::AwaitingWeight => match parse_weight(answer) {
                Ok(weight) => PrEditStep::AwaitingDate { weight },
                Err(err) => {
                    self.step = PrEditStep::Aborted;
                    return Err(err);
                }
            },
            PrEditStep::AwaitingDate { weight } => match parse_pr_date(answer) {
                Ok(date) => PrEditStep::Committed {
                    weight: *weight,
                    date,
                },
                Err(err) => {
                    self.step = PrEditStep::Aborted;
                    return Err(err);
                }
            },
            PrEditStep::Committed { .. } | PrEditStep::Aborted => return Ok(()),
        };
        self.step = next;
        Ok(())
    }
}

pub fn edit_pr(
    prs: &mut [PersonalRecord],
    index: usize,
    prompter: &mut dyn Prompter,
) -> Result<Outcome, ValidationError> {
    let mut edit = PrEdit::begin(prs, index)?;
    while let Some((message, default)) = edit.question(&prs[index]) {
        let answer = prompter.input(message, &default);
        edit.answer(answer.as_deref())?;
    }
    match edit.step {
        PrEditStep::Committed { weight, date } => {
            let pr = &mut prs[index];
            pr.weight = weight;
            pr.date = date;
            debug!(index, exercise = %pr.exercise, weight, "personal record updated");
            prompter.info("PR updated successfully!");
            Ok(Outcome::Committed)
        }
        _ => Ok(Outcome::Aborted),
    }
}

pub fn delete_pr(
    prs: &mut Vec<PersonalRecord>,
    index: usize,
    prompter: &mut dyn Prompter,
) -> Result<Outcome, ValidationError> {
    check_index(prs, index, COLLECTION)?;
    if !prompter.confirm("Delete this Personal Record?") {
        return Ok(Outcome::Aborted);
    }
    let removed = remove_at(prs, index, COLLECTION)?;
    debug!(index, exercise = %removed.exercise, "personal record deleted");
    Ok(Outcome::Committed)
}
