use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::collections::{load_collection, persist_collection};
use crate::config::Settings;
use crate::derive::recompute_goal_progress;
use crate::error::{Outcome, ValidationError};
use crate::goal_ops::{self, GoalForm, GoalInput};
use crate::pr_ops::{self, PrInput};
use crate::prompt::Prompter;
use crate::record::{
    today, Goal, PersonalRecord, StudyTopic, GOALS_KEY, PRS_KEY, STUDY_TOPICS_KEY,
};
use crate::store::KeyValueStore;
use crate::study_ops::{self, StudyForm, TopicInput};
use crate::views::{goal_views, GoalView, StudyFilter, StudyProjection, StudySummary};

/// The application state and its single writer.
///
/// Every mutation goes through a method here, runs to completion, writes the
/// touched collections back to the store, restores the goal invariant and
/// refreshes the topic projection.
pub struct Tracker<S: KeyValueStore> {
    store: S,
    prs: Vec<PersonalRecord>,
    goals: Vec<Goal>,
    topics: Vec<StudyTopic>,
    goal_form: GoalForm,
    study_form: StudyForm,
    filter: StudyFilter,
    projection: StudyProjection,
    settings: Settings,
    clock: fn() -> String,
    unsaved: BTreeSet<&'static str>,
}

/// One visible row of the topic list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicRow<'a> {
    pub index: usize,
    #[serde(flatten)]
    pub topic: &'a StudyTopic,
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn open(store: S) -> Self {
        Self::open_with_settings(store, Settings::default())
    }

    pub fn open_with_settings(store: S, settings: Settings) -> Self {
        let prs: Vec<PersonalRecord> = load_collection(&store, PRS_KEY);
        let goals: Vec<Goal> = load_collection(&store, GOALS_KEY);
        let topics: Vec<StudyTopic> = load_collection(&store, STUDY_TOPICS_KEY);
        info!(
            prs = prs.len(),
            goals = goals.len(),
            topics = topics.len(),
            "tracker opened"
        );
        let mut tracker = Self {
            store,
            prs,
            goals,
            topics,
            goal_form: GoalForm::default(),
            study_form: StudyForm::default(),
            filter: StudyFilter::default(),
            projection: StudyProjection::default(),
            settings,
            clock: today,
            unsaved: BTreeSet::new(),
        };
        tracker.refresh_goals();
        tracker.reproject();
        tracker
    }

    /// Replace the date source used for `dateAdded`/`dateCompleted`.
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn prs(&self) -> &[PersonalRecord] {
        &self.prs
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn topics(&self) -> &[StudyTopic] {
        &self.topics
    }

    pub fn goal_views(&self) -> Vec<GoalView<'_>> {
        goal_views(&self.goals)
    }

    pub fn goal_form(&self) -> &GoalForm {
        &self.goal_form
    }

    pub fn study_form(&self) -> &StudyForm {
        &self.study_form
    }

    pub fn filter(&self) -> &StudyFilter {
        &self.filter
    }

    /// Topics passing the active filter, with their collection positions.
    pub fn study_view(&self) -> Vec<TopicRow<'_>> {
        self.projection
            .indices
            .iter()
            .filter_map(|&index| {
                self.topics
                    .get(index)
                    .map(|topic| TopicRow { index, topic })
            })
            .collect()
    }

    pub fn study_summary(&self) -> StudySummary {
        self.projection.summary
    }

    /// Collections whose latest write failed; their changes only live in memory.
    pub fn unsaved(&self) -> Vec<&'static str> {
        self.unsaved.iter().copied().collect()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.unsaved.is_empty()
    }

    pub fn add_pr(
        &mut self,
        input: &PrInput,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, ValidationError> {
        let outcome = pr_ops::add_pr(&mut self.prs, input, prompter)?;
        self.after_pr_change(outcome);
        Ok(outcome)
    }

    pub fn edit_pr(
        &mut self,
        index: usize,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, ValidationError> {
        let outcome = pr_ops::edit_pr(&mut self.prs, index, prompter)?;
        self.after_pr_change(outcome);
        Ok(outcome)
    }

    pub fn delete_pr(
        &mut self,
        index: usize,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, ValidationError> {
        let outcome = pr_ops::delete_pr(&mut self.prs, index, prompter)?;
        self.after_pr_change(outcome);
        Ok(outcome)
    }

    pub fn begin_goal_edit(&mut self, index: usize) -> Result<GoalInput, ValidationError> {
        self.goal_form.begin_edit(&self.goals, index)
    }

    pub fn cancel_goal_edit(&mut self) {
        self.goal_form.cancel();
    }

    /// Add or save, depending on the goal form's mode.
    pub fn submit_goal(
        &mut self,
        input: &GoalInput,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, ValidationError> {
        let outcome = self
            .goal_form
            .submit(&mut self.goals, &self.prs, input, prompter)?;
        if outcome.is_committed() {
            self.persist_goals();
        }
        Ok(outcome)
    }

    pub fn delete_goal(
        &mut self,
        index: usize,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, ValidationError> {
        let outcome = goal_ops::delete_goal(&mut self.goals, index, prompter)?;
        if outcome.is_committed() {
            self.goal_form.note_removal(index);
            self.persist_goals();
        }
        Ok(outcome)
    }

    pub fn begin_topic_edit(&mut self, index: usize) -> Result<TopicInput, ValidationError> {
        self.study_form.begin_edit(&self.topics, index)
    }

    pub fn cancel_topic_edit(&mut self) {
        self.study_form.cancel();
    }

    /// Add or save, depending on the study form's mode.
    pub fn submit_topic(
        &mut self,
        input: &TopicInput,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, ValidationError> {
        let today = (self.clock)();
        let outcome = self.study_form.submit(
            &mut self.topics,
            input,
            &self.settings.subjects,
            &today,
            prompter,
        )?;
        self.after_topic_change(outcome);
        Ok(outcome)
    }

    pub fn set_topic_completed(
        &mut self,
        index: usize,
        completed: bool,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, ValidationError> {
        let today = (self.clock)();
        let outcome =
            study_ops::set_topic_completed(&mut self.topics, index, completed, &today, prompter)?;
        self.after_topic_change(outcome);
        Ok(outcome)
    }

    pub fn delete_topic(
        &mut self,
        index: usize,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, ValidationError> {
        let outcome = study_ops::delete_topic(&mut self.topics, index, prompter)?;
        if outcome.is_committed() {
            self.study_form.note_removal(index);
        }
        self.after_topic_change(outcome);
        Ok(outcome)
    }

    pub fn set_filter(&mut self, filter: StudyFilter) {
        self.filter = filter;
        self.reproject();
    }

    fn after_pr_change(&mut self, outcome: Outcome) {
        if !outcome.is_committed() {
            return;
        }
        self.persist(PRS_KEY);
        self.refresh_goals();
    }

    fn after_topic_change(&mut self, outcome: Outcome) {
        if !outcome.is_committed() {
            return;
        }
        self.persist(STUDY_TOPICS_KEY);
        self.reproject();
    }

    /// Restore `Goal.current` from the PRs; writes only when something moved.
    fn refresh_goals(&mut self) {
        if recompute_goal_progress(&self.prs, &mut self.goals) {
            debug!("goal progress changed");
            self.persist_goals();
        }
    }

    fn persist_goals(&mut self) {
        self.persist(GOALS_KEY);
    }

    fn persist(&mut self, key: &'static str) {
        let saved = match key {
            PRS_KEY => persist_collection(&mut self.store, key, &self.prs),
            GOALS_KEY => persist_collection(&mut self.store, key, &self.goals),
            _ => persist_collection(&mut self.store, key, &self.topics),
        };
        if saved {
            self.unsaved.remove(key);
        } else {
            self.unsaved.insert(key);
        }
    }

    fn reproject(&mut self) {
        self.projection = StudyProjection::compute(&self.topics, &self.filter);
    }
}
