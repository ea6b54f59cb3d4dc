mod logging;
mod prompt;
mod version;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use serde_json::json;

use mindmuscle_core::config::{resolve_data_dir, resolve_settings};
use mindmuscle_core::error::Outcome;
use mindmuscle_core::goal_ops::GoalInput;
use mindmuscle_core::pr_ops::PrInput;
use mindmuscle_core::render::{
    render_goal_line, render_pr_line, render_study_summary, render_topic_line,
};
use mindmuscle_core::store::FileStore;
use mindmuscle_core::study_ops::TopicInput;
use mindmuscle_core::tracker::Tracker;
use mindmuscle_core::views::StudyFilter;

use crate::prompt::TerminalPrompter;

#[derive(Parser)]
#[command(
    name = "mindmuscle",
    version = version::FULL,
    about = "Track personal records, fitness goals and study topics"
)]
struct Cli {
    /// Data directory (default: data_dir from the global config, then $MINDMUSCLE_HOME or ~/.mindmuscle)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Answer yes to every confirmation
    #[arg(long, short = 'y', global = true)]
    yes: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print version information
    Version,
    /// Personal records
    #[command(subcommand)]
    Pr(PrCommand),
    /// Fitness goals
    #[command(subcommand)]
    Goal(GoalCommand),
    /// Study topics
    #[command(subcommand)]
    Study(StudyCommand),
}

#[derive(Subcommand)]
enum PrCommand {
    /// Record a new personal record
    Add {
        exercise: String,
        weight: String,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        date: String,
    },
    /// List personal records
    List {
        #[arg(long)]
        json: bool,
    },
    /// Update weight, then date, of a record (prompts when neither flag is given; "-" at the date prompt clears it)
    Edit {
        index: usize,
        #[arg(long)]
        weight: Option<String>,
        /// YYYY-MM-DD, or "" to clear
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a record
    Delete { index: usize },
}

#[derive(Subcommand)]
enum GoalCommand {
    /// Set a new goal
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        exercise: String,
        #[arg(long)]
        target: String,
        /// YYYY-MM-DD
        #[arg(long)]
        due: String,
    },
    /// List goals with progress
    List {
        #[arg(long)]
        json: bool,
    },
    /// Change goal details; omitted fields keep their current value
    Edit {
        index: usize,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        exercise: Option<String>,
        #[arg(long)]
        target: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Delete a goal
    Delete { index: usize },
}

#[derive(Subcommand)]
enum StudyCommand {
    /// Add a study topic
    Add {
        topic: String,
        #[arg(long)]
        subject: String,
        /// High, Medium or Low
        #[arg(long)]
        priority: String,
    },
    /// List topics passing the filters
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Change topic name, subject or priority; omitted fields keep their current value
    Edit {
        index: usize,
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Mark a topic completed (or pending again with --pending)
    Complete {
        index: usize,
        #[arg(long)]
        pending: bool,
    },
    /// Delete a topic
    Delete { index: usize },
    /// Counts for topics passing the filters
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long, default_value = "All")]
    subject: String,
    /// All, High, Medium or Low
    #[arg(long, default_value = "All")]
    priority: String,
    /// All, Completed or Pending
    #[arg(long, default_value = "All")]
    completion: String,
}

impl FilterArgs {
    fn to_filter(&self) -> Result<StudyFilter> {
        Ok(StudyFilter::from_controls(
            &self.subject,
            &self.priority,
            &self.completion,
        )?)
    }
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    match cli.command {
        None => {
            Cli::command().print_help()?;
            println!();
        }
        Some(Command::Version) => {
            println!("mindmuscle {}", version::FULL);
        }
        Some(Command::Pr(command)) => {
            let (mut tracker, mut prompter) = open(cli.root, cli.yes)?;
            run_pr(&mut tracker, &mut prompter, command)?;
            warn_unsaved(&tracker);
        }
        Some(Command::Goal(command)) => {
            let (mut tracker, mut prompter) = open(cli.root, cli.yes)?;
            run_goal(&mut tracker, &mut prompter, command)?;
            warn_unsaved(&tracker);
        }
        Some(Command::Study(command)) => {
            let (mut tracker, mut prompter) = open(cli.root, cli.yes)?;
            run_study(&mut tracker, &mut prompter, command)?;
            warn_unsaved(&tracker);
        }
    }
    Ok(())
}

type Prompt = TerminalPrompter<std::io::StdinLock<'static>>;

fn open(root: Option<PathBuf>, assume_yes: bool) -> Result<(Tracker<FileStore>, Prompt)> {
    let data_dir = resolve_data_dir(root.as_deref()).ok_or_else(|| {
        anyhow!("Unable to resolve data directory; pass --root or set MINDMUSCLE_HOME")
    })?;
    let settings = resolve_settings(&data_dir);
    let store = FileStore::open(&data_dir)
        .with_context(|| format!("open data directory {}", data_dir.display()))?;
    Ok((
        Tracker::open_with_settings(store, settings),
        TerminalPrompter::stdin(assume_yes),
    ))
}

fn warn_unsaved(tracker: &Tracker<FileStore>) {
    if tracker.has_unsaved_changes() {
        eprintln!(
            "warning: could not save {}; changes were not persisted",
            tracker.unsaved().join(", ")
        );
    }
}

fn report(outcome: Outcome) {
    if outcome == Outcome::Aborted {
        println!("Cancelled; nothing changed.");
    }
}

fn run_pr(tracker: &mut Tracker<FileStore>, prompter: &mut Prompt, command: PrCommand) -> Result<()> {
    let unit = tracker.settings().weight_unit.clone();
    match command {
        PrCommand::Add {
            exercise,
            weight,
            date,
        } => {
            tracker.add_pr(&PrInput::new(&exercise, &weight, &date), prompter)?;
        }
        PrCommand::List { json } => {
            if json {
                let rows: Vec<_> = tracker
                    .prs()
                    .iter()
                    .enumerate()
                    .map(|(index, pr)| {
                        json!({
                            "index": index,
                            "exercise": pr.exercise,
                            "weight": pr.weight,
                            "date": pr.date,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (index, pr) in tracker.prs().iter().enumerate() {
                    println!("{}", render_pr_line(index, pr, &unit));
                }
            }
        }
        PrCommand::Edit {
            index,
            weight,
            date,
        } => {
            // Flags answer both steps; a missing one keeps the record's current value.
            if weight.is_some() || date.is_some() {
                let current = tracker.prs().get(index);
                let weight = weight
                    .or_else(|| current.map(|pr| pr.weight.to_string()))
                    .unwrap_or_default();
                let date = date
                    .or_else(|| current.map(|pr| pr.date.clone()))
                    .unwrap_or_default();
                prompter.queue_answers([weight, date]);
            }
            report(tracker.edit_pr(index, prompter)?);
        }
        PrCommand::Delete { index } => {
            report(tracker.delete_pr(index, prompter)?);
        }
    }
    Ok(())
}

fn run_goal(
    tracker: &mut Tracker<FileStore>,
    prompter: &mut Prompt,
    command: GoalCommand,
) -> Result<()> {
    let unit = tracker.settings().weight_unit.clone();
    match command {
        GoalCommand::Add {
            name,
            exercise,
            target,
            due,
        } => {
            tracker.submit_goal(&GoalInput::new(&name, &exercise, &target, &due), prompter)?;
        }
        GoalCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&tracker.goal_views())?);
            } else {
                for (index, goal) in tracker.goals().iter().enumerate() {
                    println!("{}", render_goal_line(index, goal, &unit));
                }
            }
        }
        GoalCommand::Edit {
            index,
            name,
            exercise,
            target,
            due,
        } => {
            let mut input = tracker.begin_goal_edit(index)?;
            if let Some(name) = name {
                input.name = name;
            }
            if let Some(exercise) = exercise {
                input.exercise = exercise;
            }
            if let Some(target) = target {
                input.target = target;
            }
            if let Some(due) = due {
                input.due_date = due;
            }
            tracker.submit_goal(&input, prompter)?;
        }
        GoalCommand::Delete { index } => {
            report(tracker.delete_goal(index, prompter)?);
        }
    }
    Ok(())
}

fn run_study(
    tracker: &mut Tracker<FileStore>,
    prompter: &mut Prompt,
    command: StudyCommand,
) -> Result<()> {
    match command {
        StudyCommand::Add {
            topic,
            subject,
            priority,
        } => {
            tracker.submit_topic(&TopicInput::new(&topic, &subject, &priority), prompter)?;
        }
        StudyCommand::List { filter, json } => {
            tracker.set_filter(filter.to_filter()?);
            if json {
                let payload = json!({
                    "topics": tracker.study_view(),
                    "summary": tracker.study_summary(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                for row in tracker.study_view() {
                    println!("{}", render_topic_line(row.index, row.topic));
                }
                println!("{}", render_study_summary(&tracker.study_summary()));
            }
        }
        StudyCommand::Edit {
            index,
            topic,
            subject,
            priority,
        } => {
            let mut input = tracker.begin_topic_edit(index)?;
            if let Some(topic) = topic {
                input.topic_name = topic;
            }
            if let Some(subject) = subject {
                input.subject = subject;
            }
            if let Some(priority) = priority {
                input.priority = priority;
            }
            tracker.submit_topic(&input, prompter)?;
        }
        StudyCommand::Complete { index, pending } => {
            tracker.set_topic_completed(index, !pending, prompter)?;
        }
        StudyCommand::Delete { index } => {
            report(tracker.delete_topic(index, prompter)?);
        }
        StudyCommand::Stats { filter, json } => {
            tracker.set_filter(filter.to_filter()?);
            let summary = tracker.study_summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", render_study_summary(&summary));
            }
        }
    }
    Ok(())
}
