//! Task management commands.

use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use daystack_core::TaskStatus;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Due date as YYYY-MM-DD; makes the task eligible for
        /// projection to the calendar
        #[arg(long)]
        due_date: Option<String>,
        /// Due time as HH:MM (defaults to the configured morning slot)
        #[arg(long)]
        due_time: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tasks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as done
    Done {
        /// Task ID
        id: String,
    },
}

pub async fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TaskAction::Add {
            title,
            due_date,
            due_time,
            json,
        } => {
            let due_date = due_date
                .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
                .transpose()
                .map_err(|e| format!("invalid --due-date: {e}"))?;
            let due_time = due_time
                .map(|s| NaiveTime::parse_from_str(&s, "%H:%M"))
                .transpose()
                .map_err(|e| format!("invalid --due-time: {e}"))?;

            let (engine, owner) = super::engine()?;
            let task = engine.create_task(&owner, &title, due_date, due_time).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("Task created: {}", task.id);
                if let Some(ref external_id) = task.external_event_id {
                    println!("Projected to calendar event {external_id}");
                }
            }
        }
        TaskAction::List { json } => {
            let (engine, owner) = super::engine()?;
            let tasks = engine.list_tasks(&owner)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks");
            } else {
                for task in tasks {
                    let status = match task.status {
                        TaskStatus::Done => "done",
                        TaskStatus::Open => "open",
                    };
                    let due = match (task.due_date, task.due_time) {
                        (Some(d), Some(t)) => format!(" due {d} {t}"),
                        (Some(d), None) => format!(" due {d}"),
                        _ => String::new(),
                    };
                    let linked = if task.external_event_id.is_some() {
                        " [synced]"
                    } else {
                        ""
                    };
                    println!("{}  [{status}]{due}{linked}  {}", task.id, task.title);
                }
            }
        }
        TaskAction::Done { id } => {
            let (engine, _) = super::engine()?;
            engine.store().set_task_status(&id, TaskStatus::Done)?;
            println!("Task {id} marked done");
        }
    }
    Ok(())
}
