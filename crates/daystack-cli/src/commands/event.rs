//! Event management commands.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use clap::Subcommand;
use daystack_core::sync::engine::NewEventInput;
use daystack_core::SyncWindow;

#[derive(Subcommand)]
pub enum EventAction {
    /// Create a local event, mirrored to the calendar best-effort
    Add {
        /// Event title
        title: String,
        /// Start as YYYY-MM-DDTHH:MM local time
        #[arg(long)]
        start: String,
        /// End as YYYY-MM-DDTHH:MM local time
        #[arg(long)]
        end: String,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Location
        #[arg(long)]
        location: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List events in a window around now
    List {
        /// Days before now
        #[arg(long, default_value = "7")]
        days_back: i64,
        /// Days after now
        #[arg(long, default_value = "30")]
        days_forward: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an event, mirroring the deletion best-effort
    Delete {
        /// Event ID
        id: String,
    },
}

fn parse_local(value: &str) -> Result<DateTime<Utc>, String> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .map_err(|e| format!("invalid datetime '{value}': {e}"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("nonexistent local time '{value}'"))
}

pub async fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        EventAction::Add {
            title,
            start,
            end,
            description,
            location,
            json,
        } => {
            let start = parse_local(&start)?;
            let end = parse_local(&end)?;
            if end <= start {
                return Err("end must be after start".into());
            }

            let (engine, owner) = super::engine()?;
            let event = engine
                .create_event(
                    &owner,
                    NewEventInput {
                        title,
                        description,
                        location,
                        start,
                        end,
                    },
                )
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("Event created: {}", event.id);
                if event.is_linked() {
                    println!("Mirrored to calendar");
                } else {
                    println!("Not mirrored yet; next sync will not push it (events only mirror at creation)");
                }
            }
        }
        EventAction::List {
            days_back,
            days_forward,
            json,
        } => {
            let (engine, owner) = super::engine()?;
            let window = SyncWindow::around_now(days_back, days_forward);
            let events = engine.list_events(&owner, &window)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else if events.is_empty() {
                println!("No events in window");
            } else {
                for event in events {
                    let local_start = event.start.with_timezone(&Local);
                    println!(
                        "{}  {}  {}",
                        event.id,
                        local_start.format("%Y-%m-%d %H:%M"),
                        event.title
                    );
                }
            }
        }
        EventAction::Delete { id } => {
            let (engine, owner) = super::engine()?;
            let report = engine.delete_event(&id, &owner).await?;
            println!("Event deleted");
            if let Some(warning) = report.remote_warning {
                println!("warning: {warning}");
            }
        }
    }
    Ok(())
}
