//! Calendar synchronization commands.

use chrono::Local;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum SyncAction {
    /// Run a full pull+push pass
    Run {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show sync status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SyncAction::Run { json } => {
            let (engine, owner) = super::engine()?;
            let summary = engine.sync(&owner).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Synced {} events (pull), {} tasks (push)",
                    summary.synced_events, summary.synced_tasks
                );
                if let Some(pull_error) = summary.pull_error {
                    println!("pull phase failed: {pull_error}");
                }
                if let Some(push_error) = summary.push_error {
                    println!("push phase failed: {push_error}");
                }
            }
        }
        SyncAction::Status { json } => {
            let (engine, owner) = super::engine()?;
            let status = engine.status(&owner)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!(
                    "Connected: {}",
                    if status.connected { "yes" } else { "no" }
                );
                match status.last_synced_at {
                    Some(at) => println!(
                        "Last sync: {}",
                        at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    ),
                    None => println!("Last sync: never"),
                }
                println!("Tasks pending projection: {}", status.pending_tasks);
            }
        }
    }
    Ok(())
}
