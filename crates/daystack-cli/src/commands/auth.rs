//! Calendar account connection commands.

use clap::Subcommand;
use daystack_core::Config;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Connect a Google Calendar account (opens a browser)
    Connect {
        /// OAuth client ID (stored in config for later runs)
        #[arg(long)]
        client_id: Option<String>,
        /// OAuth client secret (stored in config for later runs)
        #[arg(long)]
        client_secret: Option<String>,
    },
    /// Check connection status
    Status,
    /// Remove the stored credential
    Disconnect,
}

pub async fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Connect {
            client_id,
            client_secret,
        } => {
            if client_id.is_some() || client_secret.is_some() {
                let mut config = Config::load()?;
                if let Some(client_id) = client_id {
                    config.google.client_id = client_id;
                }
                if let Some(client_secret) = client_secret {
                    config.google.client_secret = client_secret;
                }
                config.save()?;
            }

            let (engine, owner) = super::engine()?;
            engine.connect(&owner).await?;
            println!("Calendar account connected for '{owner}'");
        }
        AuthAction::Status => {
            let (engine, owner) = super::engine()?;
            if engine.is_connected(&owner)? {
                println!("Connected");
            } else {
                println!("Not connected");
            }
        }
        AuthAction::Disconnect => {
            let (engine, owner) = super::engine()?;
            engine.disconnect(&owner)?;
            println!("Disconnected");
        }
    }
    Ok(())
}
