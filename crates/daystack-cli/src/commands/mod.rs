pub mod auth;
pub mod event;
pub mod sync;
pub mod task;

use daystack_core::{Config, GoogleCalendarClient, Store, SyncEngine};

/// Build the sync engine from the on-disk store and configuration.
pub fn engine() -> Result<(SyncEngine<GoogleCalendarClient>, String), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let owner = config.general.owner.clone();
    let store = Store::open()?;
    let engine = SyncEngine::new(store, GoogleCalendarClient::new(), config);
    Ok((engine, owner))
}
