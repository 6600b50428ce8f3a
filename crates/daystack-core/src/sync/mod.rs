//! Calendar synchronization engine.
//!
//! Pull (reconciliation), push (task projection), coordinated deletion
//! and the orchestrator/facade that sequence them. Each sync operation
//! is one request-driven unit of work; no background actor holds state
//! between invocations.

pub mod delete;
pub mod engine;
pub mod orchestrator;
pub mod project;
pub mod reconcile;
pub mod remote;
pub mod token_manager;
pub mod types;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod reconcile_tests;
#[cfg(test)]
mod token_manager_tests;
#[cfg(test)]
mod engine_tests;

pub use delete::DeletionCoordinator;
pub use engine::{NewEventInput, SyncEngine};
pub use orchestrator::SyncOrchestrator;
pub use project::{TaskEventProjector, PROJECTED_EVENT_MINUTES};
pub use reconcile::ReconciliationEngine;
pub use remote::{NewRemoteEvent, RemoteCalendar, RemoteDelete, RemoteEvent};
pub use token_manager::TokenLifecycleManager;
pub use types::{DeleteReport, SyncStatus, SyncSummary, SyncWindow};
