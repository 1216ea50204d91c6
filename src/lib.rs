//! Core logic for the stampcal calendar client.
//!
//! This crate is everything below the UI and above the concrete backend:
//! - `recurrence` and `event`: when does a stamp event occur on a day
//! - `session` and `executor`: session-guarded remote commands with
//!   classified failures and forced sign-out on fatal ones
//! - `catalog`: named-record catalogs and the official/user overlay merge
//! - `remote`: the collaborator traits a backend implements
//! - `client`: the operation surface the UI calls, plus the core → UI
//!   event channel in `ui_events`

pub mod catalog;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod executor;
pub mod recurrence;
pub mod remote;
pub mod session;
pub mod testing;
pub mod ui_events;

// Re-export the types most callers need at crate root
pub use catalog::{ImageRef, NamedRecord, Preset, Scope, overlay_merge};
pub use client::CalendarClient;
pub use config::ClientConfig;
pub use error::{AuthError, CoreResult, ErrorKind, StorageError};
pub use event::{Event, events_on};
pub use recurrence::RecurrenceRule;
pub use ui_events::{Snapshot, UiEvent};
