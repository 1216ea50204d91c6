//! The single directional core → UI channel.
//!
//! The UI never hands callbacks into the core; it owns the receiving end
//! of one event channel and reacts to what arrives. `ChannelSinks` adapts
//! the channel to the `NavigationSink`/`WarningSink` collaborator traits
//! so the executor stays unaware of the transport.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::catalog::{ImageRef, NamedRecord, Preset};
use crate::event::Event;
use crate::remote::{NavigationSink, WarningSink};

/// Everything the UI renders, produced by one fetch-and-merge pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub events: Vec<Event>,
    pub presets: HashMap<String, NamedRecord<Preset>>,
    /// Image catalog keyed by library label; user uploads under `"user"`.
    pub images: HashMap<String, Vec<NamedRecord<ImageRef>>>,
}

/// Events the core emits toward the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Fresh data from a fetch-and-merge pass.
    DataChanged(Snapshot),
    /// The session became unusable; return to the login screen.
    ForcedLogout,
    /// A recoverable failure the user should see, as a dismissable message.
    Warning(String),
}

/// Channel-backed implementation of both outbound sinks.
///
/// Sends are fire-and-forget: a dropped receiver means the UI is gone,
/// which is not this side's problem.
#[derive(Clone)]
pub struct ChannelSinks {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelSinks {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelSinks { tx }, rx)
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<UiEvent> {
        self.tx.clone()
    }
}

#[async_trait]
impl NavigationSink for ChannelSinks {
    async fn go_to_unauthenticated(&self) {
        let _ = self.tx.send(UiEvent::ForcedLogout);
    }
}

#[async_trait]
impl WarningSink for ChannelSinks {
    async fn show(&self, message: &str) {
        let _ = self.tx.send(UiEvent::Warning(message.to_string()));
    }
}
