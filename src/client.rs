//! The client operation surface.
//!
//! `CalendarClient` is everything the UI layer calls. Every operation
//! except sign-up/login/logout follows the same shape: validate input if
//! any, verify the session, then run exactly one unit of remote work
//! through the executor. Callers only ever see a value or the operation's
//! empty result; failures have already been classified and handled.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::catalog::{
    ImageRef, NamedRecord, Preset, Scope, USER_LIBRARY, by_name, overlay_merge,
};
use crate::classify::Classifier;
use crate::config::ClientConfig;
use crate::error::{CoreResult, ErrorKind};
use crate::event::Event;
use crate::executor::CommandExecutor;
use crate::remote::{AuthBackend, BlobStore, RecordStore, StoreScope};
use crate::session::SessionGuard;
use crate::ui_events::{ChannelSinks, Snapshot, UiEvent};

pub struct CalendarClient {
    auth: Arc<dyn AuthBackend>,
    events: Arc<dyn RecordStore<Event>>,
    presets: Arc<dyn RecordStore<NamedRecord<Preset>>>,
    images: Arc<dyn RecordStore<NamedRecord<ImageRef>>>,
    blobs: Arc<dyn BlobStore>,
    guard: SessionGuard,
    executor: CommandExecutor,
    config: ClientConfig,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
}

impl CalendarClient {
    /// Wire up a client. Returns the receiving end of the core → UI
    /// channel; the UI reacts to `UiEvent`s and never registers callbacks.
    pub fn new(
        auth: Arc<dyn AuthBackend>,
        events: Arc<dyn RecordStore<Event>>,
        presets: Arc<dyn RecordStore<NamedRecord<Preset>>>,
        images: Arc<dyn RecordStore<NamedRecord<ImageRef>>>,
        blobs: Arc<dyn BlobStore>,
        config: ClientConfig,
    ) -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (sinks, rx) = ChannelSinks::new();
        let ui_tx = sinks.sender();
        let sinks = Arc::new(sinks);

        let executor = CommandExecutor::new(
            Classifier::default(),
            auth.clone(),
            sinks.clone(),
            sinks,
        );
        let guard = SessionGuard::new(auth.clone());

        let client = CalendarClient {
            auth,
            events,
            presets,
            images,
            blobs,
            guard,
            executor,
            config,
            ui_tx,
        };
        (client, rx)
    }

    // --- Account ---

    pub async fn sign_up(&self, email: &str, password: &str) -> bool {
        if let Err(kind) = validate_credentials(email, password) {
            self.executor.warn(&kind).await;
            return false;
        }
        self.executor
            .run_unit("sign_up", self.auth.sign_up(email, password))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        if let Err(kind) = validate_credentials(email, password) {
            self.executor.warn(&kind).await;
            return false;
        }
        let ok = self
            .executor
            .run_unit("login", self.auth.login(email, password))
            .await;
        if ok {
            // A fresh session re-arms the forced-logout sequence
            self.executor.reset();
        }
        ok
    }

    pub async fn logout(&self) -> bool {
        self.executor.run_unit("logout", self.auth.logout()).await
    }

    // --- Events ---

    pub async fn fetch_events(&self) -> Vec<Event> {
        if !self.guard.verify().await {
            return Vec::new();
        }
        self.executor
            .run("fetch_events", self.events.fetch_all(StoreScope::User))
            .await
            .unwrap_or_default()
    }

    pub async fn upsert_event(&self, event: Event) -> bool {
        if let Err(kind) = event.validate() {
            self.executor.warn(&kind).await;
            return false;
        }
        if !self.guard.verify().await {
            return false;
        }
        self.executor
            .run_unit("upsert_event", self.events.upsert(StoreScope::User, event))
            .await
    }

    pub async fn delete_event(&self, id: Uuid) -> bool {
        if !self.guard.verify().await {
            return false;
        }
        self.executor
            .run_unit(
                "delete_event",
                self.events.delete(StoreScope::User, &id.to_string()),
            )
            .await
    }

    /// Whole-record replacement with a new reaction tag.
    pub async fn set_reaction(&self, event: Event, reaction: Option<String>) -> bool {
        self.upsert_event(event.with_reaction(reaction)).await
    }

    // --- Presets ---

    /// The merged preset catalog: official presets overlaid by the user's
    /// own, keyed by name.
    pub async fn fetch_presets(&self) -> HashMap<String, NamedRecord<Preset>> {
        if !self.guard.verify().await {
            return HashMap::new();
        }
        self.executor
            .run("fetch_presets", async {
                let official = self.presets.fetch_all(StoreScope::Official).await?;
                let user = self.presets.fetch_all(StoreScope::User).await?;
                Ok(overlay_merge(by_name(official), by_name(user)))
            })
            .await
            .unwrap_or_default()
    }

    pub async fn upsert_preset(&self, preset: NamedRecord<Preset>) -> bool {
        if preset.name.trim().is_empty() {
            self.executor
                .warn(&ErrorKind::validation("preset name cannot be empty"))
                .await;
            return false;
        }
        if !self.guard.verify().await {
            return false;
        }
        // Writes always target the user scope; official presets are read-only
        let record = NamedRecord {
            scope: Scope::User,
            ..preset
        };
        self.executor
            .run_unit("upsert_preset", self.presets.upsert(StoreScope::User, record))
            .await
    }

    pub async fn delete_preset(&self, name: &str) -> bool {
        if !self.guard.verify().await {
            return false;
        }
        self.executor
            .run_unit("delete_preset", self.presets.delete(StoreScope::User, name))
            .await
    }

    // --- Images ---

    /// The image catalog, keyed by library label with the user's uploads
    /// under the reserved `"user"` key.
    ///
    /// Library fetches fan out concurrently and join before the merge; the
    /// keys are fixed up front from the configured library list, so
    /// completion order never affects the result.
    pub async fn fetch_image_catalog(&self) -> HashMap<String, Vec<NamedRecord<ImageRef>>> {
        if !self.guard.verify().await {
            return HashMap::new();
        }
        self.executor
            .run("fetch_image_catalog", async {
                let libraries = &self.config.image_libraries;
                let fetches = libraries
                    .iter()
                    .map(|lib| self.images.fetch_all(StoreScope::Library(lib.clone())));
                let results = join_all(fetches).await;

                let mut official = HashMap::new();
                for (library, result) in libraries.iter().zip(results) {
                    official.insert(library.clone(), result?);
                }

                let user = self.images.fetch_all(StoreScope::User).await?;
                let user_catalog = HashMap::from([(USER_LIBRARY.to_string(), user)]);

                Ok(overlay_merge(official, user_catalog))
            })
            .await
            .unwrap_or_default()
    }

    /// Upload an image and register it in the user's catalog.
    pub async fn upload_image(&self, name: &str, bytes: Vec<u8>) -> bool {
        if name.trim().is_empty() {
            self.executor
                .warn(&ErrorKind::validation("image name cannot be empty"))
                .await;
            return false;
        }
        if !self.guard.verify().await {
            return false;
        }
        self.executor
            .run_unit("upload_image", async {
                let user_id = self.auth.current_user_id().await?;
                let path = format!("{user_id}/{name}");
                self.blobs.upload(&path, bytes).await?;
                let url = self.blobs.public_url(&path).await?;
                let record = NamedRecord::new(name, Scope::User, ImageRef { path, url });
                self.images.upsert(StoreScope::User, record).await
            })
            .await
    }

    pub async fn delete_image(&self, name: &str) -> bool {
        if !self.guard.verify().await {
            return false;
        }
        self.executor
            .run_unit("delete_image", async {
                let user_id = self.auth.current_user_id().await?;
                self.blobs.delete(&format!("{user_id}/{name}")).await?;
                self.images.delete(StoreScope::User, name).await
            })
            .await
    }

    // --- Background refresh ---

    /// One fetch-and-merge pass over everything, emitted as `DataChanged`.
    /// With an unusable session this emits an empty snapshot.
    pub async fn refresh_once(&self) {
        let snapshot = Snapshot {
            events: self.fetch_events().await,
            presets: self.fetch_presets().await,
            images: self.fetch_image_catalog().await,
        };
        let _ = self.ui_tx.send(UiEvent::DataChanged(snapshot));
    }

    /// Start the periodic refresh task at the configured interval.
    ///
    /// Passes are issued on every tick without suppressing overlap against
    /// in-flight foreground operations; whole-record last-writer-wins makes
    /// that safe, if occasionally redundant.
    pub fn spawn_refresh(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(client.config.poll_interval());
            loop {
                ticker.tick().await;
                client.refresh_once().await;
            }
        })
    }
}

fn validate_credentials(email: &str, password: &str) -> CoreResult<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ErrorKind::validation("enter a valid email address"));
    }
    if password.is_empty() {
        return Err(ErrorKind::validation("password cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_validation() {
        assert!(validate_credentials("a@b.se", "hunter2").is_ok());
        assert!(validate_credentials("", "hunter2").is_err());
        assert!(validate_credentials("not-an-email", "hunter2").is_err());
        assert!(validate_credentials("a@b.se", "").is_err());
        assert!(validate_credentials("  a@b.se  ", "hunter2").is_ok());
    }
}
