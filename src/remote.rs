//! Remote collaborator interfaces.
//!
//! The core talks to its backend through these capability traits and
//! nothing else. Implementations return raw `anyhow` errors; classification
//! into the `ErrorKind` taxonomy happens once, at the executor boundary,
//! never inside an implementation.
//!
//! All collaborators are injected as constructor arguments. There is no
//! ambient lookup and no post-construction wiring.

use anyhow::Result;
use async_trait::async_trait;

/// Which records a store call addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreScope {
    /// The calling user's own records.
    User,
    /// The shared official records.
    Official,
    /// One shared image library, by name.
    Library(String),
}

/// Account and session operations.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<()>;
    async fn login(&self, email: &str, password: &str) -> Result<()>;
    async fn logout(&self) -> Result<()>;
    /// Refresh the current session; `Ok(true)` means it is usable.
    async fn refresh_session(&self) -> Result<bool>;
    async fn current_user_id(&self) -> Result<String>;
}

/// Scoped CRUD over one record type. Upserts are whole-record replacements
/// keyed by the caller-owned identifier; last writer wins.
#[async_trait]
pub trait RecordStore<T>: Send + Sync {
    async fn fetch_all(&self, scope: StoreScope) -> Result<Vec<T>>;
    async fn upsert(&self, scope: StoreScope, record: T) -> Result<()>;
    async fn delete(&self, scope: StoreScope, key: &str) -> Result<()>;
}

/// Raw file storage for uploaded images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<()>;
    async fn public_url(&self, path: &str) -> Result<String>;
    async fn delete(&self, path: &str) -> Result<()>;
}

/// Invoked by the forced-logout sequence. Must tolerate being called while
/// already on the unauthenticated screen.
#[async_trait]
pub trait NavigationSink: Send + Sync {
    async fn go_to_unauthenticated(&self);
}

/// Receives user-visible messages for recoverable failures.
#[async_trait]
pub trait WarningSink: Send + Sync {
    async fn show(&self, message: &str);
}
