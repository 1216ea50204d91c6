//! In-memory collaborator doubles.
//!
//! These implement the remote traits without any backend, with call
//! counters and forced-failure hooks for asserting on what the core did
//! (and, just as often, on what it never attempted).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use crate::remote::{AuthBackend, BlobStore, NavigationSink, RecordStore, StoreScope, WarningSink};

/// Auth backend double. Starts with a usable session and user id "user-1".
pub struct MockAuth {
    session_usable: AtomicBool,
    user_id: RwLock<String>,
    refresh_failure: RwLock<Option<String>>,
    login_failure: RwLock<Option<String>>,
    sign_up_calls: AtomicUsize,
    login_calls: AtomicUsize,
    logout_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl Default for MockAuth {
    fn default() -> Self {
        MockAuth {
            session_usable: AtomicBool::new(true),
            user_id: RwLock::new("user-1".to_string()),
            refresh_failure: RwLock::new(None),
            login_failure: RwLock::new(None),
            sign_up_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }
}

impl MockAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_session_usable(&self, usable: bool) {
        self.session_usable.store(usable, Ordering::SeqCst);
    }

    /// Make every `refresh_session` call fail with this raw message.
    pub fn fail_refresh_with(&self, message: &str) {
        *self.refresh_failure.write().unwrap() = Some(message.to_string());
    }

    /// Make every `login` call fail with this raw message.
    pub fn fail_login_with(&self, message: &str) {
        *self.login_failure.write().unwrap() = Some(message.to_string());
    }

    pub fn sign_up_calls(&self) -> usize {
        self.sign_up_calls.load(Ordering::SeqCst)
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthBackend for MockAuth {
    async fn sign_up(&self, _email: &str, _password: &str) -> anyhow::Result<()> {
        self.sign_up_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn login(&self, _email: &str, _password: &str) -> anyhow::Result<()> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.login_failure.read().unwrap().clone() {
            anyhow::bail!(message);
        }
        self.session_usable.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&self) -> anyhow::Result<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.session_usable.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn refresh_session(&self) -> anyhow::Result<bool> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.refresh_failure.read().unwrap().clone() {
            anyhow::bail!(message);
        }
        Ok(self.session_usable.load(Ordering::SeqCst))
    }

    async fn current_user_id(&self) -> anyhow::Result<String> {
        Ok(self.user_id.read().unwrap().clone())
    }
}

/// Record store double, keyed by a caller-supplied key function.
pub struct MemoryRecordStore<T> {
    key: fn(&T) -> String,
    records: RwLock<HashMap<StoreScope, HashMap<String, T>>>,
    failure: RwLock<Option<String>>,
    fetch_calls: AtomicUsize,
    upsert_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl<T: Clone> MemoryRecordStore<T> {
    pub fn new(key: fn(&T) -> String) -> Self {
        MemoryRecordStore {
            key,
            records: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
            fetch_calls: AtomicUsize::new(0),
            upsert_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Make every store call fail with this raw message.
    pub fn fail_with(&self, message: &str) {
        *self.failure.write().unwrap() = Some(message.to_string());
    }

    pub fn clear_failure(&self) {
        *self.failure.write().unwrap() = None;
    }

    /// Insert a record directly, bypassing the failure hook.
    pub fn seed(&self, scope: StoreScope, record: T) {
        let key = (self.key)(&record);
        self.records
            .write()
            .unwrap()
            .entry(scope)
            .or_default()
            .insert(key, record);
    }

    pub fn records_in(&self, scope: &StoreScope) -> Vec<T> {
        self.records
            .read()
            .unwrap()
            .get(scope)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> anyhow::Result<()> {
        if let Some(message) = self.failure.read().unwrap().clone() {
            anyhow::bail!(message);
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> RecordStore<T> for MemoryRecordStore<T> {
    async fn fetch_all(&self, scope: StoreScope) -> anyhow::Result<Vec<T>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.records_in(&scope))
    }

    async fn upsert(&self, scope: StoreScope, record: T) -> anyhow::Result<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.seed(scope, record);
        Ok(())
    }

    async fn delete(&self, scope: StoreScope, key: &str) -> anyhow::Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        if let Some(scoped) = self.records.write().unwrap().get_mut(&scope) {
            scoped.remove(key);
        }
        Ok(())
    }
}

/// Blob store double serving URLs under a fake host.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.blobs.read().unwrap().contains_key(path)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> anyhow::Result<()> {
        self.blobs.write().unwrap().insert(path.to_string(), bytes);
        Ok(())
    }

    async fn public_url(&self, path: &str) -> anyhow::Result<String> {
        Ok(format!("https://blobs.test/{path}"))
    }

    async fn delete(&self, path: &str) -> anyhow::Result<()> {
        self.blobs.write().unwrap().remove(path);
        Ok(())
    }
}

/// Navigation sink double that only counts calls.
#[derive(Default)]
pub struct CountingNav {
    calls: AtomicUsize,
}

impl CountingNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NavigationSink for CountingNav {
    async fn go_to_unauthenticated(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Warning sink double that records every message.
#[derive(Default)]
pub struct CollectingWarnings {
    messages: Mutex<Vec<String>>,
}

impl CollectingWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl WarningSink for CollectingWarnings {
    async fn show(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
