//! Session-guarded command execution.
//!
//! Every remote unit of work runs through `CommandExecutor::run`. Callers
//! never see a raw error: the executor classifies any failure, handles the
//! fatal ones by forcing sign-out exactly once, surfaces the rest as a
//! warning, and returns `Option<T>` either way.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::classify::Classifier;
use crate::error::ErrorKind;
use crate::remote::{AuthBackend, NavigationSink, WarningSink};

pub struct CommandExecutor {
    classifier: Classifier,
    auth: Arc<dyn AuthBackend>,
    navigation: Arc<dyn NavigationSink>,
    warnings: Arc<dyn WarningSink>,
    /// Latched once the forced-logout sequence has run; reset on login.
    /// Keeps concurrent in-flight failures from re-running the sequence.
    signed_out: AtomicBool,
}

impl CommandExecutor {
    /// All collaborators are mandatory: an executor without a navigation or
    /// warning sink cannot be constructed.
    pub fn new(
        classifier: Classifier,
        auth: Arc<dyn AuthBackend>,
        navigation: Arc<dyn NavigationSink>,
        warnings: Arc<dyn WarningSink>,
    ) -> Self {
        CommandExecutor {
            classifier,
            auth,
            navigation,
            warnings,
            signed_out: AtomicBool::new(false),
        }
    }

    /// Run one unit of remote work.
    ///
    /// Success returns `Some(value)`. On failure the raw error is
    /// classified; fatal kinds trigger the forced-logout sequence,
    /// recoverable kinds surface a warning, and `None` is returned. A
    /// `None` always means "did not happen" — never partial success.
    pub async fn run<T, F>(&self, label: &str, work: F) -> Option<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        tracing::debug!(operation = label, "running");
        match work.await {
            Ok(value) => {
                tracing::debug!(operation = label, "completed");
                Some(value)
            }
            Err(raw) => {
                let kind = self.classifier.classify(label, &raw);
                if kind.is_fatal() {
                    self.force_logout().await;
                } else {
                    self.warnings.show(&kind.to_string()).await;
                }
                None
            }
        }
    }

    /// `run` for void operations; `true` means the work completed.
    pub async fn run_unit<F>(&self, label: &str, work: F) -> bool
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        self.run(label, work).await.is_some()
    }

    /// Surface a validation failure through the warning channel without
    /// touching the remote. Validation never forces a logout.
    pub async fn warn(&self, kind: &ErrorKind) {
        self.warnings.show(&kind.to_string()).await;
    }

    /// Re-arm the forced-logout latch after a successful login.
    pub fn reset(&self) {
        self.signed_out.store(false, Ordering::SeqCst);
    }

    /// Invalidate the session and send the UI back to the login screen.
    /// The latch guarantees at most one run per authenticated stretch even
    /// when several in-flight operations fail for the same expiry.
    async fn force_logout(&self) {
        if self
            .signed_out
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        tracing::warn!("fatal failure, forcing sign-out");
        if let Err(err) = self.auth.logout().await {
            // The session is unusable either way; logging out of an
            // already-dead session failing is expected.
            tracing::debug!(error = %err, "logout during forced sign-out failed");
        }
        self.navigation.go_to_unauthenticated().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CollectingWarnings, CountingNav, MockAuth};

    fn executor(
        auth: Arc<MockAuth>,
        nav: Arc<CountingNav>,
        warnings: Arc<CollectingWarnings>,
    ) -> Arc<CommandExecutor> {
        Arc::new(CommandExecutor::new(
            Classifier::default(),
            auth,
            nav,
            warnings,
        ))
    }

    #[tokio::test]
    async fn test_success_returns_the_value() {
        let executor = executor(
            Arc::new(MockAuth::new()),
            Arc::new(CountingNav::new()),
            Arc::new(CollectingWarnings::new()),
        );
        let result = executor.run("op", async { Ok(41 + 1) }).await;
        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn test_recoverable_failure_warns_and_returns_none() {
        let warnings = Arc::new(CollectingWarnings::new());
        let nav = Arc::new(CountingNav::new());
        let executor = executor(Arc::new(MockAuth::new()), nav.clone(), warnings.clone());

        let result: Option<i32> = executor
            .run("op", async { Err(anyhow::anyhow!("Request timed out")) })
            .await;

        assert_eq!(result, None);
        assert_eq!(nav.count(), 0);
        assert_eq!(
            warnings.messages(),
            vec!["Network error, please try again".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fatal_failure_forces_logout_without_warning() {
        let warnings = Arc::new(CollectingWarnings::new());
        let nav = Arc::new(CountingNav::new());
        let auth = Arc::new(MockAuth::new());
        let executor = executor(auth.clone(), nav.clone(), warnings.clone());

        let result: Option<i32> = executor
            .run("op", async { Err(anyhow::anyhow!("jwt expired")) })
            .await;

        assert_eq!(result, None);
        assert_eq!(nav.count(), 1);
        assert_eq!(auth.logout_calls(), 1);
        assert!(warnings.messages().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_fatal_failures_force_logout_once() {
        let nav = Arc::new(CountingNav::new());
        let auth = Arc::new(MockAuth::new());
        let executor = executor(
            auth.clone(),
            nav.clone(),
            Arc::new(CollectingWarnings::new()),
        );

        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let executor = executor.clone();
                tokio::spawn(async move {
                    executor
                        .run::<i32, _>("op", async { Err(anyhow::anyhow!("jwt expired")) })
                        .await
                })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap(), None);
        }

        assert_eq!(nav.count(), 1);
        assert_eq!(auth.logout_calls(), 1);
    }

    #[tokio::test]
    async fn test_reset_rearms_the_forced_logout_latch() {
        let nav = Arc::new(CountingNav::new());
        let executor = executor(
            Arc::new(MockAuth::new()),
            nav.clone(),
            Arc::new(CollectingWarnings::new()),
        );

        let fail = || async { Err::<i32, _>(anyhow::anyhow!("jwt expired")) };
        executor.run("op", fail()).await;
        executor.run("op", fail()).await;
        assert_eq!(nav.count(), 1, "latched after the first fatal failure");

        executor.reset();
        executor.run("op", fail()).await;
        assert_eq!(nav.count(), 2, "fatal handling live again after reset");
    }

    #[tokio::test]
    async fn test_run_unit_maps_outcome_to_bool() {
        let executor = executor(
            Arc::new(MockAuth::new()),
            Arc::new(CountingNav::new()),
            Arc::new(CollectingWarnings::new()),
        );
        assert!(executor.run_unit("op", async { Ok(()) }).await);
        assert!(
            !executor
                .run_unit("op", async { Err(anyhow::anyhow!("boom")) })
                .await
        );
    }
}
