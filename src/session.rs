//! Session admission control.
//!
//! Every guarded operation asks the guard first and short-circuits to its
//! empty result if the session is not usable; the underlying remote call is
//! never attempted. One extra round trip per operation buys the absence of
//! stale-session partial failures.

use std::sync::Arc;

use crate::remote::AuthBackend;

pub struct SessionGuard {
    auth: Arc<dyn AuthBackend>,
}

impl SessionGuard {
    pub fn new(auth: Arc<dyn AuthBackend>) -> Self {
        SessionGuard { auth }
    }

    /// Refresh and validate the session. Any error from the auth backend
    /// counts as unusable.
    pub async fn verify(&self) -> bool {
        match self.auth.refresh_session().await {
            Ok(usable) => usable,
            Err(err) => {
                tracing::debug!(error = %err, "session refresh failed, treating as unusable");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAuth;

    #[tokio::test]
    async fn test_verify_reflects_session_usability() {
        let auth = Arc::new(MockAuth::new());
        let guard = SessionGuard::new(auth.clone());

        auth.set_session_usable(true);
        assert!(guard.verify().await);

        auth.set_session_usable(false);
        assert!(!guard.verify().await);
    }

    #[tokio::test]
    async fn test_refresh_error_counts_as_unusable() {
        let auth = Arc::new(MockAuth::new());
        auth.fail_refresh_with("network unreachable");
        let guard = SessionGuard::new(auth);
        assert!(!guard.verify().await);
    }
}
