//! Identity reconciliation: mapping an external identity to exactly one
//! local user record.
//!
//! The first callback with a given external id creates the row; later
//! callbacks reuse it without refreshing the stored profile. Two
//! simultaneous first logins are resolved by the store's uniqueness
//! constraint: the loser's insert comes back as a duplicate and the
//! reconciler re-reads the winner's row instead of surfacing an error.

use std::sync::Arc;
use wicket_identity::{ExternalIdentity, User};

use super::store::{StoreError, UserStore};

/// Errors from reconciliation.
///
/// Duplicate-insert conflicts are resolved internally and never appear
/// here; the only failure mode a caller sees is the store being down.
#[derive(Debug)]
pub enum ReconcileError {
    /// The user store could not be reached; the login attempt aborts.
    StoreUnavailable { details: String },
}

impl std::fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable { details } => {
                write!(f, "reconciliation failed, store unavailable: {details}")
            }
        }
    }
}

impl std::error::Error for ReconcileError {}

/// Maps external identities onto local user records.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn UserStore>,
}

impl Reconciler {
    /// Creates a reconciler over the given store.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Returns the local user for the given identity, creating one on
    /// first sight.
    ///
    /// The stored profile is intentionally not updated from the identity
    /// on repeat logins.
    pub async fn reconcile(&self, identity: &ExternalIdentity) -> Result<User, ReconcileError> {
        let external_id = identity.provider_user_id();

        if let Some(user) = self
            .store
            .find_by_external_id(external_id)
            .await
            .map_err(unavailable)?
        {
            return Ok(user);
        }

        match self.store.create(identity).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id(), external_id, "created user on first login");
                Ok(user)
            }
            Err(StoreError::Duplicate) => {
                // A concurrent first login won the insert; use its row
                tracing::debug!(external_id, "concurrent first login, re-reading winner");
                self.store
                    .find_by_external_id(external_id)
                    .await
                    .map_err(unavailable)?
                    .ok_or_else(|| ReconcileError::StoreUnavailable {
                        details: format!("row for '{}' vanished after duplicate insert", external_id),
                    })
            }
            Err(e) => Err(unavailable(e)),
        }
    }
}

fn unavailable(e: StoreError) -> ReconcileError {
    ReconcileError::StoreUnavailable {
        details: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};
    use wicket_core::UserId;

    fn test_identity() -> ExternalIdentity {
        ExternalIdentity::new(
            "ext-1".to_string(),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            String::new(),
        )
    }

    /// Plain in-memory store honoring the uniqueness constraint.
    #[derive(Default)]
    struct MemoryStore {
        users: Mutex<HashMap<String, User>>,
        next_id: AtomicI64,
        unavailable: std::sync::atomic::AtomicBool,
    }

    impl MemoryStore {
        fn insert(&self, identity: &ExternalIdentity) -> Result<User, StoreError> {
            let mut users = self.users.lock().expect("lock");
            if users.contains_key(identity.provider_user_id()) {
                return Err(StoreError::Duplicate);
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let user = User::new(
                UserId::from_i64(id),
                identity.provider_user_id().to_string(),
                identity.display_name().to_string(),
                identity.email().to_string(),
                identity.avatar_url().to_string(),
            );
            users.insert(identity.provider_user_id().to_string(), user.clone());
            Ok(user)
        }

        fn check_available(&self) -> Result<(), StoreError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable {
                    details: "store offline".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserStore for MemoryStore {
        async fn find_by_external_id(
            &self,
            external_id: &str,
        ) -> Result<Option<User>, StoreError> {
            self.check_available()?;
            Ok(self.users.lock().expect("lock").get(external_id).cloned())
        }

        async fn create(&self, identity: &ExternalIdentity) -> Result<User, StoreError> {
            self.check_available()?;
            self.insert(identity)
        }

        async fn ping(&self) -> Result<(), StoreError> {
            self.check_available()
        }
    }

    /// Store that simulates losing the first-login race: a competitor's
    /// row lands between our find and our create.
    struct RacingStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl UserStore for RacingStore {
        async fn find_by_external_id(
            &self,
            external_id: &str,
        ) -> Result<Option<User>, StoreError> {
            self.inner.find_by_external_id(external_id).await
        }

        async fn create(&self, identity: &ExternalIdentity) -> Result<User, StoreError> {
            // The competitor commits first; our insert hits the constraint
            let _ = self.inner.insert(identity);
            Err(StoreError::Duplicate)
        }

        async fn ping(&self) -> Result<(), StoreError> {
            self.inner.ping().await
        }
    }

    #[tokio::test]
    async fn first_login_creates_user() {
        let reconciler = Reconciler::new(Arc::new(MemoryStore::default()));

        let user = reconciler.reconcile(&test_identity()).await.expect("ok");

        assert_eq!(user.external_id(), "ext-1");
        assert_eq!(user.name(), "Ada");
    }

    #[tokio::test]
    async fn repeat_login_reuses_user_without_profile_sync() {
        let reconciler = Reconciler::new(Arc::new(MemoryStore::default()));

        let first = reconciler.reconcile(&test_identity()).await.expect("ok");

        let changed = ExternalIdentity::new(
            "ext-1".to_string(),
            "Ada Lovelace".to_string(),
            "countess@example.com".to_string(),
            String::new(),
        );
        let second = reconciler.reconcile(&changed).await.expect("ok");

        assert_eq!(first.id(), second.id());
        // The stored profile wins over the fresh provider data
        assert_eq!(second.name(), "Ada");
        assert_eq!(second.email(), "ada@example.com");
    }

    #[tokio::test]
    async fn lost_race_resolves_to_winners_row() {
        let store = Arc::new(RacingStore {
            inner: MemoryStore::default(),
        });
        let reconciler = Reconciler::new(store.clone());

        let user = reconciler.reconcile(&test_identity()).await.expect("ok");

        let winner = store
            .find_by_external_id("ext-1")
            .await
            .expect("ok")
            .expect("row exists");
        assert_eq!(user.id(), winner.id());
    }

    #[tokio::test]
    async fn concurrent_logins_yield_one_row() {
        let store = Arc::new(MemoryStore::default());
        let a = Reconciler::new(store.clone());
        let b = Reconciler::new(store.clone());

        let identity_a = test_identity();
        let identity_b = test_identity();
        let (first, second) = tokio::join!(
            a.reconcile(&identity_a),
            b.reconcile(&identity_b)
        );

        let first = first.expect("ok");
        let second = second.expect("ok");
        assert_eq!(first.id(), second.id());
        assert_eq!(store.users.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn unavailable_store_aborts_login() {
        let store = Arc::new(MemoryStore::default());
        store.unavailable.store(true, Ordering::SeqCst);
        let reconciler = Reconciler::new(store);

        let result = reconciler.reconcile(&test_identity()).await;

        assert!(matches!(
            result,
            Err(ReconcileError::StoreUnavailable { .. })
        ));
    }

    /// Duplicate on create but nothing to re-read; reported as the store
    /// being unavailable so the user retries.
    #[tokio::test]
    async fn vanished_winner_reports_unavailable() {
        struct VanishingStore;

        #[async_trait]
        impl UserStore for VanishingStore {
            async fn find_by_external_id(&self, _: &str) -> Result<Option<User>, StoreError> {
                Ok(None)
            }

            async fn create(&self, _: &ExternalIdentity) -> Result<User, StoreError> {
                Err(StoreError::Duplicate)
            }

            async fn ping(&self) -> Result<(), StoreError> {
                Ok(())
            }
        }

        let reconciler = Reconciler::new(Arc::new(VanishingStore));
        let result = reconciler.reconcile(&test_identity()).await;

        assert!(matches!(
            result,
            Err(ReconcileError::StoreUnavailable { .. })
        ));
    }
}
