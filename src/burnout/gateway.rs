use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::cache::{CacheError, LocalCache};
use super::domain::{Assessment, SyncStatus, UserId};
use super::store::AssessmentStore;

/// Which backend actually served a history read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Remote,
    LocalCache,
}

/// Result of a history read. `degraded` is set when the durable store was
/// unreachable and the cache answered instead; an empty assessment list is a
/// legitimate first-time-user state, not an error.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    pub assessments: Vec<Assessment>,
    pub source: DataSource,
    pub degraded: bool,
}

/// Error raised when an assessment could not be stored anywhere. Remote-only
/// failures are downgraded to [`SyncStatus::Pending`] instead.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Durable, idempotent storage of one assessment per user per day, composed
/// from the remote store and the bounded local cache. The cache is written
/// optimistically so the UI can reflect state before the remote write lands.
pub struct PersistenceGateway<S> {
    store: Arc<S>,
    cache: LocalCache,
    migrated: Mutex<HashSet<String>>,
}

impl<S> PersistenceGateway<S>
where
    S: AssessmentStore,
{
    pub fn new(store: Arc<S>, cache: LocalCache) -> Self {
        Self {
            store,
            cache,
            migrated: Mutex::new(HashSet::new()),
        }
    }

    /// Write path: cache first, then the remote upsert when a user id is
    /// present. Remote failure is non-fatal; the caller learns the sync is
    /// pending. Guests never touch the remote store.
    pub async fn save(
        &self,
        user: Option<&UserId>,
        assessment: &Assessment,
        today: NaiveDate,
    ) -> Result<SyncStatus, GatewayError> {
        let cache_result = self.cache.upsert(user, assessment, today);

        let Some(user) = user else {
            cache_result?;
            return Ok(SyncStatus::LocalOnly);
        };

        match self.store.upsert(user, assessment).await {
            Ok(()) => {
                if let Err(error) = &cache_result {
                    warn!(user = user.as_str(), %error, "cache mirror failed after remote write");
                }
                self.migrate_local_history(user).await;
                Ok(SyncStatus::Synced)
            }
            Err(error) => {
                cache_result?;
                info!(user = user.as_str(), %error, "remote write failed, assessment cached locally");
                Ok(SyncStatus::Pending)
            }
        }
    }

    /// Read path: prefer the durable store, silently degrade to the cache on
    /// failure. Guests read straight from the cache.
    pub async fn history(
        &self,
        user: Option<&UserId>,
        since: NaiveDate,
    ) -> Result<HistorySnapshot, GatewayError> {
        let Some(user) = user else {
            let assessments = self.cache.read(None, since)?;
            return Ok(HistorySnapshot {
                assessments,
                source: DataSource::LocalCache,
                degraded: false,
            });
        };

        match self.store.fetch_since(user, since).await {
            Ok(assessments) => Ok(HistorySnapshot {
                assessments,
                source: DataSource::Remote,
                degraded: false,
            }),
            Err(error) => {
                warn!(user = user.as_str(), %error, "remote read failed, serving cached history");
                let assessments = self.cache.read(Some(user), since)?;
                Ok(HistorySnapshot {
                    assessments,
                    source: DataSource::LocalCache,
                    degraded: true,
                })
            }
        }
    }

    /// One-time copy of pre-existing local rows into the durable store. Safe
    /// to run repeatedly: rows the remote already holds are skipped, and any
    /// remote failure leaves the migration to be retried on a later write.
    async fn migrate_local_history(&self, user: &UserId) {
        {
            let migrated = self.migrated.lock().expect("migration mutex poisoned");
            if migrated.contains(user.as_str()) {
                return;
            }
        }

        let local = match self.cache.read_all_for(user) {
            Ok(local) => local,
            Err(error) => {
                warn!(user = user.as_str(), %error, "cache unreadable, skipping migration");
                return;
            }
        };

        let mut copied = 0usize;
        for assessment in &local {
            match self.store.contains(user, assessment.date).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(error) => {
                    debug!(user = user.as_str(), %error, "migration paused, remote unreachable");
                    return;
                }
            }
            if let Err(error) = self.store.upsert(user, assessment).await {
                debug!(user = user.as_str(), %error, "migration paused, remote write failed");
                return;
            }
            copied += 1;
        }

        if copied > 0 {
            info!(user = user.as_str(), copied, "migrated local history to durable store");
        }

        let mut migrated = self.migrated.lock().expect("migration mutex poisoned");
        migrated.insert(user.0.clone());
    }
}
