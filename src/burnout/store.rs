use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::domain::{Assessment, OutcomeEvent, UserId};

/// Error enumeration for durable-store failures. Network, auth, and quota
/// problems all collapse into `Unavailable`; the gateway downgrades them into
/// degraded-mode results.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("durable store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over the hosted assessment table, keyed by
/// `(user_id, assessment_date)`. Upsert semantics: one row per user per day,
/// last write wins.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Insert or replace the row for `(user, assessment.date)`.
    async fn upsert(&self, user: &UserId, assessment: &Assessment) -> Result<(), StoreError>;

    /// Rows for `user` with `date >= since`, ordered by date ascending.
    async fn fetch_since(
        &self,
        user: &UserId,
        since: NaiveDate,
    ) -> Result<Vec<Assessment>, StoreError>;

    /// Whether a row already exists for `(user, date)`. Used by migration to
    /// skip rows the remote already holds.
    async fn contains(&self, user: &UserId, date: NaiveDate) -> Result<bool, StoreError>;
}

/// In-memory stand-in for the hosted data store, also used as the test
/// double. The BTreeMap key keeps range reads date-ordered for free.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<(String, NaiveDate), Assessment>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.rows.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AssessmentStore for MemoryStore {
    async fn upsert(&self, user: &UserId, assessment: &Assessment) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().expect("store mutex poisoned");
        rows.insert((user.0.clone(), assessment.date), assessment.clone());
        Ok(())
    }

    async fn fetch_since(
        &self,
        user: &UserId,
        since: NaiveDate,
    ) -> Result<Vec<Assessment>, StoreError> {
        let rows = self.rows.lock().expect("store mutex poisoned");
        Ok(rows
            .iter()
            .filter(|((id, date), _)| id == &user.0 && *date >= since)
            .map(|(_, assessment)| assessment.clone())
            .collect())
    }

    async fn contains(&self, user: &UserId, date: NaiveDate) -> Result<bool, StoreError> {
        let rows = self.rows.lock().expect("store mutex poisoned");
        Ok(rows.contains_key(&(user.0.clone(), date)))
    }
}

/// Error raised when an outcome event cannot be appended.
#[derive(Debug, thiserror::Error)]
pub enum OutcomeLogError {
    #[error("outcome log unavailable: {0}")]
    Unavailable(String),
}

/// Append-only sink for intervention outcome events. The analysis pipeline
/// consuming the log lives outside this service.
pub trait OutcomeLog: Send + Sync {
    fn record(&self, user: Option<&UserId>, event: OutcomeEvent) -> Result<(), OutcomeLogError>;
}

/// In-memory outcome log used by the default wiring and by tests.
#[derive(Default)]
pub struct MemoryOutcomeLog {
    events: Mutex<Vec<(Option<UserId>, OutcomeEvent)>>,
}

impl MemoryOutcomeLog {
    pub fn events(&self) -> Vec<(Option<UserId>, OutcomeEvent)> {
        self.events.lock().expect("outcome mutex poisoned").clone()
    }
}

impl OutcomeLog for MemoryOutcomeLog {
    fn record(&self, user: Option<&UserId>, event: OutcomeEvent) -> Result<(), OutcomeLogError> {
        let mut events = self.events.lock().expect("outcome mutex poisoned");
        events.push((user.cloned(), event));
        Ok(())
    }
}
