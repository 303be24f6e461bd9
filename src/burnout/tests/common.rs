use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use crate::burnout::cache::LocalCache;
use crate::burnout::domain::{
    Assessment, AssessmentAnswers, ContextFactors, EmotionalDemand, RiskConfig, UserId,
    WorkloadIntensity,
};
use crate::burnout::scoring;
use crate::burnout::store::{AssessmentStore, MemoryStore, StoreError};

pub(super) fn user(name: &str) -> UserId {
    UserId(name.to_string())
}

pub(super) fn uniform_answers(value: u8) -> AssessmentAnswers {
    AssessmentAnswers {
        energy_tank: value,
        recovery_speed: value,
        emotional_leakage: value,
        performance_signal: value,
        tomorrow_readiness: value,
    }
}

/// Answers whose dimension sum equals `sum` (valid range 5..=25), so fixtures
/// can hit fractional total scores like 2.6 or 3.4.
pub(super) fn answers_totaling(sum: u8) -> AssessmentAnswers {
    assert!((5..=25).contains(&sum), "sum {sum} outside valid range");
    let base = sum / 5;
    let remainder = usize::from(sum % 5);
    let mut values = [base; 5];
    for value in values.iter_mut().take(remainder) {
        *value += 1;
    }
    AssessmentAnswers {
        energy_tank: values[0],
        recovery_speed: values[1],
        emotional_leakage: values[2],
        performance_signal: values[3],
        tomorrow_readiness: values[4],
    }
}

pub(super) fn context() -> ContextFactors {
    ContextFactors {
        workload: WorkloadIntensity::Heavy,
        emotional_demand: EmotionalDemand::High,
        had_breaks: false,
        team_support: true,
        difficult_session: true,
    }
}

pub(super) fn assessment_on(date: NaiveDate, answers: AssessmentAnswers) -> Assessment {
    let recorded_at = Utc
        .with_ymd_and_hms(date.year(), date.month(), date.day(), 18, 0, 0)
        .single()
        .expect("valid timestamp");
    scoring::build_assessment(
        answers,
        None,
        date,
        recorded_at,
        &RiskConfig::default().thresholds,
    )
    .expect("fixture answers are valid")
}

/// One assessment per consecutive day, each day's answers summing to the
/// matching entry of `day_sums`.
pub(super) fn daily_history(start: NaiveDate, day_sums: &[u8]) -> Vec<Assessment> {
    day_sums
        .iter()
        .enumerate()
        .map(|(offset, sum)| {
            assessment_on(start + Duration::days(offset as i64), answers_totaling(*sum))
        })
        .collect()
}

pub(super) fn temp_cache() -> (TempDir, LocalCache) {
    let dir = TempDir::new().expect("temp dir");
    let cache = LocalCache::new(dir.path().join("cache.csv"), 30);
    (dir, cache)
}

/// Remote store that rejects every call, for exercising the degraded paths.
#[derive(Default)]
pub(super) struct UnavailableStore;

#[async_trait]
impl AssessmentStore for UnavailableStore {
    async fn upsert(&self, _user: &UserId, _assessment: &Assessment) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn fetch_since(
        &self,
        _user: &UserId,
        _since: NaiveDate,
    ) -> Result<Vec<Assessment>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn contains(&self, _user: &UserId, _date: NaiveDate) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Remote store whose reads can be switched off while writes keep working,
/// mimicking a flaky network on the query path.
#[derive(Default)]
pub(super) struct ReadFlakyStore {
    inner: MemoryStore,
    reads_down: AtomicBool,
}

impl ReadFlakyStore {
    pub(super) fn take_reads_down(&self) {
        self.reads_down.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssessmentStore for ReadFlakyStore {
    async fn upsert(&self, user: &UserId, assessment: &Assessment) -> Result<(), StoreError> {
        self.inner.upsert(user, assessment).await
    }

    async fn fetch_since(
        &self,
        user: &UserId,
        since: NaiveDate,
    ) -> Result<Vec<Assessment>, StoreError> {
        if self.reads_down.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("query timeout".to_string()));
        }
        self.inner.fetch_since(user, since).await
    }

    async fn contains(&self, user: &UserId, date: NaiveDate) -> Result<bool, StoreError> {
        self.inner.contains(user, date).await
    }
}

pub(super) async fn seed_store(store: &Arc<MemoryStore>, user: &UserId, history: &[Assessment]) {
    for assessment in history {
        store.upsert(user, assessment).await.expect("seed upsert");
    }
}
