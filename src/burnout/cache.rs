use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Assessment, AssessmentAnswers, ContextFactors, EmotionalDemand, RiskLevel, UserId,
    WorkloadIntensity,
};

/// Error enumeration for local cache failures.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache record error: {0}")]
    Codec(#[from] csv::Error),
}

/// Flat CSV row mirroring one assessment. Context fields are optional columns
/// so guest rows and context-free check-ins serialize cleanly.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRow {
    user_id: Option<String>,
    date: NaiveDate,
    recorded_at: DateTime<Utc>,
    energy_tank: u8,
    recovery_speed: u8,
    emotional_leakage: u8,
    performance_signal: u8,
    tomorrow_readiness: u8,
    workload: Option<WorkloadIntensity>,
    emotional_demand: Option<EmotionalDemand>,
    had_breaks: Option<bool>,
    team_support: Option<bool>,
    difficult_session: Option<bool>,
    total_score: f32,
    risk_level: RiskLevel,
}

impl CacheRow {
    fn from_assessment(user: Option<&UserId>, assessment: &Assessment) -> Self {
        Self {
            user_id: user.map(|user| user.0.clone()),
            date: assessment.date,
            recorded_at: assessment.recorded_at,
            energy_tank: assessment.answers.energy_tank,
            recovery_speed: assessment.answers.recovery_speed,
            emotional_leakage: assessment.answers.emotional_leakage,
            performance_signal: assessment.answers.performance_signal,
            tomorrow_readiness: assessment.answers.tomorrow_readiness,
            workload: assessment.context.map(|context| context.workload),
            emotional_demand: assessment.context.map(|context| context.emotional_demand),
            had_breaks: assessment.context.map(|context| context.had_breaks),
            team_support: assessment.context.map(|context| context.team_support),
            difficult_session: assessment.context.map(|context| context.difficult_session),
            total_score: assessment.total_score,
            risk_level: assessment.risk_level,
        }
    }

    fn into_assessment(self) -> (Option<UserId>, Assessment) {
        let context = match (self.workload, self.emotional_demand) {
            (Some(workload), Some(emotional_demand)) => Some(ContextFactors {
                workload,
                emotional_demand,
                had_breaks: self.had_breaks.unwrap_or(false),
                team_support: self.team_support.unwrap_or(false),
                difficult_session: self.difficult_session.unwrap_or(false),
            }),
            _ => None,
        };

        let assessment = Assessment {
            answers: AssessmentAnswers {
                energy_tank: self.energy_tank,
                recovery_speed: self.recovery_speed,
                emotional_leakage: self.emotional_leakage,
                performance_signal: self.performance_signal,
                tomorrow_readiness: self.tomorrow_readiness,
            },
            context,
            total_score: self.total_score,
            risk_level: self.risk_level,
            date: self.date,
            recorded_at: self.recorded_at,
        };

        (self.user_id.map(UserId), assessment)
    }
}

/// Bounded per-device cache of recent assessments, serialized as CSV. Rows
/// older than the retention window are pruned on write; one row per
/// `(user, date)` with last-write-wins.
pub struct LocalCache {
    path: PathBuf,
    retention_days: i64,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>, retention_days: i64) -> Self {
        Self {
            path: path.into(),
            retention_days: retention_days.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace the row for `(user, assessment.date)`, pruning rows
    /// that fell out of the retention window relative to `today`.
    pub fn upsert(
        &self,
        user: Option<&UserId>,
        assessment: &Assessment,
        today: NaiveDate,
    ) -> Result<(), CacheError> {
        let cutoff = today - Duration::days(self.retention_days);
        let user_id = user.map(|user| user.0.as_str());

        let mut rows = self.load_rows()?;
        rows.retain(|row| {
            row.date >= cutoff
                && !(row.user_id.as_deref() == user_id && row.date == assessment.date)
        });
        rows.push(CacheRow::from_assessment(user, assessment));
        rows.sort_by_key(|row| row.date);

        self.write_rows(&rows)
    }

    /// Cached assessments for `user` with `date >= since`, date ascending.
    pub fn read(
        &self,
        user: Option<&UserId>,
        since: NaiveDate,
    ) -> Result<Vec<Assessment>, CacheError> {
        let user_id = user.map(|user| user.0.as_str());
        let mut assessments: Vec<Assessment> = self
            .load_rows()?
            .into_iter()
            .filter(|row| row.user_id.as_deref() == user_id && row.date >= since)
            .map(|row| row.into_assessment().1)
            .collect();
        assessments.sort_by_key(|assessment| assessment.date);
        Ok(assessments)
    }

    /// Every cached assessment for `user`, used by the one-time migration.
    pub fn read_all_for(&self, user: &UserId) -> Result<Vec<Assessment>, CacheError> {
        self.read(Some(user), NaiveDate::MIN)
    }

    fn load_rows(&self) -> Result<Vec<CacheRow>, CacheError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for result in reader.deserialize::<CacheRow>() {
            rows.push(result?);
        }
        Ok(rows)
    }

    fn write_rows(&self, rows: &[CacheRow]) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
