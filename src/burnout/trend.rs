use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use super::domain::{
    Assessment, RiskAssessment, RiskConfig, RiskFactors, RiskLevel, TrendDirection, TrendPoint,
};

/// Ordered history series for charting, one point per stored assessment.
pub fn trend_points(assessments: &[Assessment]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = assessments
        .iter()
        .map(|assessment| TrendPoint {
            date: assessment.date,
            risk_score: assessment.total_score,
            risk_level: assessment.risk_level,
        })
        .collect();
    points.sort_by_key(|point| point.date);
    points
}

/// Summarize a history snapshot into a single [`RiskAssessment`].
///
/// Pure: the caller supplies the snapshot and the evaluation date, so fixed
/// fixtures exercise every branch. Returns `None` for an empty history (the
/// first-time-user state). `recommended_actions` is left empty here; the
/// intervention rule table is the authority for action ids.
pub fn summarize(
    assessments: &[Assessment],
    today: NaiveDate,
    config: &RiskConfig,
) -> Option<RiskAssessment> {
    if assessments.is_empty() {
        return None;
    }

    let mut ordered: Vec<&Assessment> = assessments.iter().collect();
    ordered.sort_by_key(|assessment| assessment.date);

    let recent_entries = &ordered[ordered.len().saturating_sub(7)..];
    let energy_trend = mean(
        recent_entries
            .iter()
            .map(|assessment| f32::from(assessment.answers.energy_tank)),
    );
    let stress_level = mean(
        recent_entries
            .iter()
            .map(|assessment| assessment.total_score),
    );

    let engagement_cutoff = today - Duration::days(6);
    let engagement_days = ordered
        .iter()
        .filter(|assessment| assessment.date >= engagement_cutoff)
        .map(|assessment| assessment.date)
        .collect::<HashSet<_>>()
        .len() as u32;

    let chronic_cutoff = today - Duration::days(13);
    let elevated_days = ordered
        .iter()
        .filter(|assessment| {
            assessment.date >= chronic_cutoff
                && assessment.total_score > config.thresholds.high_max
        })
        .map(|assessment| assessment.date)
        .collect::<HashSet<_>>()
        .len();
    let chronic_stress_detected = elevated_days >= 10;

    let (trend, weeks_until_burnout) = classify_trend(&ordered, config);

    Some(RiskAssessment {
        risk_score: stress_level,
        risk_level: RiskLevel::from_score(stress_level, &config.thresholds),
        trend,
        factors: RiskFactors {
            energy_trend,
            stress_level,
            engagement_days,
            chronic_stress_detected,
        },
        weeks_until_burnout,
        recommended_actions: Vec::new(),
    })
}

/// Compare the most recent seven calendar days against the preceding seven.
/// With fewer than fourteen distinct days of history the answer is `Stable`:
/// insufficient data, do not guess.
fn classify_trend(
    ordered: &[&Assessment],
    config: &RiskConfig,
) -> (TrendDirection, Option<u8>) {
    let distinct_days = ordered
        .iter()
        .map(|assessment| assessment.date)
        .collect::<HashSet<_>>()
        .len();
    if distinct_days < 14 {
        return (TrendDirection::Stable, None);
    }

    let latest = ordered
        .last()
        .map(|assessment| assessment.date)
        .expect("non-empty history");
    let recent_start = latest - Duration::days(6);
    let prior_start = latest - Duration::days(13);

    let recent: Vec<f32> = ordered
        .iter()
        .filter(|assessment| assessment.date >= recent_start)
        .map(|assessment| assessment.total_score)
        .collect();
    let prior: Vec<f32> = ordered
        .iter()
        .filter(|assessment| {
            assessment.date >= prior_start && assessment.date < recent_start
        })
        .map(|assessment| assessment.total_score)
        .collect();

    if recent.is_empty() || prior.is_empty() {
        return (TrendDirection::Stable, None);
    }

    let recent_mean = mean(recent.iter().copied());
    let prior_mean = mean(prior.iter().copied());

    if recent_mean < prior_mean - config.trend_epsilon {
        (TrendDirection::Improving, None)
    } else if recent_mean > prior_mean + config.trend_epsilon {
        let weeks = project_weeks_until_severe(recent_mean, prior_mean, config);
        (TrendDirection::Worsening, weeks)
    } else {
        (TrendDirection::Stable, None)
    }
}

/// Linear extrapolation of the weekly slope until the severe threshold.
/// Projections beyond the configured horizon are suppressed; extrapolating
/// far from two data points is not meaningful. A score already past the
/// threshold reports one week (imminent), never zero.
fn project_weeks_until_severe(
    recent_mean: f32,
    prior_mean: f32,
    config: &RiskConfig,
) -> Option<u8> {
    let slope_per_week = recent_mean - prior_mean;
    if slope_per_week <= f32::EPSILON {
        return None;
    }

    let remaining = config.thresholds.high_max - recent_mean;
    if remaining <= 0.0 {
        return Some(1);
    }

    let weeks = (remaining / slope_per_week).ceil() as i64;
    let weeks = weeks.max(1);
    if weeks > i64::from(config.projection_horizon_weeks) {
        None
    } else {
        Some(weeks as u8)
    }
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}
