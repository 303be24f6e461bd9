use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{
    Assessment, AssessmentAnswers, ContextFactors, EmotionalDemand, RiskLevel, RiskThresholds,
    WorkloadIntensity,
};

/// Malformed input to the scoring engine. Fatal to the call; answers are
/// never clamped because clamping would mask upstream bugs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{dimension} must be between 1 and 5, got {value}")]
    OutOfRange { dimension: &'static str, value: u8 },
}

/// Result of scoring a single check-in.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub total_score: f32,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
}

/// Pure scoring function: five ordinal answers plus optional context become a
/// total score, a risk band, and human-readable recommendations.
pub fn evaluate(
    answers: &AssessmentAnswers,
    context: Option<&ContextFactors>,
    thresholds: &RiskThresholds,
) -> Result<ScoreOutcome, ValidationError> {
    validate(answers)?;

    let dimensions = answers.dimensions();
    let sum: u32 = dimensions.iter().map(|(_, value)| u32::from(*value)).sum();
    let total_score = sum as f32 / dimensions.len() as f32;
    let risk_level = RiskLevel::from_score(total_score, thresholds);

    let mut recommendations = Vec::new();
    if risk_level.is_elevated() {
        recommendations.push(
            "Urgent: today's check-in shows elevated burnout risk. Protect recovery time \
             before accepting additional assignments."
                .to_string(),
        );
    }

    for (dimension, value) in dimensions {
        if value >= 4 {
            recommendations.push(dimension_remediation(dimension).to_string());
        }
    }

    if let Some(context) = context {
        if context.workload == WorkloadIntensity::Heavy && !context.had_breaks {
            recommendations.push(
                "A heavy day without breaks compounds fatigue. Block at least one 10-minute \
                 pause between assignments tomorrow."
                    .to_string(),
            );
        }
        if context.difficult_session && context.emotional_demand == EmotionalDemand::High {
            recommendations.push(
                "After an emotionally demanding session, a short structured debrief helps \
                 discharge residual stress."
                    .to_string(),
            );
        }
    }

    Ok(ScoreOutcome {
        total_score,
        risk_level,
        recommendations,
    })
}

/// Score a check-in and assemble the immutable [`Assessment`] record.
pub fn build_assessment(
    answers: AssessmentAnswers,
    context: Option<ContextFactors>,
    date: NaiveDate,
    recorded_at: DateTime<Utc>,
    thresholds: &RiskThresholds,
) -> Result<Assessment, ValidationError> {
    let outcome = evaluate(&answers, context.as_ref(), thresholds)?;
    Ok(Assessment {
        answers,
        context,
        total_score: outcome.total_score,
        risk_level: outcome.risk_level,
        date,
        recorded_at,
    })
}

fn validate(answers: &AssessmentAnswers) -> Result<(), ValidationError> {
    for (dimension, value) in answers.dimensions() {
        if !(1..=5).contains(&value) {
            return Err(ValidationError::OutOfRange { dimension, value });
        }
    }
    Ok(())
}

fn dimension_remediation(dimension: &'static str) -> &'static str {
    match dimension {
        "energy_tank" => {
            "Your energy reserves are running low. Schedule genuine rest before your next \
             heavy assignment."
        }
        "recovery_speed" => {
            "Recovery between assignments is slowing down. Build longer buffers into this \
             week's schedule."
        }
        "emotional_leakage" => {
            "Session content is following you home. Try a closing ritual to leave the work \
             at the booth."
        }
        "performance_signal" => {
            "You are noticing slips in accuracy or focus. Reduce tomorrow's load while you \
             recover."
        }
        "tomorrow_readiness" => {
            "Dread about tomorrow is a strong early signal. Identify one assignment you can \
             decline or reschedule."
        }
        _ => "Take a moment for a grounding exercise today.",
    }
}
