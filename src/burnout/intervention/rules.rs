use super::super::domain::{
    ActionPriority, InterventionAction, RiskAssessment, RiskConfig, RiskLevel, TrendDirection,
};

/// Energy-trend answers at or below this are treated as depleted reserves.
const LOW_ENERGY_CUTOFF: f32 = 2.5;
/// Fewer check-in days than this in the last week counts as disengagement.
const LOW_ENGAGEMENT_DAYS: u32 = 3;

fn action(
    id: &str,
    title: &str,
    description: &str,
    priority: ActionPriority,
    estimated_time: &str,
) -> InterventionAction {
    InterventionAction {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        priority,
        estimated_time: estimated_time.to_string(),
        completed: false,
    }
}

/// Fixed, ordered rule table. Severe-risk rules run first so that critical
/// actions lead the plan; later rules only add lower-priority items.
pub(crate) fn matching_actions(
    risk: &RiskAssessment,
    config: &RiskConfig,
) -> Vec<InterventionAction> {
    let mut actions = Vec::new();

    if risk.risk_level == RiskLevel::Severe {
        actions.push(action(
            "crisis-reset",
            "Stop and reset today",
            "Your scores indicate severe burnout risk. Cancel or reassign what can wait and \
             take a full recovery block before your next assignment.",
            ActionPriority::Critical,
            "today",
        ));
        actions.push(action(
            "reach-out",
            "Talk to someone you trust",
            "Contact a peer, supervisor, or counselor today. Severe-range scores are not \
             something to carry alone.",
            ActionPriority::Critical,
            "15 min",
        ));
    }

    if risk.risk_level == RiskLevel::High {
        actions.push(action(
            "recovery-block",
            "Protect a recovery block this week",
            "Reserve at least one half-day with no assignments and no screens, and treat it \
             as non-negotiable.",
            ActionPriority::High,
            "half day",
        ));
    }

    if risk.factors.chronic_stress_detected {
        actions.push(action(
            "chronic-pattern-review",
            "Review the last two weeks with fresh eyes",
            "Your scores have stayed elevated for most of two weeks. Map which assignments \
             drain you most and plan a lighter rotation.",
            ActionPriority::High,
            "30 min",
        ));
    }

    if matches!(risk.trend, TrendDirection::Worsening | TrendDirection::Declining) {
        actions.push(action(
            "schedule-supervision",
            "Book a supervision or debrief session",
            "A worsening trend responds best to structured support before it compounds. \
             Schedule a session within the next few days.",
            ActionPriority::High,
            "1 hour",
        ));
    }

    if risk.factors.energy_trend <= LOW_ENERGY_CUTOFF {
        actions.push(action(
            "energy-audit",
            "Audit where the energy goes",
            "Note the three moments that drained you most this week and the one that \
             restored you. Rebalance next week around that.",
            ActionPriority::Medium,
            "20 min",
        ));
        actions.push(action(
            "sleep-reset",
            "Prioritize one early night",
            "Low energy reserves recover fastest with sleep. Pick one night this week to \
             wind down an hour earlier.",
            ActionPriority::Medium,
            "tonight",
        ));
    }

    if risk.factors.stress_level > config.thresholds.moderate_max {
        actions.push(action(
            "grounding-practice",
            "Do a grounding exercise between assignments",
            "A two-minute breathing or grounding practice between sessions keeps stress \
             from accumulating across the day.",
            ActionPriority::Medium,
            "2 min",
        ));
    }

    if risk.factors.engagement_days < LOW_ENGAGEMENT_DAYS {
        actions.push(action(
            "daily-checkin-habit",
            "Rebuild the daily check-in habit",
            "You've checked in fewer than three days this week. A daily reading keeps the \
             trend picture honest.",
            ActionPriority::Low,
            "1 min",
        ));
    }

    if actions.is_empty() {
        actions.push(action(
            "maintain-routine",
            "Keep doing what works",
            "Your signals look steady. Keep the routines that got you here and check in \
             again tomorrow.",
            ActionPriority::Low,
            "ongoing",
        ));
    }

    actions
}
