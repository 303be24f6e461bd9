//! Rule-based intervention planning.
//!
//! The planner is a pure mapping from a [`RiskAssessment`] to a prioritized
//! action list: no network, no storage, so it is testable against fixed
//! fixtures. Rules are evaluated in a fixed order so critical items always
//! surface first regardless of how many rules match.

mod rules;

use std::collections::HashSet;

use super::domain::{
    InterventionPlan, Resource, RiskAssessment, RiskConfig, RiskLevel, TrendDirection,
};

/// Stateless planner applying the fixed rule table to a risk assessment.
pub struct InterventionPlanner {
    config: RiskConfig,
}

impl InterventionPlanner {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn plan(&self, risk: &RiskAssessment) -> InterventionPlan {
        let mut actions = rules::matching_actions(risk, &self.config);

        let mut seen = HashSet::new();
        actions.retain(|action| seen.insert(action.id.clone()));

        InterventionPlan {
            elya_prompts: conversation_prompts(risk),
            resources: resource_links(risk.risk_level),
            actions,
        }
    }
}

/// Suggested conversation starters for the companion feature. Opaque strings
/// as far as this service is concerned.
fn conversation_prompts(risk: &RiskAssessment) -> Vec<String> {
    let mut prompts = Vec::new();

    match risk.trend {
        TrendDirection::Worsening | TrendDirection::Declining => prompts.push(
            "My check-ins have been trending worse lately. Can you help me figure out what \
             has been draining me?"
                .to_string(),
        ),
        TrendDirection::Improving => prompts.push(
            "Things have been getting a little better. What should I keep doing to hold on \
             to that?"
                .to_string(),
        ),
        TrendDirection::Stable => {}
    }

    if risk.factors.chronic_stress_detected {
        prompts.push(
            "I think I've been running hot for a couple of weeks now. How do I plan a real \
             recovery, not just a day off?"
                .to_string(),
        );
    }

    if risk.risk_level.is_elevated() {
        prompts.push(
            "Today felt like too much. Can you walk me through a short grounding exercise?"
                .to_string(),
        );
    }

    if prompts.is_empty() {
        prompts.push("What's one small thing I could do for myself today?".to_string());
    }

    prompts
}

fn resource_links(risk_level: RiskLevel) -> Vec<Resource> {
    let mut resources = vec![
        Resource {
            title: "Grounding exercise library".to_string(),
            url: "https://interp.care/resources/grounding".to_string(),
        },
        Resource {
            title: "Interpreter peer support network".to_string(),
            url: "https://interp.care/resources/peer-support".to_string(),
        },
    ];

    if risk_level.is_elevated() {
        resources.insert(
            0,
            Resource {
                title: "Confidential counseling and crisis resources".to_string(),
                url: "https://interp.care/resources/counseling".to_string(),
            },
        );
    }

    resources
}
