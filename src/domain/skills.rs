//! Skill scoring: twelve bounded [0,100] competency indicators derived from
//! the six metric groups.
//!
//! Every dimension is an independently clamped linear blend of one or two
//! upstream rates. Identical metric inputs always produce identical scores;
//! there is no randomness and no external state.

use crate::domain::metrics::{
    ActivityMetrics, CommunicationMetrics, ConversionMetrics, DealMetrics, EfficiencyMetrics,
    RevenueMetrics, decimal_to_f64, ratio,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillDimension {
    Prospecting,
    Discovery,
    Qualification,
    Presentation,
    ObjectionHandling,
    Closing,
    RelationshipBuilding,
    FollowUp,
    Negotiation,
    TimeManagement,
    PipelineManagement,
    AiToolAdoption,
}

impl SkillDimension {
    pub const ALL: [SkillDimension; 12] = [
        SkillDimension::Prospecting,
        SkillDimension::Discovery,
        SkillDimension::Qualification,
        SkillDimension::Presentation,
        SkillDimension::ObjectionHandling,
        SkillDimension::Closing,
        SkillDimension::RelationshipBuilding,
        SkillDimension::FollowUp,
        SkillDimension::Negotiation,
        SkillDimension::TimeManagement,
        SkillDimension::PipelineManagement,
        SkillDimension::AiToolAdoption,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SkillDimension::Prospecting => "Prospecting",
            SkillDimension::Discovery => "Discovery",
            SkillDimension::Qualification => "Qualification",
            SkillDimension::Presentation => "Presentation",
            SkillDimension::ObjectionHandling => "Objection Handling",
            SkillDimension::Closing => "Closing",
            SkillDimension::RelationshipBuilding => "Relationship Building",
            SkillDimension::FollowUp => "Follow-Up",
            SkillDimension::Negotiation => "Negotiation",
            SkillDimension::TimeManagement => "Time Management",
            SkillDimension::PipelineManagement => "Pipeline Management",
            SkillDimension::AiToolAdoption => "AI Tool Adoption",
        }
    }
}

impl std::fmt::Display for SkillDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Exactly twelve named dimensions, each clamped to [0,100]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillScores {
    pub prospecting: f64,
    pub discovery: f64,
    pub qualification: f64,
    pub presentation: f64,
    pub objection_handling: f64,
    pub closing: f64,
    pub relationship_building: f64,
    pub follow_up: f64,
    pub negotiation: f64,
    pub time_management: f64,
    pub pipeline_management: f64,
    pub ai_tool_adoption: f64,
}

fn cap(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

impl SkillScores {
    pub fn derive(
        deals: &DealMetrics,
        communication: &CommunicationMetrics,
        activity: &ActivityMetrics,
        conversion: &ConversionMetrics,
        revenue: &RevenueMetrics,
        efficiency: &EfficiencyMetrics,
    ) -> Self {
        let pipeline_value = decimal_to_f64(revenue.pipeline_value);
        let average_deal_size = decimal_to_f64(deals.average_deal_size);
        let healthy_deal_share = ratio(
            deals.health_distribution.healthy as f64,
            (deals.health_distribution.healthy
                + deals.health_distribution.warning
                + deals.health_distribution.critical) as f64,
        );

        Self {
            prospecting: cap(deals.deal_velocity * 10.0 + (pipeline_value / 100_000.0) * 20.0),
            discovery: cap(conversion.lead_to_opportunity_rate * 100.0),
            qualification: cap(conversion.opportunity_to_proposal_rate * 100.0),
            presentation: cap(
                conversion.proposal_to_close_rate * 80.0 + deals.win_rate * 20.0,
            ),
            objection_handling: cap(
                deals.win_rate * 70.0 + conversion.proposal_to_close_rate * 30.0,
            ),
            closing: cap(deals.win_rate * 50.0 + revenue.quota_attainment * 50.0),
            relationship_building: cap(
                communication.email_response_rate * 50.0 + activity.follow_up_consistency * 0.5,
            ),
            follow_up: cap(activity.follow_up_consistency),
            negotiation: cap(deals.win_rate * 60.0 + (average_deal_size / 50_000.0) * 40.0),
            time_management: cap(
                activity.task_completion_rate * 60.0 + efficiency.hours_saved * 2.0,
            ),
            pipeline_management: cap(healthy_deal_share * 100.0),
            ai_tool_adoption: cap(
                efficiency.automation_usage * 50.0 + communication.ai_email_usage_rate * 50.0,
            ),
        }
    }

    pub fn get(&self, dimension: SkillDimension) -> f64 {
        match dimension {
            SkillDimension::Prospecting => self.prospecting,
            SkillDimension::Discovery => self.discovery,
            SkillDimension::Qualification => self.qualification,
            SkillDimension::Presentation => self.presentation,
            SkillDimension::ObjectionHandling => self.objection_handling,
            SkillDimension::Closing => self.closing,
            SkillDimension::RelationshipBuilding => self.relationship_building,
            SkillDimension::FollowUp => self.follow_up,
            SkillDimension::Negotiation => self.negotiation,
            SkillDimension::TimeManagement => self.time_management,
            SkillDimension::PipelineManagement => self.pipeline_management,
            SkillDimension::AiToolAdoption => self.ai_tool_adoption,
        }
    }

    pub fn mean(&self) -> f64 {
        let sum: f64 = SkillDimension::ALL.iter().map(|d| self.get(*d)).sum();
        sum / SkillDimension::ALL.len() as f64
    }
}
