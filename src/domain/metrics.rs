//! Metric groups computed per rep per window, plus the assembled
//! per-rep snapshot and team-relative comparison.
//!
//! Every rate field is bound to [0,1] (or [0,100] where stated) and defined
//! as 0 when its denominator is 0. Division by zero never raises anywhere in
//! this module.

use crate::domain::skills::SkillScores;
use crate::domain::scoring::PerformanceTier;
use crate::domain::time_window::{AnalysisPeriod, TimeWindow};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// `numerator / denominator`, degrading to 0 on a zero denominator
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Lossy Decimal-to-f64 for score math, the same shape the rest of the
/// crate uses for monetary fields entering rate formulas
pub(crate) fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Three-bucket deal health distribution: healthy >= 70, warning [50, 70),
/// critical < 50. Deals without a health score are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDistribution {
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealMetrics {
    pub total_deals: usize,
    pub active_deals: usize,
    pub won_deals: usize,
    pub lost_deals: usize,
    /// won / (won + lost), 0 if no closed deals
    pub win_rate: f64,
    /// Mean amount over won deals carrying both a creation and close instant
    pub average_deal_size: Decimal,
    /// Mean creation-to-close duration over the same won deals, in days
    pub average_cycle_days: f64,
    /// Deals per week: total_deals / period_days * 7, 0 if period_days <= 0
    pub deal_velocity: f64,
    /// Open deals with a health score below 50
    pub at_risk_deals: usize,
    pub health_distribution: HealthDistribution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunicationMetrics {
    pub emails_sent: usize,
    pub emails_received: usize,
    /// Replied outbound emails / outbound emails, [0,1]
    pub email_response_rate: f64,
    pub ai_generated_emails: usize,
    /// AI-generated outbound / outbound, [0,1]
    pub ai_email_usage_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    pub total_activities: usize,
    pub calls_made: usize,
    pub meetings_held: usize,
    pub tasks_completed: usize,
    /// Completed tasks / tasks, [0,1]
    pub task_completion_rate: f64,
    /// Follow-up activities as a share of all activities, [0,100]
    pub follow_up_consistency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelTransition {
    LeadToOpportunity,
    OpportunityToProposal,
    ProposalToClose,
}

impl std::fmt::Display for FunnelTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FunnelTransition::LeadToOpportunity => "lead to opportunity",
            FunnelTransition::OpportunityToProposal => "opportunity to proposal",
            FunnelTransition::ProposalToClose => "proposal to close",
        };
        f.write_str(label)
    }
}

/// A funnel transition losing more than 30% of deals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropOffPoint {
    pub transition: FunnelTransition,
    /// Share of deals lost across the transition, (0.3, 1.0]
    pub drop_off_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionMetrics {
    pub lead_to_opportunity_rate: f64,
    pub opportunity_to_proposal_rate: f64,
    pub proposal_to_close_rate: f64,
    /// Won deals / total deals, [0,1]
    pub overall_conversion_rate: f64,
    pub drop_off_points: Vec<DropOffPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueMetrics {
    /// Revenue closed inside the window
    pub total_revenue: Decimal,
    /// Open-deal value over the rep's lifetime, not window-scoped
    pub pipeline_value: Decimal,
    /// Window revenue / lifetime quota, 0 if quota is 0
    pub quota_attainment: f64,
    /// Window revenue vs the equal-length preceding window, 0 if the prior
    /// window had no revenue
    pub growth_rate: f64,
    /// Externally supplied placeholder; this core never models forecasts
    pub forecast_accuracy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    pub workflow_executions: usize,
    pub successful_executions: usize,
    /// Workflow executions per activity, capped to [0,1]
    pub automation_usage: f64,
    /// (workflow_executions * 5 + ai_generated_emails * 10) / 60 — a fixed
    /// per-unit time-savings estimate, not measured
    pub hours_saved: f64,
}

/// Team-average baseline used for single-rep relative comparison.
///
/// Supplied by an injectable provider; `unconfigured()` is the explicit
/// fallback state when no computed baseline is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamBenchmark {
    pub average_overall_score: f64,
    pub average_win_rate: f64,
    pub average_quota_attainment: f64,
    pub average_deal_velocity: f64,
}

impl TeamBenchmark {
    /// Fixed default baseline used when no team data is available
    pub fn unconfigured() -> Self {
        Self {
            average_overall_score: 50.0,
            average_win_rate: 0.3,
            average_quota_attainment: 0.8,
            average_deal_velocity: 2.0,
        }
    }
}

/// Signed deltas (rep minus team average) plus a linear percentile proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceComparison {
    pub overall_score_delta: f64,
    pub win_rate_delta: f64,
    pub quota_attainment_delta: f64,
    pub deal_velocity_delta: f64,
    /// clamp(50 + overall_score_delta, 0, 100) — linear, not statistically
    /// rigorous
    pub percentile_rank: f64,
}

impl PerformanceComparison {
    pub fn against(
        overall_score: f64,
        win_rate: f64,
        quota_attainment: f64,
        deal_velocity: f64,
        baseline: &TeamBenchmark,
    ) -> Self {
        let overall_score_delta = overall_score - baseline.average_overall_score;
        Self {
            overall_score_delta,
            win_rate_delta: win_rate - baseline.average_win_rate,
            quota_attainment_delta: quota_attainment - baseline.average_quota_attainment,
            deal_velocity_delta: deal_velocity - baseline.average_deal_velocity,
            percentile_rank: (50.0 + overall_score_delta).clamp(0.0, 100.0),
        }
    }
}

/// Immutable per-rep analysis snapshot. Never mutated after construction;
/// owned exclusively by the caller that requested it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepPerformanceMetrics {
    pub rep_id: String,
    pub name: String,
    pub email: String,
    pub period: AnalysisPeriod,
    pub window: TimeWindow,
    pub deals: DealMetrics,
    pub communication: CommunicationMetrics,
    pub activity: ActivityMetrics,
    pub conversion: ConversionMetrics,
    pub revenue: RevenueMetrics,
    pub efficiency: EfficiencyMetrics,
    pub skills: SkillScores,
    pub overall_score: f64,
    pub tier: PerformanceTier,
    pub vs_team_average: PerformanceComparison,
}
