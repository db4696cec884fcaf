//! Overall performance scoring and tier classification.

use crate::domain::metrics::{DealMetrics, RevenueMetrics};
use crate::domain::skills::SkillScores;
use serde::{Deserialize, Serialize};

/// One of five ordered performance classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    TopPerformer,
    HighPerformer,
    Average,
    NeedsImprovement,
    AtRisk,
}

impl PerformanceTier {
    /// Fixed bucket order used for team distributions
    pub const ALL: [PerformanceTier; 5] = [
        PerformanceTier::TopPerformer,
        PerformanceTier::HighPerformer,
        PerformanceTier::Average,
        PerformanceTier::NeedsImprovement,
        PerformanceTier::AtRisk,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceTier::TopPerformer => "Top Performer",
            PerformanceTier::HighPerformer => "High Performer",
            PerformanceTier::Average => "Average",
            PerformanceTier::NeedsImprovement => "Needs Improvement",
            PerformanceTier::AtRisk => "At Risk",
        }
    }
}

impl std::fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Weighted overall score in [0,100].
///
/// 0.30 quota attainment + 0.20 win rate + 0.30 mean skill score
/// + 0.10 velocity component + 0.10 growth component, clamped at the end.
pub fn overall_score(skills: &SkillScores, deals: &DealMetrics, revenue: &RevenueMetrics) -> f64 {
    let quota_component = revenue.quota_attainment * 100.0;
    let win_rate_component = deals.win_rate * 100.0;
    let skill_component = skills.mean();
    let velocity_component = (deals.deal_velocity * 20.0).min(100.0);
    let growth_component = (revenue.growth_rate * 50.0 + 50.0).min(100.0);

    let weighted = quota_component * 0.30
        + win_rate_component * 0.20
        + skill_component * 0.30
        + velocity_component * 0.10
        + growth_component * 0.10;

    weighted.clamp(0.0, 100.0)
}

/// Tier decision tree. Evaluated top-down, first match wins; later rules are
/// unreachable once an earlier one fires, so the order here is load-bearing.
pub fn classify(overall_score: f64, win_rate: f64, quota_attainment: f64) -> PerformanceTier {
    if overall_score >= 85.0 && (win_rate >= 0.8 || quota_attainment >= 1.2) {
        PerformanceTier::TopPerformer
    } else if overall_score >= 70.0 && (win_rate >= 0.6 || quota_attainment >= 1.0) {
        PerformanceTier::HighPerformer
    } else if overall_score >= 50.0 {
        PerformanceTier::Average
    } else if overall_score >= 30.0 {
        PerformanceTier::NeedsImprovement
    } else {
        PerformanceTier::AtRisk
    }
}
