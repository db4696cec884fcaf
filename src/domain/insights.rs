//! Team rollup output types: summary, gaps, best practices, priorities,
//! the cached insights payload and the completion event.

use crate::domain::metrics::RepPerformanceMetrics;
use crate::domain::scoring::PerformanceTier;
use crate::domain::skills::SkillDimension;
use crate::domain::time_window::{AnalysisPeriod, TimeWindow};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rollup request as received at the API boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInsightsRequest {
    pub team_id: String,
    pub period: AnalysisPeriod,
    pub custom_range: Option<TimeWindow>,
    pub include_rep_details: bool,
}

impl TeamInsightsRequest {
    /// Composite cache key: `teamId:period`, extended with the explicit
    /// range for custom windows
    pub fn cache_key(&self) -> String {
        match (self.period, &self.custom_range) {
            (AnalysisPeriod::Custom, Some(range)) => format!(
                "{}:{}:{}:{}",
                self.team_id,
                self.period,
                range.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                range.end.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            _ => format!("{}:{}", self.team_id, self.period),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBucket {
    pub tier: PerformanceTier,
    pub count: usize,
    /// Share of members in this tier; all five buckets sum to 100 (all 0
    /// for an empty team)
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamAverages {
    pub overall_score: f64,
    pub win_rate: f64,
    pub quota_attainment: f64,
    pub deal_velocity: f64,
    pub email_response_rate: f64,
}

/// Benchmark values over members tiered top/high performer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopPerformerBenchmark {
    pub count: usize,
    pub average_overall_score: f64,
    pub average_win_rate: f64,
    pub average_quota_attainment: f64,
    pub average_deal_velocity: f64,
    pub average_email_response_rate: f64,
}

/// Placeholder trend series; trend computation is out of scope for this core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPerformanceSummary {
    pub total_members: usize,
    pub tier_distribution: Vec<TierBucket>,
    pub averages: TeamAverages,
    pub trends: Vec<TrendPoint>,
    pub at_risk_count: usize,
    pub top_performer_benchmark: TopPerformerBenchmark,
}

/// A top/high-tier member with their strongest skills attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepHighlight {
    pub rep_id: String,
    pub name: String,
    pub overall_score: f64,
    pub tier: PerformanceTier,
    /// Up to 3 skills scoring >= 80
    pub strengths: Vec<String>,
}

/// A needs-improvement/at-risk member with their weakest skills attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportCandidate {
    pub rep_id: String,
    pub name: String,
    pub overall_score: f64,
    pub tier: PerformanceTier,
    /// Up to 3 skills scoring < 60
    pub critical_areas: Vec<String>,
}

/// Point difference between team average and top-performer average on one
/// skill dimension. Only gaps above 10 points are retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub dimension: SkillDimension,
    pub team_average: f64,
    pub top_performer_average: f64,
    pub gap: f64,
    /// Members trailing the top-performer average by more than 10 points
    pub reps_affected: usize,
}

/// A templated, data-triggered description of a behavior pattern correlated
/// with top-performer outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPractice {
    pub title: String,
    pub description: String,
    pub team_value: f64,
    pub top_performer_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPriority {
    pub title: String,
    pub description: String,
    pub importance: f64,
}

/// A member whose analysis failed during the rollup. The batch continues;
/// failures are reported alongside the successes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberFailure {
    pub rep_id: String,
    pub reason: String,
}

/// Full team rollup payload; also the cache value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCoachingInsights {
    pub id: Uuid,
    pub team_id: String,
    pub team_name: String,
    pub period: AnalysisPeriod,
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    pub summary: TeamPerformanceSummary,
    /// Present only when the request asked for per-rep detail
    pub rep_details: Option<Vec<RepPerformanceMetrics>>,
    pub top_performers: Vec<RepHighlight>,
    pub needs_support: Vec<SupportCandidate>,
    pub team_strengths: Vec<String>,
    pub team_weaknesses: Vec<String>,
    pub skill_gaps: Vec<SkillGap>,
    pub best_practices: Vec<BestPractice>,
    pub priorities: Vec<TeamPriority>,
    pub failed_members: Vec<MemberFailure>,
}

/// Fire-and-forget notification emitted after a rollup completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInsightsGenerated {
    pub team_id: String,
    pub top_performer_count: usize,
    pub at_risk_count: usize,
    pub needs_support_count: usize,
    pub team_average_score: f64,
    pub skill_gap_count: usize,
    pub best_practice_count: usize,
    /// Opaque model identifier carried through to downstream consumers
    pub model: String,
    pub processing_ms: u64,
}
