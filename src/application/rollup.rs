//! Team Rollup Engine: runs per-member analyses in bounded-concurrency
//! batches, aggregates distributions and gaps, extracts best practices and
//! coaching priorities, and caches the payload for the configured TTL.
//!
//! A failure inside one member's analysis never aborts the rollup: the
//! member is recorded in `failed_members` and the batch continues.

use crate::application::analyzer::{RepPerformanceAnalyzer, resolve_window};
use crate::config::Config;
use crate::domain::errors::AnalyticsError;
use crate::domain::insights::{
    BestPractice, MemberFailure, RepHighlight, SkillGap, SupportCandidate, TeamAverages,
    TeamCoachingInsights, TeamInsightsGenerated, TeamInsightsRequest, TeamPerformanceSummary,
    TeamPriority, TierBucket, TopPerformerBenchmark,
};
use crate::domain::metrics::{RepPerformanceMetrics, ratio};
use crate::domain::ports::{EventSink, InsightsCache};
use crate::domain::scoring::PerformanceTier;
use crate::domain::skills::SkillDimension;
use chrono::Utc;
use futures_util::future::join_all;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Opaque model identifier carried on the completion event
const ROLLUP_MODEL: &str = "salescope-rollup-v1";

const SKILL_STRENGTH_FLOOR: f64 = 80.0;
const SKILL_CRITICAL_CEILING: f64 = 60.0;
const SKILL_GAP_THRESHOLD: f64 = 10.0;

pub struct TeamRollupEngine {
    analyzer: Arc<RepPerformanceAnalyzer>,
    cache: Arc<dyn InsightsCache>,
    events: Arc<dyn EventSink>,
    config: Config,
}

impl TeamRollupEngine {
    pub fn new(
        analyzer: Arc<RepPerformanceAnalyzer>,
        cache: Arc<dyn InsightsCache>,
        events: Arc<dyn EventSink>,
        config: Config,
    ) -> Self {
        Self {
            analyzer,
            cache,
            events,
            config,
        }
    }

    pub async fn generate_team_insights(
        &self,
        request: TeamInsightsRequest,
        member_ids: &[String],
        team_name: &str,
    ) -> Result<TeamCoachingInsights, AnalyticsError> {
        let window = resolve_window(request.period, request.custom_range)?;
        let key = request.cache_key();

        if let Some(hit) = self.cache.get(&key).await {
            debug!(key, "returning cached team insights");
            return Ok(hit);
        }

        let started = Instant::now();
        if member_ids.is_empty() {
            warn!(team_id = %request.team_id, "rollup requested for empty member list");
        }

        let mut members: Vec<RepPerformanceMetrics> = Vec::with_capacity(member_ids.len());
        let mut failed_members: Vec<MemberFailure> = Vec::new();

        // Batches bound peak concurrent load on the backing store; batches
        // run one after another, analyses within a batch run concurrently.
        for batch in member_ids.chunks(self.config.batch_size.max(1)) {
            let analyses = join_all(batch.iter().map(|rep_id| {
                self.analyzer
                    .analyze_in_window(rep_id, request.period, window)
            }))
            .await;

            for (rep_id, result) in batch.iter().zip(analyses) {
                match result {
                    Ok(snapshot) => members.push(snapshot),
                    Err(err) => {
                        warn!(rep_id = %rep_id, error = %err, "member analysis failed");
                        failed_members.push(MemberFailure {
                            rep_id: rep_id.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        let summary = summarize(&members);
        let top_performers = top_performers(&members, self.config.top_performer_cap);
        let needs_support = needs_support(&members);
        let skill_gaps = skill_gaps(&members);
        let best_practices = best_practices(&members, self.config.max_best_practices);
        let priorities = team_priorities(&summary, &skill_gaps, self.config.max_priorities);
        let (team_strengths, team_weaknesses) = strengths_and_weaknesses(&summary);

        let insights = TeamCoachingInsights {
            id: Uuid::new_v4(),
            team_id: request.team_id.clone(),
            team_name: team_name.to_string(),
            period: request.period,
            window,
            generated_at: Utc::now(),
            rep_details: request.include_rep_details.then(|| members.clone()),
            top_performers,
            needs_support,
            team_strengths,
            team_weaknesses,
            skill_gaps,
            best_practices,
            priorities,
            failed_members,
            summary,
        };

        self.cache.put(&key, insights.clone()).await;

        let event = TeamInsightsGenerated {
            team_id: insights.team_id.clone(),
            top_performer_count: insights.top_performers.len(),
            at_risk_count: insights.summary.at_risk_count,
            needs_support_count: insights.needs_support.len(),
            team_average_score: insights.summary.averages.overall_score,
            skill_gap_count: insights.skill_gaps.len(),
            best_practice_count: insights.best_practices.len(),
            model: ROLLUP_MODEL.to_string(),
            processing_ms: started.elapsed().as_millis() as u64,
        };
        if let Err(err) = self.events.publish(event).await {
            warn!(error = %err, "insights event publish failed, continuing");
        }

        info!(
            team_id = %insights.team_id,
            members = members.len(),
            failed = insights.failed_members.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "team insights generated"
        );

        Ok(insights)
    }

    /// Unconditionally empties the rollup cache
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}

fn mean_by<F>(members: &[RepPerformanceMetrics], f: F) -> f64
where
    F: Fn(&RepPerformanceMetrics) -> f64,
{
    ratio(members.iter().map(f).sum(), members.len() as f64)
}

fn averages_over(members: &[RepPerformanceMetrics]) -> TeamAverages {
    TeamAverages {
        overall_score: mean_by(members, |m| m.overall_score),
        win_rate: mean_by(members, |m| m.deals.win_rate),
        quota_attainment: mean_by(members, |m| m.revenue.quota_attainment),
        deal_velocity: mean_by(members, |m| m.deals.deal_velocity),
        email_response_rate: mean_by(members, |m| m.communication.email_response_rate),
    }
}

fn is_top_tier(member: &RepPerformanceMetrics) -> bool {
    matches!(
        member.tier,
        PerformanceTier::TopPerformer | PerformanceTier::HighPerformer
    )
}

fn summarize(members: &[RepPerformanceMetrics]) -> TeamPerformanceSummary {
    let total_members = members.len();
    let tier_distribution = PerformanceTier::ALL
        .iter()
        .map(|tier| {
            let count = members.iter().filter(|m| m.tier == *tier).count();
            TierBucket {
                tier: *tier,
                count,
                percentage: ratio(count as f64, total_members as f64) * 100.0,
            }
        })
        .collect();

    let top: Vec<&RepPerformanceMetrics> =
        members.iter().filter(|m| is_top_tier(m)).collect();
    let top_owned: Vec<RepPerformanceMetrics> = top.iter().map(|m| (*m).clone()).collect();

    TeamPerformanceSummary {
        total_members,
        tier_distribution,
        averages: averages_over(members),
        // Trend computation lives outside this core
        trends: Vec::new(),
        at_risk_count: members
            .iter()
            .filter(|m| m.tier == PerformanceTier::AtRisk)
            .count(),
        top_performer_benchmark: TopPerformerBenchmark {
            count: top_owned.len(),
            average_overall_score: mean_by(&top_owned, |m| m.overall_score),
            average_win_rate: mean_by(&top_owned, |m| m.deals.win_rate),
            average_quota_attainment: mean_by(&top_owned, |m| m.revenue.quota_attainment),
            average_deal_velocity: mean_by(&top_owned, |m| m.deals.deal_velocity),
            average_email_response_rate: mean_by(&top_owned, |m| {
                m.communication.email_response_rate
            }),
        },
    }
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn top_performers(members: &[RepPerformanceMetrics], cap: usize) -> Vec<RepHighlight> {
    let mut top: Vec<&RepPerformanceMetrics> =
        members.iter().filter(|m| is_top_tier(m)).collect();
    top.sort_by(|a, b| by_score_desc(a.overall_score, b.overall_score));

    top.into_iter()
        .take(cap)
        .map(|member| {
            let mut scored: Vec<(SkillDimension, f64)> = SkillDimension::ALL
                .iter()
                .map(|d| (*d, member.skills.get(*d)))
                .filter(|(_, score)| *score >= SKILL_STRENGTH_FLOOR)
                .collect();
            scored.sort_by(|a, b| by_score_desc(a.1, b.1));
            RepHighlight {
                rep_id: member.rep_id.clone(),
                name: member.name.clone(),
                overall_score: member.overall_score,
                tier: member.tier,
                strengths: scored
                    .into_iter()
                    .take(3)
                    .map(|(dimension, _)| dimension.label().to_string())
                    .collect(),
            }
        })
        .collect()
}

fn needs_support(members: &[RepPerformanceMetrics]) -> Vec<SupportCandidate> {
    let mut struggling: Vec<&RepPerformanceMetrics> = members
        .iter()
        .filter(|m| {
            matches!(
                m.tier,
                PerformanceTier::NeedsImprovement | PerformanceTier::AtRisk
            )
        })
        .collect();
    // Weakest first
    struggling.sort_by(|a, b| by_score_desc(b.overall_score, a.overall_score));

    struggling
        .into_iter()
        .map(|member| {
            let mut scored: Vec<(SkillDimension, f64)> = SkillDimension::ALL
                .iter()
                .map(|d| (*d, member.skills.get(*d)))
                .filter(|(_, score)| *score < SKILL_CRITICAL_CEILING)
                .collect();
            scored.sort_by(|a, b| by_score_desc(b.1, a.1));
            SupportCandidate {
                rep_id: member.rep_id.clone(),
                name: member.name.clone(),
                overall_score: member.overall_score,
                tier: member.tier,
                critical_areas: scored
                    .into_iter()
                    .take(3)
                    .map(|(dimension, _)| dimension.label().to_string())
                    .collect(),
            }
        })
        .collect()
}

fn skill_gaps(members: &[RepPerformanceMetrics]) -> Vec<SkillGap> {
    let top: Vec<RepPerformanceMetrics> = members
        .iter()
        .filter(|m| is_top_tier(m))
        .cloned()
        .collect();
    if top.is_empty() {
        return Vec::new();
    }

    let mut gaps: Vec<SkillGap> = SkillDimension::ALL
        .iter()
        .filter_map(|dimension| {
            let team_average = mean_by(members, |m| m.skills.get(*dimension));
            let top_performer_average = mean_by(&top, |m| m.skills.get(*dimension));
            let gap = top_performer_average - team_average;
            if gap <= SKILL_GAP_THRESHOLD {
                return None;
            }
            let reps_affected = members
                .iter()
                .filter(|m| {
                    m.skills.get(*dimension) < top_performer_average - SKILL_GAP_THRESHOLD
                })
                .count();
            Some(SkillGap {
                dimension: *dimension,
                team_average,
                top_performer_average,
                gap,
                reps_affected,
            })
        })
        .collect();

    gaps.sort_by(|a, b| by_score_desc(a.gap, b.gap));
    gaps
}

fn best_practices(members: &[RepPerformanceMetrics], cap: usize) -> Vec<BestPractice> {
    let top: Vec<RepPerformanceMetrics> = members
        .iter()
        .filter(|m| is_top_tier(m))
        .cloned()
        .collect();
    if top.is_empty() {
        return Vec::new();
    }

    let team = averages_over(members);
    let top_email = mean_by(&top, |m| m.communication.email_response_rate);
    let top_velocity = mean_by(&top, |m| m.deals.deal_velocity);
    let top_win = mean_by(&top, |m| m.deals.win_rate);
    let top_follow_up = mean_by(&top, |m| m.activity.follow_up_consistency);
    let team_follow_up = mean_by(members, |m| m.activity.follow_up_consistency);
    let top_automation = mean_by(&top, |m| m.efficiency.automation_usage);
    let team_automation = mean_by(members, |m| m.efficiency.automation_usage);

    let mut practices = Vec::new();

    if top_email - team.email_response_rate > 0.10 {
        practices.push(BestPractice {
            title: "Prompt email follow-through".to_string(),
            description: format!(
                "Top performers get replies to {:.0}% of outbound emails vs a team average of {:.0}%",
                top_email * 100.0,
                team.email_response_rate * 100.0
            ),
            team_value: team.email_response_rate,
            top_performer_value: top_email,
        });
    }
    if team.deal_velocity > 0.0 && top_velocity > team.deal_velocity * 1.2 {
        practices.push(BestPractice {
            title: "Faster deal cadence".to_string(),
            description: format!(
                "Top performers work {:.1} deals/week vs a team average of {:.1}",
                top_velocity, team.deal_velocity
            ),
            team_value: team.deal_velocity,
            top_performer_value: top_velocity,
        });
    }
    if top_win - team.win_rate > 0.15 {
        practices.push(BestPractice {
            title: "Disciplined deal selection".to_string(),
            description: format!(
                "Top performers close {:.0}% of decided deals vs a team average of {:.0}%",
                top_win * 100.0,
                team.win_rate * 100.0
            ),
            team_value: team.win_rate,
            top_performer_value: top_win,
        });
    }
    if top_follow_up - team_follow_up > 15.0 {
        practices.push(BestPractice {
            title: "Consistent follow-up".to_string(),
            description: format!(
                "Top performers score {:.0} on follow-up consistency vs a team average of {:.0}",
                top_follow_up, team_follow_up
            ),
            team_value: team_follow_up,
            top_performer_value: top_follow_up,
        });
    }
    if top_automation - team_automation > 0.20 {
        practices.push(BestPractice {
            title: "Workflow automation".to_string(),
            description: format!(
                "Top performers automate {:.0}% of their activity volume vs a team average of {:.0}%",
                top_automation * 100.0,
                team_automation * 100.0
            ),
            team_value: team_automation,
            top_performer_value: top_automation,
        });
    }

    practices.truncate(cap);
    practices
}

fn team_priorities(
    summary: &TeamPerformanceSummary,
    gaps: &[SkillGap],
    cap: usize,
) -> Vec<TeamPriority> {
    let mut priorities = Vec::new();

    if summary.at_risk_count > 0 {
        priorities.push(TeamPriority {
            title: "At-Risk Rep Support".to_string(),
            description: format!(
                "{} member(s) are at risk and need immediate coaching attention",
                summary.at_risk_count
            ),
            importance: 100.0,
        });
    }

    for gap in gaps.iter().take(3) {
        priorities.push(TeamPriority {
            title: format!("Close the {} gap", gap.dimension),
            description: format!(
                "Team averages {:.0} vs top-performer {:.0}; {} rep(s) trailing by more than 10 points",
                gap.team_average, gap.top_performer_average, gap.reps_affected
            ),
            importance: (60.0 + gap.gap).min(100.0),
        });
    }

    if summary.total_members > 0 {
        if summary.averages.quota_attainment < 0.8 {
            priorities.push(TeamPriority {
                title: "Quota Attainment".to_string(),
                description: format!(
                    "Team quota attainment is {:.0}%, below the 80% floor",
                    summary.averages.quota_attainment * 100.0
                ),
                importance: 90.0,
            });
        }
        if summary.averages.win_rate < 0.25 {
            priorities.push(TeamPriority {
                title: "Win Rate Improvement".to_string(),
                description: format!(
                    "Team win rate is {:.0}%, below the 25% floor",
                    summary.averages.win_rate * 100.0
                ),
                importance: 85.0,
            });
        }
    }

    priorities.sort_by(|a, b| by_score_desc(a.importance, b.importance));
    priorities.truncate(cap);
    priorities
}

fn strengths_and_weaknesses(summary: &TeamPerformanceSummary) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    if summary.total_members == 0 {
        return (strengths, weaknesses);
    }

    let averages = &summary.averages;
    let at_risk_share = ratio(summary.at_risk_count as f64, summary.total_members as f64);

    if averages.win_rate > 0.35 {
        strengths.push(format!(
            "Strong team win rate at {:.0}%",
            averages.win_rate * 100.0
        ));
    }
    if averages.win_rate < 0.25 {
        weaknesses.push(format!(
            "Low team win rate at {:.0}%",
            averages.win_rate * 100.0
        ));
    }
    if averages.quota_attainment >= 1.0 {
        strengths.push(format!(
            "Team is at or above quota ({:.0}%)",
            averages.quota_attainment * 100.0
        ));
    }
    if averages.quota_attainment < 0.7 {
        weaknesses.push(format!(
            "Team quota attainment is {:.0}%",
            averages.quota_attainment * 100.0
        ));
    }
    if averages.email_response_rate > 0.6 {
        strengths.push(format!(
            "High email engagement ({:.0}% response rate)",
            averages.email_response_rate * 100.0
        ));
    }
    if averages.email_response_rate < 0.3 {
        weaknesses.push(format!(
            "Weak email engagement ({:.0}% response rate)",
            averages.email_response_rate * 100.0
        ));
    }
    if at_risk_share < 0.1 {
        strengths.push("Very few members at risk".to_string());
    }
    if at_risk_share > 0.25 {
        weaknesses.push(format!(
            "{:.0}% of the team is at risk",
            at_risk_share * 100.0
        ));
    }

    (strengths, weaknesses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::{
        ActivityMetrics, CommunicationMetrics, ConversionMetrics, DealMetrics,
        EfficiencyMetrics, PerformanceComparison, RevenueMetrics, TeamBenchmark,
    };
    use crate::domain::skills::SkillScores;
    use crate::domain::time_window::{AnalysisPeriod, TimeWindow};
    use chrono::Duration;

    fn uniform_skills(score: f64) -> SkillScores {
        SkillScores {
            prospecting: score,
            discovery: score,
            qualification: score,
            presentation: score,
            objection_handling: score,
            closing: score,
            relationship_building: score,
            follow_up: score,
            negotiation: score,
            time_management: score,
            pipeline_management: score,
            ai_tool_adoption: score,
        }
    }

    fn member(
        id: &str,
        overall_score: f64,
        tier: PerformanceTier,
        win_rate: f64,
        quota_attainment: f64,
        skill_level: f64,
    ) -> RepPerformanceMetrics {
        let now = Utc::now();
        RepPerformanceMetrics {
            rep_id: id.to_string(),
            name: format!("Rep {}", id),
            email: format!("{}@example.com", id),
            period: AnalysisPeriod::Last30Days,
            window: TimeWindow::new(now - Duration::days(30), now),
            deals: DealMetrics {
                win_rate,
                deal_velocity: 2.0,
                ..DealMetrics::default()
            },
            communication: CommunicationMetrics {
                email_response_rate: 0.5,
                ..CommunicationMetrics::default()
            },
            activity: ActivityMetrics::default(),
            conversion: ConversionMetrics::default(),
            revenue: RevenueMetrics {
                quota_attainment,
                ..RevenueMetrics::default()
            },
            efficiency: EfficiencyMetrics::default(),
            skills: uniform_skills(skill_level),
            overall_score,
            tier,
            vs_team_average: PerformanceComparison::against(
                overall_score,
                win_rate,
                quota_attainment,
                2.0,
                &TeamBenchmark::unconfigured(),
            ),
        }
    }

    fn four_rep_team() -> Vec<RepPerformanceMetrics> {
        vec![
            member("a", 92.0, PerformanceTier::TopPerformer, 0.85, 1.3, 90.0),
            member("b", 78.0, PerformanceTier::HighPerformer, 0.65, 1.0, 80.0),
            member("c", 55.0, PerformanceTier::Average, 0.4, 0.7, 50.0),
            member("d", 22.0, PerformanceTier::AtRisk, 0.1, 0.2, 20.0),
        ]
    }

    #[test]
    fn test_four_rep_distribution_is_25_percent_per_occupied_bucket() {
        let summary = summarize(&four_rep_team());
        assert_eq!(summary.total_members, 4);
        assert_eq!(summary.at_risk_count, 1);
        assert_eq!(summary.tier_distribution.len(), 5);
        let total_pct: f64 = summary
            .tier_distribution
            .iter()
            .map(|b| b.percentage)
            .sum();
        assert!((total_pct - 100.0).abs() < 1e-9);
        for bucket in &summary.tier_distribution {
            let expected = if bucket.tier == PerformanceTier::NeedsImprovement {
                0.0
            } else {
                25.0
            };
            assert_eq!(bucket.percentage, expected, "{}", bucket.tier);
        }
    }

    #[test]
    fn test_empty_team_distribution_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_members, 0);
        assert!(summary.tier_distribution.iter().all(|b| b.percentage == 0.0));
        assert_eq!(summary.averages.overall_score, 0.0);
        let (strengths, weaknesses) = strengths_and_weaknesses(&summary);
        assert!(strengths.is_empty());
        assert!(weaknesses.is_empty());
    }

    #[test]
    fn test_first_priority_is_at_risk_support_with_importance_100() {
        let team = four_rep_team();
        let summary = summarize(&team);
        let gaps = skill_gaps(&team);
        let priorities = team_priorities(&summary, &gaps, 5);
        assert!(!priorities.is_empty());
        assert_eq!(priorities[0].title, "At-Risk Rep Support");
        assert_eq!(priorities[0].importance, 100.0);
        assert!(priorities.len() <= 5);
        // Sorted descending throughout
        for pair in priorities.windows(2) {
            assert!(pair[0].importance >= pair[1].importance);
        }
    }

    #[test]
    fn test_top_performers_sorted_descending_and_annotated() {
        let highlights = top_performers(&four_rep_team(), 10);
        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[0].rep_id, "a");
        assert_eq!(highlights[1].rep_id, "b");
        // Uniform 90-point skills: strengths capped at 3
        assert_eq!(highlights[0].strengths.len(), 3);
    }

    #[test]
    fn test_top_performer_cap_is_honored() {
        let mut team = Vec::new();
        for i in 0..15 {
            team.push(member(
                &format!("t{}", i),
                90.0,
                PerformanceTier::TopPerformer,
                0.9,
                1.5,
                85.0,
            ));
        }
        assert_eq!(top_performers(&team, 10).len(), 10);
    }

    #[test]
    fn test_needs_support_sorted_weakest_first() {
        let team = vec![
            member("x", 45.0, PerformanceTier::NeedsImprovement, 0.3, 0.5, 45.0),
            member("y", 15.0, PerformanceTier::AtRisk, 0.0, 0.1, 10.0),
        ];
        let support = needs_support(&team);
        assert_eq!(support.len(), 2);
        assert_eq!(support[0].rep_id, "y");
        assert_eq!(support[1].rep_id, "x");
        assert!(support[0].critical_areas.len() <= 3);
    }

    #[test]
    fn test_skill_gaps_filtered_and_sorted_descending() {
        let mut strong = member("s", 90.0, PerformanceTier::TopPerformer, 0.9, 1.3, 0.0);
        strong.skills = SkillScores {
            closing: 95.0,
            prospecting: 80.0,
            discovery: 55.0,
            ..uniform_skills(50.0)
        };
        let mut weak = member("w", 40.0, PerformanceTier::NeedsImprovement, 0.2, 0.4, 0.0);
        weak.skills = SkillScores {
            closing: 35.0,
            prospecting: 50.0,
            discovery: 52.0,
            ..uniform_skills(50.0)
        };
        let team = vec![strong, weak];

        let gaps = skill_gaps(&team);
        // closing: top 95, team 65 -> gap 30; prospecting: top 80, team 65 -> 15
        // discovery: top 55, team 53.5 -> 1.5 (excluded); uniform dims gap 0
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].dimension, SkillDimension::Closing);
        assert!((gaps[0].gap - 30.0).abs() < 1e-9);
        assert_eq!(gaps[0].reps_affected, 1);
        assert_eq!(gaps[1].dimension, SkillDimension::Prospecting);
        assert!((gaps[1].gap - 15.0).abs() < 1e-9);
        assert!(gaps[0].gap > gaps[1].gap);
    }

    #[test]
    fn test_skill_gaps_empty_without_top_performers() {
        let team = vec![
            member("c", 55.0, PerformanceTier::Average, 0.4, 0.7, 50.0),
            member("d", 22.0, PerformanceTier::AtRisk, 0.1, 0.2, 20.0),
        ];
        assert!(skill_gaps(&team).is_empty());
    }

    #[test]
    fn test_best_practice_triggers_on_win_rate_spread() {
        let mut team = four_rep_team();
        // Widen the win-rate spread past 0.15 over the team average
        team[0].deals.win_rate = 0.9;
        team[1].deals.win_rate = 0.8;
        team[2].deals.win_rate = 0.2;
        team[3].deals.win_rate = 0.05;

        let practices = best_practices(&team, 5);
        assert!(
            practices
                .iter()
                .any(|p| p.title == "Disciplined deal selection")
        );
        for practice in &practices {
            assert!(practice.top_performer_value > practice.team_value);
        }
        assert!(practices.len() <= 5);
    }

    #[test]
    fn test_strength_and_weakness_strings_are_independent() {
        let team = four_rep_team();
        let summary = summarize(&team);
        let (strengths, weaknesses) = strengths_and_weaknesses(&summary);
        // Win rate avg = 0.5 -> strength; at-risk share 25% is not > 25%
        assert!(strengths.iter().any(|s| s.contains("win rate")));
        assert!(!weaknesses.iter().any(|w| w.contains("at risk")));
    }
}
