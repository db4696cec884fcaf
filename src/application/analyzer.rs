//! Single-rep analysis pipeline: validate the request, resolve the window,
//! aggregate, score, classify, compare against the team baseline.

use crate::domain::errors::AnalyticsError;
use crate::domain::metrics::{PerformanceComparison, RepPerformanceMetrics};
use crate::domain::ports::TeamBenchmarkProvider;
use crate::domain::scoring::{classify, overall_score};
use crate::domain::skills::SkillScores;
use crate::domain::time_window::{AnalysisPeriod, TimeWindow};
use crate::application::aggregator::MetricAggregator;
use chrono::Utc;
use std::sync::Arc;

/// Validate and resolve a period/range pair into a concrete window.
///
/// A custom period without an explicit range is a configuration error and is
/// rejected here, before any resolution or query work starts.
pub fn resolve_window(
    period: AnalysisPeriod,
    custom_range: Option<TimeWindow>,
) -> Result<TimeWindow, AnalyticsError> {
    match period {
        AnalysisPeriod::Custom => {
            let range = custom_range.ok_or_else(|| AnalyticsError::InvalidRequest {
                reason: "custom period requires an explicit start/end range".to_string(),
            })?;
            if range.start >= range.end {
                return Err(AnalyticsError::InvalidRequest {
                    reason: "custom range start must precede end".to_string(),
                });
            }
            Ok(range)
        }
        _ => Ok(TimeWindow::for_period(period, Utc::now())
            .unwrap_or_else(|| TimeWindow::new(Utc::now(), Utc::now()))),
    }
}

pub struct RepPerformanceAnalyzer {
    aggregator: MetricAggregator,
    benchmark: Arc<dyn TeamBenchmarkProvider>,
}

impl RepPerformanceAnalyzer {
    pub fn new(aggregator: MetricAggregator, benchmark: Arc<dyn TeamBenchmarkProvider>) -> Self {
        Self {
            aggregator,
            benchmark,
        }
    }

    /// Analyze one rep over a named or custom period.
    ///
    /// Fails fast with `RepNotFound` for an unknown id and `InvalidRequest`
    /// for a custom period without a range.
    pub async fn analyze(
        &self,
        rep_id: &str,
        period: AnalysisPeriod,
        custom_range: Option<TimeWindow>,
    ) -> Result<RepPerformanceMetrics, AnalyticsError> {
        let window = resolve_window(period, custom_range)?;
        self.analyze_in_window(rep_id, period, window).await
    }

    /// Same pipeline with a pre-resolved window. The rollup engine uses this
    /// so every member of a team shares one identical window.
    pub async fn analyze_in_window(
        &self,
        rep_id: &str,
        period: AnalysisPeriod,
        window: TimeWindow,
    ) -> Result<RepPerformanceMetrics, AnalyticsError> {
        let aggregated = self.aggregator.aggregate(rep_id, &window).await?;

        let skills = SkillScores::derive(
            &aggregated.deals,
            &aggregated.communication,
            &aggregated.activity,
            &aggregated.conversion,
            &aggregated.revenue,
            &aggregated.efficiency,
        );
        let score = overall_score(&skills, &aggregated.deals, &aggregated.revenue);
        let tier = classify(
            score,
            aggregated.deals.win_rate,
            aggregated.revenue.quota_attainment,
        );

        let baseline = self.benchmark.team_baseline().await;
        let vs_team_average = PerformanceComparison::against(
            score,
            aggregated.deals.win_rate,
            aggregated.revenue.quota_attainment,
            aggregated.deals.deal_velocity,
            &baseline,
        );

        Ok(RepPerformanceMetrics {
            rep_id: aggregated.profile.id,
            name: aggregated.profile.name,
            email: aggregated.profile.email,
            period,
            window,
            deals: aggregated.deals,
            communication: aggregated.communication,
            activity: aggregated.activity,
            conversion: aggregated.conversion,
            revenue: aggregated.revenue,
            efficiency: aggregated.efficiency,
            skills,
            overall_score: score,
            tier,
            vs_team_average,
        })
    }
}
