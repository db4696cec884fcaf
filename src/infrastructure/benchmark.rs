//! Benchmark providers: the injectable strategies supplying the team
//! baseline used in single-rep comparisons.
//!
//! Providers never fail outward. A directory-backed provider that cannot
//! compute a baseline degrades to [`TeamBenchmark::unconfigured`].

use crate::domain::metrics::{TeamBenchmark, ratio};
use crate::domain::ports::{RecordStore, RepDirectory, TeamBenchmarkProvider};
use crate::domain::records::DealStatus;
use crate::domain::time_window::{AnalysisPeriod, TimeWindow};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;
use tracing::warn;

/// Fixed baseline, for deployments with no computed team data and for tests
pub struct StaticBenchmarkProvider {
    baseline: TeamBenchmark,
}

impl StaticBenchmarkProvider {
    pub fn new(baseline: TeamBenchmark) -> Self {
        Self { baseline }
    }

    pub fn unconfigured() -> Self {
        Self::new(TeamBenchmark::unconfigured())
    }
}

#[async_trait]
impl TeamBenchmarkProvider for StaticBenchmarkProvider {
    async fn team_baseline(&self) -> TeamBenchmark {
        self.baseline.clone()
    }
}

/// Baseline computed live from the directory's sales team over a trailing
/// 90-day window.
///
/// Win rate, quota attainment, and deal velocity come from each member's
/// deal records; the overall-score average stays at the fixed default since
/// scoring every member on every lookup would defeat the purpose of a cheap
/// baseline.
pub struct DirectoryBenchmarkProvider {
    store: Arc<dyn RecordStore>,
    directory: Arc<dyn RepDirectory>,
}

impl DirectoryBenchmarkProvider {
    pub fn new(store: Arc<dyn RecordStore>, directory: Arc<dyn RepDirectory>) -> Self {
        Self { store, directory }
    }

    async fn compute(&self) -> Option<TeamBenchmark> {
        let team = match self.directory.sales_team().await {
            Ok(team) => team,
            Err(err) => {
                warn!(error = %err, "team lookup failed, using unconfigured baseline");
                return None;
            }
        };
        if team.is_empty() {
            return None;
        }

        let window = TimeWindow::for_period(AnalysisPeriod::Last90Days, Utc::now())?;
        let mut win_rates = Vec::with_capacity(team.len());
        let mut attainments = Vec::with_capacity(team.len());
        let mut velocities = Vec::with_capacity(team.len());

        for profile in &team {
            let deals = match self.store.deals_in_window(&profile.id, &window).await {
                Ok(deals) => deals,
                Err(err) => {
                    warn!(rep_id = %profile.id, error = %err, "baseline deal query failed, skipping rep");
                    continue;
                }
            };
            let won = deals.iter().filter(|d| d.status == DealStatus::Won).count();
            let lost = deals.iter().filter(|d| d.status == DealStatus::Lost).count();
            win_rates.push(ratio(won as f64, (won + lost) as f64));

            let revenue: Decimal = deals
                .iter()
                .filter(|d| d.status == DealStatus::Won)
                .map(|d| d.amount)
                .sum();
            attainments.push(ratio(
                revenue.to_f64().unwrap_or(0.0),
                profile.quota.to_f64().unwrap_or(0.0),
            ));
            velocities.push(deals.len() as f64 / window.period_days() * 7.0);
        }

        if win_rates.is_empty() {
            return None;
        }

        let mean = |values: &[f64]| ratio(values.iter().sum(), values.len() as f64);
        Some(TeamBenchmark {
            average_overall_score: TeamBenchmark::unconfigured().average_overall_score,
            average_win_rate: mean(&win_rates),
            average_quota_attainment: mean(&attainments),
            average_deal_velocity: mean(&velocities),
        })
    }
}

#[async_trait]
impl TeamBenchmarkProvider for DirectoryBenchmarkProvider {
    async fn team_baseline(&self) -> TeamBenchmark {
        match self.compute().await {
            Some(baseline) => baseline,
            None => TeamBenchmark::unconfigured(),
        }
    }
}
