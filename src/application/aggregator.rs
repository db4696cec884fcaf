//! Metric Aggregator: reduces raw records into the six per-rep metric
//! groups for one window.
//!
//! The six group computations are independent and issued concurrently. Each
//! returns its own `Result`; what happens on a query failure is decided by
//! the configured [`SourceFailurePolicy`], not hard-coded. The single fatal
//! condition is a rep id with no directory record.

use crate::config::SourceFailurePolicy;
use crate::domain::errors::{AnalyticsError, DataSourceError};
use crate::domain::metrics::{
    ActivityMetrics, CommunicationMetrics, ConversionMetrics, DealMetrics, DropOffPoint,
    EfficiencyMetrics, FunnelTransition, HealthDistribution, RevenueMetrics, decimal_to_f64,
    ratio,
};
use crate::domain::ports::{RecordStore, RepDirectory};
use crate::domain::records::{
    ActivityKind, ActivityRecord, DealRecord, DealStage, DealStatus, EmailRecord, RepProfile,
    WorkflowRecord,
};
use crate::domain::time_window::TimeWindow;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;

/// The six metric groups plus the directory profile they were computed for
#[derive(Debug, Clone)]
pub struct AggregatedMetrics {
    pub profile: RepProfile,
    pub deals: DealMetrics,
    pub communication: CommunicationMetrics,
    pub activity: ActivityMetrics,
    pub conversion: ConversionMetrics,
    pub revenue: RevenueMetrics,
    pub efficiency: EfficiencyMetrics,
}

pub struct MetricAggregator {
    store: Arc<dyn RecordStore>,
    directory: Arc<dyn RepDirectory>,
    failure_policy: SourceFailurePolicy,
}

impl MetricAggregator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        directory: Arc<dyn RepDirectory>,
        failure_policy: SourceFailurePolicy,
    ) -> Self {
        Self {
            store,
            directory,
            failure_policy,
        }
    }

    /// Compute all six metric groups for one rep over one window.
    ///
    /// Group queries fan out concurrently; a missing directory record aborts
    /// with [`AnalyticsError::RepNotFound`].
    pub async fn aggregate(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<AggregatedMetrics, AnalyticsError> {
        let profile = self
            .directory
            .find_rep(rep_id)
            .await?
            .ok_or_else(|| AnalyticsError::RepNotFound {
                rep_id: rep_id.to_string(),
            })?;

        let (deals, communication, activity, conversion, revenue, efficiency) = tokio::join!(
            self.deal_metrics(rep_id, window),
            self.communication_metrics(rep_id, window),
            self.activity_metrics(rep_id, window),
            self.conversion_metrics(rep_id, window),
            self.revenue_metrics(rep_id, window, profile.quota),
            self.efficiency_metrics(rep_id, window),
        );

        Ok(AggregatedMetrics {
            profile,
            deals: self.recover(rep_id, "deals", deals)?,
            communication: self.recover(rep_id, "communication", communication)?,
            activity: self.recover(rep_id, "activity", activity)?,
            conversion: self.recover(rep_id, "conversion", conversion)?,
            revenue: self.recover(rep_id, "revenue", revenue)?,
            efficiency: self.recover(rep_id, "efficiency", efficiency)?,
        })
    }

    fn recover<T: Default>(
        &self,
        rep_id: &str,
        group: &str,
        result: Result<T, DataSourceError>,
    ) -> Result<T, AnalyticsError> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => match self.failure_policy {
                SourceFailurePolicy::DegradeToDefault => {
                    warn!(rep_id, group, error = %err, "metric group degraded to defaults");
                    Ok(T::default())
                }
                SourceFailurePolicy::Propagate => Err(err.into()),
            },
        }
    }

    async fn deal_metrics(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<DealMetrics, DataSourceError> {
        let deals = self.store.deals_in_window(rep_id, window).await?;
        Ok(Self::reduce_deals(&deals, window)?)
    }

    fn reduce_deals(
        deals: &[DealRecord],
        window: &TimeWindow,
    ) -> Result<DealMetrics, DataSourceError> {
        let total_deals = deals.len();
        let active_deals = deals.iter().filter(|d| d.status == DealStatus::Open).count();
        let won_deals = deals.iter().filter(|d| d.status == DealStatus::Won).count();
        let lost_deals = deals.iter().filter(|d| d.status == DealStatus::Lost).count();
        let win_rate = ratio(won_deals as f64, (won_deals + lost_deals) as f64);

        // Size and cycle time only over won deals carrying both instants
        let mut sized_total = Decimal::ZERO;
        let mut cycle_total_days = 0.0;
        let mut sized_count = 0usize;
        for deal in deals {
            if deal.status != DealStatus::Won {
                continue;
            }
            let Some(closed_at) = &deal.closed_at else {
                continue;
            };
            let created = deal.created_at.to_instant()?;
            let closed = closed_at.to_instant()?;
            sized_total += deal.amount;
            cycle_total_days += (closed - created).num_seconds() as f64 / 86_400.0;
            sized_count += 1;
        }
        let average_deal_size = if sized_count > 0 {
            sized_total / Decimal::from(sized_count as u64)
        } else {
            Decimal::ZERO
        };
        let average_cycle_days = ratio(cycle_total_days, sized_count as f64);

        let period_days = window.period_days();
        let deal_velocity = if period_days > 0.0 {
            total_deals as f64 / period_days * 7.0
        } else {
            0.0
        };

        let mut health_distribution = HealthDistribution::default();
        let mut at_risk_deals = 0usize;
        for deal in deals {
            if let Some(score) = deal.health_score {
                if score >= 70.0 {
                    health_distribution.healthy += 1;
                } else if score >= 50.0 {
                    health_distribution.warning += 1;
                } else {
                    health_distribution.critical += 1;
                }
                if score < 50.0 && deal.status == DealStatus::Open {
                    at_risk_deals += 1;
                }
            }
        }

        Ok(DealMetrics {
            total_deals,
            active_deals,
            won_deals,
            lost_deals,
            win_rate,
            average_deal_size,
            average_cycle_days,
            deal_velocity,
            at_risk_deals,
            health_distribution,
        })
    }

    async fn communication_metrics(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<CommunicationMetrics, DataSourceError> {
        let emails = self.store.emails_in_window(rep_id, window).await?;
        Ok(Self::reduce_emails(&emails))
    }

    fn reduce_emails(emails: &[EmailRecord]) -> CommunicationMetrics {
        let outbound: Vec<&EmailRecord> = emails.iter().filter(|e| e.outbound).collect();
        let emails_sent = outbound.len();
        let emails_received = emails.len() - emails_sent;
        let replied = outbound.iter().filter(|e| e.replied).count();
        let ai_generated_emails = outbound.iter().filter(|e| e.ai_generated).count();

        CommunicationMetrics {
            emails_sent,
            emails_received,
            email_response_rate: ratio(replied as f64, emails_sent as f64),
            ai_generated_emails,
            ai_email_usage_rate: ratio(ai_generated_emails as f64, emails_sent as f64),
        }
    }

    async fn activity_metrics(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<ActivityMetrics, DataSourceError> {
        let activities = self.store.activities_in_window(rep_id, window).await?;
        Ok(Self::reduce_activities(&activities))
    }

    fn reduce_activities(activities: &[ActivityRecord]) -> ActivityMetrics {
        let total_activities = activities.len();
        let calls_made = activities
            .iter()
            .filter(|a| a.kind == ActivityKind::Call)
            .count();
        let meetings_held = activities
            .iter()
            .filter(|a| a.kind == ActivityKind::Meeting)
            .count();
        let tasks: Vec<&ActivityRecord> = activities
            .iter()
            .filter(|a| a.kind == ActivityKind::Task)
            .collect();
        let tasks_completed = tasks.iter().filter(|a| a.completed).count();
        let follow_ups = activities.iter().filter(|a| a.is_follow_up).count();

        ActivityMetrics {
            total_activities,
            calls_made,
            meetings_held,
            tasks_completed,
            task_completion_rate: ratio(tasks_completed as f64, tasks.len() as f64),
            follow_up_consistency: ratio(follow_ups as f64, total_activities as f64) * 100.0,
        }
    }

    async fn conversion_metrics(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<ConversionMetrics, DataSourceError> {
        let deals = self.store.deals_in_window(rep_id, window).await?;
        Ok(Self::reduce_conversion(&deals))
    }

    fn reduce_conversion(deals: &[DealRecord]) -> ConversionMetrics {
        let leads = deals.len();
        let opportunities = deals
            .iter()
            .filter(|d| d.stage_reached >= DealStage::Opportunity)
            .count();
        let proposals = deals
            .iter()
            .filter(|d| d.stage_reached >= DealStage::Proposal)
            .count();
        let closes = deals.iter().filter(|d| d.status == DealStatus::Won).count();

        let lead_to_opportunity_rate = ratio(opportunities as f64, leads as f64);
        let opportunity_to_proposal_rate = ratio(proposals as f64, opportunities as f64);
        let proposal_to_close_rate = ratio(closes as f64, proposals as f64);

        // Drop-offs only reported above 30%, and only where the source
        // stage has deals at all
        let transitions = [
            (FunnelTransition::LeadToOpportunity, leads, lead_to_opportunity_rate),
            (
                FunnelTransition::OpportunityToProposal,
                opportunities,
                opportunity_to_proposal_rate,
            ),
            (FunnelTransition::ProposalToClose, proposals, proposal_to_close_rate),
        ];
        let drop_off_points = transitions
            .into_iter()
            .filter(|(_, source_count, rate)| *source_count > 0 && (1.0 - rate) > 0.3)
            .map(|(transition, _, rate)| DropOffPoint {
                transition,
                drop_off_rate: 1.0 - rate,
            })
            .collect();

        ConversionMetrics {
            lead_to_opportunity_rate,
            opportunity_to_proposal_rate,
            proposal_to_close_rate,
            overall_conversion_rate: ratio(closes as f64, leads as f64),
            drop_off_points,
        }
    }

    async fn revenue_metrics(
        &self,
        rep_id: &str,
        window: &TimeWindow,
        quota: Decimal,
    ) -> Result<RevenueMetrics, DataSourceError> {
        let current = self.store.deals_in_window(rep_id, window).await?;
        let prior = self
            .store
            .deals_in_window(rep_id, &window.preceding())
            .await?;
        let lifetime = self.store.deals_lifetime(rep_id).await?;
        Ok(Self::reduce_revenue(&current, &prior, &lifetime, quota))
    }

    fn reduce_revenue(
        current: &[DealRecord],
        prior: &[DealRecord],
        lifetime: &[DealRecord],
        quota: Decimal,
    ) -> RevenueMetrics {
        let won_revenue = |deals: &[DealRecord]| -> Decimal {
            deals
                .iter()
                .filter(|d| d.status == DealStatus::Won)
                .map(|d| d.amount)
                .sum()
        };
        let total_revenue = won_revenue(current);
        let prior_revenue = won_revenue(prior);
        let pipeline_value: Decimal = lifetime
            .iter()
            .filter(|d| d.status == DealStatus::Open)
            .map(|d| d.amount)
            .sum();

        let total = decimal_to_f64(total_revenue);
        let previous = decimal_to_f64(prior_revenue);
        let growth_rate = if previous > 0.0 {
            (total - previous) / previous
        } else {
            0.0
        };

        RevenueMetrics {
            total_revenue,
            pipeline_value,
            quota_attainment: ratio(total, decimal_to_f64(quota)),
            growth_rate,
            // Supplied by an external forecasting service, never modeled here
            forecast_accuracy: 0.0,
        }
    }

    async fn efficiency_metrics(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<EfficiencyMetrics, DataSourceError> {
        let workflows = self
            .store
            .workflow_executions_in_window(rep_id, window)
            .await?;
        let emails = self.store.emails_in_window(rep_id, window).await?;
        let activities = self.store.activities_in_window(rep_id, window).await?;
        Ok(Self::reduce_efficiency(&workflows, &emails, &activities))
    }

    fn reduce_efficiency(
        workflows: &[WorkflowRecord],
        emails: &[EmailRecord],
        activities: &[ActivityRecord],
    ) -> EfficiencyMetrics {
        let workflow_executions = workflows.len();
        let successful_executions = workflows.iter().filter(|w| w.succeeded).count();
        let ai_emails = emails
            .iter()
            .filter(|e| e.outbound && e.ai_generated)
            .count();

        EfficiencyMetrics {
            workflow_executions,
            successful_executions,
            automation_usage: ratio(workflow_executions as f64, activities.len() as f64).min(1.0),
            // 5 minutes per workflow run, 10 per AI-drafted email
            hours_saved: (workflow_executions as f64 * 5.0 + ai_emails as f64 * 10.0) / 60.0,
        }
    }
}
