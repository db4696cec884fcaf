//! Collaborator contracts consumed by the analytics services.
//!
//! The backing storage technology is irrelevant to this core: everything is
//! reached through these traits, and the in-memory implementations in
//! `infrastructure` are sufficient for tests and single-process use.

use crate::domain::errors::DataSourceError;
use crate::domain::insights::{TeamCoachingInsights, TeamInsightsGenerated};
use crate::domain::metrics::TeamBenchmark;
use crate::domain::records::{
    ActivityRecord, DealRecord, EmailRecord, RepProfile, WorkflowRecord,
};
use crate::domain::time_window::TimeWindow;
use anyhow::Result;
use async_trait::async_trait;

/// Read-only range queries against the backing record store.
///
/// Window-scoped queries filter on owner id and record creation instant;
/// `deals_lifetime` is deliberately unscoped (quota attainment and pipeline
/// value are cumulative).
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn deals_in_window(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<DealRecord>, DataSourceError>;

    async fn deals_lifetime(&self, rep_id: &str) -> Result<Vec<DealRecord>, DataSourceError>;

    async fn emails_in_window(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<EmailRecord>, DataSourceError>;

    async fn activities_in_window(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<ActivityRecord>, DataSourceError>;

    async fn workflow_executions_in_window(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<WorkflowRecord>, DataSourceError>;
}

/// Rep directory lookups
#[async_trait]
pub trait RepDirectory: Send + Sync {
    /// `Ok(None)` means the rep has no directory record, which is fatal for
    /// the analysis that requested it
    async fn find_rep(&self, rep_id: &str) -> Result<Option<RepProfile>, DataSourceError>;

    /// All sales-role members, used by benchmark providers
    async fn sales_team(&self) -> Result<Vec<RepProfile>, DataSourceError>;
}

/// Injectable strategy supplying the team-average comparison baseline.
///
/// Implementations degrade internally (fixed default on failure or empty
/// team); a baseline is always available to callers.
#[async_trait]
pub trait TeamBenchmarkProvider: Send + Sync {
    async fn team_baseline(&self) -> TeamBenchmark;
}

/// Fire-and-forget event notification sink
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: TeamInsightsGenerated) -> Result<()>;
}

/// Injectable TTL cache for rollup payloads.
///
/// `get` must return `None` for entries older than the implementation's TTL;
/// `put` overwrites unconditionally.
#[async_trait]
pub trait InsightsCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<TeamCoachingInsights>;
    async fn put(&self, key: &str, insights: TeamCoachingInsights);
    async fn clear(&self);
}
