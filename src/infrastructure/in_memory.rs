//! In-memory adapters for the domain ports.
//!
//! Sufficient for tests and single-process use; the store supports fault
//! injection per collection and counts queries so cache behavior is
//! observable from the outside.

use crate::domain::errors::DataSourceError;
use crate::domain::insights::TeamInsightsGenerated;
use crate::domain::ports::{EventSink, RecordStore, RepDirectory};
use crate::domain::records::{
    ActivityRecord, DealRecord, EmailRecord, RecordTimestamp, RepProfile, WorkflowRecord,
};
use crate::domain::time_window::TimeWindow;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreState {
    deals: Vec<DealRecord>,
    emails: Vec<EmailRecord>,
    activities: Vec<ActivityRecord>,
    workflows: Vec<WorkflowRecord>,
    failing_collections: HashSet<String>,
}

/// Record store backed by plain vectors behind an async lock
#[derive(Default)]
pub struct InMemoryRecordStore {
    state: RwLock<StoreState>,
    query_count: AtomicUsize,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_deal(&self, deal: DealRecord) {
        self.state.write().await.deals.push(deal);
    }

    pub async fn add_email(&self, email: EmailRecord) {
        self.state.write().await.emails.push(email);
    }

    pub async fn add_activity(&self, activity: ActivityRecord) {
        self.state.write().await.activities.push(activity);
    }

    pub async fn add_workflow(&self, workflow: WorkflowRecord) {
        self.state.write().await.workflows.push(workflow);
    }

    /// Make every subsequent query against the named collection fail
    pub async fn fail_collection(&self, collection: &str) {
        self.state
            .write()
            .await
            .failing_collections
            .insert(collection.to_string());
    }

    /// Total queries served since construction, cache-hit assertions read
    /// this
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    fn check_failure(
        state: &StoreState,
        collection: &str,
    ) -> Result<(), DataSourceError> {
        if state.failing_collections.contains(collection) {
            return Err(DataSourceError::QueryFailed {
                collection: collection.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn in_window(created_at: &RecordTimestamp, window: &TimeWindow) -> bool {
        created_at
            .to_instant()
            .map(|instant| window.contains(instant))
            .unwrap_or(true)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn deals_in_window(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<DealRecord>, DataSourceError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        Self::check_failure(&state, "deals")?;
        Ok(state
            .deals
            .iter()
            .filter(|d| d.owner_id == rep_id && Self::in_window(&d.created_at, window))
            .cloned()
            .collect())
    }

    async fn deals_lifetime(&self, rep_id: &str) -> Result<Vec<DealRecord>, DataSourceError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        Self::check_failure(&state, "deals")?;
        Ok(state
            .deals
            .iter()
            .filter(|d| d.owner_id == rep_id)
            .cloned()
            .collect())
    }

    async fn emails_in_window(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<EmailRecord>, DataSourceError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        Self::check_failure(&state, "emails")?;
        Ok(state
            .emails
            .iter()
            .filter(|e| e.owner_id == rep_id && Self::in_window(&e.created_at, window))
            .cloned()
            .collect())
    }

    async fn activities_in_window(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<ActivityRecord>, DataSourceError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        Self::check_failure(&state, "activities")?;
        Ok(state
            .activities
            .iter()
            .filter(|a| a.owner_id == rep_id && Self::in_window(&a.created_at, window))
            .cloned()
            .collect())
    }

    async fn workflow_executions_in_window(
        &self,
        rep_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<WorkflowRecord>, DataSourceError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        Self::check_failure(&state, "workflows")?;
        Ok(state
            .workflows
            .iter()
            .filter(|w| w.owner_id == rep_id && Self::in_window(&w.created_at, window))
            .cloned()
            .collect())
    }
}

/// Directory backed by a hash map
#[derive(Default)]
pub struct InMemoryRepDirectory {
    reps: RwLock<HashMap<String, RepProfile>>,
    failing: RwLock<bool>,
}

impl InMemoryRepDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, profile: RepProfile) {
        self.reps.write().await.insert(profile.id.clone(), profile);
    }

    /// Make every subsequent lookup fail
    pub async fn fail(&self) {
        *self.failing.write().await = true;
    }

    async fn check_failure(&self) -> Result<(), DataSourceError> {
        if *self.failing.read().await {
            return Err(DataSourceError::QueryFailed {
                collection: "reps".to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RepDirectory for InMemoryRepDirectory {
    async fn find_rep(&self, rep_id: &str) -> Result<Option<RepProfile>, DataSourceError> {
        self.check_failure().await?;
        Ok(self.reps.read().await.get(rep_id).cloned())
    }

    async fn sales_team(&self) -> Result<Vec<RepProfile>, DataSourceError> {
        self.check_failure().await?;
        let mut team: Vec<RepProfile> = self.reps.read().await.values().cloned().collect();
        team.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(team)
    }
}

/// Event sink that records published events for assertion
#[derive(Default)]
pub struct RecordingEventSink {
    events: std::sync::Mutex<Vec<TeamInsightsGenerated>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TeamInsightsGenerated> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn publish(&self, event: TeamInsightsGenerated) -> Result<()> {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
        Ok(())
    }
}
