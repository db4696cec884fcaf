//! Raw record shapes as returned by the backing store.
//!
//! Records are read-only inputs; nothing in this crate writes them back.
//! Timestamps arrive in one of three wire representations and must pass
//! through [`RecordTimestamp::to_instant`] before any duration arithmetic.

use crate::domain::errors::TimestampError;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A timestamp as it arrives from the backing store.
///
/// Upstream collections are not consistent: some fields carry a platform
/// timestamp object (`{seconds, nanoseconds}`), some a native instant, some
/// an RFC 3339 string. All three normalize through `to_instant`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordTimestamp {
    Instant(DateTime<Utc>),
    Platform { seconds: i64, nanoseconds: u32 },
    Text(String),
}

impl RecordTimestamp {
    pub fn to_instant(&self) -> Result<DateTime<Utc>, TimestampError> {
        match self {
            RecordTimestamp::Instant(dt) => Ok(*dt),
            RecordTimestamp::Platform {
                seconds,
                nanoseconds,
            } => Utc
                .timestamp_opt(*seconds, *nanoseconds)
                .single()
                .ok_or_else(|| TimestampError::Unparseable {
                    raw: format!("{{seconds: {}, nanoseconds: {}}}", seconds, nanoseconds),
                }),
            RecordTimestamp::Text(raw) => {
                raw.parse::<DateTime<Utc>>()
                    .map_err(|_| TimestampError::Unparseable { raw: raw.clone() })
            }
        }
    }
}

impl From<DateTime<Utc>> for RecordTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        RecordTimestamp::Instant(dt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Open,
    Won,
    Lost,
}

/// Furthest pipeline stage a deal has reached.
///
/// Ordered: funnel rates are "share of deals reaching at least this stage".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    Lead,
    Opportunity,
    Proposal,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRecord {
    pub id: String,
    pub owner_id: String,
    pub status: DealStatus,
    pub stage_reached: DealStage,
    pub amount: Decimal,
    /// 0-100 health score; absent on deals the scoring job has not visited
    pub health_score: Option<f64>,
    pub created_at: RecordTimestamp,
    pub closed_at: Option<RecordTimestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: String,
    pub owner_id: String,
    pub outbound: bool,
    /// Outbound only: whether the prospect replied
    pub replied: bool,
    pub ai_generated: bool,
    pub created_at: RecordTimestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Call,
    Meeting,
    Task,
    Note,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    pub owner_id: String,
    pub kind: ActivityKind,
    pub completed: bool,
    pub is_follow_up: bool,
    pub created_at: RecordTimestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub id: String,
    pub owner_id: String,
    pub workflow_id: String,
    pub succeeded: bool,
    pub created_at: RecordTimestamp,
}

/// Directory entry for a rep. Quota is a lifetime field, not window-scoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub quota: Decimal,
}
