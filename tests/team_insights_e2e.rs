//! End-to-end rollup flow over the in-memory adapters: records in, cached
//! team coaching insights out.

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use salescope::application::aggregator::MetricAggregator;
use salescope::application::analyzer::RepPerformanceAnalyzer;
use salescope::application::cache::InMemoryInsightsCache;
use salescope::application::rollup::TeamRollupEngine;
use salescope::config::{Config, SourceFailurePolicy};
use salescope::domain::errors::AnalyticsError;
use salescope::domain::insights::TeamInsightsRequest;
use salescope::domain::ports::InsightsCache;
use salescope::domain::records::{
    DealRecord, DealStage, DealStatus, EmailRecord, RepProfile,
};
use salescope::domain::scoring::PerformanceTier;
use salescope::domain::time_window::AnalysisPeriod;
use salescope::infrastructure::benchmark::StaticBenchmarkProvider;
use salescope::infrastructure::in_memory::{
    InMemoryRecordStore, InMemoryRepDirectory, RecordingEventSink,
};
use std::sync::Arc;

fn engine(
    store: Arc<InMemoryRecordStore>,
    directory: Arc<InMemoryRepDirectory>,
    cache: Arc<InMemoryInsightsCache>,
    sink: Arc<RecordingEventSink>,
) -> TeamRollupEngine {
    salescope::init_tracing();
    let aggregator = MetricAggregator::new(
        store,
        directory,
        SourceFailurePolicy::DegradeToDefault,
    );
    let analyzer = RepPerformanceAnalyzer::new(
        aggregator,
        Arc::new(StaticBenchmarkProvider::unconfigured()),
    );
    TeamRollupEngine::new(Arc::new(analyzer), cache, sink, Config::default())
}

fn deal(id: &str, owner: &str, status: DealStatus, amount: rust_decimal::Decimal) -> DealRecord {
    let created = Utc::now() - Duration::days(10);
    DealRecord {
        id: id.to_string(),
        owner_id: owner.to_string(),
        status,
        stage_reached: match status {
            DealStatus::Open => DealStage::Opportunity,
            _ => DealStage::Closed,
        },
        amount,
        health_score: Some(75.0),
        created_at: created.into(),
        closed_at: match status {
            DealStatus::Open => None,
            _ => Some((created + Duration::days(5)).into()),
        },
    }
}

fn email(id: &str, owner: &str, replied: bool) -> EmailRecord {
    EmailRecord {
        id: id.to_string(),
        owner_id: owner.to_string(),
        outbound: true,
        replied,
        ai_generated: false,
        created_at: (Utc::now() - Duration::days(3)).into(),
    }
}

fn profile(id: &str, quota: rust_decimal::Decimal) -> RepProfile {
    RepProfile {
        id: id.to_string(),
        name: format!("Rep {}", id),
        email: format!("{}@example.com", id),
        quota,
    }
}

async fn seed_strong_and_weak(store: &InMemoryRecordStore, directory: &InMemoryRepDirectory) {
    directory.insert(profile("rep-strong", dec!(100000))).await;
    directory.insert(profile("rep-weak", dec!(100000))).await;

    // Strong rep: 4 wins, 120% quota attainment, responsive pipeline
    for i in 0..4 {
        store
            .add_deal(deal(
                &format!("s{}", i),
                "rep-strong",
                DealStatus::Won,
                dec!(30000),
            ))
            .await;
    }
    for i in 0..5 {
        store
            .add_email(email(&format!("se{}", i), "rep-strong", i < 4))
            .await;
    }

    // Weak rep: two losses, nothing closed
    for i in 0..2 {
        store
            .add_deal(deal(
                &format!("w{}", i),
                "rep-weak",
                DealStatus::Lost,
                dec!(5000),
            ))
            .await;
    }
}

fn request() -> TeamInsightsRequest {
    TeamInsightsRequest {
        team_id: "team-1".to_string(),
        period: AnalysisPeriod::Last30Days,
        custom_range: None,
        include_rep_details: true,
    }
}

#[tokio::test]
async fn test_full_rollup_separates_strong_and_weak_members() {
    let store = Arc::new(InMemoryRecordStore::new());
    let directory = Arc::new(InMemoryRepDirectory::new());
    let cache = Arc::new(InMemoryInsightsCache::new(Duration::hours(1)));
    let sink = Arc::new(RecordingEventSink::new());
    seed_strong_and_weak(&store, &directory).await;
    let engine = engine(store, directory, cache, sink.clone());

    let members = vec!["rep-strong".to_string(), "rep-weak".to_string()];
    let insights = engine
        .generate_team_insights(request(), &members, "North")
        .await
        .unwrap();

    assert_eq!(insights.summary.total_members, 2);
    assert!(insights.failed_members.is_empty());

    // Strong rep: win rate 1.0, quota 1.2 -> top or high tier
    assert!(
        insights
            .top_performers
            .iter()
            .any(|h| h.rep_id == "rep-strong")
    );
    // Weak rep: all-zero revenue with two losses lands at the bottom
    assert!(
        insights
            .needs_support
            .iter()
            .any(|c| c.rep_id == "rep-weak")
    );

    let details = insights.rep_details.as_ref().unwrap();
    assert_eq!(details.len(), 2);
    let weak = details.iter().find(|m| m.rep_id == "rep-weak").unwrap();
    assert_eq!(weak.tier, PerformanceTier::AtRisk);
    assert_eq!(weak.deals.win_rate, 0.0);

    // The distribution buckets always cover all five tiers and sum to 100
    assert_eq!(insights.summary.tier_distribution.len(), 5);
    let pct: f64 = insights
        .summary
        .tier_distribution
        .iter()
        .map(|b| b.percentage)
        .sum();
    assert!((pct - 100.0).abs() < 1e-9);

    // A completion event went out
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].team_id, "team-1");
    assert_eq!(events[0].model, "salescope-rollup-v1");
    assert_eq!(events[0].at_risk_count, 1);
}

#[tokio::test]
async fn test_cache_hit_issues_no_further_store_queries() {
    let store = Arc::new(InMemoryRecordStore::new());
    let directory = Arc::new(InMemoryRepDirectory::new());
    let cache = Arc::new(InMemoryInsightsCache::new(Duration::hours(1)));
    let sink = Arc::new(RecordingEventSink::new());
    seed_strong_and_weak(&store, &directory).await;
    let engine = engine(store.clone(), directory, cache, sink.clone());

    let members = vec!["rep-strong".to_string(), "rep-weak".to_string()];
    let first = engine
        .generate_team_insights(request(), &members, "North")
        .await
        .unwrap();
    let queries_after_first = store.query_count();
    assert!(queries_after_first > 0);

    let second = engine
        .generate_team_insights(request(), &members, "North")
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(store.query_count(), queries_after_first);
    // No second event either
    assert_eq!(sink.events().len(), 1);
}

#[tokio::test]
async fn test_stale_cache_entry_triggers_recompute() {
    let store = Arc::new(InMemoryRecordStore::new());
    let directory = Arc::new(InMemoryRepDirectory::new());
    let cache = Arc::new(InMemoryInsightsCache::new(Duration::hours(1)));
    let sink = Arc::new(RecordingEventSink::new());
    seed_strong_and_weak(&store, &directory).await;
    let engine = engine(store.clone(), directory, cache.clone(), sink);

    let members = vec!["rep-strong".to_string(), "rep-weak".to_string()];
    let first = engine
        .generate_team_insights(request(), &members, "North")
        .await
        .unwrap();

    cache.backdate(&request().cache_key(), Duration::minutes(61));
    let queries_before = store.query_count();

    let second = engine
        .generate_team_insights(request(), &members, "North")
        .await
        .unwrap();

    assert_ne!(second.id, first.id);
    assert!(store.query_count() > queries_before);
}

#[tokio::test]
async fn test_clear_cache_forces_recompute() {
    let store = Arc::new(InMemoryRecordStore::new());
    let directory = Arc::new(InMemoryRepDirectory::new());
    let cache = Arc::new(InMemoryInsightsCache::new(Duration::hours(1)));
    let sink = Arc::new(RecordingEventSink::new());
    seed_strong_and_weak(&store, &directory).await;
    let engine = engine(store, directory, cache.clone(), sink);

    let members = vec!["rep-strong".to_string()];
    let first = engine
        .generate_team_insights(request(), &members, "North")
        .await
        .unwrap();
    engine.clear_cache().await;
    assert!(cache.get(&request().cache_key()).await.is_none());
    let second = engine
        .generate_team_insights(request(), &members, "North")
        .await
        .unwrap();
    assert_ne!(second.id, first.id);
}

#[tokio::test]
async fn test_member_failure_is_isolated_from_the_rest_of_the_team() {
    let store = Arc::new(InMemoryRecordStore::new());
    let directory = Arc::new(InMemoryRepDirectory::new());
    let cache = Arc::new(InMemoryInsightsCache::new(Duration::hours(1)));
    let sink = Arc::new(RecordingEventSink::new());
    seed_strong_and_weak(&store, &directory).await;
    let engine = engine(store, directory, cache, sink);

    // "rep-ghost" has no directory record; its analysis fails
    let members = vec![
        "rep-strong".to_string(),
        "rep-ghost".to_string(),
        "rep-weak".to_string(),
    ];
    let insights = engine
        .generate_team_insights(request(), &members, "North")
        .await
        .unwrap();

    assert_eq!(insights.summary.total_members, 2);
    assert_eq!(insights.failed_members.len(), 1);
    assert_eq!(insights.failed_members[0].rep_id, "rep-ghost");
    assert!(insights.failed_members[0].reason.contains("rep-ghost"));
}

#[tokio::test]
async fn test_empty_team_produces_an_empty_but_valid_payload() {
    let store = Arc::new(InMemoryRecordStore::new());
    let directory = Arc::new(InMemoryRepDirectory::new());
    let cache = Arc::new(InMemoryInsightsCache::new(Duration::hours(1)));
    let sink = Arc::new(RecordingEventSink::new());
    let engine = engine(store, directory, cache, sink);

    let insights = engine
        .generate_team_insights(request(), &[], "Empty")
        .await
        .unwrap();

    assert_eq!(insights.summary.total_members, 0);
    assert!(insights.top_performers.is_empty());
    assert!(insights.needs_support.is_empty());
    assert!(insights.skill_gaps.is_empty());
    assert!(insights.best_practices.is_empty());
    assert!(insights.failed_members.is_empty());
}

#[tokio::test]
async fn test_custom_period_without_range_is_rejected_before_any_work() {
    let store = Arc::new(InMemoryRecordStore::new());
    let directory = Arc::new(InMemoryRepDirectory::new());
    let cache = Arc::new(InMemoryInsightsCache::new(Duration::hours(1)));
    let sink = Arc::new(RecordingEventSink::new());
    let engine = engine(store.clone(), directory, cache, sink);

    let mut bad = request();
    bad.period = AnalysisPeriod::Custom;
    let err = engine
        .generate_team_insights(bad, &["rep-strong".to_string()], "North")
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidRequest { .. }));
    assert_eq!(store.query_count(), 0);
}
