use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// What the aggregator does when one metric-group query fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFailurePolicy {
    /// The affected group falls back to its all-zero default and the
    /// analysis still completes (default)
    DegradeToDefault,
    /// The failure aborts the analysis
    Propagate,
}

impl FromStr for SourceFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "degrade" => Ok(SourceFailurePolicy::DegradeToDefault),
            "propagate" => Ok(SourceFailurePolicy::Propagate),
            _ => anyhow::bail!(
                "Invalid SOURCE_FAILURE_POLICY: {}. Must be 'degrade' or 'propagate'",
                s
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Member analyses run concurrently within a batch; batches are
    /// processed sequentially
    pub batch_size: usize,
    pub cache_ttl_minutes: i64,
    pub source_failure_policy: SourceFailurePolicy,
    pub top_performer_cap: usize,
    pub max_best_practices: usize,
    pub max_priorities: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let batch_size = env::var("ANALYTICS_BATCH_SIZE")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<usize>()
            .context("Failed to parse ANALYTICS_BATCH_SIZE")?;

        let cache_ttl_minutes = env::var("ANALYTICS_CACHE_TTL_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<i64>()
            .context("Failed to parse ANALYTICS_CACHE_TTL_MINUTES")?;

        let policy_str =
            env::var("SOURCE_FAILURE_POLICY").unwrap_or_else(|_| "degrade".to_string());
        let source_failure_policy = SourceFailurePolicy::from_str(&policy_str)?;

        let top_performer_cap = env::var("TOP_PERFORMER_CAP")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<usize>()
            .context("Failed to parse TOP_PERFORMER_CAP")?;

        let max_best_practices = env::var("MAX_BEST_PRACTICES")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<usize>()
            .context("Failed to parse MAX_BEST_PRACTICES")?;

        let max_priorities = env::var("MAX_PRIORITIES")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<usize>()
            .context("Failed to parse MAX_PRIORITIES")?;

        if batch_size == 0 {
            anyhow::bail!("ANALYTICS_BATCH_SIZE must be at least 1");
        }

        Ok(Self {
            batch_size,
            cache_ttl_minutes,
            source_failure_policy,
            top_performer_cap,
            max_best_practices,
            max_priorities,
        })
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cache_ttl_minutes)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: 5,
            cache_ttl_minutes: 60,
            source_failure_policy: SourceFailurePolicy::DegradeToDefault,
            top_performer_cap: 10,
            max_best_practices: 5,
            max_priorities: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.cache_ttl_minutes, 60);
        assert_eq!(
            config.source_failure_policy,
            SourceFailurePolicy::DegradeToDefault
        );
        assert_eq!(config.cache_ttl(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "degrade".parse::<SourceFailurePolicy>().unwrap(),
            SourceFailurePolicy::DegradeToDefault
        );
        assert_eq!(
            "PROPAGATE".parse::<SourceFailurePolicy>().unwrap(),
            SourceFailurePolicy::Propagate
        );
        assert!("panic".parse::<SourceFailurePolicy>().is_err());
    }
}
