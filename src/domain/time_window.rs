use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Named analysis period selectable by callers.
///
/// `Custom` requires an explicit range; request validation rejects a custom
/// period without one before resolution begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPeriod {
    Last7Days,
    Last30Days,
    Last90Days,
    Last6Months,
    Last12Months,
    ThisQuarter,
    ThisYear,
    Custom,
}

impl AnalysisPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPeriod::Last7Days => "last_7_days",
            AnalysisPeriod::Last30Days => "last_30_days",
            AnalysisPeriod::Last90Days => "last_90_days",
            AnalysisPeriod::Last6Months => "last_6_months",
            AnalysisPeriod::Last12Months => "last_12_months",
            AnalysisPeriod::ThisQuarter => "this_quarter",
            AnalysisPeriod::ThisYear => "this_year",
            AnalysisPeriod::Custom => "custom",
        }
    }
}

impl FromStr for AnalysisPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last_7_days" => Ok(AnalysisPeriod::Last7Days),
            "last_30_days" => Ok(AnalysisPeriod::Last30Days),
            "last_90_days" => Ok(AnalysisPeriod::Last90Days),
            "last_6_months" => Ok(AnalysisPeriod::Last6Months),
            "last_12_months" => Ok(AnalysisPeriod::Last12Months),
            "this_quarter" => Ok(AnalysisPeriod::ThisQuarter),
            "this_year" => Ok(AnalysisPeriod::ThisYear),
            "custom" => Ok(AnalysisPeriod::Custom),
            _ => anyhow::bail!("Invalid period: {}", s),
        }
    }
}

impl std::fmt::Display for AnalysisPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete start/end instants over which metrics are computed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Resolve a non-custom period to a concrete window ending at `now`.
    ///
    /// Returns `None` for `Custom`: the explicit range is supplied by the
    /// caller, not derived here.
    pub fn for_period(period: AnalysisPeriod, now: DateTime<Utc>) -> Option<Self> {
        let start = match period {
            AnalysisPeriod::Last7Days => now - Duration::days(7),
            AnalysisPeriod::Last30Days => now - Duration::days(30),
            AnalysisPeriod::Last90Days => now - Duration::days(90),
            AnalysisPeriod::Last6Months => now - Duration::days(182),
            AnalysisPeriod::Last12Months => now - Duration::days(365),
            AnalysisPeriod::ThisQuarter => {
                let quarter_start_month = ((now.month0() / 3) * 3) + 1;
                Utc.with_ymd_and_hms(now.year(), quarter_start_month, 1, 0, 0, 0)
                    .earliest()
                    .unwrap_or(now)
            }
            AnalysisPeriod::ThisYear => Utc
                .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
                .earliest()
                .unwrap_or(now),
            AnalysisPeriod::Custom => return None,
        };
        Some(Self { start, end: now })
    }

    /// Window length in whole-precision days (fractional)
    pub fn period_days(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 86_400.0
    }

    /// The equal-length window immediately before this one, used for
    /// growth-rate comparison
    pub fn preceding(&self) -> Self {
        let length = self.end - self.start;
        Self {
            start: self.start - length,
            end: self.start,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_30_days_resolution() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        let window = TimeWindow::for_period(AnalysisPeriod::Last30Days, now).unwrap();
        assert_eq!(window.end, now);
        assert_eq!(window.start, now - Duration::days(30));
        assert!((window.period_days() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_this_quarter_starts_on_quarter_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 9, 30, 0).unwrap();
        let window = TimeWindow::for_period(AnalysisPeriod::ThisQuarter, now).unwrap();
        // August is in the Jul-Sep block
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, now);
    }

    #[test]
    fn test_this_year_starts_on_jan_first() {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 9, 30, 0).unwrap();
        let window = TimeWindow::for_period(AnalysisPeriod::ThisYear, now).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_custom_period_is_not_resolved_here() {
        let now = Utc::now();
        assert!(TimeWindow::for_period(AnalysisPeriod::Custom, now).is_none());
    }

    #[test]
    fn test_preceding_window_is_adjacent_and_equal_length() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap();
        let window = TimeWindow::for_period(AnalysisPeriod::Last7Days, now).unwrap();
        let prior = window.preceding();
        assert_eq!(prior.end, window.start);
        assert!((prior.period_days() - window.period_days()).abs() < 1e-9);
    }

    #[test]
    fn test_period_round_trip_parsing() {
        for period in [
            AnalysisPeriod::Last7Days,
            AnalysisPeriod::ThisQuarter,
            AnalysisPeriod::Custom,
        ] {
            assert_eq!(period.as_str().parse::<AnalysisPeriod>().unwrap(), period);
        }
        assert!("fortnight".parse::<AnalysisPeriod>().is_err());
    }
}
