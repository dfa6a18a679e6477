//! Weekly reward snapshots and growth streaks
//!
//! Weeks are ISO-8601 calendar weeks of the UTC date, so boundaries are fixed
//! at Monday 00:00 UTC regardless of server timezone.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An ISO calendar week, identified by its Monday
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekId {
    monday: NaiveDate,
}

impl WeekId {
    /// Week `week` of ISO year `year`, if it exists
    pub fn new(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(|monday| Self { monday })
    }

    pub fn containing(at: DateTime<Utc>) -> Self {
        let date = at.date_naive();
        let offset = u64::from(date.weekday().num_days_from_monday());
        Self {
            monday: date - Days::new(offset),
        }
    }

    pub fn year(&self) -> i32 {
        self.monday.iso_week().year()
    }

    pub fn week(&self) -> u32 {
        self.monday.iso_week().week()
    }

    pub fn previous(&self) -> Self {
        Self {
            monday: self.monday - Days::new(7),
        }
    }

    /// The week `n` weeks before this one
    pub fn back(&self, n: u32) -> Self {
        Self {
            monday: self.monday - Days::new(7 * u64::from(n)),
        }
    }

    /// Monday 00:00:00 UTC
    pub fn start(&self) -> DateTime<Utc> {
        self.monday.and_time(NaiveTime::default()).and_utc()
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year(), self.week())
    }
}

impl FromStr for WeekId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, week) = s
            .split_once("-W")
            .ok_or_else(|| format!("Invalid week label '{s}'"))?;
        let year: i32 = year.parse().map_err(|_| format!("Invalid year in '{s}'"))?;
        let week: u32 = week.parse().map_err(|_| format!("Invalid week in '{s}'"))?;
        WeekId::new(year, week).ok_or_else(|| format!("Week '{s}' does not exist"))
    }
}

impl Serialize for WeekId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// A guardian's totals within one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySnapshot {
    pub rewards: f64,
    pub actions: u64,
    pub week_start: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl WeeklySnapshot {
    /// Zero-valued snapshot for a week with no activity
    pub fn empty(week: WeekId) -> Self {
        Self {
            rewards: 0.0,
            actions: 0,
            week_start: week.start(),
            last_updated: None,
        }
    }

    pub fn accumulate(&mut self, reward: f64, now: DateTime<Utc>) {
        self.rewards += reward;
        self.actions += 1;
        self.last_updated = Some(now);
    }
}

/// Current and previous week for one guardian
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub current: WeeklySnapshot,
    pub previous: WeeklySnapshot,
    pub week_number: WeekId,
}

/// Count consecutive strict week-over-week increases.
///
/// `totals[i]` is the reward total `i` weeks back from the current week, `None`
/// when no snapshot exists. Counting stops at the first non-increase or gap.
pub fn growth_streak(totals: &[Option<f64>], window: u32) -> u32 {
    let mut streak = 0;
    for i in 0..window as usize {
        match (totals.get(i).copied().flatten(), totals.get(i + 1).copied().flatten()) {
            (Some(current), Some(previous)) if current > previous => streak += 1,
            _ => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_week_containing() {
        // Sunday 2026-01-04 still belongs to 2026-W01 (which starts Mon 2025-12-29)
        let sunday = Utc.with_ymd_and_hms(2026, 1, 4, 23, 59, 59).unwrap();
        let week = WeekId::containing(sunday);
        assert_eq!(week.to_string(), "2026-W01");
        assert_eq!(week.start(), Utc.with_ymd_and_hms(2025, 12, 29, 0, 0, 0).unwrap());

        let monday = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(WeekId::containing(monday).to_string(), "2026-W02");
    }

    #[test]
    fn test_previous_crosses_long_year() {
        // 2026 has 53 ISO weeks
        let week = WeekId::new(2027, 1).unwrap();
        assert_eq!(week.previous().to_string(), "2026-W53");
        assert_eq!(week.back(2).to_string(), "2026-W52");
    }

    #[test]
    fn test_label_round_trip() {
        let week: WeekId = "2026-W43".parse().unwrap();
        assert_eq!(week.year(), 2026);
        assert_eq!(week.week(), 43);
        assert_eq!(serde_json::to_string(&week).unwrap(), "\"2026-W43\"");
        assert!("2025-W53".parse::<WeekId>().is_err());
        assert!("garbage".parse::<WeekId>().is_err());
    }

    #[test]
    fn test_growth_streak() {
        assert_eq!(growth_streak(&[Some(300.0), Some(200.0), Some(100.0), Some(50.0)], 3), 3);
        assert_eq!(growth_streak(&[Some(300.0), Some(200.0), Some(250.0), Some(50.0)], 3), 1);
        assert_eq!(growth_streak(&[Some(300.0), Some(300.0), Some(100.0), None], 3), 0);
        assert_eq!(growth_streak(&[Some(300.0), Some(200.0), None, Some(50.0)], 3), 1);
        assert_eq!(growth_streak(&[Some(100.0), None], 3), 0);
        assert_eq!(growth_streak(&[], 3), 0);
    }
}
