use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SchedulerError;

/// When a job fires. Ticks are aligned to the UTC epoch grid of the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Daily,
    Hourly,
    Every(Duration),
}

impl Schedule {
    pub fn interval(&self) -> Duration {
        match self {
            Schedule::Daily => Duration::from_secs(24 * 60 * 60),
            Schedule::Hourly => Duration::from_secs(60 * 60),
            Schedule::Every(d) => *d,
        }
    }

    /// First tick strictly after `now` and not before `start`.
    pub fn next_after(&self, now: DateTime<Utc>, start: DateTime<Utc>) -> DateTime<Utc> {
        let step = TimeDelta::from_std(self.interval()).unwrap_or(TimeDelta::days(1));
        if now < start {
            return start;
        }
        // Past ticks are never replayed: only the next grid point counts.
        let floor = now.duration_trunc(step).unwrap_or(now);
        floor + step
    }
}

impl FromStr for Schedule {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "@daily" | "@midnight" => Ok(Schedule::Daily),
            "@hourly" => Ok(Schedule::Hourly),
            _ => s
                .strip_prefix("@every ")
                .and_then(|rest| rest.trim().strip_suffix('s'))
                .and_then(|secs| secs.parse::<u64>().ok())
                .filter(|&secs| secs > 0)
                .map(|secs| Schedule::Every(Duration::from_secs(secs)))
                .ok_or_else(|| SchedulerError::InvalidSchedule(s.to_string())),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Daily => write!(f, "@daily"),
            Schedule::Hourly => write!(f, "@hourly"),
            Schedule::Every(d) => write!(f, "@every {}s", d.as_secs()),
        }
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!("@daily".parse::<Schedule>().unwrap(), Schedule::Daily);
        assert_eq!(" @hourly ".parse::<Schedule>().unwrap(), Schedule::Hourly);
        assert_eq!(
            "@every 90s".parse::<Schedule>().unwrap(),
            Schedule::Every(Duration::from_secs(90))
        );
        for bad in ["daily", "@every 0s", "@every 5m", "@weekly", ""] {
            assert!(bad.parse::<Schedule>().is_err(), "{}", bad);
        }
        assert_eq!(Schedule::Every(Duration::from_secs(90)).to_string(), "@every 90s");
    }

    #[test]
    fn test_daily_next_is_next_midnight() {
        let start = at(2024, 1, 1, 0, 0);
        assert_eq!(Schedule::Daily.next_after(at(2026, 10, 17, 13, 5), start), at(2026, 10, 18, 0, 0));
        // exactly on a tick moves to the following one
        assert_eq!(Schedule::Daily.next_after(at(2026, 10, 17, 0, 0), start), at(2026, 10, 18, 0, 0));
    }

    #[test]
    fn test_before_start_waits_for_start() {
        let start = at(2024, 1, 1, 0, 0);
        assert_eq!(Schedule::Hourly.next_after(at(2023, 12, 31, 22, 30), start), start);
    }

    #[test]
    fn test_every_interval() {
        let s = Schedule::Every(Duration::from_secs(15 * 60));
        let start = at(2024, 1, 1, 0, 0);
        assert_eq!(s.next_after(at(2026, 10, 17, 13, 5), start), at(2026, 10, 17, 13, 15));
    }
}
