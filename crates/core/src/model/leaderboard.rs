use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ElapsedError {
    #[error("elapsed time cannot be negative")]
    Negative,

    #[error("invalid elapsed seconds: {raw:?}")]
    InvalidFormat { raw: String },
}

/// Elapsed wall-clock time with two fractional digits of precision.
///
/// Stored as whole centiseconds so comparisons are exact; rendered as `"12.34"`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ElapsedSeconds(u64);

impl ElapsedSeconds {
    #[must_use]
    pub fn from_centis(centis: u64) -> Self {
        Self(centis)
    }

    /// Round a duration to the nearest hundredth of a second.
    ///
    /// # Errors
    ///
    /// Returns `ElapsedError::Negative` if `duration` is below zero.
    pub fn from_duration(duration: Duration) -> Result<Self, ElapsedError> {
        let millis = duration.num_milliseconds();
        let millis = u64::try_from(millis).map_err(|_| ElapsedError::Negative)?;
        Ok(Self(millis.saturating_add(5) / 10))
    }

    #[must_use]
    pub fn centis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElapsedSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for ElapsedSeconds {
    type Err = ElapsedError;

    /// Parses `"8"`, `"8.5"` or `"8.50"`. More than two fractional digits is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ElapsedError::InvalidFormat { raw: s.to_owned() };
        let trimmed = s.trim();
        let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        if whole.is_empty()
            || frac.len() > 2
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let frac: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }
}

/// One completed quiz attempt as it appears on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRecord {
    pub user_name: String,
    pub correct_count: u32,
    pub duration: ElapsedSeconds,
}

impl LeaderboardRecord {
    #[must_use]
    pub fn new(user_name: impl Into<String>, correct_count: u32, duration: ElapsedSeconds) -> Self {
        Self {
            user_name: user_name.into(),
            correct_count,
            duration,
        }
    }
}

/// Leaderboard ordering: more correct answers first, then the faster attempt.
#[must_use]
pub fn ranking_order(a: &LeaderboardRecord, b: &LeaderboardRecord) -> Ordering {
    b.correct_count
        .cmp(&a.correct_count)
        .then(a.duration.cmp(&b.duration))
}

/// Sort records into leaderboard order. Stable, so equal records keep insertion order.
pub fn rank(records: &mut [LeaderboardRecord]) {
    records.sort_by(ranking_order);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(raw: &str) -> ElapsedSeconds {
        raw.parse().unwrap()
    }

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(ElapsedSeconds::from_centis(850).to_string(), "8.50");
        assert_eq!(ElapsedSeconds::from_centis(1000).to_string(), "10.00");
        assert_eq!(ElapsedSeconds::from_centis(7).to_string(), "0.07");
    }

    #[test]
    fn parses_stored_text() {
        assert_eq!(secs("8.50").centis(), 850);
        assert_eq!(secs("8.5").centis(), 850);
        assert_eq!(secs(" 12 ").centis(), 1200);
        assert!("8.505".parse::<ElapsedSeconds>().is_err());
        assert!("-1.00".parse::<ElapsedSeconds>().is_err());
        assert!(".50".parse::<ElapsedSeconds>().is_err());
        assert!("abc".parse::<ElapsedSeconds>().is_err());
    }

    #[test]
    fn rounds_durations_to_centiseconds() {
        let d = Duration::milliseconds(12_345);
        assert_eq!(ElapsedSeconds::from_duration(d).unwrap().to_string(), "12.35");
        assert_eq!(
            ElapsedSeconds::from_duration(Duration::milliseconds(-1)),
            Err(ElapsedError::Negative)
        );
    }

    #[test]
    fn ranks_by_score_then_duration() {
        let mut records = vec![
            LeaderboardRecord::new("A", 5, secs("10.00")),
            LeaderboardRecord::new("B", 5, secs("8.50")),
            LeaderboardRecord::new("C", 3, secs("1.00")),
        ];
        rank(&mut records);
        let names: Vec<_> = records.iter().map(|r| r.user_name.as_str()).collect();
        assert_eq!(names, ["B", "A", "C"]);
    }
}
