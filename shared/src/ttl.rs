use crate::{Error, Result};
use chrono::TimeDelta;

/// Time-to-live accepted by cache writes.
///
/// Every form resolves to a single `Option<u64>` of seconds before the store
/// is called. A duration that is zero or negative resolves to `Some(0)`, an
/// immediate expiry, and is never mistaken for [`Ttl::NoExpiry`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ttl {
    #[default]
    NoExpiry,
    Seconds(u64),
    Duration(TimeDelta),
}

impl Ttl {
    pub fn resolve(&self) -> Option<u64> {
        match self {
            Ttl::NoExpiry => None,
            Ttl::Seconds(secs) => Some(*secs),
            Ttl::Duration(delta) => Some(delta.num_seconds().max(0) as u64),
        }
    }

    /// Parse a TTL from configuration or command line text.
    ///
    /// Accepts `""`/`"none"`, a bare integer of seconds, or an integer with one
    /// of the `s`, `m`, `h`, `d` suffixes.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("none") {
            return Ok(Ttl::NoExpiry);
        }

        if let Ok(secs) = input.parse::<i64>() {
            return Ttl::try_from(secs);
        }

        let split = input.char_indices().last().map_or(0, |(idx, _)| idx);
        let (number, unit) = input.split_at(split);
        let amount = number
            .parse::<i64>()
            .map_err(|_| Error::invalid_argument(format!("unrecognised ttl '{}'", input)))?;

        let delta = match unit {
            "s" => TimeDelta::try_seconds(amount),
            "m" => TimeDelta::try_minutes(amount),
            "h" => TimeDelta::try_hours(amount),
            "d" => TimeDelta::try_days(amount),
            _ => {
                return Err(Error::invalid_argument(format!(
                    "unrecognised ttl unit '{}' in '{}'",
                    unit, input
                )));
            }
        };

        delta
            .map(Ttl::Duration)
            .ok_or_else(|| Error::invalid_argument(format!("ttl '{}' is out of range", input)))
    }
}

impl TryFrom<i64> for Ttl {
    type Error = Error;

    fn try_from(secs: i64) -> Result<Self> {
        u64::try_from(secs)
            .map(Ttl::Seconds)
            .map_err(|_| Error::invalid_argument(format!("ttl must not be negative, got {}", secs)))
    }
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Ttl::Seconds(secs)
    }
}

impl From<u32> for Ttl {
    fn from(secs: u32) -> Self {
        Ttl::Seconds(secs.into())
    }
}

impl From<TimeDelta> for Ttl {
    fn from(delta: TimeDelta) -> Self {
        Ttl::Duration(delta)
    }
}

impl From<std::time::Duration> for Ttl {
    fn from(duration: std::time::Duration) -> Self {
        Ttl::Seconds(duration.as_secs())
    }
}

impl<T: Into<Ttl>> From<Option<T>> for Ttl {
    fn from(ttl: Option<T>) -> Self {
        ttl.map(Into::into).unwrap_or_default()
    }
}
