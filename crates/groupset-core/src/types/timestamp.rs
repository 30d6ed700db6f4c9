use chrono::{DateTime, Datelike, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// TruncUnit
///
/// Calendar granularity accepted by `DATE_TRUNC` key expressions.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TruncUnit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

///
/// Timestamp
/// (in seconds since the Unix epoch, UTC)
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(u64::MIN);

    /// Construct from seconds.
    #[must_use]
    pub const fn from_seconds(secs: u64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Truncate to the start of the enclosing calendar unit.
    ///
    /// Returns `None` only when the instant is outside chrono's supported range.
    #[must_use]
    pub fn truncate(self, unit: TruncUnit) -> Option<Self> {
        match unit {
            TruncUnit::Minute => Some(Self(self.0 - self.0 % 60)),
            TruncUnit::Hour => Some(Self(self.0 - self.0 % 3_600)),
            TruncUnit::Day => Some(Self(self.0 - self.0 % 86_400)),
            TruncUnit::Month | TruncUnit::Year => {
                let secs = i64::try_from(self.0).ok()?;
                let date = DateTime::from_timestamp(secs, 0)?.date_naive();
                let month = if unit == TruncUnit::Month {
                    date.month()
                } else {
                    1
                };
                let start = NaiveDate::from_ymd_opt(date.year(), month, 1)?
                    .and_hms_opt(0, 0, 0)?
                    .and_utc()
                    .timestamp();

                u64::try_from(start).ok().map(Self)
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-15T13:45:30Z
    const SAMPLE: u64 = 1_710_510_330;

    #[test]
    fn truncate_to_fixed_width_units() {
        let ts = Timestamp::from_seconds(SAMPLE);

        assert_eq!(ts.truncate(TruncUnit::Minute), Some(Timestamp(1_710_510_300)));
        assert_eq!(ts.truncate(TruncUnit::Hour), Some(Timestamp(1_710_507_600)));
        assert_eq!(ts.truncate(TruncUnit::Day), Some(Timestamp(1_710_460_800)));
    }

    #[test]
    fn truncate_to_calendar_units() {
        let ts = Timestamp::from_seconds(SAMPLE);

        // 2024-03-01T00:00:00Z and 2024-01-01T00:00:00Z
        assert_eq!(ts.truncate(TruncUnit::Month), Some(Timestamp(1_709_251_200)));
        assert_eq!(ts.truncate(TruncUnit::Year), Some(Timestamp(1_704_067_200)));
    }

    #[test]
    fn truncating_epoch_is_identity() {
        for unit in [
            TruncUnit::Minute,
            TruncUnit::Hour,
            TruncUnit::Day,
            TruncUnit::Month,
            TruncUnit::Year,
        ] {
            assert_eq!(Timestamp::EPOCH.truncate(unit), Some(Timestamp::EPOCH));
        }
    }
}
