use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicI64, Ordering};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// Last nanosecond timestamp handed out by [`UtcDateTime::now`].
static LAST_ISSUED_NANOS: AtomicI64 = AtomicI64::new(i64::MIN);

/// RFC3339 timestamp guaranteed to be UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    /// Current wall-clock time, strictly later than any previous call in this process.
    pub fn now() -> Self {
        let wall = OffsetDateTime::now_utc();
        let Ok(wall_nanos) = i64::try_from(wall.unix_timestamp_nanos()) else {
            return Self(wall);
        };

        let next = |last: i64| {
            if wall_nanos > last {
                wall_nanos
            } else {
                last.saturating_add(1)
            }
        };
        let previous = LAST_ISSUED_NANOS
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(next(last)))
            .unwrap_or_else(|last| last);
        let issued = next(previous);

        OffsetDateTime::from_unix_timestamp_nanos(i128::from(issued))
            .map(Self)
            .unwrap_or(Self(wall))
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let parsed = OffsetDateTime::parse(input, &Rfc3339).map_err(|_| {
            ValidationError::TimestampNotUtc {
                value: input.to_owned(),
            }
        })?;

        Self::from_offset_datetime(parsed).map_err(|_| ValidationError::TimestampNotUtc {
            value: input.to_owned(),
        })
    }

    pub fn from_offset_datetime(value: OffsetDateTime) -> Result<Self, ValidationError> {
        if value.offset() != UtcOffset::UTC {
            return Err(ValidationError::TimestampNotUtc {
                value: value
                    .format(&Rfc3339)
                    .unwrap_or_else(|_| String::from("<unformattable>")),
            });
        }

        Ok(Self(value))
    }

    /// 12-hour `hh:mm AM` label used for "last updated" lines.
    pub fn time_of_day(self) -> String {
        let hour = self.0.hour();
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let hour12 = match hour % 12 {
            0 => 12,
            other => other,
        };
        format!("{hour12:02}:{:02} {suffix}", self.0.minute())
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_timestamp() {
        let parsed = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2024-01-01T00:00:00Z");
        assert_eq!(parsed.time_of_day(), "12:00 AM");

        let afternoon = UtcDateTime::parse("2024-01-01T14:05:00Z").expect("must parse");
        assert_eq!(afternoon.time_of_day(), "02:05 PM");
    }

    #[test]
    fn rejects_non_utc_timestamp() {
        let err = UtcDateTime::parse("2024-01-01T01:00:00+01:00").expect_err("must fail");
        assert!(matches!(err, ValidationError::TimestampNotUtc { .. }));
    }

    #[test]
    fn consecutive_calls_are_strictly_increasing() {
        let mut previous = UtcDateTime::now();
        for _ in 0..1_000 {
            let next = UtcDateTime::now();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn threads_never_receive_the_same_instant() {
        let handles = (0..4)
            .map(|_| {
                std::thread::spawn(|| (0..500).map(|_| UtcDateTime::now()).collect::<Vec<_>>())
            })
            .collect::<Vec<_>>();

        let mut seen = std::collections::HashSet::new();
        for handle in handles {
            for stamp in handle.join().expect("thread finishes") {
                assert!(seen.insert(stamp), "duplicate timestamp {stamp:?}");
            }
        }
        assert_eq!(seen.len(), 2_000);
    }

    #[test]
    fn round_trips_through_json() {
        let now = UtcDateTime::now();
        let json = serde_json::to_string(&now).expect("serializes");
        let back: UtcDateTime = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, now);
    }
}
