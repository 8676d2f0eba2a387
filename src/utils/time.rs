//! Clock and timestamp helpers
//!
//! All instants are kept at millisecond resolution so a snapshot written to
//! disk parses back to exactly the same value.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Current instant, truncated to whole milliseconds
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Render an instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn to_iso(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whole seconds from `from` to `to`, rounded towards negative infinity
pub fn floor_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(1000)
}

/// Serde adapter for nullable ISO-8601 instants
pub mod iso_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&super::to_iso(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|d| d.with_timezone(&Utc))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

/// Serde adapter reading a nullable minute count that may be fractional
///
/// Fractions are dropped towards zero, out-of-range values saturate.
pub mod minutes_opt {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<f64> = Option::deserialize(deserializer)?;
        Ok(raw.map(|minutes| minutes.trunc() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn floor_seconds_rounds_down_for_overrun() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 19, 30, 0).unwrap();
        let later = base + chrono::Duration::milliseconds(1500);
        assert_eq!(floor_seconds(base, later), 1);
        assert_eq!(floor_seconds(later, base), -2);
    }

    #[test]
    fn iso_has_millisecond_precision() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 19, 30, 0).unwrap();
        assert_eq!(to_iso(&date), "2024-05-01T19:30:00.000Z");
    }
}
