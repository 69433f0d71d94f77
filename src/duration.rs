//! Duration formatting and (de)serialization helpers.
//!
//! Durations travel through the input and JSON output as a number of
//! seconds (fractional values allowed) and are stored as `chrono::Duration`
//! with microsecond precision.

use chrono::Duration;

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

/// Total length of a duration in microseconds, saturating on overflow.
pub fn as_micros(duration: &Duration) -> i64 {
    duration
        .num_microseconds()
        .unwrap_or_else(|| duration.num_milliseconds().saturating_mul(1000))
}

/// Format a duration as `[D day[s], ]H:MM:SS[.ffffff]`.
///
/// Negative durations borrow a whole day, so one hour short of zero reads
/// `-1 day, 23:00:00`.
pub fn format_duration(duration: &Duration) -> String {
    let micros = as_micros(duration);
    let days = micros.div_euclid(MICROS_PER_DAY);
    let rem = micros.rem_euclid(MICROS_PER_DAY);

    let seconds = rem / MICROS_PER_SECOND;
    let fraction = rem % MICROS_PER_SECOND;

    let mut out = String::new();
    if days != 0 {
        let plural = if days.abs() == 1 { "" } else { "s" };
        out.push_str(&format!("{} day{}, ", days, plural));
    }
    out.push_str(&format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    ));
    if fraction != 0 {
        out.push_str(&format!(".{:06}", fraction));
    }
    out
}

/// Format an optional duration, rendering a missing value as `None`.
pub fn format_optional(duration: Option<&Duration>) -> String {
    match duration {
        Some(d) => format_duration(d),
        None => "None".to_string(),
    }
}

fn from_seconds<E: serde::de::Error>(secs: f64) -> Result<Duration, E> {
    if !secs.is_finite() {
        return Err(E::custom(format!("invalid duration: {} seconds", secs)));
    }
    Ok(Duration::microseconds(
        (secs * MICROS_PER_SECOND as f64).round() as i64,
    ))
}

fn to_seconds(duration: &Duration) -> f64 {
    as_micros(duration) as f64 / MICROS_PER_SECOND as f64
}

/// `#[serde(with = "seconds")]` for a plain `Duration`.
pub mod seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(super::to_seconds(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        super::from_seconds(f64::deserialize(deserializer)?)
    }
}

/// `#[serde(with = "optional_seconds")]` for an `Option<Duration>`.
pub mod optional_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&super::to_seconds(d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(super::from_seconds)
            .transpose()
    }
}

/// `#[serde(with = "label_seconds")]` for a label → duration map.
pub mod label_seconds {
    use chrono::Duration;
    use indexmap::IndexMap;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &IndexMap<String, Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(value.len()))?;
        for (label, duration) in value {
            map.serialize_entry(label, &super::to_seconds(duration))?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, Duration>, D::Error> {
        IndexMap::<String, f64>::deserialize(deserializer)?
            .into_iter()
            .map(|(label, secs)| super::from_seconds(secs).map(|d| (label, d)))
            .collect()
    }
}
