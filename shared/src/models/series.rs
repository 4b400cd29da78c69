//! Parameter-oriented forecast payloads and their timestamp-keyed rows

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

/// Key holding the timestamp in a serialized [`TimestampRow`]
pub const DATE_FIELD: &str = "date";

// Offset-less layouts accepted after RFC 3339, read as UTC
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Raw forecast payload as returned by the prediction API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RawSeriesPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<ParameterSeries>,
}

/// One named quantity's values over time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterSeries {
    /// Parameter key, e.g. `t_2m:C`
    pub parameter: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub coordinates: Vec<CoordinateSeries>,
}

/// Values for a single spatial location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CoordinateSeries {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dates: Vec<DatedValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatedValue {
    /// ISO-8601 timestamp
    pub date: String,
    /// `None` when the API reports no value at this timestamp
    #[serde(default)]
    pub value: Option<f64>,
}

// `null` lists are treated like absent ones.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ParameterSeries {
    /// Build a single-coordinate series from `(timestamp, value)` pairs
    pub fn new<I, S>(parameter: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            parameter: parameter.into(),
            coordinates: vec![CoordinateSeries {
                dates: points
                    .into_iter()
                    .map(|(date, value)| DatedValue {
                        date: date.into(),
                        value: Some(value),
                    })
                    .collect(),
            }],
        }
    }

    /// Points of the first coordinate block. Other blocks are ignored.
    pub fn points(&self) -> &[DatedValue] {
        self.coordinates
            .first()
            .map(|c| c.dates.as_slice())
            .unwrap_or(&[])
    }
}

impl RawSeriesPayload {
    pub fn new(data: Vec<ParameterSeries>) -> Self {
        Self { data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|series| series.points().is_empty())
    }

    /// Parameter names in first-appearance order, without duplicates
    ///
    /// A parameter named like the row's [`DATE_FIELD`] is left out; it would
    /// collide with the timestamp once rows are flattened.
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.data.len());
        for series in &self.data {
            if series.parameter != DATE_FIELD && !names.contains(&series.parameter.as_str()) {
                names.push(series.parameter.as_str());
            }
        }
        names
    }
}

/// One timestamp's values across all parameters
///
/// A parameter with no value at this timestamp is absent from `values`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimestampRow {
    pub date: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl TimestampRow {
    pub fn get(&self, parameter: &str) -> Option<f64> {
        self.values.get(parameter).copied()
    }
}

/// Merge all parameter series into rows keyed by timestamp
///
/// Rows carry the raw timestamp string in `date` and are sorted by instant.
/// Timestamps that do not parse sort after all parseable ones. Points without
/// a value still create their row but leave the parameter absent.
pub fn reshape(payload: &RawSeriesPayload) -> Vec<TimestampRow> {
    let mut by_date: HashMap<&str, BTreeMap<String, f64>> = HashMap::new();

    for series in &payload.data {
        if series.parameter == DATE_FIELD {
            tracing::warn!(
                parameter = %series.parameter,
                "skipping series whose name collides with the timestamp field"
            );
            continue;
        }
        for point in series.points() {
            let values = by_date.entry(point.date.as_str()).or_default();
            if let Some(value) = point.value {
                values.insert(series.parameter.clone(), value);
            }
        }
    }

    let mut keyed: Vec<(Option<DateTime<FixedOffset>>, TimestampRow)> = by_date
        .into_iter()
        .map(|(date, values)| {
            let instant = parse_timestamp(date);
            if instant.is_none() {
                tracing::warn!(timestamp = date, "unparseable timestamp in series payload");
            }
            (
                instant,
                TimestampRow {
                    date: date.to_string(),
                    values,
                },
            )
        })
        .collect();

    keyed.sort_by(|(a, row_a), (b, row_b)| {
        compare_instants(a, b).then_with(|| row_a.date.cmp(&row_b.date))
    });

    tracing::debug!(
        parameters = payload.data.len(),
        rows = keyed.len(),
        "reshaped series payload"
    );

    keyed.into_iter().map(|(_, row)| row).collect()
}

/// Rows for tabular export: `date` is the raw ISO timestamp
pub fn export_rows(payload: &RawSeriesPayload) -> Vec<TimestampRow> {
    reshape(payload)
}

/// Rows for charting: `date` is a short weekday and 12-hour time label
/// rendered in `offset`
pub fn chart_rows(payload: &RawSeriesPayload, offset: FixedOffset) -> Vec<TimestampRow> {
    reshape(payload)
        .into_iter()
        .map(|mut row| {
            row.date = chart_label(&row.date, offset);
            row
        })
        .collect()
}

/// Format a raw timestamp for chart axes, e.g. `Mon 3:00 PM`
///
/// Unparseable timestamps are returned unchanged.
pub fn chart_label(timestamp: &str, offset: FixedOffset) -> String {
    match parse_timestamp(timestamp) {
        Some(instant) => instant
            .with_timezone(&offset)
            .format("%a %-I:%M %p")
            .to_string(),
        None => timestamp.to_string(),
    }
}

/// Parse an ISO-8601 timestamp
///
/// RFC 3339 is tried first, then minute-precision offsets such as
/// `2025-10-06T15:00+07:00` or `2025-10-06T15:00Z`, then offset-less forms
/// which are read as UTC.
pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<FixedOffset>> {
    let timestamp = timestamp.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(instant);
    }
    if let Ok(instant) = DateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M%:z") {
        return Some(instant);
    }

    let naive = timestamp
        .strip_suffix('Z')
        .or_else(|| timestamp.strip_suffix('z'))
        .unwrap_or(timestamp);
    let utc = FixedOffset::east_opt(0)?;
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .map(|naive| utc.from_utc_datetime(&naive))
}

fn compare_instants(
    a: &Option<DateTime<FixedOffset>>,
    b: &Option<DateTime<FixedOffset>>,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
