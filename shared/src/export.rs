//! CSV projection of forecast payloads

use std::collections::HashMap;

use crate::error::ExportError;
use crate::models::{export_rows, DatedValue, RawSeriesPayload};
use crate::types::CsvLayout;

/// Header of the timestamp column
pub const DATETIME_COLUMN: &str = "datetime";

/// Serialize a payload as CSV using the given row layout
pub fn export_csv_with_layout(
    payload: &RawSeriesPayload,
    layout: CsvLayout,
) -> Result<String, ExportError> {
    match layout {
        CsvLayout::Keyed => export_csv(payload),
        CsvLayout::Positional => export_csv_positional(payload),
    }
}

/// Serialize a payload as CSV with one row per distinct timestamp
///
/// Columns are `datetime` followed by parameters in first-appearance order.
/// Rows are chronological and a missing value is written as an empty cell.
pub fn export_csv(payload: &RawSeriesPayload) -> Result<String, ExportError> {
    let rows = export_rows(payload);
    if rows.is_empty() {
        return Ok(String::new());
    }

    let columns = payload.parameter_names();
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(header(&columns))?;

    for row in &rows {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(row.date.clone());
        record.extend(columns.iter().map(|c| format_cell(row.get(c))));
        wtr.write_record(&record)?;
    }

    finish(wtr)
}

/// Serialize a payload as CSV pairing values by index
///
/// Timestamps come from the first parameter's series and every other
/// parameter contributes the value at the same position. Alignment is not
/// checked; series of a different length are logged and padded with empty
/// cells.
pub fn export_csv_positional(payload: &RawSeriesPayload) -> Result<String, ExportError> {
    let Some(first) = payload.data.first() else {
        return Ok(String::new());
    };
    let dates = first.points();
    if dates.is_empty() {
        return Ok(String::new());
    }

    let columns = payload.parameter_names();
    // Later series replace earlier ones with the same parameter name.
    let by_name: HashMap<&str, &[DatedValue]> = payload
        .data
        .iter()
        .map(|s| (s.parameter.as_str(), s.points()))
        .collect();

    for (name, points) in &by_name {
        if points.len() != dates.len() {
            tracing::warn!(
                parameter = *name,
                expected = dates.len(),
                actual = points.len(),
                "parameter series length differs from timestamp column"
            );
        }
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(header(&columns))?;

    for (i, point) in dates.iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(point.date.clone());
        record.extend(columns.iter().map(|c| {
            let value = by_name
                .get(c)
                .and_then(|points| points.get(i))
                .and_then(|p| p.value);
            format_cell(value)
        }));
        wtr.write_record(&record)?;
    }

    finish(wtr)
}

/// Download filename for a location's export
pub fn csv_filename(location: &str) -> String {
    let cleaned: String = location
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let stem = if cleaned.is_empty() { "weather" } else { &cleaned };
    format!("{}_weather_data.csv", stem)
}

fn header(columns: &[&str]) -> Vec<String> {
    std::iter::once(DATETIME_COLUMN)
        .chain(columns.iter().copied())
        .map(str::to_string)
        .collect()
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}
