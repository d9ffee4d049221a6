//! JSON serialization for assessment reports.

use crate::assessment::AssessmentReport;

/// Serialize a report to a compact JSON string.
///
/// Non-finite floats are written as `null`. Report fields that can be
/// non-finite are `Option`s, so the output always parses back.
///
/// # Errors
///
/// Returns the serializer's error. Reports contain only string keys and
/// plain data, so this does not happen in practice.
pub fn to_json(report: &AssessmentReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a report to a pretty-printed JSON string.
///
/// Non-finite floats are written as `null`. Report fields that can be
/// non-finite are `Option`s, so the output always parses back.
///
/// # Errors
///
/// Returns the serializer's error. Reports contain only string keys and
/// plain data, so this does not happen in practice.
pub fn to_json_pretty(report: &AssessmentReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
