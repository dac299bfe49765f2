//! Extraction of structured metadata from the inspection command's text report.
//!
//! The report has no fixed grammar. Every field is pulled out by its own
//! best-effort extractor, and a missing field becomes `None` instead of an
//! error. Format specific layout differences are handled here only.

use regex::Regex;

use crate::classify::InputFormat;
use crate::error::{Result, ValidatorError};
use crate::metadata::{LayerMetadata, Metadata};

const SUMMARY_MARKER: &str = "using";
const SRS_MARKER: &str = "Layer SRS WKT:";
const UNKNOWN_SRS: &str = "(unknown)";
const PROJECTION_TOKEN: &str = "PROJECTION";

const FIELD_PATTERN: &str = r"(?im)^[ \t]*(layer name|geometry|extent):[ \t]*(.*)$";
const FEATURE_COUNT_PATTERN: &str = r"(?i)Feature Count:[ \t]*(\d+)";

/// Which report layout the command was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Summary,
    Detail,
}

pub fn parse_report(report: &str, format: InputFormat, mode: ReportMode) -> Result<Metadata> {
    match mode {
        ReportMode::Summary => Ok(Metadata::Summary {
            info: summary_text(report),
        }),
        ReportMode::Detail => parse_detail(report, format).map(Metadata::Detail),
    }
}

/// Everything from the driver line onwards, flattened to a single line.
/// Line breaks and the numeric layer index in front of each layer line ("1: roads") are dropped.
pub fn summary_text(report: &str) -> String {
    let start = report.find(SUMMARY_MARKER).unwrap_or(0);

    report[start..]
        .lines()
        .map(strip_layer_index)
        .collect::<String>()
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

fn strip_layer_index(line: &str) -> &str {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && line[digits..].starts_with(':') {
        &line[digits..]
    } else {
        line
    }
}

pub fn parse_detail(report: &str, format: InputFormat) -> Result<LayerMetadata> {
    let residual = report
        .find(SRS_MARKER)
        .map(|index| report[index + SRS_MARKER.len()..].trim())
        .unwrap_or_default();

    let fields = compile(FIELD_PATTERN)?;
    let mut layer = LayerMetadata {
        layer_name: labelled_field(&fields, report, "layer name"),
        geometry: labelled_field(&fields, report, "geometry"),
        extent: labelled_field(&fields, report, "extent"),
        ..LayerMetadata::default()
    };

    let (spatial_reference, attribute_block) = match format {
        InputFormat::GeoCSV => tabular_srs(residual),
        _ => native_srs(residual),
    };

    if spatial_reference.contains(PROJECTION_TOKEN) {
        return Err(ValidatorError::UnsupportedProjection);
    }

    layer.spatial_reference = spatial_reference.to_string();
    layer.attribute_block = attribute_block.trim().to_string();
    Ok(layer)
}

fn compile(pattern: &'static str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ValidatorError::ReportPattern { pattern, source })
}

// Value of the first line starting with `label:`, case-insensitive
fn labelled_field(fields: &Regex, report: &str, label: &str) -> Option<String> {
    let captures = fields
        .captures_iter(report)
        .find(|captures| captures[1].eq_ignore_ascii_case(label))?;
    let value = captures.get(2)?.as_str().trim();

    (!value.is_empty()).then(|| value.to_string())
}

// Tabular sources carry no real SRS; the attribute block follows the literal
fn tabular_srs(residual: &str) -> (&str, &str) {
    let attributes = match residual.find(UNKNOWN_SRS) {
        Some(index) => &residual[index + UNKNOWN_SRS.len()..],
        None => residual,
    };
    (UNKNOWN_SRS, attributes)
}

// WKT ends at the last bracket; attribute definitions follow it
fn native_srs(residual: &str) -> (&str, &str) {
    match residual.rfind(['[', ']']) {
        Some(index) => residual.split_at(index + 1),
        None => (residual, ""),
    }
}

/// Integer following "Feature Count:" in the report, if there is one.
pub fn feature_count(report: &str) -> Result<Option<u64>> {
    let count = compile(FEATURE_COUNT_PATTERN)?
        .captures(report)
        .and_then(|captures| captures[1].parse().ok());
    Ok(count)
}
