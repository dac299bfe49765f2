//! Structural checks that run before the inspection command is spawned.
//!
//! Each validator returns its own outcome; nothing is shared between calls.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;
use zip::ZipArchive;

use crate::classify::{InputDescriptor, InputFormat};
use crate::error::{Result, ValidatorError};

pub const VALID_GEOMETRY_TYPES: [&str; 7] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
];

const FEATURE_KEYS: [&str; 3] = ["type", "geometry", "properties"];
const COLLECTION_FORBIDDEN_KEYS: [&str; 4] = ["coordinates", "geometries", "geometry", "properties"];

const BUNDLE_PRIMARY: &str = "shp";
const BUNDLE_INDEX: &str = "shx";

/// Run the existence check and the format specific validator.
/// Returns the absolute path of the input on success.
pub fn prevalidate(descriptor: &InputDescriptor) -> Result<PathBuf> {
    let resolved = check_file(descriptor)?;

    match descriptor.format() {
        InputFormat::GeoJSON => validate_geojson_file(&resolved)?,
        InputFormat::GeoCSV => {
            let rows = validate_geocsv_file(&resolved)?;
            debug!(rows, "GeoCSV rows validated");
        }
        InputFormat::ShapefileBundle => {
            let entries = list_archive_entries(&resolved)?;
            validate_bundle(&entries)?;
        }
        InputFormat::Other => {}
    }

    Ok(resolved)
}

/// Check the input is an existing file and, for bare shapefiles, that the
/// .shx index sits next to it.
pub fn check_file(descriptor: &InputDescriptor) -> Result<PathBuf> {
    let path = descriptor.path();
    if path.as_os_str().is_empty() {
        return Err(ValidatorError::MissingInput);
    }

    if !path.is_file() {
        return Err(ValidatorError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    if let Some(sidecar) = descriptor.sidecar_path() {
        if !sidecar.is_file() {
            return Err(ValidatorError::MissingSidecar {
                path: path.to_path_buf(),
                sidecar,
            });
        }
    }

    std::path::absolute(path).map_err(|e| ValidatorError::io("resolve_input", path, e))
}

pub fn validate_geojson_file(path: &Path) -> Result<()> {
    let bytes = fs::read(path).map_err(|e| ValidatorError::io("read_geojson", path, e))?;
    let payload: Value =
        serde_json::from_slice(&bytes).map_err(|_| ValidatorError::InvalidGeoJson {
            reason: "payload is not valid JSON",
        })?;

    validate_geojson(&payload)
}

/// Structural GeoJSON check. Stops at the first violation.
///
/// FeatureCollections and single Features are inspected; any other GeoJSON
/// object passes through to the inspection command untouched.
pub fn validate_geojson(payload: &Value) -> Result<()> {
    let invalid = |reason| ValidatorError::InvalidGeoJson { reason };

    let object = payload.as_object().ok_or_else(|| invalid("payload is not an object"))?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("payload has no type"))?;

    if kind.eq_ignore_ascii_case("featurecollection") {
        let features = object
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("features is not an array"))?;

        if COLLECTION_FORBIDDEN_KEYS.iter().any(|key| object.contains_key(*key)) {
            return Err(invalid("collection carries geometry members"));
        }

        for feature in features {
            let feature = feature.as_object().ok_or_else(|| invalid("feature is not an object"))?;
            if feature.len() != FEATURE_KEYS.len() || !has_feature_keys(feature) {
                return Err(invalid("feature keys must be type, geometry and properties"));
            }

            let geometry = canonical_geometry(feature).ok_or_else(|| invalid("unknown geometry type"))?;
            if geometry.contains_key("geometry") || geometry.contains_key("properties") {
                return Err(invalid("geometry carries feature members"));
            }
        }
    }

    if kind == "Feature" {
        if !has_feature_keys(object) {
            return Err(invalid("feature keys must be type, geometry and properties"));
        }
        canonical_geometry(object).ok_or_else(|| invalid("unknown geometry type"))?;
    }

    Ok(())
}

fn has_feature_keys(feature: &Map<String, Value>) -> bool {
    FEATURE_KEYS.iter().all(|key| feature.contains_key(*key))
}

// The feature's geometry object, if its type is one of the canonical names
fn canonical_geometry(feature: &Map<String, Value>) -> Option<&Map<String, Value>> {
    let geometry = feature.get("geometry")?.as_object()?;
    let kind = geometry.get("type")?.as_str()?;
    VALID_GEOMETRY_TYPES.contains(&kind).then_some(geometry)
}

/// Stream the rows of a GeoCSV file and check the coordinate columns.
/// Returns the number of data rows.
pub fn validate_geocsv_file(path: &Path) -> Result<u64> {
    let csv_error = |source| ValidatorError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_lowercase)
        .collect();

    let column = |name: &str| -> Option<usize> {
        let mut matches = headers.iter().enumerate().filter(|(_, h)| h.as_str() == name);
        match (matches.next(), matches.next()) {
            (Some((index, _)), None) => Some(index),
            _ => None,
        }
    };

    let (Some(lat), Some(lng)) = (column("latitude"), column("longitude")) else {
        return Err(ValidatorError::MissingCoordinateColumns { headers });
    };

    let mut rows = 0u64;
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows += 1;

        let latitude = record.get(lat).and_then(leading_integer);
        let longitude = record.get(lng).and_then(leading_integer);
        let out_of_range = latitude.is_some_and(|v| !(-90..=90).contains(&v))
            || longitude.is_some_and(|v| !(-180..=180).contains(&v));

        if out_of_range {
            return Err(ValidatorError::InvalidCoordinateValues { row: rows });
        }
    }

    Ok(rows)
}

// Integer prefix of a cell, truncating any fraction: "45.9" -> 45, "-7e3" -> -7.
// Cells without a numeric prefix yield None and are left to the inspection command.
fn leading_integer(cell: &str) -> Option<i64> {
    let cell = cell.trim_start();
    let (negative, rest) = match cell.as_bytes().first() {
        Some(b'-') => (true, &cell[1..]),
        Some(b'+') => (false, &cell[1..]),
        _ => (false, cell),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    // Overlong digit runs are out of range either way
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// One member of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub extension: Option<String>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let extension = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        Self { name, extension }
    }
}

/// List the file members of a zip archive, in archive order.
pub fn list_archive_entries(path: &Path) -> Result<Vec<ArchiveEntry>> {
    let zip_error = |source| ValidatorError::Zip {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| ValidatorError::io("open_bundle", path, e))?;
    let mut archive = ZipArchive::new(file).map_err(zip_error)?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        // Raw access reads the header only, so unsupported compression methods still list
        let entry = archive.by_index_raw(index).map_err(zip_error)?;
        if entry.is_file() {
            entries.push(ArchiveEntry::new(entry.name()));
        }
    }

    Ok(entries)
}

/// A bundle is complete when it holds exactly one .shp and one .shx member.
pub fn validate_bundle(entries: &[ArchiveEntry]) -> Result<()> {
    let required: Vec<&ArchiveEntry> = entries
        .iter()
        .filter(|entry| matches!(entry.extension.as_deref(), Some(BUNDLE_PRIMARY | BUNDLE_INDEX)))
        .collect();

    let has = |extension: &str| required.iter().any(|e| e.extension.as_deref() == Some(extension));

    if required.len() == 2 && has(BUNDLE_PRIMARY) && has(BUNDLE_INDEX) {
        return Ok(());
    }

    Err(ValidatorError::MissingCompanion {
        entries: entries.iter().map(|e| e.name.clone()).collect(),
    })
}
