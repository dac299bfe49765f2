#![allow(dead_code)]

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use geojson::{Feature, FeatureCollection, Geometry as GeoJsonGeometry};
use ogrinfo_validator::{InspectionReport, InspectionTool};
use tempfile::TempDir;

pub const VERSION: &str = "GDAL 3.6.2, released 2023/01/02";

/// Stand-in for ogrinfo: answers the version probe and returns a canned report.
pub struct ScriptedTool {
    pub version: Option<String>,
    pub report: String,
    pub stderr: String,
    pub calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedTool {
    pub fn new(report: &str) -> Self {
        Self {
            version: Some(VERSION.to_string()),
            report: report.to_string(),
            stderr: String::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            version: None,
            ..Self::new("")
        }
    }

    pub fn failing(stderr: &str) -> Self {
        Self {
            stderr: stderr.to_string(),
            ..Self::new("")
        }
    }

    // Arguments of the inspection call, excluding the version probe
    pub fn inspection_args(&self) -> Option<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .find(|args| args.as_slice() != ["--version"])
            .cloned()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl InspectionTool for ScriptedTool {
    fn program(&self) -> String {
        "ogrinfo".to_string()
    }

    fn run(&self, args: &[OsString]) -> io::Result<InspectionReport> {
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        let is_probe = args == ["--version"];
        self.calls.borrow_mut().push(args);

        if is_probe {
            return Ok(match &self.version {
                Some(version) => InspectionReport {
                    stdout: format!("{version}\n"),
                    stderr: String::new(),
                    success: true,
                },
                None => InspectionReport {
                    stdout: String::new(),
                    stderr: "ogrinfo: command not found".to_string(),
                    success: false,
                },
            });
        }

        Ok(InspectionReport {
            stdout: self.report.clone(),
            stderr: self.stderr.clone(),
            success: true,
        })
    }
}

/// Temporary directory holding fixture files for one test.
pub struct Fixtures {
    tmp: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            tmp: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.tmp.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn write_json(&self, name: &str, value: &serde_json::Value) -> PathBuf {
        self.write(name, &value.to_string())
    }

    // Valid point collection, serialized the same way the partitioner wrote its output
    pub fn write_points(&self, name: &str, points: &[(f64, f64)]) -> PathBuf {
        let features = points
            .iter()
            .map(|(lon, lat)| Feature {
                bbox: None,
                geometry: Some(GeoJsonGeometry::new(geojson::Value::Point(vec![*lon, *lat]))),
                id: None,
                properties: Some(serde_json::Map::new()),
                foreign_members: None,
            })
            .collect();

        let collection = FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };

        let path = self.path(name);
        let file = File::create(&path).expect("create geojson fixture");
        serde_json::to_writer_pretty(file, &collection).expect("write geojson fixture");
        path
    }

    pub fn write_zip(&self, name: &str, members: &[&str]) -> PathBuf {
        let path = self.path(name);
        let file = File::create(&path).expect("create zip fixture");
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();
        for member in members {
            zip.start_file(*member, options).expect("start zip member");
            zip.write_all(b"\0\0\x27\x0a").expect("write zip member");
        }
        zip.finish().expect("finish zip fixture");
        path
    }

    /// Zip with empty stored members whose headers then claim `method`,
    /// e.g. 12 (bzip2), which this build cannot decompress.
    pub fn write_zip_with_method(&self, name: &str, members: &[&str], method: u16) -> PathBuf {
        let path = self.path(name);
        let mut buffer = io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            let options =
                zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
            for member in members {
                zip.start_file(*member, options).expect("start zip member");
            }
            zip.finish().expect("finish zip fixture");
        }

        let mut bytes = buffer.into_inner();
        let method = method.to_le_bytes();
        // Method sits at offset 8 in local headers and offset 10 in central headers
        for (signature, offset) in [(b"PK\x03\x04", 8), (b"PK\x01\x02", 10)] {
            let starts: Vec<usize> = bytes
                .windows(4)
                .enumerate()
                .filter(|(_, window)| *window == &signature[..])
                .map(|(start, _)| start)
                .collect();
            for start in starts {
                bytes[start + offset..start + offset + 2].copy_from_slice(&method);
            }
        }

        fs::write(&path, bytes).expect("write zip fixture");
        path
    }
}

pub const GEOJSON_DETAIL_REPORT: &str = "INFO: Open of `points.geojson'
      using driver `GeoJSON' successful.

Layer name: points
Geometry: Point
Feature Count: 3
Extent: (10.000000, 59.000000) - (11.000000, 60.000000)
Layer SRS WKT:
GEOGCS[\"WGS 84\",
    DATUM[\"WGS_1984\",
        SPHEROID[\"WGS 84\",6378137,298.257223563]],
    AUTHORITY[\"EPSG\",\"4326\"]]
name: String (0.0)
";

pub const GEOJSON_SUMMARY_REPORT: &str = "INFO: Open of `points.geojson'
      using driver `GeoJSON' successful.
1: points (Point)
";

pub const CSV_DETAIL_REPORT: &str = "INFO: Open of `lon.csv'
      using driver `CSV' successful.

Layer name: lon
Geometry: Point
Feature Count: 15
Extent: (-120.000000, 30.000000) - (100.000000, 60.000000)
Layer SRS WKT:
(unknown)
name: String (0.0)
";

pub const BAD_EXTENT_REPORT: &str = "Layer name: weather2015
Geometry: Point
Feature Count: 2
Extent: (-200.000000, 10.000000) - (20.000000, 40.000000)
Layer SRS WKT:
GEOGCS[\"WGS 84\"]
STATION: String (10.0)
";

pub const PROJECTED_REPORT: &str = "Layer name: parcels
Geometry: Polygon
Layer SRS WKT:
PROJCS[\"NAD83 / UTM zone 15N\",
    PROJECTION[\"Transverse_Mercator\"],
    UNIT[\"metre\",1]]
PARCEL_ID: Integer (10.0)
";
