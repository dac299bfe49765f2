use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::classify::InputFormat;
use crate::config::{InspectOption, OptionSet};
use crate::report::ReportMode;

const VSIZIP_PREFIX: &str = "/vsizip/";

// Pin the coordinate columns so CSV rows are read as point geometries
const GEOCSV_HINTS: [&str; 6] = [
    "-oo",
    "X_POSSIBLE_NAMES=longitude",
    "-oo",
    "Y_POSSIBLE_NAMES=latitude",
    "-oo",
    "KEEP_GEOM_COLUMNS=NO",
];

/// Ordered argument list for one inspection call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<OsString>,
}

impl Invocation {
    /// Build the arguments for `resolved`, an absolute path produced by pre-validation.
    pub fn build(format: InputFormat, resolved: &Path, options: Option<&OptionSet>) -> Self {
        let mut args = Vec::new();

        if format == InputFormat::ShapefileBundle {
            let mut virtual_path = OsString::from(VSIZIP_PREFIX);
            virtual_path.push(resolved.as_os_str());
            args.push(virtual_path);
        } else {
            args.push(resolved.as_os_str().to_os_string());
        }

        if let Some(options) = options {
            args.extend(options.iter().map(|option| OsString::from(option.flag())));
        }

        if format == InputFormat::GeoCSV && args.len() > 1 {
            args.extend(GEOCSV_HINTS.iter().map(OsString::from));
        }

        Self { args }
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().skip(1).any(|arg| arg.as_os_str() == OsStr::new(flag))
    }

    /// Only a list-all call yields the per-layer report.
    pub fn mode(&self) -> ReportMode {
        if self.has_flag(InspectOption::ListAll.flag()) {
            ReportMode::Detail
        } else {
            ReportMode::Summary
        }
    }
}
