use std::path::{Path, PathBuf};

/// Input kinds the pipeline knows how to pre-validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    GeoJSON,
    GeoCSV,
    ShapefileBundle,
    Other,
}

impl InputFormat {
    /// Classify by the path's final extension, so `roads.v2.geojson` is GeoJSON.
    pub fn from_path(path: &Path) -> Self {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return InputFormat::Other;
        };

        match extension.to_ascii_lowercase().as_str() {
            "geojson" | "json" => InputFormat::GeoJSON,
            "csv" => InputFormat::GeoCSV,
            "zip" => InputFormat::ShapefileBundle,
            _ => InputFormat::Other,
        }
    }
}

/// A classified input file. Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    path: PathBuf,
    format: InputFormat,
}

impl InputDescriptor {
    pub fn classify(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = InputFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    /// Index sidecar a bare shapefile needs next to it (`roads.shp` -> `roads.shx`).
    pub fn sidecar_path(&self) -> Option<PathBuf> {
        let extension = self.path.extension()?.to_str()?;
        if !extension.eq_ignore_ascii_case("shp") {
            return None;
        }

        let sidecar = if extension == "SHP" { "SHX" } else { "shx" };
        Some(self.path.with_extension(sidecar))
    }
}
