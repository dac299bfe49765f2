use std::fmt;

use geo::{coord, Coord};
use serde::Serialize;

/// Result payload handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metadata {
    Summary { info: String },
    Detail(LayerMetadata),
}

impl Metadata {
    pub fn as_detail(&self) -> Option<&LayerMetadata> {
        match self {
            Metadata::Detail(layer) => Some(layer),
            Metadata::Summary { .. } => None,
        }
    }

    pub fn info(&self) -> Option<&str> {
        match self {
            Metadata::Summary { info } => Some(info),
            Metadata::Detail(_) => None,
        }
    }
}

/// Per-layer fields extracted from a detail report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerMetadata {
    pub layer_name: Option<String>,
    pub geometry: Option<String>,
    pub extent: Option<String>,
    pub spatial_reference: String,
    pub attribute_block: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_count: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Extent corners as reported: top-left then bottom-right, each lon/lat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top_left: Coord<f64>,
    pub bottom_right: Coord<f64>,
}

impl BoundingBox {
    pub fn new(top_left: (f64, f64), bottom_right: (f64, f64)) -> Self {
        Self {
            top_left: coord! { x: top_left.0, y: top_left.1 },
            bottom_right: coord! { x: bottom_right.0, y: bottom_right.1 },
        }
    }

    /// Parse the extent text, e.g. "(-180.000000, -90.000000) - (180.000000, 83.645130)"
    pub fn parse(extent: &str) -> Option<Self> {
        let (first, second) = extent.split_once(" - ")?;

        let corner = |text: &str| -> Option<Coord<f64>> {
            let (lon, lat) = text.trim().trim_matches(['(', ')']).split_once(',')?;
            let lon = lon.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
            let lat = lat.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
            Some(coord! { x: lon, y: lat })
        };

        Some(Self {
            top_left: corner(first)?,
            bottom_right: corner(second)?,
        })
    }

    /// Corners stay inside the lon/lat domain.
    pub fn is_within_world(&self) -> bool {
        self.top_left.x >= -180.0
            && self.top_left.y <= 90.0
            && self.bottom_right.x <= 180.0
            && self.bottom_right.y >= -90.0
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.6}, {:.6}) - ({:.6}, {:.6})",
            self.top_left.x, self.top_left.y, self.bottom_right.x, self.bottom_right.y
        )
    }
}
