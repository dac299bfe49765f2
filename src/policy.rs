use tracing::warn;

use crate::config::LimitsConfig;
use crate::error::{Result, ValidatorError};
use crate::metadata::{BoundingBox, LayerMetadata};
use crate::report;

pub const INVALID_EXTENT: &str = "Invalid Vector Shape";

pub fn feature_limit_violation(ceiling: u64) -> String {
    format!("Exceeds Limit of {ceiling} features")
}

/// Check the configured limits against the extracted layer metadata.
///
/// Violations are appended to `errors` on the returned metadata and never
/// abort. The only hard failure is a limits object with no keys at all.
pub fn apply_limits(
    limits: &LimitsConfig,
    raw_report: &str,
    mut layer: LayerMetadata,
) -> Result<LayerMetadata> {
    if limits.is_empty() {
        return Err(ValidatorError::MissingLimits);
    }

    if let Some(ceiling) = limits.feature_count() {
        // No count in the report leaves the check skipped
        if let Some(count) = report::feature_count(raw_report)? {
            layer.feature_count = Some(count);
            if count >= ceiling {
                warn!(count, ceiling, "feature count limit exceeded");
                layer.errors.push(feature_limit_violation(ceiling));
            }
        }
    }

    if limits.check_extent() {
        let bbox = layer.extent.as_deref().and_then(BoundingBox::parse);
        if let Some(bbox) = bbox {
            if !bbox.is_within_world() {
                warn!(extent = %bbox, "extent outside lon/lat domain");
                layer.errors.push(INVALID_EXTENT.to_string());
            }
        }
    }

    Ok(layer)
}
