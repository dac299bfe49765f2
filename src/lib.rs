use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

pub mod classify;
pub mod config;
pub mod error;
pub mod invocation;
pub mod metadata;
pub mod policy;
pub mod prevalidate;
pub mod report;
pub mod tool;

pub use classify::{InputDescriptor, InputFormat};
pub use config::{InspectOption, LimitsConfig, OptionSet};
pub use error::{ErrorKind, Result, ValidatorError};
pub use metadata::{BoundingBox, LayerMetadata, Metadata};
pub use tool::{InspectionReport, InspectionTool, OgrInfo};

use invocation::Invocation;

/// Validate a vector file, inspect it, and extract its metadata.
///
/// Stages run strictly in order and any hard failure stops the pipeline.
/// Limit violations do not fail; they are reported in `errors` on the result.
pub fn inspect_file<T: InspectionTool + ?Sized>(
    tool: &T,
    path: &Path,
    options: Option<&OptionSet>,
    limits: Option<&LimitsConfig>,
) -> Result<Metadata> {
    let version = tool.probe()?;
    debug!(%version, "inspection tool available");

    let descriptor = InputDescriptor::classify(path);
    debug!(path = %path.display(), format = ?descriptor.format(), "classified input");

    let resolved = prevalidate::prevalidate(&descriptor)?;

    let invocation = Invocation::build(descriptor.format(), &resolved, options);
    let raw_report = tool.inspect(invocation.args())?;

    let mode = invocation.mode();
    let metadata = report::parse_report(&raw_report, descriptor.format(), mode)?;

    let metadata = match (metadata, limits) {
        (Metadata::Detail(layer), Some(limits)) => {
            Metadata::Detail(policy::apply_limits(limits, &raw_report, layer)?)
        }
        (metadata, _) => metadata,
    };

    info!(path = %resolved.display(), ?mode, "vector metadata extracted");
    Ok(metadata)
}

/// Caller-facing entry point taking the JSON shaped `{"options": [..]}` and
/// `{"limits": {..}}` objects. Every failure comes back as its message.
pub fn validate<T: InspectionTool + ?Sized>(
    tool: &T,
    path: Option<&str>,
    options: Option<&Value>,
    limits: Option<&Value>,
) -> std::result::Result<Metadata, String> {
    let run = || -> Result<Metadata> {
        let path = path.filter(|p| !p.is_empty()).ok_or(ValidatorError::MissingInput)?;
        let options = options.map(OptionSet::from_value).transpose()?;
        let limits = limits.map(LimitsConfig::from_value).transpose()?;

        inspect_file(tool, Path::new(path), options.as_ref(), limits.as_ref())
    };

    run().map_err(|err| {
        debug!(error = ?err, "validation failed");
        err.to_string()
    })
}
