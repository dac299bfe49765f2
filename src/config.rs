//! Request configuration: which report to ask for and which limits to enforce.
//!
//! Both objects can be built directly or parsed from the JSON shapes callers
//! pass around, `{"options": [..]}` and `{"limits": {..}}`.

use std::str::FromStr;

use serde_json::Value;

use crate::error::{Result, ValidatorError};

/// Symbolic option names, each mapping to exactly one inspection flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectOption {
    SummaryOnly,
    ListAll,
}

impl InspectOption {
    pub fn flag(self) -> &'static str {
        match self {
            InspectOption::SummaryOnly => "-so",
            InspectOption::ListAll => "-al",
        }
    }
}

impl FromStr for InspectOption {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "summaryOnly" => Ok(InspectOption::SummaryOnly),
            "listAll" => Ok(InspectOption::ListAll),
            _ => Err(ValidatorError::InvalidOptions {
                reason: "unrecognized option",
            }),
        }
    }
}

/// Ordered option symbols. Every element is recognized by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    options: Vec<InspectOption>,
}

impl OptionSet {
    pub fn new(options: Vec<InspectOption>) -> Self {
        Self { options }
    }

    /// Parse `{"options": ["summaryOnly", "listAll"]}`. One bad symbol rejects the whole set.
    /// Keys other than `options` are ignored.
    pub fn from_value(value: &Value) -> Result<Self> {
        let invalid = |reason| ValidatorError::InvalidOptions { reason };

        let object = value.as_object().ok_or_else(|| invalid("options must be an object"))?;
        let symbols = object
            .get("options")
            .ok_or_else(|| invalid("missing \"options\" key"))?
            .as_array()
            .ok_or_else(|| invalid("options must be an array"))?;

        let options = symbols
            .iter()
            .map(|symbol| -> Result<InspectOption> {
                symbol
                    .as_str()
                    .ok_or_else(|| invalid("option must be a string"))?
                    .parse::<InspectOption>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { options })
    }

    pub fn iter(&self) -> impl Iterator<Item = InspectOption> + '_ {
        self.options.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Post-hoc limits checked against the extracted metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitsConfig {
    feature_count: Option<u64>,
    check_extent: Option<bool>,
    // Whether the limits object carried any key, recognized or not
    supplied: bool,
}

impl LimitsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feature_count(mut self, ceiling: u64) -> Self {
        self.feature_count = Some(ceiling);
        self.supplied = true;
        self
    }

    pub fn with_check_extent(mut self, check: bool) -> Self {
        self.check_extent = Some(check);
        self.supplied = true;
        self
    }

    /// Parse `{"limits": {"featureCount": 1000, "checkExtent": true}}`.
    /// `{}` is accepted and behaves like an empty limits object. Unknown limit
    /// keys are ignored but still make the object non-empty.
    pub fn from_value(value: &Value) -> Result<Self> {
        let invalid = |reason| ValidatorError::InvalidLimits { reason };

        let object = value.as_object().ok_or_else(|| invalid("limits must be an object"))?;
        if object.is_empty() {
            return Ok(Self::default());
        }

        let limits = object
            .get("limits")
            .ok_or_else(|| invalid("missing \"limits\" key"))?
            .as_object()
            .ok_or_else(|| invalid("limits must be an object"))?;
        let mut config = Self {
            supplied: !limits.is_empty(),
            ..Self::default()
        };

        if let Some(ceiling) = limits.get("featureCount") {
            let ceiling = ceiling
                .as_u64()
                .filter(|n| *n > 0)
                .ok_or_else(|| invalid("featureCount must be a positive integer"))?;
            config.feature_count = Some(ceiling);
        }

        if let Some(check) = limits.get("checkExtent") {
            let check = check
                .as_bool()
                .ok_or_else(|| invalid("checkExtent must be a boolean"))?;
            config.check_extent = Some(check);
        }

        Ok(config)
    }

    pub fn feature_count(&self) -> Option<u64> {
        self.feature_count
    }

    pub fn check_extent(&self) -> bool {
        self.check_extent.unwrap_or(false)
    }

    /// True when the limits object carried no keys at all.
    pub fn is_empty(&self) -> bool {
        !self.supplied
    }
}
