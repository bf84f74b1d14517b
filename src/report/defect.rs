use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ValidationError;

/// Defect severity. Ordering is priority: `High > Medium > Low`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Upper-case form used in priority labels ("HIGH").
    pub fn label(self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            other => Err(ValidationError::new(
                "UNKNOWN_SEVERITY",
                format!("severity '{}' is not one of high, medium, low", other),
            )),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = ValidationError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// One detected anomaly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Defect {
    /// Category label ("Structural Crack").
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub description: String,
    /// Human-readable locator ("Grid: A-3, Coordinates: (245, 156)").
    pub location: String,
    pub confidence: f64,
}

impl Defect {
    pub fn new(
        kind: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        location: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            kind: kind.into(),
            severity,
            description: description.into(),
            location: location.into(),
            confidence,
        }
    }

    /// Confidence as a whole percentage, for display.
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(ValidationError::new(
                "INVALID_CONFIDENCE",
                format!(
                    "defect '{}' has confidence {} outside [0, 1]",
                    self.kind, self.confidence
                ),
            )
            .into());
        }
        Ok(())
    }
}
