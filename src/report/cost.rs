use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::ops::Add;

use super::defect::Severity;
use crate::ValidationError;

/// Inclusive cost range in whole currency units.
///
/// Serialized as a two-element array `[min, max]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct CostRange {
    pub min: u32,
    pub max: u32,
}

impl CostRange {
    pub const ZERO: CostRange = CostRange { min: 0, max: 0 };

    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn validate(&self, what: &str) -> Result<()> {
        if self.min > self.max {
            return Err(ValidationError::new(
                "INVALID_COST_RANGE",
                format!("{}: min {} exceeds max {}", what, self.min, self.max),
            )
            .into());
        }
        Ok(())
    }
}

impl Add for CostRange {
    type Output = CostRange;

    fn add(self, rhs: CostRange) -> CostRange {
        CostRange {
            min: self.min.saturating_add(rhs.min),
            max: self.max.saturating_add(rhs.max),
        }
    }
}

impl From<[u32; 2]> for CostRange {
    fn from([min, max]: [u32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<CostRange> for [u32; 2] {
    fn from(range: CostRange) -> Self {
        [range.min, range.max]
    }
}

impl std::fmt::Display for CostRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}-{}", self.min, self.max)
    }
}

/// Materials and labor cost of repairing one defect of a given severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCost {
    pub materials: CostRange,
    pub labor: CostRange,
}

impl SeverityCost {
    pub fn total(&self) -> CostRange {
        self.materials + self.labor
    }
}

/// Per-severity repair pricing supplied by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTable {
    pub high: SeverityCost,
    pub medium: SeverityCost,
    pub low: SeverityCost,
}

impl CostTable {
    pub fn for_severity(&self, severity: Severity) -> SeverityCost {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for severity in Severity::ALL {
            let entry = self.for_severity(severity);
            entry
                .materials
                .validate(&format!("costs.{}.materials", severity))?;
            entry.labor.validate(&format!("costs.{}.labor", severity))?;
        }
        Ok(())
    }
}

impl Default for CostTable {
    /// One defect of each severity totals $475-700 (materials $200-350, labor $275-350).
    fn default() -> Self {
        Self {
            high: SeverityCost {
                materials: CostRange::new(100, 200),
                labor: CostRange::new(150, 200),
            },
            medium: SeverityCost {
                materials: CostRange::new(60, 100),
                labor: CostRange::new(90, 100),
            },
            low: SeverityCost {
                materials: CostRange::new(40, 50),
                labor: CostRange::new(35, 50),
            },
        }
    }
}

/// Summed repair cost of a defect set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub materials: CostRange,
    pub labor: CostRange,
    pub total: CostRange,
}

impl Add for CostEstimate {
    type Output = CostEstimate;

    fn add(self, rhs: CostEstimate) -> CostEstimate {
        CostEstimate {
            materials: self.materials + rhs.materials,
            labor: self.labor + rhs.labor,
            total: self.total + rhs.total,
        }
    }
}

/// Sums per-severity ranges over `severities`.
pub(crate) fn estimate<I>(severities: I, table: &CostTable) -> CostEstimate
where
    I: IntoIterator<Item = Severity>,
{
    severities
        .into_iter()
        .map(|severity| {
            let entry = table.for_severity(severity);
            CostEstimate {
                materials: entry.materials,
                labor: entry.labor,
                total: entry.total(),
            }
        })
        .fold(CostEstimate::default(), |acc, item| acc + item)
}
