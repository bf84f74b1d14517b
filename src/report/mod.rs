//! Defect report model.
//!
//! A `DefectReport` is built once from an analyzer's findings and is read-only
//! afterwards. Severity counts are derived at construction, so they always
//! describe the defects the report actually holds.

mod annotation;
mod cost;
mod defect;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use annotation::{Annotation, Color};
pub use cost::{CostEstimate, CostRange, CostTable, SeverityCost};
pub use defect::{Defect, Severity};

/// Defect counts by severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
}

impl Summary {
    fn tally(defects: &[Defect]) -> Self {
        let mut summary = Summary::default();
        for defect in defects {
            match defect.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
            summary.total += 1;
        }
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DefectReport {
    defects: Vec<Defect>,
    ocr: Vec<String>,
    annotations: Vec<Annotation>,
    summary: Summary,
}

impl DefectReport {
    /// Validates every defect and derives the severity counts.
    pub fn build(defects: Vec<Defect>, ocr: Vec<String>) -> Result<Self> {
        for defect in &defects {
            defect.validate()?;
        }
        let summary = Summary::tally(&defects);
        Ok(Self {
            defects,
            ocr,
            annotations: Vec::new(),
            summary,
        })
    }

    /// Attaches overlay annotations, rejecting any that leave the unit square.
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Result<Self> {
        for annotation in &annotations {
            annotation.validate()?;
        }
        self.annotations = annotations;
        Ok(self)
    }

    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }

    pub fn ocr(&self) -> &[String] {
        &self.ocr
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn summarize(&self) -> Summary {
        self.summary
    }

    pub fn estimate_cost(&self, table: &CostTable) -> CostEstimate {
        cost::estimate(self.defects.iter().map(|d| d.severity), table)
    }

    /// Defects ordered most severe first; equal severities keep report order.
    pub fn defects_by_priority(&self) -> Vec<&Defect> {
        let mut ordered: Vec<&Defect> = self.defects.iter().collect();
        ordered.sort_by(|a, b| b.severity.cmp(&a.severity));
        ordered
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.defects.iter().map(|d| d.severity).max()
    }

    pub fn defects_with(&self, severity: Severity) -> impl Iterator<Item = &Defect> {
        self.defects.iter().filter(move |d| d.severity == severity)
    }
}
