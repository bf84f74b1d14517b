//! InfraSight inspection core
//!
//! This crate turns inspection findings into a validated defect report and
//! draws the report's annotations over the inspected image.
//!
//! # Module Structure
//!
//! - `report`: Defects, annotations, severity counts, cost estimation
//! - `overlay`: Drawing surfaces and the annotation overlay renderer
//! - `responder`: Keyword-matched answers to questions about a report
//! - `session`: Uploaded files and the report of the current batch
//! - `analysis`: Analyzer seam and the scripted stage sequence
//! - `actions`: Report export document, work orders, share notifications
//! - `config`: File + environment configuration

pub mod actions;
pub mod analysis;
pub mod config;
pub mod overlay;
pub mod report;
pub mod responder;
pub mod session;
pub mod ui;

pub use actions::{Notification, ReportDocument, ShareChannel, Ticket, WorkOrder};
pub use analysis::{Analyzer, Findings, Preset, ScriptedAnalyzer, Stage, STAGES};
pub use config::InfraSightConfig;
pub use overlay::{
    pixel_box, CommandRecorder, DrawCommand, DrawingSurface, OverlayRenderer, OverlayStyle,
    PixelRect, RasterSurface,
};
pub use report::{
    Annotation, Color, CostEstimate, CostRange, CostTable, Defect, DefectReport, Severity,
    SeverityCost, Summary,
};
pub use responder::{answer, Intent, Responder};
pub use session::{format_file_size, FileKind, IntakeOutcome, Session, UploadedFile};

// -------------------- Domain Errors --------------------

/// Malformed defect, annotation or cost data.
///
/// Returned inside `anyhow::Error`; recover it with
/// `err.downcast_ref::<ValidationError>()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
impl std::error::Error for ValidationError {}

/// A render target that cannot be drawn on (no image has been measured yet).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceError {
    pub code: &'static str,
    pub message: String,
}

impl SurfaceError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
impl std::error::Error for SurfaceError {}
