mod presets;
mod scripted;
mod stage;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::report::{Annotation, Defect, DefectReport};
use crate::session::UploadedFile;

pub use presets::Preset;
pub use scripted::ScriptedAnalyzer;
pub use stage::{Stage, StageKind, STAGES};

/// Raw analyzer output, before validation into a `DefectReport`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Findings {
    pub defects: Vec<Defect>,
    pub ocr: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Findings {
    pub fn into_report(self) -> Result<DefectReport> {
        DefectReport::build(self.defects, self.ocr)?.with_annotations(self.annotations)
    }
}

/// Producer of inspection findings for an uploaded batch.
pub trait Analyzer {
    /// Analyzer identifier.
    fn name(&self) -> &'static str;

    /// Analyze `files`, reporting each stage as it starts.
    ///
    /// Stages are reported strictly in order.
    fn analyze(
        &mut self,
        files: &[UploadedFile],
        on_stage: &mut dyn FnMut(&Stage),
    ) -> Result<Findings>;
}
