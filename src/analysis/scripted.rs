use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::presets::Preset;
use super::stage::STAGES;
use super::{Analyzer, Findings, Stage};
use crate::session::UploadedFile;

/// Largest shift applied to an annotation origin when jitter is enabled.
const MAX_JITTER: f64 = 0.05;

/// Replays the fixed stage script and returns a preset's canned findings.
///
/// Stage delays are slept for real, scaled by `delay_scale`; a scale of zero
/// runs the script instantly.
pub struct ScriptedAnalyzer {
    preset: Preset,
    delay_scale: f64,
    rng: Option<StdRng>,
}

impl ScriptedAnalyzer {
    pub fn new(preset: Preset) -> Self {
        Self {
            preset,
            delay_scale: 0.0,
            rng: None,
        }
    }

    pub fn with_delay_scale(mut self, delay_scale: f64) -> Self {
        self.delay_scale = delay_scale;
        self
    }

    /// Move each annotation by a seeded random offset, staying inside the image.
    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    fn jitter(&mut self, findings: &mut Findings) {
        let Some(rng) = self.rng.as_mut() else {
            return;
        };
        for ann in &mut findings.annotations {
            let dx: f64 = rng.gen_range(-MAX_JITTER..=MAX_JITTER);
            let dy: f64 = rng.gen_range(-MAX_JITTER..=MAX_JITTER);
            ann.x = (ann.x + dx).clamp(0.0, 1.0 - ann.width);
            ann.y = (ann.y + dy).clamp(0.0, 1.0 - ann.height);
        }
    }
}

impl Analyzer for ScriptedAnalyzer {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn analyze(
        &mut self,
        files: &[UploadedFile],
        on_stage: &mut dyn FnMut(&Stage),
    ) -> Result<Findings> {
        if files.is_empty() {
            return Err(anyhow!("no files uploaded; nothing to analyze"));
        }
        log::info!(
            "analyzing {} file(s) with preset '{}'",
            files.len(),
            self.preset
        );
        for stage in &STAGES {
            on_stage(stage);
            let delay = stage.scaled_delay(self.delay_scale);
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            log::debug!("stage {:?} reached {}%", stage.kind, stage.progress);
        }
        let mut findings = self.preset.findings();
        self.jitter(&mut findings);
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StageKind;

    fn photo() -> UploadedFile {
        UploadedFile::new("site.jpg", 2048, "image/jpeg")
    }

    #[test]
    fn walks_stages_in_order() {
        let mut analyzer = ScriptedAnalyzer::new(Preset::General);
        let mut seen = Vec::new();
        let findings = analyzer
            .analyze(&[photo()], &mut |stage| seen.push(stage.kind))
            .unwrap();
        assert_eq!(
            seen,
            vec![
                StageKind::Ocr,
                StageKind::Detection,
                StageKind::Segmentation,
                StageKind::Severity,
                StageKind::Report,
            ]
        );
        assert_eq!(findings, Preset::General.findings());
    }

    #[test]
    fn refuses_empty_batch() {
        let mut analyzer = ScriptedAnalyzer::new(Preset::Bridge);
        let mut calls = 0;
        assert!(analyzer.analyze(&[], &mut |_| calls += 1).is_err());
        assert_eq!(calls, 0);
    }

    #[test]
    fn jitter_is_seeded_and_in_bounds() {
        let run = |seed| {
            ScriptedAnalyzer::new(Preset::Electrical)
                .with_jitter_seed(seed)
                .analyze(&[photo()], &mut |_| {})
                .unwrap()
        };
        let a = run(7);
        assert_eq!(a, run(7));
        assert_ne!(a.annotations, Preset::Electrical.findings().annotations);
        for ann in &a.annotations {
            assert!(ann.validate().is_ok());
        }
    }
}
