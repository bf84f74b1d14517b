use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageKind {
    Ocr,
    Detection,
    Segmentation,
    Severity,
    Report,
}

/// One step of the analysis script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stage {
    pub kind: StageKind,
    /// Progress reached when the stage completes, in percent.
    pub progress: u8,
    pub message: &'static str,
    pub delay: Duration,
}

pub const STAGES: [Stage; 5] = [
    Stage {
        kind: StageKind::Ocr,
        progress: 20,
        message: "Extracting text and labels (OCR)...",
        delay: Duration::from_millis(1000),
    },
    Stage {
        kind: StageKind::Detection,
        progress: 40,
        message: "Detecting defects and components...",
        delay: Duration::from_millis(1500),
    },
    Stage {
        kind: StageKind::Segmentation,
        progress: 60,
        message: "Segmenting areas of interest...",
        delay: Duration::from_millis(1200),
    },
    Stage {
        kind: StageKind::Severity,
        progress: 80,
        message: "Analyzing severity and priority...",
        delay: Duration::from_millis(1000),
    },
    Stage {
        kind: StageKind::Report,
        progress: 100,
        message: "Generating report...",
        delay: Duration::from_millis(800),
    },
];

impl Stage {
    /// Stage delay multiplied by `factor`; non-positive factors disable the wait.
    pub fn scaled_delay(&self, factor: f64) -> Duration {
        if !(factor.is_finite() && factor > 0.0) {
            return Duration::ZERO;
        }
        self.delay.mul_f64(factor)
    }
}
