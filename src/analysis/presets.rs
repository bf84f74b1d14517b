use std::str::FromStr;

use super::Findings;
use crate::report::{Annotation, Color, Defect, Severity};
use crate::ValidationError;

const HIGH_COLOR: Color = Color::rgb(0xff, 0x6b, 0x6b);
const MEDIUM_COLOR: Color = Color::rgb(0xff, 0xa7, 0x26);
const LOW_COLOR: Color = Color::rgb(0x66, 0xbb, 0x6a);

/// Overlay slots, in order of the preset's defects.
const SLOTS: [(f64, f64, f64, f64); 3] = [
    (0.3, 0.2, 0.15, 0.08),
    (0.6, 0.4, 0.12, 0.06),
    (0.7, 0.7, 0.08, 0.05),
];

/// Canned inspection contexts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    General,
    Bridge,
    Electrical,
    Hvac,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::General,
        Preset::Bridge,
        Preset::Electrical,
        Preset::Hvac,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::General => "general",
            Preset::Bridge => "bridge",
            Preset::Electrical => "electrical",
            Preset::Hvac => "hvac",
        }
    }

    pub fn findings(self) -> Findings {
        match self {
            Preset::General => build(
                &[
                    (
                        "Structural Crack",
                        Severity::High,
                        "Vertical crack detected in concrete surface, approximately 15cm length",
                        "Grid: A-3, Coordinates: (245, 156)",
                        0.94,
                        "Crack",
                    ),
                    (
                        "Corrosion",
                        Severity::Medium,
                        "Surface rust on metal fasteners, affecting 3 bolt heads",
                        "Grid: B-2, Coordinates: (189, 298)",
                        0.87,
                        "Corrosion",
                    ),
                    (
                        "Missing Component",
                        Severity::Low,
                        "Protective cap missing from electrical junction",
                        "Grid: C-1, Coordinates: (334, 78)",
                        0.92,
                        "Missing",
                    ),
                ],
                &[
                    "Asset ID: INF-2024-0847",
                    "Installation Date: 03/15/2019",
                    "Last Inspection: 11/22/2023",
                    "Voltage Rating: 480V",
                    "Manufacturer: TechCorp Industries",
                ],
            ),
            Preset::Bridge => build(
                &[
                    (
                        "Concrete Spalling",
                        Severity::High,
                        "Concrete deterioration on support beam",
                        "Span 2, South Support",
                        0.91,
                        "Spalling",
                    ),
                    (
                        "Rebar Exposure",
                        Severity::Medium,
                        "Steel reinforcement visible through concrete",
                        "Deck Section A-4",
                        0.88,
                        "Rebar",
                    ),
                    (
                        "Expansion Joint Damage",
                        Severity::Medium,
                        "Rubber seal torn, debris accumulation",
                        "North Approach",
                        0.83,
                        "Joint",
                    ),
                ],
                &[
                    "Bridge ID: BR-2024-847",
                    "Load Rating: HS-20",
                    "Last Inspection: 2023-11-15",
                ],
            ),
            Preset::Electrical => build(
                &[
                    (
                        "Insulation Damage",
                        Severity::High,
                        "Wire insulation cracking, potential short risk",
                        "Panel B, Circuit 12",
                        0.93,
                        "Insulation",
                    ),
                    (
                        "Corrosion",
                        Severity::Medium,
                        "Surface rust on junction box",
                        "Exterior Mount Point 3",
                        0.86,
                        "Corrosion",
                    ),
                    (
                        "Missing Cover",
                        Severity::Low,
                        "Protective cover missing from outlet",
                        "East Wall, 4ft height",
                        0.9,
                        "Cover",
                    ),
                ],
                &[
                    "Voltage: 480V/277V",
                    "Panel ID: EP-2024-156",
                    "Installation: 2019-03-15",
                ],
            ),
            Preset::Hvac => build(
                &[
                    (
                        "Filter Blockage",
                        Severity::Medium,
                        "Air filter 85% blocked, reduced airflow",
                        "Unit 3, Return Plenum",
                        0.89,
                        "Filter",
                    ),
                    (
                        "Refrigerant Leak",
                        Severity::High,
                        "Oil stains indicate refrigerant leak",
                        "Condenser Coil Connection",
                        0.82,
                        "Leak",
                    ),
                    (
                        "Belt Wear",
                        Severity::Low,
                        "Fan belt showing wear, replacement recommended",
                        "Blower Assembly",
                        0.85,
                        "Belt",
                    ),
                ],
                &[
                    "Unit ID: HVAC-2024-089",
                    "Model: TR-5000X",
                    "Service Date: 2024-01-10",
                ],
            ),
        }
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ValidationError::new(
                    "UNKNOWN_PRESET",
                    format!("preset '{}' is not one of general, bridge, electrical, hvac", s),
                )
            })
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::High => HIGH_COLOR,
        Severity::Medium => MEDIUM_COLOR,
        Severity::Low => LOW_COLOR,
    }
}

type Row = (
    &'static str,
    Severity,
    &'static str,
    &'static str,
    f64,
    &'static str,
);

fn build(rows: &[Row], ocr: &[&str]) -> Findings {
    let mut findings = Findings {
        ocr: ocr.iter().map(|s| s.to_string()).collect(),
        ..Findings::default()
    };
    for (&(kind, severity, description, location, confidence, label), &(x, y, w, h)) in
        rows.iter().zip(SLOTS.iter())
    {
        findings
            .defects
            .push(Defect::new(kind, severity, description, location, confidence));
        findings.annotations.push(Annotation::new(
            x,
            y,
            w,
            h,
            severity_color(severity),
            label,
        ));
    }
    findings
}
