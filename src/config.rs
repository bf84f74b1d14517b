use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::overlay::OverlayStyle;
use crate::report::{Color, CostTable, SeverityCost};
use crate::session::DEFAULT_MAX_FILES;

const DEFAULT_STAGE_DELAY_SCALE: f64 = 0.0;

#[derive(Debug, Deserialize, Default)]
struct InfraSightConfigFile {
    max_uploads: Option<usize>,
    stage_delay_scale: Option<f64>,
    overlay: Option<OverlayConfigFile>,
    costs: Option<CostConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct OverlayConfigFile {
    stroke_width: Option<u32>,
    label_padding: Option<u32>,
    font_scale: Option<u32>,
    text_color: Option<Color>,
}

#[derive(Debug, Deserialize, Default)]
struct CostConfigFile {
    high: Option<SeverityCost>,
    medium: Option<SeverityCost>,
    low: Option<SeverityCost>,
}

#[derive(Debug, Clone)]
pub struct InfraSightConfig {
    pub max_uploads: usize,
    /// Multiplier on the analysis stage delays; 1.0 is demo pacing, 0 disables waits.
    pub stage_delay_scale: f64,
    pub overlay: OverlayStyle,
    pub costs: CostTable,
}

impl Default for InfraSightConfig {
    fn default() -> Self {
        Self {
            max_uploads: DEFAULT_MAX_FILES,
            stage_delay_scale: DEFAULT_STAGE_DELAY_SCALE,
            overlay: OverlayStyle::default(),
            costs: CostTable::default(),
        }
    }
}

impl InfraSightConfig {
    /// Defaults, then the file named by `INFRASIGHT_CONFIG`, then env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("INFRASIGHT_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit file, still honoring env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::from_file(read_config_file(path)?);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: InfraSightConfigFile) -> Self {
        let defaults = Self::default();
        let overlay = file.overlay.unwrap_or_default();
        let costs = file.costs.unwrap_or_default();
        Self {
            max_uploads: file.max_uploads.unwrap_or(defaults.max_uploads),
            stage_delay_scale: file
                .stage_delay_scale
                .unwrap_or(defaults.stage_delay_scale),
            overlay: OverlayStyle {
                stroke_width: overlay
                    .stroke_width
                    .unwrap_or(defaults.overlay.stroke_width),
                label_padding: overlay
                    .label_padding
                    .unwrap_or(defaults.overlay.label_padding),
                font_scale: overlay.font_scale.unwrap_or(defaults.overlay.font_scale),
                text_color: overlay.text_color.unwrap_or(defaults.overlay.text_color),
            },
            costs: CostTable {
                high: costs.high.unwrap_or(defaults.costs.high),
                medium: costs.medium.unwrap_or(defaults.costs.medium),
                low: costs.low.unwrap_or(defaults.costs.low),
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("INFRASIGHT_MAX_UPLOADS") {
            self.max_uploads = value
                .trim()
                .parse()
                .map_err(|_| anyhow!("INFRASIGHT_MAX_UPLOADS must be a whole number"))?;
        }
        if let Ok(value) = std::env::var("INFRASIGHT_STAGE_DELAY_SCALE") {
            self.stage_delay_scale = value
                .trim()
                .parse()
                .map_err(|_| anyhow!("INFRASIGHT_STAGE_DELAY_SCALE must be a number"))?;
        }
        if let Ok(value) = std::env::var("INFRASIGHT_STROKE_WIDTH") {
            self.overlay.stroke_width = value
                .trim()
                .parse()
                .map_err(|_| anyhow!("INFRASIGHT_STROKE_WIDTH must be a whole number of pixels"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.max_uploads == 0 {
            return Err(anyhow!("max_uploads must be at least 1"));
        }
        if !self.stage_delay_scale.is_finite() || self.stage_delay_scale < 0.0 {
            return Err(anyhow!("stage_delay_scale must be a non-negative number"));
        }
        if self.overlay.stroke_width == 0 {
            return Err(anyhow!("overlay.stroke_width must be at least 1"));
        }
        if self.overlay.font_scale == 0 {
            return Err(anyhow!("overlay.font_scale must be at least 1"));
        }
        self.costs.validate()
    }
}

fn read_config_file(path: &Path) -> Result<InfraSightConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}
