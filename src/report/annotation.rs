use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ValidationError;

/// Slack for float addition when checking `x + width <= 1`.
const BOUNDS_EPSILON: f64 = 1e-9;

/// RGBA display color. Serialized as `#rrggbb` (or `#rrggbbaa` when not opaque).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_hex(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ValidationError::new("INVALID_COLOR", format!("'{}' is not #rrggbb", s));
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 0xff },
        })
    }
}

impl TryFrom<String> for Color {
    type Error = ValidationError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One overlay region, in fractions of the image size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
    pub label: String,
}

impl Annotation {
    pub fn new(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        label: impl Into<String>,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color,
            label: label.into(),
        }
    }

    /// Rejects geometry outside the unit square. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::new(
                    "ANNOTATION_OUT_OF_RANGE",
                    format!(
                        "annotation '{}': {} = {} is outside [0, 1]",
                        self.label, name, value
                    ),
                )
                .into());
            }
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ValidationError::new(
                "ANNOTATION_EMPTY",
                format!("annotation '{}' has zero area", self.label),
            )
            .into());
        }
        if self.x + self.width > 1.0 + BOUNDS_EPSILON || self.y + self.height > 1.0 + BOUNDS_EPSILON
        {
            return Err(ValidationError::new(
                "ANNOTATION_OUT_OF_BOUNDS",
                format!(
                    "annotation '{}' extends past the image edge (x+w = {}, y+h = {})",
                    self.label,
                    self.x + self.width,
                    self.y + self.height
                ),
            )
            .into());
        }
        Ok(())
    }
}
