//! Colour grading parameters and presets

use serde::{Deserialize, Serialize};

pub const BRIGHTNESS_RANGE: (f64, f64) = (-1.0, 1.0);
pub const CONTRAST_RANGE: (f64, f64) = (0.0, 2.0);
pub const SATURATION_RANGE: (f64, f64) = (0.0, 2.0);
pub const WARMTH_RANGE: (f64, f64) = (-1.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPreset {
    #[default]
    None,
    Cinematic,
    Vibrant,
    Vintage,
    Noir,
    Pastel,
}

impl ColorPreset {
    pub const ALL: [ColorPreset; 6] = [
        ColorPreset::None,
        ColorPreset::Cinematic,
        ColorPreset::Vibrant,
        ColorPreset::Vintage,
        ColorPreset::Noir,
        ColorPreset::Pastel,
    ];

    /// Parse a preset name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" => Some(ColorPreset::None),
            "cinematic" => Some(ColorPreset::Cinematic),
            "vibrant" => Some(ColorPreset::Vibrant),
            "vintage" => Some(ColorPreset::Vintage),
            "noir" => Some(ColorPreset::Noir),
            "pastel" => Some(ColorPreset::Pastel),
            _ => None,
        }
    }

    /// Parameter bundle as (brightness, contrast, saturation, warmth)
    ///
    /// `None` has no bundle; the grading's own values apply.
    pub fn bundle(&self) -> Option<(f64, f64, f64, f64)> {
        match self {
            ColorPreset::None => None,
            ColorPreset::Cinematic => Some((-0.05, 1.2, 0.85, 0.1)),
            ColorPreset::Vibrant => Some((0.05, 1.1, 1.5, 0.05)),
            ColorPreset::Vintage => Some((0.0, 0.9, 0.7, 0.4)),
            ColorPreset::Noir => Some((-0.1, 1.4, 0.0, 0.0)),
            ColorPreset::Pastel => Some((0.15, 0.8, 0.6, 0.1)),
        }
    }
}

/// Global colour grading applied to the whole video
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorGrading {
    /// -1.0 to 1.0
    pub brightness: f64,
    /// 0.0 to 2.0
    pub contrast: f64,
    /// 0.0 to 2.0
    pub saturation: f64,
    /// -1.0 to 1.0
    pub warmth: f64,
    pub preset: ColorPreset,
}

impl Default for ColorGrading {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            warmth: 0.0,
            preset: ColorPreset::None,
        }
    }
}

fn clamp_to(value: f64, (lo, hi): (f64, f64), neutral: f64) -> f64 {
    if value.is_nan() {
        neutral
    } else {
        value.clamp(lo, hi)
    }
}

impl ColorGrading {
    pub fn from_preset(preset: ColorPreset) -> Self {
        Self {
            preset,
            ..Default::default()
        }
        .resolved()
    }

    /// Copy with every numeric field forced into its bound (NaN → neutral)
    pub fn clamped(&self) -> Self {
        Self {
            brightness: clamp_to(self.brightness, BRIGHTNESS_RANGE, 0.0),
            contrast: clamp_to(self.contrast, CONTRAST_RANGE, 1.0),
            saturation: clamp_to(self.saturation, SATURATION_RANGE, 1.0),
            warmth: clamp_to(self.warmth, WARMTH_RANGE, 0.0),
            preset: self.preset,
        }
    }

    /// Effective grading: preset bundle overrides the numeric fields
    pub fn resolved(&self) -> Self {
        match self.preset.bundle() {
            Some((brightness, contrast, saturation, warmth)) => Self {
                brightness,
                contrast,
                saturation,
                warmth,
                preset: self.preset,
            },
            None => self.clamped(),
        }
    }
}
