//! Game settings and preferences
//!
//! Loaded from JSON; every field is optional and falls back to its default.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Smallest canvas that still fits one brick column and the paddle
pub const MIN_CANVAS_WIDTH: f32 = 160.0;
pub const MIN_CANVAS_HEIGHT: f32 = 200.0;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },

    #[error("unknown quality preset: {0}")]
    UnknownPreset(String),
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Whether ball trails are drawn
    pub fn trails_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

impl FromStr for QualityPreset {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            _ => Err(SettingsError::UnknownPreset(s.to_string())),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical drawing surface size
    pub canvas_width: f32,
    pub canvas_height: f32,

    /// RNG seed; a fresh one is drawn per session when absent
    pub seed: Option<u64>,

    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Particle effects (brick hits, level clear)
    pub particles: bool,
    /// Ball trails
    pub trails: bool,

    // === Accessibility ===
    /// Reduced motion (no confetti, static menu)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            seed: None,
            quality: QualityPreset::Medium,
            particles: true,
            trails: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Settings with a fixed seed, for reproducible sessions
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings for a command-line run: an optional JSON file (`-` for
    /// defaults) and an optional preset name that overrides its quality
    pub fn from_args(path: Option<&str>, quality: Option<&str>) -> Result<Self, SettingsError> {
        let preset = quality.map(str::parse::<QualityPreset>).transpose()?;
        let mut settings = match path {
            Some(path) if path != "-" => Self::load(path)?,
            _ => Self::from_preset(preset.unwrap_or_default()),
        };
        if let Some(preset) = preset {
            settings.quality = preset;
        }
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject canvases the level generator and paddle cannot fit into
    pub fn validate(&self) -> Result<(), SettingsError> {
        let (width, height) = (self.canvas_width, self.canvas_height);
        if !width.is_finite()
            || !height.is_finite()
            || width < MIN_CANVAS_WIDTH
            || height < MIN_CANVAS_HEIGHT
        {
            log::warn!("Rejected canvas size {}x{}", width, height);
            return Err(SettingsError::InvalidCanvas { width, height });
        }
        Ok(())
    }

    /// Seed for a new session
    pub fn session_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective trails (respects quality preset)
    pub fn effective_trails(&self) -> bool {
        self.trails && self.quality.trails_enabled()
    }

    /// Level-clear confetti (respects reduced_motion)
    pub fn celebration_enabled(&self) -> bool {
        !self.reduced_motion
    }
}
