//! Configuration snapshot consumed by the engine each step.
//!
//! The layout mirrors the nested JSON the control panel produces:
//!
//! ```json
//! {
//!   "grid":    { "spacing": 35, "stiffness": 0.2, "damping": 0.92 },
//!   "gravity": { "strength": 10, "radius": 280 },
//!   "pulsing": { "enabled": false },
//!   "signal":  { "enabled": true, "speed": 15 },
//!   "render":  {
//!     "points": true, "lines": true, "colorScheme": "neon",
//!     "particles": { "baseSize": 1.2, "baseOpacity": 0.4 }
//!   }
//! }
//! ```
//!
//! Optional sub-fields resolve to documented defaults during deserialization,
//! so the engine only ever sees a fully resolved snapshot. Missing required
//! fields and values that cannot drive the simulation are rejected here, at
//! the boundary, by [`SimulationConfig::from_json`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::visuals::{ParticleShape, Theme};

/// Smallest accepted lattice spacing, in pixels.
pub const MIN_SPACING: f32 = 1.0;

/// Lattice geometry and material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    /// Distance between neighbouring points, in pixels.
    pub spacing: f32,
    /// Fraction of the length error corrected per relaxation pass (0-1).
    pub stiffness: f32,
    /// Velocity retained per step (0-1).
    pub damping: f32,
}

/// The cursor's gravity well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GravityConfig {
    /// Positive attracts, negative repels.
    pub strength: f32,
    /// Interaction radius in pixels.
    pub radius: f32,
    /// Irregularity of the radius (0-2). Zero keeps the well circular.
    #[serde(default)]
    pub divergence: f32,
    /// Milliseconds the cursor must rest before the well switches on.
    #[serde(default)]
    pub activation_latency: f32,
}

/// Periodic "breathing" of the well's strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulsingConfig {
    pub enabled: bool,
    /// Frequency multiplier.
    #[serde(default = "default_pulsing_speed")]
    pub speed: f32,
    /// Amplitude as a fraction of the base strength.
    #[serde(default = "default_pulsing_depth")]
    pub depth: f32,
}

/// Finite propagation speed of the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalConfig {
    pub enabled: bool,
    /// Pixels per step.
    #[serde(default = "default_signal_speed")]
    pub speed: f32,
    /// Directional and per-point jitter of the speed (0-1+).
    #[serde(default)]
    pub randomness: f32,
}

/// Draw only elements that are currently moving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionConfig {
    pub enabled: bool,
    /// Minimum per-step speed to be visible.
    #[serde(default = "default_speed_threshold")]
    pub speed_threshold: f32,
    /// Minimum distance from rest (Manhattan) to be visible.
    #[serde(default = "default_displacement_threshold")]
    pub displacement_threshold: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            speed_threshold: default_speed_threshold(),
            displacement_threshold: default_displacement_threshold(),
        }
    }
}

/// Per-point appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleAppearance {
    pub base_size: f32,
    /// 0-1.
    pub base_opacity: f32,
    #[serde(default)]
    pub size_variance: f32,
    #[serde(default)]
    pub opacity_variance: f32,
    #[serde(default)]
    pub shape: ParticleShape,
    /// `#rrggbb` override of the theme colour for points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// What gets drawn and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub points: bool,
    pub lines: bool,
    #[serde(default)]
    pub motion: MotionConfig,
    pub particles: ParticleAppearance,
    pub color_scheme: Theme,
}

/// A complete, immutable-per-step configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub gravity: GravityConfig,
    pub pulsing: PulsingConfig,
    pub signal: SignalConfig,
    pub render: RenderConfig,
}

fn default_pulsing_speed() -> f32 {
    1.0
}

fn default_pulsing_depth() -> f32 {
    0.1
}

fn default_signal_speed() -> f32 {
    15.0
}

fn default_speed_threshold() -> f32 {
    0.5
}

fn default_displacement_threshold() -> f32 {
    0.6
}

impl Default for SimulationConfig {
    /// The demo preset.
    fn default() -> Self {
        Self {
            grid: GridConfig {
                spacing: 35.0,
                stiffness: 0.2,
                damping: 0.92,
            },
            gravity: GravityConfig {
                strength: 10.0,
                radius: 280.0,
                divergence: 0.0,
                activation_latency: 0.0,
            },
            pulsing: PulsingConfig {
                enabled: false,
                speed: 1.0,
                depth: 0.35,
            },
            signal: SignalConfig {
                enabled: false,
                speed: 15.0,
                randomness: 0.0,
            },
            render: RenderConfig {
                points: true,
                lines: true,
                motion: MotionConfig::default(),
                particles: ParticleAppearance {
                    base_size: 1.2,
                    base_opacity: 0.4,
                    size_variance: 0.0,
                    opacity_variance: 0.0,
                    shape: ParticleShape::Circle,
                    color: None,
                },
                color_scheme: Theme::Neon,
            },
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON snapshot from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that every value can drive the simulation without producing
    /// non-finite positions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("grid.stiffness", self.grid.stiffness),
            ("grid.damping", self.grid.damping),
            ("gravity.strength", self.gravity.strength),
            ("gravity.divergence", self.gravity.divergence),
            ("pulsing.speed", self.pulsing.speed),
            ("pulsing.depth", self.pulsing.depth),
            ("signal.randomness", self.signal.randomness),
            ("render.motion.speedThreshold", self.render.motion.speed_threshold),
            (
                "render.motion.displacementThreshold",
                self.render.motion.displacement_threshold,
            ),
            ("render.particles.baseSize", self.render.particles.base_size),
            ("render.particles.baseOpacity", self.render.particles.base_opacity),
            ("render.particles.sizeVariance", self.render.particles.size_variance),
            (
                "render.particles.opacityVariance",
                self.render.particles.opacity_variance,
            ),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a finite number",
                });
            }
        }

        let positive = [
            ("grid.spacing", self.grid.spacing),
            ("signal.speed", self.signal.speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }
        if self.grid.spacing < MIN_SPACING {
            return Err(ConfigError::Invalid {
                field: "grid.spacing",
                reason: "must be at least 1 pixel",
            });
        }

        let non_negative = [
            ("gravity.radius", self.gravity.radius),
            ("gravity.activationLatency", self.gravity.activation_latency),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be zero or a positive number",
                });
            }
        }

        Ok(())
    }

    /// Compare this config with its replacement to determine what the engine
    /// has to do when the swap happens.
    pub fn diff(&self, other: &SimulationConfig) -> ConfigDiff {
        let mut changed = Vec::new();
        if self.grid != other.grid {
            changed.push(ConfigSection::Grid);
        }
        if self.gravity != other.gravity {
            changed.push(ConfigSection::Gravity);
        }
        if self.pulsing != other.pulsing {
            changed.push(ConfigSection::Pulsing);
        }
        if self.signal != other.signal {
            changed.push(ConfigSection::Signal);
        }
        if self.render != other.render {
            changed.push(ConfigSection::Render);
        }

        ConfigDiff {
            needs_regrid: self.grid.spacing != other.grid.spacing,
            changed,
        }
    }
}

/// Top-level configuration groups, used to report what changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Grid,
    Gravity,
    Pulsing,
    Signal,
    Render,
}

/// Result of comparing two [`SimulationConfig`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDiff {
    /// Spacing changed: the lattice must be rebuilt from scratch.
    pub needs_regrid: bool,
    /// Sections whose values differ. Everything except a spacing change is
    /// picked up by the next step without further work.
    pub changed: Vec<ConfigSection>,
}

impl ConfigDiff {
    /// Returns true if no changes are needed.
    pub fn is_empty(&self) -> bool {
        !self.needs_regrid && self.changed.is_empty()
    }

    /// Returns true if the lattice has to be rebuilt.
    pub fn needs_regrid(&self) -> bool {
        self.needs_regrid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "grid":    { "spacing": 35, "stiffness": 0.2, "damping": 0.92 },
        "gravity": { "strength": 10, "radius": 280 },
        "pulsing": { "enabled": true },
        "signal":  { "enabled": true },
        "render":  {
            "points": true, "lines": false, "colorScheme": "matrix",
            "particles": { "baseSize": 1.2, "baseOpacity": 0.4 }
        }
    }"#;

    #[test]
    fn test_partial_snapshot_resolves_defaults() {
        let config = SimulationConfig::from_json(MINIMAL).unwrap();

        assert_eq!(config.gravity.divergence, 0.0);
        assert_eq!(config.gravity.activation_latency, 0.0);
        assert_eq!(config.pulsing.speed, 1.0);
        assert!((config.pulsing.depth - 0.1).abs() < 1e-6);
        assert_eq!(config.signal.speed, 15.0);
        assert_eq!(config.signal.randomness, 0.0);
        assert!(!config.render.motion.enabled);
        assert_eq!(config.render.motion.speed_threshold, 0.5);
        assert_eq!(config.render.motion.displacement_threshold, 0.6);
        assert_eq!(config.render.particles.shape, ParticleShape::Circle);
        assert_eq!(config.render.particles.color, None);
        assert_eq!(config.render.color_scheme, Theme::Matrix);
    }

    #[test]
    fn test_motion_thresholds_default_inside_section() {
        let json = MINIMAL.replace(
            r#""points": true,"#,
            r#""points": true, "motion": { "enabled": true },"#,
        );
        let config = SimulationConfig::from_json(&json).unwrap();
        assert!(config.render.motion.enabled);
        assert_eq!(config.render.motion.speed_threshold, 0.5);
        assert_eq!(config.render.motion.displacement_threshold, 0.6);
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let json = MINIMAL.replace(r#""spacing": 35, "#, "");
        let err = SimulationConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("spacing"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let json = MINIMAL.replace(r#""spacing": 35"#, r#""spacing": 0"#);
        match SimulationConfig::from_json(&json) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "grid.spacing"),
            other => panic!("expected invalid spacing, got {:?}", other),
        }

        let mut config = SimulationConfig::default();
        config.gravity.radius = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.grid.damping = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sub_pixel_spacing_rejected() {
        for spacing in [0.5, 1e-30] {
            let mut config = SimulationConfig::default();
            config.grid.spacing = spacing;
            match config.validate() {
                Err(ConfigError::Invalid { field, reason }) => {
                    assert_eq!(field, "grid.spacing");
                    assert_eq!(reason, "must be at least 1 pixel");
                }
                other => panic!("expected invalid spacing, got {:?}", other),
            }
        }

        let mut config = SimulationConfig::default();
        config.grid.spacing = MIN_SPACING;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_preset_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.spacing, 35.0);
        assert_eq!(config.gravity.radius, 280.0);
    }

    #[test]
    fn test_round_trip_uses_camel_case() {
        let json = serde_json::to_string(&SimulationConfig::default()).unwrap();
        assert!(json.contains("colorScheme"));
        assert!(json.contains("activationLatency"));
        assert!(!json.contains("\"color\""));
        assert_eq!(
            SimulationConfig::from_json(&json).unwrap(),
            SimulationConfig::default()
        );
    }

    #[test]
    fn test_diff_spacing_needs_regrid() {
        let a = SimulationConfig::default();
        let mut b = a.clone();
        assert!(a.diff(&b).is_empty());

        b.grid.stiffness = 0.5;
        let diff = a.diff(&b);
        assert!(!diff.needs_regrid());
        assert_eq!(diff.changed, vec![ConfigSection::Grid]);

        b.grid.spacing = 20.0;
        b.render.lines = false;
        let diff = a.diff(&b);
        assert!(diff.needs_regrid());
        assert_eq!(diff.changed, vec![ConfigSection::Grid, ConfigSection::Render]);
    }
}
