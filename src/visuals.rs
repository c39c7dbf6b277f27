//! Colours, themes and particle shapes.
//!
//! This module holds the appearance vocabulary of the fabric, separate from
//! the physics that moves it. The render pass resolves a single base colour
//! per frame from the active [`Theme`], optionally overridden by a custom hex
//! colour, and draws every lattice point with the configured [`ParticleShape`].
//!
//! # Usage
//!
//! ```ignore
//! let base = resolve_color(Some("#ff00aa"), Theme::Neon);
//! assert_eq!(base, Rgb::new(255, 0, 170));
//!
//! // Unparsable overrides silently fall back to the theme.
//! let base = resolve_color(Some("notacolor"), Theme::Matrix);
//! assert_eq!(base, Theme::Matrix.rgb());
//! ```

use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an opacity, clamped to `[0, 1]`.
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            rgb: self,
            alpha: if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) },
        }
    }

    /// Normalised `[r, g, b]` in `0.0..=1.0`.
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// An RGB colour with straight (non-premultiplied) opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    /// Normalised `[r, g, b, a]`, the layout the GPU vertices use.
    pub fn to_f32(self) -> [f32; 4] {
        let [r, g, b] = self.rgb.to_f32();
        [r, g, b, self.alpha]
    }
}

/// Predefined colour schemes.
///
/// Links are always drawn in the theme colour; points use it unless a custom
/// colour override parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Cyan glow (default).
    #[default]
    Neon,
    /// Terminal green.
    Matrix,
    /// Warm orange.
    Sunset,
}

impl Theme {
    /// The palette entry for this scheme.
    pub const fn rgb(self) -> Rgb {
        match self {
            Theme::Neon => Rgb::new(0, 255, 242),
            Theme::Matrix => Rgb::new(0, 255, 70),
            Theme::Sunset => Rgb::new(255, 100, 50),
        }
    }
}

/// Particle shape for rendering.
///
/// Purely cosmetic; the shape has no influence on the physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    /// Filled circle of radius `size` (default).
    #[default]
    Circle,
    /// Ellipse squashed vertically to 60% of its width.
    Oval,
    /// Axis-aligned square with half-extent `size`.
    Square,
    /// The square rotated by 45 degrees.
    Diamond,
    /// Four-pointed star made of quadratic curves.
    Star,
}

/// Parse a `#rrggbb` (or `rrggbb`) colour, case-insensitively.
///
/// Returns `None` for anything that is not exactly six hex digits after the
/// optional leading `#`.
pub fn parse_hex_color(value: &str) -> Option<Rgb> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Resolve the point colour for a frame: the custom override when it parses,
/// the theme colour otherwise. Never fails.
pub fn resolve_color(custom: Option<&str>, theme: Theme) -> Rgb {
    custom.and_then(parse_hex_color).unwrap_or_else(|| theme.rgb())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_palette() {
        assert_eq!(Theme::Neon.rgb(), Rgb::new(0, 255, 242));
        assert_eq!(Theme::Matrix.rgb(), Rgb::new(0, 255, 70));
        assert_eq!(Theme::Sunset.rgb(), Rgb::new(255, 100, 50));
        assert_eq!(Theme::default(), Theme::Neon);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff00aa"), Some(Rgb::new(255, 0, 170)));
        assert_eq!(parse_hex_color("FF00AA"), Some(Rgb::new(255, 0, 170)));
        assert_eq!(parse_hex_color("#00fFf2"), Some(Rgb::new(0, 255, 242)));
    }

    #[test]
    fn test_parse_hex_color_rejects_malformed() {
        assert_eq!(parse_hex_color("notacolor"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#ff00aa00"), None);
        assert_eq!(parse_hex_color("##ff00aa"), None);
        assert_eq!(parse_hex_color("#gg00aa"), None);
        assert_eq!(parse_hex_color(""), None);
        // Multi-byte input must not panic on slicing.
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_resolve_color_fallback() {
        assert_eq!(
            resolve_color(Some("#ff00aa"), Theme::Sunset),
            Rgb::new(255, 0, 170)
        );
        assert_eq!(resolve_color(Some("notacolor"), Theme::Matrix), Theme::Matrix.rgb());
        assert_eq!(resolve_color(None, Theme::Sunset), Theme::Sunset.rgb());
    }

    #[test]
    fn test_with_alpha_clamps() {
        let c = Rgb::new(1, 2, 3);
        assert_eq!(c.with_alpha(1.7).alpha, 1.0);
        assert_eq!(c.with_alpha(-0.3).alpha, 0.0);
        assert_eq!(c.with_alpha(f32::NAN).alpha, 0.0);
        assert!((c.with_alpha(0.4).alpha - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_shape_serde_names() {
        let shape: ParticleShape = serde_json::from_str("\"diamond\"").unwrap();
        assert_eq!(shape, ParticleShape::Diamond);
        let theme: Theme = serde_json::from_str("\"sunset\"").unwrap();
        assert_eq!(theme, Theme::Sunset);
        assert!(serde_json::from_str::<ParticleShape>("\"hexagon\"").is_err());
    }
}
