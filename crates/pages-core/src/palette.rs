//! Colour Palette
//!
//! Three CSS colours per page. Either set per channel or generated as a
//! complementary triple from one random hue:
//!
//! ```text
//! primary   = hsl(H,            70%, 50%)
//! secondary = hsl(H + 30  mod 360, 60%, 30%)
//! accent    = hsl(H + 180 mod 360, 80%, 60%)
//! ```
//!
//! Generated colours are stored as `#rrggbb`.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which colour channel to set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChannel {
    Primary,
    Secondary,
    Accent,
}

/// How the author picks colours
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteMode {
    #[default]
    Manual,
    Auto,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            primary: "#3B82F6".into(),
            secondary: "#1E3A8A".into(),
            accent: "#EF4444".into(),
        }
    }
}

impl ColorPalette {
    /// Complementary triple from a random hue in `[0, 360)`
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_hue(rng.random_range(0..360))
    }

    /// Complementary triple from a fixed hue
    pub fn from_hue(hue: u16) -> Self {
        let hue = hue % 360;
        Self {
            primary: hsl_to_hex(hue, 70, 50),
            secondary: hsl_to_hex((hue + 30) % 360, 60, 30),
            accent: hsl_to_hex((hue + 180) % 360, 80, 60),
        }
    }

    pub fn set(&mut self, channel: ColorChannel, value: impl Into<String>) {
        let value = value.into();
        match channel {
            ColorChannel::Primary => self.primary = value,
            ColorChannel::Secondary => self.secondary = value,
            ColorChannel::Accent => self.accent = value,
        }
    }

    pub fn get(&self, channel: ColorChannel) -> &str {
        match channel {
            ColorChannel::Primary => &self.primary,
            ColorChannel::Secondary => &self.secondary,
            ColorChannel::Accent => &self.accent,
        }
    }
}

/// Convert HSL (degrees, percent, percent) to `#rrggbb`
pub fn hsl_to_hex(h: u16, s: u8, l: u8) -> String {
    let h = f64::from(h);
    let l = f64::from(l.min(100)) / 100.0;
    let a = f64::from(s.min(100)) * l.min(1.0 - l) / 100.0;

    let channel = |n: f64| -> u8 {
        let k = (n + h / 30.0) % 12.0;
        let color = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        // color is within [0, 1] so the cast cannot truncate
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let byte = (255.0 * color).round().clamp(0.0, 255.0) as u8;
        byte
    };

    format!("#{:02x}{:02x}{:02x}", channel(0.0), channel(8.0), channel(4.0))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_hex(0, 100, 50), "#ff0000");
        assert_eq!(hsl_to_hex(120, 100, 50), "#00ff00");
        assert_eq!(hsl_to_hex(240, 100, 50), "#0000ff");
        assert_eq!(hsl_to_hex(0, 0, 100), "#ffffff");
        assert_eq!(hsl_to_hex(0, 0, 0), "#000000");
    }

    #[test]
    fn test_from_hue_builds_complementary_triple() {
        let palette = ColorPalette::from_hue(0);
        assert_eq!(palette.primary, hsl_to_hex(0, 70, 50));
        assert_eq!(palette.secondary, hsl_to_hex(30, 60, 30));
        assert_eq!(palette.accent, hsl_to_hex(180, 80, 60));
        assert_eq!(ColorPalette::from_hue(350).secondary, hsl_to_hex(20, 60, 30));
    }

    #[test]
    fn test_generate_is_hex() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let palette = ColorPalette::generate(&mut rng);
            for color in [&palette.primary, &palette.secondary, &palette.accent] {
                assert_eq!(color.len(), 7);
                assert!(color.starts_with('#'));
                assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
            }
        }
    }

    #[test]
    fn test_manual_channel_set() {
        let mut palette = ColorPalette::default();
        palette.set(ColorChannel::Accent, "#123456");
        assert_eq!(palette.get(ColorChannel::Accent), "#123456");
        assert_eq!(palette.primary, "#3B82F6");
    }
}
