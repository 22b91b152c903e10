use palette::{Srgb, Srgba};
use plotters::style::{RGBAColor, RGBColor};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Gray levels
// ---------------------------------------------------------------------------

/// A gray shade given as a level in `[0, 1]`: 0 is black, 1 is white.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gray(pub f32);

impl Gray {
    pub const BLACK: Gray = Gray(0.0);
    pub const WHITE: Gray = Gray(1.0);

    /// Opaque 8-bit colour for plotters.
    pub fn rgb(self) -> RGBColor {
        let level = self.0.clamp(0.0, 1.0);
        let rgb: Srgb<u8> = Srgb::new(level, level, level).into_format();
        RGBColor(rgb.red, rgb.green, rgb.blue)
    }

    /// Colour with the given opacity.
    pub fn with_alpha(self, alpha: f32) -> RGBAColor {
        let level = self.0.clamp(0.0, 1.0);
        let rgba: Srgba<u8> = Srgba::new(level, level, level, alpha.clamp(0.0, 1.0)).into_format();
        RGBAColor(rgba.red, rgba.green, rgba.blue, f64::from(rgba.alpha) / 255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_to_rounded_channels() {
        assert_eq!(Gray::BLACK.rgb(), RGBColor(0, 0, 0));
        assert_eq!(Gray::WHITE.rgb(), RGBColor(255, 255, 255));
        assert_eq!(Gray(0.5).rgb(), RGBColor(128, 128, 128));
        assert_eq!(Gray(0.8).rgb(), RGBColor(204, 204, 204));
    }

    #[test]
    fn out_of_range_levels_are_clamped() {
        assert_eq!(Gray(1.7).rgb(), Gray::WHITE.rgb());
        assert_eq!(Gray(-0.2).rgb(), Gray::BLACK.rgb());
    }

    #[test]
    fn alpha_is_carried_through() {
        let RGBAColor(r, g, b, a) = Gray::BLACK.with_alpha(0.25);
        assert_eq!((r, g, b), (0, 0, 0));
        assert!((a - 0.25).abs() < 0.01);
    }
}
