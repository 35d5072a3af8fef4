use super::types::{ColorName, HsiColor, RgbColor};
use crate::error::ColorError;

/// Standalone conversion for callers holding unchecked integers.
pub fn rgb_to_hsi(r: i64, g: i64, b: i64) -> Result<HsiColor, ColorError> {
    RgbColor::try_from_components(r, g, b).map(HsiColor::from)
}

pub fn color_name(hue: f64) -> ColorName {
    ColorName::from_hue(hue)
}

impl From<RgbColor> for HsiColor {
    // HSL arithmetic, kept as-is so existing fixtures stay bit-compatible.
    fn from(rgb: RgbColor) -> Self {
        let r = rgb.r as f64 / 255.0;
        let g = rgb.g as f64 / 255.0;
        let b = rgb.b as f64 / 255.0;

        let mx = r.max(g).max(b);
        let mn = r.min(g).min(b);
        let l = (mx + mn) / 2.0;

        if mx == mn {
            return HsiColor { h: 0.0, s: 0.0, i: l };
        }

        let d = mx - mn;
        let s = if l > 0.5 {
            d / (2.0 - mx - mn)
        } else {
            d / (mx + mn)
        };

        let h = if mx == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if mx == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        HsiColor {
            h: h / 6.0 * 360.0,
            s,
            i: l,
        }
    }
}
