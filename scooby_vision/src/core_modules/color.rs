// THEORY:
// `HsvColor` is the target the tracker hunts for. It is a plain four-channel
// vector on the full-range HSV scale. Calibration produces one by averaging a
// patch of pixels, and the detector turns it into a pair of inclusive bounds by
// widening each channel by a fixed radius. Hue bounds stop at the ends of the
// byte range instead of wrapping around the wheel; saturation and value bounds
// are left unclamped since every pixel already lies inside 0..=255.

use crate::core_modules::pixel::pixel::Pixel;
use image::Rgba;
use serde::{Deserialize, Serialize};

/// A color on the full-range HSV scale, plus a fourth channel that is carried but unused.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HsvColor {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
    pub fourth: f64,
}

impl HsvColor {
    pub fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue,
            saturation,
            value,
            fourth: 0.0,
        }
    }

    pub fn from_channels(channels: [f64; 4]) -> Self {
        let [hue, saturation, value, fourth] = channels;
        Self {
            hue,
            saturation,
            value,
            fourth,
        }
    }

    pub fn channels(&self) -> [f64; 4] {
        [self.hue, self.saturation, self.value, self.fourth]
    }

    /// Channel-wise arithmetic mean. `None` for an empty slice.
    pub fn mean(colors: &[HsvColor]) -> Option<HsvColor> {
        if colors.is_empty() {
            return None;
        }
        let mut sums = [0.0f64; 4];
        for color in colors {
            for (sum, channel) in sums.iter_mut().zip(color.channels()) {
                *sum += channel;
            }
        }
        let count = colors.len() as f64;
        Some(HsvColor::from_channels(sums.map(|sum| sum / count)))
    }

    /// Opaque RGBA rendering of this color, for display only.
    pub fn to_rgba(&self) -> Rgba<u8> {
        Pixel::from_hsv(self).into()
    }
}

/// Inclusive per-channel range a pixel must fall into to count as the target color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionBounds {
    pub lower: HsvColor,
    pub upper: HsvColor,
}

impl DetectionBounds {
    /// Widens `target` by `radius` on every channel.
    pub fn around(target: &HsvColor, radius: [f64; 4]) -> Self {
        let min_hue = if target.hue >= radius[0] {
            target.hue - radius[0]
        } else {
            0.0
        };
        let max_hue = if target.hue + radius[0] <= 255.0 {
            target.hue + radius[0]
        } else {
            255.0
        };

        Self {
            lower: HsvColor {
                hue: min_hue,
                saturation: target.saturation - radius[1],
                value: target.value - radius[2],
                fourth: 0.0,
            },
            upper: HsvColor {
                hue: max_hue,
                saturation: target.saturation + radius[1],
                value: target.value + radius[2],
                fourth: 255.0,
            },
        }
    }

    pub fn contains(&self, color: &HsvColor) -> bool {
        (self.lower.hue..=self.upper.hue).contains(&color.hue)
            && (self.lower.saturation..=self.upper.saturation).contains(&color.saturation)
            && (self.lower.value..=self.upper.value).contains(&color.value)
    }
}
