// THEORY (single-pixel color math):
// The `Pixel` module is the smallest unit of the tracker. It holds one RGBA pixel
// and knows how to express itself on the full-range 8-bit HSV scale, where hue
// uses the whole 0..=255 byte for the 360° wheel instead of the half-range 0..=179.
// Matching in HSV separates "which color" (hue, saturation) from "how lit" (value).
//
// Scope:
// - RGBA → HSV (full range) for a single pixel. No neighbors, no history.
// - HSV → RGBA for a single color, used only for display.
// Anything spatial (regions, masks, contours) lives in higher modules.

pub mod pixel {
    use crate::core_modules::color::HsvColor;
    use image::Rgba;

    pub type Channel = u8;
    pub type Hue = f64;
    pub type Saturation = f64;
    pub type Value = f64;

    /// Full-range hue steps per turn of the color wheel.
    pub const HUE_STEPS: f64 = 256.0;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Self {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// HSV value: the brightest channel.
        pub fn value(&self) -> Value {
            self.red.max(self.green).max(self.blue) as Value
        }

        /// HSV saturation scaled to 0..=255; zero for black.
        pub fn saturation(&self) -> Saturation {
            let max = self.value();
            if max == 0.0 {
                return 0.0;
            }
            let min = self.red.min(self.green).min(self.blue) as f64;
            ((max - min) * 255.0 / max).round()
        }

        /// Hue on the full 0..=255 scale. Grays have hue 0.
        pub fn hue(&self) -> Hue {
            let (r, g, b) = (self.red as f64, self.green as f64, self.blue as f64);
            let max = r.max(g).max(b);
            let chroma = max - r.min(g).min(b);
            if chroma == 0.0 {
                return 0.0;
            }

            let mut degrees = if max == r {
                60.0 * (g - b) / chroma
            } else if max == g {
                120.0 + 60.0 * (b - r) / chroma
            } else {
                240.0 + 60.0 * (r - g) / chroma
            };
            if degrees < 0.0 {
                degrees += 360.0;
            }
            (degrees * HUE_STEPS / 360.0).round().min(255.0)
        }

        /// Full-range HSV of this pixel. The fourth channel is always zero.
        pub fn to_hsv(&self) -> HsvColor {
            HsvColor::new(self.hue(), self.saturation(), self.value())
        }

        /// Inverse of `to_hsv` for a single color, rounding each channel to a byte.
        pub fn from_hsv(color: &HsvColor) -> Self {
            let h = color.hue.clamp(0.0, 255.0) * 6.0 / HUE_STEPS;
            let s = color.saturation.clamp(0.0, 255.0) / 255.0;
            let v = color.value.clamp(0.0, 255.0) / 255.0;

            let sector = h.floor();
            let f = h - sector;
            let p = v * (1.0 - s);
            let q = v * (1.0 - s * f);
            let t = v * (1.0 - s * (1.0 - f));

            let (r, g, b) = match sector as u32 % 6 {
                0 => (v, t, p),
                1 => (q, v, p),
                2 => (p, v, t),
                3 => (p, q, v),
                4 => (t, p, v),
                _ => (v, p, q),
            };

            let to_byte = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as Channel;
            Pixel::new(to_byte(r), to_byte(g), to_byte(b), 255)
        }
    }

    impl From<Rgba<u8>> for Pixel {
        fn from(rgba: Rgba<u8>) -> Self {
            let [red, green, blue, alpha] = rgba.0;
            Pixel::new(red, green, blue, alpha)
        }
    }

    impl From<&Rgba<u8>> for Pixel {
        fn from(rgba: &Rgba<u8>) -> Self {
            Pixel::from(*rgba)
        }
    }

    impl From<Pixel> for Rgba<u8> {
        fn from(pixel: Pixel) -> Self {
            Rgba([pixel.red, pixel.green, pixel.blue, pixel.alpha])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;
    use crate::core_modules::color::HsvColor;

    #[test]
    fn primaries_land_on_expected_hues() {
        assert_eq!(Pixel::new(255, 0, 0, 255).hue(), 0.0);
        // 120° and 240° on a 256-step wheel.
        assert_eq!(Pixel::new(0, 255, 0, 255).hue(), 85.0);
        assert_eq!(Pixel::new(0, 0, 255, 255).hue(), 171.0);
    }

    #[test]
    fn gray_has_no_hue_or_saturation() {
        let hsv = Pixel::new(128, 128, 128, 255).to_hsv();
        assert_eq!(hsv, HsvColor::new(0.0, 0.0, 128.0));
    }

    #[test]
    fn black_has_zero_saturation() {
        assert_eq!(Pixel::new(0, 0, 0, 255).saturation(), 0.0);
    }

    #[test]
    fn round_trip_is_exact_on_sector_edges() {
        for pixel in [
            Pixel::new(255, 0, 0, 255),
            Pixel::new(255, 255, 255, 255),
            Pixel::new(0, 0, 0, 255),
        ] {
            assert_eq!(Pixel::from_hsv(&pixel.to_hsv()), pixel);
        }
    }

    #[test]
    fn round_trip_stays_within_hue_quantization() {
        // 120° is not a whole step on the 256-step wheel.
        let back = Pixel::from_hsv(&Pixel::new(0, 255, 0, 255).to_hsv());
        assert!(back.red <= 3);
        assert_eq!(back.green, 255);
        assert_eq!(back.blue, 0);
    }
}
