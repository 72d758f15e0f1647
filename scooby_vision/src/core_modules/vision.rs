// THEORY:
// `VisionBackend` is the seam between the tracking logic and whatever actually
// looks at pixels. Calibration and tracking only talk to this trait; the crate's
// own `ColorBlobDetector` is one implementation. Detection is expected to depend
// on (frame, target) alone.

use crate::core_modules::color::HsvColor;
use crate::core_modules::contour::{BlobObservation, Contour};
use crate::core_modules::frame::Frame;
use crate::core_modules::pixel::pixel::Pixel;
use image::{Rgba, RgbaImage};

pub trait VisionBackend {
    /// Converts a batch of pixels to full-range HSV, one color per pixel.
    fn to_hsv(&self, pixels: &[Pixel]) -> Vec<HsvColor> {
        pixels.iter().map(Pixel::to_hsv).collect()
    }

    /// Every region of `frame` matching `target`, largest first.
    fn find_contours(&self, frame: &Frame, target: &HsvColor) -> Vec<Contour>;

    /// Summarizes the largest matching region.
    fn detect_dominant_contour(&self, frame: &Frame, target: &HsvColor) -> Option<BlobObservation> {
        self.find_contours(frame, target)
            .first()
            .map(Contour::observation)
    }

    /// Draws the hue range that `target` will match, at `width × height`.
    fn render_swatch(&self, target: &HsvColor, width: u32, height: u32) -> RgbaImage;

    fn hsv_to_rgba(&self, color: &HsvColor) -> Rgba<u8> {
        color.to_rgba()
    }
}
