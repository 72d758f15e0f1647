// THEORY:
// Calibration answers "what color am I tracking?". The user points at the object;
// the `ColorCalibrator` samples the patch around that point, converts it to HSV
// and averages it channel by channel. The mean becomes the target color. Alongside
// it the calibrator asks the backend for two display artifacts: the selected color
// as RGBA and a swatch of the hue range the detector will accept. Neither artifact
// feeds back into tracking.
//
// A rejected selection has no side effects. Building the `Calibration` value is the
// only thing this module does; installing it is the session's job.

use crate::config::TrackingConfig;
use crate::core_modules::color::HsvColor;
use crate::core_modules::frame::Frame;
use crate::core_modules::sample_region::{SampleRegion, SelectionPoint};
use crate::core_modules::vision::VisionBackend;
use crate::error::{TrackingError, TrackingResult};
use image::{Rgba, RgbaImage};

/// Result of a successful selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub target: HsvColor,
    /// The target rendered back to RGBA, for display.
    pub display_color: Rgba<u8>,
    /// Picture of the accepted hue range, for display.
    pub swatch: RgbaImage,
    pub region: SampleRegion,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCalibrator {
    half_extent: u32,
    swatch_width: u32,
    swatch_height: u32,
}

impl Default for ColorCalibrator {
    fn default() -> Self {
        Self::new(&TrackingConfig::default())
    }
}

impl ColorCalibrator {
    pub fn new(config: &TrackingConfig) -> Self {
        Self {
            half_extent: config.sample_half_extent,
            swatch_width: config.swatch_width,
            swatch_height: config.swatch_height,
        }
    }

    pub fn calibrate<V: VisionBackend + ?Sized>(
        &self,
        backend: &V,
        frame: &Frame,
        point: SelectionPoint,
    ) -> TrackingResult<Calibration> {
        let region = SampleRegion::around(point, frame.width(), frame.height(), self.half_extent)?;
        let hsv = backend.to_hsv(&region.pixels(frame));
        // `around` never builds an empty region, so this only trips on a misbehaving backend.
        let target = HsvColor::mean(&hsv).ok_or(TrackingError::OutOfBounds {
            x: point.x,
            y: point.y,
            width: frame.width(),
            height: frame.height(),
        })?;

        Ok(Calibration {
            target,
            display_color: backend.hsv_to_rgba(&target),
            swatch: backend.render_swatch(&target, self.swatch_width, self.swatch_height),
            region,
        })
    }
}
