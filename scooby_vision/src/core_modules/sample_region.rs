// THEORY:
// A selection is a single point, but a single pixel is a poor color sample: one
// noisy pixel could send the tracker after the wrong hue. The `SampleRegion` grows
// the point into a small patch that reaches `half_extent` pixels up and left of the
// point and up to (but not including) `half_extent` pixels down and right, then
// clips that patch against the frame. Points outside the frame are refused before
// any region exists, so a region is never empty.

use crate::core_modules::pixel::pixel::Pixel;
use crate::error::{TrackingError, TrackingResult};
use image::RgbaImage;

/// A selected point in frame pixel coordinates. Signed so that off-frame input is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionPoint {
    pub x: i64,
    pub y: i64,
}

impl SelectionPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned patch of a frame, `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SampleRegion {
    /// Builds the patch around `point`, or `OutOfBounds` if the point is not inside the frame.
    pub fn around(
        point: SelectionPoint,
        frame_width: u32,
        frame_height: u32,
        half_extent: u32,
    ) -> TrackingResult<Self> {
        let inside = (0..frame_width as i64).contains(&point.x)
            && (0..frame_height as i64).contains(&point.y);
        if !inside {
            return Err(TrackingError::OutOfBounds {
                x: point.x,
                y: point.y,
                width: frame_width,
                height: frame_height,
            });
        }

        let (x, y) = (point.x as u32, point.y as u32);
        let left = x.saturating_sub(half_extent);
        let top = y.saturating_sub(half_extent);
        let right = x.saturating_add(half_extent).min(frame_width);
        let bottom = y.saturating_add(half_extent).min(frame_height);

        // With a zero half-extent the patch still covers the selected pixel.
        Ok(Self {
            x: left,
            y: top,
            width: right.max(x + 1) - left,
            height: bottom.max(y + 1) - top,
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Every pixel of `frame` covered by this region, row by row.
    pub fn pixels(&self, frame: &RgbaImage) -> Vec<Pixel> {
        let mut pixels = Vec::with_capacity(self.pixel_count());
        for row in self.y..self.y + self.height {
            for col in self.x..self.x + self.width {
                pixels.push(Pixel::from(frame.get_pixel(col, row)));
            }
        }
        pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clips_near_the_origin() {
        let region = SampleRegion::around(SelectionPoint::new(1, 1), 100, 100, 4).unwrap();
        assert_eq!(
            region,
            SampleRegion {
                x: 0,
                y: 0,
                width: 5,
                height: 5
            }
        );
    }

    #[test]
    fn interior_point_gets_full_patch() {
        let region = SampleRegion::around(SelectionPoint::new(50, 40), 100, 100, 4).unwrap();
        assert_eq!((region.x, region.y), (46, 36));
        assert_eq!((region.width, region.height), (8, 8));
        assert_eq!(region.pixel_count(), 64);
    }

    #[test]
    fn clips_at_far_edges() {
        let region = SampleRegion::around(SelectionPoint::new(98, 97), 100, 100, 4).unwrap();
        assert_eq!((region.x, region.y), (94, 93));
        assert_eq!((region.width, region.height), (6, 7));
    }

    #[test]
    fn last_pixel_is_never_empty() {
        let region = SampleRegion::around(SelectionPoint::new(99, 99), 100, 100, 4).unwrap();
        assert_eq!(region.x + region.width, 100);
        assert!(region.pixel_count() > 0);
    }

    #[test]
    fn rejects_points_off_the_frame() {
        for point in [
            SelectionPoint::new(-1, 5),
            SelectionPoint::new(5, -3),
            SelectionPoint::new(100, 5),
            SelectionPoint::new(5, 100),
        ] {
            assert!(matches!(
                SampleRegion::around(point, 100, 100, 4),
                Err(TrackingError::OutOfBounds { .. })
            ));
        }
    }

    #[test]
    fn pixels_reads_region_in_row_order() {
        let frame = RgbaImage::from_fn(4, 4, |x, y| image::Rgba([x as u8, y as u8, 0, 255]));
        let region = SampleRegion {
            x: 1,
            y: 2,
            width: 2,
            height: 1,
        };
        let pixels = region.pixels(&frame);
        assert_eq!(pixels.len(), 2);
        assert_eq!((pixels[0].red, pixels[0].green), (1, 2));
        assert_eq!((pixels[1].red, pixels[1].green), (2, 2));
    }
}
