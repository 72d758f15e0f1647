// THEORY:
// The `ColorBlobDetector` is the crate's own `VisionBackend`. It finds regions of
// the target color with a plain threshold-and-group pipeline:
//
// 1.  **Pooling**: the frame is shrunk by block averaging (`chunk::downsample`).
//     Every later step runs on the small image, and results are scaled back up.
// 2.  **Thresholding**: each pooled pixel is converted to full-range HSV and kept
//     if it lies inside the `DetectionBounds` around the target.
// 3.  **Dilation**: the binary mask is grown by one pixel in every direction
//     (3×3 kernel) so that a blob split by a thin highlight stays in one piece.
// 4.  **Region Growing**: an iterative flood fill over the 8 neighbors of every
//     unvisited mask pixel collects connected components.
// 5.  **Filtering**: components smaller than `min_contour_area_ratio` of the
//     largest are dropped. The largest component is the dominant contour.
//
// The detector is stateless: the bounds are derived from the target on every
// call, so the same (frame, target) always yields the same contours.

use crate::config::TrackingConfig;
use crate::core_modules::chunk::chunk::downsample;
use crate::core_modules::color::{DetectionBounds, HsvColor};
use crate::core_modules::contour::{Centroid, Contour, Point};
use crate::core_modules::frame::Frame;
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::vision::VisionBackend;
use image::imageops::{self, FilterType};
use image::RgbaImage;

pub mod blob_detector {
    use super::*;

    /// A binary image stored row-major.
    pub struct Mask {
        pub width: u32,
        pub height: u32,
        pub bits: Vec<bool>,
    }

    impl Mask {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                bits: vec![false; (width * height) as usize],
            }
        }

        #[inline]
        pub fn get(&self, x: u32, y: u32) -> bool {
            self.bits[(y * self.width + x) as usize]
        }

        #[inline]
        pub fn set(&mut self, x: u32, y: u32) {
            self.bits[(y * self.width + x) as usize] = true;
        }

        pub fn count(&self) -> usize {
            self.bits.iter().filter(|b| **b).count()
        }
    }

    /// Marks every pixel of `image` whose HSV falls inside `bounds`.
    pub fn threshold(image: &RgbaImage, bounds: &DetectionBounds) -> Mask {
        let mut mask = Mask::new(image.width(), image.height());
        for (x, y, rgba) in image.enumerate_pixels() {
            if bounds.contains(&Pixel::from(rgba).to_hsv()) {
                mask.set(x, y);
            }
        }
        mask
    }

    /// Binary dilation with a 3×3 square kernel.
    pub fn dilate(mask: &Mask) -> Mask {
        let mut out = Mask::new(mask.width, mask.height);
        for y in 0..mask.height {
            for x in 0..mask.width {
                if !mask.get(x, y) {
                    continue;
                }
                let x0 = x.saturating_sub(1);
                let y0 = y.saturating_sub(1);
                let x1 = (x + 1).min(mask.width - 1);
                let y1 = (y + 1).min(mask.height - 1);
                for ny in y0..=y1 {
                    for nx in x0..=x1 {
                        out.set(nx, ny);
                    }
                }
            }
        }
        out
    }

    /// Raw connected component on the mask grid, before rescaling.
    pub struct Component {
        pub min: Point,
        pub max: Point,
        pub pixel_count: usize,
        pub sum_x: f64,
        pub sum_y: f64,
    }

    /// Groups set mask pixels into 8-connected components.
    pub fn find_components(mask: &Mask) -> Vec<Component> {
        let mut visited = vec![false; mask.bits.len()];
        let mut components = Vec::new();
        let width = mask.width as i64;
        let height = mask.height as i64;

        for start in 0..mask.bits.len() {
            if !mask.bits[start] || visited[start] {
                continue;
            }
            visited[start] = true;
            let mut stack = vec![start];
            let mut component = Component {
                min: Point {
                    x: u32::MAX,
                    y: u32::MAX,
                },
                max: Point { x: 0, y: 0 },
                pixel_count: 0,
                sum_x: 0.0,
                sum_y: 0.0,
            };

            while let Some(index) = stack.pop() {
                let x = (index as i64 % width) as u32;
                let y = (index as i64 / width) as u32;
                component.min.x = component.min.x.min(x);
                component.min.y = component.min.y.min(y);
                component.max.x = component.max.x.max(x);
                component.max.y = component.max.y.max(y);
                component.pixel_count += 1;
                component.sum_x += x as f64;
                component.sum_y += y as f64;

                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = x as i64 + dx;
                        let ny = y as i64 + dy;
                        if nx < 0 || ny < 0 || nx >= width || ny >= height {
                            continue;
                        }
                        let neighbor = (ny * width + nx) as usize;
                        if mask.bits[neighbor] && !visited[neighbor] {
                            visited[neighbor] = true;
                            stack.push(neighbor);
                        }
                    }
                }
            }

            components.push(component);
        }

        components
    }
}

use blob_detector::{Component, dilate, find_components, threshold};

/// Hue-range color detector tuned by `TrackingConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBlobDetector {
    color_radius: [f64; 4],
    min_contour_area_ratio: f64,
    downsample_factor: u32,
}

impl Default for ColorBlobDetector {
    fn default() -> Self {
        Self::new(&TrackingConfig::default())
    }
}

impl ColorBlobDetector {
    pub fn new(config: &TrackingConfig) -> Self {
        Self {
            color_radius: config.color_radius,
            min_contour_area_ratio: config.min_contour_area_ratio,
            downsample_factor: config.downsample_factor.max(1),
        }
    }

    pub fn bounds(&self, target: &HsvColor) -> DetectionBounds {
        DetectionBounds::around(target, self.color_radius)
    }

    fn rescale(&self, component: &Component) -> Contour {
        let factor = self.downsample_factor;
        let scale = factor as f64;
        let count = component.pixel_count as f64;
        // Centroid of the pooled block, mapped to the center of its source block.
        let center = |sum: f64| (sum / count + 0.5) * scale - 0.5;
        Contour {
            bounding_box: (
                Point {
                    x: component.min.x * factor,
                    y: component.min.y * factor,
                },
                Point {
                    x: (component.max.x + 1) * factor - 1,
                    y: (component.max.y + 1) * factor - 1,
                },
            ),
            area: count * scale * scale,
            centroid: Centroid::new(center(component.sum_x), center(component.sum_y)),
        }
    }
}

impl VisionBackend for ColorBlobDetector {
    /// All contours worth drawing, largest first, in full-frame coordinates.
    fn find_contours(&self, frame: &Frame, target: &HsvColor) -> Vec<Contour> {
        let pooled = downsample(frame, self.downsample_factor);
        if pooled.width() == 0 || pooled.height() == 0 {
            return Vec::new();
        }

        let mask = dilate(&threshold(&pooled, &self.bounds(target)));
        let mut contours: Vec<Contour> = find_components(&mask)
            .iter()
            .map(|component| self.rescale(component))
            .collect();
        contours.sort_by(|a, b| b.area.total_cmp(&a.area));

        if let Some(max_area) = contours.first().map(|c| c.area) {
            let min_area = self.min_contour_area_ratio * max_area;
            contours.retain(|c| c.area >= min_area);
        }
        tracing::debug!(count = contours.len(), "Contours found");
        contours
    }

    fn render_swatch(&self, target: &HsvColor, width: u32, height: u32) -> RgbaImage {
        let bounds = self.bounds(target);
        let steps = ((bounds.upper.hue - bounds.lower.hue) as u32).max(1);
        let ramp = RgbaImage::from_fn(steps, 1, |x, _| {
            HsvColor::new(bounds.lower.hue + x as f64, 255.0, 255.0).to_rgba()
        });
        imageops::resize(&ramp, width.max(1), height.max(1), FilterType::Triangle)
    }
}

#[cfg(test)]
mod tests {
    use super::blob_detector::*;
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);
    const GRAY: Rgba<u8> = Rgba([90, 90, 90, 255]);

    fn unpooled() -> ColorBlobDetector {
        ColorBlobDetector::new(&TrackingConfig {
            downsample_factor: 1,
            ..TrackingConfig::default()
        })
    }

    fn paint(frame: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgba<u8>) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                frame.put_pixel(x, y, color);
            }
        }
    }

    fn red_target() -> HsvColor {
        Pixel::from(RED).to_hsv()
    }

    #[test]
    fn dilate_grows_by_one_pixel() {
        let mut mask = Mask::new(5, 5);
        mask.set(2, 2);
        assert_eq!(dilate(&mask).count(), 9);
    }

    #[test]
    fn diagonal_pixels_form_one_component() {
        let mut mask = Mask::new(4, 4);
        mask.set(0, 0);
        mask.set(1, 1);
        mask.set(3, 3);
        let components = find_components(&mask);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].pixel_count, 2);
    }

    #[test]
    fn finds_square_centroid_and_area() {
        let mut frame = RgbaImage::from_pixel(40, 40, GRAY);
        paint(&mut frame, 10, 20, 6, 6, RED);
        let observation = unpooled()
            .detect_dominant_contour(&frame, &red_target())
            .unwrap();
        // Dilation adds a one-pixel ring: 8×8 around the 6×6 square.
        assert_eq!(observation.area, 64.0);
        assert!((observation.centroid.x - 12.5).abs() < 1e-9);
        assert!((observation.centroid.y - 22.5).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_covers_dilated_square() {
        let mut frame = RgbaImage::from_pixel(40, 40, GRAY);
        paint(&mut frame, 10, 20, 6, 6, RED);
        let contours = unpooled().find_contours(&frame, &red_target());
        let (min, max) = contours[0].bounding_box;
        assert_eq!((min.x, min.y, max.x, max.y), (9, 19, 16, 26));
    }

    #[test]
    fn dominant_is_the_largest_blob() {
        let mut frame = RgbaImage::from_pixel(60, 60, GRAY);
        paint(&mut frame, 2, 2, 3, 3, RED);
        paint(&mut frame, 30, 30, 10, 10, RED);
        let detector = unpooled();
        let observation = detector
            .detect_dominant_contour(&frame, &red_target())
            .unwrap();
        assert!((observation.centroid.x - 34.5).abs() < 1e-9);
        assert_eq!(detector.find_contours(&frame, &red_target()).len(), 2);
    }

    #[test]
    fn tiny_contours_are_filtered() {
        let mut frame = RgbaImage::from_pixel(80, 80, GRAY);
        paint(&mut frame, 1, 1, 1, 1, RED);
        paint(&mut frame, 20, 20, 30, 30, RED);
        let contours = unpooled().find_contours(&frame, &red_target());
        assert_eq!(contours.len(), 1);
    }

    #[test]
    fn no_match_yields_none() {
        let frame = RgbaImage::from_pixel(20, 20, GRAY);
        assert!(unpooled().detect_dominant_contour(&frame, &red_target()).is_none());
    }

    #[test]
    fn pooled_detection_reports_full_frame_units() {
        let mut frame = RgbaImage::from_pixel(64, 64, GRAY);
        paint(&mut frame, 16, 16, 16, 16, RED);
        let observation = ColorBlobDetector::default()
            .detect_dominant_contour(&frame, &red_target())
            .unwrap();
        // 4×4 pooled square dilated to 6×6, each pooled pixel worth 16.
        assert_eq!(observation.area, 36.0 * 16.0);
        assert!((observation.centroid.x - 23.5).abs() < 1e-9);
    }

    #[test]
    fn swatch_has_requested_size() {
        let swatch = unpooled().render_swatch(&red_target(), 200, 64);
        assert_eq!(swatch.dimensions(), (200, 64));
    }
}
