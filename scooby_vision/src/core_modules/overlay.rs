//! Paints tracking feedback onto a frame for display.
//!
//! Layout: a 64×64 label of the selected color at (4, 4), the hue-range swatch
//! to its right at (70, 4), a red outline around every detected contour and a
//! red cross on the dominant blob's centroid. Everything is clipped to the frame.

use crate::core_modules::calibrator::Calibration;
use crate::core_modules::contour::{BlobObservation, Contour};
use image::{Rgba, RgbaImage};

const LABEL_ORIGIN: (u32, u32) = (4, 4);
const LABEL_SIZE: u32 = 64;
const SWATCH_ORIGIN: (u32, u32) = (70, 4);
const MARKER_ARM: i64 = 6;
const MARKER_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const CONTOUR_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Draws the calibration artifacts, the contour outlines and, if present, the centroid marker.
pub fn annotate(
    frame: &mut RgbaImage,
    calibration: &Calibration,
    contours: &[Contour],
    observation: Option<&BlobObservation>,
) {
    fill_rect(
        frame,
        LABEL_ORIGIN,
        (LABEL_SIZE, LABEL_SIZE),
        calibration.display_color,
    );
    blit(frame, &calibration.swatch, SWATCH_ORIGIN);
    for contour in contours {
        outline(frame, contour);
    }
    if let Some(observation) = observation {
        draw_cross(frame, observation.centroid.x, observation.centroid.y);
    }
}

fn fill_rect(frame: &mut RgbaImage, origin: (u32, u32), size: (u32, u32), color: Rgba<u8>) {
    let x_end = origin.0.saturating_add(size.0).min(frame.width());
    let y_end = origin.1.saturating_add(size.1).min(frame.height());
    for y in origin.1..y_end {
        for x in origin.0..x_end {
            frame.put_pixel(x, y, color);
        }
    }
}

fn blit(frame: &mut RgbaImage, source: &RgbaImage, origin: (u32, u32)) {
    for (sx, sy, pixel) in source.enumerate_pixels() {
        let (x, y) = (origin.0 + sx, origin.1 + sy);
        if x < frame.width() && y < frame.height() {
            frame.put_pixel(x, y, *pixel);
        }
    }
}

/// One-pixel rectangle along the contour's inclusive bounding box.
fn outline(frame: &mut RgbaImage, contour: &Contour) {
    if frame.width() == 0 || frame.height() == 0 {
        return;
    }
    let (min, max) = contour.bounding_box;
    let x0 = min.x.min(frame.width() - 1);
    let y0 = min.y.min(frame.height() - 1);
    let x1 = max.x.min(frame.width() - 1);
    let y1 = max.y.min(frame.height() - 1);
    for x in x0..=x1 {
        frame.put_pixel(x, y0, CONTOUR_COLOR);
        frame.put_pixel(x, y1, CONTOUR_COLOR);
    }
    for y in y0..=y1 {
        frame.put_pixel(x0, y, CONTOUR_COLOR);
        frame.put_pixel(x1, y, CONTOUR_COLOR);
    }
}

fn draw_cross(frame: &mut RgbaImage, cx: f64, cy: f64) {
    if !(cx.is_finite() && cy.is_finite()) {
        return;
    }
    let (cx, cy) = (cx.round() as i64, cy.round() as i64);
    let (width, height) = (frame.width() as i64, frame.height() as i64);
    for d in -MARKER_ARM..=MARKER_ARM {
        for (x, y) in [(cx + d, cy), (cx, cy + d)] {
            if (0..width).contains(&x) && (0..height).contains(&y) {
                frame.put_pixel(x as u32, y as u32, MARKER_COLOR);
            }
        }
    }
}
