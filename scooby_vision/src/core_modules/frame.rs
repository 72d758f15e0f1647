//! Frame plumbing: the tracker works on RGBA8 images from the `image` crate.

use crate::error::{TrackingError, TrackingResult};
use image::RgbaImage;

/// One video frame, four interleaved 8-bit channels per pixel.
pub type Frame = RgbaImage;

const CHANNELS: usize = 4;

/// Wraps a raw RGBA buffer as a `Frame`, checking that its length matches the dimensions.
pub fn frame_from_rgba(width: u32, height: u32, data: Vec<u8>) -> TrackingResult<Frame> {
    let expected = width as usize * height as usize * CHANNELS;
    let actual = data.len();
    RgbaImage::from_raw(width, height, data)
        .filter(|_| actual == expected)
        .ok_or(TrackingError::InvalidFrame { expected, actual })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_buffer() {
        let frame = frame_from_rgba(4, 2, vec![0u8; 32]).unwrap();
        assert_eq!(frame.dimensions(), (4, 2));
    }

    #[test]
    fn rejects_short_buffer() {
        let err = frame_from_rgba(4, 2, vec![0u8; 31]).unwrap_err();
        assert!(matches!(
            err,
            TrackingError::InvalidFrame {
                expected: 32,
                actual: 31
            }
        ));
    }

    #[test]
    fn rejects_oversized_buffer() {
        assert!(frame_from_rgba(1, 1, vec![0u8; 8]).is_err());
    }
}
