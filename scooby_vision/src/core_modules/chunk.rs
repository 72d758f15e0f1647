// THEORY:
// A `Chunk` is a square block of pixels that stands in for a single pixel of a
// smaller image. The detector never thresholds the full-resolution frame: it first
// averages every `factor × factor` block down to one pixel. A 4× shrink leaves 16×
// fewer pixels to classify, and isolated speckles are averaged away before they
// can seed a contour.

pub mod chunk {
    use crate::core_modules::pixel::pixel::Pixel;
    use image::{Rgba, RgbaImage};

    /// A "dumb" data container representing a rectangular block of pixels.
    pub struct Chunk {
        /// The width of the chunk in pixels.
        pub width: u32,
        /// The height of the chunk in pixels.
        pub height: u32,
        /// A flattened vector containing all the `Pixel` data within this chunk.
        pub pixels: Vec<Pixel>,
    }

    impl Chunk {
        pub fn new(width: u32, height: u32, pixels: Vec<Pixel>) -> Self {
            Self {
                width,
                height,
                pixels,
            }
        }

        /// Cuts the block whose top-left corner is (`x`, `y`) out of `frame`, clipped at the edges.
        pub fn extract(frame: &RgbaImage, x: u32, y: u32, size: u32) -> Self {
            let width = size.min(frame.width().saturating_sub(x));
            let height = size.min(frame.height().saturating_sub(y));
            let mut pixels = Vec::with_capacity((width * height) as usize);
            for row in y..y + height {
                for col in x..x + width {
                    pixels.push(Pixel::from(frame.get_pixel(col, row)));
                }
            }
            Self::new(width, height, pixels)
        }

        /// Calculates the average pixel value for the entire chunk.
        pub fn average_pixel(&self) -> Pixel {
            let num_pixels = self.pixels.len() as u64;
            if num_pixels == 0 {
                return Pixel::default();
            }

            let mut sum_r = 0u64;
            let mut sum_g = 0u64;
            let mut sum_b = 0u64;
            let mut sum_a = 0u64;
            for pixel in &self.pixels {
                sum_r += pixel.red as u64;
                sum_g += pixel.green as u64;
                sum_b += pixel.blue as u64;
                sum_a += pixel.alpha as u64;
            }

            Pixel::new(
                (sum_r / num_pixels) as u8,
                (sum_g / num_pixels) as u8,
                (sum_b / num_pixels) as u8,
                (sum_a / num_pixels) as u8,
            )
        }
    }

    /// Shrinks `frame` by averaging each `factor × factor` block into one pixel.
    ///
    /// Partial blocks along the right and bottom edges are dropped, so a 10×10
    /// frame with factor 4 becomes 2×2. A factor of 1 returns a copy.
    pub fn downsample(frame: &RgbaImage, factor: u32) -> RgbaImage {
        if factor <= 1 {
            return frame.clone();
        }
        let grid_width = frame.width() / factor;
        let grid_height = frame.height() / factor;
        RgbaImage::from_fn(grid_width, grid_height, |x, y| {
            let chunk = Chunk::extract(frame, x * factor, y * factor, factor);
            Rgba::from(chunk.average_pixel())
        })
    }
}
