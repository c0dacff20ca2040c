use image::{Rgb, RgbImage};

/// RGB pixel canvas for one gore tile.
/// Writes outside the canvas are silently dropped.
pub struct RasterCanvas {
    image: RgbImage,
}

impl RasterCanvas {
    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Set a pixel at the given coordinates.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>) {
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, color);
        }
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as u32, y as u32, color);
        }
    }

    /// Fill columns `x0..x1` (exclusive) of row `y`, clamped to the canvas.
    pub fn fill_span(&mut self, y: i32, x0: i32, x1: i32, color: Rgb<u8>) {
        if y < 0 || y as u32 >= self.image.height() {
            return;
        }
        let x0 = x0.max(0);
        let x1 = x1.min(self.image.width() as i32);
        for x in x0..x1 {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}
