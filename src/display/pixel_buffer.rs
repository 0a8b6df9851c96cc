use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

// ============================================================================
// PixelBuffer
// ============================================================================

/// 0x00RRGGBB pixel grid for software rendering
/// Renders paint into this; the window and the PNG encoder read from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with default resolution (640x480)
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a new black pixel buffer with custom resolution
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[cfg(test)]
    #[inline]
    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width as usize && y < self.height as usize
    }

    /// Calculate index for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: usize, y: usize) -> usize {
        y * self.width as usize + x
    }

    /// Clear to a solid color
    pub fn clear(&mut self, rgb: u32) {
        self.pixels.fill(rgb);
    }

    /// Read a pixel from the buffer (bounds checked)
    /// Returns None if coordinates are out of bounds
    #[cfg(test)]
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u32> {
        if self.in_bounds(x, y) {
            Some(self.pixels[self.pixel_index(x, y)])
        } else {
            None
        }
    }

    /// Fill a rectangle, clipped at the right and bottom edges
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, rgb: u32) {
        let x_end = x.saturating_add(w).min(self.width as usize);
        let y_end = y.saturating_add(h).min(self.height as usize);
        if x >= x_end {
            return;
        }
        for row in y..y_end {
            let start = self.pixel_index(x, row);
            let end = self.pixel_index(x_end, row);
            self.pixels[start..end].fill(rgb);
        }
    }

    /// Pixels in row-major order
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw bytes for SDL texture upload (native-endian 0x00RRGGBB words)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}
