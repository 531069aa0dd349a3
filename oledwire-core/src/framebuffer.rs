//! Frame buffer and pixel primitive
//!
//! Pixels are stored the way the controller scans them: the buffer is
//! `height / 8` pages of `width` bytes, and bit `b` of byte
//! `page * width + x` is the pixel at `(x, 8 * page + b)`.
//!
//! ```text
//!          x=0   x=1        x=width-1
//! page 0 [ b0-7  b0-7  ...  b0-7 ]   y = 0..8
//! page 1 [ b0-7  b0-7  ...  b0-7 ]   y = 8..16
//!  ...
//! ```

use crate::config::{DisplayConfig, PAGE_HEIGHT};
use crate::error::{ConfigError, Error};

/// Page-organized monochrome frame buffer over caller-owned memory
#[derive(Debug)]
pub struct FrameBuffer<'a> {
    buf: &'a mut [u8],
    width: u8,
    height: u8,
}

impl<'a> FrameBuffer<'a> {
    /// Wrap `buf` as a `width` x `height` frame buffer
    ///
    /// `buf` may be longer than needed; only the first `width * height / 8`
    /// bytes are used.
    pub fn new(buf: &'a mut [u8], width: u8, height: u8) -> Result<Self, ConfigError> {
        let config = DisplayConfig::new(width, height);
        config.validate()?;
        config.check_buffer(buf.len())?;
        Ok(Self::from_validated(buf, width, height))
    }

    /// Wrap a buffer whose geometry has already been checked
    pub(crate) fn from_validated(buf: &'a mut [u8], width: u8, height: u8) -> Self {
        let len = (width as usize * (height / PAGE_HEIGHT) as usize).min(buf.len());
        Self {
            buf: &mut buf[..len],
            width,
            height,
        }
    }

    /// Shorter-lived view of the same memory
    pub(crate) fn reborrow(&mut self) -> FrameBuffer<'_> {
        FrameBuffer {
            buf: &mut *self.buf,
            width: self.width,
            height: self.height,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of 8-pixel pages
    pub fn num_pages(&self) -> u8 {
        self.height / PAGE_HEIGHT
    }

    /// Set or clear the pixel at (`x`, `y`)
    ///
    /// Returns [`Error::OutOfBounds`] if either coordinate is outside the
    /// display.
    pub fn set_pixel(&mut self, x: u8, y: u8, on: bool) -> Result<(), Error> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds);
        }
        self.set_pixel_unchecked(x, y, on);
        Ok(())
    }

    /// Set or clear a pixel the caller has already bounds-checked
    ///
    /// Coordinates past the last page are ignored; an `x` past the width
    /// lands in the following page.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u8, y: u8, on: bool) {
        let index = (y / PAGE_HEIGHT) as usize * self.width as usize + x as usize;
        let mask = 1 << (y % PAGE_HEIGHT);
        if let Some(byte) = self.buf.get_mut(index) {
            if on {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    /// Read back the pixel at (`x`, `y`)
    pub fn pixel(&self, x: u8, y: u8) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y / PAGE_HEIGHT) as usize * self.width as usize + x as usize;
        self.buf.get(index).map(|byte| byte & (1 << (y % PAGE_HEIGHT)) != 0)
    }

    /// Set every pixel to `on`
    pub fn fill(&mut self, on: bool) {
        self.buf.fill(if on { 0xFF } else { 0x00 });
    }

    /// Clear every pixel
    pub fn clear(&mut self) {
        self.fill(false);
    }

    /// Bytes of one page row
    pub fn page(&self, page: u8) -> Option<&[u8]> {
        let width = self.width as usize;
        let start = page as usize * width;
        self.buf.get(start..start + width)
    }

    /// Raw buffer contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..]
    }
}
