//! embedded-graphics integration

use core::convert::Infallible;

use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::geometry::{OriginDimensions, Point, Size};
use embedded_graphics_core::pixelcolor::BinaryColor;
use embedded_graphics_core::Pixel;

use crate::framebuffer::FrameBuffer;

impl DrawTarget for FrameBuffer<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if let (Ok(x), Ok(y)) = (u8::try_from(x), u8::try_from(y)) {
                if x < self.width() && y < self.height() {
                    self.set_pixel_unchecked(x, y, color.is_on());
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer<'_> {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};

    #[test]
    fn test_size() {
        let mut buf = [0u8; 512];
        let fb = FrameBuffer::new(&mut buf, 128, 32).unwrap();
        assert_eq!(fb.size(), Size::new(128, 32));
    }

    #[test]
    fn test_primitives_are_clipped() {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(&mut buf, 128, 64).unwrap();

        Rectangle::new(Point::new(120, 60), Size::new(20, 20))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb)
            .unwrap();
        Line::new(Point::new(-10, 0), Point::new(3, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut fb)
            .unwrap();

        let ones: u32 = fb.as_bytes().iter().map(|b| b.count_ones()).sum();
        assert_eq!(ones, 8 * 4 + 4);
        assert_eq!(fb.pixel(127, 63), Some(true));
    }

    #[test]
    fn test_clear_fills_frame() {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(&mut buf, 128, 64).unwrap();

        DrawTarget::clear(&mut fb, BinaryColor::On).unwrap();
        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));
    }
}
