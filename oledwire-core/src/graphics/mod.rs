//! Shape primitives
//!
//! Everything here is built on [`FrameBuffer::set_pixel_unchecked`] and
//! never touches the bus. Draw inside [`Oled::draw`](crate::Oled::draw) or
//! a [`FrameGuard`](crate::FrameGuard) so a refresh cannot read the frame
//! halfway through.
//!
//! Rectangles take inclusive corner coordinates in any order. Edges past the
//! display are clamped to it; a shape is only rejected when all four edges
//! had to be clamped.

#[cfg(feature = "graphics")]
mod target;

use core::ops::BitOr;

use crate::error::Error;
use crate::framebuffer::FrameBuffer;

/// Color and fill flags for the shape primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrawParams(u8);

impl DrawParams {
    /// Outline, pixels cleared
    pub const NONE: Self = Self(0);
    /// Pixels set instead of cleared
    pub const COLOR: Self = Self(0x01);
    /// Fill the interior instead of drawing the outline
    pub const FILL: Self = Self(0x02);

    const ALL: u8 = Self::COLOR.0 | Self::FILL.0;

    /// Parse raw flag bits
    ///
    /// Returns [`Error::InvalidParams`] if any bit other than `COLOR` and
    /// `FILL` is set.
    pub const fn from_bits(bits: u8) -> Result<Self, Error> {
        if bits & !Self::ALL != 0 {
            return Err(Error::InvalidParams);
        }
        Ok(Self(bits))
    }

    /// Raw flag bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Pixel state the shape is drawn with
    pub const fn color(self) -> bool {
        self.0 & Self::COLOR.0 != 0
    }

    /// Whether the interior is filled
    pub const fn is_fill(self) -> bool {
        self.0 & Self::FILL.0 != 0
    }
}

impl BitOr for DrawParams {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl TryFrom<u8> for DrawParams {
    type Error = Error;

    fn try_from(bits: u8) -> Result<Self, Error> {
        Self::from_bits(bits)
    }
}

/// Rectangle given by two inclusive corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    /// First corner, column
    pub x0: u8,
    /// First corner, row
    pub y0: u8,
    /// Second corner, column
    pub x1: u8,
    /// Second corner, row
    pub y1: u8,
}

impl Rect {
    /// Rectangle spanning `(x0, y0)` to `(x1, y1)`, both included
    pub const fn new(x0: u8, y0: u8, x1: u8, y1: u8) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Same rectangle with `(x0, y0)` as the top left corner
    pub fn normalized(self) -> Self {
        Self {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    /// Pull every edge onto a `width` x `height` display
    ///
    /// Returns the clamped rectangle and how many of the four edges moved.
    pub fn clamp(self, width: u8, height: u8) -> (Self, u8) {
        let x_max = width.saturating_sub(1);
        let y_max = height.saturating_sub(1);
        let mut clamped = 0;
        let mut edge = |value: u8, max: u8| {
            if value > max {
                clamped += 1;
                max
            } else {
                value
            }
        };

        let rect = Self {
            x0: edge(self.x0, x_max),
            y0: edge(self.y0, y_max),
            x1: edge(self.x1, x_max),
            y1: edge(self.y1, y_max),
        };
        (rect, clamped)
    }

    /// Width in pixels, corners included
    pub fn width(&self) -> u8 {
        self.x0.abs_diff(self.x1).saturating_add(1)
    }

    /// Height in pixels, corners included
    pub fn height(&self) -> u8 {
        self.y0.abs_diff(self.y1).saturating_add(1)
    }
}

/// Quadrants for [`draw_corner`]
pub mod corner {
    /// Up and to the left of the center
    pub const TOP_LEFT: u8 = 0x01;
    /// Up and to the right of the center
    pub const TOP_RIGHT: u8 = 0x02;
    /// Down and to the right of the center
    pub const BOTTOM_RIGHT: u8 = 0x04;
    /// Down and to the left of the center
    pub const BOTTOM_LEFT: u8 = 0x08;
}

/// Half of a circle for [`fill_corner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    /// Columns left of the center
    Left,
    /// Columns right of the center
    Right,
}

/// Clamp `rect` to the frame, or fail if nothing of it is left
fn fit(fb: &FrameBuffer<'_>, rect: Rect) -> Result<Rect, Error> {
    let (rect, clamped) = rect.clamp(fb.width(), fb.height());
    if clamped >= 4 {
        return Err(Error::OutOfBounds);
    }
    Ok(rect.normalized())
}

/// Draw an outlined or filled rectangle
pub fn rectangle(fb: &mut FrameBuffer<'_>, rect: Rect, params: DrawParams) -> Result<(), Error> {
    let Rect { x0, y0, x1, y1 } = fit(fb, rect)?;
    let on = params.color();

    if params.is_fill() {
        for x in x0..=x1 {
            for y in y0..=y1 {
                fb.set_pixel_unchecked(x, y, on);
            }
        }
    } else {
        for x in x0..=x1 {
            fb.set_pixel_unchecked(x, y0, on);
            fb.set_pixel_unchecked(x, y1, on);
        }
        for y in y0..=y1 {
            fb.set_pixel_unchecked(x0, y, on);
            fb.set_pixel_unchecked(x1, y, on);
        }
    }
    Ok(())
}

/// Draw a rectangle with rounded corners
///
/// `radius` is reduced to half the shorter side if it does not fit.
pub fn round_rectangle(
    fb: &mut FrameBuffer<'_>,
    rect: Rect,
    radius: u8,
    params: DrawParams,
) -> Result<(), Error> {
    let rect = fit(fb, rect)?;
    let on = params.color();

    let (x, y) = (i16::from(rect.x0), i16::from(rect.y0));
    let (w, h) = (i16::from(rect.width()), i16::from(rect.height()));
    let r = i16::from(radius).min(w.min(h) / 2);

    if params.is_fill() {
        for col in x + r..x + w - r {
            line(fb, (col, y), (col, y + h - 1), on);
        }
        fill_corner(fb, (x + w - r - 1, y + r), r, Half::Right, h - 2 * r - 1, on);
        fill_corner(fb, (x + r, y + r), r, Half::Left, h - 2 * r - 1, on);
    } else {
        line(fb, (x + r, y), (x + w - r - 1, y), on);
        line(fb, (x + r, y + h - 1), (x + w - r - 1, y + h - 1), on);
        line(fb, (x, y + r), (x, y + h - r - 1), on);
        line(fb, (x + w - 1, y + r), (x + w - 1, y + h - r - 1), on);

        draw_corner(fb, (x + r, y + r), r, corner::TOP_LEFT, on);
        draw_corner(fb, (x + w - r - 1, y + r), r, corner::TOP_RIGHT, on);
        draw_corner(fb, (x + w - r - 1, y + h - r - 1), r, corner::BOTTOM_RIGHT, on);
        draw_corner(fb, (x + r, y + h - r - 1), r, corner::BOTTOM_LEFT, on);
    }
    Ok(())
}

/// Plot a pixel that may lie off the frame
#[inline]
fn plot(fb: &mut FrameBuffer<'_>, x: i16, y: i16, on: bool) {
    if let (Ok(x), Ok(y)) = (u8::try_from(x), u8::try_from(y)) {
        if x < fb.width() && y < fb.height() {
            fb.set_pixel_unchecked(x, y, on);
        }
    }
}

/// Midpoint circle walk shared by the corner helpers
///
/// Calls `step(x, y)` for each octant point with `x < y`.
fn walk_circle(r: i16, mut step: impl FnMut(i16, i16)) {
    let mut f = 1 - r;
    let mut dd_x = 1;
    let mut dd_y = -2 * r;
    let mut x = 0;
    let mut y = r;

    while x < y {
        if f >= 0 {
            y -= 1;
            dd_y += 2;
            f += dd_y;
        }
        x += 1;
        dd_x += 2;
        f += dd_x;
        step(x, y);
    }
}

/// Outline the quarter circles of radius `r` around `center` selected by
/// `corners` (see [`corner`])
pub fn draw_corner(fb: &mut FrameBuffer<'_>, center: (i16, i16), r: i16, corners: u8, on: bool) {
    let (cx, cy) = center;
    walk_circle(r, |x, y| {
        if corners & corner::BOTTOM_RIGHT != 0 {
            plot(fb, cx + x, cy + y, on);
            plot(fb, cx + y, cy + x, on);
        }
        if corners & corner::TOP_RIGHT != 0 {
            plot(fb, cx + x, cy - y, on);
            plot(fb, cx + y, cy - x, on);
        }
        if corners & corner::BOTTOM_LEFT != 0 {
            plot(fb, cx - y, cy + x, on);
            plot(fb, cx - x, cy + y, on);
        }
        if corners & corner::TOP_LEFT != 0 {
            plot(fb, cx - y, cy - x, on);
            plot(fb, cx - x, cy - y, on);
        }
    });
}

/// Fill one half of a circle of radius `r` around `center`, stretched
/// vertically by `stretch` pixels
pub fn fill_corner(
    fb: &mut FrameBuffer<'_>,
    center: (i16, i16),
    r: i16,
    half: Half,
    stretch: i16,
    on: bool,
) {
    let (cx, cy) = center;
    let sign = match half {
        Half::Right => 1,
        Half::Left => -1,
    };
    walk_circle(r, |x, y| {
        line(fb, (cx + sign * x, cy - y), (cx + sign * x, cy + y + stretch), on);
        line(fb, (cx + sign * y, cy - x), (cx + sign * y, cy + x + stretch), on);
    });
}

/// Draw a straight line between two inclusive end points
///
/// Points off the frame are skipped.
pub fn line(fb: &mut FrameBuffer<'_>, from: (i16, i16), to: (i16, i16), on: bool) {
    let (mut x, mut y) = from;
    let (x1, y1) = to;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(fb, x, y, on);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn count_on(fb: &FrameBuffer<'_>) -> u32 {
        fb.as_bytes().iter().map(|b| b.count_ones()).sum()
    }

    #[test]
    fn test_params_validation() {
        assert_eq!(DrawParams::from_bits(0x03), Ok(DrawParams::COLOR | DrawParams::FILL));
        assert_eq!(DrawParams::from_bits(0x04), Err(Error::InvalidParams));
        assert_eq!(DrawParams::try_from(0xFF), Err(Error::InvalidParams));

        let params = DrawParams::FILL;
        assert!(params.is_fill());
        assert!(!params.color());
    }

    #[test]
    fn test_clamp_counts_edges() {
        let (rect, clamped) = Rect::new(10, 200, 130, 5).clamp(128, 64);
        assert_eq!(rect, Rect::new(10, 63, 127, 5));
        assert_eq!(clamped, 2);
    }

    #[test]
    fn test_fully_outside_is_rejected() {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(&mut buf, 128, 64).unwrap();

        let rect = Rect::new(130, 70, 200, 90);
        assert_eq!(rectangle(&mut fb, rect, DrawParams::COLOR), Err(Error::OutOfBounds));
        assert_eq!(count_on(&fb), 0);
    }

    #[test]
    fn test_partially_outside_is_clamped() {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(&mut buf, 128, 64).unwrap();

        let params = DrawParams::COLOR | DrawParams::FILL;
        rectangle(&mut fb, Rect::new(120, 60, 200, 90), params).unwrap();
        assert_eq!(count_on(&fb), 8 * 4);
        assert_eq!(fb.pixel(127, 63), Some(true));
    }

    #[test]
    fn test_filled_rectangle() {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(&mut buf, 128, 64).unwrap();

        let params = DrawParams::COLOR | DrawParams::FILL;
        rectangle(&mut fb, Rect::new(9, 7, 0, 0), params).unwrap();
        assert_eq!(count_on(&fb), 10 * 8);
        assert_eq!(fb.pixel(9, 7), Some(true));
        assert_eq!(fb.pixel(10, 7), Some(false));
    }

    #[test]
    fn test_outline_rectangle() {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(&mut buf, 128, 64).unwrap();

        rectangle(&mut fb, Rect::new(0, 0, 9, 9), DrawParams::COLOR).unwrap();
        assert_eq!(count_on(&fb), 36);
        assert_eq!(fb.pixel(5, 5), Some(false));
    }

    #[test]
    fn test_clear_color_erases() {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(&mut buf, 128, 64).unwrap();
        fb.fill(true);

        rectangle(&mut fb, Rect::new(2, 2, 125, 61), DrawParams::FILL).unwrap();
        assert_eq!(fb.pixel(2, 2), Some(false));
        assert_eq!(fb.pixel(1, 1), Some(true));
        assert_eq!(count_on(&fb), 128 * 64 - 124 * 60);
    }

    #[test]
    fn test_round_rectangle_without_radius_matches_rectangle() {
        let mut a = [0u8; 1024];
        let mut b = [0u8; 1024];
        let mut square = FrameBuffer::new(&mut a, 128, 64).unwrap();
        let mut round = FrameBuffer::new(&mut b, 128, 64).unwrap();

        for params in [DrawParams::COLOR, DrawParams::COLOR | DrawParams::FILL] {
            let rect = Rect::new(3, 4, 40, 30);
            rectangle(&mut square, rect, params).unwrap();
            round_rectangle(&mut round, rect, 0, params).unwrap();
            assert_eq!(square.as_bytes(), round.as_bytes());
        }
    }

    #[test]
    fn test_round_rectangle_cuts_corners() {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(&mut buf, 128, 64).unwrap();

        let params = DrawParams::COLOR | DrawParams::FILL;
        round_rectangle(&mut fb, Rect::new(10, 10, 49, 29), 6, params).unwrap();
        // corners stay empty, edge midpoints and center are set
        assert_eq!(fb.pixel(10, 10), Some(false));
        assert_eq!(fb.pixel(49, 29), Some(false));
        assert_eq!(fb.pixel(30, 10), Some(true));
        assert_eq!(fb.pixel(10, 20), Some(true));
        assert_eq!(fb.pixel(30, 20), Some(true));
        // nothing outside the bounding box
        assert_eq!(fb.pixel(9, 20), Some(false));
        assert_eq!(fb.pixel(50, 20), Some(false));
    }

    #[test]
    fn test_round_outline_is_symmetric() {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(&mut buf, 128, 64).unwrap();

        round_rectangle(&mut fb, Rect::new(0, 0, 31, 15), 5, DrawParams::COLOR).unwrap();
        for x in 0..32 {
            for y in 0..16 {
                assert_eq!(fb.pixel(x, y), fb.pixel(31 - x, y), "({}, {})", x, y);
                assert_eq!(fb.pixel(x, y), fb.pixel(x, 15 - y), "({}, {})", x, y);
            }
        }
        assert_eq!(fb.pixel(0, 0), Some(false));
        assert_eq!(fb.pixel(16, 0), Some(true));
    }

    #[test]
    fn test_line_is_clipped() {
        let mut buf = [0u8; 1024];
        let mut fb = FrameBuffer::new(&mut buf, 128, 64).unwrap();

        line(&mut fb, (-5, 3), (4, 3), true);
        assert_eq!(count_on(&fb), 5);
        line(&mut fb, (0, 0), (7, 7), true);
        assert_eq!(fb.pixel(7, 7), Some(true));
    }

    proptest! {
        #[test]
        fn clamping_in_bounds_is_noop(x0 in 0u8..128, y0 in 0u8..64, x1 in 0u8..128, y1 in 0u8..64) {
            let rect = Rect::new(x0, y0, x1, y1);
            prop_assert_eq!(rect.clamp(128, 64), (rect, 0));
        }

        #[test]
        fn clamping_is_idempotent(x0: u8, y0: u8, x1: u8, y1: u8) {
            let (once, _) = Rect::new(x0, y0, x1, y1).clamp(128, 64);
            prop_assert_eq!(once.clamp(128, 64), (once, 0));
        }

        #[test]
        fn shapes_stay_inside_rect(x0 in 0u8..128, y0 in 0u8..64, x1 in 0u8..128, y1 in 0u8..64, r in 0u8..20) {
            let mut buf = [0u8; 1024];
            let mut fb = FrameBuffer::new(&mut buf, 128, 64).unwrap();
            let rect = Rect::new(x0, y0, x1, y1);
            round_rectangle(&mut fb, rect, r, DrawParams::COLOR | DrawParams::FILL).unwrap();

            let bounds = rect.normalized();
            for x in 0..128 {
                for y in 0..64 {
                    if fb.pixel(x, y) == Some(true) {
                        prop_assert!(x >= bounds.x0 && x <= bounds.x1);
                        prop_assert!(y >= bounds.y0 && y <= bounds.y1);
                    }
                }
            }
        }
    }
}
