//! Scoped frame buffer access

use core::ops::Deref;

use oledwire_hal::TwiController;

use super::Oled;
use crate::framebuffer::FrameBuffer;

/// Exclusive access to the frame buffer while the device lock is held
///
/// Dropping the guard frees the lock. [`FrameGuard::refresh`] instead hands
/// the lock to the refresh pipeline, which frees it after the last page has
/// gone out.
///
/// Writes go through [`FrameGuard::frame`], whose view borrows the guard and
/// so cannot be kept past it:
///
/// ```compile_fail
/// use oledwire_core::{FrameBuffer, FrameGuard};
///
/// fn keep<'o, C>(mut guard: FrameGuard<'o, '_, C>) -> FrameBuffer<'o> {
///     guard.frame()
/// }
/// ```
///
/// Nor can the view be swapped out of the guard:
///
/// ```compile_fail
/// use oledwire_core::{FrameBuffer, FrameGuard};
///
/// fn swap<'o, C>(mut guard: FrameGuard<'o, '_, C>, spare: &'o mut [u8]) -> FrameBuffer<'o> {
///     let spare = FrameBuffer::new(spare, 128, 64).unwrap();
///     core::mem::replace(&mut *guard, spare)
/// }
/// ```
pub struct FrameGuard<'o, 'a, C> {
    pub(super) oled: &'o Oled<'a, C>,
    pub(super) frame: FrameBuffer<'o>,
}

impl<'o, 'a, C> Deref for FrameGuard<'o, 'a, C> {
    type Target = FrameBuffer<'o>;

    fn deref(&self) -> &Self::Target {
        &self.frame
    }
}

impl<C> FrameGuard<'_, '_, C> {
    /// Writable view of the frame, valid while the guard is borrowed
    pub fn frame(&mut self) -> FrameBuffer<'_> {
        self.frame.reborrow()
    }
}

impl<C> Drop for FrameGuard<'_, '_, C> {
    fn drop(&mut self) {
        self.oled.lock.release();
    }
}

impl<'o, 'a, C> FrameGuard<'o, 'a, C>
where
    C: TwiController,
{
    /// Push the frame to the display without releasing the lock in between
    pub fn refresh(self) {
        self.refresh_with(core::hint::spin_loop);
    }

    /// Like [`refresh`](Self::refresh), calling `relax` while waiting for
    /// the bus
    pub fn refresh_with(self, relax: impl FnMut()) {
        let oled = self.oled;
        // Ends the mutable view; the lock stays taken and changes hands below
        core::mem::forget(self);
        oled.start_refresh(relax);
    }
}
