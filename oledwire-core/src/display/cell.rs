//! Frame memory shared between foreground and interrupt context
//!
//! The borrow checker cannot see the device lock, so the frame buffer is kept
//! as a raw pointer here and handed out under the lock's rules:
//!
//! - [`FrameCell::view_mut`] while the lock is `Held` by the caller;
//! - [`FrameCell::row`] while the lock is `Deferred` to the refresh pipeline.
//!
//! The two never overlap in time, which is what makes both sound.

#![allow(unsafe_code)]

use core::marker::PhantomData;
use core::ptr::NonNull;

pub(crate) struct FrameCell<'a> {
    ptr: NonNull<u8>,
    len: usize,
    _buf: PhantomData<&'a mut [u8]>,
}

// SAFETY: access to the memory is serialized by the device lock; see the
// module documentation.
unsafe impl Send for FrameCell<'_> {}
unsafe impl Sync for FrameCell<'_> {}

impl<'a> FrameCell<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self {
            len: buf.len(),
            ptr: NonNull::from(buf).cast(),
            _buf: PhantomData,
        }
    }

    /// Mutable view of the whole buffer
    ///
    /// # Safety
    ///
    /// The caller must hold the device lock in the `Held` state for as long
    /// as the returned slice is alive, and must not create a second view.
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn view_mut(&self) -> &mut [u8] {
        // SAFETY: pointer and length come from a live `&'a mut [u8]`;
        // exclusivity is the caller's obligation.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Shared view of `len` bytes starting at `start`, for the lifetime of
    /// the underlying buffer
    ///
    /// Returns an empty slice if the range is out of bounds.
    ///
    /// # Safety
    ///
    /// The device lock must be `Deferred` to the pipeline, and the slice
    /// must not be read after the lock is released.
    pub(crate) unsafe fn row(&self, start: usize, len: usize) -> &'a [u8] {
        match start.checked_add(len) {
            Some(end) if end <= self.len => {
                // SAFETY: in bounds; no mutable view exists while the lock is
                // deferred.
                unsafe { core::slice::from_raw_parts(self.ptr.as_ptr().add(start), len) }
            }
            _ => &[],
        }
    }
}
