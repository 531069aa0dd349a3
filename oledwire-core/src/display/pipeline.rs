//! Refresh pipeline
//!
//! A refresh is a chain of bus transactions, two per page, each one
//! scheduled by the completion of the one before:
//!
//! ```text
//! refresh ─► SelectPage(0) ─► WritePage(0) ─► SelectPage(1) ─► ... ─► WritePage(P-1) ─► ReleaseLock
//!            80 00 80 10      40 + row 0                               40 + row P-1
//!            80 B0
//! ```
//!
//! Apart from the first submission every step runs in the bus interrupt.
//! The device lock is `Deferred` for the whole chain, which is what allows
//! the interrupt to read the frame buffer without copying it.

use oledwire_hal::TwiController;
use portable_atomic::Ordering;

use super::Oled;
use crate::command;
use crate::error::Error;
use crate::lock::LockState;

/// What to do when the transaction in flight completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Continuation {
    /// Nothing
    Nothing,
    /// Free the deferred device lock
    ReleaseLock,
    /// Point the controller at this page
    SelectPage(u8),
    /// Send this page's row of the frame buffer
    WritePage(u8),
}

impl<'a, C> Oled<'a, C>
where
    C: TwiController,
{
    /// Kick off a refresh; the lock must be `Held` by the caller
    pub(super) fn start_refresh(&self, relax: impl FnMut()) {
        if !self.lock.transfer() {
            #[cfg(feature = "defmt")]
            defmt::error!("refresh started without holding the device lock");
            return;
        }

        self.current_page.store(0, Ordering::Relaxed);
        #[cfg(feature = "defmt")]
        defmt::debug!("refresh: {} pages", self.num_pages());
        self.select_page(0, relax);
    }

    /// Run a continuation handed back by the scheduler
    pub(super) fn resume(&self, next: Continuation) {
        match next {
            Continuation::Nothing => {}
            Continuation::ReleaseLock => self.release_deferred(),
            Continuation::SelectPage(page) => self.select_page(page, core::hint::spin_loop),
            Continuation::WritePage(page) => self.write_page(page, core::hint::spin_loop),
        }
    }

    fn select_page(&self, page: u8, relax: impl FnMut()) {
        if page >= self.num_pages() {
            self.release_deferred();
            return;
        }

        let select = command::select_page(page);
        self.submit_deferred(&select, &[], Continuation::WritePage(page), relax);
    }

    fn write_page(&self, page: u8, relax: impl FnMut()) {
        if page >= self.num_pages() {
            self.release_deferred();
            return;
        }

        if self.lock.state() != LockState::Deferred {
            // The frame may be under a foreground writer; leave it alone
            #[cfg(feature = "defmt")]
            defmt::error!("page {} write without the deferred device lock", page);
            return;
        }

        let width = self.config.width as usize;
        // SAFETY: the lock is deferred to this pipeline until the final
        // continuation, which runs after the scheduler has dropped the row.
        #[allow(unsafe_code)]
        let row = unsafe { self.frame.row(page as usize * width, width) };

        let next_page = page + 1;
        self.current_page.store(next_page, Ordering::Relaxed);
        let next = if next_page < self.num_pages() {
            Continuation::SelectPage(next_page)
        } else {
            Continuation::ReleaseLock
        };

        #[cfg(feature = "defmt")]
        defmt::trace!("refresh: writing page {}", page);
        self.submit_deferred(&command::DATA_PREFIX, row, next, relax);
    }

    /// Submit on behalf of a deferred lock holder, retrying while the bus
    /// is busy
    ///
    /// Retries are bounded by the remainder of the transaction in flight.
    /// From a continuation the scheduler is already idle, so the first
    /// attempt succeeds.
    pub(super) fn submit_deferred(
        &self,
        prefix: &[u8],
        payload: &'a [u8],
        next: Continuation,
        mut relax: impl FnMut(),
    ) {
        loop {
            match self
                .bus
                .submit(self.config.address, prefix, payload, next, true)
            {
                Ok(()) => return,
                Err(Error::Busy) => relax(),
                Err(_err) => {
                    // Fixed command sequences always fit; give the lock back
                    // rather than leave it held forever
                    #[cfg(feature = "defmt")]
                    defmt::error!("submission failed: {}", _err);
                    self.release_deferred();
                    return;
                }
            }
        }
    }

    fn release_deferred(&self) {
        self.lock.release();
        #[cfg(feature = "defmt")]
        defmt::debug!("device lock released");
    }
}
