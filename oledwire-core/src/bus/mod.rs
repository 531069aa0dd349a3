//! Interrupt-driven bus transaction engine
//!
//! [`Scheduler`] is a plain state machine taking `&mut self`. [`SharedBus`]
//! puts it behind a `critical_section::Mutex` so the foreground and the bus
//! interrupt can share it through `&self`: `submit` runs with interrupts
//! masked, and the interrupt handler advances it one event at a time.

pub mod scheduler;
pub mod transaction;

use core::cell::RefCell;

use critical_section::Mutex;
use oledwire_hal::{BusTiming, TwiController};

pub use scheduler::Scheduler;
pub use transaction::{Transaction, TxState, PREFIX_CAPACITY};

use crate::error::Error;

/// A [`Scheduler`] shared between foreground and interrupt context
pub struct SharedBus<'a, C, K> {
    inner: Mutex<RefCell<Scheduler<'a, C, K>>>,
}

impl<'a, C, K> SharedBus<'a, C, K> {
    /// Wrap a new idle scheduler
    pub const fn new(controller: C) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Scheduler::new(controller))),
        }
    }

    /// Current state, sampled inside a critical section
    pub fn state(&self) -> TxState {
        critical_section::with(|cs| self.inner.borrow_ref(cs).state())
    }

    /// Check if a new transaction would be accepted
    pub fn is_idle(&self) -> bool {
        self.state().is_idle()
    }

    /// Run `f` against the scheduler without being able to mutate it
    pub fn inspect<R>(&self, f: impl FnOnce(&Scheduler<'a, C, K>) -> R) -> R {
        critical_section::with(|cs| f(&self.inner.borrow_ref(cs)))
    }
}

impl<'a, C, K> SharedBus<'a, C, K>
where
    C: TwiController,
{
    /// Program bus timing and enable the controller
    pub fn enable(&self, timing: BusTiming) {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).enable(timing));
    }

    /// Submit a transaction with interrupts masked
    ///
    /// See [`Scheduler::submit`].
    pub fn submit(
        &self,
        address: u8,
        prefix: &[u8],
        payload: &'a [u8],
        completion: K,
        fail_fast: bool,
    ) -> Result<(), Error> {
        critical_section::with(|cs| {
            self.inner
                .borrow_ref_mut(cs)
                .submit(address, prefix, payload, completion, fail_fast)
        })
    }

    /// Advance by one bus event
    ///
    /// The scheduler is released before this returns, so the caller may
    /// act on the returned completion by submitting again.
    pub fn on_interrupt(&self) -> Option<K> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).on_interrupt())
    }
}
