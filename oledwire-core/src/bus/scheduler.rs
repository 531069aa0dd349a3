//! Single-slot transaction scheduler and its interrupt-driven state machine
//!
//! [`Scheduler::submit`] is the only way to start a transaction and
//! [`Scheduler::on_interrupt`] the only way to advance one. Each interrupt
//! performs exactly one bus action:
//!
//! ```text
//!  submit ──► SendAddress ──► SendPrefix* ──► SendPayload* ──► Stop ──► Idle
//!                   │              │                             ▲
//!                   └──────────────┴──── (phase empty) ──────────┘
//! ```
//!
//! The completion value stored at submission is handed back on the event that
//! issues the stop condition. The caller dispatches it once the scheduler
//! is no longer borrowed, so a completion may submit the next transaction.

use oledwire_hal::{BusTiming, TwiController};

use super::transaction::{Transaction, TxState};
use crate::error::Error;

/// Transaction scheduler
pub struct Scheduler<'a, C, K> {
    controller: C,
    state: TxState,
    tx: Transaction<'a, K>,
}

impl<'a, C, K> Scheduler<'a, C, K> {
    /// Create an idle scheduler owning `controller`
    pub const fn new(controller: C) -> Self {
        Self {
            controller,
            state: TxState::Idle,
            tx: Transaction::empty(),
        }
    }

    /// Current state
    pub fn state(&self) -> TxState {
        self.state
    }

    /// Check if a new transaction would be accepted
    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// The transaction in flight, if any
    pub fn transaction(&self) -> Option<&Transaction<'a, K>> {
        if self.state.is_idle() {
            None
        } else {
            Some(&self.tx)
        }
    }
}

impl<'a, C, K> Scheduler<'a, C, K>
where
    C: TwiController,
{
    /// Program bus timing and enable the controller
    pub fn enable(&mut self, timing: BusTiming) {
        self.controller.enable(timing);
    }

    /// Start a transaction to `address` sending `prefix` then `payload`
    ///
    /// Either part may be empty and is then skipped. Never blocks: while a
    /// transaction is in flight this returns [`Error::Busy`] and leaves the
    /// scheduler untouched. A prefix longer than
    /// [`PREFIX_CAPACITY`](super::PREFIX_CAPACITY) is rejected with
    /// [`Error::InvalidParams`].
    pub fn submit(
        &mut self,
        address: u8,
        prefix: &[u8],
        payload: &'a [u8],
        completion: K,
        fail_fast: bool,
    ) -> Result<(), Error> {
        if !self.state.is_idle() {
            #[cfg(feature = "defmt")]
            defmt::trace!("bus busy ({}), submission rejected", self.state);
            return Err(Error::Busy);
        }

        self.tx = Transaction::new(address, prefix, payload, completion, fail_fast)?;
        self.state = TxState::SendAddress;
        self.controller.start();
        Ok(())
    }

    /// Advance the state machine by one bus event
    ///
    /// Call from the bus interrupt handler. Returns the completion of the
    /// transaction that just finished, if any.
    pub fn on_interrupt(&mut self) -> Option<K> {
        match self.state {
            TxState::Idle | TxState::Stop => {
                #[cfg(feature = "defmt")]
                if self.state.is_idle() {
                    defmt::warn!("spurious bus interrupt while idle");
                }
                self.controller.stop();
                self.state = TxState::Idle;
                // Already taken if this is a spurious event
                self.tx.finish()
            }
            TxState::SendAddress => {
                self.controller.send_address(self.tx.address_byte());
                self.state = self.after_prefix();
                None
            }
            TxState::SendPrefix => {
                if let Some(byte) = self.tx.next_prefix_byte() {
                    self.controller.send_byte(byte);
                }
                if !self.tx.has_prefix() {
                    self.state = self.after_prefix();
                }
                None
            }
            TxState::SendPayload => {
                if let Some(byte) = self.tx.next_payload_byte() {
                    self.controller.send_byte(byte);
                }
                if !self.tx.has_payload() {
                    self.state = TxState::Stop;
                }
                None
            }
        }
    }

    /// Next phase once nothing of the prefix remains to be sent
    fn after_prefix(&self) -> TxState {
        if self.tx.has_prefix() {
            TxState::SendPrefix
        } else if self.tx.has_payload() {
            TxState::SendPayload
        } else {
            TxState::Stop
        }
    }
}
