//! Transaction descriptor and state

use heapless::Vec;

use crate::error::Error;

/// Longest prefix a transaction can carry (the power-on sequence is 12)
pub const PREFIX_CAPACITY: usize = 16;

/// Transaction state, advanced one step per bus interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxState {
    /// No transaction in flight
    #[default]
    Idle,
    /// Last byte loaded; next event issues the stop condition
    Stop,
    /// Start requested; next event loads the address byte
    SendAddress,
    /// Loading prefix bytes
    SendPrefix,
    /// Loading payload bytes
    SendPayload,
}

impl TxState {
    /// Check if no transaction is in flight
    pub fn is_idle(&self) -> bool {
        matches!(self, TxState::Idle)
    }
}

/// The single transaction descriptor
///
/// Prefix bytes are short command sequences and are copied in; the payload
/// is borrowed for as long as the transaction is live and released when it
/// finishes.
#[derive(Debug)]
pub struct Transaction<'a, K> {
    address: u8,
    prefix: Vec<u8, PREFIX_CAPACITY>,
    prefix_sent: usize,
    payload: &'a [u8],
    fail_fast: bool,
    completion: Option<K>,
}

impl<'a, K> Transaction<'a, K> {
    /// Descriptor with nothing to send
    pub const fn empty() -> Self {
        Self {
            address: 0,
            prefix: Vec::new(),
            prefix_sent: 0,
            payload: &[],
            fail_fast: false,
            completion: None,
        }
    }

    /// Build a descriptor
    ///
    /// Returns [`Error::InvalidParams`] if `prefix` exceeds
    /// [`PREFIX_CAPACITY`].
    pub fn new(
        address: u8,
        prefix: &[u8],
        payload: &'a [u8],
        completion: K,
        fail_fast: bool,
    ) -> Result<Self, Error> {
        let prefix = Vec::from_slice(prefix).map_err(|_| Error::InvalidParams)?;
        Ok(Self {
            address,
            prefix,
            prefix_sent: 0,
            payload,
            fail_fast,
            completion: Some(completion),
        })
    }

    /// 7-bit target address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Address byte as sent on the bus (write direction)
    pub fn address_byte(&self) -> u8 {
        self.address << 1
    }

    /// Fail-fast flag
    ///
    /// Recorded for every transaction but not acted upon: arbitration loss
    /// and NACK are not reported by the controller, so there is nothing to
    /// fail fast on yet.
    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Prefix bytes not yet sent
    pub fn remaining_prefix(&self) -> &[u8] {
        &self.prefix[self.prefix_sent..]
    }

    /// Payload bytes not yet sent
    pub fn remaining_payload(&self) -> &'a [u8] {
        self.payload
    }

    pub(crate) fn has_prefix(&self) -> bool {
        !self.remaining_prefix().is_empty()
    }

    pub(crate) fn has_payload(&self) -> bool {
        !self.payload.is_empty()
    }

    pub(crate) fn next_prefix_byte(&mut self) -> Option<u8> {
        let byte = *self.prefix.get(self.prefix_sent)?;
        self.prefix_sent += 1;
        Some(byte)
    }

    pub(crate) fn next_payload_byte(&mut self) -> Option<u8> {
        let (&byte, rest) = self.payload.split_first()?;
        self.payload = rest;
        Some(byte)
    }

    /// Hand back the completion and let go of the payload borrow
    pub(crate) fn finish(&mut self) -> Option<K> {
        self.payload = &[];
        self.prefix.clear();
        self.prefix_sent = 0;
        self.completion.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_too_long_is_rejected() {
        let prefix = [0u8; PREFIX_CAPACITY + 1];
        let result = Transaction::new(0x3C, &prefix, &[], (), false);
        assert!(matches!(result, Err(Error::InvalidParams)));
    }

    #[test]
    fn test_bytes_are_consumed_in_order() {
        let payload = [1, 2];
        let mut tx = Transaction::new(0x3C, &[0x40], &payload, 7u8, true).unwrap();

        assert_eq!(tx.address_byte(), 0x78);
        assert!(tx.fail_fast());
        assert_eq!(tx.next_prefix_byte(), Some(0x40));
        assert_eq!(tx.next_prefix_byte(), None);
        assert!(!tx.has_prefix());
        assert_eq!(tx.next_payload_byte(), Some(1));
        assert_eq!(tx.remaining_payload(), &[2]);
        assert_eq!(tx.next_payload_byte(), Some(2));
        assert!(!tx.has_payload());
    }

    #[test]
    fn test_finish_takes_completion_once() {
        let payload = [0xAA; 4];
        let mut tx = Transaction::new(0x3C, &[], &payload, 7u8, false).unwrap();

        assert_eq!(tx.finish(), Some(7));
        assert!(tx.remaining_payload().is_empty());
        assert_eq!(tx.finish(), None);
    }
}
