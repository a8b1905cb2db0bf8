//! L1 ↔ L2 Link.
//!
//! The caches never talk to a concrete L2. Every fetch, write-back and
//! invalidate acknowledgement goes through a [`BackingStoreLink`] supplied
//! by the caller. This module provides:
//! 1. **The Link Trait:** The three notifications the engine emits.
//! 2. **Message Type:** `BusMessage`, a recorded notification.
//! 3. **Stock Links:** `NullLink` discards traffic, `MessageLog` records it in order.

use std::fmt;

use serde::Serialize;

/// Why L1 is fetching a block from L2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FetchIntent {
    /// Data load miss.
    Read,
    /// Data store miss; the block is fetched to be written.
    ReadForOwnership,
    /// Instruction fetch miss.
    Instruction,
}

/// Receiver of the synchronization messages the L1 caches send to L2.
///
/// Calls are fire-and-forget: nothing returned by the link feeds back into
/// cache state.
pub trait BackingStoreLink {
    /// L1 requests the block containing `address`.
    fn fetch(&mut self, address: u32, intent: FetchIntent);

    /// L1 writes a dirty block back before discarding it.
    fn writeback(&mut self, address: u32);

    /// L1 acknowledges that it dropped the block named by a back-invalidation.
    fn invalidate_ack(&mut self, address: u32);
}

/// A notification sent over a [`BackingStoreLink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BusMessage {
    /// `fetch(address, intent)`
    Fetch {
        /// Requested address.
        address: u32,
        /// Reason for the fetch.
        intent: FetchIntent,
    },
    /// `writeback(address)`
    Writeback {
        /// Address of the flushed line.
        address: u32,
    },
    /// `invalidate_ack(address)`
    InvalidateAck {
        /// Address named by the back-invalidation.
        address: u32,
    },
}

impl fmt::Display for BusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch {
                address,
                intent: FetchIntent::ReadForOwnership,
            } => write!(f, "Read for Ownership from L2 <{address:#010x}>"),
            Self::Fetch { address, .. } => write!(f, "Read from L2 <{address:#010x}>"),
            Self::Writeback { address } => write!(f, "Write to L2 <{address:#010x}>"),
            Self::InvalidateAck { address } => write!(f, "Invalidate ack to L2 <{address:#010x}>"),
        }
    }
}

/// Link that discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLink;

impl BackingStoreLink for NullLink {
    fn fetch(&mut self, _address: u32, _intent: FetchIntent) {}

    fn writeback(&mut self, _address: u32) {}

    fn invalidate_ack(&mut self, _address: u32) {}
}

/// Link that records every message in arrival order.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    messages: Vec<BusMessage>,
}

impl MessageLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded so far, oldest first.
    pub fn messages(&self) -> &[BusMessage] {
        &self.messages
    }

    /// Removes and returns every recorded message.
    pub fn take(&mut self) -> Vec<BusMessage> {
        std::mem::take(&mut self.messages)
    }

    /// Number of recorded write-backs.
    pub fn writebacks(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| matches!(m, BusMessage::Writeback { .. }))
            .count()
    }

    /// Number of recorded fetches.
    pub fn fetches(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| matches!(m, BusMessage::Fetch { .. }))
            .count()
    }
}

impl BackingStoreLink for MessageLog {
    fn fetch(&mut self, address: u32, intent: FetchIntent) {
        self.messages.push(BusMessage::Fetch { address, intent });
    }

    fn writeback(&mut self, address: u32) {
        self.messages.push(BusMessage::Writeback { address });
    }

    fn invalidate_ack(&mut self, address: u32) {
        self.messages.push(BusMessage::InvalidateAck { address });
    }
}
