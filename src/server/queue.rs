//! Per-connection outbound queue.

use std::collections::VecDeque;

/// An ordered sequence of byte payloads waiting to be written to one
/// connection.
///
/// The queue is created when a connection is accepted and dropped when it
/// is closed. Handlers only ever push into it.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    payloads: VecDeque<Vec<u8>>,
}

impl OutboundQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a payload.
    pub fn push(&mut self, payload: impl Into<Vec<u8>>) {
        self.payloads.push_back(payload.into());
    }

    /// Take the oldest payload, if any. Never blocks.
    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.payloads.pop_front()
    }

    /// The number of queued payloads.
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Returns whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}
