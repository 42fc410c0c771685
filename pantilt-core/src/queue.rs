//! Bounded output queue
//!
//! Decouples status-line producers from the wireless channel, which is
//! slow and may have no peer attached. Messages accumulate up to the
//! queue capacity; enqueue past capacity drops the new message (never
//! overwrites, never blocks) and drain hands out at most one message per
//! call, gated by peer connectivity and a minimum inter-send interval.

use heapless::Deque;

/// Generic bounded FIFO with throttled draining
#[derive(Debug)]
pub struct OutputQueue<T, const N: usize> {
    entries: Deque<T, N>,
    dropped: u32,
    last_send_ms: u32,
}

impl<T, const N: usize> OutputQueue<T, N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
            dropped: 0,
            last_send_ms: 0,
        }
    }

    /// Append a message, dropping it if the queue is full
    ///
    /// Returns `false` when the message was dropped.
    pub fn enqueue(&mut self, message: T) -> bool {
        if self.entries.push_back(message).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        }
        true
    }

    /// Take the head message if the channel is ready for it
    ///
    /// Ready means: queue non-empty, a peer is attached, and at least
    /// `min_interval_ms` elapsed since the previous successful drain.
    pub fn drain_if_ready(&mut self, now_ms: u32, has_peer: bool, min_interval_ms: u32) -> Option<T> {
        if self.entries.is_empty() || !has_peer {
            return None;
        }
        if now_ms.wrapping_sub(self.last_send_ms) < min_interval_ms {
            return None;
        }
        let message = self.entries.pop_front()?;
        self.last_send_ms = now_ms;
        Some(message)
    }

    /// Number of queued messages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of queued messages
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Messages dropped because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<T, const N: usize> Default for OutputQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_past_capacity_drops_newest() {
        let mut queue: OutputQueue<u32, 50> = OutputQueue::new();
        for i in 0..51 {
            queue.enqueue(i);
        }

        assert_eq!(queue.len(), 50);
        assert_eq!(queue.dropped(), 1);

        // The 50 retained messages are the first 50, in FIFO order;
        // the 51st is gone for good.
        let mut now = 1_000;
        for expected in 0..50 {
            let msg = queue.drain_if_ready(now, true, 200);
            assert_eq!(msg, Some(expected));
            now += 200;
        }
        assert!(queue.is_empty());
        assert_eq!(queue.drain_if_ready(now, true, 200), None);
    }

    #[test]
    fn test_drain_requires_peer() {
        let mut queue: OutputQueue<u32, 4> = OutputQueue::new();
        queue.enqueue(7);

        assert_eq!(queue.drain_if_ready(1_000, false, 200), None);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain_if_ready(1_000, true, 200), Some(7));
    }

    #[test]
    fn test_drain_is_throttled() {
        let mut queue: OutputQueue<u32, 4> = OutputQueue::new();
        queue.enqueue(1);
        queue.enqueue(2);

        assert_eq!(queue.drain_if_ready(500, true, 200), Some(1));
        // Too soon after the previous send
        assert_eq!(queue.drain_if_ready(600, true, 200), None);
        assert_eq!(queue.drain_if_ready(700, true, 200), Some(2));
    }

    #[test]
    fn test_messages_survive_peer_loss() {
        let mut queue: OutputQueue<u32, 4> = OutputQueue::new();
        queue.enqueue(1);
        queue.enqueue(2);

        // No peer for a long stretch; nothing is lost
        for t in (0..10_000).step_by(500) {
            assert_eq!(queue.drain_if_ready(t, false, 200), None);
        }
        assert_eq!(queue.drain_if_ready(10_000, true, 200), Some(1));
    }
}
