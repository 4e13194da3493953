//! Bounded FIFO log of recent chat activity, replayed to newcomers.

use std::collections::VecDeque;

use crate::wire::Envelope;

/// Default capacity of the history buffer.
pub const HISTORY_CAPACITY: usize = 100;

/// Bounded, ordered log of persisted messages.
///
/// Insertion order is arrival order. Once the buffer is full the oldest
/// entry is evicted; overflow is not an error.
pub struct History {
    entries: VecDeque<Envelope>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message to the tail, evicting from the head while over
    /// capacity.
    pub fn append(&mut self, envelope: Envelope) {
        self.entries.push_back(envelope);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Iterate buffered messages in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Envelope> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_chat(n: usize) -> Envelope {
        Envelope::chat("ann", format!("message {n}"))
    }

    #[test]
    fn test_append_keeps_arrival_order() {
        // given:
        let mut history = History::new();

        // when:
        for n in 0..3 {
            history.append(numbered_chat(n));
        }

        // then:
        let contents: Vec<_> = history.iter().map(|e| e.content.clone()).collect();
        assert_eq!(contents, vec!["message 0", "message 1", "message 2"]);
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        // given:
        let mut history = History::new();

        // when: 150 sequential messages
        for n in 1..=150 {
            history.append(numbered_chat(n));
        }

        // then: exactly messages 51..=150 remain, in arrival order
        assert_eq!(history.len(), 100);
        let contents: Vec<_> = history.iter().map(|e| e.content.clone()).collect();
        assert_eq!(contents[0], "message 51");
        assert_eq!(contents[99], "message 150");
        for (i, content) in contents.iter().enumerate() {
            assert_eq!(content, &format!("message {}", i + 51));
        }
    }

    #[test]
    fn test_small_capacity_evicts_oldest_first() {
        // given:
        let mut history = History::with_capacity(2);

        // when:
        history.append(numbered_chat(1));
        history.append(numbered_chat(2));
        history.append(numbered_chat(3));

        // then:
        let contents: Vec<_> = history.iter().map(|e| e.content.clone()).collect();
        assert_eq!(contents, vec!["message 2", "message 3"]);
    }
}
