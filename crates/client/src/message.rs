//! Scrolling battle log shown under the arena.
use std::collections::VecDeque;

use battle_core::LogTone;

/// A single line of the battle log.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageEntry {
    pub text: String,
    pub tone: LogTone,
}

impl MessageEntry {
    pub fn new(text: impl Into<String>, tone: LogTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Circular buffer of messages displayed to the player.
#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<MessageEntry>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
        }
    }

    pub fn push(&mut self, entry: MessageEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn push_text(&mut self, message: impl Into<String>) {
        self.push(MessageEntry::new(message, LogTone::Neutral));
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_when_full() {
        let mut log = MessageLog::new(2);
        log.push_text("You attack!");
        log.push(MessageEntry::new("Perfect!", LogTone::Neutral));
        log.push(MessageEntry::new("Player hits Monster for 15", LogTone::PlayerHit));

        assert_eq!(log.len(), 2);
        let texts: Vec<_> = log.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["Perfect!", "Player hits Monster for 15"]);
    }

    #[test]
    fn recent_is_newest_first() {
        let mut log = MessageLog::new(10);
        for n in 0..5 {
            log.push_text(format!("line {n}"));
        }
        let recent: Vec<_> = log.recent(2).map(|e| e.text.clone()).collect();
        assert_eq!(recent, ["line 4", "line 3"]);
    }

    #[test]
    fn zero_capacity_keeps_one_line() {
        let mut log = MessageLog::new(0);
        assert!(log.is_empty());
        log.push_text("a");
        log.push_text("b");
        assert_eq!(log.len(), 1);
        assert_eq!(log.recent(5).next().map(|e| e.text.as_str()), Some("b"));
    }
}
