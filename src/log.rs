use std::collections::VecDeque;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum number of retained entries; older ones are dropped.
pub const LOG_CAPACITY: usize = 100;

/// Who an event is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Player(usize),
    System,
}

/// One audit record: turn-tagged, timestamped, human-readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEntry {
    pub turn: u32,
    pub actor: Actor,
    pub message: String,
    pub timestamp_ms: u64,
}

impl fmt::Display for EventEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[T{}] {}", self.turn, self.message)
    }
}

/// Append-only record of every mutation, capped to the most recent
/// [`LOG_CAPACITY`] entries. Read-only to external consumers.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: VecDeque<EventEntry>,
    total_appended: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, turn: u32, actor: Actor, message: String) {
        if self.entries.len() == LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(EventEntry { turn, actor, message, timestamp_ms: now_ms() });
        self.total_appended += 1;
    }

    /// Lifetime append count, including entries the cap has dropped.
    pub fn total_appended(&self) -> u64 {
        self.total_appended
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &EventEntry> {
        self.entries.iter()
    }

    /// The most recent `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<&EventEntry> {
        let start = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(start).collect()
    }
}

fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_caps_at_capacity() {
        let mut log = EventLog::new();
        for i in 0..150u32 {
            log.push(i, Actor::System, format!("event {i}"));
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log.entries().next().unwrap().message, "event 50");
        assert_eq!(log.recent(1)[0].message, "event 149");
    }

    #[test]
    fn recent_returns_oldest_first() {
        let mut log = EventLog::new();
        for i in 0..5u32 {
            log.push(1, Actor::Player(0), format!("e{i}"));
        }
        let last3: Vec<_> = log.recent(3).iter().map(|e| e.message.clone()).collect();
        assert_eq!(last3, vec!["e2", "e3", "e4"]);
    }

    #[test]
    fn recent_with_more_than_len_returns_all() {
        let mut log = EventLog::new();
        log.push(1, Actor::System, "only".into());
        assert_eq!(log.recent(10).len(), 1);
    }
}
