use std::collections::VecDeque;

use pv_core::NodeId;

/// One entry in the playback history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BacklogEntry {
    /// A line that was shown.
    Line {
        /// The sentence node.
        node: NodeId,
        /// Speaking character.
        speaker: String,
        /// Full line text.
        text: String,
    },
    /// An answer the player picked.
    Choice {
        /// The answer node.
        node: NodeId,
        /// Slot index that was chosen.
        index: usize,
        /// Button text of the chosen slot.
        text: String,
    },
}

/// Bounded history of shown lines and chosen answers.
#[derive(Debug, Clone, Default)]
pub struct Backlog {
    entries: VecDeque<BacklogEntry>,
    capacity: usize,
}

impl Backlog {
    /// Create a backlog holding at most `capacity` entries (0 = unlimited).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Append an entry, dropping the oldest when over capacity.
    pub fn push(&mut self, entry: BacklogEntry) {
        self.entries.push_back(entry);
        if self.capacity > 0 {
            while self.entries.len() > self.capacity {
                self.entries.pop_front();
            }
        }
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &BacklogEntry> {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&BacklogEntry> {
        self.entries.back()
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> BacklogEntry {
        BacklogEntry::Line {
            node: NodeId::new(),
            speaker: "Alice".into(),
            text: text.into(),
        }
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut backlog = Backlog::new(2);
        for text in ["one", "two", "three"] {
            backlog.push(line(text));
        }
        let texts: Vec<&str> = backlog
            .entries()
            .map(|e| match e {
                BacklogEntry::Line { text, .. } | BacklogEntry::Choice { text, .. } => text.as_str(),
            })
            .collect();
        assert_eq!(texts, vec!["two", "three"]);
    }

    #[test]
    fn zero_capacity_is_unlimited() {
        let mut backlog = Backlog::new(0);
        for i in 0..500 {
            backlog.push(line(&i.to_string()));
        }
        assert_eq!(backlog.len(), 500);
        backlog.clear();
        assert!(backlog.is_empty());
        assert!(backlog.last().is_none());
    }
}
