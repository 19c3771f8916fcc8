//! Time-driven, character-by-character text reveal.

use std::time::Duration;

/// Where a reveal task currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Characters are still being revealed.
    Revealing,
    /// Every character was revealed.
    Complete,
    /// The line was skipped before the last character.
    Skipped,
    /// The task was abandoned without finishing.
    Cancelled,
}

impl RevealState {
    /// Returns true once the task can make no further progress.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Revealing)
    }
}

/// Reveals one line of text, driven by an external clock.
///
/// The first character appears as soon as the task begins; each further
/// character waits for `delay` of accumulated tick time.
#[derive(Debug, Clone)]
pub struct RevealTask {
    chars: Vec<char>,
    revealed: usize,
    delay: Duration,
    pending: Duration,
    state: RevealState,
}

impl RevealTask {
    /// Create a task for `text`. Nothing is revealed until [`begin`](Self::begin).
    pub fn new(text: &str, delay: Duration) -> Self {
        Self {
            chars: text.chars().collect(),
            revealed: 0,
            delay,
            pending: Duration::ZERO,
            state: RevealState::Revealing,
        }
    }

    /// Reveal the first character, or the whole line when the delay is zero.
    pub fn begin(&mut self) -> Vec<(usize, char)> {
        if self.state != RevealState::Revealing || self.revealed > 0 {
            return Vec::new();
        }
        let count = if self.delay.is_zero() {
            self.chars.len()
        } else {
            1
        };
        self.reveal(count)
    }

    /// Advance the clock and reveal every character that became due.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<(usize, char)> {
        if self.state != RevealState::Revealing {
            return Vec::new();
        }
        if self.delay.is_zero() {
            return self.reveal(self.chars.len());
        }

        self.pending = self.pending.saturating_add(elapsed);
        let mut due = 0;
        while self.pending >= self.delay && self.revealed + due < self.chars.len() {
            self.pending -= self.delay;
            due += 1;
        }
        self.reveal(due)
    }

    /// Stop revealing and mark the line skipped.
    ///
    /// Returns false if the task had already reached a terminal state.
    pub fn skip(&mut self) -> bool {
        if self.state != RevealState::Revealing {
            return false;
        }
        self.state = RevealState::Skipped;
        true
    }

    /// Abandon the task. Has no effect once it is terminal.
    pub fn cancel(&mut self) {
        if self.state == RevealState::Revealing {
            self.state = RevealState::Cancelled;
        }
    }

    /// Current state.
    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Number of characters revealed so far.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Total characters in the line.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns true for an empty line.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The full line text.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    fn reveal(&mut self, count: usize) -> Vec<(usize, char)> {
        let end = (self.revealed + count).min(self.chars.len());
        let out: Vec<(usize, char)> = (self.revealed..end).map(|i| (i, self.chars[i])).collect();
        self.revealed = end;
        if self.revealed == self.chars.len() {
            self.state = RevealState::Complete;
            self.pending = Duration::ZERO;
        }
        out
    }
}
