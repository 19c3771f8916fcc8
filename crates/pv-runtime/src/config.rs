use std::time::Duration;

/// Configuration for a playback session.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Delay between revealed characters. Zero reveals each line at once.
    pub char_delay: Duration,
    /// Input identifiers that count as an advance signal.
    pub advance_triggers: Vec<String>,
    /// Whether lines may be skipped mid-reveal.
    pub skip_enabled: bool,
    /// Advance automatically this long after a line is fully revealed.
    pub auto_advance: Option<Duration>,
    /// Maximum backlog size (oldest entries dropped when exceeded). 0 = unlimited.
    pub backlog_capacity: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            char_delay: Duration::from_millis(30),
            advance_triggers: vec!["next".to_string(), "submit".to_string()],
            skip_enabled: true,
            auto_advance: None,
            backlog_capacity: 256,
        }
    }
}

impl RunnerConfig {
    /// Set the per-character reveal delay.
    pub fn with_char_delay(mut self, delay: Duration) -> Self {
        self.char_delay = delay;
        self
    }

    /// Replace the set of advance trigger identifiers.
    pub fn with_advance_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.advance_triggers = triggers.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable skipping.
    pub fn with_skip_enabled(mut self, enabled: bool) -> Self {
        self.skip_enabled = enabled;
        self
    }

    /// Turn on auto mode with the given pause after each line.
    pub fn with_auto_advance(mut self, pause: Duration) -> Self {
        self.auto_advance = Some(pause);
        self
    }

    /// Set the maximum backlog size (0 = unlimited).
    pub fn with_backlog_capacity(mut self, capacity: usize) -> Self {
        self.backlog_capacity = capacity;
        self
    }

    /// Returns true if `id` is one of the advance triggers.
    pub fn is_advance_trigger(&self, id: &str) -> bool {
        self.advance_triggers.iter().any(|t| t == id)
    }
}
