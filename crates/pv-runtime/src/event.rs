use std::fmt;

use pv_core::NodeId;

/// A signal emitted by the runner, returned from each call in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueEvent {
    // Lifecycle
    /// Playback began.
    DialogueStarted,
    /// Playback reached its end.
    DialogueFinished,
    /// The largest slot count over all answer nodes, computed once at start.
    MaxAnswerSlots(usize),

    // Hooks
    /// Activation hooks of a node ran.
    NodeActivatedHooksFired {
        /// The node being entered.
        node: NodeId,
        /// Hook names that had handlers, in firing order.
        fired: Vec<String>,
        /// Hook names with no handler bound.
        unbound: Vec<String>,
    },
    /// Deactivation hooks of a node ran.
    NodeDeactivatedHooksFired {
        /// The node being left.
        node: NodeId,
        /// Hook names that had handlers, in firing order.
        fired: Vec<String>,
        /// Hook names with no handler bound.
        unbound: Vec<String>,
    },

    // Sentences
    /// A sentence node became current.
    SentenceActive {
        /// The sentence node.
        node: NodeId,
        /// Speaking character.
        speaker: String,
        /// Full line text.
        text: String,
        /// Optional portrait reference.
        portrait: Option<String>,
    },
    /// One more character of the current line is visible.
    CharacterRevealed {
        /// Character position within the line.
        index: usize,
        /// The revealed character.
        character: char,
    },
    /// The reveal was cut short; the whole line is visible.
    LineSkipped {
        /// The full line text.
        text: String,
    },

    // Answers
    /// An answer node became current.
    AnswerActive {
        /// The answer node.
        node: NodeId,
        /// Optional speaker shown above the choices.
        speaker: Option<String>,
        /// Optional portrait shown above the choices.
        portrait: Option<String>,
    },
    /// An answer can be offered at `index`.
    AnswerOptionReady {
        /// Slot index.
        index: usize,
        /// Button text.
        text: String,
    },
    /// The button at `index` leads to `node`.
    AnswerButtonSetup {
        /// Slot index.
        index: usize,
        /// The sentence node behind the button.
        node: NodeId,
    },
    /// Number of answers offered at the current answer node.
    MaxActiveAnswers(usize),
}

impl fmt::Display for DialogueEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DialogueStarted => write!(f, "dialogue-started"),
            Self::DialogueFinished => write!(f, "dialogue-finished"),
            Self::MaxAnswerSlots(n) => write!(f, "max-answer-slots {n}"),
            Self::NodeActivatedHooksFired { fired, unbound, .. } => {
                write!(f, "activated-hooks-fired")?;
                write_hooks(f, fired, unbound)
            }
            Self::NodeDeactivatedHooksFired { fired, unbound, .. } => {
                write!(f, "deactivated-hooks-fired")?;
                write_hooks(f, fired, unbound)
            }
            Self::SentenceActive {
                speaker,
                text,
                portrait,
                ..
            } => {
                write!(f, "sentence-active {speaker}: {text}")?;
                if let Some(portrait) = portrait {
                    write!(f, " ({portrait})")?;
                }
                Ok(())
            }
            Self::CharacterRevealed { index, character } => {
                write!(f, "character-revealed {index} {character:?}")
            }
            Self::LineSkipped { text } => write!(f, "line-skipped {text}"),
            Self::AnswerActive { speaker, .. } => match speaker {
                Some(speaker) => write!(f, "answer-active {speaker}"),
                None => write!(f, "answer-active"),
            },
            Self::AnswerOptionReady { index, text } => {
                write!(f, "answer-option-ready {index} {text}")
            }
            Self::AnswerButtonSetup { index, .. } => write!(f, "answer-button-setup {index}"),
            Self::MaxActiveAnswers(n) => write!(f, "max-active-answers {n}"),
        }
    }
}

fn write_hooks(f: &mut fmt::Formatter<'_>, fired: &[String], unbound: &[String]) -> fmt::Result {
    if !fired.is_empty() {
        write!(f, " [{}]", fired.join(", "))?;
    }
    if !unbound.is_empty() {
        write!(f, " unbound [{}]", unbound.join(", "))?;
    }
    Ok(())
}
