use std::time::Duration;

use pv_core::{DialogueGraph, GraphError, Node, NodeId, NodeKind};

use crate::backlog::{Backlog, BacklogEntry};
use crate::config::RunnerConfig;
use crate::error::{RunError, RunResult};
use crate::event::DialogueEvent;
use crate::hooks::{HookPhase, HookRegistry};
use crate::reveal::{RevealState, RevealTask};

/// Where the runner is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Not started, or stopped by the host.
    Idle,
    /// Showing a line; waiting for the reveal and then for an advance.
    AtSentence,
    /// Offering answers; waiting for a choice.
    AtAnswer,
    /// Playback reached its end. A fresh `start` may follow.
    Finished,
}

impl RunnerState {
    /// Returns true while a node is current.
    pub fn is_running(self) -> bool {
        matches!(self, Self::AtSentence | Self::AtAnswer)
    }
}

/// Plays a dialogue graph one node at a time.
///
/// The runner borrows the graph for the whole playback, so the graph cannot
/// be edited while it is being played. Every inbound call returns the events
/// it produced, in emission order.
#[derive(Debug)]
pub struct DialogueRunner<'g> {
    config: RunnerConfig,
    hooks: HookRegistry,
    backlog: Backlog,
    graph: Option<&'g DialogueGraph>,
    current: Option<NodeId>,
    state: RunnerState,
    line_skipped: bool,
    max_answer_slots: usize,
    active_answers: usize,
    reveal: Option<RevealTask>,
    idle: Duration,
}

impl<'g> DialogueRunner<'g> {
    /// Create an idle runner.
    pub fn new(config: RunnerConfig) -> Self {
        let backlog = Backlog::new(config.backlog_capacity);
        Self {
            config,
            hooks: HookRegistry::new(),
            backlog,
            graph: None,
            current: None,
            state: RunnerState::Idle,
            line_skipped: false,
            max_answer_slots: 0,
            active_answers: 0,
            reveal: None,
            idle: Duration::ZERO,
        }
    }

    /// Use the given hook registry.
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    /// Mutable access to the hook registry, for binding handlers.
    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// The configuration this runner was built with.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Returns true while a node is current.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// The node being played, if any.
    pub fn current_node(&self) -> Option<&'g Node> {
        self.graph?.get(self.current?)
    }

    /// Largest slot count over all answer nodes, computed at start.
    pub fn max_answer_slots(&self) -> usize {
        self.max_answer_slots
    }

    /// Number of answers offered at the current answer node.
    pub fn active_answers(&self) -> usize {
        self.active_answers
    }

    /// State of the most recent reveal task.
    pub fn reveal_state(&self) -> Option<RevealState> {
        self.reveal.as_ref().map(RevealTask::state)
    }

    /// Returns true if the current line was skipped.
    pub fn line_skipped(&self) -> bool {
        self.line_skipped
    }

    /// History of shown lines and chosen answers.
    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    // -----------------------------------------------------------------------
    // Inbound signals
    // -----------------------------------------------------------------------

    /// Begin playback at the graph's first node.
    ///
    /// An empty graph is rejected and the runner keeps its previous state.
    pub fn start(&mut self, graph: &'g DialogueGraph) -> RunResult<Vec<DialogueEvent>> {
        let Ok(first) = graph.first_node() else {
            tracing::warn!(dialogue = %graph.meta.name, "cannot start an empty dialogue");
            return Err(RunError::EmptyGraph);
        };

        self.cancel_reveal();
        self.graph = Some(graph);
        self.current = None;
        self.active_answers = 0;
        self.max_answer_slots = graph.max_answer_slots();
        self.backlog.clear();
        tracing::debug!(
            dialogue = %graph.meta.name,
            nodes = graph.node_count(),
            "dialogue started"
        );

        let mut events = vec![
            DialogueEvent::DialogueStarted,
            DialogueEvent::MaxAnswerSlots(self.max_answer_slots),
        ];
        self.enter(first, &mut events);
        Ok(events)
    }

    /// Move past the current line.
    ///
    /// While the line is still revealing this skips it instead (when skipping
    /// is enabled). Ignored at answer nodes, which wait for [`choose`](Self::choose).
    pub fn advance(&mut self) -> RunResult<Vec<DialogueEvent>> {
        match self.state {
            RunnerState::AtSentence => {}
            RunnerState::AtAnswer => return Ok(Vec::new()),
            RunnerState::Idle | RunnerState::Finished => return Err(RunError::NotRunning),
        }

        if self.is_revealing() {
            if self.config.skip_enabled {
                return Ok(self.skip_line());
            }
            return Ok(Vec::new());
        }

        let (graph, node) = self.current_pair()?;
        let next = match node.as_sentence().and_then(|s| s.child) {
            Some(id) => Some(graph.get(id).ok_or(GraphError::NodeNotFound(id))?),
            None => None,
        };

        let mut events = vec![self.fire(
            node,
            HookPhase::Deactivated,
            node.on_deactivated.as_slice(),
        )];
        match next {
            Some(next) => self.enter(next, &mut events),
            None => self.finish(&mut events),
        }
        Ok(events)
    }

    /// Reveal the rest of the current line at once.
    pub fn skip(&mut self) -> RunResult<Vec<DialogueEvent>> {
        if !self.state.is_running() {
            return Err(RunError::NotRunning);
        }
        if !self.config.skip_enabled {
            return Ok(Vec::new());
        }
        Ok(self.skip_line())
    }

    /// Pick one of the offered answers.
    pub fn choose(&mut self, index: usize) -> RunResult<Vec<DialogueEvent>> {
        match self.state {
            RunnerState::AtAnswer => {}
            RunnerState::AtSentence => return Err(RunError::NotWaitingForChoice),
            RunnerState::Idle | RunnerState::Finished => return Err(RunError::NotRunning),
        }

        let active = self.active_answers;
        let invalid = RunError::InvalidChoice { index, active };
        if index >= active {
            return Err(invalid);
        }

        let (graph, node) = self.current_pair()?;
        let answer = node.as_answer().ok_or(RunError::NotWaitingForChoice)?;
        let target_id = answer.child_at(index).ok_or(invalid)?;
        let target = graph
            .get(target_id)
            .ok_or(GraphError::NodeNotFound(target_id))?;
        let text = answer
            .slots
            .get(index)
            .and_then(Option::as_ref)
            .map(|slot| slot.text.clone())
            .unwrap_or_default();

        tracing::debug!(node = %node.id, index, "answer chosen");
        let mut events = vec![self.fire(
            node,
            HookPhase::Deactivated,
            node.on_deactivated.as_slice(),
        )];
        self.backlog.push(BacklogEntry::Choice {
            node: node.id,
            index,
            text,
        });
        self.enter(target, &mut events);
        Ok(events)
    }

    /// Let time pass. Drives the reveal and, in auto mode, advancing.
    ///
    /// Ticks outside a sentence produce nothing.
    pub fn tick(&mut self, elapsed: Duration) -> RunResult<Vec<DialogueEvent>> {
        if self.state != RunnerState::AtSentence {
            return Ok(Vec::new());
        }

        if let Some(task) = self
            .reveal
            .as_mut()
            .filter(|t| t.state() == RevealState::Revealing)
        {
            return Ok(revealed_events(task.tick(elapsed)));
        }

        match self.config.auto_advance {
            Some(pause) => {
                self.idle = self.idle.saturating_add(elapsed);
                if self.idle >= pause {
                    self.advance()
                } else {
                    Ok(Vec::new())
                }
            }
            None => Ok(Vec::new()),
        }
    }

    /// Map an input identifier onto [`advance`](Self::advance).
    ///
    /// Identifiers that are not advance triggers are ignored.
    pub fn trigger(&mut self, id: &str) -> RunResult<Vec<DialogueEvent>> {
        if self.config.is_advance_trigger(id) {
            self.advance()
        } else {
            Ok(Vec::new())
        }
    }

    /// Abandon playback. The reveal is cancelled and nothing more is emitted.
    pub fn stop(&mut self) {
        self.cancel_reveal();
        self.graph = None;
        self.current = None;
        self.active_answers = 0;
        self.state = RunnerState::Idle;
        tracing::debug!("dialogue stopped");
    }

    // -----------------------------------------------------------------------
    // Node handlers
    // -----------------------------------------------------------------------

    fn enter(&mut self, node: &'g Node, events: &mut Vec<DialogueEvent>) {
        self.cancel_reveal();
        self.current = Some(node.id);
        self.idle = Duration::ZERO;

        match &node.kind {
            NodeKind::Sentence(s) => {
                tracing::debug!(node = %node.id, label = %node.label, "entering sentence");
                self.state = RunnerState::AtSentence;
                self.line_skipped = false;
                self.active_answers = 0;

                events.push(self.fire(node, HookPhase::Activated, node.on_activated.as_slice()));
                events.push(DialogueEvent::SentenceActive {
                    node: node.id,
                    speaker: s.sentence.speaker.clone(),
                    text: s.sentence.text.clone(),
                    portrait: s.sentence.portrait.clone(),
                });
                self.backlog.push(BacklogEntry::Line {
                    node: node.id,
                    speaker: s.sentence.speaker.clone(),
                    text: s.sentence.text.clone(),
                });

                let mut task = RevealTask::new(&s.sentence.text, self.config.char_delay);
                events.extend(revealed_events(task.begin()));
                self.reveal = Some(task);
            }
            NodeKind::Answer(a) => {
                tracing::debug!(node = %node.id, label = %node.label, "entering answer");
                self.state = RunnerState::AtAnswer;

                events.push(DialogueEvent::AnswerActive {
                    node: node.id,
                    speaker: a.speaker.clone(),
                    portrait: a.portrait.clone(),
                });

                let slot_hooks = a.slots.iter().flatten().flat_map(|slot| slot.hooks.iter());
                let names: Vec<&str> = node
                    .on_activated
                    .iter()
                    .chain(slot_hooks)
                    .map(String::as_str)
                    .collect();
                events.push(self.fire(node, HookPhase::Activated, names.as_slice()));

                let active = a.active_prefix();
                for index in 0..active {
                    if let (Some(slot), Some(child)) = (&a.slots[index], a.child_at(index)) {
                        events.push(DialogueEvent::AnswerOptionReady {
                            index,
                            text: slot.text.clone(),
                        });
                        events.push(DialogueEvent::AnswerButtonSetup { index, node: child });
                    }
                }
                self.active_answers = active;

                if active == 0 {
                    tracing::debug!(node = %node.id, "no answers to offer");
                    self.finish(events);
                } else {
                    events.push(DialogueEvent::MaxActiveAnswers(active));
                }
            }
        }
    }

    fn finish(&mut self, events: &mut Vec<DialogueEvent>) {
        self.cancel_reveal();
        self.graph = None;
        self.current = None;
        self.active_answers = 0;
        self.state = RunnerState::Finished;
        tracing::debug!("dialogue finished");
        events.push(DialogueEvent::DialogueFinished);
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn current_pair(&self) -> RunResult<(&'g DialogueGraph, &'g Node)> {
        let graph = self.graph.ok_or(RunError::NotRunning)?;
        let id = self.current.ok_or(RunError::NotRunning)?;
        let node = graph.get(id).ok_or(GraphError::NodeNotFound(id))?;
        Ok((graph, node))
    }

    fn fire<S: AsRef<str>>(&mut self, node: &Node, phase: HookPhase, names: &[S]) -> DialogueEvent {
        let report = self.hooks.fire(names, node.id, phase);
        match phase {
            HookPhase::Activated => DialogueEvent::NodeActivatedHooksFired {
                node: node.id,
                fired: report.fired,
                unbound: report.unbound,
            },
            HookPhase::Deactivated => DialogueEvent::NodeDeactivatedHooksFired {
                node: node.id,
                fired: report.fired,
                unbound: report.unbound,
            },
        }
    }

    fn is_revealing(&self) -> bool {
        self.reveal_state() == Some(RevealState::Revealing)
    }

    fn skip_line(&mut self) -> Vec<DialogueEvent> {
        let Some(task) = self.reveal.as_mut() else {
            return Vec::new();
        };
        if !task.skip() {
            return Vec::new();
        }
        self.line_skipped = true;
        self.idle = Duration::ZERO;
        vec![DialogueEvent::LineSkipped { text: task.text() }]
    }

    fn cancel_reveal(&mut self) {
        if let Some(task) = self.reveal.as_mut() {
            task.cancel();
        }
    }
}

fn revealed_events(chars: Vec<(usize, char)>) -> Vec<DialogueEvent> {
    chars
        .into_iter()
        .map(|(index, character)| DialogueEvent::CharacterRevealed { index, character })
        .collect()
}
