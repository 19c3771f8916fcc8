//! Dialogue playback for Palaver.
//!
//! A [`DialogueRunner`] walks a [`pv_core::DialogueGraph`] one node at a time.
//! The host feeds it signals (advance, skip, choose, clock ticks) and renders
//! the [`DialogueEvent`]s each call returns. Nothing here blocks: text reveal
//! is a tick-driven task and every wait is simply the absence of a signal.

/// Bounded history of shown lines and chosen answers.
pub mod backlog;
/// Configuration for a playback session.
pub mod config;
/// Error types for the runtime crate.
pub mod error;
/// Events emitted during playback.
pub mod event;
/// Named host callbacks.
pub mod hooks;
/// Character-by-character text reveal.
pub mod reveal;
/// The playback state machine.
pub mod runner;

/// Re-exports of [`backlog::Backlog`] and [`backlog::BacklogEntry`].
pub use backlog::{Backlog, BacklogEntry};
/// Re-export of [`config::RunnerConfig`].
pub use config::RunnerConfig;
/// Re-exports of [`error::RunError`] and [`error::RunResult`].
pub use error::{RunError, RunResult};
/// Re-export of [`event::DialogueEvent`].
pub use event::DialogueEvent;
/// Re-exports of the hook registry types.
pub use hooks::{HookContext, HookPhase, HookRegistry, HookReport};
/// Re-exports of [`reveal::RevealTask`] and [`reveal::RevealState`].
pub use reveal::{RevealState, RevealTask};
/// Re-exports of [`runner::DialogueRunner`] and [`runner::RunnerState`].
pub use runner::{DialogueRunner, RunnerState};
