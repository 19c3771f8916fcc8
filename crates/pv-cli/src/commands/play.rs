//! Interactive playback on stdin/stdout.
//!
//! Input per line: empty or `next` advances, `skip` skips the reveal, a
//! number picks an answer, `log` prints the backlog, `quit` stops. Anything
//! else is passed to the runner as a trigger identifier.
//!
//! Input is read on its own thread so a line typed while text is still being
//! revealed reaches the runner mid-reveal.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use colored::Colorize;
use pv_core::DialogueGraph;
use pv_runtime::{
    BacklogEntry, DialogueEvent, DialogueRunner, RevealState, RunError, RunnerConfig, RunnerState,
};

pub fn run(
    path: &Path,
    char_delay: u64,
    skip_enabled: bool,
    auto: Option<u64>,
) -> Result<(), String> {
    let graph = super::load(path)?;

    let delay = Duration::from_millis(char_delay);
    let pause = auto.map(Duration::from_millis);
    let mut config = RunnerConfig::default()
        .with_char_delay(delay)
        .with_skip_enabled(skip_enabled);
    if let Some(pause) = pause {
        config = config.with_auto_advance(pause);
    }

    let mut runner = DialogueRunner::new(config);
    let mut screen = Screen::new(&graph);

    let events = runner.start(&graph).map_err(|e| e.to_string())?;
    screen.show(&events, &runner);

    let input = spawn_reader();
    let mut input_open = true;

    while runner.is_running() {
        // Time only passes for the runner while a line is revealing, or
        // while auto mode counts down after it.
        let revealing = runner.reveal_state() == Some(RevealState::Revealing);
        let wait = if revealing {
            Some(delay)
        } else if runner.state() == RunnerState::AtSentence {
            pause
        } else {
            None
        };

        if wait.is_none() {
            screen.prompt(&runner);
        }

        let line = match (wait, input_open) {
            (Some(wait), true) => match input.recv_timeout(wait) {
                Ok(line) => Some(line),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => {
                    input_open = false;
                    continue;
                }
            },
            (Some(wait), false) => {
                thread::sleep(wait);
                None
            }
            (None, true) => input.recv().ok(),
            (None, false) => None,
        };

        let Some(line) = line else {
            if let Some(wait) = wait {
                let events = runner.tick(wait).map_err(|e| e.to_string())?;
                screen.show(&events, &runner);
                continue;
            }
            runner.stop();
            break;
        };
        let line = line.map_err(|e| format!("cannot read input: {e}"))?;

        let result = match line.trim() {
            "" | "next" => runner.advance(),
            "skip" if !runner.config().skip_enabled => {
                screen.note("skipping is disabled");
                continue;
            }
            "skip" => runner.skip(),
            "quit" | "q" => {
                runner.stop();
                screen.close_line();
                println!("  {}", "Stopped.".dimmed());
                break;
            }
            "log" | "backlog" => {
                screen.backlog(&runner);
                continue;
            }
            input => match input.parse::<usize>() {
                Ok(0) => Err(RunError::InvalidChoice {
                    index: 0,
                    active: runner.active_answers(),
                }),
                Ok(n) => runner.choose(n - 1),
                Err(_) => runner.trigger(input),
            },
        };

        match result {
            Ok(events) => screen.show(&events, &runner),
            Err(RunError::InvalidChoice { active, .. }) => {
                screen.note_error(&format!("choose a number from 1 to {active}"));
            }
            Err(e) => screen.note_error(&e.to_string()),
        }
    }

    Ok(())
}

/// Forward stdin lines over a channel. The channel closes at end of input.
fn spawn_reader() -> Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Renders runner events as terminal text.
struct Screen<'a> {
    graph: &'a DialogueGraph,
    /// A line is being printed and has not been terminated yet.
    open: bool,
    /// Characters of the current sentence printed so far.
    shown: usize,
}

impl<'a> Screen<'a> {
    fn new(graph: &'a DialogueGraph) -> Self {
        Self {
            graph,
            open: false,
            shown: 0,
        }
    }

    fn show(&mut self, events: &[DialogueEvent], runner: &DialogueRunner<'_>) {
        for event in events {
            match event {
                DialogueEvent::DialogueStarted => {
                    println!("  {}", self.graph.meta.name.bold().underline());
                    println!();
                }
                DialogueEvent::DialogueFinished => {
                    self.close_line();
                    println!();
                    println!("  {}", "The end.".dimmed());
                }
                DialogueEvent::NodeActivatedHooksFired { fired, unbound, .. }
                | DialogueEvent::NodeDeactivatedHooksFired { fired, unbound, .. } => {
                    if !fired.is_empty() || !unbound.is_empty() {
                        self.close_line();
                        let names: Vec<&str> =
                            fired.iter().chain(unbound).map(String::as_str).collect();
                        println!("  {}", format!("[{}]", names.join(", ")).dimmed());
                    }
                }
                DialogueEvent::SentenceActive { speaker, .. } => {
                    self.close_line();
                    print!("  {}: ", speaker.bold());
                    self.open = true;
                    self.shown = 0;
                }
                DialogueEvent::CharacterRevealed { character, .. } => {
                    print!("{character}");
                    self.open = true;
                    self.shown += 1;
                }
                DialogueEvent::LineSkipped { text } => {
                    let rest: String = text.chars().skip(self.shown).collect();
                    print!("{rest}");
                    self.open = true;
                    self.shown += rest.chars().count();
                }
                DialogueEvent::AnswerActive { speaker, .. } => {
                    self.close_line();
                    if let Some(speaker) = speaker {
                        println!("  {}", format!("{speaker}:").bold());
                    }
                }
                DialogueEvent::AnswerOptionReady { index, text } => {
                    println!("    [{}] {text}", index + 1);
                }
                DialogueEvent::MaxActiveAnswers(_)
                | DialogueEvent::MaxAnswerSlots(_)
                | DialogueEvent::AnswerButtonSetup { .. } => {}
            }
        }

        if runner.reveal_state() != Some(RevealState::Revealing) {
            self.close_line();
        }
        let _ = io::stdout().flush();
    }

    fn prompt(&mut self, runner: &DialogueRunner<'_>) {
        self.close_line();
        if runner.state() == RunnerState::AtAnswer {
            print!("  choose 1-{} > ", runner.active_answers());
        } else {
            print!("  > ");
        }
        let _ = io::stdout().flush();
    }

    fn note(&mut self, message: &str) {
        self.close_line();
        println!("  {}", message.dimmed());
    }

    fn note_error(&mut self, message: &str) {
        self.close_line();
        println!("  {}", message.red());
    }

    fn backlog(&mut self, runner: &DialogueRunner<'_>) {
        self.close_line();
        println!("  {}", "Backlog:".dimmed());
        for entry in runner.backlog().entries() {
            match entry {
                BacklogEntry::Line { speaker, text, .. } => println!("    {speaker}: {text}"),
                BacklogEntry::Choice { text, .. } => println!("    > {text}"),
            }
        }
    }

    fn close_line(&mut self) {
        if self.open {
            println!();
            self.open = false;
        }
    }
}
