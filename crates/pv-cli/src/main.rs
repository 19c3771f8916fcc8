//! CLI frontend for the Palaver dialogue engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pv",
    about = "Palaver: author and play branching dialogue graphs",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a dialogue file with a small sample graph
    Init {
        /// Path of the dialogue file to create
        file: PathBuf,

        /// Dialogue name (default: derived from the file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a dialogue file and report unreachable nodes
    Check {
        /// Dialogue file
        file: PathBuf,
    },

    /// List the nodes of a dialogue
    List {
        /// Dialogue file
        file: PathBuf,
    },

    /// Show detailed information about a node
    Show {
        /// Dialogue file
        file: PathBuf,

        /// Node label (case-insensitive) or id prefix
        node: String,
    },

    /// Display the dialogue as a tree from its first node
    Graph {
        /// Dialogue file
        file: PathBuf,
    },

    /// Append a new node
    Add {
        /// Dialogue file
        file: PathBuf,

        #[command(subcommand)]
        kind: AddKind,
    },

    /// Connect two nodes
    Connect {
        /// Dialogue file
        file: PathBuf,

        /// Source node
        source: String,

        /// Target node
        target: String,
    },

    /// Remove the edge between two nodes
    Disconnect {
        /// Dialogue file
        file: PathBuf,

        /// Source node
        source: String,

        /// Target node
        target: String,
    },

    /// Delete a node and every edge touching it
    Delete {
        /// Dialogue file
        file: PathBuf,

        /// Node to delete
        node: String,
    },

    /// Edit the answer slots of an answer node
    Slot {
        /// Dialogue file
        file: PathBuf,

        #[command(subcommand)]
        action: SlotAction,
    },

    /// Export the dialogue to a different format
    Export {
        /// Dialogue file
        file: PathBuf,

        /// Output format: json, dot, markdown
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Play the dialogue in the terminal
    Play {
        /// Dialogue file
        file: PathBuf,

        /// Delay between revealed characters, in milliseconds
        #[arg(long, default_value = "0")]
        char_delay: u64,

        /// Disable skipping a line while it is being revealed
        #[arg(long)]
        no_skip: bool,

        /// Advance automatically this many milliseconds after each line
        #[arg(long)]
        auto: Option<u64>,
    },
}

#[derive(Subcommand)]
enum AddKind {
    /// A line of dialogue
    Sentence {
        /// Node label
        #[arg(short, long)]
        label: String,

        /// Speaking character
        #[arg(short, long)]
        speaker: String,

        /// Line text
        #[arg(short, long)]
        text: String,

        /// Portrait reference
        #[arg(long)]
        portrait: Option<String>,

        /// Connect the new node after this one
        #[arg(long)]
        after: Option<String>,
    },

    /// A set of player choices
    Answer {
        /// Node label
        #[arg(short, long)]
        label: String,

        /// Answer text (repeat for each slot)
        #[arg(short, long = "answer")]
        answers: Vec<String>,

        /// Speaker shown above the choices
        #[arg(short, long)]
        speaker: Option<String>,

        /// Connect the new node after this one
        #[arg(long)]
        after: Option<String>,
    },
}

#[derive(Subcommand)]
enum SlotAction {
    /// Append a slot
    Add {
        /// Answer node
        node: String,

        /// Answer text (omit to declare an empty slot)
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Remove the last slot, severing its edge
    Remove {
        /// Answer node
        node: String,
    },

    /// Replace the text of a slot
    Set {
        /// Answer node
        node: String,

        /// Slot number, starting at 1
        index: usize,

        /// New answer text
        text: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { file, name, force } => commands::init::run(&file, name.as_deref(), force),
        Commands::Check { file } => commands::check::run(&file),
        Commands::List { file } => commands::list::run(&file),
        Commands::Show { file, node } => commands::show::run(&file, &node),
        Commands::Graph { file } => commands::graph::run(&file),
        Commands::Add { file, kind } => match kind {
            AddKind::Sentence {
                label,
                speaker,
                text,
                portrait,
                after,
            } => commands::add::sentence(
                &file,
                &label,
                &speaker,
                &text,
                portrait.as_deref(),
                after.as_deref(),
            ),
            AddKind::Answer {
                label,
                answers,
                speaker,
                after,
            } => commands::add::answer(
                &file,
                &label,
                &answers,
                speaker.as_deref(),
                after.as_deref(),
            ),
        },
        Commands::Connect {
            file,
            source,
            target,
        } => commands::edit::connect(&file, &source, &target),
        Commands::Disconnect {
            file,
            source,
            target,
        } => commands::edit::disconnect(&file, &source, &target),
        Commands::Delete { file, node } => commands::edit::delete(&file, &node),
        Commands::Slot { file, action } => match action {
            SlotAction::Add { node, text } => commands::slot::add(&file, &node, text.as_deref()),
            SlotAction::Remove { node } => commands::slot::remove(&file, &node),
            SlotAction::Set { node, index, text } => {
                commands::slot::set(&file, &node, index, &text)
            }
        },
        Commands::Export {
            file,
            format,
            output,
        } => commands::export::run(&file, &format, output.as_deref()),
        Commands::Play {
            file,
            char_delay,
            no_skip,
            auto,
        } => commands::play::run(&file, char_delay, !no_skip, auto),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
