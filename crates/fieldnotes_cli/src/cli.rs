//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fieldnotes", version, about = "Field notes with photo and GPS attachments")]
pub struct Cli {
    /// SQLite database holding the notes.
    #[arg(long, env = "FIELDNOTES_DB_PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files.
    #[arg(long, env = "FIELDNOTES_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "FIELDNOTES_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Never contact the remote mirror.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Keep notes in memory only; nothing is written to disk.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List notes, newest first. An empty store shows the remote seed page.
    List,
    /// Show one note.
    Show { id: String },
    /// Create a note and mirror it remotely.
    Add(NoteArgs),
    /// Replace the editable fields of a note.
    Edit {
        id: String,
        #[command(flatten)]
        note: NoteArgs,
    },
    /// Delete a note. Deleting an unknown id succeeds.
    Delete { id: String },
    /// Delete every note.
    Clear,
}

#[derive(Debug, Args)]
pub struct NoteArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Local file URI of a photo.
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
}
