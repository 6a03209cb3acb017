//! Terminal front end for the Field Notes core.

mod cli;

use clap::Parser;
use cli::{Cli, Command, NoteArgs};
use fieldnotes_core::{
    init_logging, AppConfig, HttpMirrorClient, KeyValueStore, Location, MemoryKvStore,
    MirrorClient, MirrorOutcome, Note, NoteDraft, NoteRepository, NoteService, NoteSource,
    SqliteKvStore,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if cli.offline {
        config.mirror.enabled = false;
    }

    if let Some(dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, dir)?;
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        fieldnotes_core::core_version()
    );

    let service = build_service(&config, cli.ephemeral)?;
    execute(&service, cli.command).await
}

fn build_service(config: &AppConfig, ephemeral: bool) -> Result<NoteService, Box<dyn Error>> {
    let kv: Arc<dyn KeyValueStore> = if ephemeral {
        Arc::new(MemoryKvStore::new())
    } else {
        Arc::new(SqliteKvStore::open(&config.db_path)?)
    };
    let mirror: Option<Arc<dyn MirrorClient>> = if config.mirror.enabled {
        Some(Arc::new(HttpMirrorClient::new(&config.mirror)?))
    } else {
        None
    };
    Ok(NoteService::new(NoteRepository::new(kv), mirror))
}

async fn execute(service: &NoteService, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List => {
            let loaded = service.load_notes().await?;
            if loaded.notes.is_empty() {
                println!("No notes yet. Add the first one with `fieldnotes add`.");
            }
            if loaded.source == NoteSource::RemoteSeed {
                println!("(showing remote sample notes; they are not saved locally)");
            }
            for note in &loaded.notes {
                print_summary(note);
            }
        }
        Command::Show { id } => match service.get_note(&id).await {
            Some(note) => print_detail(&note),
            None => return Err(format!("note not found: {id}").into()),
        },
        Command::Add(args) => {
            let created = service.create_note(draft_from(args)).await?;
            println!("created {}", created.note.id);
            match created.mirror {
                MirrorOutcome::Mirrored { remote_id } => println!("mirrored as {remote_id}"),
                MirrorOutcome::Failed(err) => eprintln!("warning: mirror failed: {err}"),
                MirrorOutcome::Disabled => {}
            }
        }
        Command::Edit { id, note } => match service.update_note(&id, draft_from(note)).await? {
            Some(updated) => println!("updated {}", updated.id),
            None => return Err(format!("note not found: {id}").into()),
        },
        Command::Delete { id } => {
            service.delete_note(&id).await?;
            println!("deleted {id}");
        }
        Command::Clear => {
            service.clear_notes().await?;
            println!("all notes deleted");
        }
    }
    Ok(())
}

fn draft_from(args: NoteArgs) -> NoteDraft {
    let mut draft = NoteDraft::new(args.title, args.description);
    draft.image = args.image;
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        draft.location = Some(
            Location::new(lat, lon).with_address_parts(args.street.as_deref(), args.city.as_deref()),
        );
    }
    draft
}

fn print_summary(note: &Note) {
    let when = note
        .created_at()
        .map_or_else(|| note.date.clone(), |at| at.format("%d.%m.%Y %H:%M").to_string());
    println!("{}  {}  {}", note.id, when, note.title);
    if let Some(location) = note.location.as_ref() {
        println!("    location: {}", location.coordinates_label());
    }
    if note.image.is_some() {
        println!("    photo attached");
    }
}

fn print_detail(note: &Note) {
    println!("id:          {}", note.id);
    println!("title:       {}", note.title);
    println!("date:        {}", note.date);
    if !note.description.is_empty() {
        println!("description: {}", note.description);
    }
    if let Some(image) = note.image.as_deref() {
        println!("image:       {image}");
    }
    if let Some(location) = note.location.as_ref() {
        println!("location:    {}", location.coordinates_label());
        if let Some(address) = location.address.as_deref() {
            println!("address:     {address}");
        }
    }
}
