//! Kiln entrypoint.

mod editor;

use anyhow::Result;
use clap::Parser;
use core_config::load_from;
use core_input::TerminalKeys;
use core_render::Screen;
use core_state::Document;
use core_terminal::{CrosstermBackend, TerminalBackend};
use editor::Editor;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Kiln text editor")]
struct Args {
    /// Optional path to open at startup. If omitted an empty buffer is used.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `kiln.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("kiln.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "kiln.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        // Global subscriber already installed; drop the guard so the writer
        // shuts down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// Open the requested file, or an empty buffer carrying the requested name
/// when the file does not exist yet (the first save creates it). Any other
/// read failure aborts startup before the terminal enters raw mode.
fn load_document(args: &Args) -> Result<Document> {
    let Some(path) = args.path.as_ref() else {
        return Ok(Document::new());
    };
    if !path.exists() {
        error!(target: "io", file = %path.display(), "file_missing_starting_empty");
        let mut doc = Document::new();
        doc.set_file_name(path.clone());
        return Ok(doc);
    }
    Document::open(path)
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let mut doc = load_document(&args)?;
    doc.set_status("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find");

    let mut backend = CrosstermBackend::new();
    let (cols, rows) = backend.window_size()?;
    let _guard = backend.enter_guard()?;

    let mut editor = Editor::new(doc, Screen::new(cols, rows), config.editor.quit_warnings);
    editor.run(&mut TerminalKeys)
}
