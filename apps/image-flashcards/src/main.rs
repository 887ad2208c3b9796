//! Image Flashcards - Page through problem/solution image pairs by range.

mod app;
mod config;
mod logging;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use config::Config;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flashcard_deck::{load_pairs, DeckSession};
use logging::LogConfig;
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use tracing::{error, info};

/// Review problem/solution image flashcards.
#[derive(Debug, Parser)]
#[command(name = "image-flashcards", version, about)]
struct Args {
    /// Folder containing `front/` and `back/` image directories.
    data_dir: Option<PathBuf>,

    /// First card of the initial range (1-based).
    #[arg(long, requires = "end")]
    start: Option<usize>,

    /// Last card of the initial range (inclusive).
    #[arg(long, requires = "start")]
    end: Option<usize>,

    /// Shuffle ranges when they are applied.
    #[arg(long)]
    shuffle: bool,

    /// Path to a config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug`. Overridden by RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref());

    let log_file = config
        .logging
        .file
        .clone()
        .or_else(Config::default_log_path)
        .unwrap_or_else(|| PathBuf::from("image-flashcards.log"));
    let level = args.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    logging::init_logging(&LogConfig::new(level, &log_file))
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let data_folder = args
        .data_dir
        .clone()
        .or_else(|| config.data.folder.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let pairs = match load_pairs(&data_folder, &config.loader_options()) {
        Ok(pairs) => pairs,
        Err(e) => {
            error!(error = %e, "failed to load flashcards");
            eprintln!("Error: {e}");
            eprintln!(
                "Expected image files under {0}/front and {0}/back, e.g. f1.png and b1.png",
                data_folder.display()
            );
            std::process::exit(1);
        }
    };

    let mut app = App::new(DeckSession::new(pairs), config, data_folder);
    if args.shuffle {
        app.shuffle_on = true;
    }
    if let (Some(start), Some(end)) = (args.start, args.end) {
        app.apply_range(start, end);
    }
    info!(cards = app.session.source_len(), "starting session");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "session ended with an error");
    }
    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match (key.code, key.modifiers) {
                (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Ok(()),
                (KeyCode::Char('q'), _) if !app.editing && !app.show_help => return Ok(()),
                _ => app.handle_key(key),
            }
        }
    }
}
