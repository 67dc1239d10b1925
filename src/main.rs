//! wikiscroll — an endless feed of random Wikipedia articles for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ fetch task  ┌──────────┐  state   ┌──────────┐
//! │ source/   │ ◄────────── │ feed.rs  │ ───────► │  ui.rs   │
//! │ (HTTP)    │ ──────────► │ (state)  │          │ (render) │
//! └───────────┘  outcome    └──────────┘          └──────────┘
//!                                ▲  request_next_batch  │ ScrollPosition
//!                                │                      ▼
//!                           ┌──────────┐  input   ┌──────────┐
//!                           │ scroll.rs│ ◄─────── │  app.rs  │
//!                           └──────────┘          └──────────┘
//! ```
//!
//! * **`source/`** — the `ContentProvider` trait, the `Article` record and
//!   the Wikipedia implementation.
//! * **`feed`** — owns the article list and flags; at most one fetch in
//!   flight, stale fetches discarded after a language change.
//! * **`scroll`** — asks for the next batch when the view nears the bottom.
//! * **`app`** — view state (top card, language picker, error timer).
//! * **`ui`** — pure rendering of the current state.
//! * **`input`** — maps key events to `App` actions.
//! * **`config`**, **`logging`**, **`language`** — settings file, log file,
//!   and the fixed language table.

mod app;
mod config;
mod error;
mod feed;
mod input;
mod language;
mod logging;
mod scroll;
mod source;
mod ui;

#[cfg(test)]
mod test_utils;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use app::App;
use feed::FeedController;
use language::{Language, LANGUAGES};
use source::WikipediaSource;

/// Upper bound between passes of the event loop; drives the error timer.
const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(name = "wikiscroll", version, about)]
struct Cli {
    /// Language to start in (e.g. en, fr, ja); overrides the config file.
    #[arg(short, long)]
    language: Option<String>,

    /// Path to the config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the supported language codes and exit.
    #[arg(long)]
    list_languages: bool,
}

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Enters raw mode + alternate screen on construction and restores the
/// terminal when dropped, normally or while unwinding.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default hook prints the panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_languages {
        for lang in LANGUAGES {
            println!("{:<6} {} ({})", lang.code, lang.label(), lang.region.label());
        }
        return Ok(());
    }

    logging::init()?;
    let settings = config::load_settings(cli.config.as_deref());

    let language = match cli.language.as_deref() {
        Some(code) => match Language::from_code(code) {
            Some(lang) => lang,
            None => bail!("unsupported language {code:?} (see --list-languages)"),
        },
        None => settings.start_language(),
    };
    info!("Starting feed in {}", language.code);

    let provider = Arc::new(WikipediaSource::new(&settings)?);
    let feed = FeedController::new(provider, language);
    let mut app = App::new(feed, settings.error_timeout());

    install_panic_hook();
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Each pass:
    //   1. Apply finished fetches, publish the scroll position, expire errors.
    //   2. Render, if the feed changed or the view was touched.
    //   3. Wait for a key, a fetch outcome or the next tick.
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_RATE);
    let mut revision = app.feed.subscribe();
    let mut needs_redraw = true;

    while !app.quit {
        app.tick(Instant::now());

        if needs_redraw || revision.has_changed().unwrap_or(false) {
            revision.borrow_and_update();
            guard.terminal.draw(|f| ui::draw(&mut app, f))?;
            needs_redraw = false;
        }

        let event = tokio::select! {
            _ = ticker.tick() => None,
            _ = app.feed.next_outcome() => None,
            event = events.next() => match event {
                Some(event) => Some(event?),
                None => break,
            },
        };

        match event {
            Some(Event::Key(key)) => {
                input::handle_key_event(&mut app, key);
                needs_redraw = true;
            }
            Some(Event::Resize(..)) => needs_redraw = true,
            _ => {}
        }
    }

    app.shutdown();
    info!("Exiting after {} articles", app.state().articles.len());
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
