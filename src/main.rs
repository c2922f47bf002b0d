//! Terminal runner (default binary).
//!
//! Drives a [`GameSession`] at a fixed tick rate, maps crossterm key events
//! to session commands and draws snapshots through the framebuffer renderer.
//! Logging goes to the file named by `TRIS_LOG` (the terminal belongs to the
//! game), with the level taken from `TRIS_LOG_LEVEL`.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*};

use tris::core::{GameSession, GameSnapshot, Leaderboard, SessionEvent};
use tris::input::{should_quit, InputCommand, KeyMap};
use tris::term::{FlashAnimation, FrameBuffer, GameView, TerminalRenderer, Viewport};
use tris::types::TICK_MS;
use tris::{ScoreStore, Settings};

const LOG_ENV: &str = "TRIS_LOG";
const LOG_LEVEL_ENV: &str = "TRIS_LOG_LEVEL";

fn init_tracing() -> Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", path.to_string_lossy()))?;
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(LevelFilter::from_level(level))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_tracing()?;

    let settings = Settings::from_env()?;
    let store = ScoreStore::from_env();
    let mut leaderboard = store.load()?;

    let mut term = TerminalRenderer::stdout();
    term.enter()?;

    let result = run(&mut term, &settings, &store, &mut leaderboard);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        warn!(error = %err, "runner stopped");
    }
    result
}

fn run(
    term: &mut TerminalRenderer,
    settings: &Settings,
    store: &ScoreStore,
    leaderboard: &mut Leaderboard,
) -> Result<()> {
    let mut session = GameSession::new(settings.session.clone())?;
    let keymap = KeyMap::new(settings.controls.clone(), settings.slide_fast);
    let view = GameView::default();
    let mut flash = FlashAnimation::default();

    let mut snapshot = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut viewport: Option<Viewport> = None;

    let started = Instant::now();
    let tick_duration = Duration::from_millis(u64::from(TICK_MS));
    let mut last_tick = Instant::now();
    info!(seed = settings.session.seed, "runner started");

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let current = Viewport::new(w, h);
        session.snapshot_into(&mut snapshot);
        if snapshot.dirty || flash.is_active() || viewport != Some(current) {
            view.render_flash_into(&snapshot, flash.lit(), current, &mut fb);
            term.draw_swap(&mut fb)?;
            session.mark_rendered();
            viewport = Some(current);
        }

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        info!("quit");
                        return Ok(());
                    }
                    if let Some(command) = keymap.map(key) {
                        session.feed_entropy(started.elapsed().as_millis() as u32);
                        match command {
                            InputCommand::Game(action) => {
                                session.queue_action(action);
                            }
                            InputCommand::TogglePlay => session.toggle_play(),
                            InputCommand::NewGame => {
                                flash = FlashAnimation::default();
                                session.reset()?;
                                session.toggle_play();
                            }
                        }
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.update()?;
            if flash.advance() {
                session.finish_animation();
            }

            for event in session.drain_events() {
                match event {
                    SessionEvent::Animating { .. } => flash.start(),
                    SessionEvent::GameOver { entry } => {
                        if let Some(rank) = leaderboard.record(entry) {
                            info!(rank, total = entry.total, "new leaderboard entry");
                            store.save(leaderboard)?;
                        }
                    }
                    other => debug!(event = other.as_str(), "session event"),
                }
            }
        }
    }
}
