//! An infinite auto-scrolling card carousel for the terminal.
//!
//! Run the binary to launch the demo strip.  Drag it with the mouse;
//! it auto-advances between drags and never runs out of cards.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::deck::Deck;
use crate::core::motion::{Carousel, Direction, EngineEvent, Mode};
use crate::ui::{strip::Strip, theme::Theme};

/// Frame clock period — the terminal's answer to an animation frame.
const FRAME: Duration = Duration::from_millis(30);

/// Below this many columns auto-motion is suspended: there is no room
/// to center anything, so the strip just sits still.
const MIN_ACTIVE_COLS: u16 = 24;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Infinite auto-scrolling card carousel")]
struct Cli {
    /// Motion mode: step or continuous.
    #[arg(long)]
    mode: Option<Mode>,

    /// Scroll direction: forward or backward.
    #[arg(long)]
    direction: Option<Direction>,

    /// Rest time between step advances, in milliseconds.
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Step animation duration, in milliseconds.
    #[arg(long)]
    anim_ms: Option<u64>,

    /// Continuous-mode speed, in columns per second.
    #[arg(long)]
    speed: Option<f64>,

    /// Peek fraction (0–1 of the viewport) keeping neighbours visible.
    #[arg(long)]
    peek: Option<f64>,

    /// Number of cards in the demo deck.
    #[arg(long)]
    cards: Option<usize>,

    /// Start with auto-motion paused.
    #[arg(long)]
    paused: bool,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    /// Layer CLI overrides on top of the loaded config.
    fn apply(&self, cfg: &mut AppConfig) {
        if let Some(mode) = self.mode {
            cfg.motion.mode = mode;
        }
        if let Some(direction) = self.direction {
            cfg.motion.direction = direction;
        }
        if let Some(pause_ms) = self.pause_ms {
            cfg.motion.pause_ms = pause_ms.clamp(200, 60_000);
        }
        if let Some(anim_ms) = self.anim_ms {
            cfg.motion.anim_ms = anim_ms.min(5_000);
        }
        if let Some(speed) = self.speed {
            cfg.motion.speed = speed.clamp(1.0, 200.0);
        }
        if let Some(peek) = self.peek {
            cfg.motion.peek = peek.clamp(0.0, 1.0);
        }
        if let Some(cards) = self.cards {
            cfg.cards = cards.clamp(1, 64);
        }
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load();
    cli.apply(&mut config);

    if cli.save_config {
        config.save()?;
        println!("config saved");
        return Ok(());
    }

    let deck = Deck::demo(config.cards);
    let carousel = Carousel::new(config.motion);
    let mut state = AppState::new(deck, carousel, config);

    let epoch = Instant::now();
    if cli.paused {
        state.carousel.handle(EngineEvent::SetPaused(true), 0);
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(FRAME);

    // ── event loop ────────────────────────────────────────────
    loop {
        // ── draw first ─────────────────────────────────────────
        // Always render before waiting so the strip reflects the
        // latest offset; the measurement taken here feeds the engine
        // before its next tick.
        state.strip_state.offset = state.carousel.offset();
        terminal.draw(|frame| {
            let [strip_area, status_area] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)])
                    .areas(frame.area());
            state.strip_area = strip_area;

            let block = Block::default()
                .title(" marquee ")
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::card_border_style());

            let strip = Strip::new(&state.deck)
                .repeats(state.carousel.repeats())
                .gap(state.config.gap)
                .block(block);
            frame.render_stateful_widget(strip, strip_area, &mut state.strip_state);

            let hint = handler::status_hint(&state);
            let status_text = state.status_message.as_deref().unwrap_or(&hint);
            let status = Paragraph::new(status_text).style(Theme::status_bar_style());
            frame.render_widget(status, status_area);
        })?;

        // Feed the fresh layout sample to the engine, and suspend
        // auto-motion entirely when the terminal is too narrow.
        if let Some(measured) = state.strip_state.take_measured() {
            state.carousel.observe_layout(measured);
        }
        let now_ms = epoch.elapsed().as_millis() as u64;
        let wide_enough = state.strip_area.width >= MIN_ACTIVE_COLS;
        state
            .carousel
            .handle(EngineEvent::SetActive(wide_enough), now_ms);

        // ── wait for the next event, then drain the queue ─────
        // Mouse-move storms coalesce inside the drag controller; the
        // batch drain keeps one redraw per burst instead of per event.
        let Some(event) = events.recv().await else {
            break;
        };
        apply_event(&mut state, event, &epoch);
        while let Ok(event) = events.try_recv() {
            apply_event(&mut state, event, &epoch);
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    state.carousel.teardown();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn apply_event(state: &mut AppState, event: AppEvent, epoch: &Instant) {
    let now_ms = epoch.elapsed().as_millis() as u64;
    match event {
        AppEvent::Key(k) => handler::handle_key(state, k, now_ms),
        AppEvent::Mouse(m) => handler::handle_mouse(state, m, now_ms),
        AppEvent::Resize(_, _) => state.carousel.handle(EngineEvent::Resize, now_ms),
        AppEvent::Tick => state.carousel.handle(EngineEvent::Tick, now_ms),
    }
}
