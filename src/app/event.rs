//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background
//! task that forwards them over a channel so the main loop stays
//! non-blocking.  The tick doubles as the animation frame clock, so it
//! is paced against a fixed deadline: a storm of mouse-drag events must
//! not starve the frames that actually apply them.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// Frame clock — drives the engine's timers, tweens and coalesced
    /// drag samples.
    Tick,
}

/// Spawns a background task that polls the terminal for events and
/// sends them through the returned channel, emitting a [`AppEvent::Tick`]
/// every `frame` regardless of input pressure.
pub fn spawn_event_reader(frame: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut next_tick = Instant::now() + frame;
        loop {
            // Poll only until the next frame deadline; input events in
            // between are forwarded immediately.
            let timeout = next_tick.saturating_duration_since(Instant::now());
            let has_event = event::poll(timeout).unwrap_or(false);

            if has_event {
                if let Ok(ev) = event::read() {
                    let app_event = match ev {
                        CtEvent::Key(k) => AppEvent::Key(k),
                        CtEvent::Mouse(m) => AppEvent::Mouse(m),
                        CtEvent::Resize(w, h) => AppEvent::Resize(w, h),
                        _ => continue,
                    };
                    if tx.send(app_event).is_err() {
                        break; // receiver dropped
                    }
                }
            }

            if Instant::now() >= next_tick {
                if tx.send(AppEvent::Tick).is_err() {
                    break;
                }
                next_tick = Instant::now() + frame;
            }
        }
    });

    rx
}
