//! Input handling — maps key/mouse events to engine events.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::core::motion::{Direction, EngineEvent, Mode};

use super::state::AppState;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent, now_ms: u64) {
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }
    if key.kind == KeyEventKind::Release {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            state.should_quit = true;
        }
        KeyCode::Char(' ') => {
            let paused = !state.carousel.is_paused();
            state.carousel.handle(EngineEvent::SetPaused(paused), now_ms);
            state.status_message = Some(if paused { "paused" } else { "resumed" }.into());
        }
        KeyCode::Char('m') => {
            let mode = match state.carousel.mode() {
                Mode::Step => Mode::Continuous,
                Mode::Continuous => Mode::Step,
            };
            state.carousel.handle(EngineEvent::SetMode(mode), now_ms);
            state.status_message = None;
        }
        KeyCode::Char('d') => {
            let direction = match state.carousel.direction() {
                Direction::Forward => Direction::Backward,
                Direction::Backward => Direction::Forward,
            };
            state
                .carousel
                .handle(EngineEvent::SetDirection(direction), now_ms);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            state.carousel.handle(EngineEvent::Nudge(1), now_ms);
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.carousel.handle(EngineEvent::Nudge(-1), now_ms);
        }
        _ => {}
    }
}

/// Process a mouse event.  Only the primary button drags the strip;
/// presses elsewhere and other buttons are ignored.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now_ms: u64) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !point_in_rect(state.strip_area, mouse.column, mouse.row) {
                return;
            }
            state.carousel.handle(
                EngineEvent::PointerDown {
                    x: f64::from(mouse.column),
                },
                now_ms,
            );
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            state.carousel.handle(
                EngineEvent::PointerMove {
                    x: f64::from(mouse.column),
                },
                now_ms,
            );
        }
        // Release ends the session wherever the pointer ended up, even
        // outside the strip — mouse capture, terminal style.
        MouseEventKind::Up(MouseButton::Left) => {
            state.carousel.handle(EngineEvent::PointerUp, now_ms);
        }
        // Scrolling mid-drag would fight the pointer for the runway.
        MouseEventKind::ScrollRight | MouseEventKind::ScrollDown
            if !state.carousel.is_dragging() =>
        {
            state.carousel.handle(EngineEvent::Nudge(1), now_ms);
        }
        MouseEventKind::ScrollLeft | MouseEventKind::ScrollUp
            if !state.carousel.is_dragging() =>
        {
            state.carousel.handle(EngineEvent::Nudge(-1), now_ms);
        }
        _ => {}
    }
}

fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Build the status-bar hint string.
pub fn status_hint(state: &AppState) -> String {
    let mode = match state.carousel.mode() {
        Mode::Step => "step",
        Mode::Continuous => "continuous",
    };
    let direction = match state.carousel.direction() {
        Direction::Forward => "→",
        Direction::Backward => "←",
    };
    format!(
        "card {}/{} | {mode} {direction} [{}] | drag with mouse | space: pause | m: mode | d: direction | q: quit",
        state.carousel.index() + 1,
        state.deck.len().max(1),
        state.carousel.phase().label()
    )
}
