//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event
//! handling).

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::deck::Deck;
use crate::core::motion::Carousel;
use crate::ui::strip::StripState;

/// Top-level application state.
pub struct AppState {
    /// The card set shown in the strip.
    pub deck: Deck,
    /// The motion engine driving the scroll offset.
    pub carousel: Carousel,
    /// Widget-level state (offset in, measurement out).
    pub strip_state: StripState,
    /// User configuration.
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Where the strip was drawn last frame, for mouse hit-testing.
    pub strip_area: Rect,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(deck: Deck, carousel: Carousel, config: AppConfig) -> Self {
        Self {
            deck,
            carousel,
            strip_state: StripState::default(),
            config,
            should_quit: false,
            strip_area: Rect::default(),
            status_message: None,
        }
    }
}
