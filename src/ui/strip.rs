//! The carousel strip widget.
//!
//! Renders the duplicated runway of cards clipped to the viewport,
//! shifted left by the live scroll offset, and records the layout it
//! actually produced (viewport width, per-card extents) into its state.
//! That sample is the geometry engine's input — the terminal analogue
//! of reading rendered element boundaries — so measurement always
//! reflects what is on screen, never what the deck *should* look like.
//!
//! Cards are drawn cell by cell rather than as nested widgets so a card
//! half off either viewport edge clips cleanly instead of dragging its
//! border with it.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::deck::{Card, Deck};
use crate::core::geometry::{self, Measured};

use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the strip (scroll offset in, measurement out).
#[derive(Debug, Default)]
pub struct StripState {
    /// Live scroll offset in content columns; the host copies this from
    /// the engine before each draw.
    pub offset: f64,
    /// Layout sample produced by the last render.
    measured: Option<Measured>,
}

impl StripState {
    /// Hand the last render's layout sample to the engine.
    pub fn take_measured(&mut self) -> Option<Measured> {
        self.measured.take()
    }
}

// ───────────────────────────────────────── widget ────────────

/// The strip itself — created fresh each frame.
pub struct Strip<'a> {
    deck: &'a Deck,
    /// How many copies of the set form the rendered runway.
    repeats: usize,
    /// Columns of spacing after each card.
    gap: u16,
    block: Option<Block<'a>>,
}

impl<'a> Strip<'a> {
    pub fn new(deck: &'a Deck) -> Self {
        Self {
            deck,
            repeats: 3,
            gap: 2,
            block: None,
        }
    }

    pub fn repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats.max(1);
        self
    }

    pub fn gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Leading edges and widths for one set, in content columns.
    fn extents(&self) -> Vec<(f64, f64)> {
        let mut lead = 0.0;
        self.deck
            .cards
            .iter()
            .map(|c| {
                let e = (lead, f64::from(c.width));
                lead += f64::from(c.width + self.gap);
                e
            })
            .collect()
    }
}

impl<'a> StatefulWidget for Strip<'a> {
    type State = StripState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let extents = self.extents();
        let measured = Measured {
            viewport_w: f64::from(inner.width),
            extents: extents.clone(),
            gap: f64::from(self.gap),
        };
        let geo = geometry::measure(&measured, 0.0);
        state.measured = Some(measured);

        // A card needs at least its two border rows plus one interior.
        if inner.width == 0 || inner.height < 3 || self.deck.is_empty() {
            return;
        }
        let Some(geo) = geo else {
            return;
        };
        let set_width = geo.set_width;

        let card_h = inner.height.clamp(3, 7);
        let card_y = inner.y + (inner.height - card_h) / 2;
        let view_center = state.offset + f64::from(inner.width) / 2.0;

        for rep in 0..self.repeats {
            for (card, &(lead, w)) in self.deck.cards.iter().zip(&extents) {
                let content_x = rep as f64 * set_width + lead;
                let screen_x = (content_x - state.offset).round() as i32;
                if screen_x + w as i32 <= 0 || screen_x >= i32::from(inner.width) {
                    continue;
                }
                let centered = (content_x + w / 2.0 - view_center).abs() < w / 2.0;
                draw_card(buf, inner, screen_x, card_y, card_h, card, centered);
            }
        }
    }
}

/// Draw one card cell by cell, clipping to the viewport columns.
fn draw_card(
    buf: &mut Buffer,
    inner: Rect,
    screen_x: i32,
    y: u16,
    h: u16,
    card: &Card,
    centered: bool,
) {
    let w = card.width;
    let border = if centered {
        Theme::centered_border_style()
    } else {
        Theme::card_border_style()
    };

    for dy in 0..h {
        for dx in 0..w {
            let sx = screen_x + i32::from(dx);
            if sx < i32::from(inner.x) || sx >= i32::from(inner.x) + i32::from(inner.width) {
                continue;
            }
            let (ch, style) = card_cell(card, dx, dy, w, h, border);
            if let Some(cell) = buf.cell_mut((sx as u16, y + dy)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }
}

/// Character and style for cell `(dx, dy)` of a `w × h` card.
fn card_cell(card: &Card, dx: u16, dy: u16, w: u16, h: u16, border: Style) -> (char, Style) {
    let last_x = w - 1;
    let last_y = h - 1;

    if dy == 0 || dy == last_y {
        let ch = match (dx, dy) {
            (0, 0) => '┌',
            (x, 0) if x == last_x => '┐',
            (0, _) => '└',
            (x, _) if x == last_x => '┘',
            _ => '─',
        };
        return (ch, border);
    }
    if dx == 0 || dx == last_x {
        return ('│', border);
    }

    // Interior: title centered on the upper text row, body below it.
    let interior = usize::from(w - 2);
    let title_row = if h >= 6 { h / 2 - 1 } else { h / 2 };
    let body_row = title_row + 2;
    let text = if dy == title_row {
        Some((centered_line(&card.title, interior), Theme::card_title_style()))
    } else if dy == body_row && body_row < last_y {
        Some((centered_line(&card.body, interior), Theme::card_body_style()))
    } else {
        None
    };

    match text {
        Some((line, style)) => {
            let ch = line.chars().nth(usize::from(dx - 1)).unwrap_or(' ');
            (ch, style)
        }
        None => (' ', Style::default()),
    }
}

/// Pad `s` to exactly `width` characters, centered, truncated with an
/// ellipsis when too long.
fn centered_line(s: &str, width: usize) -> String {
    let mut text: String = s.chars().take(width).collect();
    if s.chars().count() > width && width > 0 {
        text.pop();
        text.push('…');
    }
    let pad = width.saturating_sub(text.chars().count());
    let left = pad / 2;
    format!(
        "{}{}{}",
        " ".repeat(left),
        text,
        " ".repeat(pad - left)
    )
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents_accumulate_widths_and_gaps() {
        let deck = Deck::new(vec![
            Card::new("a", "", 10),
            Card::new("b", "", 14),
            Card::new("c", "", 10),
        ]);
        let strip = Strip::new(&deck).gap(2);
        let extents = strip.extents();
        assert_eq!(extents, vec![(0.0, 10.0), (12.0, 14.0), (28.0, 10.0)]);
    }

    #[test]
    fn render_records_a_measurement() {
        let deck = Deck::demo(4);
        let mut state = StripState::default();
        let area = Rect::new(0, 0, 80, 9);
        let mut buf = Buffer::empty(area);
        Strip::new(&deck).repeats(3).render(area, &mut buf, &mut state);

        let m = state.take_measured().expect("render must measure");
        assert_eq!(m.viewport_w, 80.0);
        assert_eq!(m.extents.len(), 4);
        // Consumed — the next frame must re-measure.
        assert!(state.take_measured().is_none());
    }

    #[test]
    fn offscreen_cards_do_not_touch_the_buffer() {
        let deck = Deck::new(vec![Card::new("solo", "x", 20)]);
        let mut state = StripState::default();
        // Scroll far past everything the single repeat can cover.
        state.offset = 10_000.0;
        let area = Rect::new(0, 0, 40, 7);
        let mut buf = Buffer::empty(area);
        Strip::new(&deck).repeats(1).render(area, &mut buf, &mut state);

        let blank = Buffer::empty(area);
        assert_eq!(buf, blank);
    }

    #[test]
    fn centered_line_pads_and_truncates() {
        assert_eq!(centered_line("ab", 6), "  ab  ");
        assert_eq!(centered_line("abcdefgh", 4), "abc…");
    }
}
