//! The card set shown in the strip.
//!
//! A [`Card`] is opaque to the motion engine — it only cares about each
//! card's rendered width.  The [`Deck`] holds the caller's n cards; the
//! strip widget duplicates them on screen to form the runway, and every
//! duplicate is geometrically identical to the original.

// ───────────────────────────────────────── card ──────────────

/// One card in the strip.  Identified by its index within the set.
#[derive(Debug, Clone)]
pub struct Card {
    pub title: String,
    pub body: String,
    /// Rendered width in terminal columns, border included.
    pub width: u16,
}

impl Card {
    pub fn new(title: impl Into<String>, body: impl Into<String>, width: u16) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            // Narrower than this and the border eats the content.
            width: width.max(6),
        }
    }
}

// ───────────────────────────────────────── deck ──────────────

/// The caller's ordered card set (one logical set, before duplication).
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Number of cards in one set.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Build a demo deck of `n` placeholder cards with slightly varied
    /// widths so the geometry path with non-uniform cards gets exercised.
    pub fn demo(n: usize) -> Self {
        let titles = [
            "Weekly picks",
            "Fresh today",
            "Pantry staples",
            "Under five",
            "Back in stock",
            "Seasonal",
            "Most loved",
            "New arrivals",
        ];
        let bodies = [
            "tap to browse",
            "limited batch",
            "free delivery",
            "bundle & save",
            "ends sunday",
        ];
        let cards = (0..n)
            .map(|i| {
                Card::new(
                    format!("{} #{}", titles[i % titles.len()], i + 1),
                    bodies[i % bodies.len()].to_string(),
                    22 + ((i % 3) as u16) * 4,
                )
            })
            .collect();
        Self { cards }
    }
}
