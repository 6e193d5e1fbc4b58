//! Measures the rendered strip into the numbers the motion engine needs.
//!
//! The strip widget reports what it actually laid out — viewport width,
//! per-card leading edges and widths — and [`measure`] turns that into a
//! [`Geometry`]: the width of one full card set and, for each card, the
//! ideal scroll offset that centers it in the viewport.  Measurement can
//! legitimately fail before the first render or with an empty deck;
//! callers retry on the next frame instead of treating it as an error.

/// Peek bias bounds, in terminal columns.  Keeps a sliver of the
/// neighbouring cards visible at rest without pushing the centered card
/// off-screen on narrow terminals.
const PEEK_MIN_COLS: f64 = 2.0;
const PEEK_MAX_COLS: f64 = 10.0;

// ───────────────────────────────────────── measured input ────

/// Raw layout sample recorded by the strip widget after each render.
#[derive(Debug, Clone, PartialEq)]
pub struct Measured {
    /// Inner viewport width in columns.
    pub viewport_w: f64,
    /// `(leading_edge, width)` per card of one set, in content columns,
    /// relative to the first set's leading edge.
    pub extents: Vec<(f64, f64)>,
    /// Spacing that follows each card (so duplicated sets tile evenly).
    pub gap: f64,
}

// ───────────────────────────────────────── snapshot ──────────

/// Derived geometry of one duplicated set.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Width of one full set, trailing gap included.
    pub set_width: f64,
    /// Content offset of the first set's leading edge.
    pub set_start: f64,
    /// For each card, the scroll offset that centers it (cycle 0).
    pub positions: Vec<f64>,
    /// Viewport width the snapshot was measured against.
    pub viewport_w: f64,
}

impl Geometry {
    /// Resting offset for `(cycle, index)`.
    pub fn rest_offset(&self, cycle: i64, index: usize) -> f64 {
        self.set_start + cycle as f64 * self.set_width + self.positions[index]
    }
}

/// Measure the strip layout into a [`Geometry`].
///
/// Returns `None` while the layout is unusable: no cards, a collapsed
/// viewport, or a degenerate set width (< 1 column).
pub fn measure(m: &Measured, peek: f64) -> Option<Geometry> {
    if m.extents.is_empty() || m.viewport_w < 1.0 {
        return None;
    }

    let first_lead = m.extents[0].0;
    let (last_lead, last_w) = *m.extents.last()?;
    let set_width = last_lead + last_w + m.gap - first_lead;
    if set_width < 1.0 {
        return None;
    }

    let bias = peek_bias(peek, m.viewport_w);
    let positions = m
        .extents
        .iter()
        .map(|&(lead, w)| (lead - first_lead) + w / 2.0 - m.viewport_w / 2.0 + bias)
        .collect();

    Some(Geometry {
        set_width,
        set_start: 0.0,
        positions,
        viewport_w: m.viewport_w,
    })
}

/// Constant offset applied to every center position so neighbours peek
/// in at rest.  `peek` is a 0–1 fraction of the viewport; the resulting
/// column count is clamped so it stays sane on tiny and huge terminals.
fn peek_bias(peek: f64, viewport_w: f64) -> f64 {
    let peek = peek.clamp(0.0, 1.0);
    if peek == 0.0 {
        return 0.0;
    }
    (peek * viewport_w).clamp(PEEK_MIN_COLS, PEEK_MAX_COLS)
}

/// Duplicate factor for the rendered runway: enough sets that the strip
/// is wider than the viewport with slack to drag either way, and that
/// the safe band — which must end one set *plus* the viewport short of
/// the runway's right edge — stays at least one set width tall.  Small
/// sets need more copies; wide sets bottom out at four.
pub fn repeat_count(set_width: f64, viewport_w: f64) -> usize {
    if set_width < 1.0 {
        return 3;
    }
    let coverage = (2.0 * viewport_w / set_width).ceil() as usize + 2;
    let band_slack = (viewport_w / set_width).ceil() as usize + 3;
    coverage.max(band_slack)
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize, w: f64, gap: f64) -> Measured {
        let extents = (0..n).map(|i| (i as f64 * (w + gap), w)).collect();
        Measured {
            viewport_w: 400.0,
            extents,
            gap,
        }
    }

    #[test]
    fn centers_each_card() {
        let m = uniform(4, 200.0, 0.0);
        let geo = measure(&m, 0.0).unwrap();
        assert_eq!(geo.set_width, 800.0);
        assert_eq!(geo.positions.len(), 4);
        // Card 0 centered: its midpoint (100) minus half the viewport.
        assert_eq!(geo.positions[0], 100.0 - 200.0);
        assert_eq!(geo.positions[1], 300.0 - 200.0);
    }

    #[test]
    fn gap_counts_toward_set_width() {
        let m = uniform(3, 10.0, 2.0);
        let geo = measure(&m, 0.0).unwrap();
        assert_eq!(geo.set_width, 36.0);
    }

    #[test]
    fn variable_widths_shift_midpoints() {
        let m = Measured {
            viewport_w: 100.0,
            extents: vec![(0.0, 20.0), (20.0, 40.0)],
            gap: 0.0,
        };
        let geo = measure(&m, 0.0).unwrap();
        assert_eq!(geo.positions[0], 10.0 - 50.0);
        assert_eq!(geo.positions[1], 40.0 - 50.0);
    }

    #[test]
    fn unavailable_when_empty_or_degenerate() {
        assert!(measure(
            &Measured {
                viewport_w: 400.0,
                extents: vec![],
                gap: 0.0
            },
            0.0
        )
        .is_none());
        assert!(measure(&uniform(4, 0.1, 0.0), 0.0).is_none());
        let mut m = uniform(4, 200.0, 0.0);
        m.viewport_w = 0.0;
        assert!(measure(&m, 0.0).is_none());
    }

    #[test]
    fn peek_bias_is_clamped() {
        assert_eq!(peek_bias(0.0, 400.0), 0.0);
        assert_eq!(peek_bias(1.0, 400.0), PEEK_MAX_COLS);
        assert_eq!(peek_bias(0.001, 400.0), PEEK_MIN_COLS);
        assert_eq!(peek_bias(0.02, 400.0), 8.0);
    }

    #[test]
    fn repeat_count_grows_for_small_sets() {
        // One full set barely narrower than the viewport.
        assert_eq!(repeat_count(100.0, 400.0), 10);
        // Half-viewport set: the band slack term wins over coverage.
        assert_eq!(repeat_count(800.0, 400.0), 4);
        // Very wide set still needs a fourth copy so the band keeps a
        // full set of height past the viewport.
        assert_eq!(repeat_count(10_000.0, 400.0), 4);
    }

    #[test]
    fn repeat_count_always_fits_band_and_viewport() {
        for (w, v) in [(22.0, 80.0), (100.0, 400.0), (800.0, 400.0), (5_000.0, 120.0)] {
            let k = repeat_count(w, v) as f64;
            // One set below, one set plus the viewport above, and a
            // band at least one set tall in between.
            assert!(k * w - 2.0 * w - v >= w, "w {w} v {v}");
        }
    }
}
