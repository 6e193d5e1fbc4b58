//! Keeps the live scroll offset inside the duplicated runway.
//!
//! The rendered runway is finite — `repeats` copies of the card set —
//! so resting near either physical end would exhaust content on the
//! next advance or drag.  [`normalize`] rewinds the offset by exact
//! multiples of one set width (cycle bookkeeping adjusted in the same
//! step) whenever it drifts out of the safe middle band.  Because each
//! jump is ≡ 0 modulo the set width, the visible cards never move.

use super::geometry::Geometry;

// ───────────────────────────────────────── runway state ──────

/// Live scroll bookkeeping.  At rest (not animating, not dragging):
/// `offset == set_start + cycle * set_width + positions[index]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Runway {
    /// Full-set-widths between the base anchor and the current rest
    /// position.  Stays within the safe band except mid-jump.
    pub cycle: i64,
    /// Current / target card index in `[0, n)`.
    pub index: usize,
    /// Live scroll offset in content columns.
    pub offset: f64,
}

impl Runway {
    pub fn new() -> Self {
        Self {
            cycle: 0,
            index: 0,
            offset: 0.0,
        }
    }
}

impl Default for Runway {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────── safe band ─────────

/// Absolute offset range it is safe to rest in: at least one full set
/// of slack from each physical end of the rendered runway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lo: f64,
    pub hi: f64,
}

impl Band {
    /// Derive the band from the duplicate count.  The lower bound keeps
    /// one full set of slack behind the offset; the upper bound keeps
    /// one set *plus the viewport width* ahead of it, because the
    /// viewport extends `viewport_w` past the offset and an advance may
    /// overshoot the band by up to one set before the next
    /// normalization.  `repeat_count` supplies enough duplicates that
    /// the band stays at least one set width tall.
    pub fn from_repeats(geo: &Geometry, repeats: usize) -> Self {
        let repeats = repeats.max(3);
        Self {
            lo: geo.set_start + geo.set_width,
            hi: geo.set_start + (repeats as f64 - 1.0) * geo.set_width - geo.viewport_w,
        }
    }

    pub fn contains(&self, offset: f64) -> bool {
        offset >= self.lo && offset < self.hi
    }

    /// Cycle anchor in the middle of the band, for initial alignment.
    pub fn mid_cycle(&self, geo: &Geometry) -> i64 {
        if geo.set_width < 1.0 {
            return 0;
        }
        (((self.lo + self.hi) / 2.0 - geo.set_start) / geo.set_width).floor() as i64
    }
}

// ───────────────────────────────────────── normalization ─────

/// Fold `runway.offset` back into the band by whole set widths,
/// keeping `cycle` in lockstep.  Idempotent; a no-op when already
/// in band.  Degenerate geometry is left untouched.
pub fn normalize(runway: &mut Runway, geo: &Geometry, band: &Band) {
    if geo.set_width < 1.0 || band.hi - band.lo < geo.set_width {
        return;
    }
    if band.contains(runway.offset) {
        return;
    }
    while runway.offset < band.lo {
        runway.offset += geo.set_width;
        runway.cycle += 1;
    }
    while runway.offset >= band.hi {
        runway.offset -= geo.set_width;
        runway.cycle -= 1;
    }
}

/// Continuous-mode equivalent of banding: fold the offset into one set
/// width, shifted forward by a full set so there is always backward
/// drag slack.
pub fn wrap(offset: f64, geo: &Geometry) -> f64 {
    if geo.set_width < 1.0 {
        return offset;
    }
    geo.set_start + geo.set_width + (offset - geo.set_start).rem_euclid(geo.set_width)
}

/// Offset folded into `[0, set_width)` — the within-set phase used to
/// compare positions regardless of cycle.
pub fn within_set(offset: f64, geo: &Geometry) -> f64 {
    (offset - geo.set_start).rem_euclid(geo.set_width)
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{measure, repeat_count, Measured};
    use rand::Rng;

    fn geo_4x200() -> Geometry {
        let extents = (0..4).map(|i| (i as f64 * 200.0, 200.0)).collect();
        measure(
            &Measured {
                viewport_w: 400.0,
                extents,
                gap: 0.0,
            },
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn normalize_is_idempotent() {
        let geo = geo_4x200();
        let band = Band::from_repeats(&geo, 6);
        let mut r = Runway {
            cycle: 9,
            index: 2,
            offset: 9.0 * geo.set_width + geo.positions[2],
        };
        normalize(&mut r, &geo, &band);
        let once = r;
        normalize(&mut r, &geo, &band);
        assert_eq!(r, once);
        assert!(band.contains(r.offset));
    }

    #[test]
    fn normalize_preserves_phase_modulo_set_width() {
        let geo = geo_4x200();
        let band = Band::from_repeats(&geo, 6);
        for index in 0..4 {
            let mut r = Runway {
                cycle: -7,
                index,
                offset: -7.0 * geo.set_width + geo.positions[index],
            };
            let phase_before = within_set(r.offset, &geo);
            normalize(&mut r, &geo, &band);
            let phase_after = within_set(r.offset, &geo);
            assert!((phase_before - phase_after).abs() < 1e-9);
            // Rest invariant still holds after the jump.
            let rest = geo.rest_offset(r.cycle, r.index);
            assert!((r.offset - rest).abs() < 1e-9);
        }
    }

    #[test]
    fn band_invariant_under_random_motion() {
        let geo = geo_4x200();
        let repeats = repeat_count(geo.set_width, geo.viewport_w);
        let band = Band::from_repeats(&geo, repeats);
        let mut rng = rand::rng();
        let mut r = Runway {
            cycle: band.mid_cycle(&geo),
            index: 0,
            offset: 0.0,
        };
        r.offset = geo.rest_offset(r.cycle, 0);

        for _ in 0..5_000 {
            // Random advance or drag displacement, then normalize —
            // the invariant must hold after every normalization call.
            let delta: f64 = rng.random_range(-3.0 * geo.set_width..3.0 * geo.set_width);
            r.offset += delta;
            normalize(&mut r, &geo, &band);
            assert!(
                band.contains(r.offset),
                "offset {} escaped band [{}, {})",
                r.offset,
                band.lo,
                band.hi
            );
        }
    }

    #[test]
    fn wrap_folds_into_slack_window() {
        let geo = geo_4x200();
        let w = geo.set_width;
        for off in [-5000.0, -1.0, 0.0, 350.0, 799.9, 800.0, 12_345.0] {
            let folded = wrap(off, &geo);
            assert!(folded >= geo.set_start + w && folded < geo.set_start + 2.0 * w);
            assert!((within_set(folded, &geo) - within_set(off, &geo)).abs() < 1e-9);
        }
    }

    #[test]
    fn band_keeps_the_viewport_inside_the_runway() {
        let geo = geo_4x200();
        for repeats in [4usize, 6, 12] {
            let band = Band::from_repeats(&geo, repeats);
            // Worst case: offset just under `hi`, plus one set of
            // advance overshoot, plus the viewport on screen.
            let runway_end = geo.set_start + repeats as f64 * geo.set_width;
            assert!(band.hi + geo.set_width + geo.viewport_w <= runway_end);
            assert!(band.hi - band.lo >= geo.set_width);
        }
    }

    #[test]
    fn mid_cycle_sits_inside_band() {
        let geo = geo_4x200();
        for repeats in [4usize, 6, 12] {
            let band = Band::from_repeats(&geo, repeats);
            let cycle = band.mid_cycle(&geo);
            let rest = geo.rest_offset(cycle, 0);
            // positions[0] is negative (half a viewport), so allow the
            // normalize step to pull it in from at most one set away.
            let mut r = Runway {
                cycle,
                index: 0,
                offset: rest,
            };
            normalize(&mut r, &geo, &band);
            assert!(band.contains(r.offset));
        }
    }
}
