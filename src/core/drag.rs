//! Mouse drag over the strip.
//!
//! One session at a time: press records the origin column and the
//! origin scroll offset, moves are coalesced to the latest sample and
//! applied once per frame, release hands an exact `offset = origin -
//! delta` mapping back to the motion driver for the nearest-card
//! commit.  When the band normalizer jumps the runway mid-drag, the
//! origin is shifted by the same amount so the finger-to-content
//! mapping stays continuous across the jump.

use super::geometry::Geometry;

// ───────────────────────────────────────── session ───────────

/// Live drag bookkeeping, created on press and destroyed on release.
#[derive(Debug, Clone, Copy)]
struct Session {
    origin_x: f64,
    origin_offset: f64,
}

/// Captures pointer input and converts it to scroll-offset targets.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<Session>,
    /// Latest pointer column since the last applied frame.  Rapid move
    /// events collapse into this single sample.
    pending_x: Option<f64>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Begin a session.  Returns `false` (event ignored) when another
    /// session is already active.
    pub fn pointer_down(&mut self, x: f64, current_offset: f64) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(Session {
            origin_x: x,
            origin_offset: current_offset,
        });
        self.pending_x = None;
        true
    }

    /// Record a move.  Only the newest sample survives until the next
    /// frame applies it.
    pub fn pointer_move(&mut self, x: f64) {
        if self.session.is_some() {
            self.pending_x = Some(x);
        }
    }

    /// Consume the coalesced sample, if any, and return the offset it
    /// maps to.  Called at most once per frame.
    pub fn apply_pending(&mut self) -> Option<f64> {
        let session = self.session?;
        let x = self.pending_x.take()?;
        Some(session.origin_offset - (x - session.origin_x))
    }

    /// Compensate the origin after the runway was jumped by `delta`
    /// columns (a whole-set multiple), keeping the drag continuous.
    pub fn shift_origin(&mut self, delta: f64) {
        if let Some(session) = &mut self.session {
            session.origin_offset += delta;
        }
    }

    /// End the session.  Returns `true` if one was active.
    pub fn pointer_up(&mut self) -> bool {
        self.pending_x = None;
        self.session.take().is_some()
    }
}

// ───────────────────────────────────────── commit ────────────

/// Where a released drag should settle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Commit {
    pub index: usize,
    pub cycle: i64,
    /// Exact resting offset for `(cycle, index)`.
    pub target: f64,
}

/// Find the card whose center position is nearest to `offset`,
/// comparing within-set phases so any cycle qualifies.  Ties go to the
/// lowest index.
pub fn nearest_commit(geo: &Geometry, offset: f64) -> Option<Commit> {
    if geo.positions.is_empty() || geo.set_width < 1.0 {
        return None;
    }

    let w = geo.set_width;
    let mut best: Option<(f64, Commit)> = None;

    for (index, &pos) in geo.positions.iter().enumerate() {
        // Signed distance to the nearest duplicate of this card.
        let raw = offset - geo.set_start - pos;
        let cycle = (raw / w).round() as i64;
        let dist = (raw - cycle as f64 * w).abs();
        let candidate = Commit {
            index,
            cycle,
            target: geo.rest_offset(cycle, index),
        };
        match best {
            Some((best_dist, _)) if dist >= best_dist => {}
            _ => best = Some((dist, candidate)),
        }
    }

    best.map(|(_, c)| c)
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::band::within_set;
    use crate::core::geometry::{measure, Measured};

    /// Distance from `offset` to its committed target, within one set.
    fn commit_distance(geo: &Geometry, offset: f64, commit: &Commit) -> f64 {
        let a = within_set(offset, geo);
        let b = within_set(commit.target, geo);
        let d = (a - b).abs();
        d.min(geo.set_width - d)
    }

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
    fn only_one_session_at_a_time() {
        let mut drag = DragController::new();
        assert!(drag.pointer_down(50.0, 1_000.0));
        assert!(!drag.pointer_down(80.0, 1_000.0));
        assert!(drag.pointer_up());
        assert!(!drag.pointer_up());
    }

    #[test]
    fn moves_coalesce_to_latest_sample() {
        let mut drag = DragController::new();
        drag.pointer_down(100.0, 2_000.0);
        drag.pointer_move(110.0);
        drag.pointer_move(130.0);
        drag.pointer_move(90.0);
        // Dragging right by -10 columns moves content the other way.
        assert_eq!(drag.apply_pending(), Some(2_010.0));
        // Sample consumed; nothing more until the next move.
        assert_eq!(drag.apply_pending(), None);
    }

    #[test]
    fn moves_without_session_are_ignored() {
        let mut drag = DragController::new();
        drag.pointer_move(42.0);
        assert_eq!(drag.apply_pending(), None);
    }

    #[test]
    fn origin_shift_keeps_mapping_continuous() {
        let mut drag = DragController::new();
        drag.pointer_down(100.0, 2_000.0);
        drag.pointer_move(150.0);
        assert_eq!(drag.apply_pending(), Some(1_950.0));

        // Runway jumped back one set (800 columns): same finger column
        // must now map 800 lower.
        drag.shift_origin(-800.0);
        drag.pointer_move(150.0);
        assert_eq!(drag.apply_pending(), Some(1_150.0));
    }

    #[test]
    fn release_without_moving_commits_to_nearest() {
        let geo = geo_4x200();
        // Rest exactly on card 2 of cycle 3.
        let rest = geo.rest_offset(3, 2);
        let c = nearest_commit(&geo, rest).unwrap();
        assert_eq!(c.index, 2);
        assert_eq!(c.cycle, 3);
        assert_eq!(c.target, rest);
    }

    #[test]
    fn drag_left_by_150_commits_one_card_over() {
        let geo = geo_4x200();
        let rest = geo.rest_offset(2, 0);
        // Dragging left moves content left: offset grows by 150.
        let c = nearest_commit(&geo, rest + 150.0).unwrap();
        assert_eq!(c.index, 1);
        assert!(commit_distance(&geo, rest + 150.0, &c) <= 100.0);
    }

    #[test]
    fn midpoint_tie_goes_to_lowest_index() {
        let geo = geo_4x200();
        // Exactly halfway between card 0 and card 1.
        let halfway = geo.rest_offset(2, 0) + 100.0;
        let c = nearest_commit(&geo, halfway).unwrap();
        assert_eq!(c.index, 0);
    }

    #[test]
    fn wrap_seam_commits_across_the_set_boundary() {
        let geo = geo_4x200();
        // Just past the last card of cycle 2 — nearest is card 0 of
        // cycle 3, not card 3 of cycle 2.
        let offset = geo.rest_offset(3, 0) - 40.0;
        let c = nearest_commit(&geo, offset).unwrap();
        assert_eq!((c.index, c.cycle), (0, 3));
    }
}
