//! The motion driver — one explicit state machine over the runway.
//!
//! All mutation of the scroll offset funnels through [`Carousel::handle`],
//! a reducer over [`EngineEvent`]s.  Deadlines live inside the phase
//! itself (`Waiting { until_ms }`), so cancelling a pending advance is
//! just a phase change — there are no timer callbacks to orphan and no
//! stale closures to guard against.
//!
//! Two mutually exclusive modes share the machine: step mode paces
//! discrete advance-and-settle moves between card centers, continuous
//! mode cruises at constant velocity with modulo wraparound.  A drag
//! owns the offset exclusively while active; every transition into or
//! out of it cancels the other side's work first.
//!
//! Missing geometry is never an error.  Before the first render, with
//! an empty deck, or right after a resize the engine simply re-tries on
//! subsequent ticks; worst case the strip stays static.

use super::band::{self, Band, Runway};
use super::drag::{self, DragController};
use super::geometry::{self, Geometry, Measured};
use super::tween::{CancelToken, Tween};

/// Consecutive good measurements required before first alignment —
/// lets the initial layout settle for two frames.
const LAYOUT_SETTLE_FRAMES: u8 = 2;

/// Ceiling on the per-frame delta in continuous mode, so a stalled
/// frame doesn't teleport the strip.
const MAX_FRAME_MS: u64 = 250;

// ───────────────────────────────────────── configuration ─────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Timer-paced advance-and-settle between card centers.
    #[default]
    Step,
    /// Constant-velocity per-frame scroll with wraparound.
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Tunables for the driver.  Durations are milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct MotionConfig {
    pub mode: Mode,
    pub direction: Direction,
    /// Rest time between step-mode advances.
    pub pause_ms: u64,
    /// Duration of one step-mode advance.
    pub anim_ms: u64,
    /// Duration of the snap-to-nearest after a drag release.
    pub commit_ms: u64,
    /// Quiet period after a drag commit before the loop resumes.
    pub settle_ms: u64,
    /// Continuous-mode velocity in columns per second.
    pub speed: f64,
    /// Peek fraction (0–1 of the viewport) biasing card centers.
    pub peek: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Step,
            direction: Direction::Forward,
            pause_ms: 2_000,
            anim_ms: 450,
            commit_ms: 250,
            settle_ms: 600,
            speed: 8.0,
            peek: 0.0,
        }
    }
}

// ───────────────────────────────────────── machine ───────────

/// Driver phase.  Step mode cycles Aligning → Waiting → Animating;
/// continuous mode parks in Cruising; a drag overrides either.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Aligning,
    Waiting { until_ms: u64 },
    Animating,
    Cruising,
    Dragging,
    Settling { until_ms: u64 },
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Aligning => "aligning",
            Phase::Waiting { .. } => "waiting",
            Phase::Animating => "animating",
            Phase::Cruising => "cruising",
            Phase::Dragging => "dragging",
            Phase::Settling { .. } => "settling",
        }
    }
}

/// Everything that can happen to the carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// Frame clock — drives timers, tweens and coalesced drag samples.
    Tick,
    PointerDown { x: f64 },
    PointerMove { x: f64 },
    PointerUp,
    /// Layout-affecting resize; re-measurement restarts the settle.
    Resize,
    SetActive(bool),
    SetPaused(bool),
    SetMode(Mode),
    SetDirection(Direction),
    /// Manual advance by ±1 card (step mode).
    Nudge(i64),
}

/// The carousel engine.  Owns the runway bookkeeping, the in-flight
/// tween and the drag session; renders read [`Carousel::offset`].
#[derive(Debug)]
pub struct Carousel {
    cfg: MotionConfig,
    phase: Phase,
    runway: Runway,
    measured: Option<Measured>,
    geometry: Option<Geometry>,
    band: Option<Band>,
    repeats: usize,
    tween: Option<Tween>,
    token: CancelToken,
    drag: DragController,
    active: bool,
    paused: bool,
    settle_frames: u8,
    last_tick_ms: Option<u64>,
}

impl Carousel {
    pub fn new(cfg: MotionConfig) -> Self {
        Self {
            cfg,
            phase: Phase::Idle,
            runway: Runway::new(),
            measured: None,
            geometry: None,
            band: None,
            repeats: 3,
            tween: None,
            token: CancelToken::new(),
            drag: DragController::new(),
            active: true,
            paused: false,
            settle_frames: 0,
            last_tick_ms: None,
        }
    }

    // ── reads ───────────────────────────────────────────────────

    pub fn offset(&self) -> f64 {
        self.runway.offset
    }

    pub fn index(&self) -> usize {
        self.runway.index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Mode {
        self.cfg.mode
    }

    pub fn direction(&self) -> Direction {
        self.cfg.direction
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging)
    }

    // ── inputs ──────────────────────────────────────────────────

    /// Record the strip's post-render layout sample.  Consumed by the
    /// next tick's re-measurement.
    pub fn observe_layout(&mut self, m: Measured) {
        self.measured = Some(m);
    }

    /// The reducer.  Every state transition happens here.
    pub fn handle(&mut self, event: EngineEvent, now_ms: u64) {
        match event {
            EngineEvent::Tick => self.tick(now_ms),
            EngineEvent::PointerDown { x } => self.pointer_down(x),
            EngineEvent::PointerMove { x } => self.drag.pointer_move(x),
            EngineEvent::PointerUp => self.pointer_up(now_ms),
            EngineEvent::Resize => {
                // Stale extents are useless; wait for a fresh render.
                self.measured = None;
                self.settle_frames = 0;
            }
            EngineEvent::SetActive(active) => self.set_active(active),
            EngineEvent::SetPaused(paused) => self.paused = paused,
            EngineEvent::SetMode(mode) => self.set_mode(mode),
            EngineEvent::SetDirection(direction) => self.cfg.direction = direction,
            EngineEvent::Nudge(delta) => self.nudge(delta, now_ms),
        }
    }

    /// Cancel everything in flight.  Called on deactivation and from
    /// the binary's unmount path.
    pub fn teardown(&mut self) {
        self.token.cancel();
        self.tween = None;
        let _ = self.drag.pointer_up();
        self.phase = Phase::Idle;
        self.last_tick_ms = None;
    }

    // ── tick ────────────────────────────────────────────────────

    fn tick(&mut self, now_ms: u64) {
        let dt_ms = self
            .last_tick_ms
            .map(|t| now_ms.saturating_sub(t).min(MAX_FRAME_MS))
            .unwrap_or(0);
        self.last_tick_ms = Some(now_ms);

        // Cheap re-validation before any offset math.
        self.remeasure();

        if !self.active {
            return;
        }

        match self.phase {
            Phase::Idle => self.phase = Phase::Aligning,
            Phase::Aligning => self.try_align(now_ms),
            Phase::Waiting { until_ms } => {
                if self.paused {
                    // Frozen: keep pushing the deadline so the pause
                    // restarts fresh when unfrozen.
                    self.phase = Phase::Waiting {
                        until_ms: now_ms + self.cfg.pause_ms,
                    };
                } else if now_ms >= until_ms {
                    self.advance(self.step_delta(), self.cfg.anim_ms, now_ms);
                }
            }
            Phase::Animating => {
                if self.sample_tween(now_ms) {
                    self.phase = Phase::Waiting {
                        until_ms: now_ms + self.cfg.pause_ms,
                    };
                }
            }
            Phase::Cruising => self.cruise(dt_ms),
            Phase::Dragging => self.apply_drag(),
            Phase::Settling { until_ms } => {
                let done = self.sample_tween(now_ms);
                if done && now_ms >= until_ms {
                    self.phase = match self.cfg.mode {
                        Mode::Step => Phase::Waiting {
                            until_ms: now_ms + self.cfg.pause_ms,
                        },
                        Mode::Continuous => Phase::Cruising,
                    };
                }
            }
        }
    }

    fn remeasure(&mut self) {
        let geo = self
            .measured
            .as_ref()
            .and_then(|m| geometry::measure(m, self.cfg.peek));
        match geo {
            Some(geo) => {
                self.repeats = geometry::repeat_count(geo.set_width, geo.viewport_w);
                self.band = Some(Band::from_repeats(&geo, self.repeats));
                if self.settle_frames < LAYOUT_SETTLE_FRAMES {
                    self.settle_frames += 1;
                }
                self.geometry = Some(geo);
            }
            None => {
                self.geometry = None;
                self.band = None;
                self.settle_frames = 0;
            }
        }
    }

    /// Duplicate count the strip should render.
    pub fn repeats(&self) -> usize {
        self.repeats
    }

    // ── alignment ───────────────────────────────────────────────

    fn try_align(&mut self, now_ms: u64) {
        if self.settle_frames < LAYOUT_SETTLE_FRAMES {
            return;
        }
        let (Some(geo), Some(bd)) = (self.geometry.clone(), self.band) else {
            return;
        };
        match self.cfg.mode {
            Mode::Step => {
                self.runway.index = 0;
                self.runway.cycle = bd.mid_cycle(&geo);
                // Direct placement, no animation.
                self.runway.offset = geo.rest_offset(self.runway.cycle, 0);
                band::normalize(&mut self.runway, &geo, &bd);
                tracing::debug!(
                    cycle = self.runway.cycle,
                    offset = self.runway.offset,
                    "aligned at mid-runway anchor"
                );
                self.phase = Phase::Waiting {
                    until_ms: now_ms + self.cfg.pause_ms,
                };
            }
            Mode::Continuous => {
                self.runway.offset = band::wrap(self.runway.offset, &geo);
                self.phase = Phase::Cruising;
            }
        }
    }

    // ── step mode ───────────────────────────────────────────────

    fn step_delta(&self) -> i64 {
        match self.cfg.direction {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// Fire one advance: normalize, move the index with wrap, normalize
    /// again, tween to the new rest position.
    fn advance(&mut self, delta: i64, duration_ms: u64, now_ms: u64) {
        let (Some(geo), Some(bd)) = (self.geometry.clone(), self.band) else {
            // Geometry went away mid-run — retry after another pause.
            self.phase = Phase::Waiting {
                until_ms: now_ms + self.cfg.pause_ms,
            };
            return;
        };

        band::normalize(&mut self.runway, &geo, &bd);

        let n = geo.positions.len() as i64;
        let mut index = self.runway.index as i64 + delta;
        if index >= n {
            index -= n;
            self.runway.cycle += 1;
        } else if index < 0 {
            index += n;
            self.runway.cycle -= 1;
        }
        self.runway.index = index as usize;

        band::normalize(&mut self.runway, &geo, &bd);

        let target = geo.rest_offset(self.runway.cycle, self.runway.index);
        tracing::debug!(index = self.runway.index, target, "advance");
        if self.start_tween(target, duration_ms, now_ms) {
            self.phase = Phase::Animating;
        } else {
            self.phase = Phase::Waiting {
                until_ms: now_ms + self.cfg.pause_ms,
            };
        }
    }

    /// Begin a tween toward `target`, cancelling any predecessor
    /// synchronously.  Returns `false` when it completed immediately.
    fn start_tween(&mut self, target: f64, duration_ms: u64, now_ms: u64) -> bool {
        self.token.cancel();
        self.token = CancelToken::new();
        match Tween::animate(
            self.runway.offset,
            target,
            now_ms,
            duration_ms,
            self.token.clone(),
        ) {
            Some(tween) => {
                self.tween = Some(tween);
                true
            }
            None => {
                self.runway.offset = target;
                self.tween = None;
                false
            }
        }
    }

    /// Sample the in-flight tween into the offset.  Returns `true`
    /// once there is nothing left to animate.
    fn sample_tween(&mut self, now_ms: u64) -> bool {
        let Some(tween) = &self.tween else {
            return true;
        };
        if tween.is_cancelled() {
            self.tween = None;
            return true;
        }
        self.runway.offset = tween.sample(now_ms);
        if tween.is_done(now_ms) {
            self.runway.offset = tween.target();
            self.tween = None;
            return true;
        }
        false
    }

    // ── continuous mode ─────────────────────────────────────────

    fn cruise(&mut self, dt_ms: u64) {
        if self.paused || dt_ms == 0 {
            return;
        }
        // No geometry yet: skip this frame, retry on the next one.
        let Some(geo) = self.geometry.clone() else {
            return;
        };
        let sign = match self.cfg.direction {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        };
        self.runway.offset += sign * self.cfg.speed * dt_ms as f64 / 1_000.0;
        self.runway.offset = band::wrap(self.runway.offset, &geo);
    }

    // ── drag ────────────────────────────────────────────────────

    fn pointer_down(&mut self, x: f64) {
        if !self.active {
            return;
        }
        // A second concurrent press is ignored while a session runs.
        if !self.drag.pointer_down(x, self.runway.offset) {
            return;
        }
        // The drag takes exclusive ownership of the offset: kill the
        // in-flight animation and the pending advance in one step.
        self.token.cancel();
        self.tween = None;
        self.phase = Phase::Dragging;
    }

    /// Apply the coalesced move sample — at most once per frame — and
    /// keep the live offset inside the rendered runway.
    fn apply_drag(&mut self) {
        let Some(target) = self.drag.apply_pending() else {
            return;
        };
        self.runway.offset = target;

        let Some(geo) = self.geometry.clone() else {
            return;
        };
        let before = self.runway.offset;
        match self.cfg.mode {
            Mode::Continuous => {
                self.runway.offset = band::wrap(before, &geo);
            }
            Mode::Step => {
                if let Some(bd) = self.band {
                    band::normalize(&mut self.runway, &geo, &bd);
                }
            }
        }
        // Whole-set jump happened under the pointer: move the drag
        // origin with it so the finger mapping stays continuous.
        let jumped = self.runway.offset - before;
        if jumped != 0.0 {
            self.drag.shift_origin(jumped);
            tracing::debug!(jumped, "runway jump under drag");
        }
    }

    fn pointer_up(&mut self, now_ms: u64) {
        if !self.drag.pointer_up() {
            return;
        }
        match self.cfg.mode {
            // Continuous motion resumes unaffected from wherever the
            // finger left the strip.
            Mode::Continuous => self.phase = Phase::Cruising,
            Mode::Step => self.commit_release(now_ms),
        }
    }

    fn commit_release(&mut self, now_ms: u64) {
        let Some(geo) = self.geometry.clone() else {
            self.phase = Phase::Aligning;
            return;
        };
        let Some(commit) = drag::nearest_commit(&geo, self.runway.offset) else {
            self.phase = Phase::Aligning;
            return;
        };
        self.runway.index = commit.index;
        self.runway.cycle = commit.cycle;
        if let Some(bd) = self.band {
            band::normalize(&mut self.runway, &geo, &bd);
        }
        let target = geo.rest_offset(self.runway.cycle, self.runway.index);
        tracing::debug!(index = commit.index, target, "drag committed");
        self.start_tween(target, self.cfg.commit_ms, now_ms);
        self.phase = Phase::Settling {
            until_ms: now_ms + self.cfg.settle_ms,
        };
    }

    // ── mode / lifecycle ────────────────────────────────────────

    fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.teardown();
        } else if self.phase == Phase::Idle {
            self.phase = Phase::Aligning;
        }
    }

    /// Switch modes, tearing down the other mode's timers and tween
    /// before the new one starts.
    fn set_mode(&mut self, mode: Mode) {
        if mode == self.cfg.mode {
            return;
        }
        self.token.cancel();
        self.tween = None;
        let _ = self.drag.pointer_up();
        self.cfg.mode = mode;
        self.phase = if self.active {
            Phase::Aligning
        } else {
            Phase::Idle
        };
    }

    /// Manual ±1 advance from the keyboard.  Step mode only; resets
    /// the pause like any other advance.
    fn nudge(&mut self, delta: i64, now_ms: u64) {
        if self.cfg.mode != Mode::Step || !self.active {
            return;
        }
        if matches!(
            self.phase,
            Phase::Waiting { .. } | Phase::Animating | Phase::Settling { .. }
        ) {
            self.advance(delta.signum(), self.cfg.anim_ms, now_ms);
        }
    }
}

// ───────────────────────────────────────── tests ─────────────
