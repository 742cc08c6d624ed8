//! The per-frame controller.
//!
//! `GestureSession` owns the pointer filter, the pinch detector, the FPS
//! estimate, the target surface and the status sink. Frames come in one at a
//! time through [`GestureSession::on_frame`]; nothing else mutates the
//! pipeline state, so no locking is involved.
//!
//! # Per-frame algorithm
//!
//! 1. Update the FPS moving average from the wall-clock gap since the
//!    previous frame (gap floored at 1 ms).
//! 2. Drop malformed hands. If none are left: hand absent, pinch forced
//!    released, pinch readout unavailable, pointer untouched.
//! 3. Otherwise pick a hand, map its pointer tip to the screen (x mirrored
//!    by default) and step the pointer filter toward it.
//! 4. Feed the pointer-tip ↔ pinch-tip distance to the pinch detector. On a
//!    press, hit-test the surface at the *smoothed* pointer and activate
//!    whatever is there.

use std::time::{Duration, Instant};

use crate::config::SessionConfig;
use crate::error::ConfigError;
use crate::landmark::{FrameResult, Hand, Landmark};
use crate::pinch::{PinchDetector, PinchTransition};
use crate::select::select_hand;
use crate::smoothing::PointerFilter;
use crate::surface::{StatusSink, TargetSurface};

// ════════════════════════════════════════════════════════════════════════════
// Viewport
// ════════════════════════════════════════════════════════════════════════════

/// Screen size the pointer is mapped onto, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width:  f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            Ok(Viewport { width, height })
        } else {
            Err(ConfigError::Viewport { width, height })
        }
    }

    /// Normalized camera space → screen pixels.
    pub fn map(&self, lm: &Landmark, mirror_x: bool) -> (f64, f64) {
        let nx = if mirror_x { 1.0 - lm.x } else { lm.x };
        (nx * self.width, lm.y * self.height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FpsEstimate
// ════════════════════════════════════════════════════════════════════════════

/// Exponential moving average of frames per second.
#[derive(Clone, Debug)]
pub struct FpsEstimate {
    weight: f64,
    value:  f64,
}

impl FpsEstimate {
    pub fn new(weight: f64) -> Self {
        FpsEstimate { weight, value: 0.0 }
    }

    /// Fold in one frame gap. The first sample after a reset is taken as is.
    pub fn sample(&mut self, dt: Duration) -> f64 {
        let dt_ms = (dt.as_secs_f64() * 1000.0).max(1.0);
        let fps = 1000.0 / dt_ms;
        self.value = if self.value == 0.0 {
            fps
        } else {
            self.value * (1.0 - self.weight) + fps * self.weight
        };
        self.value
    }

    pub fn reset(&mut self) { self.value = 0.0; }

    /// `None` until a frame has been sampled.
    pub fn get(&self) -> Option<f64> {
        (self.value > 0.0).then_some(self.value)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureSession
// ════════════════════════════════════════════════════════════════════════════

pub struct GestureSession<S: TargetSurface, K: StatusSink> {
    cfg:        SessionConfig,
    viewport:   Viewport,
    surface:    S,
    status:     K,

    filter:     PointerFilter,
    pinch:      PinchDetector,
    pressed:    Option<S::Element>,
    fps:        FpsEstimate,

    running:    bool,
    last_frame: Option<Instant>,
    hand:       bool,
    distance:   Option<f64>,
}

impl<S: TargetSurface, K: StatusSink> GestureSession<S, K> {
    pub fn new(
        cfg:      SessionConfig,
        viewport: Viewport,
        surface:  S,
        status:   K,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(GestureSession {
            cfg,
            viewport,
            surface,
            status,
            filter:     PointerFilter::new(cfg.pointer),
            pinch:      PinchDetector::new(cfg.pinch),
            pressed:    None,
            fps:        FpsEstimate::new(cfg.fps_weight),
            running:    false,
            last_frame: None,
            hand:       false,
            distance:   None,
        })
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Begin accepting frames. A no-op while already running.
    pub fn start_at(&mut self, now: Instant) {
        if self.running { return; }
        self.running    = true;
        self.last_frame = Some(now);
        self.fps.reset();
        self.status.tracking(true);
        self.status.fps(None);
        log::info!("gesture session started");
    }

    /// Stop accepting frames and park everything: pointer off-surface at
    /// rest, pinch released, readouts unavailable. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let was_running = self.running;
        self.running    = false;
        self.last_frame = None;
        self.hand       = false;
        self.distance   = None;
        self.pressed    = None;
        self.pinch.force_release();
        self.fps.reset();
        let (ox, oy) = self.cfg.off_surface;
        self.filter.reset_to(ox, oy);

        self.status.tracking(false);
        self.status.hand_presence(false);
        self.status.pinch_distance(None);
        self.status.fps(None);
        self.status.pinch(false);
        if was_running {
            log::info!("gesture session stopped");
        }
    }

    // ── frames ────────────────────────────────────────────────────────────

    pub fn on_frame(&mut self, frame: &FrameResult) -> PinchTransition {
        self.on_frame_at(frame, Instant::now())
    }

    /// Process one frame observed at `now`. Ignored unless running.
    pub fn on_frame_at(&mut self, frame: &FrameResult, now: Instant) -> PinchTransition {
        if !self.running {
            log::trace!("frame ignored: session not running");
            return PinchTransition::Unchanged;
        }

        let dt = self.last_frame.map_or(Duration::ZERO, |t| now.saturating_duration_since(t));
        self.last_frame = Some(now);
        let fps = self.fps.sample(dt);
        self.status.fps(Some(fps));

        let usable: Vec<&Hand> = frame.hands.iter().filter(|h| h.is_well_formed()).collect();
        if usable.len() < frame.hands.len() {
            log::debug!("dropped {} malformed hand(s)", frame.hands.len() - usable.len());
        }

        let map = self.cfg.landmarks;
        let selected = select_hand(&usable, map.reference)
            .map(|i| usable[i])
            .and_then(|h| Some((*h.landmark(map.pointer)?, *h.landmark(map.pinch)?)));

        let Some((tip, pinch_tip)) = selected else {
            self.lose_hand();
            return PinchTransition::Unchanged;
        };

        let (tx, ty) = self.viewport.map(&tip, self.cfg.mirror_x);
        if !(tx.is_finite() && ty.is_finite()) {
            log::debug!("fingertip maps off any screen: ({}, {})", tx, ty);
            self.lose_hand();
            return PinchTransition::Unchanged;
        }

        self.hand = true;
        self.status.hand_presence(true);
        let (px, py) = self.filter.update(tx, ty);

        let distance = tip.distance(&pinch_tip);
        self.distance = Some(distance);
        self.status.pinch_distance(Some(distance));

        let transition = self.pinch.evaluate(distance);
        match transition {
            PinchTransition::Pressed => {
                self.status.pinch(true);
                self.press_at(px, py);
            }
            PinchTransition::Released => {
                self.status.pinch(false);
                if let Some(el) = self.pressed.take() {
                    log::debug!("pinch released from {}", el);
                }
            }
            PinchTransition::Unchanged => {}
        }
        transition
    }

    fn lose_hand(&mut self) {
        self.hand     = false;
        self.distance = None;
        self.pinch.force_release();
        self.status.hand_presence(false);
        self.status.pinch_distance(None);
        self.status.pinch(false);
    }

    fn press_at(&mut self, x: f64, y: f64) {
        match self.surface.hit_test(x, y) {
            Some(el) => {
                log::debug!("pinch press on {} at ({:.0}, {:.0})", el, x, y);
                self.surface.activate(&el);
                self.status.pressed(&el.to_string());
                self.pressed = Some(el);
            }
            None => log::debug!("pinch press at ({:.0}, {:.0}) hit nothing", x, y),
        }
    }

    // ── configuration ─────────────────────────────────────────────────────

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport { self.viewport }
    pub fn config(&self)   -> &SessionConfig { &self.cfg }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn is_running(&self)     -> bool              { self.running }
    pub fn pointer(&self)        -> (f64, f64)        { self.filter.position() }
    pub fn velocity(&self)       -> (f64, f64)        { self.filter.velocity() }
    pub fn is_pinched(&self)     -> bool              { self.pinch.is_pinched() }
    pub fn hand_present(&self)   -> bool              { self.hand }
    pub fn pinch_distance(&self) -> Option<f64>       { self.distance }
    pub fn fps(&self)            -> Option<f64>       { self.fps.get() }
    pub fn last_pressed(&self)   -> Option<&S::Element> { self.pressed.as_ref() }

    pub fn surface(&self)         -> &S     { &self.surface }
    pub fn surface_mut(&mut self) -> &mut S { &mut self.surface }
    pub fn status(&self)          -> &K     { &self.status }
    pub fn status_mut(&mut self)  -> &mut K { &mut self.status }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
