//! Pinch press/release detection with hysteresis.
//!
//! Two thresholds instead of one: a pinch engages below `press_below` and
//! only lets go above `release_above`, so a distance wobbling around a
//! single cutoff cannot toggle the state every frame.

use crate::config::PinchConfig;

/// What one evaluation did to the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinchTransition {
    /// Released → Pressed.
    Pressed,
    /// Pressed → Released.
    Released,
    /// No state change.
    Unchanged,
}

#[derive(Clone, Debug)]
pub struct PinchDetector {
    cfg:     PinchConfig,
    pinched: bool,
}

impl PinchDetector {
    pub fn new(cfg: PinchConfig) -> Self {
        PinchDetector { cfg, pinched: false }
    }

    /// Feed the current tip-to-tip distance.
    pub fn evaluate(&mut self, distance: f64) -> PinchTransition {
        if !self.pinched && distance < self.cfg.press_below {
            self.pinched = true;
            PinchTransition::Pressed
        } else if self.pinched && distance > self.cfg.release_above {
            self.pinched = false;
            PinchTransition::Released
        } else {
            PinchTransition::Unchanged
        }
    }

    /// Drop to Released without emitting a transition (hand lost, stop).
    pub fn force_release(&mut self) {
        self.pinched = false;
    }

    pub fn is_pinched(&self) -> bool { self.pinched }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
