//! Spring-follow smoothing for the virtual pointer.
//!
//! Each update converts a fraction (`follow`) of the remaining error into an
//! acceleration impulse, then keeps a fraction (`damp`) of the resulting
//! velocity. It is a second-order IIR filter: it lags a little and
//! overshoots a little, which reads as "weight" on screen.

use crate::config::PointerConfig;

/// Position and velocity of the pointer, in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub px: f64,
    pub py: f64,
    pub vx: f64,
    pub vy: f64,
}

/// The smoothing filter. Starts at the origin, at rest.
#[derive(Clone, Debug)]
pub struct PointerFilter {
    cfg:   PointerConfig,
    state: PointerState,
}

impl PointerFilter {
    pub fn new(cfg: PointerConfig) -> Self {
        PointerFilter { cfg, state: PointerState::default() }
    }

    /// Advance one frame toward `(target_x, target_y)` and return the new
    /// position.
    pub fn update(&mut self, target_x: f64, target_y: f64) -> (f64, f64) {
        let s = &mut self.state;
        let ax = (target_x - s.px) * self.cfg.follow;
        let ay = (target_y - s.py) * self.cfg.follow;

        s.vx = (s.vx + ax) * self.cfg.damp;
        s.vy = (s.vy + ay) * self.cfg.damp;

        s.px += s.vx;
        s.py += s.vy;
        (s.px, s.py)
    }

    /// Jump to `(x, y)` with zero velocity. Not filtered.
    pub fn reset_to(&mut self, x: f64, y: f64) {
        self.state = PointerState { px: x, py: y, vx: 0.0, vy: 0.0 };
    }

    pub fn position(&self) -> (f64, f64) { (self.state.px, self.state.py) }
    pub fn velocity(&self) -> (f64, f64) { (self.state.vx, self.state.vy) }
    pub fn state(&self)    -> PointerState { self.state }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> PointerFilter {
        PointerFilter::new(PointerConfig::default())
    }

    #[test]
    fn first_step_matches_hand_computation() {
        let mut f = filter();
        // a = 100 * 0.22 = 22, v = 22 * 0.68 = 14.96
        let (x, y) = f.update(100.0, 0.0);
        assert!((x - 14.96).abs() < 1e-9);
        assert_eq!(y, 0.0);
        assert!((f.velocity().0 - 14.96).abs() < 1e-9);
    }

    #[test]
    fn settles_on_constant_target() {
        let mut f = filter();
        for _ in 0..200 {
            f.update(640.0, 360.0);
        }
        let (x, y) = f.position();
        assert!((x - 640.0).abs() < 1e-6, "x = {}", x);
        assert!((y - 360.0).abs() < 1e-6, "y = {}", y);
        assert!(f.velocity().0.abs() < 1e-6);
    }

    #[test]
    fn overshoot_is_bounded() {
        // With follow 0.22 / damp 0.68 the step response peaks about 21%
        // past the target; it must never reach 25%.
        let mut f = filter();
        let mut peak = 0.0_f64;
        for _ in 0..200 {
            let (x, _) = f.update(100.0, 0.0);
            peak = peak.max(x);
        }
        assert!(peak > 100.0);
        assert!(peak < 125.0, "peak = {}", peak);
    }

    #[test]
    fn higher_follow_moves_faster() {
        let mut slow = filter();
        let mut fast = PointerFilter::new(PointerConfig { follow: 0.5, damp: 0.68 });
        slow.update(100.0, 0.0);
        fast.update(100.0, 0.0);
        assert!(fast.position().0 > slow.position().0);
    }

    #[test]
    fn reset_zeroes_velocity() {
        let mut f = filter();
        for _ in 0..5 { f.update(500.0, 500.0); }
        assert!(f.velocity().0 != 0.0);
        f.reset_to(-9999.0, -9999.0);
        assert_eq!(f.state(), PointerState { px: -9999.0, py: -9999.0, vx: 0.0, vy: 0.0 });
    }
}
