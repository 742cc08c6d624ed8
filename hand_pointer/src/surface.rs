//! The two collaborators a session talks to.
//!
//! * [`TargetSurface`]: whatever is clickable under the pointer.
//! * [`StatusSink`]: whoever shows the user what the tracker is doing.
//!
//! Neither knows about the other; the session is the only thing holding both.

use std::fmt;

// ════════════════════════════════════════════════════════════════════════════
// TargetSurface
// ════════════════════════════════════════════════════════════════════════════

/// Hit-testing and activation in screen space.
pub trait TargetSurface {
    /// Handle to one activatable element.
    type Element: Clone + PartialEq + fmt::Display;

    /// The element at `(x, y)`, if any.
    fn hit_test(&self, x: f64, y: f64) -> Option<Self::Element>;

    /// Press the element.
    fn activate(&mut self, element: &Self::Element);
}

// ════════════════════════════════════════════════════════════════════════════
// StatusSink
// ════════════════════════════════════════════════════════════════════════════

/// Human-facing telemetry. Every method defaults to a no-op, so sinks only
/// implement what they display.
///
/// `None` in a readout means "unavailable".
pub trait StatusSink {
    /// Tracking started (`true`) or stopped (`false`).
    fn tracking(&mut self, _active: bool) {}

    fn hand_presence(&mut self, _present: bool) {}

    fn pinch_distance(&mut self, _distance: Option<f64>) {}

    fn fps(&mut self, _fps: Option<f64>) {}

    /// Pointer pinch visual on/off.
    fn pinch(&mut self, _pinched: bool) {}

    /// A pinch press landed on `element`.
    fn pressed(&mut self, _element: &str) {}
}

/// Discards everything.
impl StatusSink for () {}
