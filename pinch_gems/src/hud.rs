//! Heads-up display state: the status sink the gesture session reports into,
//! plus the toast line.

use std::time::{Duration, Instant};

use hand_pointer::StatusSink;

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_millis(900);

// ════════════════════════════════════════════════════════════════════════════
// Toast
// ════════════════════════════════════════════════════════════════════════════

/// A transient one-line message. A new toast replaces the old one.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub message: String,
    pub expires: Instant,
}

// ════════════════════════════════════════════════════════════════════════════
// Hud
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct Hud {
    pub camera_on:  bool,
    pub hand_ok:    bool,
    pub pinched:    bool,
    pub pinch_text: String,
    pub fps_text:   String,
    /// Label of the gem hit by the most recent pinch press.
    pub last_press: Option<String>,
    toast:          Option<Toast>,
}

impl Default for Hud {
    fn default() -> Self {
        Hud {
            camera_on:  false,
            hand_ok:    false,
            pinched:    false,
            pinch_text: pinch_text(None),
            fps_text:   fps_text(None),
            last_press: None,
            toast:      None,
        }
    }
}

impl Hud {
    pub fn toast(&mut self, message: &str) {
        self.toast_at(message, Instant::now());
    }

    pub fn toast_at(&mut self, message: &str, now: Instant) {
        log::debug!("toast: {}", message);
        self.toast = Some(Toast { message: message.to_string(), expires: now + TOAST_TTL });
    }

    /// The toast to show at `now`, if it has not expired.
    pub fn visible_toast(&self, now: Instant) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|t| now < t.expires)
            .map(|t| t.message.as_str())
    }

    pub fn camera_text(&self) -> &'static str {
        if self.camera_on { "CAM ON" } else { "CAM OFF" }
    }

    pub fn hand_text(&self) -> &'static str {
        if self.hand_ok { "HAND OK" } else { "NO HAND" }
    }
}

impl StatusSink for Hud {
    fn tracking(&mut self, active: bool) {
        self.camera_on = active;
    }

    fn hand_presence(&mut self, present: bool) {
        self.hand_ok = present;
    }

    fn pinch_distance(&mut self, distance: Option<f64>) {
        self.pinch_text = pinch_text(distance);
    }

    fn fps(&mut self, fps: Option<f64>) {
        self.fps_text = fps_text(fps);
    }

    fn pinch(&mut self, pinched: bool) {
        self.pinched = pinched;
    }

    fn pressed(&mut self, element: &str) {
        log::info!("pinch pressed {}", element);
        self.last_press = Some(element.to_string());
    }
}

fn pinch_text(distance: Option<f64>) -> String {
    match distance {
        Some(d) => format!("PINCH: {:.3}", d),
        None    => "PINCH: -".to_string(),
    }
}

fn fps_text(fps: Option<f64>) -> String {
    match fps {
        Some(f) => format!("FPS: {:.0}", f),
        None    => "FPS: -".to_string(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
