//! Tuning constants for the pipeline.
//!
//! The defaults are the empirically tuned values the pointer and pinch feel
//! were designed around. Every struct deserializes with `#[serde(default)]`
//! so a config file only has to name what it changes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::landmark::{INDEX_TIP, LANDMARK_COUNT, THUMB_TIP, WRIST};

// ════════════════════════════════════════════════════════════════════════════
// PointerConfig
// ════════════════════════════════════════════════════════════════════════════

/// Spring-follow smoothing of the virtual pointer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Fraction of positional error turned into an acceleration impulse.
    pub follow: f64,
    /// Fraction of velocity kept from one frame to the next.
    pub damp:   f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        PointerConfig { follow: 0.22, damp: 0.68 }
    }
}

impl PointerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("pointer.follow", self.follow, f64::EPSILON, 1.0)?;
        check_range("pointer.damp", self.damp, 0.0, 1.0 - f64::EPSILON)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PinchConfig
// ════════════════════════════════════════════════════════════════════════════

/// Hysteresis band for the pinch detector, in normalized camera units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchConfig {
    /// Released → Pressed when the distance drops below this.
    pub press_below:   f64,
    /// Pressed → Released when the distance rises above this.
    pub release_above: f64,
}

impl Default for PinchConfig {
    fn default() -> Self {
        PinchConfig { press_below: 0.040, release_above: 0.060 }
    }
}

impl PinchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.press_below > 0.0 && self.press_below < self.release_above) {
            return Err(ConfigError::PinchBand {
                press_below:   self.press_below,
                release_above: self.release_above,
            });
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkMap
// ════════════════════════════════════════════════════════════════════════════

/// Which keypoints play which role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkMap {
    /// Compared across hands to pick the tracked one.
    pub reference: usize,
    /// Drives the pointer.
    pub pointer:   usize,
    /// Pinched against the pointer tip.
    pub pinch:     usize,
}

impl Default for LandmarkMap {
    fn default() -> Self {
        LandmarkMap { reference: WRIST, pointer: INDEX_TIP, pinch: THUMB_TIP }
    }
}

impl LandmarkMap {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (role, index) in [
            ("reference", self.reference),
            ("pointer",   self.pointer),
            ("pinch",     self.pinch),
        ] {
            if index >= LANDMARK_COUNT {
                return Err(ConfigError::LandmarkIndex { role, index });
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SessionConfig
// ════════════════════════════════════════════════════════════════════════════

/// Everything a [`GestureSession`](crate::GestureSession) is tuned by.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub pointer:     PointerConfig,
    pub pinch:       PinchConfig,
    pub landmarks:   LandmarkMap,
    /// Weight of the newest sample in the FPS moving average.
    pub fps_weight:  f64,
    /// Flip x when mapping to the screen (front-facing camera).
    pub mirror_x:    bool,
    /// Where the pointer is parked while tracking is stopped.
    pub off_surface: (f64, f64),
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            pointer:     PointerConfig::default(),
            pinch:       PinchConfig::default(),
            landmarks:   LandmarkMap::default(),
            fps_weight:  0.15,
            mirror_x:    true,
            off_surface: (-9999.0, -9999.0),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pointer.validate()?;
        self.pinch.validate()?;
        self.landmarks.validate()?;
        check_range("fps_weight", self.fps_weight, f64::EPSILON, 1.0)
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value, min, max })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
