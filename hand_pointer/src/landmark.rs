//! Per-frame hand data delivered by a perception provider.
//!
//! Coordinates are normalized camera space: `x` and `y` run 0.0–1.0 across
//! the camera image, `z` is relative depth and never read by the pipeline.
//! Points slightly outside the image are normal; anything beyond
//! [`COORD_BAND`] is treated as a detector glitch.

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices (21-point hand model)
// ════════════════════════════════════════════════════════════════════════════

/// Number of keypoints in a well-formed hand.
pub const LANDMARK_COUNT: usize = 21;

/// Accepted range for normalized `x` and `y`.
pub const COORD_BAND: (f64, f64) = (-1.0, 2.0);

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One tracked keypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    /// Planar (x, y) Euclidean distance; `z` is ignored.
    pub fn distance(&self, other: &Landmark) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Finite and within [`COORD_BAND`] on both planar axes.
    fn is_plausible(&self) -> bool {
        let (lo, hi) = COORD_BAND;
        (lo..=hi).contains(&self.x) && (lo..=hi).contains(&self.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hand
// ════════════════════════════════════════════════════════════════════════════

/// The keypoints of one detected hand, indexed by the constants above.
///
/// Providers hand over whatever they detected; [`Hand::is_well_formed`]
/// decides whether the pipeline may use it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
}

impl Hand {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Hand { landmarks }
    }

    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Exactly [`LANDMARK_COUNT`] points, all finite and inside
    /// [`COORD_BAND`].
    pub fn is_well_formed(&self) -> bool {
        self.landmarks.len() == LANDMARK_COUNT
            && self.landmarks.iter().all(Landmark::is_plausible)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameResult
// ════════════════════════════════════════════════════════════════════════════

/// Camera image attached to a frame, packed 0xAARRGGBB, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameImage {
    pub width:  usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

/// Everything the provider reports for one camera frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameResult {
    pub image: Option<FrameImage>,
    pub hands: Vec<Hand>,
}

impl FrameResult {
    pub fn with_hands(hands: Vec<Hand>) -> Self {
        FrameResult { image: None, hands }
    }

    /// A frame in which nothing was detected.
    pub fn empty() -> Self {
        FrameResult::default()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand(x: f64, y: f64) -> Hand {
        Hand::new(vec![Landmark::new(x, y); LANDMARK_COUNT])
    }

    #[test]
    fn distance_ignores_depth() {
        let a = Landmark { x: 0.0, y: 0.0, z: 5.0 };
        let b = Landmark { x: 0.3, y: 0.4, z: -5.0 };
        assert!((a.distance(&b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn full_hand_is_well_formed() {
        assert!(flat_hand(0.5, 0.5).is_well_formed());
    }

    #[test]
    fn short_hand_is_malformed() {
        let mut hand = flat_hand(0.5, 0.5);
        hand.landmarks.truncate(9);
        assert!(!hand.is_well_formed());
        assert!(hand.landmark(INDEX_TIP).is_some());
        assert!(hand.landmark(PINKY_TIP).is_none());
    }

    #[test]
    fn nan_coordinate_is_malformed() {
        let mut hand = flat_hand(0.5, 0.5);
        hand.landmarks[THUMB_TIP].y = f64::NAN;
        assert!(!hand.is_well_formed());
    }

    #[test]
    fn far_out_of_frame_coordinate_is_malformed() {
        let mut hand = flat_hand(0.5, 0.5);
        hand.landmarks[INDEX_TIP].x = 1e308;
        assert!(!hand.is_well_formed());

        let mut hand = flat_hand(0.5, 0.5);
        hand.landmarks[WRIST].y = -1.5;
        assert!(!hand.is_well_formed());
    }

    #[test]
    fn slightly_out_of_frame_is_still_well_formed() {
        let mut hand = flat_hand(0.5, 0.5);
        hand.landmarks[INDEX_TIP] = Landmark::new(-0.2, 1.3);
        assert!(hand.is_well_formed());
    }
}
