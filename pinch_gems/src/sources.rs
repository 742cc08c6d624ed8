//! Frame providers for the app: a simulated hand driven from the window, and
//! real LeapMotion hands behind the `leap` feature.
//!
//! Both implement [`FrameSource`], so the app never knows which one it is
//! talking to.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use hand_pointer::landmark::*;
use hand_pointer::{FrameResult, FrameSource, Hand, Landmark, SourceLink};

use crate::config::ProviderOptions;

// ════════════════════════════════════════════════════════════════════════════
// SimInput
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the window that steers the simulated hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Fingertip position as a fraction of the window (0–1, screen
    /// orientation). `None` when the mouse is outside the window.
    Pointer(Option<(f64, f64)>),
    /// Thumb held against the index tip or not.
    Pinch(bool),
    /// Take the hand out of view / bring it back.
    ToggleHand,
    /// Add or remove a second, stationary hand.
    ToggleSecondHand,
}

// ════════════════════════════════════════════════════════════════════════════
// SimRig: the simulated hand's state
// ════════════════════════════════════════════════════════════════════════════

/// Camera-space position of the stationary second hand's index tip.
const SECOND_HAND_TIP: (f64, f64) = (0.5, 0.45);

/// Thumb-to-index gap (camera x) when pinched and when open.
const PINCH_GAP: f64 = 0.015;
const OPEN_GAP:  f64 = 0.12;

#[derive(Clone, Debug)]
pub struct SimRig {
    tip:         Option<(f64, f64)>,
    pinched:     bool,
    hidden:      bool,
    second_hand: bool,
}

impl Default for SimRig {
    fn default() -> Self {
        SimRig { tip: None, pinched: false, hidden: false, second_hand: false }
    }
}

impl SimRig {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer(p)         => self.tip = p,
            SimInput::Pinch(on)          => self.pinched = on,
            SimInput::ToggleHand         => self.hidden = !self.hidden,
            SimInput::ToggleSecondHand   => self.second_hand = !self.second_hand,
        }
    }

    /// What a camera would report right now, at most `max_hands` hands.
    pub fn frame(&self, max_hands: usize) -> FrameResult {
        let mut hands = Vec::with_capacity(2);
        if let (Some((sx, sy)), false) = (self.tip, self.hidden) {
            // The camera sees the user un-mirrored.
            hands.push(synth_hand((1.0 - sx, sy), self.pinched));
        }
        if self.second_hand {
            hands.push(synth_hand(SECOND_HAND_TIP, false));
        }
        hands.truncate(max_hands);
        FrameResult::with_hands(hands)
    }
}

/// A plausible 21-point hand whose index tip is at `tip` (camera space),
/// fingers pointing up, wrist below.
pub fn synth_hand(tip: (f64, f64), pinched: bool) -> Hand {
    let (cx, cy) = tip;
    let gap = if pinched { PINCH_GAP } else { OPEN_GAP };
    let mut lm = vec![Landmark::default(); LANDMARK_COUNT];

    lm[WRIST] = Landmark::new(cx, cy + 0.30);

    // Thumb runs from the base of the palm out to beside the index tip.
    let thumb_base = Landmark::new(cx + 0.05, cy + 0.26);
    let thumb_tip  = Landmark::new(cx + gap, cy + 0.01);
    for (k, idx) in [THUMB_CMC, THUMB_MCP, THUMB_IP, THUMB_TIP].into_iter().enumerate() {
        lm[idx] = lerp(&thumb_base, &thumb_tip, k as f64 / 3.0);
    }

    let fingers = [
        [INDEX_MCP,  INDEX_PIP,  INDEX_DIP,  INDEX_TIP],
        [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
        [RING_MCP,   RING_PIP,   RING_DIP,   RING_TIP],
        [PINKY_MCP,  PINKY_PIP,  PINKY_DIP,  PINKY_TIP],
    ];
    for (f, joints) in fingers.iter().enumerate() {
        let dx   = -0.035 * f as f64;
        let base = Landmark::new(cx + dx, cy + 0.15 + 0.005 * f as f64);
        let end  = Landmark::new(cx + dx, cy + 0.012 * f as f64);
        for (k, &idx) in joints.iter().enumerate() {
            lm[idx] = lerp(&base, &end, k as f64 / 3.0);
        }
    }
    Hand::new(lm)
}

fn lerp(a: &Landmark, b: &Landmark, t: f64) -> Landmark {
    Landmark::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource: always available
// ════════════════════════════════════════════════════════════════════════════

/// Provider that renders a [`SimRig`] at a fixed frame rate, steered by
/// [`SimInput`]s from the window.
///
/// Exits when the feed is dropped or the input sender goes away.
pub struct SimHandSource {
    pub rx:      Receiver<SimInput>,
    pub options: ProviderOptions,
}

impl FrameSource for SimHandSource {
    fn run(self: Box<Self>, mut link: SourceLink) {
        let period = Duration::from_secs_f64(1.0 / self.options.frame_rate_hz);
        let mut rig = SimRig::default();
        link.ready();
        log::debug!("simulated hand running at {} Hz", self.options.frame_rate_hz);

        loop {
            loop {
                match self.rx.try_recv() {
                    Ok(input)                       => rig.apply(input),
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }
            if !link.send(rig.frame(self.options.max_hands)) {
                log::debug!("simulated hand: consumer gone");
                return;
            }
            thread::sleep(period);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Provider backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Leap reports millimetres above the device; x in roughly ±200 and y in
/// 100–500 are mapped onto the 0–1 camera square, with x flipped so the
/// usual mirroring puts the pointer under the hand.
#[cfg(feature = "leap")]
pub struct LeapHandSource {
    pub options: ProviderOptions,
}

#[cfg(feature = "leap")]
impl FrameSource for LeapHandSource {
    fn run(self: Box<Self>, mut link: SourceLink) {
        use hand_pointer::SourceError;
        use leaprs::{Connection, ConnectionConfig, Event};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                link.fail(SourceError::Unavailable(format!("LeapC connection: {:?}", e)));
                return;
            }
        };
        if let Err(e) = connection.open() {
            link.fail(SourceError::Unavailable(format!("LeapMotion device: {:?}", e)));
            return;
        }
        link.ready();
        log::info!("LeapMotion connected");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };
            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<Hand> = frame
                    .hands()
                    .take(self.options.max_hands)
                    .map(|h| leap_hand(&h))
                    .collect();
                if !link.send(FrameResult::with_hands(hands)) {
                    log::debug!("LeapMotion: consumer gone");
                    return;
                }
            }
        }
    }
}

/// Palm centre stands in for the wrist; each digit contributes its four
/// joints from knuckle to tip.
#[cfg(feature = "leap")]
fn leap_hand(hand: &leaprs::Hand) -> Hand {
    let norm = |x: f32, y: f32| {
        Landmark::new(
            1.0 - (x as f64 + 200.0) / 400.0,
            1.0 - (y as f64 - 100.0) / 400.0,
        )
    };
    let palm = hand.palm().position();
    let mut lm = Vec::with_capacity(LANDMARK_COUNT);
    lm.push(norm(palm.x, palm.y));
    for digit in hand.digits() {
        let joints = [
            digit.proximal().prev_joint(),
            digit.intermediate().prev_joint(),
            digit.distal().prev_joint(),
            digit.distal().next_joint(),
        ];
        lm.extend(joints.iter().map(|j| norm(j.x, j.y)));
    }
    Hand::new(lm)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_pointer::{select_hand, spawn_frame_source};
    use std::sync::mpsc;
    use std::time::Instant;

    fn pinch_gap(hand: &Hand) -> f64 {
        hand.landmark(THUMB_TIP).unwrap().distance(hand.landmark(INDEX_TIP).unwrap())
    }

    #[test]
    fn synthetic_hand_is_well_formed() {
        let hand = synth_hand((0.3, 0.4), false);
        assert!(hand.is_well_formed());
        assert_eq!(*hand.landmark(INDEX_TIP).unwrap(), Landmark::new(0.3, 0.4));
    }

    #[test]
    fn synthetic_pinch_crosses_thresholds() {
        assert!(pinch_gap(&synth_hand((0.5, 0.5), true)) < 0.040);
        assert!(pinch_gap(&synth_hand((0.5, 0.5), false)) > 0.060);
    }

    #[test]
    fn rig_without_pointer_shows_no_hand() {
        assert!(SimRig::default().frame(2).hands.is_empty());
    }

    #[test]
    fn rig_mirrors_pointer_into_camera_space() {
        let mut rig = SimRig::default();
        rig.apply(SimInput::Pointer(Some((0.25, 0.6))));
        let frame = rig.frame(2);
        let tip = frame.hands[0].landmark(INDEX_TIP).unwrap();
        assert!((tip.x - 0.75).abs() < 1e-12);
        assert!((tip.y - 0.6).abs() < 1e-12);
    }

    #[test]
    fn rig_toggles_hide_hand() {
        let mut rig = SimRig::default();
        rig.apply(SimInput::Pointer(Some((0.5, 0.5))));
        rig.apply(SimInput::ToggleHand);
        assert!(rig.frame(2).hands.is_empty());
        rig.apply(SimInput::ToggleHand);
        assert_eq!(rig.frame(2).hands.len(), 1);
    }

    #[test]
    fn second_hand_respects_max_hands() {
        let mut rig = SimRig::default();
        rig.apply(SimInput::Pointer(Some((0.2, 0.5))));
        rig.apply(SimInput::ToggleSecondHand);
        assert_eq!(rig.frame(2).hands.len(), 2);
        assert_eq!(rig.frame(1).hands.len(), 1);
    }

    #[test]
    fn second_hand_wins_only_when_further_right() {
        let mut rig = SimRig::default();
        rig.apply(SimInput::ToggleSecondHand);
        // Pointer on the left of the screen: camera x 0.8 beats 0.5.
        rig.apply(SimInput::Pointer(Some((0.2, 0.5))));
        assert_eq!(select_hand(&rig.frame(2).hands, WRIST), Some(0));
        // Pointer on the right of the screen: the stationary hand wins.
        rig.apply(SimInput::Pointer(Some((0.8, 0.5))));
        assert_eq!(select_hand(&rig.frame(2).hands, WRIST), Some(1));
    }

    #[test]
    fn sim_source_streams_and_follows_input() {
        let (tx, rx) = mpsc::channel();
        let options = ProviderOptions { max_hands: 2, frame_rate_hz: 200.0 };
        let feed = spawn_frame_source(SimHandSource { rx, options }).unwrap();
        tx.send(SimInput::Pointer(Some((0.5, 0.5)))).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut saw_hand = false;
        while Instant::now() < deadline && !saw_hand {
            if let Ok(Some(frame)) = feed.latest() {
                saw_hand = !frame.hands.is_empty();
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert!(saw_hand);
    }

    #[test]
    fn sim_source_exits_when_input_closes() {
        let (tx, rx) = mpsc::channel::<SimInput>();
        let options = ProviderOptions { max_hands: 2, frame_rate_hz: 200.0 };
        let feed = spawn_frame_source(SimHandSource { rx, options }).unwrap();
        drop(tx);

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut disconnected = false;
        while Instant::now() < deadline && !disconnected {
            disconnected = feed.latest().is_err();
            thread::sleep(Duration::from_millis(5));
        }
        assert!(disconnected);
    }
}
