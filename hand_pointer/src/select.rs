//! Which hand to track when several are visible.
//!
//! The hand whose reference landmark sits furthest along +x in camera space
//! wins; equal values keep the first one seen. No identity is carried
//! between frames, the choice is made fresh every time.

use std::borrow::Borrow;

use crate::landmark::Hand;

/// Index into `hands` of the hand to track, or `None` if there are none.
///
/// Hands missing the `reference` landmark are skipped.
pub fn select_hand<H: Borrow<Hand>>(hands: &[H], reference: usize) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, hand) in hands.iter().enumerate() {
        let Some(lm) = hand.borrow().landmark(reference) else { continue };
        match best {
            Some((_, best_x)) if lm.x <= best_x => {}
            _ => best = Some((i, lm.x)),
        }
    }
    best.map(|(i, _)| i)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
