//! # pinch_gems
//!
//! A grid of gems you press by pinching in the air. Hand frames come from a
//! provider thread, the [`hand_pointer`] session turns them into a smoothed
//! pointer and pinch presses, and the [`gem_grid`] under the pointer cycles
//! colour.
//!
//! ## Window
//!
//! The gem grid fills the left of the window. The side panel shows the
//! camera and hand LEDs, the live pinch distance and frame rate, and a
//! mirrored preview of the tracked landmarks. One toast at a time appears
//! above the key legend.
//!
//! ## Feature flags
//!
//! * (default), **simulation mode**: the mouse is the index fingertip.
//! * `leap`, **hardware mode**: hands from a LeapMotion controller via LeapC.
//!
//! ### Keys
//!
//! | Key | Action |
//! |---|---|
//! | `C` | Start camera |
//! | `X` | Stop camera |
//! | `R` | Reset colours |
//! | `S` | Shuffle gems |
//! | Left click | Cycle the gem under the mouse |
//! | `Q` / `Esc` | Quit |
//!
//! ### Simulated hand
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse position | Index fingertip |
//! | Hold `Space` | Pinch |
//! | `H` | Hide / show the hand |
//! | `G` | Add / remove a second hand at the centre of the camera |

pub mod app;
pub mod config;
pub mod error;
pub mod hud;
pub mod sources;
pub mod visualizer;
