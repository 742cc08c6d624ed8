//! # gem_grid
//!
//! A grid of decorative gems that cycle through seven colours when pressed.
//! The grid is a [`hand_pointer::TargetSurface`]: a pinch from the hand
//! pointer lands on whichever gem is under it, the same as a mouse click.
//!
//! | Operation | Effect |
//! |---|---|
//! | [`GemGrid::cycle`] | Next colour (ruby → emerald → … → slate → ruby), 110 ms press flash |
//! | [`GemGrid::reset`] | Gem at position `i` gets colour `i % 7` |
//! | [`GemGrid::shuffle`] | Random reorder of the cells |
//! | [`GemGrid::gem_at`] | Screen point → gem |

pub mod grid;
pub mod palette;

pub use grid::{Gem, GemGrid, GemId, GridLayout, Rect, PRESS_FX};
pub use palette::GemColor;
