//! The gem grid: state, layout and hit-testing.
//!
//! Gems are stored in display order; position `i` is drawn in cell `i`
//! (row-major). Shuffling reorders the vector, each gem keeps its id and
//! label.

use std::fmt;
use std::time::{Duration, Instant};

use hand_pointer::TargetSurface;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::palette::GemColor;

/// How long a gem shows its pressed look.
pub const PRESS_FX: Duration = Duration::from_millis(110);

// ════════════════════════════════════════════════════════════════════════════
// GemId
// ════════════════════════════════════════════════════════════════════════════

/// Stable identity of a gem, 0-based. Displays as its label (`G01`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GemId(pub usize);

impl fmt::Display for GemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{:02}", self.0 + 1)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gem
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Gem {
    pub id:    GemId,
    pub color: GemColor,
    pressed_until: Option<Instant>,
}

impl Gem {
    pub fn label(&self) -> String { self.id.to_string() }

    /// Whether the press effect is still showing at `now`.
    pub fn is_pressed(&self, now: Instant) -> bool {
        self.pressed_until.is_some_and(|t| now < t)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rect / GridLayout
// ════════════════════════════════════════════════════════════════════════════

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// Where the grid sits on screen and how it is divided.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub area:    Rect,
    pub columns: usize,
    /// Spacing between cells, pixels.
    pub gap:     f64,
}

impl GridLayout {
    /// Cell rectangle for `position` in a grid of `count` gems.
    pub fn cell(&self, position: usize, count: usize) -> Rect {
        let cols = self.columns.max(1);
        let rows = count.div_ceil(cols).max(1);
        let cw = (self.area.w - self.gap * (cols - 1) as f64) / cols as f64;
        let ch = (self.area.h - self.gap * (rows - 1) as f64) / rows as f64;
        let (row, col) = (position / cols, position % cols);
        Rect {
            x: self.area.x + col as f64 * (cw + self.gap),
            y: self.area.y + row as f64 * (ch + self.gap),
            w: cw,
            h: ch,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GemGrid
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct GemGrid {
    gems:   Vec<Gem>,
    layout: GridLayout,
}

impl GemGrid {
    /// `count` gems, gem `i` coloured by its position.
    pub fn new(count: usize, layout: GridLayout) -> Self {
        let gems = (0..count)
            .map(|i| Gem {
                id:            GemId(i),
                color:         GemColor::for_position(i),
                pressed_until: None,
            })
            .collect();
        GemGrid { gems, layout }
    }

    /// Gems in display order.
    pub fn gems(&self) -> &[Gem] { &self.gems }
    pub fn len(&self) -> usize { self.gems.len() }
    pub fn is_empty(&self) -> bool { self.gems.is_empty() }

    pub fn layout(&self) -> GridLayout { self.layout }
    pub fn set_layout(&mut self, layout: GridLayout) { self.layout = layout; }

    pub fn get(&self, id: GemId) -> Option<&Gem> {
        self.gems.iter().find(|g| g.id == id)
    }

    /// Screen rectangle of the gem at display `position`.
    pub fn cell(&self, position: usize) -> Rect {
        self.layout.cell(position, self.gems.len())
    }

    /// Advance `id` to its next colour and start the press effect.
    pub fn cycle_at(&mut self, id: GemId, now: Instant) -> Option<GemColor> {
        let gem = self.gems.iter_mut().find(|g| g.id == id)?;
        gem.color = gem.color.next();
        gem.pressed_until = Some(now + PRESS_FX);
        Some(gem.color)
    }

    pub fn cycle(&mut self, id: GemId) -> Option<GemColor> {
        self.cycle_at(id, Instant::now())
    }

    /// Recolour every gem by its current display position.
    pub fn reset(&mut self) {
        for (i, gem) in self.gems.iter_mut().enumerate() {
            gem.color = GemColor::for_position(i);
        }
        log::info!("gem colours reset");
    }

    /// Uniformly permute the display order.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.gems.shuffle(rng);
        log::info!("gems shuffled");
    }

    /// Gem whose cell contains `(x, y)`. Gaps between cells hit nothing.
    pub fn gem_at(&self, x: f64, y: f64) -> Option<GemId> {
        (0..self.gems.len())
            .find(|&pos| self.cell(pos).contains(x, y))
            .map(|pos| self.gems[pos].id)
    }
}

impl TargetSurface for GemGrid {
    type Element = GemId;

    fn hit_test(&self, x: f64, y: f64) -> Option<GemId> {
        self.gem_at(x, y)
    }

    fn activate(&mut self, element: &GemId) {
        if let Some(color) = self.cycle(*element) {
            log::debug!("{} -> {}", element, color);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// 4 columns of 100x100 cells with 10px gaps: 430 wide.
    fn layout() -> GridLayout {
        GridLayout {
            area:    Rect { x: 0.0, y: 0.0, w: 430.0, h: 320.0 },
            columns: 4,
            gap:     10.0,
        }
    }

    fn grid(count: usize) -> GemGrid {
        GemGrid::new(count, layout())
    }

    #[test]
    fn labels_are_one_based_and_padded() {
        let g = grid(24);
        assert_eq!(g.gems()[0].label(), "G01");
        assert_eq!(g.gems()[23].label(), "G24");
        assert_eq!(GemId(99).to_string(), "G100");
    }

    #[test]
    fn initial_colours_follow_position() {
        let g = grid(24);
        assert_eq!(g.gems()[0].color, GemColor::Ruby);
        assert_eq!(g.gems()[4].color, GemColor::Amber);
        assert_eq!(g.gems()[7].color, GemColor::Ruby);
    }

    #[test]
    fn cycle_advances_and_flashes() {
        let mut g = grid(8);
        let now = Instant::now();
        assert_eq!(g.cycle_at(GemId(6), now), Some(GemColor::Ruby));
        let gem = g.get(GemId(6)).unwrap();
        assert!(gem.is_pressed(now));
        assert!(gem.is_pressed(now + Duration::from_millis(100)));
        assert!(!gem.is_pressed(now + PRESS_FX));
    }

    #[test]
    fn cycle_unknown_gem_is_none() {
        assert_eq!(grid(3).cycle(GemId(3)), None);
    }

    #[test]
    fn cells_are_row_major_with_gaps() {
        let g = grid(8);
        assert_eq!(g.cell(0), Rect { x: 0.0,   y: 0.0,   w: 100.0, h: 155.0 });
        assert_eq!(g.cell(5), Rect { x: 110.0, y: 165.0, w: 100.0, h: 155.0 });
    }

    #[test]
    fn hit_test_finds_cell_and_misses_gap() {
        let g = grid(8);
        assert_eq!(g.hit_test(50.0, 50.0), Some(GemId(0)));
        assert_eq!(g.hit_test(150.0, 200.0), Some(GemId(5)));
        assert_eq!(g.hit_test(105.0, 50.0), None);
        assert_eq!(g.hit_test(-1.0, 50.0), None);
        assert_eq!(g.hit_test(500.0, 50.0), None);
    }

    #[test]
    fn activate_cycles_hit_gem() {
        let mut g = grid(8);
        let id = g.hit_test(50.0, 50.0).unwrap();
        g.activate(&id);
        assert_eq!(g.get(id).unwrap().color, GemColor::Emerald);
    }

    #[test]
    fn shuffle_keeps_every_gem() {
        let mut g = grid(24);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        g.shuffle(&mut rng);
        let mut ids: Vec<usize> = g.gems().iter().map(|gem| gem.id.0).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..24).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_moves_hit_targets() {
        let mut g = grid(24);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        g.shuffle(&mut rng);
        let order: Vec<GemId> = g.gems().iter().map(|gem| gem.id).collect();
        assert_ne!(order, (0..24).map(GemId).collect::<Vec<_>>());
        // Whatever sits at position 0 is what the first cell hits.
        assert_eq!(g.hit_test(50.0, 20.0), Some(order[0]));
    }

    #[test]
    fn reset_colours_by_current_position() {
        let mut g = grid(24);
        for i in 0..24 { g.cycle(GemId(i)); }
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        g.shuffle(&mut rng);
        g.reset();
        for (pos, gem) in g.gems().iter().enumerate() {
            assert_eq!(gem.color, GemColor::for_position(pos));
        }
    }
}
