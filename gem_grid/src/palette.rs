//! The gem colour cycle.

use std::fmt;

/// Gem colours in cycle order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GemColor {
    Ruby,
    Emerald,
    Sapphire,
    Amethyst,
    Amber,
    Ice,
    Slate,
}

impl GemColor {
    pub const ALL: [GemColor; 7] = [
        GemColor::Ruby,
        GemColor::Emerald,
        GemColor::Sapphire,
        GemColor::Amethyst,
        GemColor::Amber,
        GemColor::Ice,
        GemColor::Slate,
    ];

    /// The colour a gem at `position` starts with.
    pub fn for_position(position: usize) -> Self {
        Self::ALL[position % Self::ALL.len()]
    }

    /// Next colour in the cycle, wrapping after slate.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            GemColor::Ruby     => "ruby",
            GemColor::Emerald  => "emerald",
            GemColor::Sapphire => "sapphire",
            GemColor::Amethyst => "amethyst",
            GemColor::Amber    => "amber",
            GemColor::Ice      => "ice",
            GemColor::Slate    => "slate",
        }
    }

    /// Packed 0xAARRGGBB fill.
    pub fn argb(self) -> u32 {
        match self {
            GemColor::Ruby     => 0xFFE0245E,
            GemColor::Emerald  => 0xFF17B978,
            GemColor::Sapphire => 0xFF2F6FED,
            GemColor::Amethyst => 0xFF9B5DE5,
            GemColor::Amber    => 0xFFFFB627,
            GemColor::Ice      => 0xFF9BE7FF,
            GemColor::Slate    => 0xFF6C7A89,
        }
    }
}

impl fmt::Display for GemColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
