//! Software-rendered window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────┬───────────────┐
//! │  ◆G01  ◆G02  ◆G03  ◆G04  ◆G05  ◆G06              │ ● CAM ON      │
//! │                                                  │ ● HAND OK     │
//! │  ◆G07  ◆G08   ...                                │ PINCH: 0.034  │
//! │                                    ◯ pointer     │ FPS: 60       │
//! │  ...                                             │ ┌───────────┐ │
//! │                                                  │ │  preview  │ │
//! │                                                  │ └───────────┘ │
//! │  toast                                           │               │
//! │  key legend                                      │               │
//! └──────────────────────────────────────────────────┴───────────────┘
//! ```
//!
//! The pointer and all hit-testing use window pixels, so the grid and the
//! pointer share one coordinate space.

use std::time::{Duration, Instant};

use gem_grid::{GridLayout, Rect};
use hand_pointer::FrameImage;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::app::AppState;
use crate::error::AppError;
use crate::sources::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:     usize = 1200;
pub const WIN_H:     usize = 720;
pub const PANEL_W:   usize = 300;
const MARGIN:        usize = 24;
const LEGEND_H:      usize = 64;
const GRID_GAP:      f64   = 14.0;
const PREVIEW_W:     usize = 256;
const PREVIEW_H:     usize = 192;
const PREVIEW_Y:     usize = 200;
const POINTER_R:     isize = 14;
const FONT_SCALE:    usize = 2;

const BG_COLOR:      u32 = 0xFF12131C;
const PANEL_BG:      u32 = 0xFF1B1D2B;
const PREVIEW_BG:    u32 = 0xFF0B0C12;
const TEXT_COLOR:    u32 = 0xFFE8E8F0;
const DIM_TEXT:      u32 = 0xFF7D8090;
const LED_ON:        u32 = 0xFF36D66B;
const LED_OFF:       u32 = 0xFFE0404A;
const POINTER_COLOR: u32 = 0xFFFFFFFF;
const TIP_COLOR:     u32 = 0xFF40E0FF;
const PINCH_COLOR:   u32 = 0xFFFF5CC8;
const JOINT_COLOR:   u32 = 0xFF9AA0B4;

/// Where the gem grid goes in a window of the given size.
pub fn grid_layout(width: usize, height: usize, columns: usize) -> GridLayout {
    let w = width.saturating_sub(PANEL_W + 2 * MARGIN).max(1);
    let h = height.saturating_sub(2 * MARGIN + LEGEND_H).max(1);
    GridLayout {
        area: Rect { x: MARGIN as f64, y: MARGIN as f64, w: w as f64, h: h as f64 },
        columns,
        gap: GRID_GAP,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UiEvent
// ════════════════════════════════════════════════════════════════════════════

/// What the window asks the app to do this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UiEvent {
    Quit,
    StartCamera,
    StopCamera,
    Reset,
    Shuffle,
    /// Left mouse button went down at this window position.
    Click { x: f64, y: f64 },
    /// Steering for the simulated hand.
    Sim(SimInput),
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:       Window,
    buf:          Vec<u32>,
    width:        usize,
    height:       usize,

    // edge detection for held inputs
    last_mouse:   Option<(f64, f64)>,
    mouse_down:   bool,
    space_down:   bool,
}

impl Visualizer {
    pub fn new() -> Result<Self, AppError> {
        let mut window = Window::new(
            "Pinch Gems",
            WIN_W, WIN_H,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf:        vec![BG_COLOR; WIN_W * WIN_H],
            width:      WIN_W,
            height:     WIN_H,
            last_mouse: None,
            mouse_down: false,
            space_down: false,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Current client size. Follows user resizes and reallocates the frame
    /// buffer to match.
    pub fn size(&mut self) -> (usize, usize) {
        let (w, h) = frame_size((self.width, self.height), self.window.get_size());
        if (w, h) != (self.width, self.height) {
            log::debug!("window resized to {}x{}", w, h);
            self.width  = w;
            self.height = h;
            self.buf    = vec![BG_COLOR; w * h];
        }
        (w, h)
    }

    /// Translate this frame's keyboard and mouse state into events.
    pub fn poll_input(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        if !self.window.is_open() {
            events.push(UiEvent::Quit);
            return events;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            events.push(UiEvent::Quit);
        }
        if one_shot(Key::C) { events.push(UiEvent::StartCamera); }
        if one_shot(Key::X) { events.push(UiEvent::StopCamera); }
        if one_shot(Key::R) { events.push(UiEvent::Reset); }
        if one_shot(Key::S) { events.push(UiEvent::Shuffle); }
        if one_shot(Key::H) { events.push(UiEvent::Sim(SimInput::ToggleHand)); }
        if one_shot(Key::G) { events.push(UiEvent::Sim(SimInput::ToggleSecondHand)); }

        let space = self.window.is_key_down(Key::Space);
        if space != self.space_down {
            self.space_down = space;
            events.push(UiEvent::Sim(SimInput::Pinch(space)));
        }

        let mouse = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x as f64, y as f64));
        if mouse != self.last_mouse {
            self.last_mouse = mouse;
            let frac = mouse.map(|(x, y)| (x / self.width as f64, y / self.height as f64));
            events.push(UiEvent::Sim(SimInput::Pointer(frac)));
        }

        let down = self.window.get_mouse_down(MouseButton::Left);
        if down && !self.mouse_down {
            if let Some((x, y)) = mouse {
                events.push(UiEvent::Click { x, y });
            }
        }
        self.mouse_down = down;

        events
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState, now: Instant) {
        self.buf.fill(BG_COLOR);

        // ── Gems ──────────────────────────────────────────────────────────
        let grid = app.grid();
        for (pos, gem) in grid.gems().iter().enumerate() {
            let cell = grid.cell(pos);
            let base = gem.color.argb();
            let color = if gem.is_pressed(now) { blend(base, 0xFFFFFFFF, 0.45) } else { base };
            self.draw_gem(&cell, color);
            let label = gem.label();
            let tw = text_width(&label);
            let lx = cell.x as usize + (cell.w as usize).saturating_sub(tw) / 2;
            let ly = cell.y as usize + (cell.h as usize).saturating_sub(5 * FONT_SCALE) / 2;
            self.draw_text(&label, lx, ly, 0xFF101010);
        }

        // ── Side panel ────────────────────────────────────────────────────
        self.draw_panel(app);

        // ── Toast + legend ────────────────────────────────────────────────
        let legend_y = self.height - LEGEND_H + 8;
        if let Some(msg) = app.hud().visible_toast(now) {
            let w = text_width(msg) + 24;
            self.fill_rect(MARGIN, legend_y - 4, w, 5 * FONT_SCALE + 10, 0xFF2C3048);
            self.draw_text(msg, MARGIN + 12, legend_y + 1, TEXT_COLOR);
        }
        self.draw_text(
            "C=START X=STOP R=RESET S=SHUFFLE SPACE=PINCH H=HAND G=2ND HAND Q=QUIT",
            MARGIN, self.height - 20, DIM_TEXT,
        );

        // ── Pointer ───────────────────────────────────────────────────────
        if app.session().is_running() {
            let (px, py) = app.session().pointer();
            self.draw_ring(px as isize, py as isize, POINTER_R, app.hud().pinched);
        }

        self.window.update_with_buffer(&self.buf, self.width, self.height).ok();
    }

    // ── Gem ───────────────────────────────────────────────────────────────

    /// Octagon filling `cell`, lighter along the top facet.
    fn draw_gem(&mut self, cell: &Rect, color: u32) {
        let (x0, y0) = (cell.x.max(0.0) as usize, cell.y.max(0.0) as usize);
        let (w, h) = (cell.w as usize, cell.h as usize);
        let cut = w.min(h) / 4;
        let top_facet = blend(color, 0xFFFFFFFF, 0.25);
        let edge = blend(color, 0xFF000000, 0.35);

        for dy in 0..h {
            let inset = if dy < cut {
                cut - dy
            } else if dy >= h - cut {
                dy + 1 - (h - cut)
            } else {
                0
            };
            if 2 * inset >= w { continue; }
            let fill = if dy < h / 3 { top_facet } else { color };
            self.fill_rect(x0 + inset, y0 + dy, w - 2 * inset, 1, fill);
            self.set_pixel(x0 + inset, y0 + dy, edge);
            self.set_pixel(x0 + w - inset - 1, y0 + dy, edge);
        }
    }

    // ── Panel ─────────────────────────────────────────────────────────────

    fn draw_panel(&mut self, app: &AppState) {
        let px = self.width - PANEL_W;
        self.fill_rect(px, 0, PANEL_W, self.height, PANEL_BG);

        let hud = app.hud();
        let x = px + 20;
        self.draw_led(x, 30, hud.camera_on);
        self.draw_text(hud.camera_text(), x + 22, 26, TEXT_COLOR);
        self.draw_led(x, 62, hud.hand_ok);
        self.draw_text(hud.hand_text(), x + 22, 58, TEXT_COLOR);
        self.draw_text(&hud.pinch_text, x, 96, TEXT_COLOR);
        self.draw_text(&hud.fps_text, x, 124, TEXT_COLOR);
        if let Some(last) = &hud.last_press {
            self.draw_text(&format!("LAST: {}", last), x, 152, DIM_TEXT);
        }

        self.draw_preview(app, x, PREVIEW_Y);
    }

    fn draw_led(&mut self, x: usize, y: usize, on: bool) {
        self.draw_disc(x as isize + 6, y as isize + 2, 6, if on { LED_ON } else { LED_OFF });
    }

    /// Mirrored camera view: the image when the provider sends one, and the
    /// landmarks of every hand in the last frame.
    fn draw_preview(&mut self, app: &AppState, x: usize, y: usize) {
        self.fill_rect(x, y, PREVIEW_W, PREVIEW_H, PREVIEW_BG);
        let frame = app.preview();
        if let Some(image) = &frame.image {
            self.blit_mirrored(image, x, y);
        }

        let map = app.session().config().landmarks;
        for hand in &frame.hands {
            for (i, lm) in hand.landmarks.iter().enumerate() {
                if !(lm.x.is_finite() && lm.y.is_finite()) { continue; }
                let sx = x as isize + ((1.0 - lm.x) * PREVIEW_W as f64) as isize;
                let sy = y as isize + (lm.y * PREVIEW_H as f64) as isize;
                let inside = sx >= x as isize && sx < (x + PREVIEW_W) as isize
                          && sy >= y as isize && sy < (y + PREVIEW_H) as isize;
                if !inside { continue; }
                let (r, color) = if i == map.pointer {
                    (4, TIP_COLOR)
                } else if i == map.pinch {
                    (4, PINCH_COLOR)
                } else {
                    (1, JOINT_COLOR)
                };
                self.draw_disc(sx, sy, r, color);
            }
        }
        self.draw_border(x, y, PREVIEW_W, PREVIEW_H, DIM_TEXT);
        self.draw_text("CAMERA", x, y + PREVIEW_H + 8, DIM_TEXT);
    }

    /// Nearest-neighbour scale of `image` into the preview box, flipped
    /// horizontally.
    fn blit_mirrored(&mut self, image: &FrameImage, x: usize, y: usize) {
        if image.width == 0 || image.height == 0 { return; }
        for row in 0..PREVIEW_H {
            let sy = row * image.height / PREVIEW_H;
            for col in 0..PREVIEW_W {
                let sx = image.width - 1 - col * image.width / PREVIEW_W;
                if let Some(&px) = image.pixels.get(sy * image.width + sx) {
                    self.set_pixel(x + col, y + row, px | 0xFF000000);
                }
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..x + w {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..y + h {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    fn set_pixel_i(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    fn draw_disc(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel_i(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Pointer: a 3px ring, solid while pinched.
    fn draw_ring(&mut self, cx: isize, cy: isize, r: isize, filled: bool) {
        let inner = (r - 3) * (r - 3);
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 <= r * r && (filled || d2 >= inner) {
                    self.set_pixel_i(cx + dx, cy + dy, POINTER_COLOR);
                }
            }
        }
    }

    /// Upper-case bitmap text, 3×5 glyphs scaled by [`FONT_SCALE`].
    fn draw_text(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let bits = glyph(ch.to_ascii_uppercase());
            for row in 0..5 {
                for col in 0..3 {
                    if bits & (1 << (14 - (row * 3 + col))) != 0 {
                        self.fill_rect(
                            cx + col * FONT_SCALE, y + row * FONT_SCALE,
                            FONT_SCALE, FONT_SCALE, color,
                        );
                    }
                }
            }
            cx += 4 * FONT_SCALE;
            if cx >= self.width { break; }
        }
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count() * 4 * FONT_SCALE
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font, rows packed top to bottom, 3 bits per row
// ────────────────────────────────────────────────────────────────────────────

fn glyph(c: char) -> u16 {
    match c {
        '0' => 0b111_101_101_101_111,
        '1' => 0b010_110_010_010_111,
        '2' => 0b111_001_111_100_111,
        '3' => 0b111_001_011_001_111,
        '4' => 0b101_101_111_001_001,
        '5' => 0b111_100_111_001_111,
        '6' => 0b111_100_111_101_111,
        '7' => 0b111_001_010_010_010,
        '8' => 0b111_101_111_101_111,
        '9' => 0b111_101_111_001_111,
        'A' => 0b010_101_111_101_101,
        'B' => 0b110_101_110_101_110,
        'C' => 0b011_100_100_100_011,
        'D' => 0b110_101_101_101_110,
        'E' => 0b111_100_110_100_111,
        'F' => 0b111_100_110_100_100,
        'G' => 0b011_100_101_101_011,
        'H' => 0b101_101_111_101_101,
        'I' => 0b111_010_010_010_111,
        'J' => 0b001_001_001_101_010,
        'K' => 0b101_101_110_101_101,
        'L' => 0b100_100_100_100_111,
        'M' => 0b101_111_111_101_101,
        'N' => 0b110_101_101_101_101,
        'O' => 0b010_101_101_101_010,
        'P' => 0b110_101_110_100_100,
        'Q' => 0b010_101_101_110_011,
        'R' => 0b110_101_110_101_101,
        'S' => 0b011_100_010_001_110,
        'T' => 0b111_010_010_010_010,
        'U' => 0b101_101_101_101_111,
        'V' => 0b101_101_101_101_010,
        'W' => 0b101_101_111_111_101,
        'X' => 0b101_101_010_101_101,
        'Y' => 0b101_101_010_010_010,
        'Z' => 0b111_001_010_100_111,
        '-' => 0b000_000_111_000_000,
        '>' => 0b100_010_001_010_100,
        '<' => 0b001_010_100_010_001,
        '=' => 0b000_111_000_111_000,
        ':' => 0b000_010_000_010_000,
        '.' => 0b000_000_000_000_010,
        '/' => 0b001_001_010_100_100,
        ' ' => 0,
        _   => 0b000_000_010_000_000,
    }
}

/// Mix two ARGB colours; `t` = 0 keeps `a`, `t` = 1 gives `b`.
/// Size to draw at, given the size the window reports. A minimised window
/// reports a zero dimension; keep the last real size then.
fn frame_size(current: (usize, usize), reported: (usize, usize)) -> (usize, usize) {
    if reported.0 == 0 || reported.1 == 0 { current } else { reported }
}

fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let channel = |shift: u32| {
        let ca = ((a >> shift) & 0xFF) as f32;
        let cb = ((b >> shift) & 0xFF) as f32;
        ((ca + (cb - ca) * t).round() as u32) << shift
    };
    0xFF000000 | channel(16) | channel(8) | channel(0)
}
