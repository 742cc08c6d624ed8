//! Top-level application state.
//!
//! `AppState` owns the gesture session (which owns the gem grid and the
//! HUD), the frame feed of whichever provider is running, and the input
//! channel of the simulated hand. It handles [`UiEvent`]s from the window
//! and pulls the newest frame once per tick.

#[cfg(not(feature = "leap"))]
use std::sync::mpsc;
use std::sync::mpsc::Sender;
use std::time::Instant;

use gem_grid::GemGrid;
use hand_pointer::{
    spawn_frame_source, FrameFeed, FrameResult, FrameSource, GestureSession, Viewport,
};

use crate::config::{AppConfig, ProviderOptions};
use crate::error::AppError;
use crate::hud::Hud;
#[cfg(feature = "leap")]
use crate::sources::LeapHandSource;
#[cfg(not(feature = "leap"))]
use crate::sources::SimHandSource;
use crate::sources::SimInput;
use crate::visualizer::{grid_layout, UiEvent, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    session: GestureSession<GemGrid, Hud>,
    columns: usize,
    size:    (usize, usize),

    // ── provider ──────────────────────────────────────────────────────────
    feed:    Option<FrameFeed>,
    options: ProviderOptions,
    /// Hands from the last frame, for the camera preview.
    preview: FrameResult,

    // ── simulated hand ────────────────────────────────────────────────────
    sim_tx:      Option<Sender<SimInput>>,
    sim_pointer: Option<(f64, f64)>,
    sim_pinch:   bool,
}

impl AppState {
    /// Idle app for a window of `width` × `height` pixels.
    pub fn new(cfg: &AppConfig, width: usize, height: usize) -> Result<Self, AppError> {
        cfg.validate()?;
        let viewport = Viewport::new(width as f64, height as f64)?;
        let grid = GemGrid::new(cfg.gem_count, grid_layout(width, height, cfg.columns));
        let session = GestureSession::new(cfg.session, viewport, grid, Hud::default())?;
        Ok(AppState {
            session,
            columns:     cfg.columns,
            size:        (width, height),
            feed:        None,
            options:     cfg.provider,
            preview:     FrameResult::empty(),
            sim_tx:      None,
            sim_pointer: None,
            sim_pinch:   false,
        })
    }

    // ── window events ─────────────────────────────────────────────────────

    /// Apply one window event. Returns false when the app should quit.
    pub fn handle(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Quit            => return false,
            UiEvent::StartCamera     => self.start_camera(),
            UiEvent::StopCamera      => self.stop_camera(),
            UiEvent::Reset           => self.reset(),
            UiEvent::Shuffle         => self.shuffle(),
            UiEvent::Click { x, y }  => self.click(x, y),
            UiEvent::Sim(input)      => self.sim_input(input),
        }
        true
    }

    /// Start the compiled-in provider. A no-op while already running.
    pub fn start_camera(&mut self) {
        if self.session.is_running() { return; }

        #[cfg(not(feature = "leap"))]
        {
            let (tx, rx) = mpsc::channel();
            let source = SimHandSource { rx, options: self.options };
            if self.start_with(source) {
                // A fresh rig knows nothing; replay where the mouse already is.
                let _ = tx.send(SimInput::Pointer(self.sim_pointer));
                let _ = tx.send(SimInput::Pinch(self.sim_pinch));
                self.sim_tx = Some(tx);
            }
        }

        #[cfg(feature = "leap")]
        {
            self.start_with(LeapHandSource { options: self.options });
        }
    }

    /// Start `source` and the session. Returns whether the provider came up.
    pub fn start_with<F: FrameSource>(&mut self, source: F) -> bool {
        if self.session.is_running() { return false; }
        match spawn_frame_source(source) {
            Ok(feed) => {
                self.feed = Some(feed);
                self.session.start();
                self.hud_mut().toast("Camera started - pinch to press gems");
                true
            }
            Err(e) => {
                log::warn!("camera unavailable: {}", e);
                self.hud_mut().toast("Camera blocked/unavailable");
                false
            }
        }
    }

    /// Drop the provider and park the session. Safe to call repeatedly.
    pub fn stop_camera(&mut self) {
        self.feed    = None;
        self.sim_tx  = None;
        self.preview = FrameResult::empty();
        self.session.stop();
        self.hud_mut().toast("Stopped");
    }

    /// Direct click: cycle the gem under the mouse.
    pub fn click(&mut self, x: f64, y: f64) {
        let Some(id) = self.session.surface().gem_at(x, y) else { return };
        if let Some(color) = self.session.surface_mut().cycle(id) {
            self.hud_mut().toast(&format!("{} -> {}", id, color));
        }
    }

    pub fn reset(&mut self) {
        self.session.surface_mut().reset();
        self.hud_mut().toast("Reset colors");
    }

    pub fn shuffle(&mut self) {
        self.session.surface_mut().shuffle(&mut rand::rng());
        self.hud_mut().toast("Shuffled");
    }

    fn sim_input(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer(p) => self.sim_pointer = p,
            SimInput::Pinch(on)  => self.sim_pinch = on,
            _ => {}
        }
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(input);
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    /// Feed the newest pending frame, if any, to the session.
    pub fn tick(&mut self) {
        let result = match &self.feed {
            Some(feed) => feed.latest(),
            None       => return,
        };
        match result {
            Ok(Some(frame)) => {
                self.session.on_frame(&frame);
                self.preview = frame;
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("frame provider stopped: {}", e);
                self.stop_camera();
                self.hud_mut().toast("Camera blocked/unavailable");
            }
        }
    }

    /// Follow a window resize: new viewport for the pointer, new grid cells.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.size == (width, height) { return; }
        match Viewport::new(width as f64, height as f64) {
            Ok(vp) => {
                self.size = (width, height);
                self.session.set_viewport(vp);
                self.session.surface_mut().set_layout(grid_layout(width, height, self.columns));
                log::debug!("viewport now {}x{}", width, height);
            }
            Err(e) => log::debug!("ignoring resize: {}", e),
        }
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn session(&self)  -> &GestureSession<GemGrid, Hud> { &self.session }
    pub fn grid(&self)     -> &GemGrid                      { self.session.surface() }
    pub fn hud(&self)      -> &Hud                          { self.session.status() }
    pub fn hud_mut(&mut self) -> &mut Hud                   { self.session.status_mut() }
    pub fn preview(&self)  -> &FrameResult                  { &self.preview }
    pub fn is_running(&self) -> bool                        { self.session.is_running() }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Opens the window, builds the idle app, optionally starts the provider
/// right away, and drives the input/tick/render loop at ~60 fps.
pub fn run(cfg: AppConfig, autostart: bool) -> Result<(), AppError> {
    let mut vis = Visualizer::new()?;
    let (w, h) = vis.size();
    let mut app = AppState::new(&cfg, w, h)?;

    app.hud_mut().toast("Click Start Camera");
    if autostart {
        app.start_camera();
    }

    while vis.is_open() {
        // 1. Window input
        let (w, h) = vis.size();
        app.resize(w, h);
        for event in vis.poll_input() {
            if !app.handle(event) {
                log::info!("quit requested");
                return Ok(());
            }
        }

        // 2. Newest frame
        app.tick();

        // 3. Render
        vis.render(&app, Instant::now());
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gem_grid::{GemColor, GemId};
    use hand_pointer::{SourceError, SourceLink};
    use std::thread;
    use std::time::Duration;

    use crate::sources::synth_hand;
    use crate::visualizer::{WIN_H, WIN_W};

    fn make_app() -> AppState {
        AppState::new(&AppConfig::default(), WIN_W, WIN_H).unwrap()
    }

    fn toast(app: &AppState) -> Option<String> {
        app.hud().visible_toast(Instant::now()).map(str::to_string)
    }

    /// Centre of the cell at display position `pos`.
    fn centre(app: &AppState, pos: usize) -> (f64, f64) {
        let cell = app.grid().cell(pos);
        (cell.x + cell.w / 2.0, cell.y + cell.h / 2.0)
    }

    struct Broken;

    impl FrameSource for Broken {
        fn run(self: Box<Self>, link: SourceLink) {
            link.fail(SourceError::Unavailable("permission denied".into()));
        }
    }

    /// Sends the given frames `pace` apart, then exits.
    struct Scripted { frames: Vec<FrameResult>, pace: Duration }

    impl FrameSource for Scripted {
        fn run(self: Box<Self>, mut link: SourceLink) {
            link.ready();
            for frame in self.frames {
                if !link.send(frame) { return; }
                thread::sleep(self.pace);
            }
        }
    }

    /// Streams empty frames until the feed goes away.
    struct Idle;

    impl FrameSource for Idle {
        fn run(self: Box<Self>, mut link: SourceLink) {
            link.ready();
            while link.send(FrameResult::empty()) {
                thread::sleep(Duration::from_millis(2));
            }
        }
    }

    fn tick_until(app: &mut AppState, done: impl Fn(&AppState) -> bool) -> bool {
        for _ in 0..500 {
            app.tick();
            if done(app) { return true; }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn starts_idle() {
        let app = make_app();
        assert!(!app.is_running());
        assert_eq!(app.grid().len(), 24);
        assert_eq!(app.hud().camera_text(), "CAM OFF");
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = AppConfig { gem_count: 0, ..AppConfig::default() };
        assert!(matches!(AppState::new(&cfg, WIN_W, WIN_H), Err(AppError::Grid { .. })));
    }

    #[test]
    fn provider_failure_reported_in_hud() {
        let mut app = make_app();
        assert!(!app.start_with(Broken));
        assert!(!app.is_running());
        assert_eq!(toast(&app).as_deref(), Some("Camera blocked/unavailable"));
        assert_eq!(app.hud().camera_text(), "CAM OFF");
    }

    #[test]
    fn start_and_stop_camera() {
        let mut app = make_app();
        assert!(app.start_with(Idle));
        assert!(app.is_running());
        assert_eq!(app.hud().camera_text(), "CAM ON");
        assert_eq!(toast(&app).as_deref(), Some("Camera started - pinch to press gems"));

        app.handle(UiEvent::StopCamera);
        assert!(!app.is_running());
        assert_eq!(app.session().pointer(), (-9999.0, -9999.0));
        assert_eq!(app.hud().pinch_text, "PINCH: -");
        assert_eq!(toast(&app).as_deref(), Some("Stopped"));

        // Stopping again changes nothing.
        app.stop_camera();
        assert!(!app.is_running());
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut app = make_app();
        assert!(app.start_with(Idle));
        assert!(!app.start_with(Idle));
        assert!(app.is_running());
    }

    #[test]
    fn click_cycles_gem_with_toast() {
        let mut app = make_app();
        let (x, y) = centre(&app, 4);
        app.handle(UiEvent::Click { x, y });
        assert_eq!(app.grid().get(GemId(4)).unwrap().color, GemColor::Ice);
        assert_eq!(toast(&app).as_deref(), Some("G05 -> ice"));
    }

    #[test]
    fn click_in_panel_hits_nothing() {
        let mut app = make_app();
        app.handle(UiEvent::Click { x: (WIN_W - 10) as f64, y: 10.0 });
        assert_eq!(toast(&app), None);
    }

    #[test]
    fn reset_and_shuffle_toast() {
        let mut app = make_app();
        app.handle(UiEvent::Shuffle);
        assert_eq!(toast(&app).as_deref(), Some("Shuffled"));
        app.handle(UiEvent::Reset);
        assert_eq!(toast(&app).as_deref(), Some("Reset colors"));
        for (pos, gem) in app.grid().gems().iter().enumerate() {
            assert_eq!(gem.color, GemColor::for_position(pos));
        }
    }

    #[test]
    fn quit_stops_loop() {
        assert!(!make_app().handle(UiEvent::Quit));
    }

    #[test]
    fn pinch_over_gem_presses_it() {
        let mut app = make_app();
        let (x, y) = centre(&app, 0);
        // Camera space is mirrored relative to the window.
        let tip = (1.0 - x / WIN_W as f64, y / WIN_H as f64);
        let mut frames: Vec<FrameResult> =
            (0..60).map(|_| FrameResult::with_hands(vec![synth_hand(tip, false)])).collect();
        frames.push(FrameResult::with_hands(vec![synth_hand(tip, true)]));

        assert!(app.start_with(Scripted { frames, pace: Duration::from_millis(2) }));
        assert!(tick_until(&mut app, |a| a.hud().last_press.is_some()));
        assert_eq!(app.hud().last_press.as_deref(), Some("G01"));
        assert_eq!(app.grid().get(GemId(0)).unwrap().color, GemColor::Emerald);
    }

    #[test]
    fn provider_exit_stops_session() {
        let mut app = make_app();
        assert!(app.start_with(Scripted { frames: vec![FrameResult::empty()], pace: Duration::ZERO }));
        assert!(tick_until(&mut app, |a| !a.is_running()));
        assert_eq!(toast(&app).as_deref(), Some("Camera blocked/unavailable"));
        assert_eq!(app.hud().camera_text(), "CAM OFF");
    }

    #[test]
    fn resize_moves_grid() {
        let mut app = make_app();
        let before = app.grid().cell(0);
        app.resize(WIN_W * 2, WIN_H * 2);
        assert_ne!(app.grid().cell(0), before);
        assert_eq!(app.session().viewport().width, (WIN_W * 2) as f64);
        // Degenerate sizes are ignored.
        app.resize(0, 0);
        assert_eq!(app.session().viewport().width, (WIN_W * 2) as f64);
    }

    #[cfg(not(feature = "leap"))]
    #[test]
    fn simulated_hand_reaches_session() {
        let mut app = make_app();
        app.handle(UiEvent::Sim(SimInput::Pointer(Some((0.2, 0.3)))));
        app.handle(UiEvent::StartCamera);
        assert!(app.is_running());
        assert!(tick_until(&mut app, |a| a.hud().hand_ok));
        assert_eq!(app.hud().hand_text(), "HAND OK");

        app.handle(UiEvent::Sim(SimInput::ToggleHand));
        assert!(tick_until(&mut app, |a| !a.hud().hand_ok));
        app.stop_camera();
    }
}
