//! # hand_pointer
//!
//! Turns a noisy stream of hand landmarks into a steady on-screen pointer
//! and discrete pinch presses.
//!
//! ## Pipeline
//!
//! | Stage | Module | Does |
//! |---|---|---|
//! | Provider | [`source`] | Pushes [`FrameResult`]s from its own thread; consumer keeps only the newest |
//! | Hand selection | [`select`] | Picks the hand whose wrist has the largest camera-space x |
//! | Smoothing | [`smoothing`] | Spring-follows the mirrored index fingertip |
//! | Pinch | [`pinch`] | Thumb ↔ index distance → press / release with hysteresis |
//! | Controller | [`session`] | Runs the above per frame, presses whatever the [`TargetSurface`] has under the pointer |
//!
//! ## Quick start
//!
//! ```rust
//! use hand_pointer::{
//!     FrameResult, GestureSession, SessionConfig, TargetSurface, Viewport,
//! };
//!
//! struct Button { hits: u32 }
//!
//! impl TargetSurface for Button {
//!     type Element = &'static str;
//!     fn hit_test(&self, x: f64, y: f64) -> Option<&'static str> {
//!         (x < 100.0 && y < 100.0).then_some("ok")
//!     }
//!     fn activate(&mut self, _el: &&'static str) { self.hits += 1; }
//! }
//!
//! let vp = Viewport::new(1280.0, 720.0).unwrap();
//! let mut session = GestureSession::new(SessionConfig::default(), vp, Button { hits: 0 }, ())
//!     .unwrap();
//! session.start();
//! session.on_frame(&FrameResult::empty());
//! assert!(!session.hand_present());
//! ```

pub mod config;
pub mod error;
pub mod landmark;
pub mod pinch;
pub mod select;
pub mod session;
pub mod smoothing;
pub mod source;
pub mod surface;

pub use config::{LandmarkMap, PinchConfig, PointerConfig, SessionConfig};
pub use error::{ConfigError, SourceError};
pub use landmark::{FrameImage, FrameResult, Hand, Landmark, COORD_BAND, LANDMARK_COUNT};
pub use pinch::{PinchDetector, PinchTransition};
pub use select::select_hand;
pub use session::{FpsEstimate, GestureSession, Viewport};
pub use smoothing::{PointerFilter, PointerState};
pub use source::{spawn_frame_source, FrameFeed, FrameSource, SourceLink};
pub use surface::{StatusSink, TargetSurface};
