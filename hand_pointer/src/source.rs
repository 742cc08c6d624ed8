//! Frame providers and the channel that carries their output.
//!
//! A provider runs on its own thread and pushes [`FrameResult`]s through a
//! [`SourceLink`]. The consumer holds a [`FrameFeed`] and, once per tick,
//! takes only the newest frame; anything older is stale and dropped.
//! Dropping the feed is how delivery stops: the provider's next send fails
//! and it returns.

use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError};
use std::thread;

use crate::error::SourceError;
use crate::landmark::FrameResult;

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver frames over a [`SourceLink`].
///
/// Implementations open their device first, then call [`SourceLink::ready`]
/// (or [`SourceLink::fail`]) exactly once before streaming.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, link: SourceLink);
}

// ════════════════════════════════════════════════════════════════════════════
// SourceLink: provider side
// ════════════════════════════════════════════════════════════════════════════

pub struct SourceLink {
    ready:  Option<SyncSender<Result<(), SourceError>>>,
    frames: Sender<FrameResult>,
}

impl SourceLink {
    /// Report that the device opened and frames will follow.
    pub fn ready(&mut self) {
        if let Some(tx) = self.ready.take() {
            let _ = tx.send(Ok(()));
        }
    }

    /// Report that the device could not be opened. Consumes the link.
    pub fn fail(mut self, err: SourceError) {
        if let Some(tx) = self.ready.take() {
            let _ = tx.send(Err(err));
        }
    }

    /// Push a frame. Returns false once the consumer has gone away, which
    /// is the provider's signal to stop.
    pub fn send(&self, frame: FrameResult) -> bool {
        self.frames.send(frame).is_ok()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameFeed: consumer side
// ════════════════════════════════════════════════════════════════════════════

pub struct FrameFeed {
    rx: Receiver<FrameResult>,
}

impl FrameFeed {
    /// The newest pending frame, discarding any older ones.
    ///
    /// `Err(SourceError::Disconnected)` once the provider has exited and
    /// everything it sent has been read.
    pub fn latest(&self) -> Result<Option<FrameResult>, SourceError> {
        let mut newest = None;
        let mut stale  = 0usize;
        loop {
            match self.rx.try_recv() {
                Ok(frame) => {
                    if newest.replace(frame).is_some() { stale += 1; }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if newest.is_none() { return Err(SourceError::Disconnected); }
                    break;
                }
            }
        }
        if stale > 0 {
            log::trace!("dropped {} stale frame(s)", stale);
        }
        Ok(newest)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Spawn helper
// ════════════════════════════════════════════════════════════════════════════

/// Spawn a provider on its own thread and wait until it reports readiness.
pub fn spawn_frame_source<F: FrameSource>(source: F) -> Result<FrameFeed, SourceError> {
    let (ready_tx, ready_rx) = mpsc::sync_channel(1);
    let (frame_tx, frame_rx) = mpsc::channel();
    let link = SourceLink { ready: Some(ready_tx), frames: frame_tx };

    thread::Builder::new()
        .name("frame-source".into())
        .spawn(move || Box::new(source).run(link))
        .map_err(|e| SourceError::Unavailable(e.to_string()))?;

    match ready_rx.recv() {
        Ok(Ok(()))  => Ok(FrameFeed { rx: frame_rx }),
        Ok(Err(e))  => Err(e),
        Err(_)      => Err(SourceError::Disconnected),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Hand;
    use std::time::Duration;

    /// Sends `count` frames tagged by hand count, then exits.
    struct Burst { count: usize }

    impl FrameSource for Burst {
        fn run(self: Box<Self>, mut link: SourceLink) {
            link.ready();
            for i in 0..self.count {
                let frame = FrameResult::with_hands(vec![Hand::default(); i + 1]);
                if !link.send(frame) { return; }
            }
        }
    }

    struct Broken;

    impl FrameSource for Broken {
        fn run(self: Box<Self>, link: SourceLink) {
            link.fail(SourceError::Unavailable("no camera".into()));
        }
    }

    struct Silent;

    impl FrameSource for Silent {
        fn run(self: Box<Self>, _link: SourceLink) {}
    }

    /// Streams until the feed is dropped, then reports how it ended.
    struct Endless { done: Sender<()> }

    impl FrameSource for Endless {
        fn run(self: Box<Self>, mut link: SourceLink) {
            link.ready();
            while link.send(FrameResult::empty()) {
                thread::sleep(Duration::from_millis(1));
            }
            let _ = self.done.send(());
        }
    }

    fn wait_for_exit(feed: &FrameFeed) -> Option<FrameResult> {
        // Burst exits quickly; poll until the channel reports disconnect.
        let mut last = None;
        for _ in 0..1000 {
            match feed.latest() {
                Ok(Some(f)) => last = Some(f),
                Ok(None)    => thread::sleep(Duration::from_millis(1)),
                Err(_)      => break,
            }
        }
        last
    }

    #[test]
    fn latest_keeps_only_newest() {
        let feed = spawn_frame_source(Burst { count: 5 }).unwrap();
        thread::sleep(Duration::from_millis(50));
        let frame = feed.latest().unwrap().unwrap();
        assert_eq!(frame.hands.len(), 5);
    }

    #[test]
    fn disconnect_reported_after_drain() {
        let feed = spawn_frame_source(Burst { count: 1 }).unwrap();
        wait_for_exit(&feed);
        assert_eq!(feed.latest().unwrap_err(), SourceError::Disconnected);
    }

    #[test]
    fn open_failure_surfaces() {
        let err = spawn_frame_source(Broken).err().unwrap();
        assert_eq!(err, SourceError::Unavailable("no camera".into()));
    }

    #[test]
    fn exit_without_ready_is_disconnected() {
        assert_eq!(spawn_frame_source(Silent).err(), Some(SourceError::Disconnected));
    }

    #[test]
    fn dropping_feed_stops_provider() {
        let (done_tx, done_rx) = mpsc::channel();
        let feed = spawn_frame_source(Endless { done: done_tx }).unwrap();
        drop(feed);
        assert!(done_rx.recv_timeout(Duration::from_secs(2)).is_ok());
    }
}
