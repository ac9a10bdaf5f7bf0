//! Music session lifecycle: initialize, start, stop, cleanup.
//!
//! A session owns its audio backend and random source, so several sessions
//! can coexist and tests can drive one with a fixed source and an offline
//! backend.

use super::generator::{compose, Composition};
use super::random::RandomSource;
use crate::error::AudioError;
use crate::params::MusicRanges;

/// Audio engine seam the session drives
#[allow(async_fn_in_trait)]
pub trait AudioBackend {
    /// Unlock audio output. Call only in response to a user gesture.
    async fn unlock(&mut self) -> Result<(), AudioError>;

    /// Allocate voices, effects and patterns for `composition` (silent until started)
    fn load(&mut self, composition: &Composition);

    /// Rewind the transport to zero, start both patterns at zero and run
    fn start_transport(&mut self);

    /// Halt the transport, drop scheduled notes and release sounding ones
    fn stop_transport(&mut self);

    /// Release everything allocated by `load`
    fn unload(&mut self);
}

/// Playback state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No synthesis graph exists
    Uninitialized,
    /// Graph loaded, transport halted
    Stopped,
    Playing,
}

/// One procedural music session
pub struct MusicSession<B: AudioBackend, R: RandomSource> {
    backend: B,
    rng: R,
    ranges: MusicRanges,
    composition: Option<Composition>,
    state: PlaybackState,
}

impl<B: AudioBackend, R: RandomSource> MusicSession<B, R> {
    pub fn new(backend: B, rng: R, ranges: MusicRanges) -> Self {
        Self {
            backend,
            rng,
            ranges,
            composition: None,
            state: PlaybackState::Uninitialized,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn composition(&self) -> Option<&Composition> {
        self.composition.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Compose a fresh session and load it into the backend.
    ///
    /// An existing graph is cleaned up first rather than leaked.
    pub fn initialize(&mut self) -> &Composition {
        if self.state != PlaybackState::Uninitialized {
            log::warn!("Re-initializing music session; releasing previous graph");
            self.cleanup();
        }

        let composition = compose(&mut self.rng, &self.ranges);
        self.backend.load(&composition);
        self.state = PlaybackState::Stopped;
        self.composition.insert(composition)
    }

    /// Start playback from the top. Must be triggered by a user gesture.
    ///
    /// No-op while already playing. If the backend cannot be unlocked the
    /// session stays stopped and the error is returned.
    pub async fn start(&mut self) -> Result<(), AudioError> {
        if self.state == PlaybackState::Playing {
            log::debug!("start() ignored: already playing");
            return Ok(());
        }
        if self.state == PlaybackState::Uninitialized {
            self.initialize();
        }

        self.backend.unlock().await?;

        self.backend.start_transport();
        self.state = PlaybackState::Playing;
        log::debug!("Transport started");
        Ok(())
    }

    /// Halt playback. No-op unless playing.
    pub fn stop(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.backend.stop_transport();
        self.state = PlaybackState::Stopped;
        log::debug!("Transport stopped");
    }

    /// Start when stopped, stop when playing
    pub async fn toggle(&mut self) -> Result<(), AudioError> {
        if self.is_playing() {
            self.stop();
            Ok(())
        } else {
            self.start().await
        }
    }

    /// Stop and release the synthesis graph. No-op when already clean.
    pub fn cleanup(&mut self) {
        if self.state == PlaybackState::Uninitialized {
            return;
        }
        self.stop();
        self.backend.unload();
        self.composition = None;
        self.state = PlaybackState::Uninitialized;
        log::debug!("Music session cleaned up");
    }
}

impl<B: AudioBackend, R: RandomSource> Drop for MusicSession<B, R> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::random::{FixedRandom, SeededRandom};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Backend that records the calls made on it
    #[derive(Default)]
    struct CallLog {
        calls: Vec<&'static str>,
        fail_unlock: bool,
        loaded: bool,
    }

    impl AudioBackend for CallLog {
        async fn unlock(&mut self) -> Result<(), AudioError> {
            self.calls.push("unlock");
            if self.fail_unlock {
                Err(AudioError::NoOutputDevice)
            } else {
                Ok(())
            }
        }

        fn load(&mut self, _composition: &Composition) {
            assert!(!self.loaded, "graph loaded twice without unload");
            self.loaded = true;
            self.calls.push("load");
        }

        fn start_transport(&mut self) {
            self.calls.push("start");
        }

        fn stop_transport(&mut self) {
            self.calls.push("stop");
        }

        fn unload(&mut self) {
            self.loaded = false;
            self.calls.push("unload");
        }
    }

    fn session() -> MusicSession<CallLog, FixedRandom> {
        MusicSession::new(
            CallLog::default(),
            FixedRandom::new(0.5),
            MusicRanges::default(),
        )
    }

    #[test]
    fn test_initialize_does_not_start_audio() {
        let mut s = session();
        let tempo = s.initialize().tempo_bpm;
        assert_eq!(tempo, 120.0);
        assert_eq!(s.state(), PlaybackState::Stopped);
        assert_eq!(s.backend().calls, ["load"]);
    }

    #[test]
    fn test_start_initializes_lazily_and_unlocks() {
        let mut s = session();
        pollster::block_on(s.start()).unwrap();
        assert!(s.is_playing());
        assert_eq!(s.backend().calls, ["load", "unlock", "start"]);
    }

    #[test]
    fn test_start_twice_is_guarded() {
        let mut s = session();
        pollster::block_on(s.start()).unwrap();
        pollster::block_on(s.start()).unwrap();
        assert_eq!(s.backend().calls, ["load", "unlock", "start"]);
    }

    #[test]
    fn test_failed_unlock_leaves_playback_unstarted() {
        let mut s = session();
        s.backend_mut().fail_unlock = true;
        assert!(pollster::block_on(s.start()).is_err());
        assert!(!s.is_playing());
        assert!(!s.backend().calls.contains(&"start"));
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let mut s = session();
        s.stop();
        assert_eq!(s.state(), PlaybackState::Uninitialized);
        s.initialize();
        s.stop();
        assert_eq!(s.backend().calls, ["load"]);
    }

    #[test]
    fn test_stop_then_cleanup_uninitializes() {
        let mut s = session();
        pollster::block_on(s.start()).unwrap();
        s.stop();
        s.cleanup();
        assert_eq!(s.state(), PlaybackState::Uninitialized);
        assert!(s.composition().is_none());
        assert_eq!(s.backend().calls, ["load", "unlock", "start", "stop", "unload"]);
    }

    #[test]
    fn test_cleanup_twice_is_noop() {
        let mut s = session();
        pollster::block_on(s.start()).unwrap();
        s.cleanup();
        let calls = s.backend().calls.len();
        s.cleanup();
        assert_eq!(s.backend().calls.len(), calls);
        assert_eq!(s.state(), PlaybackState::Uninitialized);
    }

    #[test]
    fn test_reinitialize_releases_previous_graph() {
        let mut s = MusicSession::new(
            CallLog::default(),
            SeededRandom::new(3),
            MusicRanges::default(),
        );
        let first = s.initialize().clone();
        let second = s.initialize().clone();
        assert_ne!(first, second);
        assert_eq!(s.backend().calls, ["load", "unload", "load"]);
    }

    #[test]
    fn test_toggle_alternates() {
        let mut s = session();
        pollster::block_on(s.toggle()).unwrap();
        assert!(s.is_playing());
        pollster::block_on(s.toggle()).unwrap();
        assert_eq!(s.state(), PlaybackState::Stopped);
        pollster::block_on(s.toggle()).unwrap();
        assert!(s.is_playing());
        assert_eq!(
            s.backend().calls,
            ["load", "unlock", "start", "stop", "unlock", "start"]
        );
    }

    /// Backend whose call log outlives the session
    struct SharedLog(Rc<RefCell<Vec<&'static str>>>);

    impl AudioBackend for SharedLog {
        async fn unlock(&mut self) -> Result<(), AudioError> {
            self.0.borrow_mut().push("unlock");
            Ok(())
        }

        fn load(&mut self, _composition: &Composition) {
            self.0.borrow_mut().push("load");
        }

        fn start_transport(&mut self) {
            self.0.borrow_mut().push("start");
        }

        fn stop_transport(&mut self) {
            self.0.borrow_mut().push("stop");
        }

        fn unload(&mut self) {
            self.0.borrow_mut().push("unload");
        }
    }

    #[test]
    fn test_drop_cleans_up_playing_session() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut s = MusicSession::new(
            SharedLog(Rc::clone(&log)),
            FixedRandom::new(0.5),
            MusicRanges::default(),
        );
        pollster::block_on(s.start()).unwrap();
        drop(s);
        assert_eq!(*log.borrow(), ["load", "unlock", "start", "stop", "unload"]);
    }

    #[test]
    fn test_drop_of_uninitialized_session_is_silent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let s = MusicSession::new(
            SharedLog(Rc::clone(&log)),
            FixedRandom::new(0.5),
            MusicRanges::default(),
        );
        drop(s);
        assert!(log.borrow().is_empty());
    }
}
