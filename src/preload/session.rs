use std::{
    fmt,
    sync::{Arc, mpsc},
    time::{Duration, Instant},
};

use crate::{
    assets::decode::FrameImage,
    foundation::error::{ScrubError, ScrubResult},
    preload::loader::{FrameLoader, LoadDispatcher},
    preload::state::{PreloadEvent, PreloadState},
    sequence::config::SequenceConfig,
};

/// Identifies one preload run. Settlements tagged with any other id are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// One frame load reaching its final outcome.
#[derive(Debug)]
pub struct FrameSettled {
    pub session: SessionId,
    pub index: u32,
    pub outcome: ScrubResult<FrameImage>,
}

/// Serializable view of the preloader, as observed by a renderer or reported by the CLI.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PreloadSnapshot {
    pub progress_percent: u8,
    pub is_ready: bool,
    pub loaded: u32,
    pub failed: u32,
    pub frame_count: u32,
    pub error: Option<String>,
}

struct ActiveSession {
    id: SessionId,
    config: SequenceConfig,
    state: PreloadState,
    images: Vec<Option<Arc<FrameImage>>>,
}

/// Owns the preload state and frame slots for the current configuration.
///
/// All mutation happens on the owning thread through [`Preloader::settle`] and the channel
/// drains built on it. Starting a new session, or disposing, retires the previous session id
/// so late settlements for it become no-ops.
pub struct Preloader {
    next_session: u64,
    active: Option<ActiveSession>,
    tx: mpsc::Sender<FrameSettled>,
    rx: mpsc::Receiver<FrameSettled>,
}

impl Default for Preloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Preloader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            next_session: 1,
            active: None,
            tx,
            rx,
        }
    }

    /// Open a fresh session for `config` without issuing any loads.
    #[tracing::instrument(skip(self, config), fields(frames = config.frame_count()))]
    pub fn begin(&mut self, config: SequenceConfig) -> SessionId {
        let id = SessionId(self.next_session);
        self.next_session += 1;
        if let Some(prev) = &self.active {
            tracing::debug!(superseded = %prev.id, "retiring preload session");
        }
        let frame_count = config.frame_count();
        self.active = Some(ActiveSession {
            id,
            state: PreloadState::new(frame_count),
            images: vec![None; frame_count as usize],
            config,
        });
        id
    }

    /// Open a session and issue every frame load through `dispatcher`.
    pub fn start(
        &mut self,
        config: SequenceConfig,
        loader: Arc<dyn FrameLoader>,
        dispatcher: &LoadDispatcher,
    ) -> SessionId {
        let id = self.begin(config.clone());
        dispatcher.dispatch(id, &config, loader, self.tx.clone());
        id
    }

    /// Sender for settlements, for callers driving loads themselves.
    pub fn sender(&self) -> mpsc::Sender<FrameSettled> {
        self.tx.clone()
    }

    /// Retire the current session. Nothing is written after this until the next `begin`.
    pub fn dispose(&mut self) {
        if let Some(prev) = self.active.take() {
            tracing::debug!(session = %prev.id, "disposed preload session");
        }
    }

    /// Apply one settlement. Returns `false` when it belongs to a retired session or a slot
    /// that already settled.
    pub fn settle(&mut self, msg: FrameSettled) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if msg.session != active.id {
            tracing::trace!(stale = %msg.session, current = %active.id, "dropping stale settlement");
            return false;
        }

        let event = match &msg.outcome {
            Ok(_) => PreloadEvent::FrameLoaded(msg.index),
            Err(_) => PreloadEvent::FrameFailed(msg.index),
        };
        let before = active.state.settled_count();
        let had_error = active.state.error_message().is_some();
        active.state = std::mem::replace(&mut active.state, PreloadState::new(0)).apply(event);
        if active.state.settled_count() == before {
            return false;
        }

        if let Ok(image) = msg.outcome {
            active.images[msg.index as usize] = Some(Arc::new(image));
        }
        tracing::debug!(
            session = %active.id,
            index = msg.index,
            progress = active.state.progress_percent(),
            "frame settled"
        );
        if !had_error && let Some(err) = active.state.error_message() {
            tracing::warn!(
                session = %active.id,
                failed = active.state.failed_count(),
                frames = active.state.frame_count(),
                "{err}"
            );
        }
        true
    }

    /// Apply every settlement already waiting on the channel. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            if self.settle(msg) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until the current session has settled every frame, or `timeout` elapses.
    pub fn wait_settled(&mut self, timeout: Duration) -> ScrubResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.state() {
                None => return Err(ScrubError::validation("no active preload session")),
                Some(s) if s.is_settled() => return Ok(()),
                Some(_) => {}
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(ScrubError::asset("timed out waiting for frames to settle"));
            }
            match self.rx.recv_timeout(deadline - now) {
                Ok(msg) => {
                    self.settle(msg);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(ScrubError::asset("settlement channel disconnected"));
                }
            }
        }
    }

    pub fn session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn config(&self) -> Option<&SequenceConfig> {
        self.active.as_ref().map(|a| &a.config)
    }

    pub fn state(&self) -> Option<&PreloadState> {
        self.active.as_ref().map(|a| &a.state)
    }

    /// Frame slots in position order; `None` until loaded, and forever for failed frames.
    pub fn images(&self) -> &[Option<Arc<FrameImage>>] {
        match &self.active {
            Some(a) => &a.images,
            None => &[],
        }
    }

    pub fn image(&self, index: u32) -> Option<&Arc<FrameImage>> {
        self.images().get(index as usize).and_then(Option::as_ref)
    }

    pub fn is_ready(&self) -> bool {
        self.state().is_some_and(PreloadState::is_ready)
    }

    pub fn progress_percent(&self) -> u8 {
        self.state().map_or(0, PreloadState::progress_percent)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.state().and_then(PreloadState::error_message)
    }

    pub fn snapshot(&self) -> PreloadSnapshot {
        PreloadSnapshot {
            progress_percent: self.progress_percent(),
            is_ready: self.is_ready(),
            loaded: self.state().map_or(0, PreloadState::loaded_count),
            failed: self.state().map_or(0, PreloadState::failed_count),
            frame_count: self.state().map_or(0, PreloadState::frame_count),
            error: self.error_message().map(str::to_string),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preload/session.rs"]
mod tests;
