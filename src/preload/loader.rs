use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, mpsc},
};

use anyhow::Context;

use crate::{
    assets::decode::{FrameImage, decode_frame},
    foundation::error::{ScrubError, ScrubResult},
    preload::session::{FrameSettled, SessionId},
    sequence::config::SequenceConfig,
};

/// Env var overriding the loader pool size.
pub const LOAD_THREADS_ENV: &str = "SCRUBREEL_LOAD_THREADS";

/// Asset retrieval seam: turn a frame path into pixels, or fail.
///
/// Success and failure are the only outcomes; there are no retries.
pub trait FrameLoader: Send + Sync {
    fn load(&self, path: &str) -> ScrubResult<FrameImage>;
}

/// Loads frames from the filesystem below `root`.
///
/// Frame paths are treated as web-root relative: leading `/` are stripped before joining.
#[derive(Clone, Debug)]
pub struct FsFrameLoader {
    root: PathBuf,
}

impl FsFrameLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl FrameLoader for FsFrameLoader {
    fn load(&self, path: &str) -> ScrubResult<FrameImage> {
        let p = self.resolve(path);
        let bytes = std::fs::read(&p).with_context(|| format!("read frame '{}'", p.display()))?;
        decode_frame(&bytes).map_err(|e| ScrubError::asset(format!("'{}': {e}", p.display())))
    }
}

/// In-memory loader keyed by frame path. Missing keys fail.
#[derive(Clone, Debug, Default)]
pub struct MemoryFrameLoader {
    frames: HashMap<String, FrameImage>,
}

impl MemoryFrameLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, frame: FrameImage) {
        self.frames.insert(path.into(), frame);
    }

    pub fn with(mut self, path: impl Into<String>, frame: FrameImage) -> Self {
        self.insert(path, frame);
        self
    }
}

impl FrameLoader for MemoryFrameLoader {
    fn load(&self, path: &str) -> ScrubResult<FrameImage> {
        self.frames
            .get(path)
            .cloned()
            .ok_or_else(|| ScrubError::asset(format!("no frame at '{path}'")))
    }
}

/// Fires one load per frame on a rayon pool and reports each settlement over a channel.
///
/// Loads complete in arbitrary order; every message carries its fixed frame index and the
/// session it was issued for.
pub struct LoadDispatcher {
    pool: rayon::ThreadPool,
}

impl LoadDispatcher {
    /// Build a dispatcher. `threads` falls back to [`LOAD_THREADS_ENV`], then rayon defaults.
    pub fn new(threads: Option<usize>) -> ScrubResult<Self> {
        let threads = threads.or_else(|| {
            std::env::var(LOAD_THREADS_ENV)
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
        });
        if let Some(n) = threads
            && n == 0
        {
            return Err(ScrubError::validation("loader 'threads' must be >= 1 when set"));
        }
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| ScrubError::asset(format!("failed to build loader thread pool: {e}")))?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Issue `frame_count` loads for `session`. Returns immediately.
    #[tracing::instrument(skip(self, config, loader, tx), fields(frames = config.frame_count()))]
    pub fn dispatch(
        &self,
        session: SessionId,
        config: &SequenceConfig,
        loader: Arc<dyn FrameLoader>,
        tx: mpsc::Sender<FrameSettled>,
    ) {
        for index in 0..config.frame_count() {
            let path = config.frame_path(index);
            let loader = Arc::clone(&loader);
            let tx = tx.clone();
            self.pool.spawn(move || {
                let outcome = loader.load(&path);
                if let Err(e) = &outcome {
                    tracing::warn!(%session, index, path = %path, error = %e, "frame load failed");
                }
                // The receiving preloader may already be gone; nothing to report to.
                let _ = tx.send(FrameSettled {
                    session,
                    index,
                    outcome,
                });
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preload/loader.rs"]
mod tests;
