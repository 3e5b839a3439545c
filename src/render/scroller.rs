use std::sync::Arc;

use crate::{
    foundation::core::{Point, Viewport},
    foundation::error::ScrubResult,
    preload::loader::{FrameLoader, LoadDispatcher},
    preload::session::{PreloadSnapshot, Preloader, SessionId},
    render::canvas::{FrameCanvas, FrameRGBA, render_layers},
    render::overlay::{BACKDROP_RGBA, Overlay, StatusOverlay},
    scroll::mapper::{MetricsProvider, ScrollHeight, ScrollMetrics, frame_index, sticky_offset},
    scroll::smooth::{SmoothScroll, SmoothScrollOpts},
    scroll::source::{ContainerLayout, ScrollSource, ScrollSubscription, SourceMetrics},
    sequence::config::SequenceConfig,
};

/// Serializable scroller settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollerOpts {
    pub height: ScrollHeight,
    /// Loader pool size; falls back to `SCRUBREEL_LOAD_THREADS`, then rayon's default.
    pub load_threads: Option<usize>,
    /// Drive scrolling through a smooth-scroll interpolator.
    pub smooth: Option<SmoothScrollOpts>,
}

impl Default for ScrollerOpts {
    fn default() -> Self {
        Self {
            height: ScrollHeight::Viewports(4.0),
            load_threads: None,
            smooth: None,
        }
    }
}

impl ScrollerOpts {
    /// Loader pool sized from `load_threads`.
    pub fn dispatcher(&self) -> ScrubResult<LoadDispatcher> {
        LoadDispatcher::new(self.load_threads)
    }

    /// Smooth-scroll driver for a document scrollable up to `limit`, when enabled.
    pub fn smooth_driver(&self, limit: f64) -> ScrubResult<Option<SmoothScroll>> {
        self.smooth.map(|o| SmoothScroll::new(o, limit)).transpose()
    }
}

/// Which layer a pointer event lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// The loading / error overlay.
    Status,
    /// An interactive region of the overlay at this index.
    Overlay(usize),
    Canvas,
}

/// Scroll-driven frame-sequence player.
///
/// Maps container scroll progress onto a frame index and paints that frame cover-fit into a
/// viewport-sized canvas, with caller overlays and a status layer on top.
pub struct SequenceScroller {
    config: SequenceConfig,
    height: ScrollHeight,
    preloader: Preloader,
    canvas: FrameCanvas,
    current_frame: u32,
    /// Frame currently on the canvas for this session.
    painted_frame: Option<u32>,
    was_ready: bool,
    viewport: Option<Viewport>,
    overlays: Vec<Box<dyn Overlay>>,
    subscription: Option<ScrollSubscription>,
}

impl SequenceScroller {
    pub fn new(
        config: SequenceConfig,
        height: ScrollHeight,
        overlays: Vec<Box<dyn Overlay>>,
    ) -> Self {
        Self {
            config,
            height,
            preloader: Preloader::new(),
            canvas: FrameCanvas::new(),
            current_frame: 0,
            painted_frame: None,
            was_ready: false,
            viewport: None,
            overlays,
            subscription: None,
        }
    }

    pub fn from_opts(
        config: SequenceConfig,
        opts: &ScrollerOpts,
        overlays: Vec<Box<dyn Overlay>>,
    ) -> Self {
        Self::new(config, opts.height, overlays)
    }

    /// Issue loads for the current configuration.
    pub fn start(
        &mut self,
        loader: Arc<dyn FrameLoader>,
        dispatcher: &LoadDispatcher,
    ) -> SessionId {
        self.reset_render_state();
        self.preloader.start(self.config.clone(), loader, dispatcher)
    }

    /// Swap the configuration and restart preloading. Loads still in flight for the old
    /// configuration are ignored when they land.
    #[tracing::instrument(skip_all, fields(frames = config.frame_count()))]
    pub fn set_config(
        &mut self,
        config: SequenceConfig,
        loader: Arc<dyn FrameLoader>,
        dispatcher: &LoadDispatcher,
    ) -> SessionId {
        self.config = config;
        self.start(loader, dispatcher)
    }

    fn reset_render_state(&mut self) {
        self.current_frame = 0;
        self.painted_frame = None;
        self.was_ready = false;
        self.canvas.reset_cache();
    }

    /// Drain finished loads. Paints the current frame when the sequence becomes ready.
    /// Returns `true` when the canvas was repainted.
    pub fn tick(&mut self) -> ScrubResult<bool> {
        self.preloader.pump();
        self.sync_ready()
    }

    fn sync_ready(&mut self) -> ScrubResult<bool> {
        if self.was_ready || !self.preloader.is_ready() {
            return Ok(false);
        }
        self.was_ready = true;
        tracing::debug!(frame = self.current_frame, "sequence ready");
        self.repaint()
    }

    /// Record the viewport size. Does not repaint on its own.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Handle one scroll event. No-op until ready. Repaints when the frame index changed or the
    /// current frame has not been painted yet. Returns `true` when the canvas was repainted.
    pub fn handle_scroll(&mut self, metrics: ScrollMetrics) -> ScrubResult<bool> {
        self.viewport = Some(metrics.viewport);
        if !self.preloader.is_ready() {
            return Ok(false);
        }
        let idx = frame_index(&metrics, self.config.frame_count());
        if idx == self.current_frame && self.painted_frame == Some(idx) {
            return Ok(false);
        }
        self.current_frame = idx;
        self.was_ready = true;
        self.repaint()
    }

    pub fn on_scroll(&mut self, provider: &dyn MetricsProvider) -> ScrubResult<bool> {
        self.handle_scroll(provider.metrics())
    }

    /// Paint the current frame if its slot holds an image; failed slots keep the previous
    /// contents.
    fn repaint(&mut self) -> ScrubResult<bool> {
        let Some(viewport) = self.viewport else {
            return Ok(false);
        };
        let Some(image) = self.preloader.image(self.current_frame).cloned() else {
            tracing::trace!(frame = self.current_frame, "no image in slot, keeping canvas");
            return Ok(false);
        };
        self.canvas.paint_cover(viewport, self.current_frame, &image)?;
        self.painted_frame = Some(self.current_frame);
        Ok(true)
    }

    /// Listen for scroll events from `source`. Replaces any earlier subscription.
    pub fn subscribe(&mut self, source: &dyn ScrollSource) {
        self.subscription = Some(ScrollSubscription::attach(source));
    }

    pub fn unsubscribe(&mut self) {
        self.subscription = None;
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Drain finished loads, then handle the latest subscribed scroll event, if any.
    pub fn poll(&mut self, provider: &dyn MetricsProvider) -> ScrubResult<bool> {
        let mut painted = self.tick()?;
        let scrolled = self
            .subscription
            .as_ref()
            .and_then(ScrollSubscription::take)
            .is_some();
        if scrolled {
            painted |= self.on_scroll(provider)?;
        }
        Ok(painted)
    }

    /// Container layout for a block starting at document offset `offset_top`.
    pub fn container_layout(&self, offset_top: f64, viewport: Viewport) -> ContainerLayout {
        ContainerLayout {
            offset_top,
            height: self.height.resolve(viewport),
        }
    }

    /// Metrics for `source` scrolled against a block at `offset_top`.
    pub fn metrics_for<'a>(
        &self,
        source: &'a dyn ScrollSource,
        offset_top: f64,
        viewport: Viewport,
    ) -> SourceMetrics<'a> {
        SourceMetrics {
            source,
            layout: self.container_layout(offset_top, viewport),
            viewport,
        }
    }

    /// Offset of the pinned box inside the container for `metrics`.
    pub fn sticky_offset(&self, metrics: &ScrollMetrics) -> f64 {
        sticky_offset(metrics)
    }

    pub fn status(&self) -> StatusOverlay {
        StatusOverlay::from_snapshot(&self.preloader.snapshot())
    }

    /// Composite the pinned box for `viewport`: backdrop, canvas, overlays, status.
    #[tracing::instrument(skip(self), fields(frame = self.current_frame))]
    pub fn compose(&self, viewport: Viewport) -> ScrubResult<FrameRGBA> {
        let status = self.status();
        render_layers(viewport, |p| {
            p.fill_rect(viewport.rect(), BACKDROP_RGBA);
            self.canvas.composite_into(p)?;
            for overlay in &self.overlays {
                overlay.paint(p)?;
            }
            status.paint(p);
            Ok(())
        })
    }

    /// Resolve which layer receives a pointer event at `point`.
    pub fn hit_test(&self, point: Point, viewport: Viewport) -> HitTarget {
        if self.status().occludes() {
            return HitTarget::Status;
        }
        for (i, overlay) in self.overlays.iter().enumerate().rev() {
            if overlay
                .interactive_regions(viewport)
                .iter()
                .any(|r| r.contains(point))
            {
                return HitTarget::Overlay(i);
            }
        }
        HitTarget::Canvas
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    pub fn height(&self) -> ScrollHeight {
        self.height
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn preloader(&self) -> &Preloader {
        &self.preloader
    }

    pub fn preloader_mut(&mut self) -> &mut Preloader {
        &mut self.preloader
    }

    pub fn canvas(&self) -> &FrameCanvas {
        &self.canvas
    }

    pub fn snapshot(&self) -> PreloadSnapshot {
        self.preloader.snapshot()
    }

    /// Retire the preload session and drop the scroll subscription.
    pub fn dispose(&mut self) {
        self.preloader.dispose();
        self.subscription = None;
        self.was_ready = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scroller.rs"]
mod tests;
