use crate::{
    foundation::core::{Point, Rect, Viewport},
    foundation::error::ScrubResult,
    preload::session::PreloadSnapshot,
    render::canvas::Painter,
};

/// Backdrop colour of the pinned box and of the status overlays.
pub const BACKDROP_RGBA: [u8; 4] = [5, 5, 5, 255];

/// Loading bar track size in pixels.
pub const LOADING_TRACK_WIDTH: f64 = 128.0;
pub const LOADING_TRACK_HEIGHT: f64 = 1.0;

const TRACK_RGBA: [u8; 4] = [255, 255, 255, 51];
const FILL_RGBA: [u8; 4] = [255, 255, 255, 255];
const ERROR_RGBA: [u8; 4] = [255, 255, 255, 102];

/// Caller-supplied content layered in front of the canvas.
///
/// Overlays are pointer-transparent unless they report interactive regions.
pub trait Overlay {
    fn paint(&self, painter: &mut Painter<'_>) -> ScrubResult<()>;

    /// Regions (in viewport coordinates) that receive pointer events.
    fn interactive_regions(&self, _viewport: Viewport) -> Vec<Rect> {
        Vec::new()
    }
}

/// A filled rectangle, optionally opting back in to pointer events.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    pub rect: Rect,
    /// Straight-alpha RGBA8.
    pub rgba: [u8; 4],
    pub interactive: bool,
}

impl Overlay for Panel {
    fn paint(&self, painter: &mut Painter<'_>) -> ScrubResult<()> {
        painter.fill_rect(self.rect, self.rgba);
        Ok(())
    }

    fn interactive_regions(&self, _viewport: Viewport) -> Vec<Rect> {
        if self.interactive {
            vec![self.rect]
        } else {
            Vec::new()
        }
    }
}

/// Which status layers sit on top of the canvas.
///
/// Loading shows while the sequence is not ready; the error shows whenever a majority-failure
/// message is set. Both can be active at once.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct StatusOverlay {
    /// Progress percent while loading.
    pub loading: Option<u8>,
    pub error: Option<String>,
}

impl StatusOverlay {
    pub fn from_snapshot(snap: &PreloadSnapshot) -> Self {
        Self {
            loading: (!snap.is_ready).then_some(snap.progress_percent),
            error: snap.error.clone(),
        }
    }

    /// True when the status layer fully hides the canvas.
    pub fn occludes(&self) -> bool {
        self.loading.is_some() || self.error.is_some()
    }

    pub fn paint(&self, painter: &mut Painter<'_>) {
        if !self.occludes() {
            return;
        }
        let vp = painter.viewport();
        painter.fill_rect(vp.rect(), BACKDROP_RGBA);
        if let Some(progress) = self.loading {
            let bar = loading_bar(vp, progress);
            painter.fill_rect(bar.track, TRACK_RGBA);
            if bar.fill.width() > 0.0 {
                painter.fill_rect(bar.fill, FILL_RGBA);
            }
        }
        if self.error.is_some() {
            painter.fill_rect(error_mark(vp), ERROR_RGBA);
        }
    }
}

/// Geometry of the centred loading bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadingBar {
    pub track: Rect,
    pub fill: Rect,
}

pub fn loading_bar(viewport: Viewport, progress: u8) -> LoadingBar {
    let c = viewport.rect().center();
    let track = Rect::from_center_size(c, (LOADING_TRACK_WIDTH, LOADING_TRACK_HEIGHT));
    let frac = f64::from(progress.min(100)) / 100.0;
    let fill = Rect::new(
        track.x0,
        track.y0,
        track.x0 + LOADING_TRACK_WIDTH * frac,
        track.y1,
    );
    LoadingBar { track, fill }
}

fn error_mark(viewport: Viewport) -> Rect {
    let c = viewport.rect().center();
    Rect::from_center_size(Point::new(c.x, c.y + 24.0), (LOADING_TRACK_WIDTH, 2.0))
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
