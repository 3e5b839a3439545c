use crate::foundation::core::Viewport;
use crate::foundation::error::{ScrubError, ScrubResult};

/// Container geometry relative to the viewport at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    /// Distance from the viewport top to the container start. Negative once scrolled past.
    pub top: f64,
    /// Total height of the container block.
    pub height: f64,
    pub viewport: Viewport,
}

impl ScrollMetrics {
    pub fn new(top: f64, height: f64, viewport: Viewport) -> Self {
        Self {
            top,
            height,
            viewport,
        }
    }

    /// Scrollable distance through the block: `height - viewport_height`.
    pub fn span(&self) -> f64 {
        self.height - f64::from(self.viewport.height)
    }
}

/// Anything that can report the current container geometry.
pub trait MetricsProvider {
    fn metrics(&self) -> ScrollMetrics;
}

impl MetricsProvider for ScrollMetrics {
    fn metrics(&self) -> ScrollMetrics {
        *self
    }
}

/// `-top / (height - viewport_height)` clamped to `[0, 1]`.
///
/// Without a positive span the block cannot be scrubbed: progress is 0 until the block top
/// passes the viewport top, then 1. Non-finite geometry reads as 0.
pub fn scroll_progress(m: &ScrollMetrics) -> f64 {
    if !m.top.is_finite() || !m.height.is_finite() {
        return 0.0;
    }
    let span = m.span();
    if span <= 0.0 {
        return if m.top < 0.0 { 1.0 } else { 0.0 };
    }
    (-m.top / span).clamp(0.0, 1.0)
}

/// `floor(progress * (frame_count - 1))`, a plain step function with no smoothing.
pub fn frame_for_progress(progress: f64, frame_count: u32) -> u32 {
    if frame_count <= 1 || !progress.is_finite() {
        return 0;
    }
    let last = frame_count - 1;
    let idx = (progress.clamp(0.0, 1.0) * f64::from(last)).floor();
    (idx as u32).min(last)
}

pub fn frame_index(m: &ScrollMetrics, frame_count: u32) -> u32 {
    frame_for_progress(scroll_progress(m), frame_count)
}

/// Offset of the pinned viewport box inside its container.
pub fn sticky_offset(m: &ScrollMetrics) -> f64 {
    let span = m.span().max(0.0);
    if !m.top.is_finite() {
        return 0.0;
    }
    (-m.top).clamp(0.0, span)
}

/// Caller-specified container height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollHeight {
    /// Absolute pixels.
    Px(f64),
    /// Multiples of the viewport height (`"400vh"` is `Viewports(4.0)`).
    Viewports(f64),
}

impl ScrollHeight {
    /// Parse `4000`, `"4000px"` or `"400vh"`.
    pub fn parse(s: &str) -> ScrubResult<Self> {
        let t = s.trim();
        let (num, ctor): (&str, fn(f64) -> Self) = if let Some(v) = t.strip_suffix("vh") {
            (v, |n| Self::Viewports(n / 100.0))
        } else if let Some(v) = t.strip_suffix("px") {
            (v, Self::Px)
        } else {
            (t, Self::Px)
        };
        let n: f64 = num
            .trim()
            .parse()
            .map_err(|e| ScrubError::validation(format!("scroll height '{s}': {e}")))?;
        if !n.is_finite() || n < 0.0 {
            return Err(ScrubError::validation(format!(
                "scroll height '{s}' must be finite and >= 0"
            )));
        }
        Ok(ctor(n))
    }

    /// Height in pixels for a given viewport.
    pub fn resolve(self, viewport: Viewport) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Viewports(n) => n * f64::from(viewport.height),
        }
    }
}

impl std::str::FromStr for ScrollHeight {
    type Err = ScrubError;

    fn from_str(s: &str) -> ScrubResult<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/mapper.rs"]
mod tests;
