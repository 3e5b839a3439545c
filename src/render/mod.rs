/// Cover-fit geometry.
pub mod cover;
/// CPU drawing surface and layer compositing.
pub mod canvas;
/// Caller overlays and the loading / error layer.
pub mod overlay;
/// Scroll-driven playback.
pub mod scroller;
