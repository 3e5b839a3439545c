//! Scrubreel plays an image sequence as the user scrolls.
//!
//! A tall container block maps its scroll progress onto a frame index; the matching frame is
//! drawn cover-fit into a viewport-sized canvas pinned inside the block:
//!
//! - Describe the frames with a [`SequenceConfig`]
//! - Preload them in parallel through a [`Preloader`] and a [`LoadDispatcher`]
//! - Drive a [`SequenceScroller`] from scroll metrics or a [`ScrollSource`]
#![forbid(unsafe_code)]

pub mod assets;
pub mod foundation;
pub mod preload;
pub mod render;
pub mod scroll;
pub mod sequence;

pub use crate::assets::decode::{FrameImage, decode_frame};
pub use crate::foundation::core::{Affine, Point, Rect, Size, Viewport};
pub use crate::foundation::error::{ScrubError, ScrubResult};
pub use crate::preload::loader::{FrameLoader, FsFrameLoader, LoadDispatcher, MemoryFrameLoader};
pub use crate::preload::session::{FrameSettled, PreloadSnapshot, Preloader, SessionId};
pub use crate::preload::state::{PreloadEvent, PreloadState};
pub use crate::render::canvas::{FrameCanvas, FrameRGBA, Painter};
pub use crate::render::cover::{CoverFit, cover_fit};
pub use crate::render::overlay::{Overlay, Panel, StatusOverlay};
pub use crate::render::scroller::{HitTarget, ScrollerOpts, SequenceScroller};
pub use crate::scroll::mapper::{
    MetricsProvider, ScrollHeight, ScrollMetrics, frame_index, scroll_progress,
};
pub use crate::scroll::smooth::{SmoothScroll, SmoothScrollOpts};
pub use crate::scroll::source::{ContainerLayout, NativeScroll, ScrollSource, SourceMetrics};
pub use crate::sequence::config::SequenceConfig;
