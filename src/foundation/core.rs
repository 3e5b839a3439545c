use crate::foundation::error::{ScrubError, ScrubResult};

pub use kurbo::{Affine, Point, Rect, Size};

/// Pixel dimensions of the visible viewport (and therefore of the canvas backing store).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> ScrubResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScrubError::validation(format!(
                "viewport must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Parse a `WIDTHxHEIGHT` string such as `1280x720`.
    pub fn parse(s: &str) -> ScrubResult<Self> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| ScrubError::validation(format!("viewport '{s}' is not WxH")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| ScrubError::validation(format!("viewport '{s}': {e}")))
        };
        Self::new(parse(w)?, parse(h)?)
    }

    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn rect(self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
