use crate::foundation::core::{Affine, Rect, Size};

/// Axis along which a cover-fit crops the source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropAxis {
    /// Image is wider than the canvas: left and right are cropped.
    Horizontal,
    /// Image is taller than the canvas: top and bottom are cropped.
    Vertical,
}

/// Destination rectangle for drawing an image so it fully covers a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    pub offset_x: f64,
    pub offset_y: f64,
    pub draw_width: f64,
    pub draw_height: f64,
}

/// Scale `image` to cover `canvas`, preserving aspect ratio and centring the crop.
///
/// A relatively wider canvas scales by width and centres vertically; otherwise the image
/// scales by height and centres horizontally. Equal ratios take the second branch and fit
/// exactly.
pub fn cover_fit(canvas: Size, image: Size) -> CoverFit {
    if canvas.width <= 0.0 || canvas.height <= 0.0 || image.width <= 0.0 || image.height <= 0.0
    {
        return CoverFit {
            offset_x: 0.0,
            offset_y: 0.0,
            draw_width: canvas.width.max(0.0),
            draw_height: canvas.height.max(0.0),
        };
    }

    let canvas_ratio = canvas.width / canvas.height;
    let image_ratio = image.width / image.height;

    if canvas_ratio > image_ratio {
        let draw_height = canvas.width / image_ratio;
        CoverFit {
            offset_x: 0.0,
            offset_y: (canvas.height - draw_height) / 2.0,
            draw_width: canvas.width,
            draw_height,
        }
    } else {
        let draw_width = canvas.height * image_ratio;
        CoverFit {
            offset_x: (canvas.width - draw_width) / 2.0,
            offset_y: 0.0,
            draw_width,
            draw_height: canvas.height,
        }
    }
}

impl CoverFit {
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.offset_x,
            self.offset_y,
            self.offset_x + self.draw_width,
            self.offset_y + self.draw_height,
        )
    }

    pub fn crop_axis(&self) -> CropAxis {
        if self.offset_y < 0.0 {
            CropAxis::Vertical
        } else {
            CropAxis::Horizontal
        }
    }

    /// Maps image pixel space `(0,0)-(w,h)` onto the destination rectangle.
    pub fn transform(&self, image: Size) -> Affine {
        let sx = if image.width > 0.0 {
            self.draw_width / image.width
        } else {
            1.0
        };
        let sy = if image.height > 0.0 {
            self.draw_height / image.height
        } else {
            1.0
        };
        Affine::translate((self.offset_x, self.offset_y)) * Affine::scale_non_uniform(sx, sy)
    }

    pub fn covers(&self, canvas: Size) -> bool {
        const EPS: f64 = 1e-9;
        let r = self.rect();
        r.x0 <= EPS && r.y0 <= EPS && r.x1 >= canvas.width - EPS && r.y1 >= canvas.height - EPS
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cover.rs"]
mod tests;
