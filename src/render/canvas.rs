use std::sync::Arc;

use crate::{
    assets::decode::FrameImage,
    foundation::core::{Affine, Rect, Size, Viewport},
    foundation::error::{ScrubError, ScrubResult},
    render::cover::{CoverFit, cover_fit},
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the flag makes that explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Drawing facade handed to overlay layers.
pub struct Painter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    viewport: Viewport,
}

impl Painter<'_> {
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Fill `rect` with a straight-alpha RGBA8 colour.
    pub fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            rgba[0], rgba[1], rgba[2], rgba[3],
        ));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Draw `image` with `transform` mapping its pixel space onto the viewport.
    pub fn draw_image(&mut self, image: &FrameImage, transform: Affine) -> ScrubResult<()> {
        let paint = image_paint(image)?;
        let size = Size::new(f64::from(image.width), f64::from(image.height));
        self.draw_paint(paint, size, transform);
        Ok(())
    }

    fn draw_paint(&mut self, paint: vello_cpu::Image, size: Size, transform: Affine) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            size.width,
            size.height,
        ));
    }
}

/// Render a fresh viewport-sized surface by running `draw` over a [`Painter`].
pub fn render_layers(
    viewport: Viewport,
    draw: impl FnOnce(&mut Painter<'_>) -> ScrubResult<()>,
) -> ScrubResult<FrameRGBA> {
    let (w, h) = surface_dims(viewport)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    {
        let mut painter = Painter {
            ctx: &mut ctx,
            viewport,
        };
        draw(&mut painter)?;
    }
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(FrameRGBA {
        width: viewport.width,
        height: viewport.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

/// The frame-sequence drawing surface.
///
/// Owned by one scroller. The backing store is resized to the viewport on every paint, and
/// keeps its last contents until the next successful paint.
#[derive(Default)]
pub struct FrameCanvas {
    surface: Option<Surface>,
    /// Paint for the most recently drawn frame key.
    last_paint: Option<(u32, vello_cpu::Image)>,
    paint_count: u64,
}

struct Surface {
    viewport: Viewport,
    pixmap: vello_cpu::Pixmap,
}

impl FrameCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backing-store size, or `None` before the first paint.
    pub fn viewport(&self) -> Option<Viewport> {
        self.surface.as_ref().map(|s| s.viewport)
    }

    /// Number of successful paints since creation.
    pub fn paint_count(&self) -> u64 {
        self.paint_count
    }

    /// Forget the cached frame paint, e.g. when the sequence changes.
    pub fn reset_cache(&mut self) {
        self.last_paint = None;
    }

    /// Key of the frame whose paint is cached.
    pub fn cached_key(&self) -> Option<u32> {
        self.last_paint.as_ref().map(|(k, _)| *k)
    }

    /// Premultiplied RGBA8 contents of the backing store.
    pub fn pixels(&self) -> Option<&[u8]> {
        self.surface.as_ref().map(|s| s.pixmap.data_as_u8_slice())
    }

    /// Resize to `viewport`, clear, and draw `image` cover-fit. `key` identifies the frame;
    /// only the last key's paint is kept.
    #[tracing::instrument(skip(self, image), fields(w = viewport.width, h = viewport.height))]
    pub fn paint_cover(
        &mut self,
        viewport: Viewport,
        key: u32,
        image: &FrameImage,
    ) -> ScrubResult<CoverFit> {
        let (w, h) = surface_dims(viewport)?;
        let paint = match &self.last_paint {
            Some((k, p)) if *k == key => p.clone(),
            _ => {
                let p = image_paint(image)?;
                self.last_paint = Some((key, p.clone()));
                p
            }
        };

        let mut surface = match self.surface.take() {
            Some(s) if s.viewport == viewport => s,
            _ => Surface {
                viewport,
                pixmap: vello_cpu::Pixmap::new(w, h),
            },
        };
        surface.pixmap.data_as_u8_slice_mut().fill(0);

        let image_size = Size::new(f64::from(image.width), f64::from(image.height));
        let fit = cover_fit(viewport.size(), image_size);

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        {
            let mut painter = Painter {
                ctx: &mut ctx,
                viewport,
            };
            painter.draw_paint(paint, image_size, fit.transform(image_size));
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut surface.pixmap);

        self.surface = Some(surface);
        self.paint_count += 1;
        Ok(fit)
    }

    /// Draw the current backing store onto `painter`, covering its viewport.
    pub fn composite_into(&self, painter: &mut Painter<'_>) -> ScrubResult<()> {
        let Some(s) = &self.surface else {
            return Ok(());
        };
        let img = FrameImage::from_premul(
            s.viewport.width,
            s.viewport.height,
            s.pixmap.data_as_u8_slice().to_vec(),
        )?;
        let size = s.viewport.size();
        let fit = cover_fit(painter.viewport().size(), size);
        painter.draw_image(&img, fit.transform(size))
    }
}

fn surface_dims(viewport: Viewport) -> ScrubResult<(u16, u16)> {
    let w: u16 = viewport
        .width
        .try_into()
        .map_err(|_| ScrubError::render("canvas width exceeds u16"))?;
    let h: u16 = viewport
        .height
        .try_into()
        .map_err(|_| ScrubError::render("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn image_paint(image: &FrameImage) -> ScrubResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ScrubResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ScrubError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ScrubError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ScrubError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
