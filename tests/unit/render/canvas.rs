use super::*;

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 2)
}

fn frame_of(c: &FrameCanvas) -> FrameRGBA {
    let vp = c.viewport().unwrap();
    FrameRGBA {
        width: vp.width,
        height: vp.height,
        data: c.pixels().unwrap().to_vec(),
        premultiplied: true,
    }
}

#[test]
fn paint_cover_resizes_to_viewport_and_fills_it() {
    let mut c = FrameCanvas::new();
    assert!(c.viewport().is_none());

    let img = FrameImage::solid(8, 4, [10, 20, 200]).unwrap();
    let vp = Viewport::new(16, 16).unwrap();
    let fit = c.paint_cover(vp, 0, &img).unwrap();
    assert!(fit.covers(vp.size()));
    assert_eq!(c.viewport(), Some(vp));
    assert_eq!(c.paint_count(), 1);

    let f = frame_of(&c);
    for (x, y) in [(0, 0), (8, 8), (15, 15), (0, 15)] {
        assert!(
            close(f.pixel(x, y).unwrap(), [10, 20, 200, 255]),
            "({x},{y}) = {:?}",
            f.pixel(x, y)
        );
    }
}

#[test]
fn repaint_replaces_previous_contents() {
    let mut c = FrameCanvas::new();
    let vp = Viewport::new(8, 8).unwrap();
    c.paint_cover(vp, 0, &FrameImage::solid(2, 2, [255, 0, 0]).unwrap())
        .unwrap();
    c.paint_cover(vp, 1, &FrameImage::solid(2, 2, [0, 255, 0]).unwrap())
        .unwrap();
    assert!(close(frame_of(&c).pixel(4, 4).unwrap(), [0, 255, 0, 255]));

    let bigger = Viewport::new(12, 6).unwrap();
    c.paint_cover(bigger, 1, &FrameImage::solid(2, 2, [0, 255, 0]).unwrap())
        .unwrap();
    assert_eq!(c.pixels().unwrap().len(), 12 * 6 * 4);
}

#[test]
fn render_layers_draws_in_order() {
    let vp = Viewport::new(10, 10).unwrap();
    let out = render_layers(vp, |p| {
        p.fill_rect(vp.rect(), [5, 5, 5, 255]);
        p.fill_rect(Rect::new(0.0, 0.0, 5.0, 10.0), [255, 255, 255, 255]);
        Ok(())
    })
    .unwrap();
    assert!(out.premultiplied);
    assert!(close(out.pixel(2, 5).unwrap(), [255, 255, 255, 255]));
    assert!(close(out.pixel(8, 5).unwrap(), [5, 5, 5, 255]));
    assert_eq!(out.pixel(10, 0), None);
}

#[test]
fn composite_into_stretches_stale_canvas() {
    let mut c = FrameCanvas::new();
    c.paint_cover(
        Viewport::new(4, 4).unwrap(),
        0,
        &FrameImage::solid(1, 1, [0, 0, 255]).unwrap(),
    )
    .unwrap();
    let out = render_layers(Viewport::new(8, 8).unwrap(), |p| c.composite_into(p)).unwrap();
    assert!(close(out.pixel(7, 7).unwrap(), [0, 0, 255, 255]));
}

#[test]
fn oversized_viewport_is_a_render_error() {
    let mut c = FrameCanvas::new();
    let vp = Viewport::new(70_000, 1).unwrap();
    let err = c
        .paint_cover(vp, 0, &FrameImage::solid(1, 1, [0, 0, 0]).unwrap())
        .unwrap_err();
    assert!(matches!(err, ScrubError::Render(_)));
}

#[test]
fn only_the_last_frame_paint_is_cached() {
    let mut c = FrameCanvas::new();
    let vp = Viewport::new(8, 8).unwrap();
    for key in 0..3u8 {
        let img = FrameImage::solid(2, 2, [key * 80, 0, 0]).unwrap();
        c.paint_cover(vp, u32::from(key), &img).unwrap();
        assert_eq!(c.cached_key(), Some(u32::from(key)));
    }
    assert!(close(frame_of(&c).pixel(4, 4).unwrap(), [160, 0, 0, 255]));

    // Same key reuses the cached paint even if the caller passes other pixels.
    c.paint_cover(vp, 2, &FrameImage::solid(2, 2, [0, 0, 255]).unwrap())
        .unwrap();
    assert!(close(frame_of(&c).pixel(4, 4).unwrap(), [160, 0, 0, 255]));

    c.reset_cache();
    assert_eq!(c.cached_key(), None);
}
