use super::*;

fn sz(w: f64, h: f64) -> Size {
    Size::new(w, h)
}

#[test]
fn wide_canvas_scales_by_width_and_centres_vertically() {
    let fit = cover_fit(sz(1600.0, 900.0), sz(1000.0, 1000.0));
    assert_eq!(fit.draw_width, 1600.0);
    assert_eq!(fit.draw_height, 1600.0);
    assert_eq!(fit.offset_x, 0.0);
    assert_eq!(fit.offset_y, -350.0);
    assert_eq!(fit.crop_axis(), CropAxis::Vertical);
}

#[test]
fn tall_canvas_scales_by_height_and_centres_horizontally() {
    let fit = cover_fit(sz(400.0, 800.0), sz(1920.0, 1080.0));
    assert_eq!(fit.draw_height, 800.0);
    assert!((fit.draw_width - 800.0 * 1920.0 / 1080.0).abs() < 1e-9);
    assert_eq!(fit.offset_y, 0.0);
    assert!((fit.offset_x - (400.0 - fit.draw_width) / 2.0).abs() < 1e-9);
    assert_eq!(fit.crop_axis(), CropAxis::Horizontal);
}

#[test]
fn equal_ratio_fits_exactly() {
    let fit = cover_fit(sz(640.0, 360.0), sz(1280.0, 720.0));
    let r = fit.rect();
    assert!(r.x0.abs() < 1e-9 && r.y0 == 0.0);
    assert!((r.x1 - 640.0).abs() < 1e-9 && r.y1 == 360.0);
}

#[test]
fn cover_has_no_gap_and_crops_one_axis_only() {
    let canvases = [(1.0, 1.0), (1920.0, 1080.0), (390.0, 844.0), (3000.0, 200.0)];
    let images = [(1.0, 1.0), (1920.0, 1080.0), (1080.0, 1920.0), (50.0, 4000.0)];
    for &(cw, ch) in &canvases {
        for &(iw, ih) in &images {
            let fit = cover_fit(sz(cw, ch), sz(iw, ih));
            assert!(fit.covers(sz(cw, ch)), "{cw}x{ch} <- {iw}x{ih}: {fit:?}");
            let ratio = fit.draw_width / fit.draw_height;
            assert!((ratio - iw / ih).abs() < 1e-9 * ratio.max(1.0));
            let crop_x = fit.offset_x < -1e-9;
            let crop_y = fit.offset_y < -1e-9;
            assert!(!(crop_x && crop_y));
            assert!(fit.offset_x == 0.0 || fit.offset_y == 0.0);
            // Centred crop.
            let r = fit.rect();
            assert!(((r.x0 + r.x1) / 2.0 - cw / 2.0).abs() < 1e-6);
            assert!(((r.y0 + r.y1) / 2.0 - ch / 2.0).abs() < 1e-6);
        }
    }
}

#[test]
fn transform_maps_image_corners_to_rect() {
    let image = sz(200.0, 100.0);
    let fit = cover_fit(sz(100.0, 100.0), image);
    let t = fit.transform(image);
    let r = fit.rect();
    assert_eq!(t * kurbo::Point::new(0.0, 0.0), kurbo::Point::new(r.x0, r.y0));
    assert_eq!(
        t * kurbo::Point::new(200.0, 100.0),
        kurbo::Point::new(r.x1, r.y1)
    );
}

#[test]
fn degenerate_sizes_fill_canvas() {
    let fit = cover_fit(sz(10.0, 10.0), sz(0.0, 5.0));
    assert_eq!(fit.rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
}
