use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_frame_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, vec![100u8, 50u8, 200u8, 128u8]);

    let frame = decode_frame(&buf).unwrap();
    assert_eq!(frame.width, 1);
    assert_eq!(frame.height, 1);
    assert_eq!(
        frame.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_frame_rejects_garbage() {
    let err = decode_frame(b"not an image").unwrap_err();
    assert!(err.to_string().contains("decode frame"));
}

#[test]
fn from_premul_checks_len() {
    assert!(FrameImage::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(FrameImage::from_premul(0, 2, vec![]).is_err());
    let f = FrameImage::solid(4, 2, [1, 2, 3]).unwrap();
    assert_eq!(f.rgba8_premul.len(), 32);
    assert_eq!(&f.rgba8_premul[28..32], &[1, 2, 3, 255]);
    assert_eq!(f.aspect(), 2.0);
}
