use std::io::Cursor;

use super::*;

#[test]
fn decode_png_keeps_straight_alpha() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba.clone()).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_source(&buf).unwrap();
    assert_eq!(decoded.dimensions(), (1, 1));
    assert_eq!(decoded.as_raw(), &src_rgba);
}

#[test]
fn decode_garbage_is_image_decode_error() {
    let err = decode_source(b"definitely not an image").unwrap_err();
    assert!(matches!(err, GifavatarError::ImageDecode(_)));

    let err = decode_source(&[]).unwrap_err();
    assert!(matches!(err, GifavatarError::ImageDecode(_)));
}

#[test]
fn decode_missing_file_is_image_decode_error() {
    let err = decode_source_path("target/does/not/exist.png").unwrap_err();
    assert!(matches!(err, GifavatarError::ImageDecode(_)));
}
