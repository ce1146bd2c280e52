use image::RgbaImage;
use proptest::prelude::*;

use super::*;
use crate::raster::buffer::CanvasBuffer;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn filled<B: RasterBuffer>(w: u32, h: u32, px: [u8; 4]) -> B {
    let mut b = B::new_transparent(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            b.set_pixel(x, y, px);
        }
    }
    b
}

fn from_mask<B: RasterBuffer>(w: u32, h: u32, mask: &[bool]) -> B {
    let mut b = B::new_transparent(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            if mask[(y * w + x) as usize] {
                b.set_pixel(x, y, [10, 200, 30, 255]);
            }
        }
    }
    b
}

fn bytes<B: RasterBuffer>(b: &B) -> Vec<u8> {
    let mut out = Vec::with_capacity((b.width() * b.height() * 4) as usize);
    for y in 0..b.height() {
        for x in 0..b.width() {
            out.extend_from_slice(&b.pixel(x, y));
        }
    }
    out
}

fn check_inactive_is_passthrough<B: RasterBuffer>() {
    let src: B = filled(5, 4, [1, 2, 3, 4]);
    let disabled = StrokeConfig {
        enabled: false,
        weight_px: 3,
        color: Rgb8::BLACK,
    };
    let zero = StrokeConfig::new(0, Rgb8::BLACK);
    assert_eq!(bytes(&apply_stroke(&src, &disabled).unwrap()), bytes(&src));
    assert_eq!(bytes(&apply_stroke(&src, &zero).unwrap()), bytes(&src));
}

fn check_red_square_ring<B: RasterBuffer>() {
    let src: B = filled(100, 100, RED);
    let out = apply_stroke(&src, &StrokeConfig::new(4, Rgb8::BLACK)).unwrap();
    assert_eq!((out.width(), out.height()), (108, 108));

    for y in 0..108i64 {
        for x in 0..108i64 {
            let px = out.pixel(x as u32, y as u32);
            let inside = (4..104).contains(&x) && (4..104).contains(&y);
            if inside {
                assert_eq!(px, RED, "interior pixel ({x},{y}) changed");
                continue;
            }
            let nx = x.clamp(4, 103);
            let ny = y.clamp(4, 103);
            let d2 = (x - nx).pow(2) + (y - ny).pow(2);
            if d2 <= 16 {
                assert_eq!(px, BLACK, "ring pixel ({x},{y}) missing");
            } else {
                assert_eq!(px[3], 0, "pixel ({x},{y}) outside the ring painted");
            }
        }
    }
}

fn check_fully_opaque_footprint_untouched<B: RasterBuffer>() {
    // Border pixels of a fully opaque source become edges once padded; only the padding changes.
    let src: B = filled(6, 5, [9, 8, 7, 255]);
    let out = apply_stroke(&src, &StrokeConfig::new(2, Rgb8::WHITE)).unwrap();
    for y in 0..5 {
        for x in 0..6 {
            assert_eq!(out.pixel(x + 2, y + 2), [9, 8, 7, 255]);
        }
    }
    assert_eq!(out.pixel(0, 4), [255, 255, 255, 255]);
    assert_eq!(out.pixel(0, 0)[3], 0);
}

fn check_semi_transparent_pixels_keep_color<B: RasterBuffer>() {
    let mut src: B = B::new_transparent(5, 5).unwrap();
    src.set_pixel(2, 2, [40, 50, 60, 128]);
    let out = apply_stroke(&src, &StrokeConfig::new(1, Rgb8::BLACK)).unwrap();
    assert_eq!(out.pixel(3, 3), [40, 50, 60, 128]);
    assert_eq!(out.pixel(3, 2), BLACK);
    assert_eq!(out.pixel(2, 2)[3], 0);
}

#[test]
fn inactive_stroke_is_passthrough() {
    check_inactive_is_passthrough::<RgbaImage>();
    check_inactive_is_passthrough::<CanvasBuffer>();
}

#[test]
fn red_square_gets_uniform_black_ring() {
    check_red_square_ring::<RgbaImage>();
    check_red_square_ring::<CanvasBuffer>();
}

#[test]
fn fully_opaque_source_footprint_is_untouched() {
    check_fully_opaque_footprint_untouched::<RgbaImage>();
    check_fully_opaque_footprint_untouched::<CanvasBuffer>();
}

#[test]
fn semi_transparent_pixels_keep_color() {
    check_semi_transparent_pixels_keep_color::<RgbaImage>();
    check_semi_transparent_pixels_keep_color::<CanvasBuffer>();
}

fn check_oversized_weight_is_rejected<B: RasterBuffer + std::fmt::Debug>() {
    let src: B = filled(4, 4, RED);
    let err = apply_stroke(&src, &StrokeConfig::new(100_000, Rgb8::BLACK)).unwrap_err();
    assert!(matches!(err, GifavatarError::Validation(_)), "{err}");
    let at_cap = apply_stroke(&src, &StrokeConfig::new(MAX_STROKE_WEIGHT_PX, Rgb8::BLACK)).unwrap();
    assert_eq!(at_cap.width(), 4 + 2 * MAX_STROKE_WEIGHT_PX);
}

#[test]
fn oversized_weight_is_rejected() {
    check_oversized_weight_is_rejected::<RgbaImage>();
    check_oversized_weight_is_rejected::<CanvasBuffer>();

    let disabled = StrokeConfig {
        enabled: false,
        ..StrokeConfig::new(100_000, Rgb8::BLACK)
    };
    assert!(disabled.validate().is_err());
    let src: RgbaImage = filled(2, 2, RED);
    assert_eq!(apply_stroke(&src, &disabled).unwrap(), src);
}

#[test]
fn border_pixels_count_as_edges() {
    let buf: CanvasBuffer = filled(3, 3, RED);
    let edges = find_edges(&buf);
    assert_eq!(edges.len(), 8);
    assert!(!edges.contains(&(1, 1)));
}

#[test]
fn disc_offsets_match_euclidean_radius() {
    assert!(disc_offsets(0).is_empty());
    assert_eq!(disc_offsets(1).len(), 4);
    assert_eq!(disc_offsets(2).len(), 12);
    assert!(!disc_offsets(3).contains(&(0, 0)));
    assert!(!disc_offsets(3).contains(&(3, 1)));
    assert!(disc_offsets(3).contains(&(0, 3)));
}

fn check_containment<B: RasterBuffer>(w: u32, h: u32, mask: &[bool], k: u32) {
    let src: B = from_mask(w, h, mask);
    let out = apply_stroke(&src, &StrokeConfig::new(k, Rgb8::new(1, 2, 3))).unwrap();
    let opaque: Vec<(i64, i64)> = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .filter(|&(x, y)| mask[(y * w + x) as usize])
        .map(|(x, y)| (i64::from(x + k), i64::from(y + k)))
        .collect();

    for y in 0..out.height() {
        for x in 0..out.width() {
            let px = out.pixel(x, y);
            let in_src = x >= k && y >= k && x - k < w && y - k < h;
            if in_src && mask[((y - k) * w + (x - k)) as usize] {
                assert_eq!(px, [10, 200, 30, 255]);
                continue;
            }
            if px[3] == 0 {
                continue;
            }
            let k2 = i64::from(k) * i64::from(k);
            let near = opaque.iter().any(|&(ox, oy)| {
                (i64::from(x) - ox).pow(2) + (i64::from(y) - oy).pow(2) <= k2
            });
            assert!(near, "stroke pixel ({x},{y}) farther than {k} from content");
        }
    }
}

proptest! {
    #[test]
    fn stroke_stays_within_weight_of_content(
        mask in proptest::collection::vec(any::<bool>(), 64),
        k in 0u32..4,
    ) {
        check_containment::<RgbaImage>(8, 8, &mask, k);
        check_containment::<CanvasBuffer>(8, 8, &mask, k);
    }

    #[test]
    fn buffer_kinds_produce_identical_outlines(
        mask in proptest::collection::vec(any::<bool>(), 48),
        k in 0u32..5,
    ) {
        let cfg = StrokeConfig::new(k, Rgb8::new(200, 100, 50));
        let a = apply_stroke(&from_mask::<RgbaImage>(8, 6, &mask), &cfg).unwrap();
        let b = apply_stroke(&from_mask::<CanvasBuffer>(8, 6, &mask), &cfg).unwrap();
        prop_assert_eq!(bytes(&a), bytes(&b));
    }
}
