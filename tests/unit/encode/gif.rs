use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};

use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;

use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
    }
}

fn decode(bytes: &[u8]) -> Vec<image::Frame> {
    GifDecoder::new(Cursor::new(bytes))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap()
}

#[test]
fn quality_maps_to_clamped_speed() {
    assert_eq!(GifSinkOpts { quality: 0 }.speed(), 1);
    assert_eq!(GifSinkOpts { quality: 10 }.speed(), 10);
    assert_eq!(GifSinkOpts { quality: 200 }.speed(), 30);
}

#[test]
fn encode_gif_round_trips_frame_count_and_delay() {
    let frames = vec![
        solid(8, 6, [255, 0, 0, 255]),
        solid(8, 6, [0, 255, 0, 255]),
        solid(8, 6, [0, 0, 255, 255]),
    ];
    let out = encode_gif(&frames, 100, GifSinkOpts::default()).unwrap();
    assert_eq!(out.frame_count, 3);
    assert_eq!(out.frame_delay_ms, 100);
    assert_eq!(&out.bytes[..3], b"GIF");

    let decoded = decode(&out.bytes);
    assert_eq!(decoded.len(), 3);
    for f in &decoded {
        assert_eq!(f.buffer().dimensions(), (8, 6));
        let (n, d) = f.delay().numer_denom_ms();
        assert!((f64::from(n) / f64::from(d) - 100.0).abs() < 1e-6);
    }
    let px = decoded[1].buffer().get_pixel(4, 3).0;
    assert!(px[1] > 200 && px[0] < 50 && px[2] < 50, "{px:?}");
}

#[test]
fn encode_gif_declares_infinite_loop() {
    let out = encode_gif(&[solid(2, 2, [9, 9, 9, 255])], 50, GifSinkOpts::default()).unwrap();
    let netscape = b"NETSCAPE2.0";
    assert!(
        out.bytes.windows(netscape.len()).any(|w| w == netscape),
        "loop extension missing"
    );
}

#[test]
fn encode_gif_rejects_empty_sequence() {
    let err = encode_gif(&[], 50, GifSinkOpts::default()).unwrap_err();
    assert!(matches!(err, GifavatarError::Validation(_)));
}

#[test]
fn gif_sink_rejects_size_mismatch_and_reordering() {
    let mut bytes = Vec::new();
    let mut sink = GifSink::new(&mut bytes, GifSinkOpts::default());
    sink.begin(SinkConfig {
        width: 4,
        height: 4,
        repeat_forever: true,
    })
    .unwrap();
    let err = sink
        .push_frame(FrameIndex(0), &solid(3, 4, [0, 0, 0, 255]), 10)
        .unwrap_err();
    assert!(err.to_string().contains("frame size mismatch"));

    sink.push_frame(FrameIndex(1), &solid(4, 4, [0, 0, 0, 255]), 10)
        .unwrap();
    let err = sink
        .push_frame(FrameIndex(0), &solid(4, 4, [0, 0, 0, 255]), 10)
        .unwrap_err();
    assert!(matches!(err, GifavatarError::Encode(_)));
    sink.end().unwrap();
    assert_eq!(sink.frames_written(), 1);
}

#[test]
fn gif_sink_cannot_start_twice() {
    let mut bytes = Vec::new();
    let mut sink = GifSink::new(&mut bytes, GifSinkOpts::default());
    let cfg = SinkConfig {
        width: 1,
        height: 1,
        repeat_forever: false,
    };
    sink.begin(cfg).unwrap();
    assert!(sink.begin(cfg).is_err());
}

#[test]
fn gif_sink_without_frames_fails_to_finalize() {
    let mut bytes = Vec::new();
    let mut sink = GifSink::new(&mut bytes, GifSinkOpts::default());
    sink.begin(SinkConfig {
        width: 1,
        height: 1,
        repeat_forever: true,
    })
    .unwrap();
    assert!(sink.end().is_err());
}

#[test]
fn effective_delay_rounds_to_whole_centiseconds() {
    let opts = GifSinkOpts::default();
    assert_eq!(opts.effective_delay_ms(83), 80);
    assert_eq!(opts.effective_delay_ms(85), 90);
    assert_eq!(opts.effective_delay_ms(100), 100);
    assert_eq!(opts.effective_delay_ms(33), 30);
    assert_eq!(opts.effective_delay_ms(0), 10);
    assert_eq!(opts.effective_delay_ms(u32::MAX), 655_350);
}

#[test]
fn encode_gif_reports_the_delay_stored_in_the_file() {
    let f = solid(4, 4, [10, 20, 30, 255]);
    let out = encode_gif(&[f.clone(), f], 83, GifSinkOpts::default()).unwrap();
    assert_eq!(out.frame_delay_ms, 80);
    for frame in decode(&out.bytes) {
        let (n, d) = frame.delay().numer_denom_ms();
        assert!((f64::from(n) / f64::from(d) - f64::from(out.frame_delay_ms)).abs() < 1e-6);
    }
}

#[test]
fn gif_sink_stored_delay_matches_opts() {
    let mut bytes = Vec::new();
    let sink = GifSink::new(&mut bytes, GifSinkOpts::default());
    assert_eq!(sink.stored_delay_ms(83), 80);
}

struct FailSwitchWriter<'a> {
    bytes: Vec<u8>,
    fail: &'a AtomicBool,
}

impl Write for FailSwitchWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("disk full"));
        }
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn gif_sink_surfaces_trailer_write_failure() {
    let fail = AtomicBool::new(false);
    let writer = FailSwitchWriter {
        bytes: Vec::new(),
        fail: &fail,
    };
    let mut sink = GifSink::new(writer, GifSinkOpts::default());
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        repeat_forever: true,
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &solid(2, 2, [1, 2, 3, 255]), 100)
        .unwrap();

    fail.store(true, Ordering::SeqCst);
    let err = sink.end().unwrap_err();
    assert!(matches!(err, GifavatarError::Encode(_)));
    assert!(err.to_string().contains("disk full"), "{err}");
}
