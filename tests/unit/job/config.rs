use super::*;
use crate::effects::stroke::MAX_STROKE_WEIGHT_PX;

#[test]
fn empty_json_is_the_default_job() {
    let job = RenderJob::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(job, RenderJob::default());
    assert_eq!(job.style, MotionStyle::Rise);
    assert_eq!(job.timing.fps, 12);
    assert_eq!(job.transform.output_size, 400);
    assert!(!job.stroke.enabled);
    job.validate().unwrap();
}

#[test]
fn parses_a_full_job() {
    let json = r##"{
        "style": "fade",
        "timing": { "fps": 10, "total_duration_secs": 2.0, "still_lead_secs": 0.5 },
        "transform": { "position_x": 25, "zoom": 0.8, "enable_still_frame": false },
        "stroke": { "enabled": true, "weight_px": 4, "color": "#000" },
        "background": [1, 2, 3],
        "threading": { "parallel": true, "threads": 2 },
        "quality": 5,
        "live": { "scale": 2.0 }
    }"##;
    let job = RenderJob::from_reader(json.as_bytes()).unwrap();
    assert_eq!(job.style, MotionStyle::Fade);
    assert_eq!(job.timing.fps, 10);
    assert_eq!(job.transform.position_x, 25.0);
    assert_eq!(job.transform.zoom, 0.8);
    assert!(!job.transform.enable_still_frame);
    assert_eq!(job.transform.output_size, 400);
    assert_eq!(job.stroke, StrokeConfig::new(4, Rgb8::BLACK));
    assert_eq!(job.background, Rgb8::new(1, 2, 3));
    assert!(job.threading.parallel);
    assert_eq!(job.threading.threads, Some(2));
    assert_eq!(job.quality, 5);
    assert_eq!(job.live.scale, 2.0);
    assert_eq!(job.live.loop_pause_secs, DEFAULT_LOOP_PAUSE_SECS);
    job.validate().unwrap();
}

#[test]
fn unknown_style_falls_back_to_rise() {
    let job = RenderJob::from_reader(r#"{"style": "moonwalk"}"#.as_bytes()).unwrap();
    assert_eq!(job.style, MotionStyle::Rise);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = RenderJob::from_reader("{ not json".as_bytes()).unwrap_err();
    assert!(matches!(err, GifavatarError::Serde(_)));
    let err = RenderJob::from_reader(r##"{"background": "#zzzzzz"}"##.as_bytes()).unwrap_err();
    assert!(matches!(err, GifavatarError::Serde(_)));
}

#[test]
fn validate_bounds_the_frame_budget() {
    let job = RenderJob::from_reader(
        r#"{"timing": {"fps": 240, "total_duration_secs": 600, "still_lead_secs": 0.5},
            "transform": {"output_size": 2048}}"#
            .as_bytes(),
    )
    .unwrap();
    assert!(matches!(job.validate(), Err(GifavatarError::Validation(_))));

    let mut job = RenderJob::default();
    job.timing.fps = 5000;
    assert!(job.validate().is_err());
}

#[test]
fn validate_rejects_out_of_range_settings() {
    let mut job = RenderJob::default();
    job.stroke.weight_px = MAX_STROKE_WEIGHT_PX + 1;
    assert!(job.validate().is_err());

    let mut job = RenderJob::default();
    job.quality = 0;
    assert!(job.validate().is_err());

    let mut job = RenderJob::default();
    job.timing.still_lead_secs = job.timing.total_duration_secs;
    assert!(job.validate().is_err());

    let mut job = RenderJob::default();
    job.transform.output_size = 0;
    assert!(job.validate().is_err());

    let mut job = RenderJob::default();
    job.live.scale = f64::NAN;
    assert!(job.validate().is_err());

    let mut job = RenderJob::default();
    job.threading.threads = Some(0);
    assert!(job.validate().is_err());
}

#[test]
fn pretty_json_parses_back() {
    let mut job = RenderJob::default();
    job.style = MotionStyle::Swing;
    job.background = Rgb8::new(0x12, 0x34, 0x56);
    let text = job.to_json_pretty().unwrap();
    assert!(text.contains("\"swing\""));
    assert_eq!(RenderJob::from_reader(text.as_bytes()).unwrap(), job);
}

#[test]
fn capture_opts_cover_one_cycle_at_live_scale() {
    let mut job = RenderJob::default();
    job.live.scale = 1.5;
    job.quality = 12;
    let opts = job.capture_opts();
    assert_eq!(opts.duration_ms, 5500);
    assert_eq!(opts.fps, 12);
    assert_eq!(opts.quality, 12);
    assert_eq!(opts.scale, 1.5);
    assert_eq!(job.gif_opts().speed(), 12);
}

#[test]
fn from_path_reports_missing_file() {
    let err = RenderJob::from_path("/definitely/not/here/job.json").unwrap_err();
    assert!(err.to_string().contains("open render job JSON"));
}
