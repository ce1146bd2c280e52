use super::*;

#[test]
fn identity_combine_keeps_static_values() {
    let base = Transform {
        x: 12.0,
        y: -4.0,
        rotate_deg: 10.0,
        scale: 1.5,
        opacity: 1.0,
    };
    assert_eq!(base.combine(Transform::IDENTITY), base);
}

#[test]
fn combine_sums_translation_and_rotation_multiplies_scale() {
    let base = Transform {
        x: 10.0,
        y: 20.0,
        rotate_deg: 5.0,
        scale: 2.0,
        opacity: 1.0,
    };
    let sampled = Transform {
        x: -3.0,
        y: 4.0,
        rotate_deg: 1.0,
        scale: 0.5,
        opacity: 0.25,
    };
    let out = base.combine(sampled);
    assert_eq!(out.x, 7.0);
    assert_eq!(out.y, 24.0);
    assert_eq!(out.rotate_deg, 6.0);
    assert_eq!(out.scale, 1.0);
    assert_eq!(out.opacity, 0.25);
}

#[test]
fn combine_clamps_opacity() {
    let sampled = Transform {
        opacity: 1.7,
        ..Transform::IDENTITY
    };
    assert_eq!(Transform::IDENTITY.combine(sampled).opacity, 1.0);
}

#[test]
fn timing_defaults_produce_expected_frame_counts() {
    let t = TimingConfig::default();
    t.validate().unwrap();
    assert_eq!(t.still_frame_count(), 6);
    assert_eq!(t.animation_frame_count(), 66);
    assert_eq!(t.frame_delay_ms(), 83);
    assert!((t.body_secs() - 5.0).abs() < 1e-12);
}

#[test]
fn timing_rejects_lead_not_shorter_than_total() {
    let t = TimingConfig {
        fps: 12,
        total_duration_secs: 1.0,
        still_lead_secs: 1.0,
    };
    assert!(t.validate().is_err());

    let t = TimingConfig {
        fps: 0,
        ..TimingConfig::default()
    };
    assert!(t.validate().is_err());
}

#[test]
fn timing_caps_frame_rate_and_frame_count() {
    let fast = TimingConfig {
        fps: 5000,
        ..TimingConfig::default()
    };
    assert!(fast.validate().is_err());

    let at_cap = TimingConfig {
        fps: MAX_FPS,
        total_duration_secs: 5.0,
        still_lead_secs: 0.0,
    };
    at_cap.validate().unwrap();
    assert_eq!(at_cap.frame_delay_ms(), 10);

    let long = TimingConfig {
        fps: 240,
        total_duration_secs: 600.0,
        still_lead_secs: 0.5,
    };
    assert!(long.validate().is_err());

    let too_many = TimingConfig {
        fps: 50,
        total_duration_secs: 20.5,
        still_lead_secs: 0.0,
    };
    assert_eq!(too_many.animation_frame_count(), 1025);
    let err = too_many.validate().unwrap_err();
    assert!(err.to_string().contains("1025 frames"), "{err}");
}

#[test]
fn canvas_center_and_len() {
    let c = Canvas::square(10);
    assert_eq!(c.center(), Point::new(5.0, 5.0));
    assert_eq!(c.rgba_len().unwrap(), 400);
}
