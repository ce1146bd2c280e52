use super::*;

#[test]
fn names_round_trip_strictly() {
    for style in MotionStyle::ALL {
        assert_eq!(MotionStyle::parse_strict(style.name()).unwrap(), style);
    }
    assert_eq!(MotionStyle::parse_strict("  FADE ").unwrap(), MotionStyle::Fade);
}

#[test]
fn unknown_name_is_unsupported_when_strict() {
    let err = MotionStyle::parse_strict("moonwalk").unwrap_err();
    assert!(matches!(err, GifavatarError::UnsupportedStyle(_)));
}

#[test]
fn unknown_name_falls_back_to_rise() {
    assert_eq!(MotionStyle::from_name("moonwalk"), MotionStyle::Rise);
    assert_eq!(MotionStyle::from_name(""), MotionStyle::Rise);
    assert_eq!(MotionStyle::from_name("pan"), MotionStyle::Pan);
}

#[test]
fn serde_is_lowercase_and_lenient() {
    assert_eq!(
        serde_json::to_string(&MotionStyle::Stomp).unwrap(),
        "\"stomp\""
    );
    let s: MotionStyle = serde_json::from_str("\"drift\"").unwrap();
    assert_eq!(s, MotionStyle::Drift);
    let s: MotionStyle = serde_json::from_str("\"nope\"").unwrap();
    assert_eq!(s, MotionStyle::Rise);
}

#[test]
fn pan_direction_follows_position_hint() {
    assert_eq!(PanDirection::from_position_hint(40.0), PanDirection::FromRight);
    assert_eq!(PanDirection::from_position_hint(0.0), PanDirection::FromLeft);
    assert_eq!(PanDirection::from_position_hint(-10.0).sign(), -1.0);
}
