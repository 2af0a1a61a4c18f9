use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frames_to_secs_and_ceil() {
    let fps = Fps::new(30, 1).unwrap();
    assert!((fps.frames_to_secs(15) - 0.5).abs() < 1e-12);
    assert_eq!(fps.secs_to_frames_ceil(1.0), 30);
    assert_eq!(fps.secs_to_frames_ceil(1.01), 31);
}

#[test]
fn premul_roundtrip_keeps_opaque_colors() {
    let p = Rgba8Premul::from_straight_rgba(200, 100, 50, 255);
    assert_eq!(p.to_straight(), [200, 100, 50, 255]);
}

#[test]
fn premul_scales_by_alpha() {
    let p = Rgba8Premul::from_straight_rgba(255, 255, 255, 128);
    assert_eq!(p.to_array(), [128, 128, 128, 128]);
    assert_eq!(Rgba8Premul::transparent().to_straight(), [0, 0, 0, 0]);
}

#[test]
fn canvas_empty_when_any_side_is_zero() {
    assert!(Canvas { width: 0, height: 4 }.is_empty());
    assert!(Canvas { width: 4, height: 0 }.is_empty());
    assert!(!Canvas { width: 4, height: 4 }.is_empty());
}
