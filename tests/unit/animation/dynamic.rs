use super::*;
use crate::foundation::ids::LayerId;
use std::cell::Cell;

#[test]
fn keyframes_interpolate_and_hold_at_ends() {
    let k = KeyFrames::new(vec![KeyFrame::new(1.0, 0.0f64), KeyFrame::new(3.0, 10.0)]).unwrap();
    assert_eq!(k.sample(0.0), 0.0);
    assert!((k.sample(2.0) - 5.0).abs() < 1e-12);
    assert_eq!(k.sample(5.0), 10.0);
}

#[test]
fn hold_mode_steps() {
    let k = KeyFrames::with_mode(
        vec![KeyFrame::new(0.0, 1.0f64), KeyFrame::new(1.0, 2.0)],
        InterpMode::Hold,
    )
    .unwrap();
    assert_eq!(k.sample(0.99), 1.0);
    assert_eq!(k.sample(1.0), 2.0);
}

#[test]
fn easing_shapes_the_segment() {
    let k = KeyFrames::new(vec![
        KeyFrame::new(0.0, 0.0f64).with_ease(Ease::InQuad),
        KeyFrame::new(1.0, 1.0),
    ])
    .unwrap();
    assert!((k.sample(0.5) - 0.25).abs() < 1e-12);
}

#[test]
fn invalid_tracks_are_configuration_errors() {
    assert!(KeyFrames::<f64>::new(vec![]).unwrap_err().is_configuration());
    let unsorted = vec![KeyFrame::new(2.0, 0.0f64), KeyFrame::new(1.0, 0.0)];
    assert!(KeyFrames::new(unsorted).unwrap_err().is_configuration());
    let nan = vec![KeyFrame::new(f64::NAN, 0.0f64)];
    assert!(KeyFrames::new(nan).is_err());
}

#[test]
fn func_values_are_memoized_per_time() {
    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    let d = Dynamic::func(move |t| {
        c.set(c.get() + 1);
        t * 2.0
    });
    let owner = LayerId::next();
    let mut cache = ValueCache::new();

    assert_eq!(d.eval(&mut cache, owner, "x", 1.0), 2.0);
    assert_eq!(d.eval(&mut cache, owner, "x", 1.0), 2.0);
    assert_eq!(calls.get(), 1);
    assert_eq!(d.eval(&mut cache, owner, "x", 2.0), 4.0);
    assert_eq!(calls.get(), 2);
}

#[test]
fn constants_bypass_the_cache() {
    let d: Dynamic<f64> = 3.0.into();
    let mut cache = ValueCache::new();
    assert_eq!(d.eval(&mut cache, LayerId::next(), "x", 0.0), 3.0);
    assert!(cache.is_empty());
    assert!(d.is_constant());
}

#[test]
fn color_and_affine_lerp() {
    let c = Color::lerp(&Color::BLACK, &Color::WHITE, 0.5);
    assert!((c.r - 0.5).abs() < 1e-12 && (c.a - 1.0).abs() < 1e-12);

    let a = Affine::lerp(
        &Affine::IDENTITY,
        &Affine::translate(Vec2::new(10.0, 0.0)),
        0.5,
    );
    assert_eq!(a.translation(), Vec2::new(5.0, 0.0));
}
