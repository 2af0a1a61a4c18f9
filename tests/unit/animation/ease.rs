use super::*;

const ALL: [Ease; 8] = [
    Ease::Linear,
    Ease::Cosine,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
];

#[test]
fn every_curve_pins_endpoints() {
    for ease in ALL {
        assert!(ease.apply(0.0).abs() < 1e-12, "{ease:?}");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?}");
    }
}

#[test]
fn symmetric_curves_hit_half_at_midpoint() {
    for ease in [Ease::Linear, Ease::Cosine, Ease::InOutQuad, Ease::InOutCubic] {
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-12, "{ease:?}");
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::InQuad.apply(-1.0), 0.0);
    assert_eq!(Ease::OutCubic.apply(2.0), 1.0);
}

#[test]
fn deserializes_camel_case_names() {
    let e: Ease = serde_json::from_str("\"inOutCubic\"").unwrap();
    assert_eq!(e, Ease::InOutCubic);
}
