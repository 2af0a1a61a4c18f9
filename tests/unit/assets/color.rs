use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgb(1.0, 0.0, 0.0));

    let c: Color = serde_json::from_value(json!("0000FF80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
}

#[test]
fn rejects_bad_hex() {
    assert!(serde_json::from_value::<Color>(json!("#abc")).is_err());
    assert!(Color::parse_hex("#zz0000").unwrap_err().is_configuration());
}

#[test]
fn parses_object_array_and_hsla_forms() {
    let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Color::rgb(0.25, 0.5, 0.75));

    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9));

    let c: Color = serde_json::from_value(json!({"h": 120.0, "s": 1.0, "l": 0.5})).unwrap();
    assert!(c.r.abs() < 1e-9 && (c.g - 1.0).abs() < 1e-9 && c.b.abs() < 1e-9);
}

#[test]
fn premultiplies_on_conversion() {
    let p = Color::rgba(1.0, 0.5, 0.0, 0.5).to_rgba8_premul();
    assert_eq!(p.a, 128);
    assert_eq!(p.r, 128);
    assert_eq!(p.g, 64);
    assert_eq!(Color::TRANSPARENT.to_rgba8_premul(), Rgba8Premul::transparent());
}
