use super::*;
use crate::cache::values::ValueCache;
use crate::effects::chain::EffectParent;
use crate::foundation::ids::{EffectId, MovieId};

fn run(effect: &mut dyn Effect, s: &mut Surface, time: f64) {
    let mut cache = ValueCache::new();
    let mut frame = EffectFrame {
        effect: EffectId::next(),
        parent: EffectParent::Movie(MovieId::next()),
        time,
        cache: &mut cache,
    };
    effect.apply(s, &mut frame).unwrap();
}

fn solid(px: [u8; 4]) -> Surface {
    let mut s = Surface::new(2, 1);
    for x in 0..2 {
        s.set_pixel(x, 0, Rgba8Premul::from_array(px));
    }
    s
}

#[test]
fn brightness_shifts_channels_and_skips_transparent() {
    let mut s = solid([100, 100, 100, 255]);
    s.set_pixel(1, 0, Rgba8Premul::transparent());
    run(&mut Brightness::new(0.2), &mut s, 0.0);
    assert_eq!(s.pixel(0, 0).unwrap().to_array(), [151, 151, 151, 255]);
    assert_eq!(s.pixel(1, 0).unwrap(), Rgba8Premul::transparent());
}

#[test]
fn contrast_zero_flattens_to_grey() {
    let mut s = solid([255, 0, 30, 255]);
    run(&mut Contrast::new(0.0), &mut s, 0.0);
    let px = s.pixel(0, 0).unwrap();
    assert_eq!([px.r, px.g, px.b], [128, 128, 128]);
}

#[test]
fn channels_scale_independently() {
    let mut s = solid([200, 200, 200, 255]);
    run(&mut Channels::rgb(1.0, 0.5, 0.0), &mut s, 0.0);
    assert_eq!(s.pixel(0, 0).unwrap().to_array(), [200, 100, 0, 255]);
}

#[test]
fn grayscale_equalizes_channels() {
    let mut s = solid([255, 0, 0, 255]);
    run(&mut Grayscale::default(), &mut s, 0.0);
    let px = s.pixel(0, 0).unwrap();
    assert_eq!(px.r, px.g);
    assert_eq!(px.g, px.b);
    assert_eq!(px.r, 76);
}

#[test]
fn dynamic_amount_follows_time() {
    let mut fx = Brightness::new(Dynamic::func(|t| if t < 1.0 { 0.0 } else { 1.0 }));
    let mut s = solid([10, 10, 10, 255]);
    run(&mut fx, &mut s, 0.5);
    assert_eq!(s.pixel(0, 0).unwrap().r, 10);
    run(&mut fx, &mut s, 2.0);
    assert_eq!(s.pixel(0, 0).unwrap().r, 255);
}
