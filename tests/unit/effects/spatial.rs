use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::cache::values::ValueCache;
use crate::effects::chain::EffectParent;
use crate::effects::stack::Stack;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::ids::{EffectId, LayerId};

fn run(effect: &mut dyn Effect, s: &mut Surface) -> LaminaResult<()> {
    let mut cache = ValueCache::new();
    let mut frame = EffectFrame {
        effect: EffectId::next(),
        parent: EffectParent::Layer(LayerId::next()),
        time: 0.0,
        cache: &mut cache,
    };
    effect.apply(s, &mut frame)
}

fn gradient(w: u32, h: u32) -> Surface {
    let mut s = Surface::new(w, h);
    for y in 0..h {
        for x in 0..w {
            s.set_pixel(x, y, Rgba8Premul::from_array([(x * 10) as u8, (y * 10) as u8, 0, 255]));
        }
    }
    s
}

#[test]
fn pixelate_copies_block_origin() {
    let mut s = gradient(4, 4);
    run(&mut Pixelate::new(2.0), &mut s).unwrap();
    assert_eq!(s.pixel(1, 1), s.pixel(0, 0));
    assert_eq!(s.pixel(3, 2).unwrap().to_array(), [20, 20, 0, 255]);
}

#[test]
fn pixelate_below_two_is_noop() {
    let mut s = gradient(3, 3);
    let before = s.clone();
    run(&mut Pixelate::new(1.0), &mut s).unwrap();
    assert_eq!(s, before);
}

#[test]
fn blur_rejects_negative_radius_and_zero_is_noop() {
    let mut s = gradient(3, 3);
    let before = s.clone();
    run(&mut GaussianBlur::new(0.0), &mut s).unwrap();
    assert_eq!(s, before);
    assert!(matches!(
        run(&mut GaussianBlur::new(-1.0), &mut s),
        Err(LaminaError::Render(_))
    ));
}

#[test]
fn blur_softens_an_edge() {
    let mut s = Surface::new(4, 1);
    s.set_pixel(0, 0, Rgba8Premul::from_array([255, 255, 255, 255]));
    run(&mut GaussianBlur::new(2.0), &mut s).unwrap();
    assert!(s.pixel(0, 0).unwrap().a < 255);
    assert!(s.pixel(1, 0).unwrap().a > 0);
}

#[test]
fn transform_translates_contents() {
    let mut s = gradient(4, 1);
    run(&mut Transform::new(Affine::translate((1.0, 0.0))), &mut s).unwrap();
    assert_eq!(s.pixel(0, 0), Some(Rgba8Premul::transparent()));
    assert_eq!(s.pixel(1, 0).unwrap().r, 0);
    assert_eq!(s.pixel(3, 0).unwrap().r, 20);
}

#[test]
fn degenerate_transform_clears() {
    let mut s = gradient(2, 2);
    run(&mut Transform::new(Affine::scale(0.0)), &mut s).unwrap();
    assert!(s.data().iter().all(|b| *b == 0));
}

struct Counter(Rc<Cell<i32>>);

impl Effect for Counter {
    fn name(&self) -> &str {
        "counter"
    }

    fn apply(&mut self, _target: &mut Surface, _frame: &mut EffectFrame<'_>) -> LaminaResult<()> {
        Ok(())
    }

    fn on_attach(&mut self, _parent: EffectParent) -> LaminaResult<()> {
        self.0.set(self.0.get() + 1);
        Ok(())
    }

    fn on_detach(&mut self, _parent: EffectParent) -> LaminaResult<()> {
        self.0.set(self.0.get() - 1);
        Ok(())
    }
}

#[test]
fn stack_applies_members_and_propagates_attach() {
    let attached = Rc::new(Cell::new(0));
    let mut stack = Stack::new()
        .with(Counter(Rc::clone(&attached)))
        .with(Pixelate::new(2.0))
        .with(Counter(Rc::clone(&attached)));
    assert_eq!(stack.effects().len(), 3);

    let parent = EffectParent::Layer(LayerId::next());
    stack.on_attach(parent).unwrap();
    assert_eq!(attached.get(), 2);

    let mut s = gradient(2, 2);
    run(&mut stack, &mut s).unwrap();
    assert_eq!(s.pixel(1, 1), s.pixel(0, 0));

    stack.on_detach(parent).unwrap();
    assert_eq!(attached.get(), 0);
}

struct StuckOnDetach;

impl Effect for StuckOnDetach {
    fn name(&self) -> &str {
        "stuck"
    }

    fn apply(&mut self, _target: &mut Surface, _frame: &mut EffectFrame<'_>) -> LaminaResult<()> {
        Ok(())
    }

    fn on_detach(&mut self, _parent: EffectParent) -> LaminaResult<()> {
        Err(crate::foundation::error::LaminaError::resource("still busy"))
    }
}

#[test]
fn stack_detaches_every_member_and_reports_first_failure() {
    let attached = Rc::new(Cell::new(0));
    let mut stack = Stack::new()
        .with(Counter(Rc::clone(&attached)))
        .with(StuckOnDetach)
        .with(Counter(Rc::clone(&attached)));

    let parent = EffectParent::Movie(crate::foundation::ids::MovieId::next());
    stack.on_attach(parent).unwrap();
    assert_eq!(attached.get(), 2);

    let err = stack.on_detach(parent).unwrap_err();
    assert!(matches!(err, crate::foundation::error::LaminaError::Resource(_)));
    assert_eq!(attached.get(), 0, "members after the failing one still detach");
}
