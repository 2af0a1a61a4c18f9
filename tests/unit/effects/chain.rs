use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::foundation::core::Rgba8Premul;
use crate::lifecycle::attach::AttachState;

#[derive(Default)]
struct Log(Rc<RefCell<Vec<String>>>);

struct Mark {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl Effect for Mark {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&mut self, target: &mut Surface, frame: &mut EffectFrame<'_>) -> LaminaResult<()> {
        self.log
            .borrow_mut()
            .push(format!("{}@{}", self.name, frame.time));
        let px = target.pixel(0, 0).unwrap_or_default();
        target.set_pixel(0, 0, Rgba8Premul { a: px.a.saturating_add(1), ..px });
        Ok(())
    }

    fn on_attach(&mut self, _parent: EffectParent) -> LaminaResult<()> {
        self.log.borrow_mut().push(format!("attach:{}", self.name));
        Ok(())
    }

    fn on_detach(&mut self, _parent: EffectParent) -> LaminaResult<()> {
        self.log.borrow_mut().push(format!("detach:{}", self.name));
        Ok(())
    }
}

impl Log {
    fn mark(&self, name: &'static str) -> EffectSlot {
        EffectSlot::new(Mark {
            name,
            log: Rc::clone(&self.0),
        })
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

fn owner() -> EffectParent {
    EffectParent::Layer(LayerId::next())
}

#[test]
fn push_attaches_and_apply_runs_in_order() {
    let log = Log::default();
    let mut chain = EffectChain::new(owner());
    let a = chain.push(log.mark("a")).unwrap();
    chain.push(log.mark("b")).unwrap();
    assert_eq!(log.take(), ["attach:a", "attach:b"]);
    assert_eq!(chain.get(a).unwrap().parent(), Some(chain.owner()));

    let mut cache = ValueCache::new();
    let mut s = Surface::new(1, 1);
    chain.apply(&mut s, 1.5, &mut cache).unwrap();
    assert_eq!(log.take(), ["a@1.5", "b@1.5"]);
    assert_eq!(s.pixel(0, 0).unwrap().a, 2);
}

#[test]
fn insert_places_effect_and_rejects_out_of_range() {
    let log = Log::default();
    let mut chain = EffectChain::new(owner());
    chain.push(log.mark("a")).unwrap();
    chain.insert(0, log.mark("first")).unwrap();
    let names: Vec<_> = chain.iter().map(EffectSlot::name).collect();
    assert_eq!(names, ["first", "a"]);

    let err = chain.insert(5, log.mark("x")).unwrap_err();
    assert!(err.is_invalid_state());
}

#[test]
fn delete_leaves_a_hole_that_apply_skips() {
    let log = Log::default();
    let mut chain = EffectChain::new(owner());
    let a = chain.push(log.mark("a")).unwrap();
    chain.push(log.mark("b")).unwrap();
    log.take();

    let slot = chain.delete(a).unwrap();
    assert_eq!(slot.attachment().state(), AttachState::Detached);
    assert_eq!(slot.attachment().parent(), Some(chain.owner()));
    assert_eq!(log.take(), ["detach:a"]);
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.slot_count(), 2);

    let mut cache = ValueCache::new();
    let mut s = Surface::new(1, 1);
    chain.apply(&mut s, 0.0, &mut cache).unwrap();
    assert_eq!(log.take(), ["b@0"]);

    chain.compact();
    assert_eq!(chain.slot_count(), 1);
}

#[test]
fn remove_compacts_and_unknown_ids_fail() {
    let log = Log::default();
    let mut chain = EffectChain::new(owner());
    let a = chain.push(log.mark("a")).unwrap();
    let b = chain.push(log.mark("b")).unwrap();
    chain.remove(a).unwrap();
    assert_eq!(chain.slot_count(), 1);
    assert_eq!(chain.position(b), Some(0));
    assert!(chain.remove(a).unwrap_err().is_invalid_state());
    assert!(chain.delete(a).unwrap_err().is_invalid_state());
}

#[test]
fn disabled_effects_are_skipped_and_find_uses_names() {
    let log = Log::default();
    let mut chain = EffectChain::new(owner());
    let slot = EffectSlot::with_options(
        Mark {
            name: "off",
            log: Rc::clone(&log.0),
        },
        EffectOptions { enabled: false },
    );
    chain.push(slot).unwrap();
    log.take();

    let mut cache = ValueCache::new();
    let mut s = Surface::new(1, 1);
    chain.apply(&mut s, 0.0, &mut cache).unwrap();
    assert!(log.take().is_empty());
    assert!(chain.find("off").is_some());
    assert!(chain.find("missing").is_none());
}

#[test]
fn slot_attached_elsewhere_is_rejected() {
    let log = Log::default();
    let mut slot = log.mark("a");
    slot.try_attach(&mut EffectCtx::new(owner())).unwrap();
    let mut chain = EffectChain::new(owner());
    assert!(chain.push(slot).unwrap_err().is_invalid_state());
    assert!(chain.is_empty());
}

#[test]
fn empty_target_skips_effects() {
    let log = Log::default();
    let mut chain = EffectChain::new(owner());
    chain.push(log.mark("a")).unwrap();
    log.take();
    let mut cache = ValueCache::new();
    chain.apply(&mut Surface::new(0, 4), 0.0, &mut cache).unwrap();
    assert!(log.take().is_empty());
}

#[test]
fn options_reject_unknown_fields() {
    assert_eq!(EffectOptions::from_json("{}").unwrap(), EffectOptions::default());
    assert!(!EffectOptions::from_json(r#"{"enabled":false}"#).unwrap().enabled);
    let err = EffectOptions::from_json(r#"{"enabled":true,"speed":2}"#).unwrap_err();
    assert!(matches!(err, LaminaError::Serde(_)));
}
