//! Grouping of effects into one chain entry.

use tracing::{trace, warn};

use crate::effects::chain::{Effect, EffectFrame, EffectParent};
use crate::foundation::error::LaminaResult;
use crate::render::surface::Surface;

/// Ordered group of effects applied as one.
///
/// Attach and detach propagate to every member, so grouped effects observe the same lifecycle
/// as top-level ones.
#[derive(Default)]
pub struct Stack {
    effects: Vec<Box<dyn Effect>>,
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.effects.iter().map(|e| e.name()))
            .finish()
    }
}

impl Stack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member (builder style).
    pub fn with(mut self, effect: impl Effect + 'static) -> Self {
        self.effects.push(Box::new(effect));
        self
    }

    /// Members in application order.
    pub fn effects(&self) -> &[Box<dyn Effect>] {
        &self.effects
    }
}

impl Effect for Stack {
    fn name(&self) -> &str {
        "stack"
    }

    fn apply(&mut self, target: &mut Surface, frame: &mut EffectFrame<'_>) -> LaminaResult<()> {
        for effect in &mut self.effects {
            trace!(name = effect.name(), "apply stacked effect");
            effect.apply(target, frame)?;
        }
        Ok(())
    }

    fn on_attach(&mut self, parent: EffectParent) -> LaminaResult<()> {
        for i in 0..self.effects.len() {
            if let Err(e) = self.effects[i].on_attach(parent) {
                // roll back members that already attached
                for done in &mut self.effects[..i] {
                    if let Err(undo) = done.on_detach(parent) {
                        warn!(name = done.name(), error = %undo, "stacked effect rollback failed");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn on_detach(&mut self, parent: EffectParent) -> LaminaResult<()> {
        // every member detaches; the first failure is reported
        let mut first = None;
        for effect in &mut self.effects {
            if let Err(e) = effect.on_detach(parent) {
                warn!(name = effect.name(), error = %e, "stacked effect detach failed");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }
}
