//! Effects, effect slots and ordered effect chains.
//!
//! An [`Effect`] is anything that can rewrite a surface for a given time. The engine wraps each
//! effect in an [`EffectSlot`] that carries its id, an `enabled` flag and an attachment record,
//! then keeps slots in an [`EffectChain`] owned by a layer or by the movie.
//!
//! Chains support two removal styles: [`EffectChain::remove`] compacts the list while
//! [`EffectChain::delete`] leaves a hole that rendering skips until [`EffectChain::compact`].

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cache::values::ValueCache;
use crate::foundation::error::{LaminaError, LaminaResult};
use crate::foundation::ids::{EffectId, LayerId, MovieId, ObjectId};
use crate::lifecycle::attach::{AttachContext, Attachable, Attachment};
use crate::render::surface::Surface;

/// Owner of an effect chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectParent {
    /// Chain of a layer.
    Layer(LayerId),
    /// Chain of the movie canvas.
    Movie(MovieId),
}

impl From<EffectParent> for ObjectId {
    fn from(p: EffectParent) -> Self {
        match p {
            EffectParent::Layer(id) => id.object(),
            EffectParent::Movie(id) => id.object(),
        }
    }
}

/// Per-application context handed to [`Effect::apply`].
pub struct EffectFrame<'a> {
    /// Effect being applied.
    pub effect: EffectId,
    /// Chain owner.
    pub parent: EffectParent,
    /// Time in the owner's timeline (layer-local for layer chains).
    pub time: f64,
    /// Movie value cache for memoizing dynamic parameters.
    pub cache: &'a mut ValueCache,
}

/// Surface-rewriting capability.
pub trait Effect {
    /// Short name used by [`EffectChain::find`] and logs.
    fn name(&self) -> &str;

    /// Rewrite `target` for `frame.time`.
    fn apply(&mut self, target: &mut Surface, frame: &mut EffectFrame<'_>) -> LaminaResult<()>;

    /// Called when the slot attaches to `parent`.
    fn on_attach(&mut self, _parent: EffectParent) -> LaminaResult<()> {
        Ok(())
    }

    /// Called when the slot detaches from `parent`.
    fn on_detach(&mut self, _parent: EffectParent) -> LaminaResult<()> {
        Ok(())
    }
}

/// Construction options shared by every effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct EffectOptions {
    /// Whether the effect runs during render.
    pub enabled: bool,
}

impl Default for EffectOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl EffectOptions {
    /// Parse from JSON, rejecting unknown keys.
    pub fn from_json(json: &str) -> LaminaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Attach context naming the chain owner.
#[derive(Clone, Copy, Debug)]
pub struct EffectCtx {
    parent: EffectParent,
}

impl EffectCtx {
    /// Context for attaching to `parent`.
    pub fn new(parent: EffectParent) -> Self {
        Self { parent }
    }
}

impl AttachContext for EffectCtx {
    type Parent = EffectParent;

    fn parent(&self) -> EffectParent {
        self.parent
    }
}

/// An effect plus its identity, `enabled` flag and attachment record.
pub struct EffectSlot {
    id: EffectId,
    enabled: bool,
    attachment: Attachment<EffectParent>,
    effect: Box<dyn Effect>,
}

impl std::fmt::Debug for EffectSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectSlot")
            .field("id", &self.id)
            .field("name", &self.effect.name())
            .field("enabled", &self.enabled)
            .field("attachment", &self.attachment)
            .finish()
    }
}

impl EffectSlot {
    /// Wrap an effect with default options.
    pub fn new(effect: impl Effect + 'static) -> Self {
        Self::with_options(effect, EffectOptions::default())
    }

    /// Wrap an effect with explicit options.
    pub fn with_options(effect: impl Effect + 'static, opts: EffectOptions) -> Self {
        Self::from_boxed(Box::new(effect), opts)
    }

    /// Wrap an already boxed effect.
    pub fn from_boxed(effect: Box<dyn Effect>, opts: EffectOptions) -> Self {
        Self {
            id: EffectId::next(),
            enabled: opts.enabled,
            attachment: Attachment::new(),
            effect,
        }
    }

    /// Stable id of this effect.
    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Name reported by the wrapped effect.
    pub fn name(&self) -> &str {
        self.effect.name()
    }

    /// Whether the effect runs during render.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the effect.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Current parent, if attached.
    pub fn parent(&self) -> Option<EffectParent> {
        self.attachment.attached_parent()
    }

    /// Wrapped effect.
    pub fn effect(&self) -> &dyn Effect {
        self.effect.as_ref()
    }

    /// Wrapped effect, mutably.
    pub fn effect_mut(&mut self) -> &mut dyn Effect {
        self.effect.as_mut()
    }
}

impl Attachable for EffectSlot {
    type Parent = EffectParent;
    type Context<'a> = EffectCtx;

    fn attachment(&self) -> &Attachment<EffectParent> {
        &self.attachment
    }

    fn attachment_mut(&mut self) -> &mut Attachment<EffectParent> {
        &mut self.attachment
    }

    fn attach(&mut self, ctx: &mut EffectCtx) -> LaminaResult<()> {
        debug!(effect = %self.id, parent = ?ctx.parent, "effect attach");
        self.effect.on_attach(ctx.parent)
    }

    fn detach(&mut self, ctx: &mut EffectCtx) -> LaminaResult<()> {
        debug!(effect = %self.id, parent = ?ctx.parent, "effect detach");
        self.effect.on_detach(ctx.parent)
    }
}

/// Ordered, possibly sparse list of effect slots bound to one owner.
#[derive(Debug)]
pub struct EffectChain {
    owner: EffectParent,
    slots: Vec<Option<EffectSlot>>,
}

impl EffectChain {
    /// Empty chain owned by `owner`.
    pub fn new(owner: EffectParent) -> Self {
        Self {
            owner,
            slots: Vec::new(),
        }
    }

    /// Owner every slot attaches to.
    pub fn owner(&self) -> EffectParent {
        self.owner
    }

    /// Attach `slot` and append it.
    pub fn push(&mut self, slot: EffectSlot) -> LaminaResult<EffectId> {
        let index = self.slots.len();
        self.insert(index, slot)
    }

    /// Attach `slot` and insert it at `index` (slot position, holes included).
    pub fn insert(&mut self, index: usize, mut slot: EffectSlot) -> LaminaResult<EffectId> {
        if index > self.slots.len() {
            return Err(LaminaError::invalid_state(format!(
                "effect index {index} out of range (len {})",
                self.slots.len()
            )));
        }
        slot.try_attach(&mut EffectCtx::new(self.owner))?;
        let id = slot.id;
        self.slots.insert(index, Some(slot));
        Ok(id)
    }

    /// Detach and remove the effect, shifting later effects down.
    pub fn remove(&mut self, id: EffectId) -> LaminaResult<EffectSlot> {
        let index = self.require_position(id)?;
        self.detach_at(index)?;
        self.slots
            .remove(index)
            .ok_or_else(|| LaminaError::invalid_state(format!("effect {id} slot is empty")))
    }

    /// Detach the effect and leave an empty slot in its place.
    pub fn delete(&mut self, id: EffectId) -> LaminaResult<EffectSlot> {
        let index = self.require_position(id)?;
        self.detach_at(index)?;
        self.slots[index]
            .take()
            .ok_or_else(|| LaminaError::invalid_state(format!("effect {id} slot is empty")))
    }

    /// Drop empty slots left by [`EffectChain::delete`].
    pub fn compact(&mut self) {
        self.slots.retain(Option::is_some);
    }

    /// Slot position of an effect, holes included.
    pub fn position(&self, id: EffectId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.id == id))
    }

    /// Effect by id.
    pub fn get(&self, id: EffectId) -> Option<&EffectSlot> {
        self.iter().find(|s| s.id == id)
    }

    /// Effect by id, mutably.
    pub fn get_mut(&mut self, id: EffectId) -> Option<&mut EffectSlot> {
        self.slots.iter_mut().flatten().find(|s| s.id == id)
    }

    /// First effect with the given name.
    pub fn find(&self, name: &str) -> Option<&EffectSlot> {
        self.iter().find(|s| s.name() == name)
    }

    /// Present effects in order, holes skipped.
    pub fn iter(&self) -> impl Iterator<Item = &EffectSlot> {
        self.slots.iter().flatten()
    }

    /// Number of present effects.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Return `true` when no effect is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots, holes included.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Run every enabled effect in order on `target`.
    pub fn apply(
        &mut self,
        target: &mut Surface,
        time: f64,
        cache: &mut ValueCache,
    ) -> LaminaResult<()> {
        if target.is_empty() {
            return Ok(());
        }
        let owner = self.owner;
        for slot in self.slots.iter_mut() {
            let Some(slot) = slot else {
                trace!(?owner, "skipping deleted effect slot");
                continue;
            };
            if !slot.enabled {
                continue;
            }
            trace!(effect = %slot.id, name = slot.name(), time, "apply effect");
            let mut frame = EffectFrame {
                effect: slot.id,
                parent: owner,
                time,
                cache: &mut *cache,
            };
            slot.effect.apply(target, &mut frame)?;
        }
        Ok(())
    }

    fn require_position(&self, id: EffectId) -> LaminaResult<usize> {
        self.position(id).ok_or_else(|| {
            LaminaError::invalid_state(format!(
                "effect {id} is not in the chain of {:?}",
                self.owner
            ))
        })
    }

    fn detach_at(&mut self, index: usize) -> LaminaResult<()> {
        let owner = self.owner;
        match self.slots.get_mut(index) {
            Some(Some(slot)) => slot.try_detach(&mut EffectCtx::new(owner)),
            _ => Err(LaminaError::invalid_state(format!(
                "no effect at slot {index}"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/chain.rs"]
mod tests;
