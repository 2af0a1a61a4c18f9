//! Attach/detach state machine shared by layers and effects.
//!
//! A child is constructed on its own and later bound to a parent through
//! [`Attachable::try_attach`]. The side-effect hooks run only on real state transitions, so
//! repeated attaches to the same parent are free, and a detach always leaves the last parent on
//! record for inspection.

use std::fmt;

use tracing::trace;

use crate::foundation::error::{LaminaError, LaminaResult};

/// Binding state of an attachable object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachState {
    /// Not bound to any parent.
    Detached,
    /// Bound to the parent recorded in [`Attachment::parent`].
    Attached,
}

/// Attachment record embedded in every attachable object.
#[derive(Clone, Debug)]
pub struct Attachment<P> {
    state: AttachState,
    parent: Option<P>,
    attach_count: u32,
}

impl<P> Default for Attachment<P> {
    fn default() -> Self {
        Self {
            state: AttachState::Detached,
            parent: None,
            attach_count: 0,
        }
    }
}

impl<P: Copy + Eq + fmt::Debug> Attachment<P> {
    /// Fresh, never-attached record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> AttachState {
        self.state
    }

    /// Return `true` while attached.
    pub fn is_attached(&self) -> bool {
        self.state == AttachState::Attached
    }

    /// Last parent this object was attached to, kept after detach.
    pub fn parent(&self) -> Option<P> {
        self.parent
    }

    /// Parent while attached, `None` otherwise.
    pub fn attached_parent(&self) -> Option<P> {
        match self.state {
            AttachState::Attached => self.parent,
            AttachState::Detached => None,
        }
    }

    /// Number of real Detached -> Attached transitions so far.
    pub fn attach_count(&self) -> u32 {
        self.attach_count
    }

    /// Decide whether attaching to `parent` must run side effects.
    fn admit_attach(&self, parent: P) -> LaminaResult<bool> {
        match (self.state, self.parent) {
            (AttachState::Detached, _) => Ok(true),
            (AttachState::Attached, Some(current)) if current == parent => Ok(false),
            (AttachState::Attached, current) => Err(LaminaError::invalid_state(format!(
                "already attached to {current:?}, detach before attaching to {parent:?}"
            ))),
        }
    }

    fn admit_detach(&self, parent: P) -> LaminaResult<()> {
        match (self.state, self.parent) {
            (AttachState::Detached, _) => {
                Err(LaminaError::invalid_state("no parent to detach from"))
            }
            (AttachState::Attached, Some(current)) if current == parent => Ok(()),
            (AttachState::Attached, current) => Err(LaminaError::invalid_state(format!(
                "attached to {current:?}, not {parent:?}"
            ))),
        }
    }

    fn mark_attached(&mut self, parent: P) {
        self.state = AttachState::Attached;
        self.parent = Some(parent);
        self.attach_count = self.attach_count.saturating_add(1);
    }

    fn mark_detached(&mut self) {
        self.state = AttachState::Detached;
    }
}

/// Context handed to attach/detach hooks. It names the parent being bound.
pub trait AttachContext {
    /// Parent handle type.
    type Parent: Copy + Eq + fmt::Debug;

    /// Parent this context belongs to.
    fn parent(&self) -> Self::Parent;
}

/// Generic attach/detach contract.
///
/// Implementors supply the side effects ([`Attachable::attach`], [`Attachable::detach`]); the
/// provided `try_*` methods drive the state machine around them.
pub trait Attachable {
    /// Parent handle type.
    type Parent: Copy + Eq + fmt::Debug;
    /// Resources reachable while attaching (event bus, audio graph, ...).
    type Context<'a>: AttachContext<Parent = Self::Parent>;

    /// Attachment record.
    fn attachment(&self) -> &Attachment<Self::Parent>;

    /// Mutable attachment record.
    fn attachment_mut(&mut self) -> &mut Attachment<Self::Parent>;

    /// Side effects of a Detached -> Attached transition.
    fn attach(&mut self, ctx: &mut Self::Context<'_>) -> LaminaResult<()>;

    /// Side effects of an Attached -> Detached transition.
    fn detach(&mut self, ctx: &mut Self::Context<'_>) -> LaminaResult<()>;

    /// Attach to the context's parent. No-op if already attached to it.
    fn try_attach(&mut self, ctx: &mut Self::Context<'_>) -> LaminaResult<()> {
        let parent = ctx.parent();
        if !self.attachment().admit_attach(parent)? {
            trace!(?parent, "already attached, skipping attach side effects");
            return Ok(());
        }
        self.attach(ctx)?;
        self.attachment_mut().mark_attached(parent);
        Ok(())
    }

    /// Detach from the context's parent. Fails with `InvalidState` when not attached to it.
    fn try_detach(&mut self, ctx: &mut Self::Context<'_>) -> LaminaResult<()> {
        let parent = ctx.parent();
        self.attachment().admit_detach(parent)?;
        self.detach(ctx)?;
        self.attachment_mut().mark_detached();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/attach.rs"]
mod tests;
