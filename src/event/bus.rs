//! Hierarchical publish/subscribe.
//!
//! Topics are dot-delimited paths (`"movie.change.layer.add"`). A handler registered on a topic
//! fires for publishes on that topic and on every descendant topic. Handlers are scoped to a
//! target object: publishing for one target never reaches handlers registered for another.
//!
//! Publish walks the topic path from the most specific topic to the most general one; inside one
//! topic, handlers fire in registration order.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::foundation::error::{LaminaError, LaminaResult};
use crate::foundation::ids::{ObjectId, SubscriptionId};

/// Event delivered to a handler.
#[derive(Debug)]
pub struct Event<'a, P> {
    /// Object the event was published for.
    pub target: ObjectId,
    /// Topic passed to `publish` (the most specific one).
    pub topic: &'a str,
    /// Payload passed to `publish`.
    pub payload: &'a P,
}

type Handler<P> = Box<dyn FnMut(&Event<'_, P>)>;

struct Subscriber<P> {
    id: SubscriptionId,
    handler: Handler<P>,
}

/// Per-owner event registry. See the module docs for delivery rules.
pub struct EventBus<P> {
    next_id: u64,
    by_target: HashMap<ObjectId, HashMap<String, Vec<Subscriber<P>>>>,
    index: HashMap<SubscriptionId, (ObjectId, String)>,
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("targets", &self.by_target.len())
            .field("subscriptions", &self.index.len())
            .finish()
    }
}

impl<P> EventBus<P> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            by_target: HashMap::new(),
            index: HashMap::new(),
        }
    }

    /// Register `handler` for `target` on `topic`.
    pub fn subscribe<F>(
        &mut self,
        target: impl Into<ObjectId>,
        topic: &str,
        handler: F,
    ) -> LaminaResult<SubscriptionId>
    where
        F: FnMut(&Event<'_, P>) + 'static,
    {
        validate_topic(topic)?;
        let target = target.into();
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        self.by_target
            .entry(target)
            .or_default()
            .entry(topic.to_owned())
            .or_default()
            .push(Subscriber {
                id,
                handler: Box::new(handler),
            });
        self.index.insert(id, (target, topic.to_owned()));
        trace!(%target, topic, sub = id.0, "subscribed");
        Ok(id)
    }

    /// Remove one subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some((target, topic)) = self.index.remove(&id) else {
            return false;
        };
        if let Some(topics) = self.by_target.get_mut(&target) {
            let drained = match topics.get_mut(&topic) {
                Some(subs) => {
                    subs.retain(|s| s.id != id);
                    subs.is_empty()
                }
                None => false,
            };
            if drained {
                topics.remove(&topic);
            }
            if topics.is_empty() {
                self.by_target.remove(&target);
            }
        }
        true
    }

    /// Remove every subscription registered for `target`. Returns how many were removed.
    pub fn unsubscribe_target(&mut self, target: impl Into<ObjectId>) -> usize {
        let target = target.into();
        let Some(topics) = self.by_target.remove(&target) else {
            return 0;
        };
        let mut removed = 0;
        for sub in topics.values().flatten() {
            self.index.remove(&sub.id);
            removed += 1;
        }
        removed
    }

    /// Deliver `payload` to every handler of `target` on `topic` and its ancestors.
    ///
    /// Returns the number of handlers invoked. Publishing with no subscribers is a no-op.
    pub fn publish(&mut self, target: impl Into<ObjectId>, topic: &str, payload: &P) -> usize {
        let target = target.into();
        let Some(topics) = self.by_target.get_mut(&target) else {
            return 0;
        };

        let event = Event {
            target,
            topic,
            payload,
        };
        let mut notified = 0;
        for path in topic_path(topic) {
            let Some(subs) = topics.get_mut(path) else {
                continue;
            };
            for sub in subs.iter_mut() {
                (sub.handler)(&event);
                notified += 1;
            }
        }
        trace!(%target, topic, notified, "published");
        notified
    }

    /// Return `true` if publishing `topic` for `target` would invoke at least one handler.
    pub fn has_subscribers(&self, target: impl Into<ObjectId>, topic: &str) -> bool {
        let Some(topics) = self.by_target.get(&target.into()) else {
            return false;
        };
        topic_path(topic).any(|p| topics.get(p).is_some_and(|s| !s.is_empty()))
    }

    /// Total number of live subscriptions.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Return `true` when no subscription is registered.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Iterate `topic` and its ancestors, most specific first: `"a.b.c"`, `"a.b"`, `"a"`.
pub fn topic_path(topic: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(topic), |t| t.rfind('.').map(|i| &t[..i]))
}

fn validate_topic(topic: &str) -> LaminaResult<()> {
    if topic.is_empty() {
        return Err(LaminaError::configuration("event topic must be non-empty"));
    }
    if topic.split('.').any(str::is_empty) {
        return Err(LaminaError::configuration(format!(
            "event topic '{topic}' has an empty segment"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/event/bus.rs"]
mod tests;
