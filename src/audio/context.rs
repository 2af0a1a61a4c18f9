//! Audio graph contract.
//!
//! The engine only needs to create one source node per audio layer and wire it to the shared
//! destination. Anything richer (gain staging, analysers) belongs to the host graph.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::trace;

use crate::assets::media::SharedMedia;
use crate::foundation::error::{LaminaError, LaminaResult};
use crate::foundation::ids::AudioNodeId;

/// Host audio graph.
pub trait AudioContext {
    /// Sink every layer connects to.
    fn destination(&self) -> AudioNodeId;

    /// Create a source node that reads from `media`.
    fn create_media_source(&mut self, media: SharedMedia) -> LaminaResult<AudioNodeId>;

    /// Connect `from` into `to`. Connecting an existing edge is a no-op.
    fn connect(&mut self, from: AudioNodeId, to: AudioNodeId) -> LaminaResult<()>;

    /// Remove every outgoing edge of `node`.
    fn disconnect(&mut self, node: AudioNodeId) -> LaminaResult<()>;

    /// Return `true` when `from` feeds `to`.
    fn is_connected(&self, from: AudioNodeId, to: AudioNodeId) -> bool;

    /// Graph sample rate.
    fn sample_rate(&self) -> u32;
}

/// Audio graph shared by a movie and its audio layers.
pub type SharedAudioContext = Rc<RefCell<dyn AudioContext>>;

/// Counters exposed by [`OfflineAudioContext`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Source nodes created.
    pub created: u32,
    /// Edges added.
    pub connects: u32,
    /// Disconnect calls that removed at least one edge.
    pub disconnects: u32,
}

/// In-memory graph without a realtime clock, used for offline rendering and tests.
pub struct OfflineAudioContext {
    sample_rate: u32,
    next_node: u32,
    sources: HashMap<AudioNodeId, SharedMedia>,
    edges: HashSet<(AudioNodeId, AudioNodeId)>,
    stats: GraphStats,
}

impl std::fmt::Debug for OfflineAudioContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineAudioContext")
            .field("sample_rate", &self.sample_rate)
            .field("sources", &self.sources.len())
            .field("edges", &self.edges.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl OfflineAudioContext {
    /// Node id of the destination.
    pub const DESTINATION: AudioNodeId = AudioNodeId(0);

    /// Default mix rate.
    pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

    /// Create a graph running at `sample_rate`.
    pub fn new(sample_rate: u32) -> LaminaResult<Self> {
        if sample_rate == 0 {
            return Err(LaminaError::configuration("audio sample_rate must be > 0"));
        }
        Ok(Self {
            sample_rate,
            next_node: 1,
            sources: HashMap::new(),
            edges: HashSet::new(),
            stats: GraphStats::default(),
        })
    }

    /// Wrap into a [`SharedAudioContext`] handle.
    pub fn shared(self) -> SharedAudioContext {
        Rc::new(RefCell::new(self))
    }

    /// Node and edge counters.
    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    /// Media read by a source node.
    pub fn source_media(&self, node: AudioNodeId) -> Option<SharedMedia> {
        self.sources.get(&node).cloned()
    }

    fn known(&self, node: AudioNodeId) -> bool {
        node == Self::DESTINATION || self.sources.contains_key(&node)
    }
}

impl Default for OfflineAudioContext {
    fn default() -> Self {
        Self {
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            next_node: 1,
            sources: HashMap::new(),
            edges: HashSet::new(),
            stats: GraphStats::default(),
        }
    }
}

impl AudioContext for OfflineAudioContext {
    fn destination(&self) -> AudioNodeId {
        Self::DESTINATION
    }

    fn create_media_source(&mut self, media: SharedMedia) -> LaminaResult<AudioNodeId> {
        let id = AudioNodeId(self.next_node);
        self.next_node = self
            .next_node
            .checked_add(1)
            .ok_or_else(|| LaminaError::resource("audio node ids exhausted"))?;
        self.sources.insert(id, media);
        self.stats.created += 1;
        trace!(node = %id, "created media source");
        Ok(id)
    }

    fn connect(&mut self, from: AudioNodeId, to: AudioNodeId) -> LaminaResult<()> {
        for node in [from, to] {
            if !self.known(node) {
                return Err(LaminaError::resource(format!("unknown audio node {node}")));
            }
        }
        if self.edges.insert((from, to)) {
            self.stats.connects += 1;
        }
        Ok(())
    }

    fn disconnect(&mut self, node: AudioNodeId) -> LaminaResult<()> {
        if !self.known(node) {
            return Err(LaminaError::resource(format!("unknown audio node {node}")));
        }
        let before = self.edges.len();
        self.edges.retain(|(from, _)| *from != node);
        if self.edges.len() != before {
            self.stats.disconnects += 1;
        }
        Ok(())
    }

    fn is_connected(&self, from: AudioNodeId, to: AudioNodeId) -> bool {
        self.edges.contains(&(from, to))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/context.rs"]
mod tests;
