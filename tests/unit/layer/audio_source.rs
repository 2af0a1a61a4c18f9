use std::cell::RefCell;
use std::rc::Rc;

use crate::assets::media::{DecodedMedia, MediaElement, SharedMedia};
use crate::audio::context::{AudioContext, OfflineAudioContext, SharedAudioContext};
use crate::event::bus::EventBus;
use crate::event::topics::{self, MovieEvent};
use crate::foundation::ids::{AudioNodeId, MovieId};
use crate::layer::base::Layer;
use crate::layer::options::AudioOptions;
use crate::lifecycle::attach::Attachable;
use crate::movie::context::MovieCtx;

struct Harness {
    movie: MovieId,
    bus: EventBus<MovieEvent>,
    audio: SharedAudioContext,
    offline: Rc<RefCell<OfflineAudioContext>>,
}

impl Harness {
    fn new() -> Self {
        let offline = Rc::new(RefCell::new(OfflineAudioContext::default()));
        let audio: SharedAudioContext = offline.clone();
        Self {
            movie: MovieId::next(),
            bus: EventBus::new(),
            audio,
            offline,
        }
    }

    fn ctx(&mut self) -> MovieCtx<'_> {
        MovieCtx::new(self.movie, 0.0, false, &mut self.bus, &self.audio)
    }

    fn publish(&mut self, topic: &str, ev: MovieEvent) {
        self.bus.publish(self.movie, topic, &ev);
    }
}

fn audio_layer(opts: AudioOptions, media_len: f64) -> (Layer, Rc<RefCell<DecodedMedia>>) {
    let media = Rc::new(RefCell::new(DecodedMedia::silent(media_len).unwrap()));
    let layer = Layer::audio(opts, media.clone()).unwrap();
    (layer, media)
}

#[test]
fn seek_applies_rate_and_source_offset() {
    let mut h = Harness::new();
    let (mut layer, media) = audio_layer(
        AudioOptions {
            start_time: 2.0,
            source_start_time: 1.0,
            playback_rate: 1.5,
            ..AudioOptions::default()
        },
        20.0,
    );
    layer.try_attach(&mut h.ctx()).unwrap();

    h.publish(topics::MOVIE_SEEK, MovieEvent::Seek { time: 5.0 });
    let expected = (5.0 - 2.0) * 1.5 + 1.0;
    let audio = layer.as_audio().unwrap();
    assert!((audio.current_time() - expected).abs() < 1e-12);
    assert!((media.borrow().current_time() - expected).abs() < 1e-12);

    // before the layer starts the media sits at the source start
    h.publish(topics::MOVIE_SEEK, MovieEvent::Seek { time: 0.5 });
    assert_eq!(layer.as_audio().unwrap().current_time(), 1.0);
}

#[test]
fn playback_rate_two_halves_duration() {
    let (mut layer, _media) = audio_layer(
        AudioOptions {
            source_start_time: 2.0,
            ..AudioOptions::default()
        },
        10.0,
    );
    assert_eq!(layer.duration(), 8.0);
    layer.as_audio_mut().unwrap().set_playback_rate(2.0).unwrap();
    assert_eq!(layer.duration(), 4.0);
    assert!(layer
        .as_audio_mut()
        .unwrap()
        .set_playback_rate(0.0)
        .unwrap_err()
        .is_configuration());

    layer.set_duration(Some(6.0)).unwrap();
    assert_eq!(layer.as_audio().unwrap().raw_duration(), 6.0);
    assert_eq!(layer.duration(), 3.0);
}

#[test]
fn detach_disconnects_and_reattach_reuses_node() {
    let mut h = Harness::new();
    let (mut layer, _media) = audio_layer(AudioOptions::default(), 3.0);
    let dest = h.offline.borrow().destination();

    layer.try_attach(&mut h.ctx()).unwrap();
    layer.try_attach(&mut h.ctx()).unwrap();
    let node = layer.as_audio().unwrap().node().unwrap();
    assert!(h.offline.borrow().is_connected(node, dest));
    assert_eq!(h.offline.borrow().stats().connects, 1);
    assert_eq!(h.bus.len(), 3);

    layer.try_detach(&mut h.ctx()).unwrap();
    assert!(!h.offline.borrow().is_connected(node, dest));
    assert!(!layer.as_audio().unwrap().is_connected());
    assert!(h.bus.is_empty());

    layer.try_attach(&mut h.ctx()).unwrap();
    assert_eq!(layer.as_audio().unwrap().node(), Some(node));
    assert!(h.offline.borrow().is_connected(node, dest));
    assert_eq!(h.offline.borrow().stats().created, 1);
}

fn reads_media(h: &Harness, node: AudioNodeId, media: &Rc<RefCell<DecodedMedia>>) -> bool {
    let ours: SharedMedia = media.clone();
    h.offline
        .borrow()
        .source_media(node)
        .is_some_and(|m| Rc::ptr_eq(&m, &ours))
}

#[test]
fn moving_to_an_empty_graph_creates_a_node_there() {
    let mut a = Harness::new();
    let mut b = Harness::new();
    let (mut layer, media) = audio_layer(AudioOptions::default(), 3.0);

    layer.try_attach(&mut a.ctx()).unwrap();
    let old = layer.as_audio().unwrap().node().unwrap();
    layer.try_detach(&mut a.ctx()).unwrap();

    layer.try_attach(&mut b.ctx()).unwrap();
    let node = layer.as_audio().unwrap().node().unwrap();
    let dest = b.offline.borrow().destination();
    assert!(b.offline.borrow().is_connected(node, dest));
    assert!(reads_media(&b, node, &media));
    assert_eq!(b.offline.borrow().stats().created, 1);
    assert!(!a.offline.borrow().is_connected(old, dest));
}

#[test]
fn moving_to_a_busy_graph_does_not_borrow_another_node() {
    let mut a = Harness::new();
    let mut b = Harness::new();
    let (mut resident, resident_media) = audio_layer(AudioOptions::default(), 3.0);
    resident.try_attach(&mut b.ctx()).unwrap();
    let resident_node = resident.as_audio().unwrap().node().unwrap();

    let (mut moved, moved_media) = audio_layer(AudioOptions::default(), 3.0);
    moved.try_attach(&mut a.ctx()).unwrap();
    assert_eq!(moved.as_audio().unwrap().node(), Some(resident_node));
    moved.try_detach(&mut a.ctx()).unwrap();

    moved.try_attach(&mut b.ctx()).unwrap();
    let node = moved.as_audio().unwrap().node().unwrap();
    assert_ne!(node, resident_node);
    assert!(reads_media(&b, node, &moved_media));
    assert!(reads_media(&b, resident_node, &resident_media));
    assert_eq!(b.offline.borrow().stats().created, 2);

    // coming back to the first graph creates a fresh node there too
    moved.try_detach(&mut b.ctx()).unwrap();
    moved.try_attach(&mut a.ctx()).unwrap();
    assert!(reads_media(&a, moved.as_audio().unwrap().node().unwrap(), &moved_media));
}

#[test]
fn play_and_pause_drive_media_inside_window() {
    let mut h = Harness::new();
    let (mut layer, media) = audio_layer(
        AudioOptions {
            start_time: 1.0,
            ..AudioOptions::default()
        },
        2.0,
    );
    layer.try_attach(&mut h.ctx()).unwrap();

    h.publish(topics::MOVIE_PLAY, MovieEvent::Play { time: 0.0 });
    assert!(media.borrow().is_paused());

    h.publish(topics::MOVIE_PLAY, MovieEvent::Play { time: 1.5 });
    assert!(!media.borrow().is_paused());
    assert_eq!(media.borrow().current_time(), 0.5);

    h.publish(topics::MOVIE_PAUSE, MovieEvent::Pause { time: 1.6 });
    assert!(media.borrow().is_paused());
}

#[test]
fn per_frame_sync_follows_the_window() {
    let mut h = Harness::new();
    let (mut layer, media) = audio_layer(
        AudioOptions {
            start_time: 1.0,
            ..AudioOptions::default()
        },
        1.0,
    );
    layer.sync_media(1.2, true);
    assert!(media.borrow().is_paused(), "detached layers stay silent");

    layer.try_attach(&mut h.ctx()).unwrap();
    layer.sync_media(0.5, true);
    assert!(media.borrow().is_paused());
    layer.sync_media(1.2, true);
    assert!(!media.borrow().is_paused());
    layer.sync_media(2.5, true);
    assert!(media.borrow().is_paused());
    assert_eq!(media.borrow().play_calls(), 1);
}
