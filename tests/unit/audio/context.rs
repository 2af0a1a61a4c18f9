use super::*;
use crate::assets::media::DecodedMedia;

fn media() -> SharedMedia {
    DecodedMedia::silent(1.0).unwrap().shared()
}

#[test]
fn connect_is_idempotent_and_disconnect_removes_edges() {
    let mut ctx = OfflineAudioContext::default();
    let node = ctx.create_media_source(media()).unwrap();
    let dest = ctx.destination();

    ctx.connect(node, dest).unwrap();
    ctx.connect(node, dest).unwrap();
    assert!(ctx.is_connected(node, dest));
    assert_eq!(ctx.stats().connects, 1);

    ctx.disconnect(node).unwrap();
    assert!(!ctx.is_connected(node, dest));
    assert_eq!(ctx.stats().disconnects, 1);

    ctx.disconnect(node).unwrap();
    assert_eq!(ctx.stats().disconnects, 1);
}

#[test]
fn unknown_nodes_are_resource_errors() {
    let mut ctx = OfflineAudioContext::default();
    let err = ctx.connect(AudioNodeId(42), ctx.destination()).unwrap_err();
    assert!(matches!(err, LaminaError::Resource(_)));
    assert!(ctx.disconnect(AudioNodeId(7)).is_err());
}

#[test]
fn node_ids_are_distinct_from_destination() {
    let mut ctx = OfflineAudioContext::new(44_100).unwrap();
    let a = ctx.create_media_source(media()).unwrap();
    let b = ctx.create_media_source(media()).unwrap();
    assert_ne!(a, OfflineAudioContext::DESTINATION);
    assert_ne!(a, b);
    assert_eq!(ctx.stats().created, 2);
    assert_eq!(ctx.sample_rate(), 44_100);
    assert!(ctx.source_media(a).is_some());
}

#[test]
fn zero_sample_rate_is_rejected() {
    assert!(OfflineAudioContext::new(0).unwrap_err().is_configuration());
}
