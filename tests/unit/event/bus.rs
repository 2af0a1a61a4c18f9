use super::*;
use crate::foundation::ids::{LayerId, MovieId};
use std::cell::RefCell;
use std::rc::Rc;

fn recorder(
    bus: &mut EventBus<()>,
    target: MovieId,
    topic: &'static str,
    log: &Rc<RefCell<Vec<&'static str>>>,
) {
    let log = Rc::clone(log);
    bus.subscribe(target, topic, move |_| log.borrow_mut().push(topic))
        .unwrap();
}

#[test]
fn publish_reaches_exact_and_ancestor_topics() {
    let mut bus = EventBus::<()>::new();
    let movie = MovieId::next();
    let log = Rc::new(RefCell::new(Vec::new()));
    recorder(&mut bus, movie, "foo.bar.test", &log);
    recorder(&mut bus, movie, "foo.bar", &log);
    recorder(&mut bus, movie, "foo", &log);

    assert_eq!(bus.publish(movie, "foo.bar.test", &()), 3);
    assert_eq!(*log.borrow(), vec!["foo.bar.test", "foo.bar", "foo"]);

    log.borrow_mut().clear();
    assert_eq!(bus.publish(movie, "foo.bar", &()), 2);
    assert_eq!(*log.borrow(), vec!["foo.bar", "foo"]);

    log.borrow_mut().clear();
    assert_eq!(bus.publish(movie, "foo", &()), 1);
    assert_eq!(*log.borrow(), vec!["foo"]);
}

#[test]
fn handlers_on_one_topic_fire_in_registration_order() {
    let mut bus = EventBus::<u32>::new();
    let movie = MovieId::next();
    let seen = Rc::new(RefCell::new(Vec::new()));
    for tag in 0..3u32 {
        let seen = Rc::clone(&seen);
        bus.subscribe(movie, "movie.seek", move |e| {
            seen.borrow_mut().push((tag, *e.payload))
        })
        .unwrap();
    }
    bus.publish(movie, "movie.seek", &7);
    assert_eq!(*seen.borrow(), vec![(0, 7), (1, 7), (2, 7)]);
}

#[test]
fn publish_without_subscribers_is_a_noop() {
    let mut bus = EventBus::<()>::new();
    let movie = MovieId::next();
    assert_eq!(bus.publish(movie, "movie.play", &()), 0);

    bus.subscribe(movie, "movie.pause", |_| {}).unwrap();
    assert_eq!(bus.publish(movie, "movie.play", &()), 0);
    // Descendant subscriptions never see a publish on the parent topic.
    bus.subscribe(movie, "movie.play.extra", |_| {}).unwrap();
    assert_eq!(bus.publish(movie, "movie.play", &()), 0);
}

#[test]
fn targets_are_isolated() {
    let mut bus = EventBus::<()>::new();
    let a = MovieId::next();
    let b = LayerId::next();
    let hits = Rc::new(RefCell::new(0));
    let h = Rc::clone(&hits);
    bus.subscribe(a, "movie", move |e| {
        assert_eq!(e.target, a.object());
        *h.borrow_mut() += 1;
    })
    .unwrap();

    bus.publish(b, "movie.seek", &());
    assert_eq!(*hits.borrow(), 0);
    bus.publish(a, "movie.seek", &());
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn event_carries_published_topic() {
    let mut bus = EventBus::<()>::new();
    let movie = MovieId::next();
    let topics = Rc::new(RefCell::new(Vec::<String>::new()));
    let t = Rc::clone(&topics);
    bus.subscribe(movie, "movie.change", move |e| {
        t.borrow_mut().push(e.topic.to_owned())
    })
    .unwrap();
    bus.publish(movie, "movie.change.layer.add", &());
    assert_eq!(*topics.borrow(), vec!["movie.change.layer.add".to_owned()]);
}

#[test]
fn unsubscribe_stops_delivery() {
    let mut bus = EventBus::<()>::new();
    let movie = MovieId::next();
    let id = bus.subscribe(movie, "movie.seek", |_| {}).unwrap();
    bus.subscribe(movie, "movie", |_| {}).unwrap();
    assert_eq!(bus.len(), 2);

    assert!(bus.unsubscribe(id));
    assert!(!bus.unsubscribe(id));
    assert_eq!(bus.publish(movie, "movie.seek", &()), 1);

    assert_eq!(bus.unsubscribe_target(movie), 1);
    assert!(bus.is_empty());
    assert!(!bus.has_subscribers(movie, "movie.seek"));
}

#[test]
fn has_subscribers_considers_ancestors() {
    let mut bus = EventBus::<()>::new();
    let movie = MovieId::next();
    bus.subscribe(movie, "movie", |_| {}).unwrap();
    assert!(bus.has_subscribers(movie, "movie.seek"));
    assert!(!bus.has_subscribers(movie, "layer.attach"));
}

#[test]
fn malformed_topics_are_rejected() {
    let mut bus = EventBus::<()>::new();
    let movie = MovieId::next();
    for bad in ["", ".", "a..b", ".a", "a."] {
        let err = bus.subscribe(movie, bad, |_| {}).unwrap_err();
        assert!(err.is_configuration(), "{bad}");
    }
}

#[test]
fn topic_path_walks_to_root() {
    let path: Vec<&str> = topic_path("a.b.c").collect();
    assert_eq!(path, vec!["a.b.c", "a.b", "a"]);
    assert_eq!(topic_path("solo").collect::<Vec<_>>(), vec!["solo"]);
}
