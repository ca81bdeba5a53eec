use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    Refined(Idx, Idx),
    Concrete(Idx),
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Event>>>);

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.0.lock().clone()
    }
}

impl AbstractTypeListener for Recorder {
    fn refine_abstract_type(&mut self, old: Idx, new: Idx) {
        self.0.lock().push(Event::Refined(old, new));
    }

    fn type_became_concrete(&mut self, ty: Idx) {
        self.0.lock().push(Event::Concrete(ty));
    }
}

#[test]
fn subscribe_to_concrete_type_is_refused() {
    let mut ctx = TypeContext::new();
    assert_eq!(ctx.subscribe(Idx::INT32, Box::new(Recorder::default())), None);
}

#[test]
fn listener_counts_as_user() {
    let mut ctx = TypeContext::new();
    let opaque = ctx.create_opaque();
    let id = ctx
        .subscribe(opaque, Box::new(Recorder::default()))
        .unwrap();

    assert_eq!(ctx.abstract_users(opaque), vec![AbstractUser::Listener(id)]);
    assert_eq!(ctx.holder_target(id), Some(opaque));
}

#[test]
fn refine_to_concrete_notifies_once() {
    let mut ctx = TypeContext::new();
    let recorder = Recorder::default();
    let opaque = ctx.create_opaque();
    let id = ctx.subscribe(opaque, Box::new(recorder.clone())).unwrap();

    ctx.refine_abstract_type_to(opaque, Idx::INT32);

    assert_eq!(recorder.events(), vec![Event::Refined(opaque, Idx::INT32)]);
    assert_eq!(ctx.holder_target(id), Some(Idx::INT32));
    assert!(ctx.abstract_users(opaque).is_empty());
}

#[test]
fn listener_follows_chained_refinements() {
    let mut ctx = TypeContext::new();
    let recorder = Recorder::default();
    let first = ctx.create_opaque();
    let second = ctx.create_opaque();
    let id = ctx.subscribe(first, Box::new(recorder.clone())).unwrap();

    ctx.refine_abstract_type_to(first, second);
    assert_eq!(ctx.holder_target(id), Some(second));
    assert_eq!(ctx.abstract_users(second), vec![AbstractUser::Listener(id)]);

    ctx.refine_abstract_type_to(second, Idx::INT8);
    assert_eq!(
        recorder.events(),
        vec![
            Event::Refined(first, second),
            Event::Refined(second, Idx::INT8),
        ]
    );
}

#[test]
fn listener_hears_container_become_concrete() {
    let mut ctx = TypeContext::new();
    let recorder = Recorder::default();
    let opaque = ctx.create_opaque();
    let ptr = ctx.get_pointer(opaque);
    let id = ctx.subscribe(ptr, Box::new(recorder.clone())).unwrap();

    ctx.refine_abstract_type_to(opaque, Idx::INT16);

    assert_eq!(recorder.events(), vec![Event::Concrete(ptr)]);
    assert_eq!(ctx.holder_target(id), Some(ptr));
    assert!(ctx.abstract_users(ptr).is_empty());
}

#[test]
fn listener_follows_collapsed_type() {
    let mut ctx = TypeContext::new();
    let recorder = Recorder::default();
    let existing = ctx.get_pointer(Idx::INT8);
    let opaque = ctx.create_opaque();
    let ptr = ctx.get_pointer(opaque);
    let id = ctx.subscribe(ptr, Box::new(recorder.clone())).unwrap();

    ctx.refine_abstract_type_to(opaque, Idx::INT8);

    assert_eq!(recorder.events(), vec![Event::Refined(ptr, existing)]);
    assert_eq!(ctx.holder_target(id), Some(existing));
}

#[test]
fn unsubscribe_stops_notifications() {
    let mut ctx = TypeContext::new();
    let recorder = Recorder::default();
    let opaque = ctx.create_opaque();
    let id = ctx.subscribe(opaque, Box::new(recorder.clone())).unwrap();

    assert!(ctx.unsubscribe(id).is_some());
    assert!(ctx.abstract_users(opaque).is_empty());
    assert!(ctx.unsubscribe(id).is_none());
    assert_eq!(ctx.holder_target(id), None);

    ctx.refine_abstract_type_to(opaque, Idx::INT32);
    assert!(recorder.events().is_empty());
}

#[test]
fn several_listeners_on_one_type() {
    let mut ctx = TypeContext::new();
    let recorders = [Recorder::default(), Recorder::default()];
    let opaque = ctx.create_opaque();
    for recorder in &recorders {
        ctx.subscribe(opaque, Box::new(recorder.clone())).unwrap();
    }

    ctx.refine_abstract_type_to(opaque, Idx::DOUBLE);

    for recorder in &recorders {
        assert_eq!(recorder.events(), vec![Event::Refined(opaque, Idx::DOUBLE)]);
    }
}
