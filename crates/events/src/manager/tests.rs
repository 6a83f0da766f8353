use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use parking_lot::Mutex;

use super::{EventManager, Handler};
use crate::args::EventArgs;

fn adder(total: &Arc<AtomicI32>, amount: i32) -> impl Fn(&EventArgs) + Send + Sync + 'static {
	let total = Arc::clone(total);
	move |_| {
		total.fetch_add(amount, Ordering::SeqCst);
	}
}

#[test]
fn bound_handler_fires_on_trigger() {
	let fired = Arc::new(AtomicI32::new(0));
	let events = EventManager::new();
	events.on("event", adder(&fired, 1));
	events.trigger("event", &EventArgs::new());
	assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn only_handlers_of_the_triggered_event_run() {
	let total = Arc::new(AtomicI32::new(0));
	let events = EventManager::new();
	events.on("add", adder(&total, 1));
	events.on("add", adder(&total, 2));
	events.on("subtract", adder(&total, -1));

	events.trigger("add", &EventArgs::new());
	assert_eq!(total.load(Ordering::SeqCst), 3);
}

#[test]
fn handlers_receive_arguments() {
	let seen = Arc::new(Mutex::new(None));
	let events = EventManager::new();
	let sink = Arc::clone(&seen);
	events.on("person", move |args| {
		*sink.lock() = Some((args.get::<&str>(0).copied(), args.get::<u32>(1).copied()));
	});

	events.trigger("person", &EventArgs::new().with("Jim").with(25u32));
	assert_eq!(*seen.lock(), Some((Some("Jim"), Some(25))));
}

#[test]
fn handlers_run_in_binding_order() {
	let order = Arc::new(Mutex::new(Vec::new()));
	let events = EventManager::new();
	for name in ["first", "second", "third"] {
		let order = Arc::clone(&order);
		events.on("event", move |_| order.lock().push(name));
	}

	events.trigger("event", &EventArgs::new());
	assert_eq!(*order.lock(), vec!["first", "second", "third"]);
}

#[test]
fn off_removes_only_the_given_handler() {
	let total = Arc::new(AtomicI32::new(0));
	let events = EventManager::new();
	events.on("event", adder(&total, 1));
	let bad = events.on("event", adder(&total, 100));

	assert!(events.off("event", &bad));
	assert!(!events.off("event", &bad));
	events.trigger("event", &EventArgs::new());
	assert_eq!(total.load(Ordering::SeqCst), 1);
}

#[test]
fn off_removes_first_binding_of_a_repeated_handler() {
	let total = Arc::new(AtomicI32::new(0));
	let events = EventManager::new();
	let handler = Handler::new(adder(&total, 1));
	events.bind("event", handler.clone());
	events.bind("event", handler.clone());
	assert_eq!(events.count("event"), 2);

	events.off("event", &handler);
	events.trigger("event", &EventArgs::new());
	assert_eq!(total.load(Ordering::SeqCst), 1);
}

#[test]
fn off_event_removes_all_handlers_of_one_event() {
	let total = Arc::new(AtomicI32::new(0));
	let events = EventManager::new();
	events.on("event", adder(&total, 1));
	events.on("event", adder(&total, 2));
	events.on("other", adder(&total, 10));

	events.off_event("event");
	events.trigger("event", &EventArgs::new());
	assert_eq!(total.load(Ordering::SeqCst), 0);
	assert!(!events.has("event"));
	assert!(events.has("other"));
}

#[test]
fn off_all_removes_every_handler() {
	let events = EventManager::new();
	events.on("event", |_| panic!("handler should have been removed"));
	events.on("event", |_| panic!("handler should have been removed"));
	events.on("other", |_| panic!("handler should have been removed"));

	events.off_all();
	events.trigger("event", &EventArgs::new());
	events.trigger("other", &EventArgs::new());
}

#[test]
fn unknown_event_is_ignored() {
	let events = EventManager::new();
	events.trigger("nothing", &EventArgs::new());
	assert_eq!(events.count("nothing"), 0);
}

#[test]
fn handlers_may_unbind_during_dispatch() {
	let total = Arc::new(AtomicI32::new(0));
	let events = Arc::new(EventManager::new());
	let slot: Arc<Mutex<Option<Handler>>> = Arc::default();

	let (inner_events, inner_slot, inner_total) = (Arc::clone(&events), Arc::clone(&slot), Arc::clone(&total));
	let once = events.on("event", move |_| {
		inner_total.fetch_add(1, Ordering::SeqCst);
		if let Some(me) = inner_slot.lock().take() {
			inner_events.off("event", &me);
		}
	});
	*slot.lock() = Some(once);

	events.trigger("event", &EventArgs::new());
	events.trigger("event", &EventArgs::new());
	assert_eq!(total.load(Ordering::SeqCst), 1);
	assert_eq!(events.count("event"), 0);
}

#[test]
fn handler_equality_is_identity() {
	let a = Handler::new(|_| {});
	let b = Handler::new(|_| {});
	assert_eq!(a, a.clone());
	assert_ne!(a, b);
}
