use super::*;
use parking_lot::Mutex;
use std::sync::{
    atomic::{AtomicUsize, Ordering::SeqCst},
    Arc,
};

crate::declare! {
    notification Started(u32);
    notification Renamed((String, String)) = "app.renamed";
    notification Counted(u32) = "app.renamed";
}

struct Stopped {
    code: i32,
}

impl AppNotification for Stopped {
    type Payload = i32;

    fn payload(&self) -> &i32 {
        &self.code
    }

    fn into_payload(self) -> i32 {
        self.code
    }
}

mod other {
    crate::declare! {
        pub notification Started(u32);
    }
}

#[test]
fn explicit_name_is_used() {
    assert_eq!(resolve_name::<Renamed>(), "app.renamed");
    assert_eq!(resolve_name::<Renamed>(), Renamed::name());
}

#[test]
fn derived_name_is_stable_and_unique() {
    let started = resolve_name::<Started>();
    println!("derived_name_is_stable_and_unique: {}", started);
    assert_eq!(started, resolve_name::<Started>());
    assert!(started.as_str().ends_with("notification::test::Started"));
    assert_eq!(resolve_name::<Stopped>(), NotificationName::of::<Stopped>());

    assert_ne!(started, resolve_name::<Stopped>());
    assert_ne!(started, resolve_name::<other::Started>());
}

#[test]
fn block_scoped_kinds_get_distinct_names() {
    let bus = Bus::new();
    let observer = Observer::new();

    let first = {
        crate::declare! {
            notification Ready(u32);
        }
        observe::<Ready, _>(&bus, &observer, |_| {});
        resolve_name::<Ready>()
    };
    let second = {
        crate::declare! {
            notification Ready(String);
        }
        assert_eq!(Ready::post(&bus, "second".into()), 0);
        resolve_name::<Ready>()
    };

    assert_eq!(first.as_str(), second.as_str());
    assert_ne!(first, second);
    assert_eq!(bus.observer_count(&first), 1);
    assert_eq!(bus.observer_count(&second), 0);
}

#[test]
fn posted_payload_is_extracted() {
    let bus = Bus::new();
    let observer = Observer::new();
    let received = Arc::new(Mutex::new(Vec::new()));

    let sink = received.clone();
    register(&bus, resolve_name::<Renamed>(), &observer, move |envelope| {
        let payload = extract_payload::<Renamed>(envelope).cloned();
        sink.lock().push(payload);
    });

    let payload = ("old".to_string(), "new".to_string());
    assert_eq!(post(&bus, Renamed(payload.clone())), 1);
    assert_eq!(*received.lock(), vec![Some(payload)]);
}

#[test]
fn wrong_kind_extracts_nothing() {
    let bus = Bus::new();
    let observer = Observer::new();
    let extracted = Arc::new(Mutex::new(Vec::new()));

    let sink = extracted.clone();
    register(&bus, resolve_name::<Started>(), &observer, move |envelope| {
        sink.lock().push(extract_payload::<Renamed>(envelope).is_some());
        assert!(envelope.try_payload::<Renamed>().is_err());
        assert_eq!(extract_payload::<Started>(envelope), Some(&7));
    });

    post(&bus, Started(7));
    assert_eq!(*extracted.lock(), vec![false]);
}

#[test]
fn shared_name_cross_delivers() {
    let bus = Bus::with_config(crate::BusConfig {
        warn_on_name_collision: false,
        ..Default::default()
    });
    let observer = Observer::new();
    let renamed = Arc::new(AtomicUsize::new(0));
    let counted = Arc::new(AtomicUsize::new(0));

    let hits = renamed.clone();
    observe::<Renamed, _>(&bus, &observer, move |_| {
        hits.fetch_add(1, SeqCst);
    });
    let hits = counted.clone();
    observe::<Counted, _>(&bus, &observer, move |count| {
        hits.fetch_add(*count as usize, SeqCst);
    });

    // both observers see both posts, each extracts only its own payload type
    assert_eq!(Counted::post(&bus, 5), 2);
    assert_eq!(Renamed::post(&bus, ("a".into(), "b".into())), 2);
    assert_eq!(renamed.load(SeqCst), 1);
    assert_eq!(counted.load(SeqCst), 5);
}

#[test]
fn duplicate_registration_delivers_twice() {
    let bus = Bus::new();
    let observer = Observer::new();
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let calls = calls.clone();
        observe::<Stopped, _>(&bus, &observer, move |code| {
            assert_eq!(*code, -1);
            calls.fetch_add(1, SeqCst);
        });
    }

    assert_eq!(post(&bus, Stopped { code: -1 }), 2);
    assert_eq!(calls.load(SeqCst), 2);
}

#[test]
fn post_without_observers() {
    let bus = Bus::new();
    assert_eq!(post(&bus, Started(1)), 0);
    assert_eq!(Started::post(&bus, 2), 0);

    let observer = Observer::new();
    observe::<Started, _>(&bus, &observer, |_| panic!("Started observer must not be called"));
    assert_eq!(bus.observer_count(&resolve_name::<Started>()), 1);
    assert_eq!(bus.observer_count(&resolve_name::<other::Started>()), 0);
    assert_eq!(other::Started::post(&bus, 3), 0);
}

#[test]
fn instance_payload_accessors() {
    let started = Started(3);
    assert_eq!(*started.payload(), 3);
    assert_eq!(started.into_payload(), 3);
}
