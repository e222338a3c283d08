//! Freezing source graphs

use std::thread;

use chrono::{TimeZone, Utc};
use deepfreeze_core::{
    FreezeError, FreezeOptions, Freezer, Frozen, Heap, Path, UnsupportedKind, Value,
};

use crate::common::user_document;

#[test]
fn frozen_copy_is_detached_from_source() {
    let mut heap = Heap::new();
    let (root, user, tags) = user_document(&mut heap);

    let frozen = heap.freeze(&root).unwrap();
    heap.set(user, "name", "Mallory").unwrap();
    heap.push(tags, "root").unwrap();

    assert_eq!(frozen["user"]["name"].as_str(), Some("Alice"));
    assert_eq!(frozen["user"]["tags"].as_sequence().unwrap().len(), 1);
}

#[test]
fn freezing_frozen_value_returns_same_instance() {
    let mut heap = Heap::new();
    let (root, _, _) = user_document(&mut heap);

    let first = heap.freeze(&root).unwrap();
    let second = heap.freeze(&Value::Frozen(first.clone())).unwrap();
    assert!(first.ptr_eq(&second));
}

#[test]
fn frozen_children_keep_identity_when_refrozen_inside_new_graph() {
    let mut heap = Heap::new();
    let (root, _, _) = user_document(&mut heap);
    let frozen = heap.freeze(&root).unwrap();

    let wrapper = heap.alloc_array(vec![Value::Frozen(frozen.clone()), Value::from(1)]);
    let outer = heap.freeze(&Value::Object(wrapper)).unwrap();
    assert!(outer[0].ptr_eq(&frozen));
}

#[test]
fn shape_is_preserved() {
    let mut heap = Heap::new();
    let arr = heap.alloc_array(vec![Value::from(1), Value::Null, Value::Undefined]);
    let rec = heap.alloc_record();
    heap.set(rec, "b", 2).unwrap();
    heap.set(rec, "a", arr).unwrap();

    let frozen = heap.freeze(&Value::Object(rec)).unwrap();
    let record = frozen.as_record().unwrap();
    assert_eq!(record.keys().collect::<Vec<_>>(), ["b", "a"]);

    let seq = record["a"].as_sequence().unwrap();
    assert_eq!(seq.len(), 3);
    assert_eq!(seq[1], Frozen::Null);
    assert_eq!(seq[2], Frozen::Undefined);
}

#[test]
fn primitives_pass_through() {
    let heap = Heap::new();
    for (value, expected) in [
        (Value::Undefined, Frozen::Undefined),
        (Value::Null, Frozen::Null),
        (Value::Bool(true), Frozen::Bool(true)),
        (Value::from(4.5), Frozen::Number(4.5)),
        (Value::BigInt(1 << 70), Frozen::BigInt(1 << 70)),
        (Value::from("hi"), Frozen::from("hi")),
    ] {
        assert_eq!(heap.freeze(&value).unwrap(), expected);
    }
}

#[test]
fn dates_and_patterns_become_primitives() {
    let mut heap = Heap::new();
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let date = heap.alloc_date(at);
    let pattern = heap.alloc_pattern("a+b", "gi").unwrap();
    let rec = heap.alloc_record();
    heap.set(rec, "at", date).unwrap();
    heap.set(rec, "re", pattern).unwrap();

    let frozen = heap.freeze(&Value::Object(rec)).unwrap();
    assert_eq!(frozen["at"].as_f64(), Some(at.timestamp_millis() as f64));
    assert_eq!(frozen["re"].as_str(), Some("/a+b/gi"));
}

#[test]
fn unsupported_values_abort_at_any_depth() {
    let mut heap = Heap::new();
    let handler = heap.alloc_function("onClick");
    let inner = heap.alloc_array(vec![Value::from(1), Value::Object(handler)]);
    let rec = heap.alloc_record();
    heap.set(rec, "handlers", inner).unwrap();

    let err = heap.freeze(&Value::Object(rec)).unwrap_err();
    match err {
        FreezeError::UnsupportedType { kind, path } => {
            assert_eq!(kind, UnsupportedKind::Function);
            assert_eq!(path, Path::root().child("handlers").child(1));
        }
        other => panic!("expected UnsupportedType, got {other:?}"),
    }
}

#[test]
fn every_unsupported_kind_is_rejected_at_root() {
    let mut heap = Heap::new();
    let handles = [
        (heap.alloc_function("f"), UnsupportedKind::Function),
        (heap.alloc_promise(), UnsupportedKind::Promise),
        (heap.alloc_weak_map(), UnsupportedKind::WeakMap),
        (heap.alloc_weak_set(), UnsupportedKind::WeakSet),
    ];
    for (handle, expected) in handles {
        let err = heap.freeze(&Value::Object(handle)).unwrap_err();
        assert!(
            matches!(err, FreezeError::UnsupportedType { kind, ref path } if kind == expected && path.is_root())
        );
    }
}

#[test]
fn failures_keep_message_trace_and_cause() {
    let mut heap = Heap::new();
    let cause = heap.alloc_error("IOError", "disk full");
    let error = heap.alloc_error("TypeError", "bad input");
    heap.set_stack(error, "TypeError: bad input\n    at parse").unwrap();
    heap.set_cause(error, cause).unwrap();

    let failure = Freezer::new(&heap).failure(&Value::Object(error)).unwrap();
    assert_eq!(failure.name(), "ImmutableTypeError");
    assert_eq!(failure.message(), "bad input");
    assert_eq!(failure.trace(), "TypeError: bad input\n    at parse");

    let cause = failure.cause().and_then(Frozen::as_failure).unwrap();
    assert_eq!(cause.name(), "ImmutableIOError");
    assert_eq!(cause.message(), "disk full");
}

#[test]
fn failure_prefix_is_configurable() {
    let mut heap = Heap::new();
    let error = heap.alloc_error("RangeError", "out of range");
    let options = FreezeOptions {
        failure_prefix: "Sealed".into(),
        ..FreezeOptions::default()
    };

    let frozen = Freezer::with_options(&heap, options)
        .freeze(&Value::Object(error))
        .unwrap();
    assert_eq!(frozen.as_failure().unwrap().name(), "SealedRangeError");
}

#[test]
fn constructors_reject_mismatched_shapes() {
    let mut heap = Heap::new();
    let arr = heap.alloc_array(Vec::new());
    let freezer = Freezer::new(&heap);

    assert!(matches!(
        freezer.record(&Value::Object(arr)),
        Err(FreezeError::InvalidArgument { expected: "record", .. })
    ));
    assert!(matches!(
        freezer.sequence(&Value::from(3)),
        Err(FreezeError::InvalidArgument { expected: "sequence", .. })
    ));
    assert!(matches!(
        freezer.failure(&Value::Null),
        Err(FreezeError::InvalidArgument { expected: "failure", .. })
    ));
}

#[test]
fn frozen_values_are_readable_from_many_threads() {
    let mut heap = Heap::new();
    let (root, _, _) = user_document(&mut heap);
    let frozen = heap.freeze(&root).unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let frozen = frozen.clone();
            thread::spawn(move || frozen["user"]["tags"][0].as_str().map(str::to_owned))
        })
        .collect();

    for reader in readers {
        assert_eq!(reader.join().unwrap().as_deref(), Some("admin"));
    }
}
