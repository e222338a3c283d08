//! Container compile-time immutability and direct construction

use deepfreeze_core::{Failure, Freezer, Frozen, Heap, Record, Sequence, Value};

#[test]
fn record_constructor_passes_frozen_record_through() {
    let mut heap = Heap::new();
    let rec = heap.alloc_record();
    heap.set(rec, "k", "v").unwrap();
    let freezer = Freezer::new(&heap);

    let first = freezer.record(&Value::Object(rec)).unwrap();
    let again = freezer
        .record(&Value::Frozen(Frozen::Record(first.clone())))
        .unwrap();
    assert!(first.ptr_eq(&again));
    assert_eq!(first["k"].as_str(), Some("v"));
}

#[test]
fn sequence_constructor_freezes_nested_records() {
    let mut heap = Heap::new();
    let rec = heap.alloc_record();
    heap.set(rec, "id", 7).unwrap();
    let arr = heap.alloc_array(vec![Value::Object(rec)]);

    let seq = Freezer::new(&heap).sequence(&Value::Object(arr)).unwrap();
    heap.set(rec, "id", 8).unwrap();
    assert_eq!(seq[0]["id"].as_f64(), Some(7.0));
}

#[test]
fn failure_constructor_handles_self_cause() {
    let mut heap = Heap::new();
    let error = heap.alloc_error("Error", "loop");
    heap.set_cause(error, error).unwrap();

    let failure = Freezer::new(&heap).failure(&Value::Object(error)).unwrap();
    assert!(failure.cause().is_some_and(Frozen::is_omitted));
}

#[test]
fn containers_build_without_a_heap() {
    let record = Record::from_entries([("a", Frozen::from(1)), ("a", Frozen::from(2))]);
    assert_eq!(record.len(), 1);
    assert_eq!(record["a"], Frozen::from(1));

    let seq: Sequence = ["x", "y"].into_iter().collect();
    assert_eq!(seq.len(), 2);

    let failure = Failure::new("ImmutableError", "boom", "", None);
    assert_eq!(Frozen::from(failure).to_string(), "ImmutableError: boom");
}
