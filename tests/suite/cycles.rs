//! Cycle substitution and diagnostics

use deepfreeze_core::{CycleEvent, Freezer, Frozen, Heap, OMITTED_MARKER, Path, Value};

use crate::common::{freeze_collecting, self_referencing};

#[test]
fn self_reference_becomes_omitted_with_one_event() {
    let mut heap = Heap::new();
    let root = self_referencing(&mut heap);

    let (result, events) = freeze_collecting(&heap, &root);
    let frozen = result.unwrap();

    assert_eq!(frozen["name"].as_str(), Some("loop"));
    assert!(frozen["self"].is_omitted());
    assert_eq!(
        events,
        [CycleEvent {
            current: Path::root().child("self"),
            original: Path::root(),
        }]
    );
}

#[test]
fn indirect_cycle_through_sequence() {
    let mut heap = Heap::new();
    let list = heap.alloc_array(Vec::new());
    let node = heap.alloc_record();
    heap.set(node, "parent", list).unwrap();
    heap.push(list, node).unwrap();

    let (result, events) = freeze_collecting(&heap, &Value::Object(list));
    let frozen = result.unwrap();

    assert!(frozen[0]["parent"].is_omitted());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].current, Path::root().child(0).child("parent"));
    assert_eq!(events[0].original, Path::root());
}

#[test]
fn shared_reference_is_reported_once_per_extra_sighting() {
    let mut heap = Heap::new();
    let shared = heap.alloc_record();
    heap.set(shared, "v", 1).unwrap();
    let root = heap.alloc_array(vec![Value::Object(shared), Value::Object(shared)]);

    let (result, events) = freeze_collecting(&heap, &Value::Object(root));
    let frozen = result.unwrap();

    assert_eq!(frozen[0]["v"].as_f64(), Some(1.0));
    assert!(frozen[1].is_omitted());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].original, Path::root().child(0));
}

#[test]
fn equal_but_distinct_objects_are_not_cycles() {
    let mut heap = Heap::new();
    let a = heap.alloc_record();
    let b = heap.alloc_record();
    heap.set(a, "x", 1).unwrap();
    heap.set(b, "x", 1).unwrap();
    let root = heap.alloc_array(vec![Value::Object(a), Value::Object(b)]);

    let (result, events) = freeze_collecting(&heap, &Value::Object(root));
    assert!(events.is_empty());
    assert_eq!(result.unwrap()[1]["x"].as_f64(), Some(1.0));
}

#[test]
fn separate_calls_do_not_share_visited_state() {
    let mut heap = Heap::new();
    let shared = heap.alloc_record();
    let freezer = Freezer::new(&heap);

    let first = freezer.freeze(&Value::Object(shared)).unwrap();
    let (second, events) = freeze_collecting(&heap, &Value::Object(shared));
    assert!(first.as_record().is_some());
    assert!(second.unwrap().as_record().is_some());
    assert!(events.is_empty());
}

#[test]
fn omitted_marker_serializes_as_placeholder_text() {
    let mut heap = Heap::new();
    let root = self_referencing(&mut heap);
    let (result, _) = freeze_collecting(&heap, &root);

    let json = serde_json::to_value(result.unwrap()).unwrap();
    assert_eq!(json["self"], OMITTED_MARKER);
    assert_eq!(Frozen::Omitted.to_string(), OMITTED_MARKER);
}

#[test]
fn closure_sink_receives_events() {
    let mut heap = Heap::new();
    let root = self_referencing(&mut heap);
    let mut seen = Vec::new();

    Freezer::new(&heap)
        .freeze_with(&root, &mut |event: CycleEvent| seen.push(event.current.to_string()))
        .unwrap();
    assert_eq!(seen, [r#"["self"]"#]);
}
