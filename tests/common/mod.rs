//! Shared test utilities and fixtures
//!
//! Builders for the source graphs the suite freezes.

#![allow(dead_code)]

use deepfreeze_core::{CollectingSink, CycleEvent, FreezeError, Freezer, Frozen, Handle, Heap, Value};

/// `{ "user": { "name": "Alice", "tags": ["admin"] } }`, returning the root and the inner
/// `user` and `tags` handles so tests can mutate the source afterwards.
pub fn user_document(heap: &mut Heap) -> (Value, Handle, Handle) {
    let tags = heap.alloc_array(vec![Value::from("admin")]);
    let user = heap.alloc_record();
    heap.set(user, "name", "Alice").unwrap();
    heap.set(user, "tags", tags).unwrap();
    let root = heap.alloc_record();
    heap.set(root, "user", user).unwrap();
    (Value::Object(root), user, tags)
}

/// A record whose `self` property points back at itself.
pub fn self_referencing(heap: &mut Heap) -> Value {
    let node = heap.alloc_record();
    heap.set(node, "name", "loop").unwrap();
    heap.set(node, "self", node).unwrap();
    Value::Object(node)
}

/// Freeze with a collecting sink and hand back both the result and the cycle events.
pub fn freeze_collecting(heap: &Heap, value: &Value) -> (Result<Frozen, FreezeError>, Vec<CycleEvent>) {
    let mut sink = CollectingSink::new();
    let result = Freezer::new(heap).freeze_with(value, &mut sink);
    (result, sink.into_events())
}
