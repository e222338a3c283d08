//! Read-only sequence views

use deepfreeze_core::{Frozen, Heap, Rewrap, Sequence, Value, ViewOp};

fn frozen_numbers(heap: &mut Heap, items: &[i32]) -> Sequence {
    let values = items.iter().copied().map(Value::from).collect();
    let arr = heap.alloc_array(values);
    heap.freeze(&Value::Object(arr))
        .unwrap()
        .as_sequence()
        .cloned()
        .unwrap()
}

#[test]
fn map_returns_new_frozen_sequence() {
    let mut heap = Heap::new();
    let seq = frozen_numbers(&mut heap, &[1, 2, 3]);

    let doubled = seq.map(|item, _, _| item.as_f64().unwrap_or_default() * 2.0);
    assert_eq!(doubled, [2, 4, 6].into_iter().collect::<Sequence>());
    assert_eq!(seq, [1, 2, 3].into_iter().collect::<Sequence>());
}

#[test]
fn derived_sequences_are_fully_frozen() {
    let mut heap = Heap::new();
    let seq = frozen_numbers(&mut heap, &[3, 1, 2]);

    let sorted = seq.to_sorted();
    let reversed = sorted.to_reversed();
    let replaced = reversed.with(-1, "last").unwrap();

    assert_eq!(sorted.join(","), "1,2,3");
    assert_eq!(reversed.join(","), "3,2,1");
    assert_eq!(replaced.join(","), "3,2,last");
    assert_eq!(seq.join(","), "3,1,2");
}

#[test]
fn verbatim_queries_do_not_allocate_sequences() {
    let mut heap = Heap::new();
    let seq = frozen_numbers(&mut heap, &[5, 10, 15]);

    assert!(seq.includes(&Frozen::from(10)));
    assert_eq!(seq.index_of(&Frozen::from(15)), Some(2));
    assert_eq!(seq.at(-1), Some(&Frozen::from(15)));
    assert_eq!(seq.reduce(0.0, |acc, item, _, _| acc + item.as_f64().unwrap_or_default()), 30.0);
    assert!(seq.every(|item, _, _| item.as_f64().is_some()));
}

#[test]
fn nested_sequences_from_views_stay_shared() {
    let mut heap = Heap::new();
    let inner = heap.alloc_array(vec![Value::from(1)]);
    let outer = heap.alloc_array(vec![Value::Object(inner)]);
    let frozen = heap.freeze(&Value::Object(outer)).unwrap();
    let seq = frozen.as_sequence().unwrap();

    let filtered = seq.filter(|_, _, _| true);
    assert!(filtered[0].ptr_eq(&seq[0]));
}

#[test]
fn table_covers_every_operation() {
    for op in ViewOp::ALL {
        assert_eq!(ViewOp::from_name(op.name()), Some(op));
    }
    assert_eq!(ViewOp::Map.rewrap(), Rewrap::Sequence);
    assert_eq!(ViewOp::Join.rewrap(), Rewrap::Verbatim);
}
