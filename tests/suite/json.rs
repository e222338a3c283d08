//! JSON import and output

use insta::assert_snapshot;
use serde_json::json;

use deepfreeze_core::{Heap, Value};

#[test]
fn imported_document_freezes_to_equal_json() {
    let doc = json!({
        "user": { "name": "Alice", "tags": ["admin", "ops"] },
        "limits": [1, 2.5, null],
        "active": true
    });
    let mut heap = Heap::new();
    let root = heap.import_json(&doc);

    let frozen = heap.freeze(&root).unwrap();
    assert_eq!(serde_json::to_value(&frozen).unwrap(), doc);
}

#[test]
fn frozen_document_pretty_output() {
    let mut heap = Heap::new();
    let root = heap.import_json(&json!({ "b": [1, 2], "a": { "ok": false } }));
    let error = heap.alloc_error("ParseError", "unexpected token");
    heap.set_stack(error, "ParseError: unexpected token").unwrap();
    let outer = heap.alloc_record();
    heap.set(outer, "doc", root).unwrap();
    heap.set(outer, "error", error).unwrap();
    heap.set(outer, "big", Value::BigInt(12_345_678_901_234_567_890)).unwrap();

    let frozen = heap.freeze(&Value::Object(outer)).unwrap();
    assert_snapshot!(serde_json::to_string_pretty(&frozen).unwrap(), @r#"
    {
      "doc": {
        "b": [
          1,
          2
        ],
        "a": {
          "ok": false
        }
      },
      "error": {
        "name": "ImmutableParseError",
        "message": "unexpected token",
        "trace": "ParseError: unexpected token"
      },
      "big": "12345678901234567890"
    }
    "#);
}

#[test]
fn display_follows_script_conventions() {
    let mut heap = Heap::new();
    let root = heap.import_json(&json!([1, "two", [3, 4], null, {}]));
    let frozen = heap.freeze(&root).unwrap();

    assert_snapshot!(frozen.to_string(), @"1,two,3,4,,[object Object]");
}
