//! Building source graphs from JSON documents.

use serde_json::Value as Json;

use crate::heap::{Heap, HeapObject, RecordObject};
use crate::Value;

impl Heap {
    /// Allocate `json` on this heap and return the value that refers to it.
    ///
    /// Objects become records, arrays become arrays, and scalars map to the matching
    /// primitive. Every object and array gets its own handle, so the result is acyclic.
    pub fn import_json(&mut self, json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => {
                let values = items.iter().map(|item| self.import_json(item)).collect();
                Value::Object(self.alloc_array(values))
            }
            Json::Object(map) => {
                let mut record = RecordObject::new();
                for (key, item) in map {
                    let value = self.import_json(item);
                    record.set(key.as_str(), value);
                }
                Value::Object(self.alloc(HeapObject::Record(record)))
            }
        }
    }
}
