//! Key search over nested JSON documents
//!
//! The validation service answers with deeply nested objects whose exact
//! shape varies between answers. Rather than modelling the full schema we
//! pull values out by key name, wherever they sit.

use serde_json::{map, Value};
use std::slice;

/// Lazily yield every value bound to `key` at any depth below `node`.
///
/// Values come out in document order and are never deduplicated. A matched
/// value is not searched further. Array elements are searched only when they
/// are objects. A `node` that is not an object yields nothing.
///
/// # Examples
///
/// ```
/// use address_validator::search::search;
/// use serde_json::json;
///
/// let doc = json!({"a": {"Line": 1}, "b": [{"Line": 2}]});
/// let found: Vec<_> = search("Line", &doc).collect();
/// assert_eq!(found, vec![&json!(1), &json!(2)]);
/// ```
pub fn search<'a>(key: &'a str, node: &'a Value) -> Matches<'a> {
    let stack = match node {
        Value::Object(map) => vec![Frame::Object(map.iter())],
        _ => Vec::new(),
    };
    Matches { key, stack }
}

/// First value bound to `key`, if any.
pub fn first<'a>(key: &'a str, node: &'a Value) -> Option<&'a Value> {
    search(key, node).next()
}

enum Frame<'a> {
    Object(map::Iter<'a>),
    Array(slice::Iter<'a, Value>),
}

/// Iterator returned by [`search`].
pub struct Matches<'a> {
    key: &'a str,
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        while let Some(frame) = self.stack.last_mut() {
            match frame {
                Frame::Object(entries) => {
                    let Some((k, v)) = entries.next() else {
                        self.stack.pop();
                        continue;
                    };
                    if k == self.key {
                        return Some(v);
                    }
                    match v {
                        Value::Object(map) => self.stack.push(Frame::Object(map.iter())),
                        Value::Array(items) => self.stack.push(Frame::Array(items.iter())),
                        _ => {}
                    }
                }
                Frame::Array(items) => {
                    let Some(item) = items.next() else {
                        self.stack.pop();
                        continue;
                    };
                    // Nested arrays are searched as non-objects and contribute nothing
                    if let Value::Object(map) = item {
                        self.stack.push(Frame::Object(map.iter()));
                    }
                }
            }
        }
        None
    }
}
