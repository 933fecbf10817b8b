//! The generic value tree the parser produces.
//!
//! `Value` mirrors JSON types but separates integers from floats (the save
//! format distinguishes them lexically) and uses a `BTreeMap` for objects:
//! keys are unique, comparison is order-independent, and serialization comes
//! out with sorted keys — the same layout existing consumers of the format
//! already see.

use serde::Serialize;
use std::collections::BTreeMap;

/// Object representation: string keys only, unique, sorted on output.
pub type Map = BTreeMap<String, Value>;

/// A parsed save-file value.
///
/// `Null` only ever appears for a top-level key that had no value after it
/// (e.g. the trailing `b` in `a=1 b`). Inside blocks, a key-less literal is a
/// bare array element instead and never materializes as `Null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    /// Raw text. No escape processing: embedded control characters and line
    /// breaks are preserved verbatim.
    String(String),
    Integer(i64),
    /// Parsed at 32-bit precision, then widened. The truncation reproduces
    /// the source format's rounding footprint and is deliberate.
    Float(f64),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Returns the object map if this value is an `Object`.
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the element slice if this value is an `Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}
