#![allow(dead_code)]

use value_patch::{Patch, Value};

pub fn json(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

pub fn patches(text: &str) -> Vec<Patch> {
    serde_json::from_str(text).unwrap()
}
