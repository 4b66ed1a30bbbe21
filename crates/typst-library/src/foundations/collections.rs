use ecow::{EcoString, EcoVec};

use super::Value;

/// A sequence of values, structurally cloned (deep clone) per the data model.
#[derive(Debug, Clone, Default)]
pub struct Array(pub EcoVec<Value>);

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a == b)
    }
}

/// An insertion-ordered string-keyed map.
///
/// Key order is preserved for iteration and display but does not affect
/// equality: two dictionaries are equal iff they have the same set of
/// key-value pairs.
#[derive(Debug, Clone, Default)]
pub struct Dict(pub EcoVec<(EcoString, Value)>);

impl Dict {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn insert(&mut self, key: EcoString, value: Value) {
        if let Some(slot) = self.0.make_mut().iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }
}

impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}
