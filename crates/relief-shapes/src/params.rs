//! Typed, named parameters from a scene description.
//!
//! A [`ParamSet`] maps parameter names to typed value lists. It can be built
//! programmatically or deserialized from any serde format; in TOML a shape
//! block looks like:
//!
//! ```toml
//! nu = 3
//! nv = 3
//! Pz = [0, 0, 0, 0, 1, 0, 0, 0, 0]
//! smooth = true
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One parameter's value. Scalars and lists are both accepted; a scalar is
/// treated as a one-element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string.
    Str(String),
    /// A list of booleans.
    Bools(Vec<bool>),
    /// A list of integers.
    Ints(Vec<i64>),
    /// A list of floats.
    Floats(Vec<f64>),
    /// A list of strings.
    Strs(Vec<String>),
}

/// Named parameters for constructing scene objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet {
    params: BTreeMap<String, ParamValue>,
}

impl ParamSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw value, replacing any previous value of that name.
    pub fn add(&mut self, name: &str, value: ParamValue) -> &mut Self {
        self.params.insert(name.to_owned(), value);
        self
    }

    /// Set an integer parameter.
    pub fn add_int(&mut self, name: &str, value: i64) -> &mut Self {
        self.add(name, ParamValue::Int(value))
    }

    /// Set a float parameter.
    pub fn add_float(&mut self, name: &str, value: f64) -> &mut Self {
        self.add(name, ParamValue::Float(value))
    }

    /// Set a float list parameter.
    pub fn add_floats(&mut self, name: &str, values: &[f64]) -> &mut Self {
        self.add(name, ParamValue::Floats(values.to_vec()))
    }

    /// Set a boolean parameter.
    pub fn add_bool(&mut self, name: &str, value: bool) -> &mut Self {
        self.add(name, ParamValue::Bool(value))
    }

    /// Set a string parameter.
    pub fn add_string(&mut self, name: &str, value: &str) -> &mut Self {
        self.add(name, ParamValue::Str(value.to_owned()))
    }

    /// Raw value of a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Whether a parameter of this name exists (of any type).
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Parameter names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// The single integer named `name`, or `default` when it is absent, not
    /// an integer, or not exactly one value.
    pub fn find_one_int(&self, name: &str, default: i64) -> i64 {
        match self.get(name) {
            Some(ParamValue::Int(i)) => *i,
            Some(ParamValue::Ints(v)) if v.len() == 1 => v[0],
            _ => default,
        }
    }

    /// The single float named `name`. Integers are widened.
    pub fn find_one_float(&self, name: &str, default: f64) -> f64 {
        match self.find_floats(name) {
            Some(v) if v.len() == 1 => v[0],
            _ => default,
        }
    }

    /// The single boolean named `name`.
    pub fn find_one_bool(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(ParamValue::Bool(b)) => *b,
            Some(ParamValue::Bools(v)) if v.len() == 1 => v[0],
            _ => default,
        }
    }

    /// The single string named `name`.
    pub fn find_one_string(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Str(s)) => Some(s),
            Some(ParamValue::Strs(v)) if v.len() == 1 => Some(&v[0]),
            _ => None,
        }
    }

    /// All integers named `name`.
    pub fn find_ints(&self, name: &str) -> Option<Vec<i64>> {
        match self.get(name)? {
            ParamValue::Int(i) => Some(vec![*i]),
            ParamValue::Ints(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// All floats named `name`. Integer lists are widened so that scene
    /// files may write `[0, 1, 0]` for elevation data.
    pub fn find_floats(&self, name: &str) -> Option<Vec<f64>> {
        match self.get(name)? {
            ParamValue::Float(x) => Some(vec![*x]),
            ParamValue::Int(i) => Some(vec![*i as f64]),
            ParamValue::Floats(v) => Some(v.clone()),
            ParamValue::Ints(v) => Some(v.iter().map(|&i| i as f64).collect()),
            _ => None,
        }
    }
}
