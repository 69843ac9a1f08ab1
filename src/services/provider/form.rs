//! Stripe-style form parameters.
//!
//! Nested values use bracket keys (`address[city]`, `items[0][price]`) and
//! list values repeat a `[]` key (`expand[]`). The pairs are handed to
//! reqwest as either a urlencoded body or a query string.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    pub fn push_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// `prefix[name]=value` for each entry, in key order
    pub fn push_map(&mut self, prefix: &str, map: &HashMap<String, String>) -> &mut Self {
        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort();
        for key in keys {
            self.push(format!("{}[{}]", prefix, key), &map[key]);
        }
        self
    }

    /// `expand[]=path` for each path
    pub fn expand(&mut self, paths: &[&str]) -> &mut Self {
        for path in paths {
            self.push("expand[]", path);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// Joins nested keys: `key("shipping", "address")` is `shipping[address]`
pub fn key(prefix: &str, name: &str) -> String {
    format!("{}[{}]", prefix, name)
}
