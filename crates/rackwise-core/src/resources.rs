//! Resource vectors: named quantities describing capacity, demand or
//! availability.
//!
//! Keys are free-form. The [`keys`] module names the ones the hardware
//! aggregator produces; deployments may define their own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;

/// Resource keys written by hardware aggregation.
pub mod keys {
    pub const CORES: &str = "cores";
    pub const MEMORY: &str = "memory";
    pub const NVME: &str = "nvme";
    pub const GPU: &str = "gpu";
    pub const VRAM: &str = "vram";
    pub const BANDWIDTH_GBPS: &str = "bandwidth_gbps";
}

/// Mapping from resource key to quantity, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(BTreeMap<String, Quantity>);

impl ResourceVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Quantity> {
        self.0.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set `key` to `value`, replacing any previous amount.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Quantity>) {
        self.0.insert(key.into(), value.into());
    }

    /// Add `value` to the running total for `key`, creating it if absent.
    pub fn add(&mut self, key: &str, value: Quantity) {
        match self.0.get_mut(key) {
            Some(total) => *total += value,
            None => {
                self.0.insert(key.to_string(), value);
            }
        }
    }

    /// Make sure `key` is present, leaving an existing amount untouched.
    pub fn ensure(&mut self, key: &str) {
        self.0.entry(key.to_string()).or_insert(Quantity::ZERO);
    }

    /// Add every entry of `other`, each multiplied by `count`.
    pub fn accumulate(&mut self, other: &ResourceVector, count: u32) {
        for (key, value) in other.iter() {
            self.add(key, value.times(count));
        }
    }

    /// Element-wise sum over the union of keys.
    pub fn plus(&self, other: &ResourceVector) -> ResourceVector {
        let mut sum = self.clone();
        sum.accumulate(other, 1);
        sum
    }

    /// Subtract `other` for every key of `self`.
    ///
    /// Keys missing from `other` subtract nothing. Keys only in `other`
    /// are not surfaced.
    pub fn minus(&self, other: &ResourceVector) -> ResourceVector {
        self.0
            .iter()
            .map(|(key, value)| {
                let taken = other.get(key).unwrap_or(Quantity::ZERO);
                (key.clone(), *value - taken)
            })
            .collect()
    }

    /// True if every key of `self` exists in `available` with at least
    /// the same amount.
    pub fn fits_within(&self, available: &ResourceVector) -> bool {
        self.shortfall(available).is_empty()
    }

    /// Keys of `self` that `available` lacks or cannot cover.
    pub fn shortfall(&self, available: &ResourceVector) -> Vec<String> {
        self.0
            .iter()
            .filter(|(key, required)| match available.get(key) {
                Some(have) => **required > have,
                None => true,
            })
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Quantity)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, Q> FromIterator<(K, Q)> for ResourceVector
where
    K: Into<String>,
    Q: Into<Quantity>,
{
    fn from_iter<I: IntoIterator<Item = (K, Q)>>(iter: I) -> Self {
        ResourceVector(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
