use core::fmt;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Memory, MemoryKey, MemoryValue};

/// Immutable, key-ordered set of required `key == value` pairs.
///
/// Used as goal targets, action preconditions and action effects. Equality is
/// structural. Later duplicates win when constructing from an iterator.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<(MemoryKey, MemoryValue)>"))]
#[cfg_attr(feature = "serde", serde(into = "Vec<(MemoryKey, MemoryValue)>"))]
pub struct ConditionSet {
    entries: Vec<(MemoryKey, MemoryValue)>,
}

impl ConditionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new<I, V>(conditions: I) -> Self
    where
        I: IntoIterator<Item = (MemoryKey, V)>,
        V: Into<MemoryValue>,
    {
        let map: BTreeMap<MemoryKey, MemoryValue> = conditions
            .into_iter()
            .map(|(k, v)| (k, v.into()))
            .collect();
        Self {
            entries: map.into_iter().collect(),
        }
    }

    pub fn single(key: MemoryKey, value: impl Into<MemoryValue>) -> Self {
        Self {
            entries: vec![(key, value.into())],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: MemoryKey) -> Option<MemoryValue> {
        self.entries
            .binary_search_by(|(k, _)| k.cmp(&key))
            .ok()
            .map(|i| self.entries[i].1)
    }

    pub fn contains_key(&self, key: MemoryKey) -> bool {
        self.get(key).is_some()
    }

    pub fn contains(&self, key: MemoryKey, value: MemoryValue) -> bool {
        self.get(key) == Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MemoryKey, MemoryValue)> + '_ {
        self.entries.iter().copied()
    }

    pub fn is_satisfied_by(&self, memory: &Memory) -> bool {
        memory.satisfies(self)
    }

    /// Conditions that do not currently hold in `memory` (unknown keys included).
    pub fn unsatisfied<'a>(
        &'a self,
        memory: &'a Memory,
    ) -> impl Iterator<Item = (MemoryKey, MemoryValue)> + 'a {
        self.iter().filter(move |(k, v)| !memory.has(*k, *v))
    }

    /// True when both sets constrain a shared key to different values.
    pub fn conflicts_with(&self, other: &ConditionSet) -> bool {
        self.iter()
            .any(|(k, v)| matches!(other.get(k), Some(o) if o != v))
    }
}

impl<V: Into<MemoryValue>> FromIterator<(MemoryKey, V)> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = (MemoryKey, V)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<(MemoryKey, MemoryValue)>> for ConditionSet {
    fn from(value: Vec<(MemoryKey, MemoryValue)>) -> Self {
        Self::new(value)
    }
}

impl From<ConditionSet> for Vec<(MemoryKey, MemoryValue)> {
    fn from(value: ConditionSet) -> Self {
        value.entries
    }
}

impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}
