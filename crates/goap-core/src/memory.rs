use core::fmt;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ConditionSet;

/// Semantic keys an agent can hold beliefs about.
///
/// The set is closed so that planners can compare states structurally. Hosts
/// that need extra facts use [`MemoryKey::Custom`] with their own numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MemoryKey {
    ItemLocated,
    IsHoldingItem,
    HasGatheredResource,
    ResourceGoalType,
    LowFuel,
    InventoryFull,
    AtTarget,
    TargetEntity,
    Custom(u16),
}

impl fmt::Display for MemoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryKey::ItemLocated => f.write_str("item_located"),
            MemoryKey::IsHoldingItem => f.write_str("is_holding_item"),
            MemoryKey::HasGatheredResource => f.write_str("has_gathered_resource"),
            MemoryKey::ResourceGoalType => f.write_str("resource_goal_type"),
            MemoryKey::LowFuel => f.write_str("low_fuel"),
            MemoryKey::InventoryFull => f.write_str("inventory_full"),
            MemoryKey::AtTarget => f.write_str("at_target"),
            MemoryKey::TargetEntity => f.write_str("target_entity"),
            MemoryKey::Custom(id) => write!(f, "custom#{id}"),
        }
    }
}

/// Opaque handle to a host-side entity (resource node, deposit, unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityRef(pub u64);

/// A single belief value.
///
/// Values are closed over the categories the planner can compare: flags,
/// integers, host enums (by discriminant) and entity references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MemoryValue {
    Bool(bool),
    Int(i64),
    Enum(u32),
    Ref(EntityRef),
}

impl MemoryValue {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            MemoryValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(self) -> Option<i64> {
        match self {
            MemoryValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(self) -> Option<u32> {
        match self {
            MemoryValue::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_entity(self) -> Option<EntityRef> {
        match self {
            MemoryValue::Ref(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for MemoryValue {
    fn from(value: bool) -> Self {
        MemoryValue::Bool(value)
    }
}

impl From<i64> for MemoryValue {
    fn from(value: i64) -> Self {
        MemoryValue::Int(value)
    }
}

impl From<EntityRef> for MemoryValue {
    fn from(value: EntityRef) -> Self {
        MemoryValue::Ref(value)
    }
}

impl fmt::Display for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryValue::Bool(v) => write!(f, "{v}"),
            MemoryValue::Int(v) => write!(f, "{v}"),
            MemoryValue::Enum(v) => write!(f, "enum({v})"),
            MemoryValue::Ref(r) => write!(f, "entity({})", r.0),
        }
    }
}

/// Per-agent belief blackboard.
///
/// A key is either unknown (no entry) or holds exactly one value; writes are
/// visible to the next read immediately. Only the owning agent mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    values: BTreeMap<MemoryKey, MemoryValue>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: MemoryKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Store `value` under `key`, returning the previous value if any.
    pub fn set(&mut self, key: MemoryKey, value: impl Into<MemoryValue>) -> Option<MemoryValue> {
        self.values.insert(key, value.into())
    }

    pub fn get(&self, key: MemoryKey) -> Option<MemoryValue> {
        self.values.get(&key).copied()
    }

    pub fn get_bool(&self, key: MemoryKey) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn get_int(&self, key: MemoryKey) -> Option<i64> {
        self.get(key)?.as_int()
    }

    pub fn get_enum(&self, key: MemoryKey) -> Option<u32> {
        self.get(key)?.as_enum()
    }

    pub fn get_entity(&self, key: MemoryKey) -> Option<EntityRef> {
        self.get(key)?.as_entity()
    }

    pub fn remove(&mut self, key: MemoryKey) -> Option<MemoryValue> {
        self.values.remove(&key)
    }

    /// Exact match test used for condition evaluation. Unknown keys never match.
    pub fn has(&self, key: MemoryKey, value: MemoryValue) -> bool {
        self.values.get(&key) == Some(&value)
    }

    pub fn satisfies(&self, conditions: &ConditionSet) -> bool {
        conditions.iter().all(|(key, value)| self.has(key, value))
    }

    /// Write every condition into memory (last writer wins).
    pub fn apply(&mut self, effects: &ConditionSet) {
        for (key, value) in effects.iter() {
            self.values.insert(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MemoryKey, MemoryValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

impl fmt::Display for Memory {
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

impl FromIterator<(MemoryKey, MemoryValue)> for Memory {
    fn from_iter<I: IntoIterator<Item = (MemoryKey, MemoryValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
