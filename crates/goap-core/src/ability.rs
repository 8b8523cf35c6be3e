use core::fmt;
use std::collections::BTreeSet;

/// Declared type of a capability a unit can provide (movement, gathering, ...).
///
/// Actions and goals list the abilities they need; the agent checks them once
/// when the module is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AbilityKind(pub &'static str);

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The first required ability a module could not find on its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingAbility(pub AbilityKind);

/// Abilities the owning unit exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbilitySet {
    kinds: BTreeSet<AbilityKind>,
}

impl AbilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: AbilityKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    pub fn insert(&mut self, kind: AbilityKind) -> bool {
        self.kinds.insert(kind)
    }

    pub fn remove(&mut self, kind: AbilityKind) -> bool {
        self.kinds.remove(&kind)
    }

    pub fn contains(&self, kind: AbilityKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = AbilityKind> + '_ {
        self.kinds.iter().copied()
    }

    /// Check every required ability, reporting the first one missing.
    pub fn check(&self, required: &[AbilityKind]) -> Result<(), MissingAbility> {
        match required.iter().find(|k| !self.contains(**k)) {
            Some(kind) => Err(MissingAbility(*kind)),
            None => Ok(()),
        }
    }
}

impl FromIterator<AbilityKind> for AbilitySet {
    fn from_iter<I: IntoIterator<Item = AbilityKind>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}
