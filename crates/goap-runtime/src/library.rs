use goap_core::{
    AbilityKind, AbilitySet, Action, ActionDescriptor, ActionId, Goal, GoalKind, Memory,
    MissingAbility, WorldMut,
};

use crate::AgentError;

struct ActionEntry<W>
where
    W: WorldMut + 'static,
{
    action: Box<dyn Action<W>>,
    missing: Option<AbilityKind>,
    retired: bool,
}

/// The actions attached to one agent, in registration order.
///
/// Unregistering an action retires it: it stops being offered to the planner
/// at once, but the instance stays alive until [`ActionLibrary::purge_retired`]
/// runs with no plan referencing it.
pub struct ActionLibrary<W>
where
    W: WorldMut + 'static,
{
    entries: Vec<ActionEntry<W>>,
}

impl<W> Default for ActionLibrary<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<W> ActionLibrary<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attach `action`, checking its abilities against `abilities`.
    ///
    /// An action with a missing ability is still registered but never
    /// offered to the planner; the missing ability is returned so the caller
    /// can report it.
    pub fn register(
        &mut self,
        action: Box<dyn Action<W>>,
        abilities: &AbilitySet,
    ) -> Result<Option<MissingAbility>, AgentError> {
        let id = action.id();
        if self.entries.iter().any(|e| e.action.id() == id) {
            return Err(AgentError::DuplicateModuleType(id));
        }

        let missing = abilities.check(action.required_abilities()).err();
        self.entries.push(ActionEntry {
            action,
            missing: missing.map(|m| m.0),
            retired: false,
        });
        Ok(missing)
    }

    pub fn unregister(&mut self, id: ActionId) -> Result<(), AgentError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.action.id() == id && !e.retired)
            .ok_or(AgentError::UnknownModule(id.0))?;
        entry.retired = true;
        Ok(())
    }

    /// Drop retired actions that `in_use` does not reference.
    pub fn purge_retired(&mut self, in_use: impl Fn(ActionId) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.retired || in_use(e.action.id()));
        before - self.entries.len()
    }

    /// Re-check every action against `abilities`. Returns the actions whose
    /// schedulability changed, with their new missing ability (if any).
    pub fn reattach(&mut self, abilities: &AbilitySet) -> Vec<(ActionId, Option<AbilityKind>)> {
        let mut changed = Vec::new();
        for entry in self.entries.iter_mut() {
            let missing = abilities
                .check(entry.action.required_abilities())
                .err()
                .map(|m| m.0);
            if missing != entry.missing {
                entry.missing = missing;
                changed.push((entry.action.id(), missing));
            }
        }
        changed
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.entries.iter().any(|e| e.action.id() == id && !e.retired)
    }

    pub fn is_schedulable(&self, id: ActionId) -> bool {
        self.entries
            .iter()
            .any(|e| e.action.id() == id && !e.retired && e.missing.is_none())
    }

    pub fn get_mut(&mut self, id: ActionId) -> Option<&mut (dyn Action<W> + 'static)> {
        self.entries
            .iter_mut()
            .find(|e| e.action.id() == id)
            .map(|e| e.action.as_mut())
    }

    /// Planner inputs for every schedulable action, in registration order.
    pub fn descriptors(&self, excluded: Option<ActionId>) -> Vec<ActionDescriptor> {
        self.entries
            .iter()
            .filter(|e| !e.retired && e.missing.is_none())
            .filter(|e| Some(e.action.id()) != excluded)
            .map(|e| e.action.descriptor().clone())
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.entries
            .iter()
            .filter(|e| !e.retired)
            .map(|e| e.action.id())
    }

    pub fn unschedulable(&self) -> impl Iterator<Item = (ActionId, AbilityKind)> + '_ {
        self.entries
            .iter()
            .filter(|e| !e.retired)
            .filter_map(|e| e.missing.map(|m| (e.action.id(), m)))
    }
}

struct GoalEntry<W>
where
    W: WorldMut + 'static,
{
    goal: Box<dyn Goal<W>>,
    missing: Option<AbilityKind>,
}

/// The goals attached to one agent, at most one per [`GoalKind`].
pub struct GoalSet<W>
where
    W: WorldMut + 'static,
{
    entries: Vec<GoalEntry<W>>,
}

impl<W> Default for GoalSet<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<W> GoalSet<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn register(
        &mut self,
        goal: Box<dyn Goal<W>>,
        abilities: &AbilitySet,
    ) -> Result<Option<MissingAbility>, AgentError> {
        let kind = goal.kind();
        if self.contains(kind) {
            return Err(AgentError::DuplicateGoalType(kind));
        }

        let missing = abilities.check(goal.required_abilities()).err();
        self.entries.push(GoalEntry {
            goal,
            missing: missing.map(|m| m.0),
        });
        Ok(missing)
    }

    pub fn unregister(&mut self, kind: GoalKind) -> Result<Box<dyn Goal<W>>, AgentError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.goal.kind() == kind)
            .ok_or(AgentError::UnknownModule(kind.0))?;
        Ok(self.entries.remove(index).goal)
    }

    pub fn reattach(&mut self, abilities: &AbilitySet) -> Vec<(GoalKind, Option<AbilityKind>)> {
        let mut changed = Vec::new();
        for entry in self.entries.iter_mut() {
            let missing = abilities
                .check(entry.goal.required_abilities())
                .err()
                .map(|m| m.0);
            if missing != entry.missing {
                entry.missing = missing;
                changed.push((entry.goal.kind(), missing));
            }
        }
        changed
    }

    pub fn contains(&self, kind: GoalKind) -> bool {
        self.entries.iter().any(|e| e.goal.kind() == kind)
    }

    pub fn get(&self, kind: GoalKind) -> Option<&(dyn Goal<W> + 'static)> {
        self.entries
            .iter()
            .find(|e| e.goal.kind() == kind)
            .map(|e| e.goal.as_ref())
    }

    pub fn get_mut(&mut self, kind: GoalKind) -> Option<&mut (dyn Goal<W> + 'static)> {
        self.entries
            .iter_mut()
            .find(|e| e.goal.kind() == kind)
            .map(|e| e.goal.as_mut())
    }

    /// The highest-priority schedulable goal whose target does not hold.
    ///
    /// Equal priorities resolve to the earliest registration.
    pub fn select(&self, memory: &Memory) -> Option<GoalKind> {
        let mut best: Option<(i32, GoalKind)> = None;
        for entry in self.entries.iter() {
            if entry.missing.is_some() || entry.goal.is_satisfied(memory) {
                continue;
            }
            let priority = entry.goal.priority();
            if best.map_or(true, |(p, _)| priority > p) {
                best = Some((priority, entry.goal.kind()));
            }
        }
        best.map(|(_, kind)| kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = GoalKind> + '_ {
        self.entries.iter().map(|e| e.goal.kind())
    }

    pub fn unschedulable(&self) -> impl Iterator<Item = (GoalKind, AbilityKind)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.missing.map(|m| (e.goal.kind(), m)))
    }
}
