use core::fmt;

use crate::{AbilityKind, ConditionSet, Memory, TickContext, WorldMut};

/// Result of one step of a running action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Running,
    Complete,
    Failed,
}

impl ActionStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, ActionStatus::Running)
    }
}

/// Stable discriminant for an action type. At most one action per id may be
/// attached to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub &'static str);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Planner-facing declaration of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub id: ActionId,
    pub cost: u32,
    pub preconditions: ConditionSet,
    pub effects: ConditionSet,
}

impl ActionDescriptor {
    pub fn new(id: ActionId, cost: u32) -> Self {
        Self {
            id,
            cost,
            preconditions: ConditionSet::empty(),
            effects: ConditionSet::empty(),
        }
    }

    pub fn with_preconditions(mut self, preconditions: ConditionSet) -> Self {
        self.preconditions = preconditions;
        self
    }

    pub fn with_effects(mut self, effects: ConditionSet) -> Self {
        self.effects = effects;
        self
    }

    pub fn is_applicable(&self, memory: &Memory) -> bool {
        memory.satisfies(&self.preconditions)
    }

    pub fn apply(&self, memory: &mut Memory) {
        memory.apply(&self.effects);
    }
}

/// An atomic, resumable unit of work.
///
/// The executor drives an action through `start` → `tick`* → `stop`, with
/// optional `pause`/`start` pairs in between. `start` is also the resume hook,
/// so implementations that hold progress must not reset it there unless they
/// mean to.
///
/// `stop` is called once each time the action leaves the executor, whether it
/// completed, failed or was cancelled. It must release anything registered
/// with the world (arrival callbacks, reservations) before returning.
pub trait Action<W>: 'static
where
    W: WorldMut + 'static,
{
    fn descriptor(&self) -> &ActionDescriptor;

    fn id(&self) -> ActionId {
        self.descriptor().id
    }

    /// Abilities the owning unit must provide for this action to be schedulable.
    fn required_abilities(&self) -> &[AbilityKind] {
        &[]
    }

    fn start(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _memory: &mut Memory,
    ) {
    }

    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        memory: &mut Memory,
    ) -> ActionStatus;

    fn pause(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _memory: &mut Memory,
    ) {
    }

    fn stop(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _memory: &mut Memory,
    ) {
    }
}
