use core::fmt;

use crate::{AbilityKind, ConditionSet, Memory, TickContext, WorldMut};

/// Explicit goal type used for exclusivity: an agent holds at most one goal
/// of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoalKind(pub &'static str);

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A prioritized, declarative target world-state.
///
/// `setup` runs when the goal becomes the active selection. `reset` runs only
/// when the goal is deactivated in favour of a higher-priority one; a goal
/// that completes and later becomes unsatisfied again is simply re-selected.
pub trait Goal<W>: 'static
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> GoalKind;

    fn priority(&self) -> i32;

    fn target(&self) -> &ConditionSet;

    fn required_abilities(&self) -> &[AbilityKind] {
        &[]
    }

    fn is_satisfied(&self, memory: &Memory) -> bool {
        memory.satisfies(self.target())
    }

    fn setup(&mut self, _ctx: &TickContext, _agent: W::Agent, _world: &W, _memory: &mut Memory) {}

    fn reset(&mut self, _ctx: &TickContext, _agent: W::Agent, _world: &W, _memory: &mut Memory) {}
}

/// A goal with no hooks: just a kind, a priority and a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticGoal {
    pub kind: GoalKind,
    pub priority: i32,
    pub target: ConditionSet,
}

impl StaticGoal {
    pub fn new(kind: GoalKind, priority: i32, target: ConditionSet) -> Self {
        Self {
            kind,
            priority,
            target,
        }
    }
}

impl<W> Goal<W> for StaticGoal
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> GoalKind {
        self.kind
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn target(&self) -> &ConditionSet {
        &self.target
    }
}
