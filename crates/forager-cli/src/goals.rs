use goap_core::{ConditionSet, Goal, GoalKind, Memory, MemoryKey, MemoryValue, TickContext};

use crate::world::{ForagerWorld, ResourceKind};

pub const GATHER: GoalKind = GoalKind("gather");
pub const MAINTAIN_FUEL: GoalKind = GoalKind("maintain_fuel");

/// Deliver one item of `resource` to the deposit.
#[derive(Debug, Clone)]
pub struct GatherGoal {
    resource: ResourceKind,
    target: ConditionSet,
}

impl GatherGoal {
    pub const PRIORITY: i32 = 10;

    pub fn new(resource: ResourceKind) -> Self {
        Self {
            resource,
            target: ConditionSet::single(MemoryKey::HasGatheredResource, true),
        }
    }

    pub fn resource(&self) -> ResourceKind {
        self.resource
    }
}

impl Goal<ForagerWorld> for GatherGoal {
    fn kind(&self) -> GoalKind {
        GATHER
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn target(&self) -> &ConditionSet {
        &self.target
    }

    fn setup(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        _world: &ForagerWorld,
        memory: &mut Memory,
    ) {
        memory.set(
            MemoryKey::ResourceGoalType,
            MemoryValue::Enum(self.resource.code()),
        );
    }

    /// Forget the located node so the next activation searches again.
    fn reset(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        _world: &ForagerWorld,
        memory: &mut Memory,
    ) {
        memory.remove(MemoryKey::ItemLocated);
        memory.remove(MemoryKey::TargetEntity);
    }
}

/// Keep the tank above the unit's low-fuel threshold.
#[derive(Debug, Clone)]
pub struct RefuelGoal {
    target: ConditionSet,
}

impl RefuelGoal {
    pub const PRIORITY: i32 = 50;

    pub fn new() -> Self {
        Self {
            target: ConditionSet::single(MemoryKey::LowFuel, false),
        }
    }
}

impl Default for RefuelGoal {
    fn default() -> Self {
        Self::new()
    }
}

impl Goal<ForagerWorld> for RefuelGoal {
    fn kind(&self) -> GoalKind {
        MAINTAIN_FUEL
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn target(&self) -> &ConditionSet {
        &self.target
    }
}
