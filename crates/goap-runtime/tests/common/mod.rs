#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use goap_core::{
    AbilityKind, Action, ActionDescriptor, ActionId, ActionStatus, ConditionSet, Goal, GoalKind,
    Memory, MemoryKey, TickContext, WorldMut, WorldView,
};

pub const FIND: ActionId = ActionId("find_resource");
pub const PICKUP: ActionId = ActionId("pickup_item");
pub const PICKUP_SLOW: ActionId = ActionId("pickup_item_slowly");
pub const GATHER: ActionId = ActionId("gather_resource");
pub const REFUEL: ActionId = ActionId("refuel");

pub const GATHER_GOAL: GoalKind = GoalKind("gather");
pub const REFUEL_GOAL: GoalKind = GoalKind("refuel");

pub const FUEL_PUMP: AbilityKind = AbilityKind("fuel_pump");

/// Host world that counts live observers so tests can check that every
/// started action releases what it registered.
#[derive(Debug, Default)]
pub struct TestWorld {
    pub observers: i32,
    pub log: Vec<String>,
    pub failing: Vec<ActionId>,
}

impl WorldView for TestWorld {
    type Agent = u64;
}

impl WorldMut for TestWorld {}

impl TestWorld {
    pub fn ticks_of(&self, id: ActionId) -> usize {
        let entry = format!("tick:{id}");
        self.log.iter().filter(|l| **l == entry).count()
    }
}

/// Completes after `duration` ticks and then writes its declared effects.
pub struct ScriptedAction {
    descriptor: ActionDescriptor,
    abilities: Vec<AbilityKind>,
    duration: u32,
    progress: u32,
    observing: bool,
}

impl ScriptedAction {
    pub fn new(
        id: ActionId,
        cost: u32,
        preconditions: &[(MemoryKey, bool)],
        effects: &[(MemoryKey, bool)],
    ) -> Self {
        Self {
            descriptor: ActionDescriptor::new(id, cost)
                .with_preconditions(ConditionSet::new(preconditions.iter().copied()))
                .with_effects(ConditionSet::new(effects.iter().copied())),
            abilities: Vec::new(),
            duration: 1,
            progress: 0,
            observing: false,
        }
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration.max(1);
        self
    }

    pub fn requiring(mut self, ability: AbilityKind) -> Self {
        self.abilities.push(ability);
        self
    }

    fn release(&mut self, world: &mut TestWorld) {
        if self.observing {
            world.observers -= 1;
            self.observing = false;
        }
    }
}

impl Action<TestWorld> for ScriptedAction {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    fn required_abilities(&self) -> &[AbilityKind] {
        &self.abilities
    }

    fn start(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut TestWorld,
        _memory: &mut Memory,
    ) {
        world.log.push(format!("start:{}", self.descriptor.id));
        if !self.observing {
            world.observers += 1;
            self.observing = true;
        }
    }

    fn tick(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut TestWorld,
        memory: &mut Memory,
    ) -> ActionStatus {
        world.log.push(format!("tick:{}", self.descriptor.id));
        if world.failing.contains(&self.descriptor.id) {
            return ActionStatus::Failed;
        }

        self.progress += 1;
        if self.progress < self.duration {
            return ActionStatus::Running;
        }
        memory.apply(&self.descriptor.effects);
        ActionStatus::Complete
    }

    fn pause(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut TestWorld,
        _memory: &mut Memory,
    ) {
        world.log.push(format!("pause:{}", self.descriptor.id));
        self.release(world);
    }

    fn stop(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut TestWorld,
        _memory: &mut Memory,
    ) {
        world.log.push(format!("stop:{}", self.descriptor.id));
        self.progress = 0;
        self.release(world);
    }
}

pub fn find() -> ScriptedAction {
    ScriptedAction::new(FIND, 1, &[], &[(MemoryKey::ItemLocated, true)])
}

pub fn pickup() -> ScriptedAction {
    ScriptedAction::new(
        PICKUP,
        1,
        &[(MemoryKey::ItemLocated, true)],
        &[(MemoryKey::IsHoldingItem, true)],
    )
}

pub fn gather() -> ScriptedAction {
    ScriptedAction::new(
        GATHER,
        1,
        &[(MemoryKey::IsHoldingItem, true)],
        &[(MemoryKey::HasGatheredResource, true)],
    )
}

pub fn refuel() -> ScriptedAction {
    ScriptedAction::new(REFUEL, 1, &[], &[(MemoryKey::LowFuel, false)])
}

pub fn gather_target() -> ConditionSet {
    ConditionSet::single(MemoryKey::HasGatheredResource, true)
}

/// Goal that counts its lifecycle hooks.
pub struct CountingGoal {
    pub kind: GoalKind,
    pub priority: i32,
    pub target: ConditionSet,
    pub abilities: Vec<AbilityKind>,
    pub setups: Rc<Cell<u32>>,
    pub resets: Rc<Cell<u32>>,
}

impl CountingGoal {
    pub fn new(kind: GoalKind, priority: i32, target: ConditionSet) -> Self {
        Self {
            kind,
            priority,
            target,
            abilities: Vec::new(),
            setups: Rc::new(Cell::new(0)),
            resets: Rc::new(Cell::new(0)),
        }
    }
}

impl Goal<TestWorld> for CountingGoal {
    fn kind(&self) -> GoalKind {
        self.kind
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn target(&self) -> &ConditionSet {
        &self.target
    }

    fn required_abilities(&self) -> &[AbilityKind] {
        &self.abilities
    }

    fn setup(&mut self, _ctx: &TickContext, _agent: u64, _world: &TestWorld, _memory: &mut Memory) {
        self.setups.set(self.setups.get() + 1);
    }

    fn reset(&mut self, _ctx: &TickContext, _agent: u64, _world: &TestWorld, _memory: &mut Memory) {
        self.resets.set(self.resets.get() + 1);
    }
}

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.1)
}
