//! The gatherer's action library.

use goap_core::{
    AbilityKind, Action, ActionDescriptor, ActionId, ActionStatus, ConditionSet, Memory,
    MemoryKey, TickContext,
};
use tracing::trace;

use crate::world::{ForagerWorld, Movement, ObserverId, ResourceKind};

pub const MOVEMENT: AbilityKind = AbilityKind("movement");
pub const FUEL_PUMP: AbilityKind = AbilityKind("fuel_pump");

pub const FIND_RESOURCE: ActionId = ActionId("find_resource");
pub const PICKUP_ITEM: ActionId = ActionId("pickup_item");
pub const GATHER_RESOURCE: ActionId = ActionId("gather_resource");
pub const REFUEL: ActionId = ActionId("refuel");

/// An arrival callback held while a movement action is entered.
#[derive(Debug, Default)]
struct Arrival(Option<ObserverId>);

impl Arrival {
    fn watch(&mut self, world: &mut ForagerWorld, unit: u64, target: f32) {
        if self.0.is_none() {
            self.0 = Some(world.watch_arrival(unit, target));
        }
    }

    fn release(&mut self, world: &mut ForagerWorld) {
        if let Some(id) = self.0.take() {
            world.unwatch(id);
        }
    }
}

/// Picks the nearest stocked node of the goal's resource type.
#[derive(Debug)]
pub struct FindResource {
    descriptor: ActionDescriptor,
}

impl FindResource {
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor::new(FIND_RESOURCE, 1)
                .with_effects(ConditionSet::single(MemoryKey::ItemLocated, true)),
        }
    }
}

impl Default for FindResource {
    fn default() -> Self {
        Self::new()
    }
}

impl Action<ForagerWorld> for FindResource {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    fn tick(
        &mut self,
        _ctx: &TickContext,
        agent: u64,
        world: &mut ForagerWorld,
        memory: &mut Memory,
    ) -> ActionStatus {
        let Some(kind) = memory
            .get_enum(MemoryKey::ResourceGoalType)
            .and_then(ResourceKind::from_code)
        else {
            return ActionStatus::Failed;
        };
        let Some(position) = world.unit(agent).map(|u| u.position) else {
            return ActionStatus::Failed;
        };

        match world.nearest_node(kind, position) {
            Some(node) => {
                trace!(agent, node = node.id.0, resource = %kind, "resource located");
                memory.set(MemoryKey::TargetEntity, node.id);
                memory.set(MemoryKey::ItemLocated, true);
                ActionStatus::Complete
            }
            None => {
                memory.set(MemoryKey::ItemLocated, false);
                ActionStatus::Failed
            }
        }
    }
}

/// Walks to the located node and harvests one item.
#[derive(Debug)]
pub struct PickupItem {
    descriptor: ActionDescriptor,
    harvest_ticks: u32,
    progress: u32,
    arrival: Arrival,
}

impl PickupItem {
    pub fn new(harvest_ticks: u32) -> Self {
        Self {
            descriptor: ActionDescriptor::new(PICKUP_ITEM, 1)
                .with_preconditions(ConditionSet::single(MemoryKey::ItemLocated, true))
                .with_effects(ConditionSet::single(MemoryKey::IsHoldingItem, true)),
            harvest_ticks: harvest_ticks.max(1),
            progress: 0,
            arrival: Arrival::default(),
        }
    }
}

impl Action<ForagerWorld> for PickupItem {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    fn required_abilities(&self) -> &[AbilityKind] {
        &[MOVEMENT]
    }

    fn start(
        &mut self,
        _ctx: &TickContext,
        agent: u64,
        world: &mut ForagerWorld,
        memory: &mut Memory,
    ) {
        let target = memory
            .get_entity(MemoryKey::TargetEntity)
            .and_then(|id| world.node(id))
            .map(|node| node.position);
        if let Some(position) = target {
            self.arrival.watch(world, agent, position);
        }
    }

    fn tick(
        &mut self,
        _ctx: &TickContext,
        agent: u64,
        world: &mut ForagerWorld,
        memory: &mut Memory,
    ) -> ActionStatus {
        let Some(node) = memory
            .get_entity(MemoryKey::TargetEntity)
            .and_then(|id| world.node(id))
        else {
            return ActionStatus::Failed;
        };
        if node.amount == 0 {
            memory.set(MemoryKey::ItemLocated, false);
            return ActionStatus::Failed;
        }
        let (id, position) = (node.id, node.position);

        match world.step_towards(agent, position) {
            Movement::Moving => ActionStatus::Running,
            Movement::OutOfFuel => ActionStatus::Failed,
            Movement::Arrived => {
                self.progress += 1;
                if self.progress < self.harvest_ticks {
                    return ActionStatus::Running;
                }
                match world.harvest(agent, id) {
                    Some(kind) => {
                        trace!(agent, node = id.0, resource = %kind, "item picked up");
                        memory.set(MemoryKey::IsHoldingItem, true);
                        ActionStatus::Complete
                    }
                    None => ActionStatus::Failed,
                }
            }
        }
    }

    fn pause(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut ForagerWorld,
        _memory: &mut Memory,
    ) {
        self.arrival.release(world);
    }

    fn stop(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut ForagerWorld,
        _memory: &mut Memory,
    ) {
        self.progress = 0;
        self.arrival.release(world);
    }
}

/// Carries the held item to the deposit.
#[derive(Debug)]
pub struct GatherResource {
    descriptor: ActionDescriptor,
    arrival: Arrival,
}

impl GatherResource {
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor::new(GATHER_RESOURCE, 1)
                .with_preconditions(ConditionSet::single(MemoryKey::IsHoldingItem, true))
                .with_effects(ConditionSet::new([
                    (MemoryKey::HasGatheredResource, true),
                    (MemoryKey::IsHoldingItem, false),
                ])),
            arrival: Arrival::default(),
        }
    }
}

impl Default for GatherResource {
    fn default() -> Self {
        Self::new()
    }
}

impl Action<ForagerWorld> for GatherResource {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    fn required_abilities(&self) -> &[AbilityKind] {
        &[MOVEMENT]
    }

    fn start(
        &mut self,
        _ctx: &TickContext,
        agent: u64,
        world: &mut ForagerWorld,
        _memory: &mut Memory,
    ) {
        let deposit = world.deposit;
        self.arrival.watch(world, agent, deposit);
    }

    fn tick(
        &mut self,
        _ctx: &TickContext,
        agent: u64,
        world: &mut ForagerWorld,
        memory: &mut Memory,
    ) -> ActionStatus {
        let deposit = world.deposit;
        match world.step_towards(agent, deposit) {
            Movement::Moving => ActionStatus::Running,
            Movement::OutOfFuel => ActionStatus::Failed,
            Movement::Arrived => match world.deposit(agent) {
                Some(kind) => {
                    trace!(agent, resource = %kind, "item deposited");
                    memory.apply(&self.descriptor.effects);
                    ActionStatus::Complete
                }
                None => {
                    memory.set(MemoryKey::IsHoldingItem, false);
                    ActionStatus::Failed
                }
            },
        }
    }

    fn pause(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut ForagerWorld,
        _memory: &mut Memory,
    ) {
        self.arrival.release(world);
    }

    fn stop(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut ForagerWorld,
        _memory: &mut Memory,
    ) {
        self.arrival.release(world);
    }
}

/// Drives to the pump and fills the tank.
#[derive(Debug)]
pub struct Refuel {
    descriptor: ActionDescriptor,
    arrival: Arrival,
}

impl Refuel {
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor::new(REFUEL, 1)
                .with_effects(ConditionSet::single(MemoryKey::LowFuel, false)),
            arrival: Arrival::default(),
        }
    }
}

impl Default for Refuel {
    fn default() -> Self {
        Self::new()
    }
}

impl Action<ForagerWorld> for Refuel {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    fn required_abilities(&self) -> &[AbilityKind] {
        &[MOVEMENT, FUEL_PUMP]
    }

    fn start(
        &mut self,
        _ctx: &TickContext,
        agent: u64,
        world: &mut ForagerWorld,
        _memory: &mut Memory,
    ) {
        let pump = world.pump;
        self.arrival.watch(world, agent, pump);
    }

    fn tick(
        &mut self,
        _ctx: &TickContext,
        agent: u64,
        world: &mut ForagerWorld,
        memory: &mut Memory,
    ) -> ActionStatus {
        let pump = world.pump;
        match world.step_towards(agent, pump) {
            Movement::Moving => ActionStatus::Running,
            Movement::OutOfFuel => ActionStatus::Failed,
            Movement::Arrived if world.refill(agent) => {
                memory.set(MemoryKey::LowFuel, false);
                ActionStatus::Complete
            }
            Movement::Arrived => ActionStatus::Failed,
        }
    }

    fn pause(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut ForagerWorld,
        _memory: &mut Memory,
    ) {
        self.arrival.release(world);
    }

    fn stop(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut ForagerWorld,
        _memory: &mut Memory,
    ) {
        self.arrival.release(world);
    }
}
