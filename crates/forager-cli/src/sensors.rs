use goap_core::{Memory, MemoryKey, Sensor, TickContext};

use crate::world::{ForagerWorld, ResourceKind};

/// Writes `LowFuel` from the unit's tank level.
#[derive(Debug, Clone)]
pub struct FuelSensor {
    threshold: f32,
}

impl FuelSensor {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl Sensor<ForagerWorld> for FuelSensor {
    fn poll(&mut self, _ctx: &TickContext, agent: u64, world: &ForagerWorld, memory: &mut Memory) {
        if let Some(unit) = world.unit(agent) {
            memory.set(MemoryKey::LowFuel, unit.fuel < self.threshold);
        }
    }
}

/// Tracks cargo, node stock and the delivery quota.
///
/// A finished delivery keeps `HasGatheredResource` set for one poll so the
/// gather goal completes; the poll after that clears it again until the
/// quota is reached, which re-opens the goal for another trip.
#[derive(Debug, Clone)]
pub struct CargoSensor {
    resource: ResourceKind,
    quota: u32,
    acknowledged: bool,
}

impl CargoSensor {
    pub fn new(resource: ResourceKind, quota: u32) -> Self {
        Self {
            resource,
            quota,
            acknowledged: false,
        }
    }
}

impl Sensor<ForagerWorld> for CargoSensor {
    fn poll(&mut self, _ctx: &TickContext, agent: u64, world: &ForagerWorld, memory: &mut Memory) {
        let Some(unit) = world.unit(agent) else {
            return;
        };
        memory.set(MemoryKey::IsHoldingItem, unit.carrying.is_some());

        if let Some(target) = memory.get_entity(MemoryKey::TargetEntity) {
            let stocked = world.node(target).is_some_and(|n| n.amount > 0);
            if !stocked {
                memory.remove(MemoryKey::TargetEntity);
                memory.set(MemoryKey::ItemLocated, false);
            }
        }

        if world.deposited(self.resource) >= self.quota {
            memory.set(MemoryKey::HasGatheredResource, true);
            return;
        }
        match memory.get_bool(MemoryKey::HasGatheredResource) {
            Some(true) if self.acknowledged => {
                memory.set(MemoryKey::HasGatheredResource, false);
                self.acknowledged = false;
            }
            Some(true) => self.acknowledged = true,
            _ => {
                memory.set(MemoryKey::HasGatheredResource, false);
            }
        }
    }
}
