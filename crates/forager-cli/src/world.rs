//! A one-dimensional gathering world.
//!
//! Units move along a line between resource nodes, a deposit and a fuel
//! pump. Moving burns fuel; a unit with an empty tank cannot move.

use std::collections::BTreeMap;
use std::fmt;

use goap_core::{EntityRef, WorldMut, WorldView};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Wood,
    Stone,
    Ore,
}

impl ResourceKind {
    /// Discriminant stored in memory under `ResourceGoalType`.
    pub fn code(self) -> u32 {
        match self {
            ResourceKind::Wood => 0,
            ResourceKind::Stone => 1,
            ResourceKind::Ore => 2,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(ResourceKind::Wood),
            1 => Some(ResourceKind::Stone),
            2 => Some(ResourceKind::Ore),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Wood => "wood",
            ResourceKind::Stone => "stone",
            ResourceKind::Ore => "ore",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    pub id: EntityRef,
    pub kind: ResourceKind,
    pub position: f32,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub position: f32,
    pub speed: f32,
    pub fuel: f32,
    pub fuel_capacity: f32,
    pub burn_per_move: f32,
    pub carrying: Option<ResourceKind>,
}

impl Unit {
    pub fn new(position: f32) -> Self {
        Self {
            position,
            speed: 1.0,
            fuel: 10.0,
            fuel_capacity: 10.0,
            burn_per_move: 0.5,
            carrying: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Moving,
    Arrived,
    OutOfFuel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObserverId(u64);

#[derive(Debug, Clone, PartialEq)]
struct ArrivalObserver {
    unit: u64,
    target: f32,
}

/// Host-side state shared by every unit.
#[derive(Debug, Clone, Default)]
pub struct ForagerWorld {
    pub units: BTreeMap<u64, Unit>,
    pub nodes: Vec<ResourceNode>,
    pub deposit: f32,
    pub pump: f32,
    pub deposited: BTreeMap<ResourceKind, u32>,
    observers: BTreeMap<ObserverId, ArrivalObserver>,
    next_observer: u64,
    arrivals: u64,
}

impl WorldView for ForagerWorld {
    type Agent = u64;
}

impl WorldMut for ForagerWorld {}

impl ForagerWorld {
    pub fn new(deposit: f32, pump: f32) -> Self {
        Self {
            deposit,
            pump,
            ..Self::default()
        }
    }

    pub fn unit(&self, id: u64) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: u64) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn node(&self, id: EntityRef) -> Option<&ResourceNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Closest node of `kind` that still has stock. Ties go to the node
    /// listed first.
    pub fn nearest_node(&self, kind: ResourceKind, from: f32) -> Option<&ResourceNode> {
        self.nodes
            .iter()
            .filter(|n| n.kind == kind && n.amount > 0)
            .fold(None, |best: Option<&ResourceNode>, node| match best {
                Some(b) if (b.position - from).abs() <= (node.position - from).abs() => Some(b),
                _ => Some(node),
            })
    }

    pub fn deposited(&self, kind: ResourceKind) -> u32 {
        self.deposited.get(&kind).copied().unwrap_or(0)
    }

    /// Register interest in `unit` reaching `target`. Must be released with
    /// [`ForagerWorld::unwatch`].
    pub fn watch_arrival(&mut self, unit: u64, target: f32) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.insert(id, ArrivalObserver { unit, target });
        id
    }

    pub fn unwatch(&mut self, id: ObserverId) -> bool {
        self.observers.remove(&id).is_some()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Arrivals reported to a registered observer so far.
    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    /// Move `unit` one step towards `target`, burning fuel.
    pub fn step_towards(&mut self, unit: u64, target: f32) -> Movement {
        let Some(state) = self.units.get_mut(&unit) else {
            return Movement::OutOfFuel;
        };

        let distance = target - state.position;
        let movement = if distance.abs() <= f32::EPSILON {
            Movement::Arrived
        } else if state.fuel < state.burn_per_move {
            Movement::OutOfFuel
        } else {
            state.fuel -= state.burn_per_move;
            if distance.abs() <= state.speed {
                state.position = target;
                Movement::Arrived
            } else {
                state.position += state.speed * distance.signum();
                Movement::Moving
            }
        };

        if movement == Movement::Arrived {
            let fired = self
                .observers
                .values()
                .filter(|o| o.unit == unit && (o.target - target).abs() <= f32::EPSILON)
                .count();
            self.arrivals += fired as u64;
        }
        movement
    }

    /// Take one item from `node` into `unit`'s cargo hold.
    pub fn harvest(&mut self, unit: u64, node: EntityRef) -> Option<ResourceKind> {
        let carrying = self.units.get(&unit)?.carrying;
        if carrying.is_some() {
            return None;
        }
        let node = self.nodes.iter_mut().find(|n| n.id == node && n.amount > 0)?;
        node.amount -= 1;
        let kind = node.kind;
        self.units.get_mut(&unit)?.carrying = Some(kind);
        Some(kind)
    }

    /// Drop `unit`'s cargo at the deposit.
    pub fn deposit(&mut self, unit: u64) -> Option<ResourceKind> {
        let kind = self.units.get_mut(&unit)?.carrying.take()?;
        *self.deposited.entry(kind).or_insert(0) += 1;
        Some(kind)
    }

    pub fn refill(&mut self, unit: u64) -> bool {
        match self.units.get_mut(&unit) {
            Some(state) => {
                state.fuel = state.fuel_capacity;
                true
            }
            None => false,
        }
    }
}
