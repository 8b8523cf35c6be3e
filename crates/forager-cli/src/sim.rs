use std::collections::BTreeMap;

use anyhow::{Context, Result};
use goap_core::{AbilitySet, EntityRef, TickContext};
use goap_runtime::{Agent, AgentStatus};
use goap_tools::{tags, SharedTraceLog};
use tracing::info;

use crate::actions::{FindResource, GatherResource, PickupItem, Refuel};
use crate::goals::{GatherGoal, RefuelGoal};
use crate::scenario::{parse_ability, Scenario, ScenarioEvent, UnitSpec};
use crate::sensors::{CargoSensor, FuelSensor};
use crate::world::{ForagerWorld, ResourceNode, Unit};

/// The world plus one agent per unit, stepped in agent-id order.
pub struct Simulation {
    world: ForagerWorld,
    agents: Vec<Agent<ForagerWorld>>,
    abilities: BTreeMap<u64, AbilitySet>,
    events: Vec<ScenarioEvent>,
    ctx: TickContext,
    trace: SharedTraceLog,
}

impl Simulation {
    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        let mut world = ForagerWorld::new(scenario.deposit, scenario.pump);
        world.nodes = scenario
            .nodes
            .iter()
            .map(|n| ResourceNode {
                id: EntityRef(n.id),
                kind: n.resource,
                position: n.position,
                amount: n.amount,
            })
            .collect();

        let trace = SharedTraceLog::new();
        let mut agents = Vec::with_capacity(scenario.units.len());
        let mut abilities = BTreeMap::new();
        for spec in scenario.units.iter() {
            world.units.insert(
                spec.id,
                Unit {
                    position: spec.position,
                    speed: spec.speed,
                    fuel: spec.fuel,
                    fuel_capacity: spec.fuel_capacity,
                    burn_per_move: spec.burn_per_move,
                    carrying: None,
                },
            );

            let set = spec.ability_set()?;
            let agent = build_agent(spec, scenario, set.clone(), trace.clone())
                .with_context(|| format!("Failed to configure unit {}", spec.id))?;
            abilities.insert(spec.id, set);
            agents.push(agent);
        }
        agents.sort_by_key(|a| a.id());

        let mut events = scenario.events.clone();
        events.sort_by_key(|e| e.tick);

        Ok(Self {
            world,
            agents,
            abilities,
            events,
            ctx: TickContext::new(0, scenario.dt_seconds),
            trace,
        })
    }

    pub fn world(&self) -> &ForagerWorld {
        &self.world
    }

    pub fn agents(&self) -> &[Agent<ForagerWorld>] {
        &self.agents
    }

    pub fn agent(&self, id: u64) -> Option<&Agent<ForagerWorld>> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn trace(&self) -> &SharedTraceLog {
        &self.trace
    }

    /// The tick the next [`Simulation::step`] will run.
    pub fn tick(&self) -> u64 {
        self.ctx.tick
    }

    pub fn step(&mut self) -> Result<()> {
        let tick = self.ctx.tick;
        let due: Vec<ScenarioEvent> = self
            .events
            .iter()
            .filter(|e| e.tick == tick)
            .cloned()
            .collect();
        for event in due {
            self.apply_event(&event)?;
        }

        for agent in self.agents.iter_mut() {
            agent.tick(&self.ctx, &mut self.world);
        }
        self.ctx = self.ctx.next();
        Ok(())
    }

    pub fn run(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    /// Step until every agent with a goal has finished its first search.
    pub fn run_until_planned(&mut self, max_ticks: u64) -> Result<()> {
        for _ in 0..max_ticks {
            self.step()?;
            let log = self.trace.snapshot();
            let settled = self.agents.iter().all(|a| {
                a.active_goal().is_none()
                    || log.events.iter().any(|e| {
                        e.agent == a.id()
                            && (e.tag == tags::PLAN_FOUND || e.tag == tags::PLAN_FAILED)
                    })
            });
            if settled {
                break;
            }
        }
        Ok(())
    }

    pub fn statuses(&self) -> Vec<AgentStatus> {
        self.agents.iter().map(|a| a.status()).collect()
    }

    fn apply_event(&mut self, event: &ScenarioEvent) -> Result<()> {
        let set = self
            .abilities
            .get_mut(&event.unit)
            .with_context(|| format!("event names unknown unit {}", event.unit))?;
        if let Some(name) = event.grant.as_deref() {
            set.insert(parse_ability(name)?);
        }
        if let Some(name) = event.revoke.as_deref() {
            set.remove(parse_ability(name)?);
        }
        let set = set.clone();

        info!(
            tick = event.tick,
            unit = event.unit,
            grant = ?event.grant,
            revoke = ?event.revoke,
            "abilities changed"
        );
        if let Some(agent) = self.agents.iter_mut().find(|a| a.id() == event.unit) {
            agent.set_abilities(set);
        }
        Ok(())
    }
}

fn build_agent(
    spec: &UnitSpec,
    scenario: &Scenario,
    abilities: AbilitySet,
    trace: SharedTraceLog,
) -> Result<Agent<ForagerWorld>> {
    let mut agent = Agent::new(spec.id)
        .with_config(scenario.agent)
        .with_abilities(abilities)
        .with_trace(trace);

    agent.add_sensor(FuelSensor::new(spec.low_fuel_below));
    agent.add_sensor(CargoSensor::new(spec.resource, spec.quota));

    agent.register_goal(RefuelGoal::new())?;
    agent.register_goal(GatherGoal::new(spec.resource))?;

    agent.register_action(FindResource::new())?;
    agent.register_action(PickupItem::new(spec.harvest_ticks))?;
    agent.register_action(GatherResource::new())?;
    agent.register_action(Refuel::new())?;
    Ok(agent)
}
