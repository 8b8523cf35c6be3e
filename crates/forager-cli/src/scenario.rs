//! YAML scenario files.

use std::path::Path;

use anyhow::{bail, Context, Result};
use goap_core::{AbilityKind, AbilitySet};
use goap_runtime::AgentConfig;
use serde::{Deserialize, Serialize};

use crate::actions::{FUEL_PUMP, MOVEMENT};
use crate::world::ResourceKind;

/// A complete simulation setup.
///
/// ```yaml
/// ticks: 60
/// deposit: 0.0
/// pump: -2.0
/// agent:
///   think_every_ticks: 1
/// nodes:
///   - { id: 10, resource: wood, position: 4.0, amount: 3 }
/// units:
///   - id: 1
///     resource: wood
///     quota: 2
///     abilities: [movement, fuel_pump]
/// events:
///   - { tick: 30, unit: 1, revoke: fuel_pump }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default = "default_ticks")]
    pub ticks: u64,

    #[serde(default = "default_dt")]
    pub dt_seconds: f32,

    #[serde(default)]
    pub deposit: f32,

    #[serde(default)]
    pub pump: f32,

    #[serde(default)]
    pub nodes: Vec<NodeSpec>,

    pub units: Vec<UnitSpec>,

    /// Ability changes applied at the start of a tick, before agents run.
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: u64,
    pub resource: ResourceKind,
    pub position: f32,
    pub amount: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: u64,

    #[serde(default)]
    pub position: f32,

    #[serde(default = "default_speed")]
    pub speed: f32,

    #[serde(default = "default_fuel")]
    pub fuel: f32,

    #[serde(default = "default_fuel")]
    pub fuel_capacity: f32,

    #[serde(default = "default_burn")]
    pub burn_per_move: f32,

    /// `LowFuel` is set while the tank holds less than this.
    #[serde(default = "default_low_fuel")]
    pub low_fuel_below: f32,

    #[serde(default = "default_harvest_ticks")]
    pub harvest_ticks: u32,

    pub resource: ResourceKind,

    #[serde(default = "default_quota")]
    pub quota: u32,

    #[serde(default)]
    pub abilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub tick: u64,
    pub unit: u64,

    #[serde(default)]
    pub grant: Option<String>,

    #[serde(default)]
    pub revoke: Option<String>,
}

fn default_ticks() -> u64 {
    100
}
fn default_dt() -> f32 {
    0.1
}
fn default_speed() -> f32 {
    1.0
}
fn default_fuel() -> f32 {
    10.0
}
fn default_burn() -> f32 {
    0.5
}
fn default_low_fuel() -> f32 {
    2.0
}
fn default_harvest_ticks() -> u32 {
    1
}
fn default_quota() -> u32 {
    1
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario from {}", path.display()))?;
        let scenario = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to load scenario from {}", path.display()))?;
        Ok(scenario)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let scenario: Self = serde_yaml::from_str(content).context("Failed to parse scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        if self.units.is_empty() {
            bail!("scenario has no units");
        }
        for (i, unit) in self.units.iter().enumerate() {
            if self.units[..i].iter().any(|u| u.id == unit.id) {
                bail!("unit id {} is used twice", unit.id);
            }
            unit.ability_set()?;
        }
        for event in self.events.iter() {
            if !self.units.iter().any(|u| u.id == event.unit) {
                bail!("event at tick {} names unknown unit {}", event.tick, event.unit);
            }
            for name in event.grant.iter().chain(event.revoke.iter()) {
                parse_ability(name)?;
            }
        }
        Ok(())
    }
}

impl UnitSpec {
    pub fn ability_set(&self) -> Result<AbilitySet> {
        self.abilities.iter().map(|name| parse_ability(name)).collect()
    }
}

/// Abilities a scenario may hand to a unit.
pub fn parse_ability(name: &str) -> Result<AbilityKind> {
    match name {
        "movement" => Ok(MOVEMENT),
        "fuel_pump" => Ok(FUEL_PUMP),
        other => bail!("unknown ability `{other}`"),
    }
}
