//! Agent configuration loading.

use std::path::Path;

use anyhow::{Context, Result};
use goap_core::AgentId;
use goap_planner::PlannerConfig;
use serde::{Deserialize, Serialize};

/// Per-agent runtime settings, usually loaded from YAML.
///
/// ```yaml
/// planner:
///   max_expansions: 2048
///   expansions_per_tick: 64
/// think_every_ticks: 4
/// replan_cooldown_ticks: 2
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub planner: PlannerConfig,

    /// Sensors, goal selection and planning run every N ticks; the executor
    /// still steps every tick.
    #[serde(default = "default_think_every_ticks")]
    pub think_every_ticks: u32,

    /// Extra ticks to wait before planning again after a planning failure.
    pub replan_cooldown_ticks: u32,
}

fn default_think_every_ticks() -> u32 {
    1
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            think_every_ticks: default_think_every_ticks(),
            replan_cooldown_ticks: 0,
        }
    }
}

impl AgentConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read agent config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse agent config from {}", path.display()))?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse agent config")
    }

    /// Whether `agent` thinks on `tick`. Agents are staggered by id so that a
    /// crowd sharing one cadence does not plan on the same frame.
    pub fn should_think(&self, agent: impl AgentId, tick: u64) -> bool {
        let every = self.think_every_ticks.max(1) as u64;
        let offset = agent.stable_id() % every;
        (tick + offset) % every == 0
    }
}
