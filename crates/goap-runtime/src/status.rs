use core::fmt;

use goap_core::{AbilityKind, ActionId, GoalKind, Memory};

use crate::{AgentError, ExecutorState};

/// Read-only snapshot of an agent, built on demand by
/// [`Agent::status`](crate::Agent::status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStatus {
    pub agent: u64,
    pub tick: u64,
    pub active_goal: Option<GoalKind>,
    pub executor: ExecutorState,
    pub current_step: Option<usize>,
    pub current_action: Option<ActionId>,
    pub plan: Vec<ActionId>,
    pub planning: bool,
    pub memory: Memory,
    pub unschedulable: Vec<(&'static str, AbilityKind)>,
    pub last_error: Option<AgentError>,
}

impl AgentStatus {
    pub fn is_idle(&self) -> bool {
        self.active_goal.is_none() && !self.executor.is_active() && !self.planning
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "agent {} @ tick {}", self.agent, self.tick)?;

        match self.active_goal {
            Some(goal) => writeln!(f, "  goal: {goal}")?,
            None => writeln!(f, "  goal: none")?,
        }

        write!(f, "  executor: {}", self.executor)?;
        if let (Some(step), Some(action)) = (self.current_step, self.current_action) {
            write!(f, " (step {}/{}: {action})", step + 1, self.plan.len())?;
        }
        writeln!(f)?;

        if self.planning {
            writeln!(f, "  plan: searching")?;
        } else if self.plan.is_empty() {
            writeln!(f, "  plan: none")?;
        } else {
            let names: Vec<&str> = self.plan.iter().map(|a| a.0).collect();
            writeln!(f, "  plan: {}", names.join(" -> "))?;
        }

        write!(f, "  memory: {}", self.memory)?;

        for (module, ability) in self.unschedulable.iter() {
            write!(f, "\n  unschedulable: {module} (needs {ability})")?;
        }
        if let Some(err) = self.last_error.as_ref() {
            write!(f, "\n  last error: {err}")?;
        }
        Ok(())
    }
}
