use goap_core::{AbilityKind, ActionId, GoalKind};
use goap_planner::PlanningFailed;
use thiserror::Error;

use crate::ExecutorState;

/// Recoverable agent failures. None of these stop the agent: it idles and
/// retries on a later tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("goal type `{0}` is already registered")]
    DuplicateGoalType(GoalKind),

    #[error("action type `{0}` is already registered")]
    DuplicateModuleType(ActionId),

    #[error("`{module}` requires ability `{ability}` which the unit does not provide")]
    MisconfiguredAgent {
        module: &'static str,
        ability: AbilityKind,
    },

    #[error("no module `{0}` is registered")]
    UnknownModule(&'static str),

    #[error("planning failed: {0}")]
    PlanningFailed(#[from] PlanningFailed),

    #[error("action `{action}` failed at plan step {step}")]
    ActionFailed { action: ActionId, step: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecutorError {
    #[error("cannot {op} while the executor is {state}")]
    InvalidTransition {
        op: &'static str,
        state: ExecutorState,
    },
}
