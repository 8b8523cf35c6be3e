use core::fmt;

use goap_core::{ActionId, ActionStatus, Memory, TickContext, WorldMut};
use goap_planner::{Plan, PlanStep};

use crate::{ActionLibrary, ExecutorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutorState {
    #[default]
    Idle,
    Running,
    Paused,
    Complete,
    Failed,
}

impl ExecutorState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutorState::Complete | ExecutorState::Failed)
    }

    /// Running or paused: an action is currently entered.
    pub fn is_active(self) -> bool {
        matches!(self, ExecutorState::Running | ExecutorState::Paused)
    }
}

impl fmt::Display for ExecutorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExecutorState::Idle => "idle",
            ExecutorState::Running => "running",
            ExecutorState::Paused => "paused",
            ExecutorState::Complete => "complete",
            ExecutorState::Failed => "failed",
        })
    }
}

/// What a transition produced, for the agent to log and trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorEvent {
    /// `action` at `step` finished and the next step has been started.
    StepComplete { action: ActionId, step: usize },

    /// The last step finished (`None` for an empty plan).
    PlanComplete { action: Option<ActionId> },

    /// `action` at `step` reported failure or could not be found.
    ActionFailed { action: ActionId, step: usize },
}

/// Runs one [`Plan`] at a time, one action per step.
///
/// ```text
/// Idle -> Running -> Complete | Failed
///            ^  |
///            |  v
///           Paused
/// ```
///
/// Actions live in the agent's [`ActionLibrary`]; the executor only holds the
/// plan and a cursor into it. Every action that is entered is stopped exactly
/// once when it leaves, so a stopped executor never has a live action.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    state: ExecutorState,
    plan: Option<Plan>,
    step: usize,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn current_step(&self) -> Option<usize> {
        self.state.is_active().then_some(self.step)
    }

    pub fn current_action(&self) -> Option<ActionId> {
        let step = self.current_step()?;
        Some(self.plan.as_ref()?.step(step)?.action)
    }

    /// Steps not yet finished, the current one included.
    pub fn remaining(&self) -> &[PlanStep] {
        match (self.state.is_active(), self.plan.as_ref()) {
            (true, Some(plan)) => &plan.steps()[self.step..],
            _ => &[],
        }
    }

    /// True while the running plan still has `action` ahead of or at the cursor.
    pub fn references(&self, action: ActionId) -> bool {
        self.remaining().iter().any(|s| s.action == action)
    }

    pub fn start<W>(
        &mut self,
        plan: Plan,
        library: &mut ActionLibrary<W>,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        memory: &mut Memory,
    ) -> Result<Option<ExecutorEvent>, ExecutorError>
    where
        W: WorldMut + 'static,
    {
        self.expect(ExecutorState::Idle, "start")?;

        self.plan = Some(plan);
        self.step = 0;
        Ok(self.enter_step(library, ctx, agent, world, memory))
    }

    /// Advance the current action by one frame.
    pub fn tick<W>(
        &mut self,
        library: &mut ActionLibrary<W>,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        memory: &mut Memory,
    ) -> Result<Option<ExecutorEvent>, ExecutorError>
    where
        W: WorldMut + 'static,
    {
        self.expect(ExecutorState::Running, "tick")?;

        let step = self.step;
        let Some(id) = self.current_action() else {
            self.state = ExecutorState::Complete;
            return Ok(Some(ExecutorEvent::PlanComplete { action: None }));
        };
        let Some(action) = library.get_mut(id) else {
            self.state = ExecutorState::Failed;
            return Ok(Some(ExecutorEvent::ActionFailed { action: id, step }));
        };

        match action.tick(ctx, agent, world, memory) {
            ActionStatus::Running => Ok(None),
            ActionStatus::Failed => {
                action.stop(ctx, agent, world, memory);
                self.state = ExecutorState::Failed;
                Ok(Some(ExecutorEvent::ActionFailed { action: id, step }))
            }
            ActionStatus::Complete => {
                action.stop(ctx, agent, world, memory);
                self.step += 1;
                match self.enter_step(library, ctx, agent, world, memory) {
                    Some(ExecutorEvent::PlanComplete { .. }) => {
                        Ok(Some(ExecutorEvent::PlanComplete { action: Some(id) }))
                    }
                    None => Ok(Some(ExecutorEvent::StepComplete { action: id, step })),
                    failed => Ok(failed),
                }
            }
        }
    }

    pub fn pause<W>(
        &mut self,
        library: &mut ActionLibrary<W>,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        memory: &mut Memory,
    ) -> Result<(), ExecutorError>
    where
        W: WorldMut + 'static,
    {
        self.expect(ExecutorState::Running, "pause")?;
        if let Some(action) = self.current_action().and_then(|id| library.get_mut(id)) {
            action.pause(ctx, agent, world, memory);
        }
        self.state = ExecutorState::Paused;
        Ok(())
    }

    /// Re-enter the paused action through its `start` hook.
    pub fn resume<W>(
        &mut self,
        library: &mut ActionLibrary<W>,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        memory: &mut Memory,
    ) -> Result<(), ExecutorError>
    where
        W: WorldMut + 'static,
    {
        self.expect(ExecutorState::Paused, "resume")?;
        if let Some(action) = self.current_action().and_then(|id| library.get_mut(id)) {
            action.start(ctx, agent, world, memory);
        }
        self.state = ExecutorState::Running;
        Ok(())
    }

    /// Stop the current action (if any), drop the plan and return to `Idle`.
    ///
    /// Valid from every state and idempotent. Returns whether an action was
    /// stopped.
    pub fn stop<W>(
        &mut self,
        library: &mut ActionLibrary<W>,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        memory: &mut Memory,
    ) -> bool
    where
        W: WorldMut + 'static,
    {
        let stopped = match self.current_action().and_then(|id| library.get_mut(id)) {
            Some(action) => {
                action.stop(ctx, agent, world, memory);
                true
            }
            None => false,
        };

        self.state = ExecutorState::Idle;
        self.plan = None;
        self.step = 0;
        stopped
    }

    fn enter_step<W>(
        &mut self,
        library: &mut ActionLibrary<W>,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        memory: &mut Memory,
    ) -> Option<ExecutorEvent>
    where
        W: WorldMut + 'static,
    {
        let next = self
            .plan
            .as_ref()
            .and_then(|plan| plan.step(self.step))
            .map(|s| s.action);
        let Some(id) = next else {
            self.state = ExecutorState::Complete;
            return Some(ExecutorEvent::PlanComplete { action: None });
        };

        match library.get_mut(id) {
            Some(action) => {
                action.start(ctx, agent, world, memory);
                self.state = ExecutorState::Running;
                None
            }
            None => {
                self.state = ExecutorState::Failed;
                Some(ExecutorEvent::ActionFailed {
                    action: id,
                    step: self.step,
                })
            }
        }
    }

    fn expect(&self, state: ExecutorState, op: &'static str) -> Result<(), ExecutorError> {
        if self.state == state {
            Ok(())
        } else {
            Err(ExecutorError::InvalidTransition {
                op,
                state: self.state,
            })
        }
    }
}
