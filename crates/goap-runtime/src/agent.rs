use goap_core::{
    AbilityKind, AbilitySet, Action, ActionId, AgentId, Goal, GoalKind, Memory, Sensor,
    TickContext, WorldMut,
};
use goap_planner::{GoapPlanner, Plan, PlanSearch};
use goap_tools::{tags, NullTraceSink, TraceEvent, TraceSink};
use tracing::{debug, error, info, warn};

use crate::{
    ActionLibrary, AgentConfig, AgentError, AgentStatus, Executor, ExecutorError, ExecutorEvent,
    ExecutorState, GoalSet,
};

/// An action that failed, with the memory it failed against.
#[derive(Debug, Clone)]
struct FailedAction {
    action: ActionId,
    memory: Memory,
}

/// One unit's decision loop: sensors, goal selection, planning and execution.
///
/// Per think tick the agent polls its sensors, re-selects the most urgent
/// unsatisfied goal and (re)plans if the goal changed or the previous plan
/// ended. The executor steps the current plan every tick, think tick or not.
///
/// Nothing here returns an error from [`Agent::tick`]: planning failures and
/// action failures leave the agent idle until a later tick, and are reported
/// through `tracing` and the injected [`TraceSink`].
pub struct Agent<W>
where
    W: WorldMut + 'static,
{
    id: W::Agent,
    config: AgentConfig,
    planner: GoapPlanner,
    abilities: AbilitySet,
    memory: Memory,
    sensors: Vec<Box<dyn Sensor<W>>>,
    goals: GoalSet<W>,
    actions: ActionLibrary<W>,
    executor: Executor,
    trace: Box<dyn TraceSink>,

    active_goal: Option<GoalKind>,
    needs_plan: bool,
    search: Option<PlanSearch>,
    next_plan_tick: u64,
    failure: Option<FailedAction>,
    last_error: Option<AgentError>,
    last_tick: u64,
}

impl<W> Agent<W>
where
    W: WorldMut + 'static,
{
    pub fn new(id: W::Agent) -> Self {
        Self {
            id,
            config: AgentConfig::default(),
            planner: GoapPlanner::default(),
            abilities: AbilitySet::new(),
            memory: Memory::new(),
            sensors: Vec::new(),
            goals: GoalSet::new(),
            actions: ActionLibrary::new(),
            executor: Executor::new(),
            trace: Box::new(NullTraceSink),
            active_goal: None,
            needs_plan: false,
            search: None,
            next_plan_tick: 0,
            failure: None,
            last_error: None,
            last_tick: 0,
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self.planner = GoapPlanner::new(config.planner);
        self
    }

    /// Abilities must be set before modules are registered; use
    /// [`Agent::set_abilities`] to change them afterwards.
    pub fn with_abilities(mut self, abilities: AbilitySet) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_trace(mut self, trace: impl TraceSink + 'static) -> Self {
        self.trace = Box::new(trace);
        self
    }

    pub fn with_memory(mut self, memory: Memory) -> Self {
        self.memory = memory;
        self
    }

    pub fn id(&self) -> W::Agent {
        self.id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn abilities(&self) -> &AbilitySet {
        &self.abilities
    }

    pub fn goals(&self) -> &GoalSet<W> {
        &self.goals
    }

    pub fn actions(&self) -> &ActionLibrary<W> {
        &self.actions
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn active_goal(&self) -> Option<GoalKind> {
        self.active_goal
    }

    pub fn is_planning(&self) -> bool {
        self.search.is_some()
    }

    pub fn last_error(&self) -> Option<&AgentError> {
        self.last_error.as_ref()
    }

    pub fn add_sensor(&mut self, sensor: impl Sensor<W>) {
        self.sensors.push(Box::new(sensor));
    }

    /// Attach a goal. It is considered from the next think tick on.
    ///
    /// A goal whose abilities are missing is kept but never selected until
    /// [`Agent::set_abilities`] provides them.
    pub fn register_goal(&mut self, goal: impl Goal<W>) -> Result<(), AgentError> {
        let kind = goal.kind();
        let missing = self.goals.register(Box::new(goal), &self.abilities)?;
        self.emit(self.event(tags::MODULE_REGISTERED).with_subject(kind.0));
        debug!(agent = self.id.stable_id(), goal = %kind, "goal registered");
        if let Some(missing) = missing {
            self.report_misconfigured(kind.0, missing.0);
        }
        Ok(())
    }

    /// Detach a goal. If it is the active goal, it is dropped on the next
    /// think tick and its plan is stopped.
    pub fn unregister_goal(&mut self, kind: GoalKind) -> Result<(), AgentError> {
        self.goals.unregister(kind)?;
        self.emit(self.event(tags::MODULE_UNREGISTERED).with_subject(kind.0));
        debug!(agent = self.id.stable_id(), goal = %kind, "goal unregistered");
        Ok(())
    }

    /// Attach an action. It is offered to the planner from the next planning
    /// cycle on; plans already running are not changed.
    pub fn register_action(&mut self, action: impl Action<W>) -> Result<(), AgentError> {
        let id = action.id();
        let missing = self.actions.register(Box::new(action), &self.abilities)?;
        self.emit(self.event(tags::MODULE_REGISTERED).with_subject(id.0));
        debug!(agent = self.id.stable_id(), action = %id, "action registered");
        if let Some(missing) = missing {
            self.report_misconfigured(id.0, missing.0);
        }
        Ok(())
    }

    /// Retire an action. A running plan that uses it still finishes with it;
    /// the instance is released before the next plan is searched.
    pub fn unregister_action(&mut self, id: ActionId) -> Result<(), AgentError> {
        self.actions.unregister(id)?;
        self.emit(self.event(tags::MODULE_UNREGISTERED).with_subject(id.0));
        debug!(agent = self.id.stable_id(), action = %id, "action unregistered");
        Ok(())
    }

    /// Replace the unit's abilities and re-validate every attached module.
    pub fn set_abilities(&mut self, abilities: AbilitySet) {
        self.abilities = abilities;

        let goals = self.goals.reattach(&self.abilities);
        let actions = self.actions.reattach(&self.abilities);
        let changed = goals
            .into_iter()
            .map(|(kind, missing)| (kind.0, missing))
            .chain(actions.into_iter().map(|(id, missing)| (id.0, missing)));

        for (module, missing) in changed.collect::<Vec<_>>() {
            match missing {
                Some(ability) => self.report_misconfigured(module, ability),
                None => {
                    info!(agent = self.id.stable_id(), module, "module is now schedulable");
                    self.emit(self.event(tags::MODULE_REGISTERED).with_subject(module));
                }
            }
        }
    }

    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) {
        self.last_tick = ctx.tick;

        if self.config.should_think(self.id, ctx.tick) {
            for sensor in self.sensors.iter_mut() {
                sensor.poll(ctx, self.id, world, &mut self.memory);
            }
            self.update_goal(ctx, world);
            self.update_plan(ctx, world);
        }

        if self.executor.state() == ExecutorState::Running {
            self.tick_executor(ctx, world);
        }
    }

    pub fn pause(&mut self, ctx: &TickContext, world: &mut W) -> Result<(), ExecutorError> {
        self.executor.pause(&mut self.actions, ctx, self.id, world, &mut self.memory)
    }

    pub fn resume(&mut self, ctx: &TickContext, world: &mut W) -> Result<(), ExecutorError> {
        self.executor.resume(&mut self.actions, ctx, self.id, world, &mut self.memory)
    }

    /// Cancel the current plan. The agent plans again on its next think tick.
    pub fn stop(&mut self, ctx: &TickContext, world: &mut W) -> bool {
        let stopped = self.discard_plan(ctx, world);
        if self.active_goal.is_some() {
            self.needs_plan = true;
        }
        stopped
    }

    /// Snapshot of the agent for display; computed on every call.
    pub fn status(&self) -> AgentStatus {
        let unschedulable = self
            .goals
            .unschedulable()
            .map(|(kind, ability)| (kind.0, ability))
            .chain(self.actions.unschedulable().map(|(id, ability)| (id.0, ability)))
            .collect();

        AgentStatus {
            agent: self.id.stable_id(),
            tick: self.last_tick,
            active_goal: self.active_goal,
            executor: self.executor.state(),
            current_step: self.executor.current_step(),
            current_action: self.executor.current_action(),
            plan: self
                .executor
                .plan()
                .map(|p| p.action_ids().collect())
                .unwrap_or_default(),
            planning: self.search.is_some(),
            memory: self.memory.clone(),
            unschedulable,
            last_error: self.last_error.clone(),
        }
    }

    fn update_goal(&mut self, ctx: &TickContext, world: &mut W) {
        let selected = self.goals.select(&self.memory);
        if selected == self.active_goal {
            return;
        }

        if let Some(previous) = self.active_goal.take() {
            let agent = self.id.stable_id();
            let tag = match self.goals.get_mut(previous) {
                None => {
                    info!(agent, goal = %previous, "active goal was unregistered");
                    tags::GOAL_DROPPED
                }
                Some(goal) if goal.is_satisfied(&self.memory) => {
                    info!(agent, goal = %previous, "goal completed");
                    tags::GOAL_COMPLETED
                }
                Some(goal) => {
                    goal.reset(ctx, self.id, world, &mut self.memory);
                    info!(agent, goal = %previous, next = ?selected.map(|g| g.0), "goal preempted");
                    tags::GOAL_PREEMPTED
                }
            };
            self.emit(self.event(tag).with_subject(previous.0));
            self.discard_plan(ctx, world);
        }

        let Some(next) = selected else {
            self.needs_plan = false;
            return;
        };
        let Some(goal) = self.goals.get_mut(next) else {
            return;
        };
        goal.setup(ctx, self.id, world, &mut self.memory);
        let priority = goal.priority();

        info!(agent = self.id.stable_id(), goal = %next, priority, "goal activated");
        self.emit(
            self.event(tags::GOAL_ACTIVATED)
                .with_subject(next.0)
                .with_a(i64::from(priority)),
        );

        self.active_goal = Some(next);
        self.needs_plan = true;
        self.next_plan_tick = 0;
        self.failure = None;
    }

    fn update_plan(&mut self, ctx: &TickContext, world: &mut W) {
        let Some(kind) = self.active_goal else {
            return;
        };

        match self.executor.state() {
            ExecutorState::Running | ExecutorState::Paused => return,
            ExecutorState::Complete => {
                let satisfied = self
                    .goals
                    .get(kind)
                    .is_some_and(|goal| goal.is_satisfied(&self.memory));
                if !satisfied {
                    warn!(
                        agent = self.id.stable_id(),
                        goal = %kind,
                        "plan completed without satisfying its goal; replanning"
                    );
                    self.emit(self.event(tags::PLAN_NO_PROGRESS).with_subject(kind.0));
                }
                self.discard_plan(ctx, world);
                self.needs_plan = true;
            }
            ExecutorState::Failed => {
                self.discard_plan(ctx, world);
                self.needs_plan = true;
            }
            ExecutorState::Idle => {}
        }

        if !self.needs_plan || ctx.tick < self.next_plan_tick {
            return;
        }

        // A search spanning ticks is only valid for the memory it started from.
        let stale = self
            .search
            .as_ref()
            .is_some_and(|search| search.memory() != &self.memory);
        if stale {
            debug!(
                agent = self.id.stable_id(),
                goal = %kind,
                "memory changed; restarting search"
            );
            self.search = None;
        }

        if self.search.is_none() {
            self.search = self.begin_search(kind);
        }
        let Some(search) = self.search.as_mut() else {
            return;
        };

        let budget = self.config.planner.expansions_per_tick.unwrap_or(usize::MAX);
        match search.step(budget) {
            None => {
                let expansions = search.expansions();
                debug!(
                    agent = self.id.stable_id(),
                    goal = %kind,
                    expansions,
                    "planning continues next tick"
                );
                self.emit(
                    self.event(tags::PLAN_PENDING)
                        .with_subject(kind.0)
                        .with_a(expansions as i64),
                );
            }
            Some(Ok(plan)) => {
                self.search = None;
                self.needs_plan = false;
                self.start_plan(kind, plan, ctx, world);
            }
            Some(Err(err)) => {
                self.search = None;
                self.next_plan_tick = ctx.tick + 1 + self.config.replan_cooldown_ticks as u64;
                warn!(
                    agent = self.id.stable_id(),
                    goal = %kind,
                    error = %err,
                    retry_at = self.next_plan_tick,
                    "planning failed; idling"
                );
                self.emit(self.event(tags::PLAN_FAILED).with_subject(kind.0));
                self.last_error = Some(err.into());
            }
        }
    }

    fn begin_search(&mut self, kind: GoalKind) -> Option<PlanSearch> {
        let executor = &self.executor;
        let purged = self.actions.purge_retired(|id| executor.references(id));
        if purged > 0 {
            debug!(agent = self.id.stable_id(), purged, "released retired actions");
        }

        // A failed action stays excluded until memory moves away from the
        // state it failed in.
        let excluded = self
            .failure
            .as_ref()
            .filter(|failure| failure.memory == self.memory)
            .map(|failure| failure.action);
        if excluded.is_none() {
            self.failure = None;
        }

        let target = self.goals.get(kind)?.target().clone();
        let descriptors = self.actions.descriptors(excluded);
        Some(self.planner.search(self.memory.clone(), target, descriptors))
    }

    fn start_plan(&mut self, kind: GoalKind, plan: Plan, ctx: &TickContext, world: &mut W) {
        debug!(
            agent = self.id.stable_id(),
            goal = %kind,
            steps = plan.len(),
            cost = plan.total_cost(),
            "plan found"
        );
        self.emit(
            self.event(tags::PLAN_FOUND)
                .with_subject(kind.0)
                .with_a(plan.len() as i64)
                .with_b(plan.total_cost() as i64),
        );

        match self
            .executor
            .start(plan, &mut self.actions, ctx, self.id, world, &mut self.memory)
        {
            Ok(event) => {
                self.trace_started();
                if let Some(event) = event {
                    self.on_executor_event(event, ctx, world);
                }
            }
            Err(err) => {
                error!(agent = self.id.stable_id(), error = %err, "could not start plan");
            }
        }
    }

    fn tick_executor(&mut self, ctx: &TickContext, world: &mut W) {
        match self
            .executor
            .tick(&mut self.actions, ctx, self.id, world, &mut self.memory)
        {
            Ok(Some(event)) => {
                let failed = matches!(event, ExecutorEvent::ActionFailed { .. });
                self.on_executor_event(event, ctx, world);
                if failed {
                    self.update_plan(ctx, world);
                }
            }
            Ok(None) => {}
            Err(err) => {
                error!(agent = self.id.stable_id(), error = %err, "executor tick rejected");
            }
        }
    }

    fn on_executor_event(&mut self, event: ExecutorEvent, ctx: &TickContext, world: &mut W) {
        let agent = self.id.stable_id();
        match event {
            ExecutorEvent::StepComplete { action, step } => {
                debug!(agent, action = %action, step, "action completed");
                self.emit(
                    self.event(tags::ACTION_COMPLETED)
                        .with_subject(action.0)
                        .with_a(step as i64),
                );
                self.trace_started();
            }
            ExecutorEvent::PlanComplete { action } => {
                if let Some(action) = action {
                    debug!(agent, action = %action, "action completed");
                    let step = self.executor.plan().map_or(0, |p| p.len().saturating_sub(1));
                    self.emit(
                        self.event(tags::ACTION_COMPLETED)
                            .with_subject(action.0)
                            .with_a(step as i64),
                    );
                }
                debug!(agent, goal = ?self.active_goal.map(|g| g.0), "plan complete");
                let event = self.event(tags::PLAN_COMPLETE);
                let event = match self.active_goal {
                    Some(goal) => event.with_subject(goal.0),
                    None => event,
                };
                self.emit(event);
            }
            ExecutorEvent::ActionFailed { action, step } => {
                warn!(agent, action = %action, step, "action failed; replanning");
                self.emit(
                    self.event(tags::ACTION_FAILED)
                        .with_subject(action.0)
                        .with_a(step as i64),
                );
                self.last_error = Some(AgentError::ActionFailed { action, step });

                self.discard_plan(ctx, world);
                self.failure = Some(FailedAction {
                    action,
                    memory: self.memory.clone(),
                });
                self.needs_plan = true;
                self.next_plan_tick = 0;
            }
        }
    }

    /// Stop the executor and drop any pending search.
    fn discard_plan(&mut self, ctx: &TickContext, world: &mut W) -> bool {
        self.search = None;
        let stopped = self
            .executor
            .stop(&mut self.actions, ctx, self.id, world, &mut self.memory);
        if stopped {
            debug!(agent = self.id.stable_id(), "executor stopped");
            self.emit(self.event(tags::EXECUTOR_STOPPED));
        }
        stopped
    }

    fn report_misconfigured(&mut self, module: &'static str, ability: AbilityKind) {
        error!(
            agent = self.id.stable_id(),
            module,
            ability = %ability,
            "module requires an ability the unit does not provide; it will not be scheduled"
        );
        self.emit(self.event(tags::MODULE_MISCONFIGURED).with_subject(module));
        self.last_error = Some(AgentError::MisconfiguredAgent { module, ability });
    }

    fn trace_started(&mut self) {
        let (Some(action), Some(step)) =
            (self.executor.current_action(), self.executor.current_step())
        else {
            return;
        };
        debug!(agent = self.id.stable_id(), action = %action, step, "action started");
        self.emit(
            self.event(tags::ACTION_STARTED)
                .with_subject(action.0)
                .with_a(step as i64),
        );
    }

    fn event(&self, tag: &'static str) -> TraceEvent {
        TraceEvent::new(self.last_tick, self.id.stable_id(), tag)
    }

    fn emit(&mut self, event: TraceEvent) {
        self.trace.emit(event);
    }
}
