use goap_core::{ActionDescriptor, ActionId, ConditionSet, Memory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanStep {
    pub action: ActionId,
    pub cost: u32,
}

/// Ordered actions for one goal activation, first step first.
///
/// Plans are values: the runtime discards them on completion, failure or
/// replanning rather than editing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    target: ConditionSet,
    steps: Vec<PlanStep>,
    total_cost: u32,
}

impl Plan {
    pub fn new(target: ConditionSet, steps: Vec<PlanStep>) -> Self {
        let total_cost = steps
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.cost));
        Self {
            target,
            steps,
            total_cost,
        }
    }

    pub fn target(&self) -> &ConditionSet {
        &self.target
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&PlanStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_cost(&self) -> u32 {
        self.total_cost
    }

    pub fn action_ids(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.steps.iter().map(|s| s.action)
    }

    pub fn contains(&self, action: ActionId) -> bool {
        self.steps.iter().any(|s| s.action == action)
    }

    /// Predict the memory after running every step from `start`.
    ///
    /// Returns `None` if a step is not in `actions` or its preconditions do
    /// not hold when it would run.
    pub fn simulate(&self, start: &Memory, actions: &[ActionDescriptor]) -> Option<Memory> {
        let mut memory = start.clone();
        for step in self.steps.iter() {
            let action = actions.iter().find(|a| a.id == step.action)?;
            if !action.is_applicable(&memory) {
                return None;
            }
            action.apply(&mut memory);
        }
        Some(memory)
    }
}
