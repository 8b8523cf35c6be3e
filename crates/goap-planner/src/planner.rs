use core::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use goap_core::{ActionDescriptor, ConditionSet, Memory};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Plan, PlanStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlanningFailed {
    #[error("no action chain reaches the goal")]
    Exhausted,

    #[error("search exceeded {limit} node expansions")]
    ExpansionLimit { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Node expansions allowed per search before giving up.
    pub max_expansions: usize,

    /// When set, callers driving a [`PlanSearch`] should step it at most this
    /// many expansions per tick and resume next tick.
    pub expansions_per_tick: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_expansions: 4096,
            expansions_per_tick: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoapPlanner {
    config: PlannerConfig,
}

impl GoapPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan to completion within the current call.
    pub fn plan(
        &self,
        memory: &Memory,
        target: &ConditionSet,
        actions: &[ActionDescriptor],
    ) -> Result<Plan, PlanningFailed> {
        let mut search = self.search(memory.clone(), target.clone(), actions.to_vec());
        loop {
            if let Some(result) = search.step(usize::MAX) {
                return result;
            }
        }
    }

    /// Start a resumable search over a snapshot of `memory` and `actions`.
    pub fn search(
        &self,
        memory: Memory,
        target: ConditionSet,
        actions: Vec<ActionDescriptor>,
    ) -> PlanSearch {
        PlanSearch::new(memory, target, actions, self.config.max_expansions)
    }
}

#[derive(Debug, Clone)]
struct SearchNode {
    required: ConditionSet,
    cost: u32,
    parent: Option<usize>,
    action: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    cost: u32,
    open: usize,
    action: usize,
    seq: u64,
    node: usize,
}

impl OpenEntry {
    fn key(&self) -> (u32, usize, usize, u64) {
        (self.cost, self.open, self.action, self.seq)
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A best-first regression search that can be advanced in slices.
///
/// Nodes are sets of conditions that must hold before the remaining plan
/// runs. Expanding a node picks an action whose effects explain at least one
/// of those conditions without contradicting any other; the predecessor
/// requires the rest of the conditions plus the action's preconditions. A
/// node whose conditions all hold in the snapshot is terminal. The same
/// action may appear more than once in a plan.
///
/// Frontier order: accumulated cost, then fewer unsatisfied conditions, then
/// action registration order.
#[derive(Debug, Clone)]
pub struct PlanSearch {
    memory: Memory,
    target: ConditionSet,
    actions: Vec<ActionDescriptor>,
    max_expansions: usize,
    nodes: Vec<SearchNode>,
    open: BinaryHeap<OpenEntry>,
    best_cost: BTreeMap<ConditionSet, u32>,
    closed: BTreeSet<ConditionSet>,
    expansions: usize,
    seq: u64,
    result: Option<Result<Plan, PlanningFailed>>,
}

impl PlanSearch {
    fn new(
        memory: Memory,
        target: ConditionSet,
        actions: Vec<ActionDescriptor>,
        max_expansions: usize,
    ) -> Self {
        let mut search = Self {
            memory,
            target: target.clone(),
            actions,
            max_expansions,
            nodes: Vec::new(),
            open: BinaryHeap::new(),
            best_cost: BTreeMap::new(),
            closed: BTreeSet::new(),
            expansions: 0,
            seq: 0,
            result: None,
        };
        search.push(SearchNode {
            required: target,
            cost: 0,
            parent: None,
            action: None,
        });
        search
    }

    pub fn target(&self) -> &ConditionSet {
        &self.target
    }

    /// The memory snapshot the search regresses towards.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn expansions(&self) -> usize {
        self.expansions
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Expand at most `budget` nodes. Returns `None` while the search is still
    /// pending; once finished, every call returns the same result.
    pub fn step(&mut self, budget: usize) -> Option<Result<Plan, PlanningFailed>> {
        if let Some(result) = self.result.as_ref() {
            return Some(result.clone());
        }

        let mut used = 0usize;
        while used < budget {
            let Some(entry) = self.open.pop() else {
                return self.finish(Err(PlanningFailed::Exhausted));
            };

            let required = self.nodes[entry.node].required.clone();
            if self.closed.contains(&required) {
                continue; // stale heap entry
            }

            if required.unsatisfied(&self.memory).next().is_none() {
                let plan = self.reconstruct(entry.node);
                return self.finish(Ok(plan));
            }

            self.expansions += 1;
            used += 1;
            if self.expansions > self.max_expansions {
                return self.finish(Err(PlanningFailed::ExpansionLimit {
                    limit: self.max_expansions,
                }));
            }

            self.closed.insert(required);
            self.expand(entry.node);
        }

        None
    }

    fn finish(
        &mut self,
        result: Result<Plan, PlanningFailed>,
    ) -> Option<Result<Plan, PlanningFailed>> {
        self.open.clear();
        self.result = Some(result.clone());
        Some(result)
    }

    fn expand(&mut self, index: usize) {
        let node = &self.nodes[index];

        let mut successors = Vec::new();
        for (action_index, action) in self.actions.iter().enumerate() {
            // Any required condition may be explained, including ones the
            // snapshot already holds: an earlier step can break them.
            let relevant = node
                .required
                .iter()
                .any(|(k, v)| action.effects.contains(k, v));
            if !relevant {
                continue;
            }

            // The action must not undo anything later steps rely on.
            if action.effects.conflicts_with(&node.required) {
                continue;
            }

            let remaining: Vec<_> = node
                .required
                .iter()
                .filter(|(k, _)| !action.effects.contains_key(*k))
                .collect();
            let remaining = ConditionSet::new(remaining);
            if action.preconditions.conflicts_with(&remaining) {
                continue;
            }

            let required =
                ConditionSet::new(remaining.iter().chain(action.preconditions.iter()));
            if self.on_path(index, &required) {
                continue;
            }

            successors.push(SearchNode {
                required,
                cost: node.cost.saturating_add(action.cost),
                parent: Some(index),
                action: Some(action_index),
            });
        }

        for successor in successors {
            self.push(successor);
        }
    }

    /// Cycle guard: a predecessor may not repeat a condition set already
    /// required further along the same path.
    fn on_path(&self, from: usize, required: &ConditionSet) -> bool {
        let mut cursor = Some(from);
        while let Some(i) = cursor {
            let node = &self.nodes[i];
            if &node.required == required {
                return true;
            }
            cursor = node.parent;
        }
        false
    }

    fn push(&mut self, node: SearchNode) {
        if self.closed.contains(&node.required) {
            return;
        }
        if let Some(best) = self.best_cost.get(&node.required) {
            if *best <= node.cost {
                return;
            }
        }

        let open = node.required.unsatisfied(&self.memory).count();
        let entry = OpenEntry {
            cost: node.cost,
            open,
            action: node.action.unwrap_or(0),
            seq: self.seq,
            node: self.nodes.len(),
        };
        self.seq += 1;
        self.best_cost.insert(node.required.clone(), node.cost);
        self.nodes.push(node);
        self.open.push(entry);
    }

    fn reconstruct(&self, terminal: usize) -> Plan {
        // The action chosen last during regression runs first, so walking from
        // the terminal node back to the root yields execution order.
        let mut steps = Vec::new();
        let mut cursor = Some(terminal);
        while let Some(i) = cursor {
            let node = &self.nodes[i];
            if let Some(action_index) = node.action {
                let action = &self.actions[action_index];
                steps.push(PlanStep {
                    action: action.id,
                    cost: action.cost,
                });
            }
            cursor = node.parent;
        }
        Plan::new(self.target.clone(), steps)
    }
}
