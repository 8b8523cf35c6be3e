//! Deterministic backward-chaining GOAP planner.
//!
//! The planner regresses from a goal's target conditions through action
//! effects until every open condition already holds in the agent's memory,
//! expanding the cheapest frontier node first.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod plan;
pub mod planner;

pub use plan::{Plan, PlanStep};
pub use planner::{GoapPlanner, PlanSearch, PlannerConfig, PlanningFailed};
