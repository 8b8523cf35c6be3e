//! Umbrella crate that re-exports the `goap-*` building blocks.
//!
//! - [`core`]: memory, conditions and the `Action`/`Goal`/`Sensor` seams.
//! - [`planner`]: the backward-chaining planner.
//! - [`runtime`]: the per-unit `Agent` and its executor.
//! - [`tools`]: trace events and sinks.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use goap_core as core;

#[cfg(feature = "planner")]
#[cfg_attr(docsrs, doc(cfg(feature = "planner")))]
pub use goap_planner as planner;

#[cfg(feature = "runtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "runtime")))]
pub use goap_runtime as runtime;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use goap_tools as tools;

/// The types most hosts need, in one import.
#[cfg(feature = "runtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "runtime")))]
pub mod prelude {
    pub use goap_core::{
        AbilityKind, AbilitySet, Action, ActionDescriptor, ActionId, ActionStatus, ConditionSet,
        EntityRef, Goal, GoalKind, Memory, MemoryKey, MemoryValue, Sensor, StaticGoal,
        TickContext, WorldMut, WorldView,
    };
    pub use goap_planner::{GoapPlanner, Plan, PlannerConfig, PlanningFailed};
    pub use goap_runtime::{Agent, AgentConfig, AgentError, AgentStatus, ExecutorState};
    pub use goap_tools::{tags, SharedTraceLog, TraceEvent, TraceSink};
}
