//! Deterministic, engine-agnostic GOAP primitives.
//!
//! This crate holds the data model shared by the planner and the runtime:
//! the per-agent [`Memory`] blackboard, immutable [`ConditionSet`]s, and the
//! [`Action`], [`Goal`] and [`Sensor`] seams that host code implements.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod ability;
pub mod action;
pub mod condition;
pub mod goal;
pub mod memory;
pub mod sensor;
pub mod tick;
pub mod world;

pub use ability::{AbilityKind, AbilitySet, MissingAbility};
pub use action::{Action, ActionDescriptor, ActionId, ActionStatus};
pub use condition::ConditionSet;
pub use goal::{Goal, GoalKind, StaticGoal};
pub use memory::{EntityRef, Memory, MemoryKey, MemoryValue};
pub use sensor::Sensor;
pub use tick::TickContext;
pub use world::{AgentId, WorldMut, WorldView};
