//! GOAP agent runtime.
//!
//! An [`Agent`] owns one unit's memory, sensors, goals and actions. Each tick
//! it polls sensors, re-selects the most urgent unsatisfied goal, plans with
//! `goap-planner` when needed and steps the current plan through the
//! [`Executor`] state machine.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod config;
pub mod error;
pub mod executor;
pub mod library;
pub mod status;

pub use agent::Agent;
pub use config::AgentConfig;
pub use error::{AgentError, ExecutorError};
pub use executor::{Executor, ExecutorEvent, ExecutorState};
pub use library::{ActionLibrary, GoalSet};
pub use status::AgentStatus;
