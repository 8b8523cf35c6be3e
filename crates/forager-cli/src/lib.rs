//! A gatherer simulation driven by the GOAP agent runtime.
//!
//! Units live on a line with resource nodes, a deposit and a fuel pump. Each
//! unit gets an [`goap_runtime::Agent`] with two goals (keep fuel up, deliver
//! resources) and four actions (find, pick up, deliver, refuel).

#![forbid(unsafe_code)]

pub mod actions;
pub mod goals;
pub mod scenario;
pub mod sensors;
pub mod sim;
pub mod world;

pub use scenario::Scenario;
pub use sim::Simulation;
pub use world::{ForagerWorld, ResourceKind};
