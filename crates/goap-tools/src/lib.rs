//! Tooling primitives for GOAP agents.
//!
//! Agents report what they decide through a [`TraceSink`] injected at
//! construction. The events are plain data so tooling (status panels, replay
//! viewers, tests) can record and render them without depending on the
//! runtime.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{tags, NullTraceSink, SharedTraceLog, TraceEvent, TraceLog, TraceSink, VecTraceSink};
