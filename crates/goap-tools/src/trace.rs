#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

/// Event tags emitted by the agent runtime.
pub mod tags {
    pub const GOAL_ACTIVATED: &str = "goal.activated";
    pub const GOAL_COMPLETED: &str = "goal.completed";
    pub const GOAL_PREEMPTED: &str = "goal.preempted";
    pub const GOAL_DROPPED: &str = "goal.dropped";
    pub const PLAN_FOUND: &str = "plan.found";
    pub const PLAN_FAILED: &str = "plan.failed";
    pub const PLAN_PENDING: &str = "plan.pending";
    pub const PLAN_COMPLETE: &str = "plan.complete";
    pub const PLAN_NO_PROGRESS: &str = "plan.no_progress";
    pub const ACTION_STARTED: &str = "action.started";
    pub const ACTION_COMPLETED: &str = "action.completed";
    pub const ACTION_FAILED: &str = "action.failed";
    pub const EXECUTOR_STOPPED: &str = "executor.stopped";
    pub const MODULE_REGISTERED: &str = "module.registered";
    pub const MODULE_UNREGISTERED: &str = "module.unregistered";
    pub const MODULE_MISCONFIGURED: &str = "module.misconfigured";
}

/// One agent decision, recorded as plain data.
///
/// `subject` names the goal, action or module involved. `a`/`b` carry small
/// numeric payloads whose meaning depends on the tag (priority, plan length,
/// plan cost, step index).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub agent: u64,
    pub tag: Cow<'static, str>,
    pub subject: Option<Cow<'static, str>>,
    pub a: i64,
    pub b: i64,
}

impl TraceEvent {
    pub fn new(tick: u64, agent: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            agent,
            tag: tag.into(),
            subject: None,
            a: 0,
            b: 0,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<Cow<'static, str>>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_a(mut self, a: i64) -> Self {
        self.a = a;
        self
    }

    pub fn with_b(mut self, b: i64) -> Self {
        self.b = b;
        self
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

/// Observer interface the agent reports to.
pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.tag == tag)
    }

    pub fn count(&self, tag: &str) -> usize {
        self.with_tag(tag).count()
    }

    pub fn contains(&self, tag: &str, subject: &str) -> bool {
        self.with_tag(tag).any(|e| e.subject() == Some(subject))
    }

    /// Tags in emission order, handy for asserting on decision sequences.
    pub fn tags(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.tag.as_ref()).collect()
    }
}

/// A cloneable handle to a log the agent writes into while the host keeps
/// reading it.
#[derive(Debug, Default, Clone)]
pub struct SharedTraceLog(Rc<RefCell<TraceLog>>);

impl SharedTraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> TraceLog {
        self.0.borrow().clone()
    }

    pub fn count(&self, tag: &str) -> usize {
        self.0.borrow().count(tag)
    }

    pub fn contains(&self, tag: &str, subject: &str) -> bool {
        self.0.borrow().contains(tag, subject)
    }

    pub fn clear(&self) {
        self.0.borrow_mut().events.clear();
    }
}

impl TraceSink for SharedTraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}
