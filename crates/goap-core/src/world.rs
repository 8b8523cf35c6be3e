use core::fmt::Debug;

/// Stable identifier for an agent.
///
/// Used for deterministic think staggering and as the `agent` field in logs
/// and trace events.
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Read-only access to the host world.
///
/// Movement, gathering timers and other engine services stay on the host
/// side; subsystems expose them through extension traits on the world type.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {}
