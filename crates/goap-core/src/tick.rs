/// Per-frame timing handed to sensors, goals and actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self { tick, dt_seconds }
    }

    /// The context for the frame after this one, with the same step length.
    pub fn next(self) -> Self {
        Self {
            tick: self.tick + 1,
            dt_seconds: self.dt_seconds,
        }
    }
}
