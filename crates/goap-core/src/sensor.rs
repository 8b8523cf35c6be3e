use crate::{Memory, TickContext, WorldMut};

/// Polls the host world and records observations in the agent's memory.
///
/// Sensors run once per think tick, before goal selection. They may add,
/// update or remove keys; they never touch another agent's memory.
pub trait Sensor<W>: 'static
where
    W: WorldMut + 'static,
{
    fn poll(&mut self, ctx: &TickContext, agent: W::Agent, world: &W, memory: &mut Memory);
}

impl<W, F> Sensor<W> for F
where
    W: WorldMut + 'static,
    F: FnMut(&TickContext, W::Agent, &W, &mut Memory) + 'static,
{
    fn poll(&mut self, ctx: &TickContext, agent: W::Agent, world: &W, memory: &mut Memory) {
        self(ctx, agent, world, memory)
    }
}
