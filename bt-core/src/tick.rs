use std::time::Duration;

use crate::{Blackboard, Clock};

/// Everything a node may touch during one tick or halt.
pub struct TickContext<'a> {
    /// Index of the executor tick in progress.
    pub tick: u64,
    pub clock: &'a dyn Clock,
    pub blackboard: &'a mut Blackboard,
}

impl<'a> TickContext<'a> {
    pub fn new(tick: u64, clock: &'a dyn Clock, blackboard: &'a mut Blackboard) -> Self {
        Self {
            tick,
            clock,
            blackboard,
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }
}
