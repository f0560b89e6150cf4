use std::thread;
use std::time::Duration;

/// Stand-in for a fixed-cost unit of work: sleep for the configured
/// delay, then square the input. The delay dominates the runtime, so
/// measured times scale with how many of these run concurrently.
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    delay: Duration,
}

impl Workload {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn square(&self, x: u64) -> u64 {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        x * x
    }
}
