//! Tick counter and publish cadence

/// Counts ticks and simulated time, and decides when to publish
#[derive(Debug, Clone)]
pub struct SimulationClock {
    tick: u64,
    elapsed: f32,
    publish_interval: u32,
}

impl SimulationClock {
    pub fn new(publish_interval: u32) -> Self {
        Self {
            tick: 0,
            elapsed: 0.0,
            publish_interval: publish_interval.max(1),
        }
    }

    /// Start the next tick. Returns its number, counting from 1.
    pub fn advance(&mut self, delta_secs: f32) -> u64 {
        self.tick += 1;
        self.elapsed += delta_secs;
        self.tick
    }

    /// Whether the current tick is a publish tick
    pub fn should_publish(&self) -> bool {
        self.tick % u64::from(self.publish_interval) == 0
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
