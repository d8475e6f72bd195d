//! Player progression for the coffee shop game
//!
//! Tracks the gold and experience earned by serving customers.

use log::info;

/// Starting experience needed to reach level 2
pub const STARTING_LEVEL_XP: u32 = 100;

/// Growth of the level threshold after each level-up
pub const LEVEL_XP_GROWTH: f32 = 1.5;

/// Receives the rewards of a served order
pub trait ProgressionSink {
    fn add_gold(&mut self, amount: u32);
    fn add_xp(&mut self, amount: u32);
}

/// Player's gold, experience and level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    pub gold: u32,
    /// Experience toward the next level
    pub xp: u32,
    pub level: u32,
    pub next_level_xp: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub fn new() -> Self {
        Self {
            gold: 0,
            xp: 0,
            level: 1,
            next_level_xp: STARTING_LEVEL_XP,
        }
    }

    fn check_level_up(&mut self) {
        while self.xp >= self.next_level_xp {
            self.xp -= self.next_level_xp;
            self.level += 1;
            self.next_level_xp = ((self.next_level_xp as f32 * LEVEL_XP_GROWTH).floor() as u32).max(1);
            info!("Level up! Now level {}", self.level);
        }
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Gold: {} | Level {} ({}/{} XP)",
            self.gold, self.level, self.xp, self.next_level_xp
        )
    }
}

impl ProgressionSink for Progression {
    fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    fn add_xp(&mut self, amount: u32) {
        self.xp = self.xp.saturating_add(amount);
        self.check_level_up();
    }
}
