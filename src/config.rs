use crate::entities::FISH_COLORS;
use crate::error::GameError;

/// Tunables for one game.  `Default` matches the classic setup: ten rocks,
/// two snails, 30% / 80% wander chances.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub rocks: usize,
    pub snails: usize,
    /// Per-step chance that a calm missing fish wanders.
    pub wander_chance: f64,
    /// Per-step chance that a fast-scared missing fish wanders.
    pub fast_wander_chance: f64,
    /// Chance that a missing fish is created fast-scared.
    pub fast_scared_chance: f64,
    pub found_score: u32,
    pub fast_found_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            rocks: 10,
            snails: 2,
            wander_chance: 0.3,
            fast_wander_chance: 0.8,
            fast_scared_chance: 0.5,
            found_score: 10,
            fast_found_score: 25,
        }
    }
}

impl GameConfig {
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Number of cells setup must fill: home, rocks, snails, and one missing
    /// fish per non-player colour.  The player starts on home.
    pub fn cells_needed(&self) -> usize {
        1 + self.rocks + self.snails + (FISH_COLORS.len() - 1)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.width < 1 || self.height < 1 {
            return Err(GameError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        for (name, value) in [
            ("wander_chance", self.wander_chance),
            ("fast_wander_chance", self.fast_wander_chance),
            ("fast_scared_chance", self.fast_scared_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GameError::InvalidProbability { name, value });
            }
        }
        let available = self.width as usize * self.height as usize;
        let needed = self.cells_needed();
        if needed > available {
            return Err(GameError::GridTooSmall { needed, available });
        }
        Ok(())
    }
}
