use std::time::Duration;

use crate::Coords;
use crate::snake::Direction;

/// What the food does when a game over resets the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FoodOnReset {
    /// Put the food back where it was when the engine started.
    Initial,
    /// Draw a fresh random position.
    Regenerate,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Side of the square playing field, in units.
    pub field_size: i32,
    /// Side of a single cell, in units. Every coordinate is a multiple of it.
    pub cell_size: i32,
    pub initial_body: Vec<Coords>,
    pub initial_direction: Direction,
    /// Milliseconds between ticks at the start of a game.
    pub initial_speed: u64,
    /// Subtracted from the speed each time food is eaten...
    pub speed_decrement: u64,
    /// ...as long as the speed is still above this.
    pub speed_floor: u64,
    pub food_on_reset: FoodOnReset,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            field_size: 100,
            cell_size: 2,
            initial_body: vec![(0, 0), (2, 0)],
            initial_direction: Direction::Right,
            initial_speed: 200,
            speed_decrement: 10,
            speed_floor: 10,
            food_on_reset: FoodOnReset::Initial,
        }
    }
}

impl GameConfig {
    pub fn tick_interval(speed: u64) -> Duration {
        Duration::from_millis(speed)
    }

    /// Cells along one side of the field.
    pub fn cells_per_side(&self) -> i32 {
        self.field_size / self.cell_size
    }

    pub fn in_bounds(&self, (x, y): Coords) -> bool {
        x >= 0 && y >= 0 && x < self.field_size && y < self.field_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GameConfig::default();
        assert_eq!(config.initial_body, vec![(0, 0), (2, 0)]);
        assert_eq!(config.initial_direction, Direction::Right);
        assert_eq!(config.initial_speed, 200);
        assert_eq!(config.cells_per_side(), 50);
        assert_eq!(config.food_on_reset, FoodOnReset::Initial);
    }

    #[test]
    fn bounds_are_half_open() {
        let config = GameConfig::default();
        assert!(config.in_bounds((0, 0)));
        assert!(config.in_bounds((98, 98)));
        assert!(!config.in_bounds((-2, 0)));
        assert!(!config.in_bounds((0, -2)));
        assert!(!config.in_bounds((100, 50)));
        assert!(!config.in_bounds((50, 100)));
    }
}
