use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::state::Position;

/// What happens when a move leaves the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallPolicy {
    /// Leaving the grid is a wall collision
    Block,
    /// Coordinates wrap to the opposite edge
    Wrap,
}

/// Square grid of `size` x `size` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: i32,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size: size as i32 }
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.size() * self.size()
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.size).contains(&pos.x) && (0..self.size).contains(&pos.y)
    }

    /// Next cell from `pos` heading in `direction`
    ///
    /// Returns `None` when `policy` is [`WallPolicy::Block`] and the move
    /// leaves the grid. Under [`WallPolicy::Wrap`] the result is always
    /// inside the grid.
    pub fn step(&self, pos: Position, direction: Direction, policy: WallPolicy) -> Option<Position> {
        let next = pos.moved_in_direction(direction);
        match policy {
            WallPolicy::Block => self.contains(next).then_some(next),
            WallPolicy::Wrap => Some(Position::new(
                next.x.rem_euclid(self.size),
                next.y.rem_euclid(self.size),
            )),
        }
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| Position::new(x, y)))
    }
}
