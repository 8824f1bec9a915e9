use crossterm::event::KeyCode;

use crate::Coords;
use Direction::*;

/// Units the head travels per tick.
pub const STEP: i32 = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down
}

impl Direction {
    /// Maps the four arrow keys, everything else is not a direction.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(Left),
            KeyCode::Up => Some(Up),
            KeyCode::Right => Some(Right),
            KeyCode::Down => Some(Down),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Left => Right,
            Right => Left,
            Up => Down,
            Down => Up,
        }
    }

    fn offset(self) -> Coords {
        match self {
            Left => (-STEP, 0),
            Up => (0, -STEP),
            Right => (STEP, 0),
            Down => (0, STEP),
        }
    }
}

/// Tail first, head last.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Coords>,
    direction: Direction,
}

impl Snake {
    pub fn new(body: Vec<Coords>, direction: Direction) -> Self {
        debug_assert!(body.len() >= 2, "a snake needs a head and a tail");
        Snake { body, direction }
    }

    pub fn body(&self) -> &[Coords] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Coords {
        self.body[self.body.len() - 1]
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Where the head lands on the next move.
    pub fn next_head(&self) -> Coords {
        let (x, y) = self.head();
        let (dx, dy) = self.direction.offset();
        (x + dx, y + dy)
    }

    /// Pushes the next head and drops the oldest tail segment, which is returned.
    pub fn advance(&mut self) -> Coords {
        let new_head = self.next_head();
        self.body.push(new_head);
        self.body.remove(0)
    }

    /// Puts a dropped tail back, growing the snake by one segment.
    pub fn regrow(&mut self, tail: Coords) {
        self.body.insert(0, tail);
    }

    /// Rejects both the current direction and its reverse. Returns whether it changed.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction || new_direction == self.direction.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    /// True when the head shares a cell with any other segment.
    pub fn head_hits_body(&self) -> bool {
        let head = self.head();
        self.body[..self.body.len() - 1].contains(&head)
    }
}
