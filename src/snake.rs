use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::GridSize;
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step towards `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Snake head, trailing body and growth target.
///
/// The body is stored oldest-first: the front is the tail tip and the back is
/// the cell the head most recently left. `total` is the body length the snake
/// is growing towards; the body trails behind it by one segment per tick.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    head: Position,
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Direction,
    total: usize,
}

impl Snake {
    /// Creates a bodiless snake at `start` heading in `direction`.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        Self {
            head: start,
            body: VecDeque::new(),
            direction,
            pending_direction: direction,
            total: 0,
        }
    }

    /// Creates a snake from an explicit head and body (oldest segment first).
    ///
    /// The growth target equals the given body length.
    #[must_use]
    pub fn from_segments(head: Position, body: Vec<Position>, direction: Direction) -> Self {
        let total = body.len();
        Self {
            head,
            body: VecDeque::from(body),
            direction,
            pending_direction: direction,
            total,
        }
    }

    /// Requests a turn. Reversals of the active direction are silently dropped.
    ///
    /// An accepted turn becomes the active direction at the end of the next
    /// [`Snake::step`], so the snake moves that way one tick later.
    pub fn set_direction(&mut self, requested: Direction) {
        if direction_change_is_valid(self.direction, requested) {
            self.pending_direction = requested;
        }
    }

    /// Advances the head one cell and trails the body behind it.
    pub fn step(&mut self) {
        self.body.push_back(self.head);
        self.head = self.head.stepped(self.direction);

        let excess = self.body.len().saturating_sub(self.total);
        self.body.drain(..excess);

        self.direction = self.pending_direction;
    }

    /// Raises the growth target; the body catches up over later steps.
    pub fn grow(&mut self, amount: usize) {
        self.total += amount;
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.head
    }

    /// Returns true if the head overlaps any body segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        self.body.contains(&self.head)
    }

    /// Returns current body segment count, excluding the head.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when the snake is just a head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the body length the snake is growing towards.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the direction the next step moves in.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the last accepted turn, applied after the next step.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Iterates over body segments from tail tip to neck.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
