use rand::Rng;

use crate::config::GridSize;
use crate::snake::Position;

/// Regular food: one active cell, re-randomized whenever it is eaten.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    /// Creates food at a fixed `position`.
    #[must_use]
    pub fn at(position: Position) -> Self {
        Self { position }
    }

    /// Creates food at a uniformly random cell.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize) -> Self {
        Self::at(random_position(rng, bounds))
    }

    /// Moves the food to a new uniformly random cell.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: GridSize) {
        self.position = random_position(rng, bounds);
    }
}

/// Picks a cell uniformly over the whole grid.
///
/// Occupied cells are not excluded: food may land under the snake or on the
/// other food item.
#[must_use]
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize) -> Position {
    debug_assert!(bounds.width > 0 && bounds.height > 0);

    Position {
        x: rng.gen_range(0..i32::from(bounds.width)),
        y: rng.gen_range(0..i32::from(bounds.height)),
    }
}

/// Bonus food timer phase, advanced once per second.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BonusPhase {
    /// Hidden; `counter` seconds have elapsed towards the next appearance.
    Hidden { counter: u32 },
    /// Visible; `remaining` seconds until it hides again.
    Visible { remaining: u32 },
}

/// Outcome of one bonus timer second.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BonusTransition {
    Unchanged,
    Appeared,
    Expired,
}

/// Bonus food with a hidden-counting / visible-countdown timer.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BonusFood {
    pub position: Position,
    phase: BonusPhase,
    appear_after: u32,
    visible_for: u32,
}

impl BonusFood {
    /// Creates hidden bonus food at `position` with a zeroed appearance counter.
    #[must_use]
    pub fn new(position: Position, appear_after: u32, visible_for: u32) -> Self {
        Self {
            position,
            phase: BonusPhase::Hidden { counter: 0 },
            appear_after,
            visible_for,
        }
    }

    /// Creates hidden bonus food at a random cell.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: GridSize,
        appear_after: u32,
        visible_for: u32,
    ) -> Self {
        Self::new(random_position(rng, bounds), appear_after, visible_for)
    }

    /// Advances the timer by one second.
    ///
    /// Appearing zeroes the counter and starts the visible countdown; when the
    /// countdown runs out the food hides and counting restarts from zero.
    pub fn tick(&mut self) -> BonusTransition {
        match self.phase {
            BonusPhase::Hidden { counter } => {
                let counter = counter + 1;
                if counter >= self.appear_after {
                    self.phase = BonusPhase::Visible {
                        remaining: self.visible_for,
                    };
                    BonusTransition::Appeared
                } else {
                    self.phase = BonusPhase::Hidden { counter };
                    BonusTransition::Unchanged
                }
            }
            BonusPhase::Visible { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.phase = BonusPhase::Hidden { counter: 0 };
                    BonusTransition::Expired
                } else {
                    self.phase = BonusPhase::Visible { remaining };
                    BonusTransition::Unchanged
                }
            }
        }
    }

    /// Ends the visible window early and moves the food to a new random cell.
    ///
    /// The pending hide is dropped with the countdown, so a later tick cannot
    /// hide it twice or bring it back.
    pub fn consume<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: GridSize) {
        self.phase = BonusPhase::Hidden { counter: 0 };
        self.position = random_position(rng, bounds);
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self.phase, BonusPhase::Visible { .. })
    }

    #[must_use]
    pub fn phase(&self) -> BonusPhase {
        self.phase
    }

    /// Seconds counted towards the next appearance; zero while visible.
    #[must_use]
    pub fn appearance_counter(&self) -> u32 {
        match self.phase {
            BonusPhase::Hidden { counter } => counter,
            BonusPhase::Visible { .. } => 0,
        }
    }

    /// Seconds left in the visible window, if visible.
    #[must_use]
    pub fn visible_remaining(&self) -> Option<u32> {
        match self.phase {
            BonusPhase::Hidden { .. } => None,
            BonusPhase::Visible { remaining } => Some(remaining),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;

    use super::{BonusFood, BonusPhase, BonusTransition, Food, random_position};
    use crate::snake::Position;

    const BOUNDS: GridSize = GridSize {
        width: 20,
        height: 20,
    };

    #[test]
    fn random_positions_stay_on_grid_and_vary() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = GridSize {
            width: 8,
            height: 6,
        };

        let seen: HashSet<Position> = (0..200)
            .map(|_| random_position(&mut rng, bounds))
            .inspect(|position| assert!(position.is_within_bounds(bounds)))
            .collect();

        assert!(seen.len() > 10);
    }

    #[test]
    fn randomize_moves_food_eventually() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut food = Food::at(Position { x: 3, y: 3 });

        let moved = (0..20).any(|_| {
            food.randomize(&mut rng, BOUNDS);
            food.position != Position { x: 3, y: 3 }
        });

        assert!(moved);
    }

    #[test]
    fn bonus_appears_after_threshold_and_hides_after_window() {
        let mut bonus = BonusFood::new(Position { x: 1, y: 1 }, 10, 5);

        for second in 1..10 {
            assert_eq!(bonus.tick(), BonusTransition::Unchanged);
            assert_eq!(bonus.appearance_counter(), second);
            assert!(!bonus.is_visible());
        }

        assert_eq!(bonus.tick(), BonusTransition::Appeared);
        assert!(bonus.is_visible());
        assert_eq!(bonus.appearance_counter(), 0);
        assert_eq!(bonus.visible_remaining(), Some(5));

        for _ in 0..4 {
            assert_eq!(bonus.tick(), BonusTransition::Unchanged);
            assert!(bonus.is_visible());
        }

        assert_eq!(bonus.tick(), BonusTransition::Expired);
        assert!(!bonus.is_visible());
        assert_eq!(bonus.phase(), BonusPhase::Hidden { counter: 0 });
        assert_eq!(bonus.position, Position { x: 1, y: 1 });
    }

    #[test]
    fn consuming_visible_bonus_restarts_counting() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut bonus = BonusFood::new(Position { x: 1, y: 1 }, 2, 5);
        bonus.tick();
        bonus.tick();
        assert!(bonus.is_visible());

        bonus.consume(&mut rng, BOUNDS);

        assert!(!bonus.is_visible());
        assert_eq!(bonus.appearance_counter(), 0);
        assert!(bonus.position.is_within_bounds(BOUNDS));

        // The cancelled countdown must not hide or reveal anything early.
        assert_eq!(bonus.tick(), BonusTransition::Unchanged);
        assert_eq!(bonus.appearance_counter(), 1);
        assert_eq!(bonus.tick(), BonusTransition::Appeared);
    }
}
