use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::clock::{GameClock, format_elapsed};
use crate::config::{ConfigError, GameConfig, GridSize};
use crate::food::{BonusFood, BonusTransition, Food};
use crate::input::{Direction, GameInput};
use crate::snake::{Position, Snake};

/// Why a round ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResetCause {
    Boundary,
    SelfCollision,
}

/// Things that happened during a tick, for the audio and display adapters.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameEvent {
    FoodEaten {
        position: Position,
    },
    BonusEaten {
        position: Position,
    },
    BonusAppeared {
        position: Position,
    },
    BonusExpired,
    RoundReset {
        cause: ResetCause,
        final_score: u32,
        elapsed_secs: u64,
    },
}

impl GameEvent {
    /// Returns true for events that should trigger a beep.
    #[must_use]
    pub fn wants_beep(&self) -> bool {
        matches!(self, Self::FoodEaten { .. } | Self::BonusEaten { .. })
    }
}

/// Board contents in grid cells, for renderers.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BoardView {
    pub bounds: GridSize,
    pub head: Position,
    /// Body segments, oldest first.
    pub body: Vec<Position>,
    pub food: Position,
    pub bonus: Position,
    pub bonus_visible: bool,
}

/// Score and clock values for the display adapter.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DisplayView {
    pub score: u32,
    pub elapsed_secs: u64,
    /// Elapsed time as `M:SS`.
    pub elapsed: String,
    /// Seconds left to eat the bonus food while it is visible.
    pub bonus_remaining: Option<u32>,
}

/// Complete mutable game state for one endless session.
///
/// A collision never ends the session; it resets the round and play goes on.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    pub bonus: BonusFood,
    pub score: u32,
    pub tick_count: u64,
    intent: Option<Direction>,
    clock: GameClock,
    config: GameConfig,
    bounds: GridSize,
    rng: StdRng,
}

impl GameState {
    /// Creates a session seeded from OS entropy.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let clock = GameClock::new(Duration::from_millis(config.tick_interval_ms))?;
        let bounds = config.grid();
        let food = Food::random(&mut rng, bounds);
        let bonus = BonusFood::random(
            &mut rng,
            bounds,
            config.bonus_appear_after_secs,
            config.bonus_visible_secs,
        );

        Ok(Self {
            snake: Snake::new(config.start, config.start_direction),
            food,
            bonus,
            score: 0,
            tick_count: 0,
            intent: None,
            clock,
            config,
            bounds,
            rng,
        })
    }

    /// Reinitializes the snake, both foods, score, direction and clock.
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.config.start, self.config.start_direction);
        self.food = Food::random(&mut self.rng, self.bounds);
        self.bonus = BonusFood::random(
            &mut self.rng,
            self.bounds,
            self.config.bonus_appear_after_secs,
            self.config.bonus_visible_secs,
        );
        self.score = 0;
        self.tick_count = 0;
        self.intent = None;
        self.clock.restart();
    }

    /// Applies one external input event.
    ///
    /// Directions are buffered, latest wins; the reversal rule is applied when
    /// the buffered direction is handed to the snake on the next tick.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => self.intent = Some(direction),
            GameInput::Quit => {}
        }
    }

    /// Feeds wall time and runs every second and grid tick that fell due.
    ///
    /// A reset drops the rest of the batch so the new round starts clean.
    pub fn advance(&mut self, dt: Duration) -> Vec<GameEvent> {
        let due = self.clock.advance(dt);
        let mut events = Vec::new();

        for _ in 0..due.seconds {
            self.run_second(&mut events);
        }

        for _ in 0..due.main {
            if self.run_tick(&mut events) {
                break;
            }
        }

        events
    }

    /// Advances the simulation by one grid tick.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.run_tick(&mut events);
        events
    }

    /// Advances the elapsed time and bonus timer by one second.
    pub fn second_tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.run_second(&mut events);
        events
    }

    /// Returns true when the tick ended the round.
    fn run_tick(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if let Some(direction) = self.intent.take() {
            self.snake.set_direction(direction);
        }

        self.snake.step();
        self.tick_count += 1;

        let head = self.snake.head();
        if !head.is_within_bounds(self.bounds) {
            self.end_round(ResetCause::Boundary, events);
            return true;
        }

        // Checked after the step: the cell the tail tip just left is free.
        if self.snake.head_overlaps_body() {
            self.end_round(ResetCause::SelfCollision, events);
            return true;
        }

        if head == self.food.position {
            self.snake.grow(self.config.food_growth);
            self.food.randomize(&mut self.rng, self.bounds);
            self.score += self.config.food_score;
            debug!(x = head.x, y = head.y, score = self.score, "food eaten");
            events.push(GameEvent::FoodEaten { position: head });
        }

        if self.bonus.is_visible() && head == self.bonus.position {
            for _ in 0..self.config.bonus_growth {
                self.snake.grow(1);
            }
            self.score += self.config.bonus_score;
            self.bonus.consume(&mut self.rng, self.bounds);
            debug!(x = head.x, y = head.y, score = self.score, "bonus food eaten");
            events.push(GameEvent::BonusEaten { position: head });
        }

        false
    }

    fn run_second(&mut self, events: &mut Vec<GameEvent>) {
        self.clock.record_second();

        match self.bonus.tick() {
            BonusTransition::Appeared => {
                let position = self.bonus.position;
                debug!(x = position.x, y = position.y, "bonus food appeared");
                events.push(GameEvent::BonusAppeared { position });
            }
            BonusTransition::Expired => {
                debug!("bonus food expired");
                events.push(GameEvent::BonusExpired);
            }
            BonusTransition::Unchanged => {}
        }
    }

    fn end_round(&mut self, cause: ResetCause, events: &mut Vec<GameEvent>) {
        let final_score = self.score;
        let elapsed_secs = self.clock.elapsed_secs();
        info!(
            ?cause,
            final_score,
            elapsed = %format_elapsed(elapsed_secs),
            "round over, resetting"
        );

        self.reset();
        events.push(GameEvent::RoundReset {
            cause,
            final_score,
            elapsed_secs,
        });
    }

    /// Returns the direction buffered for the next tick, if any.
    #[must_use]
    pub fn buffered_direction(&self) -> Option<Direction> {
        self.intent
    }

    /// Whole seconds since the round started.
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.clock.elapsed_secs()
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    /// Snapshot of everything a renderer draws.
    #[must_use]
    pub fn board(&self) -> BoardView {
        BoardView {
            bounds: self.bounds,
            head: self.snake.head(),
            body: self.snake.segments().copied().collect(),
            food: self.food.position,
            bonus: self.bonus.position,
            bonus_visible: self.bonus.is_visible(),
        }
    }

    /// Snapshot of the score and time display.
    #[must_use]
    pub fn display(&self) -> DisplayView {
        let elapsed_secs = self.clock.elapsed_secs();
        DisplayView {
            score: self.score,
            elapsed_secs,
            elapsed: format_elapsed(elapsed_secs),
            bonus_remaining: self.bonus.visible_remaining(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use crate::config::{ConfigError, GameConfig};
    use crate::food::{BonusFood, BonusPhase, Food};
    use crate::input::{Direction, GameInput};
    use crate::snake::{Position, Snake};

    use super::{GameEvent, GameState, ResetCause};

    const FAR_CORNER: Position = Position { x: 19, y: 19 };

    fn quiet_state(seed: u64) -> GameState {
        let mut state =
            GameState::new_with_seed(GameConfig::default(), seed).expect("default config is valid");
        state.food = Food::at(FAR_CORNER);
        state.bonus = BonusFood::new(FAR_CORNER, 10, 5);
        state
    }

    #[test]
    fn reverse_input_is_dropped_and_snake_keeps_moving() {
        let mut state = quiet_state(1);
        state.snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);

        state.apply_input(GameInput::Direction(Direction::Left));
        state.tick();
        state.tick();

        assert_eq!(state.snake.head(), Position { x: 7, y: 5 });
        assert_eq!(state.snake.direction(), Direction::Right);
    }

    #[test]
    fn latest_buffered_direction_wins() {
        let mut state = quiet_state(2);
        state.snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);

        state.apply_input(GameInput::Direction(Direction::Up));
        state.apply_input(GameInput::Direction(Direction::Down));
        assert_eq!(state.buffered_direction(), Some(Direction::Down));

        state.tick();
        state.tick();

        assert_eq!(state.snake.head(), Position { x: 6, y: 6 });
        assert_eq!(state.buffered_direction(), None);
    }

    #[test]
    fn leaving_the_grid_resets_the_round() {
        let mut state = quiet_state(3);
        state.snake = Snake::new(Position { x: 19, y: 4 }, Direction::Right);
        state.snake.grow(3);
        state.score = 7;

        let events = state.tick();

        assert_eq!(
            events,
            vec![GameEvent::RoundReset {
                cause: ResetCause::Boundary,
                final_score: 7,
                elapsed_secs: 0,
            }]
        );
        assert_eq!(state.score, 0);
        assert!(state.snake.is_empty());
        assert_eq!(state.snake.total(), 0);
        assert_eq!(state.snake.head(), Position { x: 2, y: 2 });
    }

    #[test]
    fn looping_onto_own_body_resets_on_contact_tick() {
        let mut state = quiet_state(4);
        state.snake.grow(4);
        state.score = 3;

        state.tick();
        state.tick();
        state.apply_input(GameInput::Direction(Direction::Down));
        state.tick();
        state.apply_input(GameInput::Direction(Direction::Left));
        state.tick();
        state.apply_input(GameInput::Direction(Direction::Up));
        assert!(state.tick().is_empty());
        assert_eq!(state.snake.head(), Position { x: 4, y: 3 });

        let events = state.tick();

        assert!(matches!(
            events.as_slice(),
            [GameEvent::RoundReset {
                cause: ResetCause::SelfCollision,
                final_score: 3,
                ..
            }]
        ));
        assert_eq!(state.score, 0);
        assert!(state.snake.is_empty());
    }

    #[test]
    fn entering_the_cell_the_tail_just_left_is_safe() {
        let mut state = quiet_state(5);
        state.snake = Snake::from_segments(
            Position { x: 2, y: 2 },
            vec![
                Position { x: 2, y: 3 },
                Position { x: 3, y: 3 },
                Position { x: 3, y: 2 },
            ],
            Direction::Down,
        );

        let events = state.tick();

        assert!(events.is_empty());
        assert_eq!(state.snake.head(), Position { x: 2, y: 3 });
    }

    #[test]
    fn entering_the_tail_cell_while_growing_collides() {
        let mut state = quiet_state(6);
        state.snake = Snake::from_segments(
            Position { x: 2, y: 2 },
            vec![
                Position { x: 2, y: 3 },
                Position { x: 3, y: 3 },
                Position { x: 3, y: 2 },
            ],
            Direction::Down,
        );
        state.snake.grow(1);

        let events = state.tick();

        assert!(matches!(
            events.as_slice(),
            [GameEvent::RoundReset {
                cause: ResetCause::SelfCollision,
                ..
            }]
        ));
    }

    #[test]
    fn eating_food_scores_grows_and_moves_food() {
        let mut state = quiet_state(7);
        state.snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);
        state.food = Food::at(Position { x: 6, y: 5 });

        let events = state.tick();

        assert_eq!(
            events,
            vec![GameEvent::FoodEaten {
                position: Position { x: 6, y: 5 }
            }]
        );
        assert!(events[0].wants_beep());
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.total(), 1);
        assert!(state.food.position.is_within_bounds(state.bounds()));
    }

    #[test]
    fn respawned_food_positions_vary() {
        let mut state = quiet_state(8);
        let mut seen = HashSet::new();

        for _ in 0..30 {
            state.snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);
            state.food = Food::at(Position { x: 6, y: 5 });
            state.tick();
            seen.insert(state.food.position);
        }

        assert_eq!(state.score, 30);
        assert!(seen.len() > 1);
    }

    #[test]
    fn visible_bonus_is_worth_twenty_and_two_segments() {
        let mut state = quiet_state(9);
        state.snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);
        state.bonus = BonusFood::new(Position { x: 6, y: 5 }, 10, 5);

        for _ in 0..9 {
            assert!(state.second_tick().is_empty());
        }
        assert_eq!(
            state.second_tick(),
            vec![GameEvent::BonusAppeared {
                position: Position { x: 6, y: 5 }
            }]
        );

        let events = state.tick();

        assert_eq!(
            events,
            vec![GameEvent::BonusEaten {
                position: Position { x: 6, y: 5 }
            }]
        );
        assert_eq!(state.score, 20);
        assert_eq!(state.snake.total(), 2);
        assert!(!state.bonus.is_visible());
        assert_eq!(state.bonus.appearance_counter(), 0);
    }

    #[test]
    fn hidden_bonus_cannot_be_eaten() {
        let mut state = quiet_state(10);
        state.snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);
        state.bonus = BonusFood::new(Position { x: 6, y: 5 }, 10, 5);

        assert!(state.tick().is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.total(), 0);
    }

    #[test]
    fn unclaimed_bonus_expires_after_visible_window() {
        let mut state = quiet_state(11);

        let events: Vec<GameEvent> = (0..15).flat_map(|_| state.second_tick()).collect();

        assert_eq!(
            events,
            vec![
                GameEvent::BonusAppeared {
                    position: FAR_CORNER
                },
                GameEvent::BonusExpired,
            ]
        );
        assert_eq!(state.bonus.phase(), BonusPhase::Hidden { counter: 0 });
        assert_eq!(state.display().elapsed, "0:15");
    }

    #[test]
    fn reset_twice_yields_the_same_initial_state() {
        let mut state = quiet_state(12);
        state.apply_input(GameInput::Direction(Direction::Down));
        state.tick();
        state.snake.grow(5);
        state.score = 42;
        for _ in 0..12 {
            state.second_tick();
        }

        state.reset();
        let first = (
            state.snake.clone(),
            state.score,
            state.tick_count,
            state.bonus.phase(),
            state.elapsed_secs(),
            state.buffered_direction(),
        );

        state.reset();
        let second = (
            state.snake.clone(),
            state.score,
            state.tick_count,
            state.bonus.phase(),
            state.elapsed_secs(),
            state.buffered_direction(),
        );

        assert_eq!(first, second);
        assert_eq!(first.0, Snake::new(Position { x: 2, y: 2 }, Direction::Right));
        assert_eq!(first.1, 0);
        assert_eq!(first.3, BonusPhase::Hidden { counter: 0 });
        assert_eq!(first.4, 0);
        assert!(state.food.position.is_within_bounds(state.bounds()));
    }

    #[test]
    fn empty_grid_config_is_rejected() {
        let mut config = GameConfig::default();
        config.surface_width = 0;

        assert!(matches!(
            GameState::new_with_seed(config, 1),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let config = GameConfig {
            tick_interval_ms: 0,
            ..GameConfig::default()
        };

        assert!(matches!(
            GameState::new_with_seed(config, 1),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn display_shows_bonus_countdown_only_while_visible() {
        let mut state = quiet_state(16);
        assert_eq!(state.display().bonus_remaining, None);

        for _ in 0..12 {
            state.second_tick();
        }

        assert_eq!(state.display().bonus_remaining, Some(3));
    }

    #[test]
    fn advance_runs_due_ticks_and_seconds() {
        let mut state = quiet_state(13);

        state.advance(Duration::from_millis(1050));

        assert_eq!(state.tick_count, 10);
        assert_eq!(state.snake.head(), Position { x: 12, y: 2 });
        assert_eq!(state.display().elapsed, "0:01");
    }

    #[test]
    fn advance_stops_batch_after_reset() {
        let mut state = quiet_state(14);
        state.snake = Snake::new(Position { x: 18, y: 2 }, Direction::Right);

        let events = state.advance(Duration::from_millis(500));

        assert!(matches!(
            events.as_slice(),
            [GameEvent::RoundReset {
                cause: ResetCause::Boundary,
                ..
            }]
        ));
        assert_eq!(state.tick_count, 0);
        assert_eq!(state.snake.head(), Position { x: 2, y: 2 });
    }

    #[test]
    fn board_view_lists_body_oldest_first() {
        let mut state = quiet_state(15);
        state.snake.grow(2);
        state.tick();
        state.tick();

        let board = state.board();

        assert_eq!(board.head, Position { x: 4, y: 2 });
        assert_eq!(
            board.body,
            vec![Position { x: 2, y: 2 }, Position { x: 3, y: 2 }]
        );
        assert_eq!(board.food, FAR_CORNER);
        assert!(!board.bonus_visible);
    }
}
