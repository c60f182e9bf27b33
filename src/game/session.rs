use log::{debug, info};
use std::time::Duration;

use super::{
    config::{self, GameConfig},
    direction::Direction,
    error::{GameError, NoFreeCellError},
    food::FoodSpawner,
    grid::Grid,
    input::InputTranslator,
    rng::{RandomSource, SessionRng},
    snake::Snake,
    state::{EndReason, GameEvent, SessionState, Snapshot},
};

/// One play-through, from start to a terminal state
///
/// The session is the only owner of the snake and food. Callers feed it
/// commands (`submit_direction`, `toggle_pause`, `set_speed_level`) and drive
/// it with `tick`, reading results back through [`Snapshot`]s.
pub struct GameSession<R: RandomSource = SessionRng> {
    config: GameConfig,
    grid: Grid,
    snake: Snake,
    food: FoodSpawner,
    input: InputTranslator,
    rng: R,
    score: u32,
    state: SessionState,
    end_reason: Option<EndReason>,
    ticks: u64,
    /// Events not yet handed out in a snapshot
    events: Vec<GameEvent>,
}

impl GameSession<SessionRng> {
    /// Start a session with default rules on a `width` x `height` grid
    pub fn new(width: usize, height: usize, speed_level: u8) -> Result<Self, GameError> {
        Self::start(GameConfig::new(width, height).with_speed_level(speed_level))
    }

    /// Start a session seeded from the thread RNG
    pub fn start(config: GameConfig) -> Result<Self, GameError> {
        let rng = SessionRng::from_random();
        debug!("Session seed: {}", rng.seed());
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> GameSession<R> {
    /// Start a session drawing food positions from `rng`
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, GameError> {
        config.validate()?;

        let grid = Grid::new(config.grid_width, config.grid_height);
        let snake = Snake::new(grid.center(), Direction::Right, config.initial_snake_length);

        Ok(Self::from_parts(config, grid, snake, rng))
    }

    fn from_parts(config: GameConfig, grid: Grid, snake: Snake, rng: R) -> Self {
        let food = FoodSpawner::new((&config).into());

        let mut session = Self {
            config,
            grid,
            snake,
            food,
            input: InputTranslator::new(),
            rng,
            score: 0,
            state: SessionState::Running,
            end_reason: None,
            ticks: 0,
            events: Vec::new(),
        };

        info!(
            "Session started on a {}x{} grid at speed {}",
            grid.width(),
            grid.height(),
            session.config.speed_level
        );

        // A snake covering the whole board leaves nowhere to put food
        session.spawn_normal_food();
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Score handed to the leaderboard, available once the session ended
    pub fn final_score(&self) -> Option<u32> {
        (self.state == SessionState::Ended).then_some(self.score)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &FoodSpawner {
        &self.food
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn speed_level(&self) -> u8 {
        self.config.speed_level
    }

    /// Delay between ticks at the current speed level
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    /// Change the speed for subsequent ticks
    pub fn set_speed_level(&mut self, speed_level: u8) -> Result<(), GameError> {
        config::validate_speed_level(speed_level)?;
        if speed_level != self.config.speed_level {
            info!("Speed level {} -> {}", self.config.speed_level, speed_level);
            self.config.speed_level = speed_level;
        }
        Ok(())
    }

    /// Queue a direction change for the next tick
    ///
    /// Reversals are dropped, and so is anything submitted while the
    /// session is not running.
    pub fn submit_direction(&mut self, direction: Direction) {
        if self.state == SessionState::Running {
            self.input.submit(direction, self.snake.direction());
        }
    }

    /// Switch between running and paused; ignored once the session ended
    pub fn toggle_pause(&mut self) -> SessionState {
        match self.state {
            SessionState::Running => {
                self.state = SessionState::Paused;
                self.events.push(GameEvent::Paused);
                debug!("Paused at tick {}", self.ticks);
            }
            SessionState::Paused => {
                self.state = SessionState::Running;
                self.events.push(GameEvent::Resumed);
                debug!("Resumed at tick {}", self.ticks);
            }
            SessionState::Ended => {}
        }
        self.state
    }

    /// Advance the simulation by one step
    ///
    /// Only a running session moves; paused and ended sessions report their
    /// current state unchanged.
    pub fn tick(&mut self) -> Snapshot {
        if self.state == SessionState::Running {
            self.step();
        }
        let events = std::mem::take(&mut self.events);
        self.build_snapshot(events)
    }

    /// Current state without consuming pending events
    pub fn snapshot(&self) -> Snapshot {
        self.build_snapshot(self.events.clone())
    }

    fn step(&mut self) {
        let direction = self.input.resolve(self.snake.direction());
        let candidate = self.snake.next_head(direction);
        self.ticks += 1;

        if self.snake.collides_with_wall(candidate, &self.grid) {
            self.end(EndReason::WallCollision);
            return;
        }

        // The tail stays put when the snake grows this tick
        let grows =
            self.snake.pending_growth() > 0 || self.food.food_at(candidate).is_some();
        if self.snake.collides_with_self(candidate, grows) {
            self.end(EndReason::SelfCollision);
            return;
        }

        if let Some(food) = self.food.consume(candidate) {
            self.score = self.score.saturating_add(food.value);
            self.snake.grow();
            self.events.push(GameEvent::FoodEaten {
                kind: food.kind,
                value: food.value,
            });
        }

        let grew = self.snake.pending_growth() > 0;
        self.snake.advance(direction, grew);

        if let Some(expired) = self.food.tick() {
            self.events.push(GameEvent::SpecialExpired {
                position: expired.position,
            });
        }

        if !self.spawn_normal_food() {
            return;
        }

        if let Some(special) =
            self.food
                .maybe_spawn_special(&self.grid, self.snake.segments(), &mut self.rng)
        {
            self.events.push(GameEvent::FoodSpawned {
                kind: special.kind,
                position: special.position,
            });
        }
    }

    /// Make sure a normal food is on the board
    ///
    /// When no cell is free but a special food still occupies one, the normal
    /// slot stays empty until a cell opens up. With no free cell and no food
    /// left the snake covers the board and the session ends. Returns false
    /// when the session ended.
    fn spawn_normal_food(&mut self) -> bool {
        match self
            .food
            .ensure_normal_food(&self.grid, self.snake.segments(), &mut self.rng)
        {
            Ok(Some(food)) => {
                self.events.push(GameEvent::FoodSpawned {
                    kind: food.kind,
                    position: food.position,
                });
                true
            }
            Ok(None) => true,
            Err(NoFreeCellError) if self.food.special().is_some() => {
                debug!("No room for normal food while the special is out");
                true
            }
            Err(NoFreeCellError) => {
                self.end(EndReason::BoardFilled);
                false
            }
        }
    }

    fn end(&mut self, reason: EndReason) {
        self.state = SessionState::Ended;
        self.end_reason = Some(reason);
        self.input.clear();
        self.events.push(GameEvent::SessionEnded {
            reason,
            final_score: self.score,
        });
        info!(
            "Session ended after {} ticks: {:?}, score {}",
            self.ticks, reason, self.score
        );
    }

    fn build_snapshot(&self, events: Vec<GameEvent>) -> Snapshot {
        Snapshot {
            tick: self.ticks,
            grid_width: self.grid.width(),
            grid_height: self.grid.height(),
            segments: self.snake.segments().copied().collect(),
            direction: self.snake.direction(),
            food: self.food.foods().copied().collect(),
            score: self.score,
            state: self.state,
            end_reason: self.end_reason,
            speed_level: self.config.speed_level,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::food::{Food, FoodKind, FoodRules};
    use crate::game::grid::Position;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    /// Always picks the first free cell in row-major order
    struct FirstFree;

    impl RandomSource for FirstFree {
        fn index(&mut self, _upper: usize) -> usize {
            0
        }
    }

    /// Session with an explicit snake and food layout
    fn session_with(
        config: GameConfig,
        snake: Snake,
        foods: &[Food],
    ) -> GameSession<SessionRng> {
        let grid = Grid::new(config.grid_width, config.grid_height);
        let mut session = GameSession::from_parts(config, grid, snake, SessionRng::new(0));
        session.food = FoodSpawner::new(FoodRules::from(&session.config));
        for food in foods {
            session.food.place(*food);
        }
        session.events.clear();
        session
    }

    fn assert_unique_segments(snapshot: &Snapshot) {
        let unique: HashSet<&Position> = snapshot.segments.iter().collect();
        assert_eq!(unique.len(), snapshot.segments.len());
    }

    #[test]
    fn test_start() {
        let session = GameSession::new(20, 20, 3).unwrap();
        let snapshot = session.snapshot();

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.ticks(), 0);
        assert_eq!(snapshot.segments.len(), 3);
        assert_eq!(snapshot.head(), Some(Position::new(10, 10)));
        assert_eq!(snapshot.food.len(), 1);
        assert_eq!(snapshot.food[0].kind, FoodKind::Normal);
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        assert!(matches!(
            GameSession::new(0, 5, 3),
            Err(GameError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            GameSession::new(5, 5, 0),
            Err(GameError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_basic_movement() {
        let mut session = GameSession::with_rng(GameConfig::small(), SessionRng::new(2)).unwrap();
        let initial_head = session.snake().head();

        let snapshot = session.tick();

        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.head(), Some(initial_head.moved_by(1, 0)));
        assert_eq!(snapshot.state, SessionState::Running);
    }

    #[test]
    fn test_eating_normal_food_on_small_grid() {
        let config = GameConfig::new(5, 5);
        let snake = Snake::new(Position::new(2, 2), Direction::Right, 3);
        let mut session = session_with(config, snake, &[Food::normal(Position::new(3, 2), 1)]);

        let snapshot = session.tick();

        assert_eq!(snapshot.score, 1);
        assert_eq!(snapshot.segments.len(), 4);
        assert_eq!(snapshot.head(), Some(Position::new(3, 2)));
        assert!(snapshot.has_event(|e| matches!(
            e,
            GameEvent::FoodEaten {
                kind: FoodKind::Normal,
                value: 1
            }
        )));
        // A replacement normal food appears off the snake
        let normal = snapshot.food.iter().find(|f| f.kind == FoodKind::Normal).unwrap();
        assert!(!snapshot.segments.contains(&normal.position));
    }

    #[test]
    fn test_eating_special_food() {
        let config = GameConfig::small();
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        let mut session = session_with(
            config,
            snake,
            &[
                Food::normal(Position::new(0, 0), 10),
                Food::special(Position::new(6, 5), 20, 10),
            ],
        );

        let snapshot = session.tick();

        assert_eq!(snapshot.score, 20);
        assert_eq!(snapshot.segments.len(), 4);
        assert!(snapshot.special_food().is_none());
    }

    #[test]
    fn test_wall_collision() {
        let config = GameConfig::new(5, 5);
        let snake = Snake::new(Position::new(4, 0), Direction::Right, 3);
        let mut session = session_with(config, snake, &[Food::normal(Position::new(0, 4), 10)]);

        let snapshot = session.tick();

        assert_eq!(snapshot.state, SessionState::Ended);
        assert_eq!(snapshot.end_reason, Some(EndReason::WallCollision));
        assert_eq!(session.final_score(), Some(0));
        assert!(snapshot.has_event(|e| matches!(
            e,
            GameEvent::SessionEnded {
                reason: EndReason::WallCollision,
                ..
            }
        )));
    }

    #[test]
    fn test_self_collision_in_tight_loop() {
        // Head at (1,1) heading up; turning right runs into (2,1)
        let config = GameConfig::new(4, 4);
        let snake = Snake::from_segments(
            vec![
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(2, 2),
                Position::new(2, 1),
                Position::new(3, 1),
            ],
            Direction::Up,
        )
        .unwrap();
        let mut session = session_with(config, snake, &[Food::normal(Position::new(0, 3), 10)]);

        session.submit_direction(Direction::Right);
        let snapshot = session.tick();

        assert_eq!(snapshot.state, SessionState::Ended);
        assert_eq!(snapshot.end_reason, Some(EndReason::SelfCollision));
    }

    #[test]
    fn test_chasing_own_tail_is_legal() {
        let config = GameConfig::new(4, 4);
        let snake = Snake::from_segments(
            vec![
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(2, 2),
                Position::new(2, 1),
            ],
            Direction::Up,
        )
        .unwrap();
        let mut session = session_with(config, snake, &[Food::normal(Position::new(0, 3), 10)]);

        session.submit_direction(Direction::Right);
        let snapshot = session.tick();

        assert_eq!(snapshot.state, SessionState::Running);
        assert_eq!(snapshot.head(), Some(Position::new(2, 1)));
        assert_unique_segments(&snapshot);
    }

    #[test]
    fn test_tail_blocks_while_growing() {
        let config = GameConfig::new(4, 4);
        let mut snake = Snake::from_segments(
            vec![
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(2, 2),
                Position::new(2, 1),
            ],
            Direction::Up,
        )
        .unwrap();
        snake.grow();
        let mut session = session_with(config, snake, &[Food::normal(Position::new(0, 3), 10)]);

        session.submit_direction(Direction::Right);
        let snapshot = session.tick();

        assert_eq!(snapshot.end_reason, Some(EndReason::SelfCollision));
    }

    #[test]
    fn test_board_filled_ends_session() {
        // 3x1: snake covers (1,0) and (0,0), so the only food goes to (2,0)
        let mut config = GameConfig::new(3, 1);
        config.initial_snake_length = 2;
        let mut session = GameSession::with_rng(config, SessionRng::new(4)).unwrap();
        assert_eq!(
            session.food().normal().map(|f| f.position),
            Some(Position::new(2, 0))
        );

        let snapshot = session.tick();

        assert_eq!(snapshot.state, SessionState::Ended);
        assert_eq!(snapshot.end_reason, Some(EndReason::BoardFilled));
        assert_eq!(snapshot.score, 10);
        assert_eq!(snapshot.segments.len(), 3);
    }

    #[test]
    fn test_board_full_at_start() {
        let mut config = GameConfig::new(1, 1);
        config.initial_snake_length = 1;
        let session = GameSession::with_rng(config, SessionRng::new(0)).unwrap();

        assert_eq!(session.state(), SessionState::Ended);
        assert_eq!(session.end_reason(), Some(EndReason::BoardFilled));
    }

    #[test]
    fn test_special_on_last_free_cell_keeps_session_running() {
        // 4x1: eating the normal food leaves the special on the only free cell
        let config = GameConfig::new(4, 1);
        let snake = Snake::from_segments(
            vec![Position::new(1, 0), Position::new(0, 0)],
            Direction::Right,
        )
        .unwrap();
        let mut session = session_with(
            config,
            snake,
            &[
                Food::normal(Position::new(2, 0), 10),
                Food::special(Position::new(3, 0), 20, 10),
            ],
        );

        let snapshot = session.tick();
        assert_eq!(snapshot.state, SessionState::Running);
        assert_eq!(snapshot.end_reason, None);
        assert_eq!(snapshot.segments.len(), 3);
        assert!(session.food().normal().is_none());
        assert_eq!(
            snapshot.special_food().map(|f| f.position),
            Some(Position::new(3, 0))
        );

        let snapshot = session.tick();
        assert_eq!(snapshot.state, SessionState::Ended);
        assert_eq!(snapshot.end_reason, Some(EndReason::BoardFilled));
        assert_eq!(snapshot.score, 30);
        assert_eq!(snapshot.segments.len(), 4);
        assert!(snapshot.food.is_empty());
    }

    #[test]
    fn test_consecutive_meals_grow_one_cell_per_tick() {
        let config = GameConfig::new(8, 5);
        let snake = Snake::new(Position::new(2, 2), Direction::Right, 3);
        let mut session = session_with(
            config,
            snake,
            &[
                Food::normal(Position::new(3, 2), 10),
                Food::special(Position::new(4, 2), 20, 10),
            ],
        );

        let first = session.tick();
        assert_eq!(first.segments.len(), 4);
        assert_eq!(first.segments.last(), Some(&Position::new(0, 2)));

        let second = session.tick();
        assert_eq!(second.score, 30);
        assert_eq!(second.segments.len(), 5);
        assert_eq!(second.head(), Some(Position::new(4, 2)));
        // The tail has not moved while growing
        assert_eq!(second.segments.last(), Some(&Position::new(0, 2)));
        assert_eq!(session.snake().pending_growth(), 0);
    }

    #[test]
    fn test_ended_session_ignores_commands() {
        let config = GameConfig::new(5, 5);
        let snake = Snake::new(Position::new(4, 0), Direction::Right, 3);
        let mut session = session_with(config, snake, &[Food::normal(Position::new(0, 4), 10)]);
        let ended = session.tick();

        assert_eq!(session.toggle_pause(), SessionState::Ended);
        session.submit_direction(Direction::Down);
        let after = session.tick();

        assert_eq!(after.state, SessionState::Ended);
        assert_eq!(after.tick, ended.tick);
        assert_eq!(after.segments, ended.segments);
        assert_eq!(after.score, ended.score);
        assert!(after.events.is_empty());
    }

    #[test]
    fn test_toggle_pause_twice_restores_state() {
        let mut session = GameSession::new(10, 10, 3).unwrap();

        assert_eq!(session.toggle_pause(), SessionState::Paused);
        assert_eq!(session.toggle_pause(), SessionState::Running);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_paused_session_does_not_advance() {
        let mut session = GameSession::new(10, 10, 3).unwrap();
        session.toggle_pause();
        let before = session.snapshot();

        session.submit_direction(Direction::Up);
        let after = session.tick();

        assert_eq!(after.tick, before.tick);
        assert_eq!(after.segments, before.segments);
        assert!(after.events.contains(&GameEvent::Paused));

        session.toggle_pause();
        let resumed = session.tick();
        assert_eq!(resumed.direction, Direction::Right);
        assert!(resumed.events.contains(&GameEvent::Resumed));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut session = GameSession::new(10, 10, 3).unwrap();
        let head = session.snake().head();

        session.submit_direction(Direction::Left);
        let snapshot = session.tick();

        assert_eq!(snapshot.direction, Direction::Right);
        assert_eq!(snapshot.head(), Some(head.moved_by(1, 0)));
    }

    #[test]
    fn test_last_direction_before_tick_wins() {
        let mut session = GameSession::new(10, 10, 3).unwrap();
        session.submit_direction(Direction::Up);
        session.submit_direction(Direction::Down);

        let snapshot = session.tick();

        assert_eq!(snapshot.direction, Direction::Down);
    }

    #[test]
    fn test_special_food_expires_after_lifetime() {
        let mut config = GameConfig::default();
        config.special_spawn_interval = 2;
        config.special_lifetime = 3;
        let mut session = GameSession::with_rng(config, FirstFree).unwrap();

        session.tick();
        let spawned = session.tick();
        assert_eq!(spawned.tick, 2);
        let special = *spawned.special_food().unwrap();
        assert_eq!(special.position, Position::new(1, 0));

        for _ in 0..2 {
            assert!(session.tick().special_food().is_some());
        }

        let expired = session.tick();
        assert_eq!(expired.tick, 2 + 3);
        assert!(expired.special_food().is_none());
        assert!(expired.events.contains(&GameEvent::SpecialExpired {
            position: special.position
        }));
        assert_eq!(expired.score, 0);
    }

    #[test]
    fn test_set_speed_level() {
        let mut session = GameSession::new(10, 10, 3).unwrap();

        session.set_speed_level(5).unwrap();
        assert_eq!(session.speed_level(), 5);
        assert_eq!(session.tick_interval(), Duration::from_millis(55));

        assert!(session.set_speed_level(0).is_err());
        assert!(session.set_speed_level(11).is_err());
        assert_eq!(session.speed_level(), 5);
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut driver = StdRng::seed_from_u64(99);

        for seed in 0..20 {
            let mut config = GameConfig::new(8, 6);
            config.special_spawn_interval = 5;
            config.special_lifetime = 8;
            let mut session = GameSession::with_rng(config, SessionRng::new(seed)).unwrap();

            for _ in 0..300 {
                let direction = Direction::ALL[driver.gen_range(0..4)];
                session.submit_direction(direction);
                let snapshot = session.tick();

                assert_unique_segments(&snapshot);
                for segment in &snapshot.segments {
                    assert!(session.grid().is_in_bounds(*segment));
                }
                for food in &snapshot.food {
                    assert!(session.grid().is_in_bounds(food.position));
                    assert!(!snapshot.segments.contains(&food.position));
                }
                assert!(snapshot.food.iter().filter(|f| f.kind == FoodKind::Normal).count() <= 1);
                assert!(snapshot.food.iter().filter(|f| f.kind == FoodKind::Special).count() <= 1);

                if snapshot.is_over() {
                    break;
                }
            }
        }
    }
}
