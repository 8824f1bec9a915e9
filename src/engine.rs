//! The game-state transition engine.
//!
//! [`GameEngine`] is the only writer of [`GameState`]. It is driven from outside by two
//! serial event sources: a periodic tick ([`GameEngine::on_tick`]) and key input
//! ([`GameEngine::on_direction_input`]). Everything it wants the outside world to know
//! leaves through a channel of [`GameEvent`]s.

use crossbeam_channel::Sender;
use crossterm::event::KeyCode;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::Coords;
use crate::config::{FoodOnReset, GameConfig};
use crate::scheduler::{TickHandle, TickScheduler};
use crate::snake::{Direction, Snake};

/// Read-only view handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub snake_body: Vec<Coords>,
    pub food: Coords,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameOverCause {
    OutOfBounds,
    SelfCollision,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StateChanged(Snapshot),
    /// Sent before the board is reset. `length` is the body length at the moment of death.
    GameOver { length: usize, cause: GameOverCause },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The engine is stopped.
    Idle,
    Moved,
    Ate,
    GameOver { length: usize, cause: GameOverCause },
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Coords,
    pub speed: u64,
    pub tick_handle: Option<TickHandle>,
}

pub struct GameEngine<S: TickScheduler, R: Rng> {
    config: GameConfig,
    state: GameState,
    scheduler: S,
    rng: R,
    events: Sender<GameEvent>,
    input_attached: bool,
    /// Food drawn by `start()`, put back on reset under `FoodOnReset::Initial`.
    start_food: Coords,
}

impl<S: TickScheduler, R: Rng> GameEngine<S, R> {
    /// Builds a stopped engine. Nothing ticks until [`start`](Self::start).
    /// The food stays on a placeholder cell until then.
    pub fn new(config: GameConfig, scheduler: S, rng: R, events: Sender<GameEvent>) -> Self {
        let start_food = (0, 0);
        let state = fresh_state(&config, start_food);

        GameEngine { config, state, scheduler, rng, events, input_attached: false, start_food }
    }

    pub fn start(&mut self) {
        self.cancel_tick();

        self.start_food = random_food(&self.config, &mut self.rng);
        self.state = fresh_state(&self.config, self.start_food);
        self.schedule_tick();
        self.input_attached = true;

        info!(speed = self.state.speed, food = ?self.state.food, "game started");
        self.notify();
    }

    pub fn stop(&mut self) {
        if self.state.tick_handle.is_some() || self.input_attached {
            info!(length = self.state.snake.len(), "game stopped");
        }

        self.cancel_tick();
        self.input_attached = false;
    }

    pub fn is_running(&self) -> bool {
        self.state.tick_handle.is_some()
    }

    /// Returns whether the direction actually changed.
    pub fn on_direction_input(&mut self, code: KeyCode) -> bool {
        if !self.input_attached {
            return false;
        }

        let direction = match Direction::from_key_code(code) {
            Some(dir) => dir,
            None => return false,
        };

        if !self.state.snake.set_direction(direction) {
            trace!(?direction, "direction rejected");
            return false;
        }

        debug!(?direction, "direction changed");
        self.notify();
        true
    }

    pub fn on_tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }

        // The tail leaves before the collision check, so its cell is free to enter
        let tail = self.state.snake.advance();
        let head = self.state.snake.head();
        trace!(?head, "tick");

        let cause = if !self.config.in_bounds(head) {
            Some(GameOverCause::OutOfBounds)
        } else if self.state.snake.head_hits_body() {
            Some(GameOverCause::SelfCollision)
        } else {
            None
        };

        if let Some(cause) = cause {
            let length = self.state.snake.len();
            self.reset(length, cause);
            return TickOutcome::GameOver { length, cause };
        }

        let ate = head == self.state.food;
        if ate {
            self.state.snake.regrow(tail);
            self.eat();
        }

        self.notify();
        if ate { TickOutcome::Ate } else { TickOutcome::Moved }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { snake_body: self.state.snake.body().to_vec(), food: self.state.food }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    ///////////////////////////////////////////////////////////////////////////

    fn eat(&mut self) {
        self.state.food = random_food(&self.config, &mut self.rng);

        if self.state.speed > self.config.speed_floor {
            self.state.speed = self.state.speed.saturating_sub(self.config.speed_decrement).max(1);
            self.cancel_tick();
            self.schedule_tick();
        }

        debug!(length = self.state.snake.len(), speed = self.state.speed, food = ?self.state.food, "ate food");
    }

    fn reset(&mut self, length: usize, cause: GameOverCause) {
        info!(length, ?cause, "game over");
        self.send(GameEvent::GameOver { length, cause });

        let food = match self.config.food_on_reset {
            FoodOnReset::Initial => {
                debug!(food = ?self.start_food, "reusing the starting food position");
                self.start_food
            },
            FoodOnReset::Regenerate => random_food(&self.config, &mut self.rng),
        };

        self.cancel_tick();
        self.state = fresh_state(&self.config, food);
        self.schedule_tick();
        self.notify();
    }

    fn schedule_tick(&mut self) {
        debug_assert!(self.state.tick_handle.is_none(), "old tick must be cancelled first");
        let every = GameConfig::tick_interval(self.state.speed);
        self.state.tick_handle = Some(self.scheduler.schedule(every));
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.state.tick_handle.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn notify(&self) {
        self.send(GameEvent::StateChanged(self.snapshot()));
    }

    fn send(&self, event: GameEvent) {
        // Nobody listening is fine, the state is still queryable.
        if self.events.send(event).is_err() {
            trace!("event dropped, receiver gone");
        }
    }
}

fn fresh_state(config: &GameConfig, food: Coords) -> GameState {
    GameState {
        snake: Snake::new(config.initial_body.clone(), config.initial_direction),
        food,
        speed: config.initial_speed,
        tick_handle: None,
    }
}

/// Each axis is drawn independently over the cell-aligned positions. May land on the snake.
fn random_food<R: Rng>(config: &GameConfig, rng: &mut R) -> Coords {
    let cells = config.cells_per_side();
    let x = rng.gen_range(0..cells) * config.cell_size;
    let y = rng.gen_range(0..cells) * config.cell_size;
    (x, y)
}
