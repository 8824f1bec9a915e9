use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::{Coords, ScreenPos, TermInt};
use crate::config::GameConfig;
use crate::engine::{GameEngine, GameEvent, Snapshot, TickOutcome};
use crate::error::{SnakeError, SnakeResult};
use crate::scheduler::IntervalTimer;
use crate::term::TermManager;

use crossbeam_channel::{unbounded, Receiver};
use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use rand::rngs::StdRng;
use tracing::{debug, info};

/// Upper bound on how long the loop sleeps when no tick is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(100);

const SNAKE_BODY_CHAR: char = '█';
const SNAKE_HEAD_CHAR: char = '@';
const FOOD_CHAR: char = 'O';

/// Drives a [`GameEngine`] from the terminal: the clock, the keyboard and the screen.
pub struct SnakeGame {
    term: TermManager,
    engine: GameEngine<IntervalTimer, StdRng>,
    events: Receiver<GameEvent>,
    /// What is currently drawn, so each frame only touches changed cells.
    drawn: Option<Snapshot>,
}

impl SnakeGame {
    pub fn new(config: GameConfig, rng: StdRng) -> SnakeResult<Self> {
        let (tx, events) = unbounded();
        let engine = GameEngine::new(config, IntervalTimer::new(), rng, tx);

        Ok(SnakeGame { term: TermManager::new()?, engine, events, drawn: None })
    }

    fn field_size(&self) -> ScreenPos {
        let side = self.engine.config().cells_per_side() as TermInt + 2;
        (side, side)
    }

    pub fn initialize(&mut self) -> SnakeResult<()> {
        let (width, height) = self.term.get_terminal_size();
        let (needed, _) = self.field_size();
        if width < needed || height < needed {
            return Err(SnakeError::TerminalTooSmall { width, height, needed });
        }

        self.term.setup()?;
        Ok(())
    }

    /// Must run even when `play` fails, otherwise the shell is left in raw mode.
    pub fn shutdown(&mut self) -> SnakeResult<()> {
        self.engine.stop();
        self.term.restore()?;
        Ok(())
    }

    /// Returns false if the player quit instead of starting.
    pub fn show_intro(&mut self) -> SnakeResult<bool> {
        self.term.show_message(&[
            "Arrow keys to move",
            "CTRL+C to quit",
            "",
            "Press any key to begin"
        ])?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(false);
        }

        self.term.hide_message()?;
        Ok(true)
    }

    /// Runs until CTRL+C. Game overs reset the board and keep going.
    pub fn play(&mut self) -> SnakeResult<()> {
        self.term.clear()?;
        let field = self.field_size();
        self.term.draw_borders(field)?;
        self.drawn = None;

        self.engine.start();
        self.drain_events()?;

        loop {
            let wait = self.engine.scheduler_mut()
                .time_until_due(Instant::now())
                .unwrap_or(IDLE_POLL);

            if let Some(key_ev) = self.term.poll_key(wait)? {
                if is_ctrl_c(&key_ev) {
                    info!("quit requested");
                    break;
                }
                self.engine.on_direction_input(key_ev.code);
            }

            if self.engine.scheduler_mut().take_due(Instant::now()) {
                if let TickOutcome::Ate = self.engine.on_tick() {
                    debug!(speed = self.engine.state().speed, "speed up");
                }
            }

            if !self.drain_events()? {
                break;
            }
        }

        self.engine.stop();
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Applies queued engine events to the screen. False means the player quit from a game over box.
    fn drain_events(&mut self) -> SnakeResult<bool> {
        while let Ok(event) = self.events.try_recv() {
            match event {
                GameEvent::StateChanged(snapshot) => self.draw(snapshot)?,
                GameEvent::GameOver { length, cause } => {
                    debug!(length, ?cause, "showing game over");
                    if !self.game_over(length)? {
                        return Ok(false);
                    }
                },
            }
        }

        Ok(true)
    }

    /// Blocks until a key is pressed, so no ticks are processed meanwhile.
    fn game_over(&mut self, length: usize) -> SnakeResult<bool> {
        self.term.show_message(&[
            "Game over!",
            &*format!("Snake length is {}", length),
            "",
            "Press any key to play again,",
            "or CTRL+C to quit."
        ])?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(false);
        }

        self.term.hide_message()?;
        // The reset board gets its first move a whole interval after the box closes
        self.engine.scheduler_mut().restart(Instant::now());
        Ok(true)
    }

    fn draw(&mut self, snapshot: Snapshot) -> SnakeResult<()> {
        let cell = self.engine.config().cell_size;
        let new_cells: HashSet<Coords> = snapshot.snake_body.iter().copied().chain(Some(snapshot.food)).collect();

        if let Some(old) = self.drawn.take() {
            for pos in old.snake_body.iter().copied().chain(Some(old.food)) {
                if !new_cells.contains(&pos) {
                    self.term.print_at(to_screen(pos, cell), ' ')?;
                }
            }
        }

        let head = snapshot.snake_body.last().copied();
        for pos in &snapshot.snake_body {
            let ch = if Some(*pos) == head {SNAKE_HEAD_CHAR} else {SNAKE_BODY_CHAR};
            self.term.print_at(to_screen(*pos, cell), ch)?;
        }

        if !snapshot.snake_body.contains(&snapshot.food) {
            self.term.print_at(to_screen(snapshot.food, cell), FOOD_CHAR)?;
        }

        self.term.flush()?;
        self.drawn = Some(snapshot);
        Ok(())
    }
}

/// One character per cell, shifted inside the border.
fn to_screen((x, y): Coords, cell: i32) -> ScreenPos {
    ((x / cell) as TermInt + 1, (y / cell) as TermInt + 1)
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_map_inside_the_border() {
        assert_eq!(to_screen((0, 0), 2), (1, 1));
        assert_eq!(to_screen((98, 98), 2), (50, 50));
        assert_eq!(to_screen((4, 10), 2), (3, 6));
    }

    #[test]
    fn only_ctrl_c_quits() {
        assert!(is_ctrl_c(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_ctrl_c(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_ctrl_c(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
    }
}
