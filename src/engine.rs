use std::collections::{HashSet, VecDeque};

use macroquad::rand::gen_range;

use crate::grid::{Cell, Direction, Grid};

/// Preferred spawn cell for a new round.
pub const START_CELL: Cell = Cell::new(10, 10);

const SPAWN_ATTEMPTS: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    pub grid: Grid,
    pub rocks: bool,
    pub score_per_food: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeathCause {
    Wall,
    SelfCollision,
    Rock,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Moved,
    Ate,
    Died(DeathCause),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub snake: VecDeque<Cell>,
    pub food: Option<Cell>,
    pub rocks: HashSet<Cell>,
    pub direction: Direction,
    pub pending: Option<Direction>,
    pub score: u32,
    pub terminal: bool,
    pub paused: bool,
    pub death: Option<DeathCause>,
}

impl GameState {
    /// State between rounds: nothing on the board and no ticks accepted.
    pub fn idle() -> Self {
        Self {
            snake: VecDeque::new(),
            food: None,
            rocks: HashSet::new(),
            direction: Direction::Right,
            pending: None,
            score: 0,
            terminal: true,
            paused: false,
            death: None,
        }
    }

    pub fn fresh(grid: &Grid) -> Self {
        let start = if grid.contains(START_CELL) { START_CELL } else { grid.center() };
        let mut state = Self {
            snake: VecDeque::from([start]),
            terminal: false,
            ..Self::idle()
        };
        state.food = spawn_free_cell(grid, &state.occupied());
        state
    }

    pub fn head(&self) -> Option<Cell> {
        self.snake.front().copied()
    }

    pub fn is_running(&self) -> bool {
        !self.terminal && !self.paused
    }

    /// Queues a turn for the next tick. A turn onto the opposite of the
    /// current heading is rejected and leaves any earlier queued turn intact.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Returns whether the state changed.
    pub fn toggle_pause(&mut self) -> bool {
        if self.terminal {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    pub fn occupied(&self) -> HashSet<Cell> {
        self.snake.iter().chain(self.rocks.iter()).copied().collect()
    }

    fn finish(&mut self, cause: DeathCause) -> TickOutcome {
        self.terminal = true;
        self.death = Some(cause);
        TickOutcome::Died(cause)
    }
}

pub fn tick(state: &mut GameState, rules: &Rules) -> TickOutcome {
    if !state.is_running() {
        return TickOutcome::Idle;
    }
    let Some(head) = state.head() else {
        return TickOutcome::Idle;
    };

    if let Some(next) = state.pending.take() {
        state.direction = next;
    }
    let new_head = head.step(state.direction);

    if !rules.grid.contains(new_head) {
        return state.finish(DeathCause::Wall);
    }
    if state.snake.contains(&new_head) {
        return state.finish(DeathCause::SelfCollision);
    }

    state.snake.push_front(new_head);

    let ate = state.food == Some(new_head);
    if ate {
        state.score += rules.score_per_food;
        let mut occupied = state.occupied();
        state.food = spawn_free_cell(&rules.grid, &occupied);
        if rules.rocks {
            occupied.extend(state.food);
            if let Some(rock) = spawn_free_cell(&rules.grid, &occupied) {
                state.rocks.insert(rock);
            }
        }
    } else {
        state.snake.pop_back();
    }

    if state.snake.iter().any(|segment| state.rocks.contains(segment)) {
        return state.finish(DeathCause::Rock);
    }

    if ate { TickOutcome::Ate } else { TickOutcome::Moved }
}

/// Picks a random cell not in `occupied`. Random probing first, then a
/// uniform pick among the remaining free cells; `None` on a full board.
pub fn spawn_free_cell(grid: &Grid, occupied: &HashSet<Cell>) -> Option<Cell> {
    if grid.area() == 0 {
        return None;
    }
    for _ in 0..SPAWN_ATTEMPTS {
        let cell = Cell::new(gen_range(0, grid.columns), gen_range(0, grid.rows));
        if !occupied.contains(&cell) {
            return Some(cell);
        }
    }

    let free: Vec<Cell> = grid.cells().filter(|c| !occupied.contains(c)).collect();
    if free.is_empty() {
        None
    } else {
        Some(free[gen_range(0, free.len())])
    }
}
