use log::{debug, info, warn};

use crate::config::{Settings, Variant};
use crate::difficulty::Difficulty;
use crate::engine::{self, GameState, Rules};
use crate::input::Intent;
use crate::scheduler::{FixedTimestep, PerfCounters};
use crate::store::ScoreStore;

/// Values the HUD and overlays show alongside the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub high_score: u32,
    pub new_high_score: bool,
    pub difficulty: Difficulty,
    pub difficulty_locked: bool,
    pub fps: u32,
    pub tps: u32,
    pub show_debug: bool,
}

/// Owns the game state and drives it: routes intents, runs the fixed
/// timestep each frame, and keeps the high score store in sync.
pub struct Game<S: ScoreStore> {
    rules: Rules,
    variant: Variant,
    state: GameState,
    difficulty: Difficulty,
    store: S,
    high_score: u32,
    best_before_round: u32,
    timestep: FixedTimestep,
    perf: PerfCounters,
    show_debug: bool,
    quit: bool,
}

impl<S: ScoreStore> Game<S> {
    pub fn new(settings: &Settings, store: S) -> Self {
        let difficulty = settings.difficulty;
        let high_score = store.get(difficulty);
        Self {
            rules: settings.rules(),
            variant: settings.variant,
            state: GameState::idle(),
            difficulty,
            store,
            high_score,
            best_before_round: high_score,
            timestep: FixedTimestep::new(difficulty.ms_per_update(), settings.limits()),
            perf: PerfCounters::default(),
            show_debug: settings.show_debug,
            quit: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.state.score,
            high_score: self.high_score,
            new_high_score: self.state.score > self.best_before_round,
            difficulty: self.difficulty,
            difficulty_locked: !self.state.terminal || !self.variant.difficulty_selectable(),
            fps: self.perf.fps,
            tps: self.perf.tps,
            show_debug: self.show_debug,
        }
    }

    pub fn handle(&mut self, intent: Intent, now_ms: f64) {
        match intent {
            Intent::Quit => self.quit = true,
            Intent::Reset => self.reset(),
            Intent::Start if self.state.paused => self.toggle_pause(now_ms),
            Intent::Start => self.start(now_ms),
            Intent::Easier => {
                self.set_difficulty(self.difficulty.easier());
            }
            Intent::Harder => {
                self.set_difficulty(self.difficulty.harder());
            }
            Intent::PlayAgain if self.state.terminal => self.start(now_ms),
            _ if self.state.terminal => {}
            Intent::TogglePause => self.toggle_pause(now_ms),
            _ if self.state.paused => {}
            Intent::Steer(direction) => {
                self.state.steer(direction);
            }
            Intent::Restart => self.start(now_ms),
            Intent::PlayAgain => {}
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.reset();
        self.state = GameState::fresh(&self.rules.grid);
        self.best_before_round = self.high_score;
        self.timestep.set_ms_per_update(self.difficulty.ms_per_update());
        self.timestep.restart(now_ms);
        self.perf.reset(now_ms);
        info!(
            "Round started on {} ({} ms per tick)",
            self.difficulty.name(),
            self.timestep.ms_per_update()
        );
    }

    /// Back to the idle board. Calling it repeatedly has no further effect.
    pub fn reset(&mut self) {
        self.state = GameState::idle();
        self.high_score = self.store.get(self.difficulty);
        self.best_before_round = self.high_score;
    }

    pub fn toggle_pause(&mut self, now_ms: f64) {
        if !self.state.toggle_pause() {
            return;
        }
        if self.state.paused {
            info!("Paused at score {}", self.state.score);
        } else {
            self.timestep.restart(now_ms);
            info!("Resumed");
        }
    }

    /// Only allowed between rounds; otherwise ignored.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if !self.state.terminal || !self.variant.difficulty_selectable() {
            debug!("Ignoring difficulty change to {} mid-round", difficulty.name());
            return false;
        }
        if difficulty == self.difficulty {
            return false;
        }
        self.difficulty = difficulty;
        self.timestep.set_ms_per_update(difficulty.ms_per_update());
        self.high_score = self.store.get(difficulty);
        self.best_before_round = self.high_score;
        info!("Difficulty set to {}", difficulty.name());
        true
    }

    /// Runs the ticks due at `now_ms`. Returns how many ran.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let ticks = if self.state.is_running() {
            let Self { state, rules, timestep, .. } = self;
            timestep.advance(now_ms, || {
                engine::tick(state, rules);
            })
        } else {
            self.timestep.idle(now_ms);
            0
        };
        self.perf.record(now_ms, ticks);

        if self.state.score > self.high_score {
            self.high_score = self.state.score;
            if let Err(err) = self.store.set(self.difficulty, self.high_score) {
                warn!("Could not save high score: {}", err);
            }
        }
        if ticks > 0 {
            if let Some(cause) = self.state.death {
                info!("Game over ({:?}) with score {}", cause, self.state.score);
            }
        }
        ticks
    }
}
