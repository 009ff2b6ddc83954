use crate::config::Settings;
use crate::game::Game;
use crate::input::Intent;
use crate::render::{self, Frame};
use crate::scheduler::FrameHost;
use crate::store::ScoreStore;

/// Logical drawing surface the board is composed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
}

impl Surface {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            width: settings.surface_width,
            height: settings.surface_height,
            cell_size: settings.cell_size(),
        }
    }
}

/// Result of one pass through the loop.
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub ticks: u32,
    pub frame: Frame,
}

/// Applies this frame's intents, runs the due ticks, then composes the
/// frame once no matter how many ticks ran.
pub fn step<S: ScoreStore>(
    game: &mut Game<S>,
    intents: &[Intent],
    now_ms: f64,
    surface: &Surface,
) -> FrameReport {
    for intent in intents {
        game.handle(*intent, now_ms);
    }
    let ticks = game.frame(now_ms);
    let frame = render::compose(
        game.state(),
        &game.hud(),
        surface.width,
        surface.height,
        surface.cell_size,
    );
    FrameReport { ticks, frame }
}

/// Drives the game until a quit intent arrives. `poll` yields the intents
/// gathered since the last frame and `present` shows each composed frame.
/// Returns the number of frames presented.
pub async fn run<H, S, P, D>(
    host: &mut H,
    game: &mut Game<S>,
    surface: &Surface,
    mut now_ms: f64,
    mut poll: P,
    mut present: D,
) -> u64
where
    H: FrameHost,
    S: ScoreStore,
    P: FnMut() -> Vec<Intent>,
    D: FnMut(&FrameReport),
{
    let mut frames = 0;
    loop {
        let intents = poll();
        let report = step(game, &intents, now_ms, surface);
        if game.should_quit() {
            break;
        }
        present(&report);
        frames += 1;
        now_ms = host.next_frame().await;
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::render::DrawOp;
    use crate::store::MemoryScoreStore;
    use std::collections::VecDeque;
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    struct ScriptedHost {
        times: VecDeque<f64>,
        calls: usize,
    }

    impl FrameHost for ScriptedHost {
        async fn next_frame(&mut self) -> f64 {
            self.calls += 1;
            self.times.pop_front().unwrap_or(f64::MAX)
        }
    }

    fn block_on<F: Future>(fut: F) -> F::Output {
        let mut fut = pin!(fut);
        let mut cx = Context::from_waker(Waker::noop());
        loop {
            if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
                return out;
            }
        }
    }

    fn clears(frame: &Frame) -> usize {
        frame
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Clear(_)))
            .count()
    }

    #[test]
    fn one_frame_is_composed_per_iteration() {
        // 25 ms per tick.
        let settings = Settings {
            difficulty: Difficulty::Extreme,
            ..Settings::default()
        };
        let surface = Surface::from_settings(&settings);
        let mut game = Game::new(&settings, MemoryScoreStore::default());
        let mut host = ScriptedHost {
            // 1 tick, then none, then a clamped 250 ms frame hitting the cap.
            times: VecDeque::from([25.0, 30.0, 280.0]),
            calls: 0,
        };

        let mut polls = 0;
        let poll = || {
            polls += 1;
            match polls {
                1 => vec![Intent::Start],
                5 => vec![Intent::Quit],
                _ => Vec::new(),
            }
        };
        let mut reports = Vec::new();
        let present = |report: &FrameReport| reports.push(report.clone());

        let frames = block_on(run(&mut host, &mut game, &surface, 0.0, poll, present));

        assert_eq!(frames, 4);
        assert_eq!(host.calls, 4);
        let ticks: Vec<u32> = reports.iter().map(|r| r.ticks).collect();
        assert_eq!(ticks, vec![0, 1, 0, 5]);
        for report in &reports {
            assert_eq!(clears(&report.frame), 1);
        }
    }

    #[test]
    fn intents_apply_before_ticking() {
        let settings = Settings::default();
        let surface = Surface::from_settings(&settings);
        let mut game = Game::new(&settings, MemoryScoreStore::default());

        let report = step(&mut game, &[Intent::PlayAgain], 0.0, &surface);
        assert_eq!(report.ticks, 0);
        assert!(game.state().is_running());
        assert!(report.frame.ops.iter().any(|op| matches!(
            op,
            DrawOp::Rect { x, y, w, .. } if *x == 100.0 && *y == 100.0 && *w == 8.0
        )));

        let report = step(&mut game, &[], 100.0, &surface);
        assert_eq!(report.ticks, 1);
        assert_eq!(clears(&report.frame), 1);
    }

    #[test]
    fn quit_stops_before_presenting() {
        let settings = Settings::default();
        let surface = Surface::from_settings(&settings);
        let mut game = Game::new(&settings, MemoryScoreStore::default());
        let mut host = ScriptedHost {
            times: VecDeque::new(),
            calls: 0,
        };
        let mut presented = 0;

        let frames = block_on(run(
            &mut host,
            &mut game,
            &surface,
            0.0,
            || vec![Intent::Quit],
            |_: &FrameReport| presented += 1,
        ));

        assert_eq!(frames, 0);
        assert_eq!(presented, 0);
        assert_eq!(host.calls, 0);
    }
}
