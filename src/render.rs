use macroquad::prelude::*;

use crate::engine::GameState;
use crate::game::Hud;
use crate::grid::Cell;

const BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 1.0);
const LETTERBOX: Color = Color::new(0.06, 0.06, 0.08, 1.0);
const SNAKE_HEAD: Color = Color::new(0.55, 0.85, 0.45, 1.0);
const SNAKE_BODY: Color = Color::new(0.30, 0.69, 0.31, 1.0); // #4CAF50
const FOOD: Color = Color::new(1.0, 0.34, 0.13, 1.0); // #FF5722
const ROCK: Color = Color::new(0.5, 0.5, 0.5, 1.0);
const HUD_TEXT: Color = Color::new(0.85, 0.85, 0.85, 1.0);
const DEBUG_TEXT: Color = Color::new(0.0, 1.0, 0.0, 1.0);
const HINT: Color = Color::new(0.67, 0.67, 0.67, 1.0);
const GAME_OVER: Color = Color::new(1.0, 0.3, 0.3, 1.0);
const NEW_HIGH: Color = SNAKE_BODY;

/// One drawing step in surface units.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    /// `y` is the baseline; centred text is centred on `x`.
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        centered: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl Frame {
    fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    fn cell(&mut self, cell: Cell, cell_size: f32, color: Color) {
        // Inset by two units so a grid gap shows between neighbours.
        self.ops.push(DrawOp::Rect {
            x: cell.x as f32 * cell_size,
            y: cell.y as f32 * cell_size,
            w: cell_size - 2.0,
            h: cell_size - 2.0,
            color,
        });
    }

    fn shade(&mut self, alpha: f32) {
        self.ops.push(DrawOp::Rect {
            x: 0.0,
            y: 0.0,
            w: self.width,
            h: self.height,
            color: Color::new(0.0, 0.0, 0.0, alpha),
        });
    }

    fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            size,
            color,
            centered: false,
        });
    }

    fn centered(&mut self, text: impl Into<String>, dy: f32, size: f32, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            x: self.width / 2.0,
            y: self.height / 2.0 + dy,
            size,
            color,
            centered: true,
        });
    }
}

/// Builds the draw list for one frame. Reads state only.
pub fn compose(state: &GameState, hud: &Hud, width: u32, height: u32, cell_size: u32) -> Frame {
    let mut frame = Frame::new(width as f32, height as f32);
    let size = cell_size as f32;
    frame.ops.push(DrawOp::Clear(BACKGROUND));

    for (i, segment) in state.snake.iter().enumerate() {
        frame.cell(*segment, size, if i == 0 { SNAKE_HEAD } else { SNAKE_BODY });
    }
    if let Some(food) = state.food {
        frame.cell(food, size, FOOD);
    }
    for rock in &state.rocks {
        frame.cell(*rock, size, ROCK);
    }

    frame.text(
        format!(
            "Score: {}   High: {}   {}",
            hud.score,
            hud.high_score,
            hud.difficulty.name().to_uppercase()
        ),
        6.0,
        16.0,
        16.0,
        HUD_TEXT,
    );
    if hud.show_debug {
        frame.text(format!("FPS: {}", hud.fps), frame.width - 90.0, 16.0, 16.0, DEBUG_TEXT);
        frame.text(format!("TPS: {}", hud.tps), frame.width - 90.0, 32.0, 16.0, DEBUG_TEXT);
    }

    if state.terminal && state.snake.is_empty() {
        ready_overlay(&mut frame, hud);
    } else if state.terminal {
        game_over_overlay(&mut frame, hud);
    } else if state.paused {
        frame.shade(0.7);
        frame.centered("PAUSED", 0.0, 30.0, WHITE);
        frame.centered("Press P or Enter to continue", 40.0, 16.0, WHITE);
    }
    frame
}

fn ready_overlay(frame: &mut Frame, hud: &Hud) {
    frame.shade(0.6);
    frame.centered("SNEK", -50.0, 40.0, SNAKE_HEAD);
    frame.centered(
        format!("Difficulty: {}", hud.difficulty.label()),
        0.0,
        22.0,
        WHITE,
    );
    frame.centered(format!("High Score: {}", hud.high_score), 30.0, 18.0, WHITE);
    if !hud.difficulty_locked {
        frame.centered("[ / ] to change difficulty", 70.0, 16.0, HINT);
    }
    frame.centered("Press SPACE or Enter to start", 100.0, 16.0, HINT);
}

fn game_over_overlay(frame: &mut Frame, hud: &Hud) {
    frame.shade(0.8);
    frame.centered("GAME OVER", -60.0, 40.0, GAME_OVER);
    frame.centered(format!("Final Score: {}", hud.score), 0.0, 24.0, WHITE);
    if hud.new_high_score {
        frame.centered("New High Score!", 40.0, 22.0, NEW_HIGH);
    } else {
        frame.centered(format!("High Score: {}", hud.high_score), 40.0, 22.0, WHITE);
    }
    frame.centered("Press SPACE to play again", 100.0, 16.0, HINT);
    frame.centered("or Backspace to reset", 130.0, 16.0, HINT);
}

/// Maps surface units onto the window, keeping the aspect ratio.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub off_x: f32,
    pub off_y: f32,
}

impl Viewport {
    pub fn fit(screen_w: f32, screen_h: f32, surface_w: f32, surface_h: f32) -> Self {
        let scale = (screen_w / surface_w).min(screen_h / surface_h).max(0.0);
        Self {
            scale,
            off_x: (screen_w - surface_w * scale) * 0.5,
            off_y: (screen_h - surface_h * scale) * 0.5,
        }
    }

    fn x(&self, x: f32) -> f32 {
        self.off_x + x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        self.off_y + y * self.scale
    }
}

pub fn paint(frame: &Frame, viewport: &Viewport) {
    clear_background(LETTERBOX);
    for op in &frame.ops {
        match op {
            DrawOp::Clear(color) => draw_rectangle(
                viewport.off_x,
                viewport.off_y,
                frame.width * viewport.scale,
                frame.height * viewport.scale,
                *color,
            ),
            DrawOp::Rect { x, y, w, h, color } => draw_rectangle(
                viewport.x(*x),
                viewport.y(*y),
                w * viewport.scale,
                h * viewport.scale,
                *color,
            ),
            DrawOp::Text {
                text,
                x,
                y,
                size,
                color,
                centered,
            } => {
                let font_size = (size * viewport.scale).max(1.0);
                let mut sx = viewport.x(*x);
                if *centered {
                    sx -= measure_text(text, None, font_size as u16, 1.0).width * 0.5;
                }
                draw_text(text, sx, viewport.y(*y), font_size, *color);
            }
        }
    }
}
