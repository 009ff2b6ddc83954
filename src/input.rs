use macroquad::input::KeyCode;

use crate::grid::Direction;

/// What a key press asks the game to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Steer(Direction),
    /// R: start over mid-round.
    Restart,
    /// Space: start a new round from the game-over screen.
    PlayAgain,
    TogglePause,
    /// Enter: resume when paused, otherwise start a new round.
    Start,
    Reset,
    Easier,
    Harder,
    Quit,
}

pub fn intent_for_key(key: KeyCode) -> Option<Intent> {
    let intent = match key {
        KeyCode::Up | KeyCode::W => Intent::Steer(Direction::Up),
        KeyCode::Down | KeyCode::S => Intent::Steer(Direction::Down),
        KeyCode::Left | KeyCode::A => Intent::Steer(Direction::Left),
        KeyCode::Right | KeyCode::D => Intent::Steer(Direction::Right),
        KeyCode::R => Intent::Restart,
        KeyCode::P => Intent::TogglePause,
        KeyCode::Space => Intent::PlayAgain,
        KeyCode::Enter | KeyCode::KpEnter => Intent::Start,
        KeyCode::Backspace => Intent::Reset,
        KeyCode::LeftBracket => Intent::Easier,
        KeyCode::RightBracket => Intent::Harder,
        KeyCode::Escape | KeyCode::Q => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}

/// Same mapping for textual key names ("ArrowUp", "w", " ", ...), ignoring case.
pub fn intent_for_name(name: &str) -> Option<Intent> {
    let key = match name.to_ascii_lowercase().as_str() {
        "arrowup" | "up" => KeyCode::Up,
        "arrowdown" | "down" => KeyCode::Down,
        "arrowleft" | "left" => KeyCode::Left,
        "arrowright" | "right" => KeyCode::Right,
        "w" => KeyCode::W,
        "a" => KeyCode::A,
        "s" => KeyCode::S,
        "d" => KeyCode::D,
        "r" => KeyCode::R,
        "p" => KeyCode::P,
        " " | "space" | "spacebar" => KeyCode::Space,
        "enter" | "return" => KeyCode::Enter,
        "backspace" => KeyCode::Backspace,
        "[" => KeyCode::LeftBracket,
        "]" => KeyCode::RightBracket,
        "escape" | "esc" => KeyCode::Escape,
        "q" => KeyCode::Q,
        _ => return None,
    };
    intent_for_key(key)
}

/// Intents for one frame: key codes first, then typed characters. A typed
/// character only adds an intent its key press did not already produce, so
/// layouts that type `[` or `]` off the bracket keys still reach them.
pub fn collect_intents(
    keys: impl IntoIterator<Item = KeyCode>,
    typed: impl IntoIterator<Item = char>,
) -> Vec<Intent> {
    let mut intents: Vec<Intent> = keys.into_iter().filter_map(intent_for_key).collect();
    let mut buf = [0u8; 4];
    for ch in typed {
        if let Some(intent) = intent_for_name(ch.encode_utf8(&mut buf)) {
            if !intents.contains(&intent) {
                intents.push(intent);
            }
        }
    }
    intents
}
