use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, info, warn};
use macroquad::prelude::*;
use simplelog::{Config, SimpleLogger, WriteLogger};

mod config;
mod difficulty;
mod engine;
mod game;
mod grid;
mod host;
mod input;
mod render;
mod scheduler;
mod store;

use game::Game;
use host::Surface;
use render::Viewport;
use scheduler::FrameHost;
use store::JsonScoreStore;

struct MacroquadHost;

impl FrameHost for MacroquadHost {
    async fn next_frame(&mut self) -> f64 {
        next_frame().await;
        get_time() * 1000.0
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Snek Extreme".to_owned(),
        window_width: 900,
        window_height: 600,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Logs to `path`, or to stderr when the file cannot be opened. The open
/// error is handed back so it can be logged once a logger exists.
fn init_logging(level: LevelFilter, path: &Path) -> io::Result<()> {
    let (installed, result) = match open_log_file(path) {
        Ok(file) => (WriteLogger::init(level, Config::default(), file), Ok(())),
        Err(err) => (SimpleLogger::init(level, Config::default()), Err(err)),
    };
    if installed.is_err() {
        eprintln!("Logger already initialised");
    }
    result
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0xC0FFEE)
}

fn typed_chars() -> Vec<char> {
    std::iter::from_fn(get_char_pressed).collect()
}

#[macroquad::main(window_conf)]
async fn main() {
    let paths = config::project_paths();
    let loaded = config::load_settings(&paths.settings_path);
    let mut settings = loaded.as_ref().cloned().unwrap_or_default();

    let logging = init_logging(settings.log_level(), &paths.log_path);
    info!("Starting Snek Extreme ({:?})", settings.variant);
    if let Err(err) = logging {
        warn!("Logging to stderr, could not open {}: {}", paths.log_path.display(), err);
    }
    if let Err(err) = &loaded {
        warn!("Using default settings: {}", err);
    }

    macroquad::rand::srand(seed_from_clock());

    let store = JsonScoreStore::new(paths.scores_path(&settings), settings.variant.score_layout());
    info!("High scores at {}", store.path().display());

    let mut game = Game::new(&settings, store);
    let surface = Surface::from_settings(&settings);
    let frames = host::run(
        &mut MacroquadHost,
        &mut game,
        &surface,
        get_time() * 1000.0,
        || input::collect_intents(get_keys_pressed(), typed_chars()),
        |report| {
            let viewport = Viewport::fit(
                screen_width(),
                screen_height(),
                surface.width as f32,
                surface.height as f32,
            );
            render::paint(&report.frame, &viewport);
        },
    )
    .await;
    info!("Quit after {} frames", frames);

    if settings.difficulty != game.difficulty() {
        settings.difficulty = game.difficulty();
        if let Err(err) = config::save_settings(&paths.settings_path, &settings) {
            warn!("Could not save settings: {}", err);
        }
    }
    info!("Bye");
}
