//! Emberleap: a small 2D tile platformer
//!
//! Runs a hand-rolled ECS (input, physics, collision, animation, render)
//! over a tile map loaded from JSON, with a built-in map designer:
//! - F2 switches between Play and Design
//! - F1 toggles collider outlines
//! - R puts the player back at the start
//! - Escape quits

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod assets;
mod config;
mod editor;
mod game;
mod input;
mod world;

use std::path::Path;

use macroquad::prelude::*;

use config::{GameConfig, ProjectPaths};
use editor::Designer;
use game::{GameRuntime, RuntimeSeams};
use input::{Action, InputSource, KeyboardInput};
use world::{load_map, LevelMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Play,
    Design,
}

fn load_config(paths: &ProjectPaths) -> GameConfig {
    let path = paths.config_file();
    match GameConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("bad config {}: {}, using defaults", path.display(), e);
            GameConfig::default()
        }
    }
}

fn window_conf() -> Conf {
    // Runs before main, so logging starts here
    #[cfg(not(target_arch = "wasm32"))]
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();

    let config = load_config(&ProjectPaths::discover());
    Conf {
        window_title: format!("Emberleap v{}", VERSION),
        window_width: config.screen_width,
        window_height: config.screen_height,
        window_resizable: false,
        ..Default::default()
    }
}

/// Sleep off whatever is left of the frame budget.
fn limit_frame(frame_start: f64, target_frame_time: f64) {
    if target_frame_time - (get_time() - frame_start) <= 0.0 {
        return;
    }
    // Native: sleep for the bulk, then spin for precision
    #[cfg(not(target_arch = "wasm32"))]
    {
        let spin_margin = 0.002;
        while get_time() - frame_start + spin_margin < target_frame_time {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        while get_time() - frame_start < target_frame_time {
            std::hint::spin_loop();
        }
    }
    // WASM: the browser paces frames
    #[cfg(target_arch = "wasm32")]
    {
        while get_time() - frame_start < target_frame_time {}
    }
}

/// The map to start with. A missing file is an empty map; a file that
/// exists but can't be read or parsed stops startup, so the designer can
/// never save an empty map over it.
fn startup_map(path: &Path) -> Option<LevelMap> {
    match load_map(path) {
        Ok(map) => Some(map),
        Err(e) => {
            log::error!("cannot start with map {}: {}", path.display(), e);
            log::error!("fix or remove the file and restart");
            None
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let paths = ProjectPaths::discover();
    let config = load_config(&paths);
    let assets = assets::load_game_assets(&paths);

    let map_path = paths.resolve(&config.map_path);
    let Some(map) = startup_map(&map_path) else {
        return;
    };

    let fps_limit = config.fps_limit;
    let seams = RuntimeSeams {
        input: Box::new(KeyboardInput::new()),
        canvas: Box::new(assets.bank.clone()),
        uploader: Box::new(assets.bank.clone()),
        textures: assets.textures.clone(),
    };
    let mut runtime = GameRuntime::new(config, assets.sprites, seams, &map);
    let mut designer = Designer::new(map, map_path, runtime.tile_size());

    let mut canvas = assets.bank;
    let textures = assets.textures;
    let keys = KeyboardInput::new();
    let mut mode = Mode::Play;

    loop {
        let frame_start = get_time();

        if keys.action_pressed(Action::Quit) {
            log::info!("quit");
            break;
        }

        if keys.action_pressed(Action::ToggleDesign) {
            mode = match mode {
                Mode::Play => Mode::Design,
                Mode::Design => {
                    runtime.reload_level(&designer.map);
                    Mode::Play
                }
            };
            log::info!("mode: {:?}", mode);
        }

        match mode {
            Mode::Play => {
                if keys.action_pressed(Action::ToggleHighlight) {
                    let on = runtime.toggle_highlight();
                    log::debug!("collider outlines {}", if on { "on" } else { "off" });
                }
                if keys.action_pressed(Action::ResetPlayer) {
                    runtime.reset_player();
                }
                runtime.tick(get_frame_time());
            }
            Mode::Design => {
                editor::handle_input(&mut designer);
                editor::draw(&designer, &mut canvas, &textures);
            }
        }

        if let Some(target_frame_time) = fps_limit.frame_time() {
            limit_frame(frame_start, target_frame_time);
        }

        next_frame().await;
    }
}
