//! Browser bridge: a thread-local [`GameRunner`] driving the platformer, and
//! the `#[wasm_bindgen]` functions the host page calls every frame.
//!
//! The host reads render instances, sound IDs and game events straight out of
//! WASM memory through the pointer/length accessors after each `game_tick`.

pub mod runner;

use std::cell::RefCell;

use tilehop_engine::{
    AssetManifest, EngineError, GameConfig, InputEvent, MemoryMapLoader, Platformer,
};
use wasm_bindgen::prelude::*;

pub use runner::GameRunner;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner<Platformer>>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. `None` before a successful `game_init`.
fn with_runner<R>(f: impl FnOnce(&mut GameRunner<Platformer>) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn js_error(err: EngineError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Register every map of a `{ "id": <tiled map>, ... }` object.
pub fn loader_from_json(maps_json: &str) -> Result<MemoryMapLoader, EngineError> {
    let maps: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(maps_json).map_err(EngineError::Config)?;
    let mut loader = MemoryMapLoader::new();
    for (id, map) in maps {
        loader.insert(id, map.to_string());
    }
    Ok(loader)
}

/// Build the game from the host's config, asset manifest and maps, and run `init`.
pub fn build_runner(
    config_json: &str,
    manifest_json: &str,
    maps_json: &str,
) -> Result<GameRunner<Platformer>, EngineError> {
    let config = GameConfig::from_json(config_json)?;
    let manifest = AssetManifest::from_json(manifest_json)?;
    let loader = loader_from_json(maps_json)?;
    let mut runner = GameRunner::new(Platformer::new(config, manifest, Box::new(loader)));
    runner.init()?;
    Ok(runner)
}

#[wasm_bindgen]
pub fn game_init(config_json: &str, manifest_json: &str, maps_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = build_runner(config_json, manifest_json, maps_json).map_err(|err| {
        log::error!("tilehop: init failed: {err}");
        js_error(err)
    })?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("tilehop: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn game_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn game_key_up(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
}

/// The page is closing.
#[wasm_bindgen]
pub fn game_quit() {
    with_runner(|r| r.push_input(InputEvent::Quit));
}

#[wasm_bindgen]
pub fn game_wants_quit() -> bool {
    with_runner(|r| r.wants_quit()).unwrap_or(true)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_sound_events_ptr() -> *const u8 {
    with_runner(|r| r.sound_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_sound_events_len() -> u32 {
    with_runner(|r| r.sound_events_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(|r| r.game_events_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_screen_width() -> f32 {
    with_runner(|r| r.screen_width()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_screen_height() -> f32 {
    with_runner(|r| r.screen_height()).unwrap_or(0.0)
}

/// Current game mode index (see `GameMode::index`), or -1 before init.
#[wasm_bindgen]
pub fn get_mode() -> f32 {
    with_runner(|r| r.game().mode().index()).unwrap_or(-1.0)
}

/// The menu on screen as JSON, or an empty string while playing.
#[wasm_bindgen]
pub fn get_menu_json() -> String {
    with_runner(|r| {
        r.game().menu().map(|menu| {
            menu.to_json().unwrap_or_else(|err| {
                log::error!("tilehop: menu serialization failed: {err}");
                String::new()
            })
        })
    })
    .flatten()
    .unwrap_or_default()
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_instances() -> u32 {
    with_runner(|r| r.max_instances()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_sounds() -> u32 {
    with_runner(|r| r.max_sounds()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilehop_engine::GameMode;

    const MANIFEST: &str = r#"{
        "atlases": [
            { "name": "sprites", "cols": 8, "rows": 8, "path": "sprites.png" },
            { "name": "tiles", "cols": 8, "rows": 8, "path": "tiles.png" }
        ],
        "sheets": {
            "player": { "atlas": "sprites", "row": 0 },
            "enemy": { "atlas": "sprites", "row": 1, "faces": "left" },
            "explosion": { "atlas": "sprites", "row": 2, "span": 2 },
            "heart": { "atlas": "sprites", "row": 4 }
        }
    }"#;

    const MAPS: &str = r#"{
        "level1": {
            "width": 2, "height": 2, "tilewidth": 16, "tileheight": 16,
            "layers": [
                { "type": "tilelayer", "name": "a", "width": 2, "height": 2, "data": [0,0,0,0] },
                { "type": "tilelayer", "name": "b", "width": 2, "height": 2, "data": [0,0,0,0] },
                { "type": "tilelayer", "name": "blocks", "width": 2, "height": 2, "data": [0,0,1,1] }
            ],
            "tilesets": [ { "firstgid": 1, "name": "tiles", "columns": 8 } ]
        }
    }"#;

    #[test]
    fn maps_object_feeds_the_loader() {
        let loader = loader_from_json(MAPS).unwrap();
        assert!(loader.contains("level1"));
        assert!(loader_from_json("[1, 2]").is_err());
    }

    #[test]
    fn builds_a_runner_on_the_main_menu() {
        let runner = build_runner("{}", MANIFEST, MAPS).unwrap();
        assert_eq!(runner.game().mode(), GameMode::MainMenu);
        assert!(runner.game().menu().is_some());
    }

    #[test]
    fn missing_start_map_fails_init() {
        let err = build_runner(r#"{ "start_map": "nowhere" }"#, MANIFEST, MAPS).unwrap_err();
        assert!(matches!(err, EngineError::MapNotFound(id) if id == "nowhere"));
    }
}
