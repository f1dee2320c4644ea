//! Browser bindings
//!
//! Exposes the core to a JS host. Geometry goes in as plain numbers; state
//! comes out as JSON strings so the renderer can `JSON.parse` one snapshot
//! per frame.

use wasm_bindgen::prelude::*;

use crate::config::SimConfig;
use crate::schedule::{DateKey, ScheduleStore, load_scheduled_message};
use crate::sim::GelatoWorld;

#[wasm_bindgen]
pub struct WebGelato {
    world: GelatoWorld,
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
impl WebGelato {
    /// Create a core from an optional JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebGelato, JsValue> {
        super::init_logging();
        let config = match config_json {
            Some(json) => SimConfig::from_json(&json).map_err(js_err)?,
            None => SimConfig::default(),
        };
        Ok(Self {
            world: GelatoWorld::new(config),
        })
    }

    pub fn step(&mut self, delta_ms: f32) {
        self.world.step(delta_ms);
    }

    /// Returns `[x0, y0, x1, y1]` of the clamped springboard, or `undefined`
    #[wasm_bindgen(js_name = createSpringboard)]
    pub fn create_springboard(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<Vec<f32>> {
        self.world
            .create_springboard(x0, y0, x1, y1)
            .map(|line| vec![line.start.x, line.start.y, line.end.x, line.end.y])
    }

    #[wasm_bindgen(js_name = destroySpringboard)]
    pub fn destroy_springboard(&mut self) {
        self.world.destroy_springboard();
    }

    #[wasm_bindgen(js_name = updateBoundaries)]
    pub fn update_boundaries(&mut self, width: f32, height: f32) {
        self.world.update_boundaries(width, height);
    }

    #[wasm_bindgen(js_name = setMessage)]
    pub fn set_message(&mut self, text: &str) -> Result<usize, JsValue> {
        self.world.set_message(text).map_err(js_err)
    }

    /// Load the message scheduled for `date` (`YYYY-MM-DD`) from LocalStorage
    #[wasm_bindgen(js_name = loadScheduledMessage)]
    pub fn load_scheduled_message(&mut self, date: &str) -> Result<usize, JsValue> {
        let date: DateKey = date.parse().map_err(js_err)?;
        let store = ScheduleStore::load_local().map_err(js_err)?;
        load_scheduled_message(&mut self.world, &store, date).map_err(js_err)
    }

    /// Current frame as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.world.snapshot().to_json().map_err(js_err)
    }

    /// Events since the last call, as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.world.drain_events()).map_err(js_err)
    }

    pub fn destroy(&mut self) {
        self.world.destroy();
    }
}
