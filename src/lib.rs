//! Dread Spinner core crate.
//!
//! Three vertical sprite reels spin on canvases, flip direction after a short
//! warm-up and stop on frames drawn before the spin started; the landed frames
//! are matched against a combo table to settle the player's credits.
//!
//! Everything except [`web`] is plain Rust and runs under native `cargo test`.

use wasm_bindgen::prelude::*;

pub mod combos;
pub mod config;
mod logger;
pub mod rng;
pub mod session;
pub mod spinner;
pub mod sprite;
mod web;

pub use combos::{Combo, ComboTable, Resolution};
pub use config::{ConfigError, SpinnerConfig};
pub use rng::{RandomSource, SeededRng, SequenceRng};
pub use session::{BetError, CreditTone, ReelId, RoundOutcome, Session, parse_bet};
pub use spinner::{MachineEvent, Reel, SlotMachine, StartOutcome};
pub use sprite::{Direction, SourceRect, SpriteEvent, SpriteOptions, SpriteState, VerticalSprite};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Wire up the page with the stock cabinet settings.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start(SpinnerConfig::default())
}

/// Same as `start_game` with overrides from a (partial) JSON config object.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = SpinnerConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    web::start(config)
}

/// Spin from a page button; false while a round is in flight or the bet is invalid.
#[wasm_bindgen]
pub fn spin() -> bool {
    web::spin()
}

#[wasm_bindgen]
pub fn ready_for_spin() -> bool {
    web::is_ready()
}
