use log::debug;
use wasm_bindgen::prelude::*;

pub mod board;
pub mod game;
pub mod types;

pub use board::Board;
pub use game::GameEngine;
pub use types::{BOARD_SIZE, CORNERS, Color, Coordinate, GameSnapshot, GameState, MoveError};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// String-based driver for a single game, addressed with algebraic squares
/// such as `"a1"` (row a, column 1).
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct HasamiShogi {
    engine: GameEngine,
}

#[wasm_bindgen]
impl HasamiShogi {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_game_state(&self) -> String {
        self.engine.game_state().as_str().to_string()
    }

    pub fn get_active_player(&self) -> String {
        self.engine.active_player().as_str().to_string()
    }

    /// Returns `undefined` for anything other than `"BLACK"` or `"RED"`.
    pub fn get_num_captured_pieces(&self, color: &str) -> Option<u8> {
        Color::from_name(color).map(|color| self.engine.captured_count(color))
    }

    pub fn get_square_occupant(&self, square: &str) -> String {
        Coordinate::from_algebraic(square)
            .and_then(|square| self.engine.occupant(square))
            .map_or("NONE", Color::as_str)
            .to_string()
    }

    pub fn make_move(&mut self, origin: &str, destination: &str) -> bool {
        match (parse_square(origin), parse_square(destination)) {
            (Ok(origin), Ok(destination)) => self.engine.attempt_move(origin, destination),
            (Err(err), _) | (_, Err(err)) => {
                debug!("move {origin:?}-{destination:?} rejected: {err}");
                false
            }
        }
    }

    pub fn legal_destinations(&self, square: &str) -> Vec<String> {
        Coordinate::from_algebraic(square)
            .map(|origin| self.engine.legal_destinations(origin))
            .unwrap_or_default()
            .iter()
            .map(Coordinate::to_string)
            .collect()
    }

    pub fn last_captured(&self) -> Vec<String> {
        self.engine
            .last_captured()
            .iter()
            .map(Coordinate::to_string)
            .collect()
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.engine.to_snapshot()).map_err(JsValue::from)
    }
}

fn parse_square(square: &str) -> Result<Coordinate, MoveError> {
    Coordinate::from_algebraic(square).ok_or_else(|| MoveError::Notation(square.to_string()))
}
