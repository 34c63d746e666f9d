//! JavaScript-facing surface. The UI shell owns all I/O (taps, sounds,
//! rendering); this module only translates between `JsValue` and the engine.

use wasm_bindgen::prelude::*;

use crate::game::Game;
use crate::types::{Color, Position};

#[wasm_bindgen]
pub struct CheckersGame {
    game: Game,
}

#[wasm_bindgen]
impl CheckersGame {
    /// Fresh standard game, White to move.
    #[wasm_bindgen(constructor)]
    pub fn new() -> CheckersGame {
        CheckersGame { game: Game::new() }
    }

    /// A tap on `(x, y)`. Returns `true` iff engine state changed; illegal
    /// taps (misclicks included) are no-ops, never exceptions.
    pub fn select_or_move(&mut self, x: u8, y: u8) -> bool {
        self.game.select_or_move(Position::new(x, y))
    }

    /// Discards the game and rebuilds the starting position.
    pub fn restart(&mut self) {
        self.game.restart();
    }

    /// Full render snapshot: 64 cells with occupants and advisory flags,
    /// active color, selection, captures, terminal state.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.game.state()).map_err(Into::into)
    }

    /// Legal targets of the piece on `(x, y)` as a list of positions.
    pub fn legal_targets(&self, x: u8, y: u8) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.game.legal_targets(Position::new(x, y)))
            .map_err(Into::into)
    }

    /// All dark squares with no occupant.
    pub fn empty_playable_squares(&self) -> Result<JsValue, JsValue> {
        let positions: Vec<Position> = self
            .game
            .board()
            .empty_playable_squares()
            .into_iter()
            .map(|sq| sq.pos())
            .collect();
        serde_wasm_bindgen::to_value(&positions).map_err(Into::into)
    }

    /// All squares holding a piece of `color`.
    pub fn squares_occupied_by(&self, color: Color) -> Result<JsValue, JsValue> {
        let positions: Vec<Position> = self
            .game
            .board()
            .squares_occupied_by(color)
            .into_iter()
            .map(|sq| sq.pos())
            .collect();
        serde_wasm_bindgen::to_value(&positions).map_err(Into::into)
    }

    /// The move history, oldest first.
    pub fn moves(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.game.moves()).map_err(Into::into)
    }

    pub fn captured_count(&self, color: Color) -> u8 {
        self.game.board().captured_count(color) as u8
    }

    pub fn active_color(&self) -> Color {
        self.game.active_color()
    }

    pub fn is_game_over(&self) -> bool {
        self.game.is_game_over()
    }

    pub fn winner(&self) -> Option<Color> {
        self.game.winner()
    }
}

impl Default for CheckersGame {
    fn default() -> Self {
        Self::new()
    }
}
