use crate::board::{Board, STARTING_PIECES};
use crate::types::{Color, GameState, MoveRecord, PieceView, Position, SquareView};

/// Controller phase. `ChainedCapture` pins the turn to one piece until its
/// capture chain runs dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    AwaitingTarget(Position),
    ChainedCapture(Position),
    GameOver(Color),
}

/// The turn controller. Owns the board, the active color, the phase and the
/// move history; the UI drives it through `select_or_move` and reads back
/// snapshots.
pub struct Game {
    board: Board,
    active: Color,
    phase: Phase,
    moves: Vec<MoveRecord>,
}

impl Game {
    /// Fresh standard game. White moves first by convention.
    pub fn new() -> Self {
        let mut game = Self {
            board: Board::new(),
            active: Color::White,
            phase: Phase::AwaitingSelection,
            moves: Vec::new(),
        };
        game.refresh_flags();
        game
    }

    /// Discards the board and starts over. Full re-initialization, not an
    /// incremental reset.
    pub fn restart(&mut self) {
        self.board = Board::new();
        self.active = Color::White;
        self.phase = Phase::AwaitingSelection;
        self.moves.clear();
        self.refresh_flags();
    }

    /// The single command entry point: a tap on `pos`.
    /// Returns `true` iff the tap changed engine state (a selection, a
    /// reselection, or an executed move). Every illegal tap is a no-op.
    pub fn select_or_move(&mut self, pos: Position) -> bool {
        if !pos.in_bounds() {
            return false;
        }
        match self.phase {
            Phase::GameOver(_) => false,
            Phase::ChainedCapture(current) => {
                // The chained piece is the only one in play; its jump
                // targets are the only accepted taps.
                if self.board.must_jump_targets(current).contains(&pos) {
                    self.execute(current, pos)
                } else {
                    false
                }
            }
            Phase::AwaitingSelection => self.try_select(pos),
            Phase::AwaitingTarget(selected) => {
                if pos == selected {
                    false
                } else if self.board.legal_targets_for(selected).contains(&pos) {
                    self.execute(selected, pos)
                } else {
                    self.try_select(pos)
                }
            }
        }
    }

    fn try_select(&mut self, pos: Position) -> bool {
        let Some(piece) = self.board.piece_at(pos) else {
            return false;
        };
        if piece.color != self.active {
            return false;
        }
        // Under a mandatory capture this is empty for any piece without a
        // jump of its own, which makes such pieces unselectable.
        if self.board.legal_targets_for(pos).is_empty() {
            return false;
        }
        self.phase = Phase::AwaitingTarget(pos);
        self.refresh_flags();
        true
    }

    fn execute(&mut self, from: Position, to: Position) -> bool {
        let Ok(outcome) = self.board.execute_move(from, to) else {
            return false;
        };

        let id = self.moves.len() as u32 + 1;
        self.moves.push(MoveRecord {
            id,
            color: self.active,
            from,
            to,
        });

        if let Some(victim) = outcome.captured {
            let loser = self.board.piece(victim).color;
            if self.board.captured_count(loser) == STARTING_PIECES {
                // Terminal regardless of any pending chain.
                self.phase = Phase::GameOver(self.active);
                self.refresh_flags();
                return true;
            }
            if !self.board.must_jump_targets(to).is_empty() {
                self.phase = Phase::ChainedCapture(to);
                self.refresh_flags();
                return true;
            }
        }

        self.active = self.active.opponent();
        self.phase = Phase::AwaitingSelection;
        self.refresh_flags();
        true
    }

    /// Recomputes the advisory flags from scratch. They mirror
    /// `legal_targets_for` and carry no legality authority of their own.
    fn refresh_flags(&mut self) {
        self.board.clear_flags();
        match self.phase {
            Phase::GameOver(_) => {}
            Phase::ChainedCapture(current) => {
                self.board.set_selectable(current);
                for target in self.board.must_jump_targets(current) {
                    self.board.set_highlighted(target);
                }
            }
            Phase::AwaitingSelection | Phase::AwaitingTarget(_) => {
                let movable: Vec<Position> = self
                    .board
                    .squares_occupied_by(self.active)
                    .iter()
                    .map(|sq| sq.pos())
                    .filter(|&from| !self.board.legal_targets_for(from).is_empty())
                    .collect();
                for pos in movable {
                    self.board.set_selectable(pos);
                }
                if let Phase::AwaitingTarget(selected) = self.phase {
                    for target in self.board.legal_targets_for(selected) {
                        self.board.set_highlighted(target);
                    }
                }
            }
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_color(&self) -> Color {
        self.active
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn winner(&self) -> Option<Color> {
        match self.phase {
            Phase::GameOver(color) => Some(color),
            _ => None,
        }
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Legal targets of the piece on `pos`, empty for anything unselectable.
    pub fn legal_targets(&self, pos: Position) -> Vec<Position> {
        if !pos.in_bounds() {
            return Vec::new();
        }
        match self.phase {
            Phase::GameOver(_) => Vec::new(),
            Phase::ChainedCapture(current) => {
                if pos == current {
                    self.board.must_jump_targets(current)
                } else {
                    Vec::new()
                }
            }
            _ => {
                if self
                    .board
                    .piece_at(pos)
                    .is_some_and(|piece| piece.color == self.active)
                {
                    self.board.legal_targets_for(pos)
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Read-only snapshot for rendering.
    pub fn state(&self) -> GameState {
        let squares = self
            .board
            .squares()
            .iter()
            .map(|sq| SquareView {
                x: sq.pos().x,
                y: sq.pos().y,
                dark: sq.is_dark(),
                piece: sq.occupant().map(|id| {
                    let piece = self.board.piece(id);
                    PieceView {
                        color: piece.color,
                        king: piece.is_king(),
                    }
                }),
                selectable: sq.selectable(),
                highlighted: sq.highlighted(),
            })
            .collect();

        GameState {
            squares,
            active: self.active,
            selected: match self.phase {
                Phase::AwaitingTarget(pos) | Phase::ChainedCapture(pos) => Some(pos),
                _ => None,
            },
            chain_from: match self.phase {
                Phase::ChainedCapture(pos) => Some(pos),
                _ => None,
            },
            captured_black: self.board.captured_count(Color::Black) as u8,
            captured_white: self.board.captured_count(Color::White) as u8,
            is_game_over: self.is_game_over(),
            winner: self.winner(),
        }
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, active: Color) {
        self.board = board;
        self.active = active;
        self.phase = Phase::AwaitingSelection;
        self.moves.clear();
        self.refresh_flags();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn pos(x: u8, y: u8) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn initial_state_is_a_fresh_standard_game() {
        let game = Game::new();
        let state = game.state();

        assert_eq!(state.squares.len(), 64);
        assert_eq!(state.active, Color::White);
        assert_eq!(state.selected, None);
        assert_eq!(state.chain_from, None);
        assert_eq!(state.captured_black, 0);
        assert_eq!(state.captured_white, 0);
        assert!(!state.is_game_over);
        assert_eq!(state.winner, None);
        assert_eq!(game.moves().len(), 0);

        let men: usize = state.squares.iter().filter(|sq| sq.piece.is_some()).count();
        assert_eq!(men, 24);
        assert!(state.squares.iter().all(|sq| sq.piece.is_none() || sq.dark));
    }

    #[test]
    fn opening_row_pieces_are_selectable_and_walled_in_ones_are_not() {
        let game = Game::new();

        // White's front row can step; the two back rows are walled in.
        assert!(game.board().square(pos(2, 5)).selectable());
        assert!(game.board().square(pos(4, 5)).selectable());
        assert!(!game.board().square(pos(1, 6)).selectable());
        assert!(!game.board().square(pos(0, 7)).selectable());
        // Black pieces are never selectable on White's turn.
        assert!(!game.board().square(pos(1, 2)).selectable());
    }

    #[test]
    fn selecting_then_moving_executes_and_hands_over_the_turn() {
        let mut game = Game::new();

        assert!(game.select_or_move(pos(2, 5)));
        assert_eq!(game.phase(), Phase::AwaitingTarget(pos(2, 5)));
        assert!(game.board().square(pos(1, 4)).highlighted());
        assert!(game.board().square(pos(3, 4)).highlighted());

        assert!(game.select_or_move(pos(3, 4)));
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert_eq!(game.active_color(), Color::Black);
        assert!(game.board().square(pos(2, 5)).is_empty());
        assert_eq!(game.board().piece_at(pos(3, 4)).unwrap().color, Color::White);

        let record = game.moves().last().unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.color, Color::White);
        assert_eq!(record.from, pos(2, 5));
        assert_eq!(record.to, pos(3, 4));
    }

    #[test]
    fn invalid_taps_are_silent_no_ops() {
        let mut game = Game::new();

        assert!(!game.select_or_move(pos(4, 3))); // empty square
        assert!(!game.select_or_move(pos(1, 2))); // opponent piece
        assert!(!game.select_or_move(pos(1, 6))); // own piece, no targets
        assert!(!game.select_or_move(pos(9, 9))); // out of range
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert_eq!(game.moves().len(), 0);

        assert!(game.select_or_move(pos(2, 5)));
        assert!(!game.select_or_move(pos(2, 5))); // tapping the selection again
        assert!(!game.select_or_move(pos(4, 4))); // light square
        assert_eq!(game.phase(), Phase::AwaitingTarget(pos(2, 5)));
    }

    #[test]
    fn tapping_another_own_piece_reselects() {
        let mut game = Game::new();

        assert!(game.select_or_move(pos(2, 5)));
        assert!(game.select_or_move(pos(4, 5)));
        assert_eq!(game.phase(), Phase::AwaitingTarget(pos(4, 5)));
        assert!(!game.board().square(pos(1, 4)).highlighted());
        assert!(game.board().square(pos(3, 4)).highlighted());
        assert!(game.board().square(pos(5, 4)).highlighted());
    }

    #[test]
    fn forced_capture_blocks_selection_of_quiet_pieces() {
        let mut board = Board::empty_for_test();
        board.place_for_test(Color::White, PieceKind::Man, pos(2, 5));
        board.place_for_test(Color::White, PieceKind::Man, pos(6, 5));
        board.place_for_test(Color::Black, PieceKind::Man, pos(3, 4));
        let mut game = Game::new();
        game.set_board_for_test(board, Color::White);

        assert!(game.board().square(pos(2, 5)).selectable());
        assert!(!game.board().square(pos(6, 5)).selectable());
        assert!(!game.select_or_move(pos(6, 5)));
        assert!(game.select_or_move(pos(2, 5)));
        assert_eq!(game.legal_targets(pos(2, 5)), vec![pos(4, 3)]);
    }

    #[test]
    fn t03_capture_chain_keeps_the_turn_and_pins_the_piece() {
        let mut board = Board::empty_for_test();
        board.place_for_test(Color::White, PieceKind::Man, pos(2, 5));
        board.place_for_test(Color::White, PieceKind::Man, pos(6, 5));
        board.place_for_test(Color::Black, PieceKind::Man, pos(3, 4));
        board.place_for_test(Color::Black, PieceKind::Man, pos(3, 2));
        let mut game = Game::new();
        game.set_board_for_test(board, Color::White);

        assert!(game.select_or_move(pos(2, 5)));
        assert!(game.select_or_move(pos(4, 3)));

        // One capture in, another jump pending: same player, same piece.
        assert_eq!(game.phase(), Phase::ChainedCapture(pos(4, 3)));
        assert_eq!(game.active_color(), Color::White);
        assert_eq!(game.state().captured_black, 1);
        assert_eq!(game.state().chain_from, Some(pos(4, 3)));

        // No other piece may act until the chain resolves.
        assert!(!game.select_or_move(pos(6, 5)));
        assert!(!game.select_or_move(pos(4, 3)));
        assert_eq!(game.phase(), Phase::ChainedCapture(pos(4, 3)));

        assert!(game.select_or_move(pos(2, 1)));
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert_eq!(game.active_color(), Color::Black);
        assert_eq!(game.state().captured_black, 2);
        assert_eq!(game.moves().len(), 2);
    }

    #[test]
    fn t04_promotion_lands_before_the_next_tap() {
        let mut board = Board::empty_for_test();
        board.place_for_test(Color::White, PieceKind::Man, pos(2, 1));
        board.place_for_test(Color::Black, PieceKind::Man, pos(6, 1));
        let mut game = Game::new();
        game.set_board_for_test(board, Color::White);

        assert!(game.select_or_move(pos(2, 1)));
        assert!(game.select_or_move(pos(1, 0)));

        let state = game.state();
        let cell = &state.squares[1]; // y 0, x 1
        assert_eq!(cell.piece.map(|p| p.king), Some(true));
        assert_eq!(game.active_color(), Color::Black);
    }

    #[test]
    fn t05_twelfth_captured_piece_ends_the_game() {
        let mut board = Board::empty_for_test();
        board.place_for_test(Color::White, PieceKind::Man, pos(2, 5));
        board.place_for_test(Color::Black, PieceKind::Man, pos(3, 4));
        // The other eleven Black men are already off the board.
        for x in [1u8, 3, 5, 7] {
            let id = board.place_for_test(Color::Black, PieceKind::Man, pos(x, 0));
            board.capture_for_test(id);
        }
        for x in [0u8, 2, 4, 6] {
            let id = board.place_for_test(Color::Black, PieceKind::Man, pos(x, 1));
            board.capture_for_test(id);
        }
        for x in [1u8, 3, 5] {
            let id = board.place_for_test(Color::Black, PieceKind::Man, pos(x, 2));
            board.capture_for_test(id);
        }
        let mut game = Game::new();
        game.set_board_for_test(board, Color::White);
        assert_eq!(game.board().captured_count(Color::Black), 11);

        assert!(game.select_or_move(pos(2, 5)));
        assert!(game.select_or_move(pos(4, 3)));

        assert_eq!(game.phase(), Phase::GameOver(Color::White));
        assert_eq!(game.winner(), Some(Color::White));
        let state = game.state();
        assert!(state.is_game_over);
        assert_eq!(state.captured_black, 12);

        // The game is frozen: every further tap is rejected.
        assert!(!game.select_or_move(pos(4, 3)));
        assert!(game.legal_targets(pos(4, 3)).is_empty());
    }

    #[test]
    fn restart_rebuilds_the_starting_position() {
        let mut game = Game::new();
        assert!(game.select_or_move(pos(2, 5)));
        assert!(game.select_or_move(pos(3, 4)));

        game.restart();

        let state = game.state();
        assert_eq!(state.active, Color::White);
        assert_eq!(state.selected, None);
        assert_eq!(state.captured_black, 0);
        assert_eq!(state.captured_white, 0);
        assert!(!state.is_game_over);
        assert_eq!(game.moves().len(), 0);
        assert_eq!(
            game.board().squares_occupied_by(Color::White).len(),
            STARTING_PIECES
        );
        assert_eq!(
            game.board().squares_occupied_by(Color::Black).len(),
            STARTING_PIECES
        );
    }

    #[test]
    fn legal_targets_for_opponent_pieces_are_hidden() {
        let game = Game::new();

        assert!(game.legal_targets(pos(1, 2)).is_empty());
        assert!(!game.legal_targets(pos(2, 5)).is_empty());
        assert!(game.legal_targets(pos(12, 0)).is_empty());
    }
}
