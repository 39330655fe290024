use log::{debug, info};

use crate::board::{Board, mask_to_squares};
use crate::types::{
    BOARD_SIZE, Color, Coordinate, GameSnapshot, GameState, MoveError, PIECES_PER_SIDE,
};

/// A side is beaten once it is reduced to this many pieces.
const LOSING_PIECE_COUNT: u8 = 1;

/// One Hasami Shogi game: board, side to move and outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    board: Board,
    active: Color,
    state: GameState,
    captured: Vec<Coordinate>,
}

impl GameEngine {
    /// Starts a game from the standard setup with Black to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            active: Color::Black,
            state: GameState::Unfinished,
            captured: Vec::new(),
        }
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn active_player(&self) -> Color {
        self.active
    }

    /// Number of `color` pieces removed from the board so far.
    pub fn captured_count(&self, color: Color) -> u8 {
        PIECES_PER_SIDE - self.board.count(color)
    }

    /// Color on `square`, or `None` if it is empty or off the board.
    pub fn occupant(&self, square: Coordinate) -> Option<Color> {
        self.board.occupant(square)
    }

    /// Squares captured by the most recent successful move.
    pub fn last_captured(&self) -> &[Coordinate] {
        &self.captured
    }

    /// Moves the active piece on `origin` to `destination`, returning whether
    /// the move was played. A rejected move changes nothing.
    pub fn attempt_move(&mut self, origin: Coordinate, destination: Coordinate) -> bool {
        self.try_move(origin, destination).is_ok()
    }

    /// Like [`attempt_move`](Self::attempt_move), but reports why a move was
    /// rejected and which squares a played move captured.
    pub fn try_move(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, MoveError> {
        let mover = self.active;
        if let Err(err) = self.check_move(origin, destination) {
            debug!("{mover} {origin}-{destination} rejected: {err}");
            return Err(err);
        }

        self.board.relocate(mover, origin, destination);
        let taken = self.board.resolve_captures(mover, destination);
        self.captured = mask_to_squares(taken);
        debug!(
            "{mover} {origin}-{destination} played, captured {:?}",
            self.captured
        );

        if self.board.count(mover.opponent()) <= LOSING_PIECE_COUNT {
            self.state = GameState::won_by(mover);
            info!("game over: {}", self.state);
        }

        // The turn passes even on the winning move.
        self.active = mover.opponent();
        Ok(self.captured.clone())
    }

    /// Every square the piece on `origin` could currently move to.
    pub fn legal_destinations(&self, origin: Coordinate) -> Vec<Coordinate> {
        if self.state != GameState::Unfinished {
            return Vec::new();
        }

        let row = (1..=BOARD_SIZE).map(|col| Coordinate::new(origin.row, col));
        let col = (1..=BOARD_SIZE).map(|row| Coordinate::new(row, origin.col));
        row.chain(col)
            .filter(|&dest| self.board.validate_move(self.active, origin, dest).is_ok())
            .collect()
    }

    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.to_array().to_vec(),
            active_player: self.active,
            game_state: self.state,
            black_captured: self.captured_count(Color::Black),
            red_captured: self.captured_count(Color::Red),
            captured: self.captured.clone(),
        }
    }

    fn check_move(&self, origin: Coordinate, destination: Coordinate) -> Result<(), MoveError> {
        if self.state != GameState::Unfinished {
            return Err(MoveError::GameOver);
        }
        self.board.validate_move(self.active, origin, destination)
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, active: Color) {
        self.board = board;
        self.active = active;
        self.state = GameState::Unfinished;
        self.captured.clear();
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn engine_with(black: &[Coordinate], red: &[Coordinate], active: Color) -> GameEngine {
        let mut game = GameEngine::new();
        game.set_board_for_test(Board::from_pieces(black, red), active);
        game
    }

    fn assert_disjoint_and_populated(game: &GameEngine) {
        let cells = game.to_snapshot().board;
        let black = cells.iter().filter(|&&c| c == 1).count() as u8;
        let red = cells.iter().filter(|&&c| c == 2).count() as u8;
        assert_eq!(black, PIECES_PER_SIDE - game.captured_count(Color::Black));
        assert_eq!(red, PIECES_PER_SIDE - game.captured_count(Color::Red));
        if game.game_state() == GameState::Unfinished {
            assert!((1..=9).contains(&black) && (1..=9).contains(&red));
        }
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameEngine::new();

        assert_eq!(game.occupant(sq(1, 1)), Some(Color::Red));
        assert_eq!(game.occupant(sq(9, 9)), Some(Color::Black));
        assert_eq!(game.occupant(sq(5, 5)), None);
        assert_eq!(game.active_player(), Color::Black);
        assert_eq!(game.game_state(), GameState::Unfinished);
        assert_eq!(game.captured_count(Color::Black), 0);
        assert_eq!(game.captured_count(Color::Red), 0);
        assert!(game.last_captured().is_empty());
    }

    #[test]
    fn basic_move_relocates_and_passes_turn() {
        let mut game = GameEngine::new();

        assert!(game.attempt_move(sq(9, 1), sq(5, 1)));

        assert_eq!(game.occupant(sq(9, 1)), None);
        assert_eq!(game.occupant(sq(5, 1)), Some(Color::Black));
        assert_eq!(game.active_player(), Color::Red);
        assert_disjoint_and_populated(&game);
    }

    #[test]
    fn rejected_moves_change_nothing() {
        let mut game = GameEngine::new();
        assert!(game.attempt_move(sq(9, 1), sq(5, 1)));
        assert!(game.attempt_move(sq(1, 2), sq(4, 2)));
        let before = game.clone();

        // Through own piece, onto a piece, diagonal, null, wrong color, empty origin.
        for (origin, dest) in [
            (sq(9, 3), sq(9, 1)),
            (sq(5, 1), sq(1, 1)),
            (sq(9, 2), sq(8, 3)),
            (sq(9, 2), sq(9, 2)),
            (sq(1, 1), sq(2, 1)),
            (sq(5, 5), sq(6, 5)),
        ] {
            assert!(!game.attempt_move(origin, dest), "{origin}-{dest}");
            assert_eq!(game, before);
        }
    }

    #[test]
    fn blocked_path_is_rejected() {
        let mut game = GameEngine::new();
        assert!(game.attempt_move(sq(9, 5), sq(5, 5)));
        assert!(game.attempt_move(sq(1, 1), sq(8, 1)));
        let before = game.clone();

        assert_eq!(
            game.try_move(sq(9, 2), sq(9, 5)),
            Err(MoveError::Blocked(sq(9, 3)))
        );
        assert_eq!(game, before);
    }

    #[test]
    fn custodial_capture_removes_flanked_piece() {
        let mut game = engine_with(
            &[sq(1, 4), sq(3, 5), sq(9, 9)],
            &[sq(2, 5), sq(1, 8), sq(1, 9)],
            Color::Black,
        );

        assert_eq!(game.try_move(sq(1, 4), sq(1, 5)), Ok(vec![sq(2, 5)]));

        assert_eq!(game.occupant(sq(2, 5)), None);
        assert_eq!(game.captured_count(Color::Red), 7);
        assert_eq!(game.last_captured(), &[sq(2, 5)]);
        assert_eq!(game.game_state(), GameState::Unfinished);
        assert_disjoint_and_populated(&game);
    }

    #[test]
    fn moving_between_two_enemies_is_safe() {
        let mut game = engine_with(
            &[sq(5, 1), sq(9, 9)],
            &[sq(4, 2), sq(6, 2), sq(1, 1)],
            Color::Black,
        );

        assert_eq!(game.try_move(sq(5, 1), sq(5, 2)), Ok(vec![]));
        assert_eq!(game.occupant(sq(5, 2)), Some(Color::Black));
        assert_eq!(game.captured_count(Color::Black), 7);
    }

    #[test]
    fn corner_capture_removes_corner_piece() {
        let mut game = engine_with(
            &[sq(2, 1), sq(3, 2), sq(9, 9)],
            &[sq(1, 1), sq(1, 8), sq(1, 9)],
            Color::Black,
        );

        assert_eq!(game.try_move(sq(3, 2), sq(1, 2)), Ok(vec![sq(1, 1)]));

        assert_eq!(game.occupant(sq(1, 1)), None);
        assert_eq!(game.captured_count(Color::Red), 7);
    }

    #[test]
    fn win_threshold_is_one_remaining_piece() {
        // Red keeps two pieces: no win.
        let mut game = engine_with(
            &[sq(5, 1), sq(5, 4)],
            &[sq(5, 3), sq(1, 5), sq(1, 6)],
            Color::Black,
        );
        assert!(game.attempt_move(sq(5, 1), sq(5, 2)));
        assert_eq!(game.captured_count(Color::Red), 7);
        assert_eq!(game.game_state(), GameState::Unfinished);

        // Red keeps one piece: Black wins.
        let mut game = engine_with(&[sq(5, 1), sq(5, 4)], &[sq(5, 3), sq(1, 5)], Color::Black);
        assert!(game.attempt_move(sq(5, 1), sq(5, 2)));
        assert_eq!(game.game_state(), GameState::BlackWon);

        // Red keeps nothing: Black wins.
        let mut game = engine_with(&[sq(5, 1), sq(5, 4)], &[sq(5, 3)], Color::Black);
        assert!(game.attempt_move(sq(5, 1), sq(5, 2)));
        assert_eq!(game.game_state(), GameState::BlackWon);
        assert_eq!(game.captured_count(Color::Red), 9);
    }

    #[test]
    fn finished_game_rejects_moves_and_winner_loses_the_turn() {
        let mut game = engine_with(
            &[sq(9, 2), sq(9, 3)],
            &[sq(5, 5), sq(5, 7), sq(9, 1)],
            Color::Red,
        );
        assert_eq!(game.try_move(sq(5, 5), sq(5, 3)), Ok(vec![]));
        assert_eq!(game.try_move(sq(9, 3), sq(8, 3)), Ok(vec![]));
        assert_eq!(game.try_move(sq(5, 3), sq(7, 3)), Ok(vec![]));
        assert_eq!(game.try_move(sq(8, 3), sq(8, 4)), Ok(vec![]));
        // Red drops onto (9,3), closing on the Black piece at (9,2) against (9,1).
        assert_eq!(game.try_move(sq(7, 3), sq(9, 3)), Ok(vec![sq(9, 2)]));

        assert_eq!(game.game_state(), GameState::RedWon);
        assert_eq!(game.active_player(), Color::Black);

        let before = game.clone();
        assert_eq!(game.try_move(sq(8, 4), sq(8, 5)), Err(MoveError::GameOver));
        assert!(!game.attempt_move(sq(8, 4), sq(8, 5)));
        assert_eq!(game, before);
        assert!(game.legal_destinations(sq(8, 4)).is_empty());
    }

    #[test]
    fn legal_destinations_agree_with_attempt_move() {
        let mut game = GameEngine::new();
        assert!(game.attempt_move(sq(9, 5), sq(5, 5)));
        assert!(game.attempt_move(sq(1, 5), sq(3, 5)));

        let destinations = game.legal_destinations(sq(5, 5));
        // Up to (4,5), down to (9,5), the whole row except (5,5).
        assert_eq!(destinations.len(), 1 + 4 + 8);

        for dest in destinations {
            let mut trial = game.clone();
            assert!(trial.attempt_move(sq(5, 5), dest), "{dest}");
        }
        assert!(game.legal_destinations(sq(1, 1)).is_empty());
        // Straight up the a-file only; (9,2) blocks the row.
        assert_eq!(game.legal_destinations(sq(9, 1)).len(), 7);
    }

    #[test]
    fn snapshot_reports_counts_and_last_captures() {
        let mut game = engine_with(
            &[sq(1, 4), sq(3, 5), sq(9, 9)],
            &[sq(2, 5), sq(1, 8), sq(1, 9)],
            Color::Black,
        );
        game.attempt_move(sq(1, 4), sq(1, 5));

        let snapshot = game.to_snapshot();

        assert_eq!(snapshot.board.len(), 81);
        assert_eq!(snapshot.board[4], 1);
        assert_eq!(snapshot.board[7], 2);
        assert_eq!(snapshot.active_player, Color::Red);
        assert_eq!(snapshot.game_state, GameState::Unfinished);
        assert_eq!(snapshot.black_captured, 6);
        assert_eq!(snapshot.red_captured, 7);
        assert_eq!(snapshot.captured, vec![sq(2, 5)]);
    }
}
