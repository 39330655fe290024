use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub const BOARD_SIZE: u8 = 9;
pub const PIECES_PER_SIDE: u8 = 9;

/// The four corner squares, where the corner-capture rule applies.
pub const CORNERS: [Coordinate; 4] = [
    Coordinate::new(1, 1),
    Coordinate::new(1, BOARD_SIZE),
    Coordinate::new(BOARD_SIZE, 1),
    Coordinate::new(BOARD_SIZE, BOARD_SIZE),
];

/// A board coordinate, 1-based. Row 1 is Red's home edge, row 9 is Black's.
///
/// Values decoded from notation may lie off the board; check `is_on_board`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coordinate {
    pub row: u8,
    pub col: u8,
}

impl Coordinate {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Decodes `<letter><digit>`: the letter's alphabet position is the row,
    /// the digit is the column. Returns `None` for anything else.
    pub fn from_algebraic(square: &str) -> Option<Self> {
        let mut chars = square.chars();
        let letter = chars.next()?;
        let digit = chars.next()?;
        if chars.next().is_some() || !letter.is_ascii_alphabetic() {
            return None;
        }

        let row = letter.to_ascii_lowercase() as u8 - b'a' + 1;
        let col = digit.to_digit(10)? as u8;
        Some(Self::new(row, col))
    }

    pub fn is_on_board(self) -> bool {
        (1..=BOARD_SIZE).contains(&self.row) && (1..=BOARD_SIZE).contains(&self.col)
    }

    pub fn is_corner(self) -> bool {
        CORNERS.contains(&self)
    }

    /// The neighbouring square one step along `(d_row, d_col)`, or `None`
    /// when that step leaves the board.
    pub fn step(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        let next = Self::new(row, col);
        next.is_on_board().then_some(next)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            1..=26 => write!(f, "{}{}", (b'a' + self.row - 1) as char, self.col),
            _ => write!(f, "({},{})", self.row, self.col),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    Black,
    Red,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::Red,
            Self::Red => Self::Black,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Black => "BLACK",
            Self::Red => "RED",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "BLACK" => Some(Self::Black),
            "RED" => Some(Self::Red),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the game. Once it leaves `Unfinished` it never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    Unfinished,
    BlackWon,
    RedWon,
}

impl GameState {
    pub fn won_by(color: Color) -> Self {
        match color {
            Color::Black => Self::BlackWon,
            Color::Red => Self::RedWon,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unfinished => "UNFINISHED",
            Self::BlackWon => "BLACK_WON",
            Self::RedWon => "RED_WON",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Row-major cells, `0` = empty, `1` = black, `2` = red.
    pub board: Vec<u8>,
    pub active_player: Color,
    pub game_state: GameState,
    pub black_captured: u8,
    pub red_captured: u8,
    /// Squares removed by the most recent successful move.
    pub captured: Vec<Coordinate>,
}

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("game is already over")]
    GameOver,
    #[error("no {0} piece at {1}")]
    NotYourPiece(Color, Coordinate),
    #[error("move from {0} to {1} is not a straight orthogonal line")]
    NotStraight(Coordinate, Coordinate),
    #[error("path leaves the board at {0}")]
    OffBoard(Coordinate),
    #[error("path is blocked at {0}")]
    Blocked(Coordinate),
    #[error("malformed square: {0:?}")]
    Notation(String),
}
