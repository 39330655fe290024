use log::trace;

use crate::types::{BOARD_SIZE, Color, Coordinate, MoveError};

const NUM_SQUARES: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);
const DIRECTIONS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const BLACK_HOME_ROW: u8 = BOARD_SIZE;
const RED_HOME_ROW: u8 = 1;

/// Hasami Shogi board state represented by two 81-bit bitboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    black: u128,
    red: u128,
}

impl Board {
    /// Creates the initial board: Black fills row 9, Red fills row 1.
    pub fn new() -> Self {
        let mut board = Self { black: 0, red: 0 };
        for col in 1..=BOARD_SIZE {
            board.black |= bit(Coordinate::new(BLACK_HOME_ROW, col));
            board.red |= bit(Coordinate::new(RED_HOME_ROW, col));
        }
        board
    }

    /// Builds an arbitrary position. Off-board squares are ignored; a square
    /// listed for both colors goes to Black.
    pub fn from_pieces(black: &[Coordinate], red: &[Coordinate]) -> Self {
        let black = black.iter().fold(0u128, |acc, &sq| acc | bit(sq));
        let red = red.iter().fold(0u128, |acc, &sq| acc | bit(sq)) & !black;
        Self { black, red }
    }

    pub fn occupant(&self, square: Coordinate) -> Option<Color> {
        let square_bit = bit(square);
        if (self.black & square_bit) != 0 {
            Some(Color::Black)
        } else if (self.red & square_bit) != 0 {
            Some(Color::Red)
        } else {
            None
        }
    }

    pub fn count(&self, color: Color) -> u8 {
        self.pieces(color).count_ones() as u8
    }

    /// Checks that `color` may slide a piece from `origin` to `destination`
    /// without touching the board.
    pub fn validate_move(
        &self,
        color: Color,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<(), MoveError> {
        if (self.pieces(color) & bit(origin)) == 0 {
            return Err(MoveError::NotYourPiece(color, origin));
        }

        if origin == destination {
            return Err(MoveError::NotStraight(origin, destination));
        }
        let (d_row, d_col) = if origin.row == destination.row {
            (0, signum(origin.col, destination.col))
        } else if origin.col == destination.col {
            (signum(origin.row, destination.row), 0)
        } else {
            return Err(MoveError::NotStraight(origin, destination));
        };

        let occupied = self.black | self.red;
        let mut current = origin;
        while current != destination {
            current = current
                .step(d_row, d_col)
                .ok_or(MoveError::OffBoard(destination))?;
            if (occupied & bit(current)) != 0 {
                return Err(MoveError::Blocked(current));
            }
        }

        Ok(())
    }

    /// Moves one piece of `color`. Caller contract: the move passed
    /// `validate_move`.
    pub fn relocate(&mut self, color: Color, origin: Coordinate, destination: Coordinate) {
        let pieces = self.pieces_mut(color);
        *pieces &= !bit(origin);
        *pieces |= bit(destination);
    }

    /// Removes every opponent piece captured by the `color` piece that just
    /// landed on `square`. Returns the removed bit mask.
    pub fn resolve_captures(&mut self, color: Color, square: Coordinate) -> u128 {
        let mut captured = 0u128;

        for (d_row, d_col) in DIRECTIONS {
            let taken = self.scan_direction(color, square, d_row, d_col);
            *self.pieces_mut(color.opponent()) &= !taken;
            captured |= taken;
        }

        captured
    }

    /// Converts board to `[u8; 81]` where 0=empty, 1=black, 2=red.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            let square = 1u128 << pos;
            *cell = if (self.black & square) != 0 {
                1
            } else if (self.red & square) != 0 {
                2
            } else {
                0
            };
        }
        board
    }

    /// Follows one direction from `origin`, collecting the run of opponent
    /// pieces until the scan closes on a friendly piece or gives up.
    fn scan_direction(&self, color: Color, origin: Coordinate, d_row: i8, d_col: i8) -> u128 {
        let me = self.pieces(color);
        let opp = self.pieces(color.opponent());
        let mut run = 0u128;
        let mut current = origin;

        loop {
            if run.count_ones() == 1 && current.is_corner() {
                return self.corner_capture(color, current);
            }

            let Some(next) = current.step(d_row, d_col) else {
                return 0;
            };
            let square = bit(next);
            if (opp & square) != 0 {
                run |= square;
                current = next;
            } else if (me & square) != 0 && run != 0 {
                trace!("{color} sandwiches {} piece(s) ending at {current}", run.count_ones());
                return run;
            } else {
                return 0;
            }
        }
    }

    /// An opponent piece on `corner` falls when both of its orthogonal
    /// neighbours hold `color` pieces.
    fn corner_capture(&self, color: Color, corner: Coordinate) -> u128 {
        let me = self.pieces(color);
        let guards = DIRECTIONS
            .iter()
            .filter_map(|&(d_row, d_col)| corner.step(d_row, d_col))
            .filter(|&neighbour| (me & bit(neighbour)) != 0)
            .count();

        if guards == 2 {
            trace!("{color} takes the corner piece at {corner}");
            bit(corner)
        } else {
            0
        }
    }

    fn pieces(&self, color: Color) -> u128 {
        match color {
            Color::Black => self.black,
            Color::Red => self.red,
        }
    }

    fn pieces_mut(&mut self, color: Color) -> &mut u128 {
        match color {
            Color::Black => &mut self.black,
            Color::Red => &mut self.red,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Expands a bit mask into its squares in row-major order.
pub fn mask_to_squares(mask: u128) -> Vec<Coordinate> {
    let mut bits = mask;
    let mut out = Vec::new();

    while bits != 0 {
        let idx = bits.trailing_zeros() as u8;
        out.push(Coordinate::new(idx / BOARD_SIZE + 1, idx % BOARD_SIZE + 1));
        bits &= bits - 1;
    }

    out
}

fn bit(square: Coordinate) -> u128 {
    if square.is_on_board() {
        1u128 << ((square.row - 1) as usize * BOARD_SIZE as usize + (square.col - 1) as usize)
    } else {
        0
    }
}

fn signum(from: u8, to: u8) -> i8 {
    if to > from { 1 } else { -1 }
}
