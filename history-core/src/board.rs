use history_types::PieceKind;
use thiserror::Error;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub fn from_char(c: char) -> Option<Self> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'r' => PieceKind::Rook,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        Some(Piece { kind, side })
    }

    pub fn is_white(&self) -> bool {
        self.side == Side::White
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("Empty position")]
    Empty,
    #[error("Expected 8 ranks, found {found}")]
    RankCount { found: usize },
    #[error("Invalid character '{found}' in rank {rank}")]
    InvalidCharacter { found: char, rank: usize },
    #[error("Rank {rank} covers {width} squares instead of 8")]
    RankWidth { rank: usize, width: usize },
}

/// 8x8 placement. Row 0 is rank 8, column 0 is file a.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    pub fn starting_position() -> Self {
        let mut board = Self::empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (col, kind) in back_rank.into_iter().enumerate() {
            board.squares[0][col] = Some(Piece { kind, side: Side::Black });
            board.squares[1][col] = Some(Piece {
                kind: PieceKind::Pawn,
                side: Side::Black,
            });
            board.squares[6][col] = Some(Piece {
                kind: PieceKind::Pawn,
                side: Side::White,
            });
            board.squares[7][col] = Some(Piece { kind, side: Side::White });
        }
        board
    }

    /// Parses the placement field of a FEN record. Anything after the first
    /// whitespace (side to move, castling, clocks) is ignored.
    pub fn from_placement(fen: &str) -> Result<Self, FenError> {
        let placement = fen.split_whitespace().next().ok_or(FenError::Empty)?;

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount { found: ranks.len() });
        }

        let mut board = Self::empty();
        for (row, rank) in ranks.iter().enumerate() {
            let rank_number = 8 - row;
            let mut col = 0usize;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
                    col += run as usize;
                } else if let Some(piece) = Piece::from_char(c) {
                    if col < 8 {
                        board.squares[row][col] = Some(piece);
                    }
                    col += 1;
                } else {
                    return Err(FenError::InvalidCharacter {
                        found: c,
                        rank: rank_number,
                    });
                }

                if col > 8 {
                    return Err(FenError::RankWidth {
                        rank: rank_number,
                        width: col,
                    });
                }
            }

            if col != 8 {
                return Err(FenError::RankWidth {
                    rank: rank_number,
                    width: col,
                });
            }
        }

        Ok(board)
    }

    pub fn piece_at(&self, row: usize, col: usize) -> Option<Piece> {
        self.squares.get(row)?.get(col).copied().flatten()
    }

    /// Occupied squares in row-major order
    pub fn pieces(&self) -> impl Iterator<Item = (usize, usize, Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(|(row, rank)| {
            rank.iter()
                .enumerate()
                .filter_map(move |(col, square)| square.map(|piece| (row, col, piece)))
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

/// Outcome of [`parse_board`]. Both arms carry a usable board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardParse {
    Parsed(Board),
    Fallback(Board),
}

impl BoardParse {
    pub fn board(&self) -> &Board {
        match self {
            BoardParse::Parsed(board) | BoardParse::Fallback(board) => board,
        }
    }

    pub fn into_board(self) -> Board {
        match self {
            BoardParse::Parsed(board) | BoardParse::Fallback(board) => board,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, BoardParse::Fallback(_))
    }
}

/// Parses a FEN string, substituting the starting position when it is malformed.
pub fn parse_board(fen: &str) -> BoardParse {
    match Board::from_placement(fen) {
        Ok(board) => BoardParse::Parsed(board),
        Err(e) => {
            tracing::debug!("Falling back to starting position for {:?}: {}", fen, e);
            BoardParse::Fallback(Board::starting_position())
        }
    }
}
