use history_types::{BoardSquare, PieceGlyph, PieceKind, RenderedBoard, Rotation, Shape, Stroke};
use std::fmt::Write;

use crate::board::{Board, Piece, parse_board};

pub const LIGHT_SQUARE: &str = "#f0d9b5";
pub const DARK_SQUARE: &str = "#b58863";
const WHITE_FILL: &str = "#fff";
const BLACK_FILL: &str = "#000";
const OUTLINE: &str = "#333";
const WHITE_INNER: &str = "#ccc";
const BLACK_INNER: &str = "#333";
const QUEEN_RING: &str = "#444";
const BORDER: &str = "#ccc";

pub const DEFAULT_BOARD_SIZE: f64 = 200.0;

/// Checkerboard in row-major order; (row + col) odd is dark
pub fn render_squares(size: f64) -> Vec<BoardSquare> {
    let square = size / 8.0;
    (0..8u8)
        .flat_map(|row| (0..8u8).map(move |col| (row, col)))
        .map(|(row, col)| {
            let is_dark = (row + col) % 2 == 1;
            BoardSquare {
                row,
                col,
                is_dark,
                x: col as f64 * square,
                y: row as f64 * square,
                width: square,
                height: square,
                fill: (if is_dark { DARK_SQUARE } else { LIGHT_SQUARE }).to_string(),
            }
        })
        .collect()
}

fn outline(width: f64) -> Option<Stroke> {
    Some(Stroke {
        color: OUTLINE.to_string(),
        width,
    })
}

/// Fixed shape template per piece kind. The knight is a rotated square and the
/// king a circle with a "+" mark.
fn piece_shapes(piece: Piece, row: usize, col: usize, square: f64) -> Vec<Shape> {
    let white = piece.is_white();
    let fill = (if white { WHITE_FILL } else { BLACK_FILL }).to_string();
    let inner_fill = (if white { WHITE_INNER } else { BLACK_INNER }).to_string();
    let cx = col as f64 * square + square / 2.0;
    let cy = row as f64 * square + square / 2.0;

    let body = |stroke_width: f64| Shape::Circle {
        cx,
        cy,
        r: square * 0.3,
        fill: fill.clone(),
        stroke: outline(stroke_width),
    };
    let block = |rotation: Option<Rotation>| Shape::Rect {
        x: col as f64 * square + square * 0.2,
        y: row as f64 * square + square * 0.2,
        width: square * 0.6,
        height: square * 0.6,
        fill: fill.clone(),
        stroke: outline(1.0),
        rotation,
    };

    match piece.kind {
        PieceKind::Pawn => vec![body(1.0)],
        PieceKind::Rook => vec![block(None)],
        PieceKind::Knight => vec![block(Some(Rotation {
            degrees: 45.0,
            cx,
            cy,
        }))],
        PieceKind::Bishop => vec![
            body(1.0),
            Shape::Circle {
                cx,
                cy,
                r: square * 0.15,
                fill: inner_fill,
                stroke: None,
            },
        ],
        PieceKind::Queen => vec![
            body(1.0),
            Shape::Circle {
                cx,
                cy,
                r: square * 0.15,
                fill: inner_fill,
                stroke: Some(Stroke {
                    color: QUEEN_RING.to_string(),
                    width: 1.0,
                }),
            },
        ],
        PieceKind::King => vec![
            body(2.0),
            Shape::Text {
                x: cx,
                y: cy + square * 0.1,
                font_size: square * 0.3,
                fill: (if white { BLACK_FILL } else { WHITE_FILL }).to_string(),
                text: "+".to_string(),
            },
        ],
    }
}

/// One glyph per occupied square, row-major
pub fn render_pieces(board: &Board, size: f64) -> Vec<PieceGlyph> {
    let square = size / 8.0;
    board
        .pieces()
        .map(|(row, col, piece)| PieceGlyph {
            row: row as u8,
            col: col as u8,
            kind: piece.kind,
            is_white: piece.is_white(),
            shapes: piece_shapes(piece, row, col, square),
        })
        .collect()
}

/// Parses `fen` (falling back to the starting position) and lays out the board
pub fn render_board(fen: &str, size: f64) -> RenderedBoard {
    let board = parse_board(fen).into_board();
    RenderedBoard {
        size,
        squares: render_squares(size),
        pieces: render_pieces(&board, size),
    }
}

fn stroke_attrs(stroke: &Option<Stroke>) -> String {
    match stroke {
        Some(stroke) => format!(r#" stroke="{}" stroke-width="{}""#, stroke.color, stroke.width),
        None => String::new(),
    }
}

fn write_shape(svg: &mut String, shape: &Shape) -> std::fmt::Result {
    match shape {
        Shape::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
        } => writeln!(
            svg,
            r#"    <circle cx="{}" cy="{}" r="{}" fill="{}"{}/>"#,
            cx,
            cy,
            r,
            fill,
            stroke_attrs(stroke)
        ),
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            rotation,
        } => {
            let transform = match rotation {
                Some(rotation) => format!(
                    r#" transform="rotate({}, {}, {})""#,
                    rotation.degrees, rotation.cx, rotation.cy
                ),
                None => String::new(),
            };
            writeln!(
                svg,
                r#"    <rect x="{}" y="{}" width="{}" height="{}" fill="{}"{}{}/>"#,
                x,
                y,
                width,
                height,
                fill,
                stroke_attrs(stroke),
                transform
            )
        }
        Shape::Text {
            x,
            y,
            font_size,
            fill,
            text,
        } => writeln!(
            svg,
            r#"    <text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="middle">{}</text>"#,
            x, y, font_size, fill, text
        ),
    }
}

/// Standalone SVG document for a rendered board
pub fn to_svg(board: &RenderedBoard) -> String {
    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = write_svg(&mut svg, board);
    svg
}

fn write_svg(svg: &mut String, board: &RenderedBoard) -> std::fmt::Result {
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
        size = board.size
    )?;
    writeln!(
        svg,
        r#"  <rect x="0" y="0" width="{size}" height="{size}" fill="{}" stroke="{}" stroke-width="1"/>"#,
        LIGHT_SQUARE,
        BORDER,
        size = board.size
    )?;
    for square in &board.squares {
        writeln!(
            svg,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            square.x, square.y, square.width, square.height, square.fill
        )?;
    }
    for piece in &board.pieces {
        writeln!(svg, "  <g>")?;
        for shape in &piece.shapes {
            write_shape(svg, shape)?;
        }
        writeln!(svg, "  </g>")?;
    }
    writeln!(svg, "</svg>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STARTING_FEN;

    #[test]
    fn test_render_squares_160() {
        let squares = render_squares(160.0);
        assert_eq!(squares.len(), 64);
        assert!(squares.iter().all(|s| s.width == 20.0 && s.height == 20.0));
        assert!(!squares[0].is_dark);
        assert_eq!(squares[0].fill, LIGHT_SQUARE);
        assert!(squares[1].is_dark);
        assert_eq!(squares[1].fill, DARK_SQUARE);
        assert_eq!((squares[9].row, squares[9].col), (1, 1));
        assert!(!squares[9].is_dark);
        assert_eq!(squares[63].x, 140.0);
        assert_eq!(squares[63].y, 140.0);
    }

    #[test]
    fn test_squares_are_row_major_checkerboard() {
        let squares = render_squares(80.0);
        for (index, square) in squares.iter().enumerate() {
            assert_eq!(square.row as usize, index / 8);
            assert_eq!(square.col as usize, index % 8);
            assert_eq!(square.is_dark, (square.row + square.col) % 2 == 1);
        }
    }

    #[test]
    fn test_render_pieces_of_starting_position() {
        let board = Board::starting_position();
        let pieces = render_pieces(&board, 80.0);
        assert_eq!(pieces.len(), 32);
        assert_eq!((pieces[0].row, pieces[0].col), (0, 0));
        assert_eq!(pieces[0].kind, PieceKind::Rook);
        assert!(!pieces[0].is_white);
        assert_eq!((pieces[31].row, pieces[31].col), (7, 7));
        assert!(pieces[31].is_white);
        for pair in pieces.windows(2) {
            assert!((pair[0].row, pair[0].col) < (pair[1].row, pair[1].col));
        }
    }

    #[test]
    fn test_glyph_templates() {
        let board = Board::from_placement("8/8/8/8/8/8/8/PRNBQK1k").unwrap();
        let pieces = render_pieces(&board, 80.0);
        let square = 10.0;

        // Pawn on a1: single outlined circle
        match pieces[0].shapes.as_slice() {
            [Shape::Circle { cx, cy, r, fill, stroke }] => {
                assert_eq!((*cx, *cy), (5.0, 75.0));
                assert_eq!(*r, square * 0.3);
                assert_eq!(fill, "#fff");
                assert_eq!(stroke.as_ref().unwrap().width, 1.0);
            }
            other => panic!("unexpected pawn shapes: {:?}", other),
        }

        // Rook: unrotated square
        match pieces[1].shapes.as_slice() {
            [Shape::Rect { x, y, width, rotation, .. }] => {
                assert_eq!((*x, *y), (12.0, 72.0));
                assert_eq!(*width, square * 0.6);
                assert!(rotation.is_none());
            }
            other => panic!("unexpected rook shapes: {:?}", other),
        }

        // Knight: same square rotated 45 degrees about the centre
        match pieces[2].shapes.as_slice() {
            [Shape::Rect { rotation: Some(rotation), .. }] => {
                assert_eq!(rotation.degrees, 45.0);
                assert_eq!((rotation.cx, rotation.cy), (25.0, 75.0));
            }
            other => panic!("unexpected knight shapes: {:?}", other),
        }

        // Bishop: inner dot without outline
        match pieces[3].shapes.as_slice() {
            [Shape::Circle { .. }, Shape::Circle { r, fill, stroke, .. }] => {
                assert_eq!(*r, square * 0.15);
                assert_eq!(fill, "#ccc");
                assert!(stroke.is_none());
            }
            other => panic!("unexpected bishop shapes: {:?}", other),
        }

        // Queen: inner ring
        match pieces[4].shapes.as_slice() {
            [Shape::Circle { .. }, Shape::Circle { stroke: Some(stroke), .. }] => {
                assert_eq!(stroke.color, "#444");
            }
            other => panic!("unexpected queen shapes: {:?}", other),
        }

        // Kings: heavier outline and a contrasting "+"
        for (glyph, mark_fill) in [(&pieces[5], "#000"), (&pieces[6], "#fff")] {
            match glyph.shapes.as_slice() {
                [Shape::Circle { stroke, .. }, Shape::Text { text, fill, .. }] => {
                    assert_eq!(stroke.as_ref().unwrap().width, 2.0);
                    assert_eq!(text, "+");
                    assert_eq!(fill, mark_fill);
                }
                other => panic!("unexpected king shapes: {:?}", other),
            }
        }
    }

    #[test]
    fn test_black_pieces_are_dark_filled() {
        let board = Board::from_placement("b7/8/8/8/8/8/8/8").unwrap();
        let pieces = render_pieces(&board, 80.0);
        match pieces[0].shapes.as_slice() {
            [Shape::Circle { fill, .. }, Shape::Circle { fill: inner, .. }] => {
                assert_eq!(fill, "#000");
                assert_eq!(inner, "#333");
            }
            other => panic!("unexpected shapes: {:?}", other),
        }
    }

    #[test]
    fn test_render_board_never_fails() {
        let fallback = render_board("garbage", 80.0);
        let standard = render_board(STARTING_FEN, 80.0);
        assert_eq!(fallback, standard);
        assert_eq!(fallback.squares.len(), 64);
        assert_eq!(fallback.pieces.len(), 32);
    }

    #[test]
    fn test_svg_output() {
        let board = render_board("8/8/8/8/8/8/8/4K1Nk", 160.0);
        let svg = to_svg(&board);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<g>").count(), 3);
        assert!(svg.contains("rotate(45, 130, 150)"));
        assert!(svg.contains(">+</text>"));
    }
}
