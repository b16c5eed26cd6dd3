//! ASCII board rendering for harness output.
//!
//! Every grid unit takes two characters, so a board of size (w, h) prints as a
//! (2w+1) x (2h+1) block with the highest row first.

use arclink_logic::board::GameBoard;
use arclink_logic::geometry::Point;
use arclink_logic::grid::{Field, FieldKey};

const NODE: char = 'O';
const ARC_H: char = '-';
const ARC_V: char = '|';
const EMPTY: char = ' ';
const PULL_FIELD: char = '*';
const PUSH_FIELD: char = '#';

/// Render the board with optional highlighted fields.
pub fn render(board: &GameBoard, pull_fields: &[Field], push_fields: &[Field]) -> String {
    let Some((min, max)) = board.grid().bounds() else {
        return String::new();
    };
    let width = (2 * (max.x - min.x) + 1) as usize;
    let height = (2 * (max.y - min.y) + 1) as usize;
    let mut cells = vec![vec![EMPTY; width]; height];

    let cell = |p: Point| -> (usize, usize) {
        ((2 * (p.x - min.x)) as usize, (2 * (p.y - min.y)) as usize)
    };

    let draw = |cells: &mut [Vec<char>], key: FieldKey, length: i32, ch: Option<char>| {
        let (cx, cy) = cell(key.origin);
        let horizontal = key.orientation.is_horizontal();
        let ch = ch.unwrap_or(if horizontal { ARC_H } else { ARC_V });
        for i in 1..(2 * length) as usize {
            if horizontal {
                cells[cy][cx + i] = ch;
            } else {
                cells[cy + i][cx] = ch;
            }
        }
    };

    for arc in board.live_arcs() {
        if let Some(key) = arc.field() {
            draw(&mut cells, key, arc.length(), None);
        }
    }
    for f in pull_fields {
        draw(&mut cells, f.key(), f.length(), Some(PULL_FIELD));
    }
    for f in push_fields {
        draw(&mut cells, f.key(), f.length(), Some(PUSH_FIELD));
    }
    for node in board.nodes() {
        let (cx, cy) = cell(node.position());
        cells[cy][cx] = NODE;
    }

    let mut out = String::with_capacity((width + 1) * height);
    for row in cells.iter().rev() {
        out.extend(row.iter());
        out.push('\n');
    }
    out
}
