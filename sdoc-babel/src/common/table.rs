//! Table shape normalization shared by every converter.
//!
//! Sources hand over ragged rows. Destinations want a rectangle: every row padded to
//! `max_cols` cells, no cell without content, and per-column width hints derived
//! from a fixed page width budget. Row 0 is always the header row.

use crate::ir::id::NodeId;
use crate::ir::nodes::{Cell, Column, Inline, Row, Table};

/// Page width budget, in pixels, shared by all columns.
pub const DEFAULT_TABLE_WIDTH: u32 = 672;
/// Row height hint written on imported rows.
pub const DEFAULT_ROW_MIN_HEIGHT: u32 = 43;

/// Geometry applied when building canonical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableGeometry {
    pub width: u32,
    pub row_min_height: u32,
}

impl Default for TableGeometry {
    fn default() -> Self {
        TableGeometry {
            width: DEFAULT_TABLE_WIDTH,
            row_min_height: DEFAULT_ROW_MIN_HEIGHT,
        }
    }
}

/// Length of the longest row.
pub fn max_cols<T>(rows: &[Vec<T>]) -> usize {
    rows.iter().map(Vec::len).max().unwrap_or(0)
}

/// Pad every row to `max_cols` with values from `blank`.
pub fn pad_rows<T>(mut rows: Vec<Vec<T>>, mut blank: impl FnMut() -> T) -> (usize, Vec<Vec<T>>) {
    let cols = max_cols(&rows);
    for row in &mut rows {
        while row.len() < cols {
            row.push(blank());
        }
    }
    (cols, rows)
}

/// Even split of `total` across `cols` columns.
pub fn column_widths(total: u32, cols: usize) -> Vec<Column> {
    let Ok(divisor) = u32::try_from(cols) else {
        return Vec::new();
    };
    if divisor == 0 {
        return Vec::new();
    }
    vec![Column { width: total / divisor }; cols]
}

/// Build a canonical table from ragged rows of cell contents.
pub fn build_table(rows: Vec<Vec<Vec<Inline>>>, geometry: TableGeometry) -> Table {
    let (cols, rows) = pad_rows(rows, Vec::new);
    Table {
        id: NodeId::generate(),
        columns: column_widths(geometry.width, cols),
        rows: rows
            .into_iter()
            .map(|cells| Row {
                id: NodeId::generate(),
                min_height: Some(geometry.row_min_height),
                cells: cells.into_iter().map(Cell::new).collect(),
            })
            .collect(),
    }
}

/// Cells of `table`, every row padded to the widest one.
pub fn padded_cells(table: &Table) -> (usize, Vec<Vec<Option<&Cell>>>) {
    let rows: Vec<Vec<Option<&Cell>>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(Some).collect())
        .collect();
    pad_rows(rows, || None)
}

/// Text of a cell as a single line; blank cells become a single space.
pub fn cell_line(text: &str) -> String {
    let line = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
    if line.trim().is_empty() {
        " ".to_string()
    } else {
        line
    }
}
