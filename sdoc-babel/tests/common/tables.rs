use sdoc_babel::common::table::{build_table, max_cols, padded_cells, TableGeometry};
use sdoc_babel::ir::nodes::{Inline, TextRun};

fn cell(text: &str) -> Vec<Inline> {
    vec![Inline::Text(TextRun::plain(text))]
}

#[test]
fn test_ragged_rows_are_padded_to_max_cols() {
    let rows = vec![
        vec![cell("a")],
        vec![cell("b"), cell("c"), cell("d")],
        vec![cell("e"), cell("f")],
    ];
    let expected = max_cols(&rows);
    let table = build_table(rows, TableGeometry::default());

    assert_eq!(expected, 3);
    assert!(table.rows.iter().all(|row| row.cells.len() == expected));
    assert_eq!(table.columns.len(), expected);
    assert_eq!(table.columns[0].width, 224);
}

#[test]
fn test_custom_geometry() {
    let geometry = TableGeometry {
        width: 600,
        row_min_height: 30,
    };
    let table = build_table(vec![vec![cell("a"), cell("b")]], geometry);

    assert_eq!(table.columns[1].width, 300);
    assert_eq!(table.rows[0].min_height, Some(30));
}

#[test]
fn test_padded_cells_fill_missing_entries() {
    let mut table = build_table(
        vec![vec![cell("a"), cell("b")], vec![cell("c"), cell("d")]],
        TableGeometry::default(),
    );
    table.rows[1].cells.pop();

    let (cols, rows) = padded_cells(&table);
    assert_eq!(cols, 2);
    assert!(rows[1][1].is_none());
}
