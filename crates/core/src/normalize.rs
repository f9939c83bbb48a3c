use crate::patterns::{collapse_whitespace, contains_money, has_item_id, is_numeric_code};

/// Largest header block a table may have.
pub const MAX_HEADER_ROWS: usize = 4;

/// A rectangular grid with its header block collapsed to one label per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    pub grid: Vec<Vec<String>>,
    pub header_rows: usize,
    pub headers: Vec<String>,
    pub col_count: usize,
}

/// Pad ragged rows, infer the header block and collapse it.
pub fn normalize(rows: &[Vec<String>], max_header_rows: usize) -> NormalizedTable {
    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let grid: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(|c| collapse_whitespace(c)).collect();
            cells.resize(col_count, String::new());
            cells
        })
        .collect();

    let header_rows = infer_header_rows(&grid, max_header_rows);
    let headers = collapse_headers(&grid[..header_rows], col_count);

    NormalizedTable {
        grid,
        header_rows,
        headers,
        col_count,
    }
}

/// Number of leading header rows.
///
/// Row 0 is always header. Rows 1..=limit are scanned, with the limit capped
/// at [`MAX_HEADER_ROWS`], and the first one that looks like data ends the
/// block; without such a row the block is one row.
/// The last row is never consumed, so any table with two or more rows keeps
/// at least one data row.
pub fn infer_header_rows(grid: &[Vec<String>], max_header_rows: usize) -> usize {
    let n = grid.len();
    if n <= 1 {
        return n;
    }
    let limit = max_header_rows.clamp(1, MAX_HEADER_ROWS).min(n - 1);
    (1..=limit)
        .find(|&i| row_looks_like_data(&grid[i]))
        .unwrap_or(1)
}

fn row_looks_like_data(row: &[String]) -> bool {
    row.iter()
        .any(|c| has_item_id(c) || contains_money(c) || is_numeric_code(c))
}

/// Merge a header block into one label per column.
///
/// Distinct non-empty texts in a column are joined top to bottom. A column
/// with no header text borrows from its nearest labelled neighbour (left,
/// right, then two away); failing that it gets a `Column N` placeholder.
pub fn collapse_headers(block: &[Vec<String>], col_count: usize) -> Vec<String> {
    let first_pass: Vec<String> = (0..col_count)
        .map(|c| {
            let mut parts: Vec<&str> = Vec::new();
            for row in block {
                let text = row.get(c).map(|s| s.trim()).unwrap_or("");
                if !text.is_empty() && !parts.contains(&text) {
                    parts.push(text);
                }
            }
            parts.join(" ")
        })
        .collect();

    (0..col_count)
        .map(|c| {
            if !first_pass[c].is_empty() {
                return first_pass[c].clone();
            }
            let neighbours = [
                c.checked_sub(1),
                Some(c + 1),
                c.checked_sub(2),
                Some(c + 2),
            ];
            neighbours
                .into_iter()
                .flatten()
                .filter_map(|n| first_pass.get(n))
                .find(|label| !label.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("Column {}", c + 1))
        })
        .collect()
}
