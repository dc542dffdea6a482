//! Plain-text rendering of update matrices.
//!
//! Output is row-major with one space between values and a newline after every
//! row, which is what whitespace-delimited float loaders expect.
use ndarray::ArrayView2;

/// Render `matrix` as text.
///
/// With `precision` unset each value uses the shortest representation that
/// round-trips; otherwise values carry exactly `precision` decimal places.
pub fn render_matrix(matrix: ArrayView2<'_, f64>, precision: Option<usize>) -> String {
    let mut out = String::new();
    for row in matrix.rows() {
        let line = row
            .iter()
            .map(|value| render_value(*value, precision))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn render_value(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(places) => format!("{value:.places$}"),
        None => value.to_string(),
    }
}
