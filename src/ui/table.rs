//! Column-aligned listings.

use console::measure_text_width;

/// Rows of cells rendered with aligned columns and no borders.
///
/// Widths are measured without ANSI escapes, so styled cells line up.
#[derive(Debug, Default)]
pub struct Columns {
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row of cells.
    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        for (i, cell) in row.iter().enumerate() {
            let width = measure_text_width(cell);
            match self.widths.get_mut(i) {
                Some(w) => *w = (*w).max(width),
                None => self.widths.push(width),
            }
        }
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render one line per row, indented by `indent` spaces.
    pub fn render(&self, indent: usize) -> Vec<String> {
        let prefix = " ".repeat(indent);
        self.rows
            .iter()
            .map(|row| {
                let mut line = prefix.clone();
                let last = row.len().saturating_sub(1);
                for (i, cell) in row.iter().enumerate() {
                    line.push_str(cell);
                    if i < last {
                        let pad = self.widths[i] - measure_text_width(cell) + 2;
                        line.push_str(&" ".repeat(pad));
                    }
                }
                line.trim_end().to_string()
            })
            .collect()
    }
}
