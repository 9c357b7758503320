//! Table rendering for CLI outputs. Widths are measured in terminal columns
//! so CJK words line up; long cells wrap inside their column.

use unicode_width::UnicodeWidthStr;

pub struct Column {
    pub header: String,
    /// Upper bound; the column shrinks to its widest cell.
    pub max_width: usize,
}

impl Column {
    pub fn new(header: &str, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            max_width,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.width())
                    .chain(std::iter::once(col.header.width()))
                    .max()
                    .unwrap_or(0);
                widest.min(col.max_width).max(1)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        render_row(&mut out, &header, &widths);

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        render_row(&mut out, &rule, &widths);

        for row in &self.rows {
            render_row(&mut out, row, &widths);
        }

        out
    }
}

fn render_row(out: &mut String, row: &[String], widths: &[usize]) {
    let cells: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let text = row.get(i).map(String::as_str).unwrap_or("");
            textwrap::wrap(text, *w)
                .into_iter()
                .map(|l| l.into_owned())
                .collect()
        })
        .collect();

    let height = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);

    for line in 0..height {
        let mut text = String::new();
        for (i, w) in widths.iter().enumerate() {
            let cell = cells[i].get(line).map(String::as_str).unwrap_or("");
            text.push_str(cell);
            if i + 1 < widths.len() {
                text.push_str(&" ".repeat(w.saturating_sub(cell.width()) + 1));
            }
        }
        out.push_str(text.trim_end());
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_by_display_width() {
        let mut t = Table::new(vec![Column::new("Word", 10), Column::new("Book", 10)]);
        t.add_row(vec!["走る".into(), "Alpha".into()]);
        t.add_row(vec!["run".into(), "Beta".into()]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Word Book");
        assert_eq!(lines[2], "走る Alpha");
        assert_eq!(lines[3], "run  Beta");
    }

    #[test]
    fn wraps_long_cells() {
        let mut t = Table::new(vec![Column::new("W", 5), Column::new("Sentence", 12)]);
        t.add_row(vec!["run".into(), "She began to run fast".into()]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "run She began to");
        assert_eq!(lines[3], "    run fast");
    }
}
