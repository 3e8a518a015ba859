/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Column header plus alignment for the plain-text table renderer.
#[derive(Clone, Debug)]
pub struct TableColumn {
    pub header: String,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            alignment: Alignment::Right,
        }
    }
}

/// A table with column metadata and rows of already-formatted cells.
pub struct Table {
    columns: Vec<TableColumn>,
    rows: Vec<Vec<String>>,
    plain_rule: bool,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>, plain_rule: bool) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            plain_rule,
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = column.header.chars().count();
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(cell.chars().count());
                    }
                }
                width
            })
            .collect()
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                let pad = widths[idx].saturating_sub(text.chars().count());
                match column.alignment {
                    Alignment::Left => format!("{}{}", text, " ".repeat(pad)),
                    Alignment::Right => format!("{}{}", " ".repeat(pad), text),
                }
            })
            .collect();
        cells.join("  ").trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let rule_char = if self.plain_rule { '-' } else { '─' };
        let rule_width: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

        let mut out = String::new();
        out.push_str(&self.render_row(&headers, &widths));
        out.push('\n');
        out.push_str(&rule_char.to_string().repeat(rule_width));
        for row in &self.rows {
            out.push('\n');
            out.push_str(&self.render_row(row, &widths));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut table = Table::new(
            vec![
                TableColumn::left("Name"),
                TableColumn::right("Price"),
            ],
            true,
        );
        table.push_row(vec!["Netflix".into(), "$15.49".into()]);
        table.push_row(vec!["Go".into(), "$2.00".into()]);
        table
    }

    #[test]
    fn columns_align_and_pad_to_widest_cell() {
        let rendered = table().render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Name      Price");
        assert_eq!(lines[2], "Netflix  $15.49");
        assert_eq!(lines[3], "Go        $2.00");
    }

    #[test]
    fn rule_spans_the_full_width() {
        let rendered = table().render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1].len(), lines[2].len());
        assert!(lines[1].chars().all(|c| c == '-'));
    }

    #[test]
    fn short_rows_render_missing_cells_empty() {
        let mut t = Table::new(
            vec![TableColumn::left("A"), TableColumn::left("B")],
            true,
        );
        t.push_row(vec!["x".into()]);
        let rendered = t.render();
        assert!(rendered.lines().last().unwrap().starts_with('x'));
    }
}
