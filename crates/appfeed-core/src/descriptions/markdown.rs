//! Extract GFM tables from a markdown document as plain-text cells.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// One table: the header row plus body rows, cell text trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub fn column(&self, label: &str) -> Option<usize> {
        self.header.iter().position(|h| h == label)
    }
}

/// All tables in document order. Inline markup inside cells is flattened to its text.
pub(crate) fn extract_tables(markdown: &str) -> Vec<MarkdownTable> {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);

    let mut tables = Vec::new();
    let mut table: Option<MarkdownTable> = None;
    let mut row: Vec<String> = Vec::new();
    let mut cell: Option<String> = None;
    let mut in_head = false;

    for event in parser {
        match event {
            Event::Start(Tag::Table(_)) => table = Some(MarkdownTable::default()),
            Event::End(TagEnd::Table) => tables.extend(table.take()),
            Event::Start(Tag::TableHead) => {
                in_head = true;
                row.clear();
            }
            Event::End(TagEnd::TableHead) => {
                in_head = false;
                if let Some(t) = table.as_mut() {
                    t.header = std::mem::take(&mut row);
                }
            }
            Event::Start(Tag::TableRow) => row.clear(),
            Event::End(TagEnd::TableRow) => {
                if let (Some(t), false) = (table.as_mut(), in_head) {
                    t.rows.push(std::mem::take(&mut row));
                }
            }
            Event::Start(Tag::TableCell) => cell = Some(String::new()),
            Event::End(TagEnd::TableCell) => {
                if let Some(text) = cell.take() {
                    row.push(text.trim().to_string());
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(c) = cell.as_mut() {
                    c.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(c) = cell.as_mut() {
                    c.push(' ');
                }
            }
            _ => {}
        }
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "\
# IPAs

| Legend | Meaning |
|--------|---------|
| ✅ | Working |

Some prose.

| App Name | Description | Last Updated | Status | Source/Maintainer |
|----------|-------------|--------------|--------|-------------------|
| My App | Does **things** | 2024-01-02 | ✅ | [alice](https://example.com/alice) |
| Other | `cli` tool | 2023-05-06 | ❌ | bob |
";

    #[test]
    fn finds_tables_in_order() {
        let tables = extract_tables(README);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].header, vec!["Legend", "Meaning"]);
        assert_eq!(tables[0].rows, vec![vec!["✅", "Working"]]);
    }

    #[test]
    fn flattens_inline_markup() {
        let tables = extract_tables(README);
        let t = &tables[1];
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0][0], "My App");
        assert_eq!(t.rows[0][1], "Does things");
        assert_eq!(t.rows[0][4], "alice");
        assert_eq!(t.rows[1][1], "cli tool");
    }

    #[test]
    fn column_by_label() {
        let tables = extract_tables(README);
        assert_eq!(tables[1].column("Status"), Some(3));
        assert_eq!(tables[1].column("Nope"), None);
    }

    #[test]
    fn no_tables() {
        assert!(extract_tables("# Title\n\njust text\n").is_empty());
    }
}
