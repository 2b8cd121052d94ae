// src/summary.rs
use regex::Regex;

lazy_static::lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^#{1,6}\s+(.+)$").unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"^(?:[-*•]|\d+[.)])\s+(.+)$").unwrap();
    static ref TAG_LINE: Regex = Regex::new(r"^#[^\s#]+(?:\s+#[^\s#]+)*$").unwrap();
}

/// Structural pieces of an analysis summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryBlock {
    Title(String),
    Paragraph(String),
    ListItem(String),
    Tags(Vec<String>),
}

/// Splits the markdown-flavoured summary into blocks. Consecutive plain
/// lines merge into one paragraph; blank lines end it.
pub fn parse(summary: &str) -> Vec<SummaryBlock> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    fn flush(paragraph: &mut Vec<&str>, blocks: &mut Vec<SummaryBlock>) {
        if !paragraph.is_empty() {
            blocks.push(SummaryBlock::Paragraph(paragraph.join(" ")));
            paragraph.clear();
        }
    }

    for line in summary.lines().map(str::trim) {
        if line.is_empty() {
            flush(&mut paragraph, &mut blocks);
        } else if let Some(caps) = HEADING.captures(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(SummaryBlock::Title(caps[1].trim().to_string()));
        } else if let Some(caps) = LIST_ITEM.captures(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(SummaryBlock::ListItem(caps[1].trim().to_string()));
        } else if TAG_LINE.is_match(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(SummaryBlock::Tags(
                line.split_whitespace().map(|tag| tag.to_string()).collect(),
            ));
        } else {
            paragraph.push(line);
        }
    }
    flush(&mut paragraph, &mut blocks);

    blocks
}

/// Plain text for the clipboard: titles set off by blank lines, list items
/// prefixed with a bullet.
pub fn copy_text(summary: &str) -> String {
    let parts: Vec<String> = parse(summary)
        .into_iter()
        .map(|block| match block {
            SummaryBlock::Title(title) => format!("\n{}\n", title),
            SummaryBlock::ListItem(item) => format!("• {}", item),
            SummaryBlock::Paragraph(text) => text,
            SummaryBlock::Tags(tags) => tags.join(" "),
        })
        .collect();
    parts.join("\n").trim().to_string()
}
