use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use super::error::AppError;
use super::render::{heading_depth, parser_options};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const USABLE_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const PT_TO_MM: f32 = 0.3528;

const BODY_SIZE: f32 = 11.0;
const CODE_SIZE: f32 = 9.5;
const HEADING_SIZES: [f32; 6] = [22.0, 18.0, 15.0, 13.0, 12.0, 11.5];

/// A flat layout block extracted from the markdown event stream. The stream
/// comes from the same parser options as the live preview, so the exported
/// document follows the conversion rules the user last saw on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { depth: usize, text: String },
    Paragraph(String),
    Code(Vec<String>),
    ListItem { indent: usize, marker: String, text: String },
    Quote(String),
    TableRow(Vec<String>),
    Rule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    Regular,
    Bold,
    Mono,
}

/// One positioned line of text, ready to be placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub font: FontKind,
    pub size: f32,
    pub indent_mm: f32,
    pub spacing_before_mm: f32,
}

/// Flatten markdown into layout blocks. Inline emphasis is dropped; the
/// fixed-layout export keeps text content, block structure and code
/// verbatim.
pub fn collect_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();

    // Inline accumulation target
    let mut inline: Option<String> = None;
    let mut heading: Option<usize> = None;
    let mut quote_depth = 0usize;

    // Fenced and indented code blocks both arrive as literal text
    let mut code: Option<String> = None;

    // List bookkeeping: one counter per nesting level (None = bullet list)
    let mut list_stack: Vec<Option<u64>> = Vec::new();
    let mut item: Option<(usize, String)> = None;

    // Tables
    let mut row: Option<Vec<String>> = None;
    let mut cell: Option<String> = None;

    fn flush_item(blocks: &mut Vec<Block>, item: &mut Option<(usize, String)>, text: &mut Option<String>) {
        if let (Some((indent, marker)), Some(body)) = (item.take(), text.take()) {
            blocks.push(Block::ListItem {
                indent,
                marker,
                text: body.trim().to_string(),
            });
        }
    }

    for event in Parser::new_ext(text, parser_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(heading_depth(level));
                inline = Some(String::new());
            }
            Event::End(TagEnd::Heading(_)) => {
                if let (Some(depth), Some(text)) = (heading.take(), inline.take()) {
                    blocks.push(Block::Heading { depth, text });
                }
            }

            Event::Start(Tag::Paragraph) => {
                if item.is_none() {
                    inline = Some(String::new());
                } else if inline.is_none() {
                    inline = Some(String::new());
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if item.is_some() {
                    // Loose list items flush on End(Item); keep paragraphs apart
                    if let Some(text) = inline.as_mut() {
                        text.push('\n');
                    }
                } else if let Some(text) = inline.take() {
                    if quote_depth > 0 {
                        blocks.push(Block::Quote(text));
                    } else {
                        blocks.push(Block::Paragraph(text));
                    }
                }
            }

            Event::Start(Tag::BlockQuote(_)) => quote_depth += 1,
            Event::End(TagEnd::BlockQuote(_)) => quote_depth = quote_depth.saturating_sub(1),

            Event::Start(Tag::CodeBlock(_)) => {
                code = Some(String::new());
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(body) = code.take() {
                    let lines = body.lines().map(str::to_string).collect();
                    blocks.push(Block::Code(lines));
                }
            }

            Event::Start(Tag::List(start)) => {
                // A nested list ends the text of the item that contains it
                flush_item(&mut blocks, &mut item, &mut inline);
                list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                list_stack.pop();
            }
            Event::Start(Tag::Item) => {
                let indent = list_stack.len().saturating_sub(1);
                let marker = match list_stack.last_mut() {
                    Some(Some(counter)) => {
                        let marker = format!("{}.", counter);
                        *counter += 1;
                        marker
                    }
                    _ => "\u{2022}".to_string(),
                };
                item = Some((indent, marker));
                inline = Some(String::new());
            }
            Event::End(TagEnd::Item) => {
                flush_item(&mut blocks, &mut item, &mut inline);
            }

            Event::Start(Tag::Table(_)) => {}
            Event::End(TagEnd::Table) => {}
            Event::Start(Tag::TableHead) | Event::Start(Tag::TableRow) => {
                row = Some(Vec::new());
            }
            Event::End(TagEnd::TableHead) | Event::End(TagEnd::TableRow) => {
                if let Some(cells) = row.take() {
                    blocks.push(Block::TableRow(cells));
                }
            }
            Event::Start(Tag::TableCell) => cell = Some(String::new()),
            Event::End(TagEnd::TableCell) => {
                if let (Some(cells), Some(text)) = (row.as_mut(), cell.take()) {
                    cells.push(text);
                }
            }

            Event::Rule => blocks.push(Block::Rule),

            Event::Text(chunk) => {
                if let Some(body) = code.as_mut() {
                    body.push_str(&chunk);
                } else if let Some(text) = cell.as_mut() {
                    text.push_str(&chunk);
                } else if let Some(text) = inline.as_mut() {
                    text.push_str(&chunk);
                }
            }
            Event::Code(chunk) => {
                if let Some(text) = cell.as_mut() {
                    text.push_str(&chunk);
                } else if let Some(text) = inline.as_mut() {
                    text.push_str(&chunk);
                }
            }
            Event::SoftBreak => {
                if let Some(text) = inline.as_mut() {
                    text.push(' ');
                }
            }
            Event::HardBreak => {
                if let Some(text) = inline.as_mut() {
                    text.push('\n');
                }
            }

            _ => {}
        }
    }

    blocks
}

/// Word-wrap to a maximum of `max_chars` per line. Words longer than the
/// limit are hard-split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for raw_line in text.split('\n') {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if current.is_empty() {
                if word_len <= max_chars {
                    current.push_str(word);
                } else {
                    hard_split(word, max_chars, &mut lines, &mut current);
                }
            } else if current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                if word_len <= max_chars {
                    current.push_str(word);
                } else {
                    hard_split(word, max_chars, &mut lines, &mut current);
                }
            }
        }
        lines.push(current);
    }

    lines
}

fn hard_split(word: &str, max_chars: usize, lines: &mut Vec<String>, current: &mut String) {
    let chars: Vec<char> = word.chars().collect();
    for chunk in chars.chunks(max_chars) {
        if !current.is_empty() {
            lines.push(std::mem::take(current));
        }
        *current = chunk.iter().collect();
    }
}

/// Average glyph advance in mm at the given point size. Helvetica runs
/// around half an em per character, Courier is fixed at 0.6 em.
fn char_width_mm(font: FontKind, size: f32) -> f32 {
    let em_fraction = match font {
        FontKind::Mono => 0.6,
        _ => 0.5,
    };
    em_fraction * size * PT_TO_MM
}

fn max_chars_for(font: FontKind, size: f32, indent_mm: f32) -> usize {
    ((USABLE_WIDTH_MM - indent_mm) / char_width_mm(font, size)).floor() as usize
}

/// Turn blocks into positioned lines.
pub fn layout_lines(blocks: &[Block]) -> Vec<Line> {
    let mut lines = Vec::new();

    let push_wrapped = |lines: &mut Vec<Line>, text: &str, font: FontKind, size: f32, indent: f32, spacing: f32| {
        let mut first = true;
        for wrapped in wrap_text(text, max_chars_for(font, size, indent)) {
            lines.push(Line {
                text: wrapped,
                font,
                size,
                indent_mm: indent,
                spacing_before_mm: if first { spacing } else { 0.0 },
            });
            first = false;
        }
    };

    for block in blocks {
        match block {
            Block::Heading { depth, text } => {
                let size = HEADING_SIZES[(depth - 1).min(5)];
                push_wrapped(&mut lines, text, FontKind::Bold, size, 0.0, 5.0);
            }
            Block::Paragraph(text) => {
                push_wrapped(&mut lines, text, FontKind::Regular, BODY_SIZE, 0.0, 3.0);
            }
            Block::Quote(text) => {
                push_wrapped(&mut lines, text, FontKind::Regular, BODY_SIZE, 8.0, 3.0);
            }
            Block::Code(code_lines) => {
                let max = max_chars_for(FontKind::Mono, CODE_SIZE, 4.0);
                let mut first = true;
                for code_line in code_lines {
                    let mut rest = code_line.as_str();
                    loop {
                        let take = rest
                            .char_indices()
                            .nth(max)
                            .map(|(idx, _)| idx)
                            .unwrap_or(rest.len());
                        let (head, tail) = rest.split_at(take);
                        lines.push(Line {
                            text: head.to_string(),
                            font: FontKind::Mono,
                            size: CODE_SIZE,
                            indent_mm: 4.0,
                            spacing_before_mm: if first { 3.0 } else { 0.0 },
                        });
                        first = false;
                        if tail.is_empty() {
                            break;
                        }
                        rest = tail;
                    }
                }
            }
            Block::ListItem { indent, marker, text } => {
                let indent_mm = 4.0 + 6.0 * (*indent as f32);
                let body = format!("{} {}", marker, text);
                push_wrapped(&mut lines, &body, FontKind::Regular, BODY_SIZE, indent_mm, 1.5);
            }
            Block::TableRow(cells) => {
                let joined = cells.join("  |  ");
                push_wrapped(&mut lines, &joined, FontKind::Regular, 10.0, 0.0, 1.5);
            }
            Block::Rule => {
                lines.push(Line {
                    text: "-".repeat(40),
                    font: FontKind::Regular,
                    size: BODY_SIZE,
                    indent_mm: 0.0,
                    spacing_before_mm: 3.0,
                });
            }
        }
    }

    lines
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

impl Fonts {
    fn pick(&self, kind: FontKind) -> &IndirectFontRef {
        match kind {
            FontKind::Regular => &self.regular,
            FontKind::Bold => &self.bold,
            FontKind::Mono => &self.mono,
        }
    }
}

/// Convert markup text to a paginated A4 PDF at `path`.
///
/// Uses the same parser options as the live preview. Text is emitted through
/// builtin PDF fonts, so content stays extractable by PDF text tools.
pub fn export_markdown_pdf(text: &str, path: &Path) -> Result<(), AppError> {
    let lines = layout_lines(&collect_blocks(text));

    let (doc, first_page, first_layer) = PdfDocument::new(
        "MarkPad export",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "content",
    );
    let fonts = Fonts {
        regular: builtin_font(&doc, BuiltinFont::Helvetica)?,
        bold: builtin_font(&doc, BuiltinFont::HelveticaBold)?,
        mono: builtin_font(&doc, BuiltinFont::Courier)?,
    };

    let mut layer: PdfLayerReference = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    for line in &lines {
        let line_height = line.size * PT_TO_MM * 1.35;
        y -= line.spacing_before_mm;
        if y - line_height < MARGIN_MM {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        y -= line_height;

        if !line.text.is_empty() {
            layer.use_text(
                line.text.clone(),
                line.size,
                Mm(MARGIN_MM + line.indent_mm),
                Mm(y),
                fonts.pick(line.font),
            );
        }
    }

    let file = File::create(path).map_err(|e| {
        AppError::Export(format!("could not create {}: {}", path.display(), e))
    })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| AppError::Export(e.to_string()))?;

    Ok(())
}

fn builtin_font(
    doc: &printpdf::PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, AppError> {
    doc.add_builtin_font(font)
        .map_err(|e| AppError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_blocks_basic_structure() {
        let blocks = collect_blocks("# Title\n\nA paragraph\nwith a soft break.\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading { depth: 1, text: "Title".to_string() },
                Block::Paragraph("A paragraph with a soft break.".to_string()),
            ]
        );
    }

    #[test]
    fn test_collect_blocks_lists() {
        let blocks = collect_blocks("- alpha\n- beta\n\n1. one\n2. two\n");
        assert_eq!(
            blocks,
            vec![
                Block::ListItem { indent: 0, marker: "\u{2022}".into(), text: "alpha".into() },
                Block::ListItem { indent: 0, marker: "\u{2022}".into(), text: "beta".into() },
                Block::ListItem { indent: 0, marker: "1.".into(), text: "one".into() },
                Block::ListItem { indent: 0, marker: "2.".into(), text: "two".into() },
            ]
        );
    }

    #[test]
    fn test_collect_blocks_nested_list_order() {
        let blocks = collect_blocks("- parent\n  - child\n");
        assert_eq!(
            blocks,
            vec![
                Block::ListItem { indent: 0, marker: "\u{2022}".into(), text: "parent".into() },
                Block::ListItem { indent: 1, marker: "\u{2022}".into(), text: "child".into() },
            ]
        );
    }

    #[test]
    fn test_collect_blocks_code_kept_verbatim() {
        let blocks = collect_blocks("```rust\nfn main() {\n    body();\n}\n```\n");
        assert_eq!(
            blocks,
            vec![Block::Code(vec![
                "fn main() {".to_string(),
                "    body();".to_string(),
                "}".to_string(),
            ])]
        );
    }

    #[test]
    fn test_collect_blocks_quote_and_rule() {
        let blocks = collect_blocks("> quoted words\n\n---\n");
        assert_eq!(
            blocks,
            vec![Block::Quote("quoted words".to_string()), Block::Rule]
        );
    }

    #[test]
    fn test_collect_blocks_table_rows() {
        let blocks = collect_blocks("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert_eq!(
            blocks,
            vec![
                Block::TableRow(vec!["a".into(), "b".into()]),
                Block::TableRow(vec!["1".into(), "2".into()]),
            ]
        );
    }

    #[test]
    fn test_collect_blocks_flattens_emphasis() {
        let blocks = collect_blocks("**bold** and *italic*\n");
        assert_eq!(blocks, vec![Block::Paragraph("bold and italic".to_string())]);
    }

    #[test]
    fn test_wrap_text_word_boundaries() {
        assert_eq!(
            wrap_text("alpha beta gamma", 11),
            vec!["alpha beta".to_string(), "gamma".to_string()]
        );
    }

    #[test]
    fn test_wrap_text_hard_splits_long_words() {
        assert_eq!(
            wrap_text("abcdefghij", 4),
            vec!["abcd".to_string(), "efgh".to_string(), "ij".to_string()]
        );
    }

    #[test]
    fn test_wrap_text_empty() {
        assert_eq!(wrap_text("", 80), vec![String::new()]);
    }

    #[test]
    fn test_wrap_text_preserves_hard_breaks() {
        assert_eq!(
            wrap_text("one\ntwo", 80),
            vec!["one".to_string(), "two".to_string()]
        );
    }

    #[test]
    fn test_layout_heading_is_bold_and_larger() {
        let lines = layout_lines(&[Block::Heading { depth: 1, text: "Title".into() }]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].font, FontKind::Bold);
        assert!(lines[0].size > BODY_SIZE);
    }

    #[test]
    fn test_layout_wraps_long_paragraph() {
        let long = "word ".repeat(200);
        let lines = layout_lines(&[Block::Paragraph(long.trim().to_string())]);
        assert!(lines.len() > 1);
        assert!(lines.iter().skip(1).all(|l| l.spacing_before_mm == 0.0));
    }

    #[test]
    fn test_export_writes_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        export_markdown_pdf("# Title\n\nSome **bold** text.\n", &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_export_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");

        export_markdown_pdf("", &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_export_to_bad_path_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.pdf");

        let err = export_markdown_pdf("text", &path).unwrap_err();
        assert!(matches!(err, AppError::Export(_)));
    }
}
