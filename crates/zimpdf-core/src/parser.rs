//! Zim wiki parser
//!
//! This module parses Zim wiki text into a `zimpdf_ast::Document`.
//!
//! # Supported Syntax
//!
//! - Page header: `Content-Type: text/x-zim-wiki` and following `Key: value` lines
//! - Headings: `====== Level 1 ======` down to `== Level 5 ==`
//! - Paragraphs: text separated by blank lines, line breaks preserved
//! - Blank lines: each run is kept as `Block::Blank` so the rendered page has
//!   the same vertical layout as the source
//! - Lists: `* item`, `1. item`, `a. item`, `[ ] todo`, nested with tabs
//! - Verbatim: lines between two `'''` lines
//! - Objects: `{{{code: lang="python3"` ... `}}}`
//! - Rules: a line of four or more dashes
//! - Inline: `**strong**`, `//emphasis//`, `__mark__`, `~~strike~~`, `''code''`,
//!   `^{sup}`, `_{sub}`, `[[link|text]]`, bare URLs, `{{image?width=300|alt}}`

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;
use zimpdf_ast::{
    Block, Bullet, Document, DocumentMeta, EmbeddedObject, FormatType, Heading, Image, Inline,
    Link, List, ListItem, Paragraph, Verbatim,
};

use crate::error::{CoreError, Result};

/// Capability that turns raw markup into a document tree
pub trait MarkupParser {
    /// Parse `text` into a document tree
    fn parse(&self, text: &str) -> Result<Document>;
}

/// Parser for Zim wiki pages
#[derive(Debug, Clone, Copy, Default)]
pub struct ZimParser;

impl MarkupParser for ZimParser {
    fn parse(&self, text: &str) -> Result<Document> {
        parse(text)
    }
}

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(={2,6})\s+(.*?)\s*=*\s*$").expect("heading pattern is valid")
});

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\t*)(\*|\[[ *x>]\]|\d+\.|[a-zA-Z]\.)\s+(.*)$").expect("list pattern is valid")
});

static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{4,}\s*$").expect("rule pattern is valid"));

static OBJECT_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\{\{(?:([\w.-]+):)?(.*)$").expect("object header pattern is valid")
});

static ATTRIBUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w-]+)="([^"]*)""#).expect("attribute pattern is valid"));

static HEADER_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w-]+):\s*(.*)$").expect("header pattern is valid"));

static INLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
          (?P<url>\b(?:https?|ftp|file)://[^\s\]]+)
        | \*\*(?P<strong>.+?)\*\*
        | //(?P<emphasis>.+?)//
        | __(?P<mark>.+?)__
        | ~~(?P<strike>.+?)~~
        | ''(?P<code>.+?)''
        | \^\{(?P<sup>[^}]*)\}
        | _\{(?P<sub>[^}]*)\}
        | \[\[(?P<link>[^\]|]+)(?:\|(?P<linktext>[^\]]*))?\]\]
        | \{\{(?P<img>[^}|?]+)(?:\?(?P<imgparams>[^}|]*))?(?:\|(?P<imgalt>[^}]*))?\}\}
        ",
    )
    .expect("inline pattern is valid")
});

/// Parser state for tracking what kind of block we're currently building
#[derive(Debug)]
enum ParserState {
    /// At the root level, not in any block
    Root,
    /// Building a paragraph, one entry per source line
    Paragraph(Vec<Vec<Inline>>),
    /// Building a list
    List(Vec<ListItem>),
    /// Inside a `'''` block; holds the opening line number
    Verbatim(usize, Vec<String>),
    /// Inside a `{{{` object
    Object(EmbeddedObject),
}

struct Parser {
    metadata: DocumentMeta,
    blocks: Vec<Block>,
    state: ParserState,
    /// Blank lines seen since the last block
    pending_blank: usize,
}

impl Parser {
    fn new() -> Self {
        Self {
            metadata: DocumentMeta::default(),
            blocks: Vec::new(),
            state: ParserState::Root,
            pending_blank: 0,
        }
    }

    fn parse(mut self, text: &str) -> Result<Document> {
        let text = text.replace("\r\n", "\n");
        let lines: Vec<&str> = text.lines().collect();

        let body_start = self.parse_header(&lines);

        for (index, line) in lines.iter().enumerate().skip(body_start) {
            self.process_line(index + 1, line);
        }

        match std::mem::replace(&mut self.state, ParserState::Root) {
            ParserState::Verbatim(start, _) => {
                return Err(CoreError::parse(start, "unterminated verbatim block"));
            }
            ParserState::Object(obj) => {
                return Err(CoreError::parse(obj.source_line, "unterminated object"));
            }
            other => self.state = other,
        }
        self.flush_state();
        self.flush_blank();

        debug!(blocks = self.blocks.len(), "parsed zim page");
        Ok(Document {
            metadata: self.metadata,
            blocks: self.blocks,
        })
    }

    /// Consume the page header, returning the index of the first body line
    fn parse_header(&mut self, lines: &[&str]) -> usize {
        let is_zim_page = lines
            .first()
            .is_some_and(|l| l.starts_with("Content-Type: text/x-zim-wiki"));
        if !is_zim_page {
            return 0;
        }

        for (index, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                return index + 1;
            }
            if let Some(caps) = HEADER_FIELD_RE.captures(line) {
                self.metadata
                    .headers
                    .insert(caps[1].to_string(), caps[2].trim().to_string());
            }
        }
        lines.len()
    }

    fn process_line(&mut self, line_no: usize, line: &str) {
        match &mut self.state {
            ParserState::Verbatim(_, content) => {
                if line.trim_end() == "'''" {
                    self.flush_state();
                } else {
                    content.push(format!("{line}\n"));
                }
                return;
            }
            ParserState::Object(obj) => {
                if line.trim_end() == "}}}" {
                    self.flush_state();
                } else {
                    obj.lines.push(format!("{line}\n"));
                }
                return;
            }
            _ => {}
        }

        if line.trim().is_empty() {
            self.flush_state();
            self.pending_blank += 1;
            return;
        }
        self.flush_blank();

        if line.trim_end() == "'''" {
            self.flush_state();
            self.state = ParserState::Verbatim(line_no, Vec::new());
            return;
        }

        if let Some(obj) = try_parse_object_header(line_no, line) {
            self.flush_state();
            self.state = ParserState::Object(obj);
            return;
        }

        if let Some(heading) = try_parse_heading(line) {
            self.flush_state();
            self.blocks.push(Block::Heading(heading));
            return;
        }

        if RULE_RE.is_match(line) {
            self.flush_state();
            self.blocks.push(Block::Rule);
            return;
        }

        if let Some(item) = try_parse_list_item(line) {
            self.handle_list_item(item);
            return;
        }

        self.handle_paragraph_line(line);
    }

    fn handle_list_item(&mut self, item: ListItem) {
        match &mut self.state {
            ParserState::List(items) => items.push(item),
            _ => {
                self.flush_state();
                self.state = ParserState::List(vec![item]);
            }
        }
    }

    fn handle_paragraph_line(&mut self, line: &str) {
        let inlines = parse_inlines(line);
        match &mut self.state {
            ParserState::Paragraph(lines) => lines.push(inlines),
            _ => {
                self.flush_state();
                self.state = ParserState::Paragraph(vec![inlines]);
            }
        }
    }

    /// Record the blank lines before the next block; they separate blocks in
    /// the output exactly as in the source
    fn flush_blank(&mut self) {
        if self.pending_blank > 0 {
            self.blocks.push(Block::Blank(self.pending_blank));
            self.pending_blank = 0;
        }
    }

    /// Flush the current state to blocks
    fn flush_state(&mut self) {
        let state = std::mem::replace(&mut self.state, ParserState::Root);

        match state {
            ParserState::Root => {}
            ParserState::Paragraph(lines) => {
                let mut inlines = Vec::new();
                for (i, line) in lines.into_iter().enumerate() {
                    if i > 0 {
                        inlines.push(Inline::Break);
                    }
                    inlines.extend(line);
                }
                self.blocks.push(Block::Paragraph(Paragraph { inlines }));
            }
            ParserState::List(items) => {
                if !items.is_empty() {
                    self.blocks.push(Block::List(List { items }));
                }
            }
            ParserState::Verbatim(_, lines) => {
                self.blocks.push(Block::Verbatim(Verbatim { lines }));
            }
            ParserState::Object(obj) => {
                self.blocks.push(Block::Object(obj));
            }
        }
    }
}

fn try_parse_heading(line: &str) -> Option<Heading> {
    let caps = HEADING_RE.captures(line)?;
    let marks = caps[1].len();
    let text = caps[2].trim();
    if text.is_empty() {
        return None;
    }
    Some(Heading {
        // six '=' is level 1, two '=' is level 5
        level: (7 - marks) as u8,
        text: parse_inlines(text),
    })
}

fn try_parse_list_item(line: &str) -> Option<ListItem> {
    let caps = LIST_ITEM_RE.captures(line)?;
    let bullet = match &caps[2] {
        "*" => Bullet::Plain,
        "[ ]" => Bullet::Unchecked,
        "[*]" => Bullet::Checked,
        "[x]" => Bullet::Crossed,
        "[>]" => Bullet::Migrated,
        label => Bullet::Numbered(label.to_string()),
    };
    Some(ListItem {
        bullet,
        level: caps[1].len().min(u8::MAX as usize) as u8,
        content: parse_inlines(&caps[3]),
    })
}

fn try_parse_object_header(line_no: usize, line: &str) -> Option<EmbeddedObject> {
    let caps = OBJECT_HEADER_RE.captures(line)?;
    let attributes = ATTRIBUTE_RE
        .captures_iter(caps.get(2).map_or("", |m| m.as_str()))
        .map(|a| (a[1].to_string(), a[2].to_string()))
        .collect();
    Some(EmbeddedObject {
        object_type: caps.get(1).map(|m| m.as_str().to_string()),
        attributes,
        lines: Vec::new(),
        source_line: line_no,
    })
}

/// Parse inline markup in a single line of text
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut result = Vec::new();
    let mut last = 0;

    for caps in INLINE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            result.push(Inline::Text(text[last..whole.start()].to_string()));
        }
        result.push(inline_from_captures(&caps));
        last = whole.end();
    }

    if last < text.len() {
        result.push(Inline::Text(text[last..].to_string()));
    }
    result
}

fn inline_from_captures(caps: &Captures<'_>) -> Inline {
    let formats = [
        ("strong", FormatType::Strong),
        ("emphasis", FormatType::Emphasis),
        ("mark", FormatType::Mark),
        ("strike", FormatType::Strike),
        ("sup", FormatType::Superscript),
        ("sub", FormatType::Subscript),
    ];
    for (group, format) in formats {
        if let Some(m) = caps.name(group) {
            return Inline::Format(format, parse_inlines(m.as_str()));
        }
    }

    if let Some(m) = caps.name("code") {
        return Inline::Format(FormatType::Code, vec![Inline::text(m.as_str())]);
    }

    if let Some(m) = caps.name("url") {
        return Inline::Link(Link {
            href: m.as_str().to_string(),
            text: Vec::new(),
        });
    }

    if let Some(m) = caps.name("link") {
        let text = caps
            .name("linktext")
            .map(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(parse_inlines)
            .unwrap_or_default();
        return Inline::Link(Link {
            href: m.as_str().trim().to_string(),
            text,
        });
    }

    if let Some(m) = caps.name("img") {
        let mut image = Image::new(m.as_str().trim());
        image.alt = caps
            .name("imgalt")
            .map(|a| a.as_str().to_string())
            .filter(|a| !a.is_empty());
        if let Some(params) = caps.name("imgparams") {
            for pair in params.as_str().split('&') {
                match pair.split_once('=') {
                    Some(("width", v)) => image.width = Some(v.to_string()),
                    Some(("height", v)) => image.height = Some(v.to_string()),
                    _ => {}
                }
            }
        }
        return Inline::Image(image);
    }

    Inline::Text(caps[0].to_string())
}

/// Parse Zim wiki text into a document tree.
///
/// # Errors
///
/// Fails with [`CoreError::Parse`] when a verbatim block or an embedded object
/// is still open at the end of the text. Unknown constructs are kept as
/// paragraph text.
pub fn parse(text: &str) -> Result<Document> {
    Parser::new().parse(text)
}
