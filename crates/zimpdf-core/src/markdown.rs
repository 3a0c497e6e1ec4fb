//! Markdown Renderer
//!
//! This module converts a `zimpdf_ast::Document` into a sequence of Markdown
//! lines, each terminated by `\n`. Structural nodes follow plain Markdown
//! conventions and blocks are separated only by the blank lines recorded in
//! the tree; embedded objects and images carry custom rules:
//!
//! - a `code` object becomes a fenced block whose info string is the object's
//!   `lang` attribute, any other object type becomes a tab-indented block
//! - an image is resolved through the [`Linker`], rewritten by [`ImagePaths`]
//!   and written as `![alt](src)` with an optional `{ width=W height=H }` block
//!
//! # Example
//!
//! ```
//! use zimpdf_ast::{Block, Document, EmbeddedObject};
//! use zimpdf_core::{ImagePaths, MarkdownRenderer};
//!
//! let doc = Document::from_blocks(vec![Block::Object(
//!     EmbeddedObject::new("code", vec!["x = 1\n".to_string()]).with_attribute("lang", "python"),
//! )]);
//!
//! let lines = MarkdownRenderer::new(ImagePaths::without_attachments())
//!     .render(&doc)
//!     .unwrap();
//! assert_eq!(lines.as_slice(), ["```python\n", "x = 1\n", "```\n"]);
//! ```

use std::ops::Deref;

use tracing::debug;
use zimpdf_ast::{
    Block, Bullet, Document, EmbeddedObject, FormatType, Heading, Image, Inline, Link, List,
    Paragraph, Verbatim,
};

use crate::error::{CoreError, Result};
use crate::linker::{ImagePaths, Linker, StubLinker};

/// Indentation unit for verbatim blocks, untyped objects and nested lists
const INDENT: &str = "\t";

/// Rendered Markdown, one entry per line, each ending in `\n`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedLines(Vec<String>);

impl RenderedLines {
    /// Split text into lines, keeping terminators and terminating the last line
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();
        if let Some(last) = lines.last_mut() {
            if !last.ends_with('\n') {
                last.push('\n');
            }
        }
        Self(lines)
    }

    /// Wrap already split lines
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self(lines)
    }

    /// Borrow the lines
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Take ownership of the lines
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    /// Concatenate the lines back into one string
    pub fn to_markdown(&self) -> String {
        self.0.concat()
    }
}

impl Deref for RenderedLines {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Markdown renderer
pub struct MarkdownRenderer<L: Linker = StubLinker> {
    linker: L,
    image_paths: ImagePaths,
    output: String,
}

impl MarkdownRenderer<StubLinker> {
    /// Create a renderer that resolves images with the stub linker
    pub fn new(image_paths: ImagePaths) -> Self {
        Self::with_linker(StubLinker, image_paths)
    }
}

impl<L: Linker> MarkdownRenderer<L> {
    /// Create a renderer with a custom linker
    pub fn with_linker(linker: L, image_paths: ImagePaths) -> Self {
        Self {
            linker,
            image_paths,
            output: String::new(),
        }
    }

    /// Render a document to Markdown lines
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedObject`] when an embedded object has no
    /// type. Nothing is returned for the partially rendered document.
    pub fn render(&mut self, doc: &Document) -> Result<RenderedLines> {
        self.output.clear();

        for block in &doc.blocks {
            self.render_block(block)?;
        }

        let lines = RenderedLines::from_text(&self.output);
        debug!(blocks = doc.blocks.len(), lines = lines.len(), "rendered markdown");
        Ok(lines)
    }

    fn render_block(&mut self, block: &Block) -> Result<()> {
        match block {
            Block::Heading(h) => self.render_heading(h),
            Block::Paragraph(p) => self.render_paragraph(p),
            Block::List(l) => self.render_list(l),
            Block::Verbatim(v) => self.render_verbatim(v),
            Block::Object(o) => self.render_object(o)?,
            Block::Rule => self.output.push_str("-----\n"),
            Block::Blank(count) => self.output.push_str(&"\n".repeat(*count)),
        }
        Ok(())
    }

    /// Setext underlines for levels 1 and 2, ATX markers below that
    fn render_heading(&mut self, heading: &Heading) {
        let text = self.inlines_to_string(&heading.text);
        match heading.level {
            1 | 2 => {
                let mark = if heading.level == 1 { "=" } else { "-" };
                let underline = mark.repeat(text.chars().count().max(3));
                self.output.push_str(&format!("{text}\n{underline}\n"));
            }
            level => {
                let prefix = "#".repeat(level.clamp(3, 6) as usize);
                self.output.push_str(&format!("{prefix} {text}\n"));
            }
        }
    }

    fn render_paragraph(&mut self, para: &Paragraph) {
        let text = self.inlines_to_string(&para.inlines);
        self.output.push_str(&text);
        self.output.push('\n');
    }

    fn render_list(&mut self, list: &List) {
        for item in &list.items {
            let marker = match &item.bullet {
                Bullet::Plain => "* ".to_string(),
                Bullet::Numbered(label) => format!("{label} "),
                Bullet::Unchecked => "* [ ] ".to_string(),
                Bullet::Checked => "* [x] ".to_string(),
                Bullet::Crossed => "* [-] ".to_string(),
                Bullet::Migrated => "* [>] ".to_string(),
            };
            let text = self.inlines_to_string(&item.content);
            let indent = INDENT.repeat(item.level as usize);
            self.output.push_str(&format!("{indent}{marker}{text}\n"));
        }
    }

    fn render_verbatim(&mut self, verbatim: &Verbatim) {
        self.push_prefixed(INDENT, &verbatim.lines);
    }

    fn render_object(&mut self, obj: &EmbeddedObject) -> Result<()> {
        let object_type = obj.object_type.as_deref().ok_or(CoreError::MalformedObject {
            line: obj.source_line,
        })?;

        if object_type == "code" {
            let lang = obj.lang().unwrap_or_default();
            self.output.push_str(&format!("```{lang}\n"));
            self.push_prefixed("", &obj.lines);
            self.output.push_str("```\n");
        } else {
            self.push_prefixed(INDENT, &obj.lines);
        }
        Ok(())
    }

    fn push_prefixed(&mut self, prefix: &str, lines: &[String]) {
        for line in lines {
            self.output.push_str(prefix);
            self.output.push_str(line);
            if !line.ends_with('\n') {
                self.output.push('\n');
            }
        }
    }

    fn inlines_to_string(&self, inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            self.render_inline(inline, &mut out);
        }
        out
    }

    fn render_inline(&self, inline: &Inline, out: &mut String) {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Format(format_type, inner) => {
                let mark = match format_type {
                    FormatType::Strong => "**",
                    FormatType::Emphasis => "*",
                    FormatType::Mark => "==",
                    FormatType::Strike => "~~",
                    FormatType::Code => "`",
                    FormatType::Superscript => "^",
                    FormatType::Subscript => "~",
                };
                out.push_str(mark);
                for i in inner {
                    self.render_inline(i, out);
                }
                out.push_str(mark);
            }
            Inline::Link(link) => self.render_link(link, out),
            Inline::Image(image) => out.push_str(&self.image_markdown(image)),
            Inline::Break => out.push('\n'),
        }
    }

    fn render_link(&self, link: &Link, out: &mut String) {
        let href = self.linker.link(&link.href);
        let text = if link.text.is_empty() {
            link.href.clone()
        } else {
            self.inlines_to_string(&link.text)
        };
        out.push_str(&format!("[{text}]({href})"));
    }

    /// `![alt](src)` plus `{ width=W height=H }` when a size is given
    ///
    /// Size attributes are concatenated without a separator; downstream
    /// templates depend on this exact text.
    pub fn image_markdown(&self, image: &Image) -> String {
        let src = self.image_paths.rewrite(&self.linker.image(&image.src));
        let alt = image.alt.as_deref().unwrap_or_default();

        let mut params = String::new();
        if let Some(width) = &image.width {
            params.push_str(&format!("width={width}"));
        }
        if let Some(height) = &image.height {
            params.push_str(&format!("height={height}"));
        }

        if params.is_empty() {
            format!("![{alt}]({src})")
        } else {
            format!("![{alt}]({src}){{ {params} }}")
        }
    }
}

/// Render a document with the stub linker
pub fn render(doc: &Document, image_paths: ImagePaths) -> Result<RenderedLines> {
    MarkdownRenderer::new(image_paths).render(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zimpdf_ast::ListItem;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new(ImagePaths::new("/home/u/notes/attach").with_home_dir("/home/u"))
    }

    fn para(text: &str) -> Block {
        Block::Paragraph(Paragraph {
            inlines: vec![Inline::text(text)],
        })
    }

    #[test]
    fn test_code_object_fenced() {
        let doc = Document::from_blocks(vec![Block::Object(
            EmbeddedObject::new("code", vec!["x = 1\n".to_string()])
                .with_attribute("lang", "python"),
        )]);
        let lines = renderer().render(&doc).unwrap();
        assert_eq!(lines.as_slice(), ["```python\n", "x = 1\n", "```\n"]);
    }

    #[test]
    fn test_code_object_content_not_indented() {
        let doc = Document::from_blocks(vec![Block::Object(
            EmbeddedObject::new("code", vec!["    nested\n".to_string()])
                .with_attribute("lang", "rust"),
        )]);
        let lines = renderer().render(&doc).unwrap();
        assert_eq!(lines[1], "    nested\n");
    }

    #[test]
    fn test_code_object_without_lang() {
        let doc = Document::from_blocks(vec![Block::Object(EmbeddedObject::new(
            "code",
            vec!["plain\n".to_string()],
        ))]);
        let lines = renderer().render(&doc).unwrap();
        assert_eq!(lines[0], "```\n");
    }

    #[test]
    fn test_other_object_indented() {
        let doc = Document::from_blocks(vec![Block::Object(EmbeddedObject::new(
            "equation",
            vec!["a^2\n".to_string(), "b^2\n".to_string()],
        ))]);
        let lines = renderer().render(&doc).unwrap();
        assert_eq!(lines.as_slice(), ["\ta^2\n", "\tb^2\n"]);
    }

    #[test]
    fn test_object_without_type_is_malformed() {
        let obj = EmbeddedObject {
            source_line: 7,
            ..Default::default()
        };
        let doc = Document::from_blocks(vec![Block::Object(obj)]);
        let err = renderer().render(&doc).unwrap_err();
        assert!(matches!(err, CoreError::MalformedObject { line: 7 }));
        assert!(err.to_string().contains("Malformed object"));
    }

    #[test]
    fn test_image_with_width() {
        let mut img = Image::new("./diagram.png");
        img.width = Some("50%".to_string());
        assert_eq!(
            renderer().image_markdown(&img),
            "![](/home/u/notes/attach/diagram.png){ width=50% }"
        );
    }

    #[test]
    fn test_image_width_and_height_unseparated() {
        let mut img = Image::new("/abs/a.png");
        img.alt = Some("A".to_string());
        img.width = Some("10".to_string());
        img.height = Some("20".to_string());
        assert_eq!(
            renderer().image_markdown(&img),
            "![A](/abs/a.png){ width=10height=20 }"
        );
    }

    #[test]
    fn test_image_without_size() {
        let img = Image::new("../b.png");
        assert_eq!(renderer().image_markdown(&img), "![](/home/u/notes/b.png)");
    }

    #[test]
    fn test_image_goes_through_linker() {
        struct Prefix;
        impl Linker for Prefix {
            fn image(&self, src: &str) -> String {
                format!("/linked/{src}")
            }
        }
        let r = MarkdownRenderer::with_linker(Prefix, ImagePaths::without_attachments());
        assert_eq!(r.image_markdown(&Image::new("x.png")), "![](/linked/x.png)");
    }

    #[test]
    fn test_blank_runs_separate_blocks() {
        let doc = Document::from_blocks(vec![para("Title"), Block::Blank(1), para("Body")]);
        let lines = renderer().render(&doc).unwrap();
        assert_eq!(lines.as_slice(), ["Title\n", "\n", "Body\n"]);
    }

    #[test]
    fn test_adjacent_blocks_have_no_separator() {
        let doc = Document::from_blocks(vec![para("a"), para("b"), Block::Blank(2), para("c")]);
        let lines = renderer().render(&doc).unwrap();
        assert_eq!(lines.as_slice(), ["a\n", "b\n", "\n", "\n", "c\n"]);
    }

    #[test]
    fn test_paragraph_breaks_become_lines() {
        let doc = Document::from_blocks(vec![Block::Paragraph(Paragraph {
            inlines: vec![Inline::text("toc"), Inline::Break, Inline::text("s")],
        })]);
        let lines = renderer().render(&doc).unwrap();
        assert_eq!(lines.as_slice(), ["toc\n", "s\n"]);
    }

    #[test]
    fn test_heading_styles() {
        let doc = Document::from_blocks(vec![
            Block::Heading(Heading {
                level: 1,
                text: vec![Inline::text("Top")],
            }),
            Block::Heading(Heading {
                level: 3,
                text: vec![Inline::text("Deep")],
            }),
        ]);
        let lines = renderer().render(&doc).unwrap();
        assert_eq!(lines.as_slice(), ["Top\n", "===\n", "### Deep\n"]);
    }

    #[test]
    fn test_nested_list() {
        let doc = Document::from_blocks(vec![Block::List(List {
            items: vec![
                ListItem {
                    bullet: Bullet::Plain,
                    level: 0,
                    content: vec![Inline::text("one")],
                },
                ListItem {
                    bullet: Bullet::Unchecked,
                    level: 1,
                    content: vec![Inline::text("two")],
                },
            ],
        })]);
        let lines = renderer().render(&doc).unwrap();
        assert_eq!(lines.as_slice(), ["* one\n", "\t* [ ] two\n"]);
    }

    #[test]
    fn test_inline_formats() {
        let doc = Document::from_blocks(vec![Block::Paragraph(Paragraph {
            inlines: vec![
                Inline::Format(FormatType::Strong, vec![Inline::text("b")]),
                Inline::text(" "),
                Inline::Format(FormatType::Emphasis, vec![Inline::text("i")]),
                Inline::text(" "),
                Inline::Link(Link {
                    href: "https://x.org".to_string(),
                    text: vec![],
                }),
            ],
        })]);
        let lines = renderer().render(&doc).unwrap();
        assert_eq!(lines[0], "**b** *i* [https://x.org](https://x.org)\n");
    }

    #[test]
    fn test_empty_document_renders_no_lines() {
        let lines = renderer().render(&Document::new()).unwrap();
        assert!(lines.is_empty());
    }
}
