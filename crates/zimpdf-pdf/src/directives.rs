//! Directive extraction
//!
//! The block right after a page's title may hold keyword lines that tune the
//! PDF output:
//!
//! ```text
//! My Page
//!
//! toc
//! remarkable
//!
//! Body starts here.
//! ```
//!
//! Scanning starts at the third line and stops at the first blank line, so
//! keywords further down the page are ordinary text.

use tracing::debug;

/// Base font size passed on every run
const FONT_SIZE: &str = "fontsize=12pt";

/// Font used by the `dvs` directive
const DEJAVU_SANS: &str = "DejaVuSans.ttf";

/// A recognized keyword line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `s`: start every section on its own page
    SplitSections,
    /// `toc`: table of contents
    TableOfContents,
    /// `remarkable`: tablet layout with an empty trailing page
    Tablet,
    /// `dvs`: DejaVu Sans body font
    DejaVuSans,
}

impl Directive {
    /// All directives in table order
    pub const ALL: [Directive; 4] = [
        Directive::SplitSections,
        Directive::TableOfContents,
        Directive::Tablet,
        Directive::DejaVuSans,
    ];

    /// Keyword that selects this directive
    pub fn keyword(self) -> &'static str {
        match self {
            Directive::SplitSections => "s",
            Directive::TableOfContents => "toc",
            Directive::Tablet => "remarkable",
            Directive::DejaVuSans => "dvs",
        }
    }

    /// Whether `line` is this directive's keyword, ignoring trailing blanks
    pub fn matches(self, line: &str) -> bool {
        line.trim_end_matches(['\n', '\r'])
            .trim_end_matches([' ', '\t'])
            == self.keyword()
    }

    fn apply(self, set: &mut DirectiveSet) {
        match self {
            Directive::SplitSections => set.split_sections = true,
            Directive::TableOfContents => set.table_of_contents = true,
            Directive::Tablet => set.tablet_mode = true,
            Directive::DejaVuSans => set.font_override_path = Some(DEJAVU_SANS.to_string()),
        }
    }
}

/// Output options derived from a document's directive block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectiveSet {
    /// Start each section on a new page (`s`)
    pub split_sections: bool,
    /// Print a table of contents (`toc`)
    pub table_of_contents: bool,
    /// Tablet layout and a timestamped file name (`remarkable`)
    pub tablet_mode: bool,
    /// Main font file (`dvs`)
    pub font_override_path: Option<String>,
}

impl DirectiveSet {
    /// Scan rendered lines for directives
    ///
    /// Line 0 is the title and line 1 its blank line or heading underline;
    /// scanning covers line 2 up to, not including, the first blank line.
    pub fn extract(lines: &[String]) -> Self {
        let mut set = Self::default();
        for line in lines.iter().skip(2).take_while(|l| !is_blank(l)) {
            for directive in Directive::ALL {
                if directive.matches(line) {
                    debug!(keyword = directive.keyword(), "directive found");
                    directive.apply(&mut set);
                }
            }
        }
        set
    }

    /// Directives forced by the invocation mode, before any document scan
    pub fn for_mode(tablet: bool, split_sections: bool) -> Self {
        Self {
            split_sections,
            tablet_mode: tablet,
            ..Self::default()
        }
    }

    /// Union of two sets; a font override in `other` wins
    pub fn merge(self, other: DirectiveSet) -> Self {
        Self {
            split_sections: self.split_sections || other.split_sections,
            table_of_contents: self.table_of_contents || other.table_of_contents,
            tablet_mode: self.tablet_mode || other.tablet_mode,
            font_override_path: other.font_override_path.or(self.font_override_path),
        }
    }

    /// Renderer option tokens: the base font size, then one pair per directive
    pub fn option_flags(&self) -> Vec<String> {
        let mut values = vec![FONT_SIZE.to_string()];
        if self.split_sections {
            values.push("splitsection=1".to_string());
        }
        if self.table_of_contents {
            values.push("toc".to_string());
        }
        if self.tablet_mode {
            values.push("endemptypage=1".to_string());
        }
        if let Some(font) = &self.font_override_path {
            values.push(format!("mainfont:{font}"));
        }

        values
            .into_iter()
            .flat_map(|v| ["--variable".to_string(), v])
            .collect()
    }

    /// The option tokens joined by single spaces
    pub fn options_string(&self) -> String {
        self.option_flags().join(" ")
    }
}

/// A line holding nothing but whitespace and its terminator
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
