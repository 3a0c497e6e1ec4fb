//! Render job construction
//!
//! A [`RenderJob`] is the fully resolved pandoc invocation for one document.
//! Its argument order is fixed:
//!
//! ```text
//! -N --template=<template>
//! --variable geometry=a4paper,left=2cm,right=2cm,top=2cm,bottom=2cm
//! <option flags> <input.md> --pdf-engine=<engine> -o <output.pdf>
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::directives::DirectiveSet;

/// Page geometry passed on every run
pub const GEOMETRY: &str = "geometry=a4paper,left=2cm,right=2cm,top=2cm,bottom=2cm";

/// Default external renderer
pub const DEFAULT_PROGRAM: &str = "pandoc";

/// Default PDF engine
pub const DEFAULT_PDF_ENGINE: &str = "xelatex";

/// A resolved renderer invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    /// Renderer executable
    pub program: String,
    /// Intermediate Markdown file
    pub input_markdown: PathBuf,
    /// PDF to produce
    pub output_pdf: PathBuf,
    /// Typesetting template
    pub template: PathBuf,
    /// PDF engine name
    pub pdf_engine: String,
    /// Directive-derived option tokens, base font size first
    pub option_flags: Vec<String>,
}

impl RenderJob {
    /// Arguments in invocation order
    pub fn args(&self) -> Vec<OsString> {
        let mut template = OsString::from("--template=");
        template.push(&self.template);

        let mut args = vec![
            OsString::from("-N"),
            template,
            OsString::from("--variable"),
            OsString::from(GEOMETRY),
        ];
        args.extend(self.option_flags.iter().map(OsString::from));
        args.push(self.input_markdown.clone().into_os_string());
        args.push(OsString::from(format!("--pdf-engine={}", self.pdf_engine)));
        args.push(OsString::from("-o"));
        args.push(self.output_pdf.clone().into_os_string());
        args
    }

    /// Program and arguments as one line, for logs
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in self.args() {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Builds [`RenderJob`]s sharing one output directory and template
#[derive(Debug, Clone)]
pub struct RenderJobBuilder {
    output_dir: PathBuf,
    template: PathBuf,
    program: String,
    pdf_engine: String,
}

impl RenderJobBuilder {
    /// Builder writing into `output_dir` with the given template
    pub fn new(output_dir: impl Into<PathBuf>, template: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            template: template.into(),
            program: DEFAULT_PROGRAM.to_string(),
            pdf_engine: DEFAULT_PDF_ENGINE.to_string(),
        }
    }

    /// Use another renderer executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Use another PDF engine
    pub fn with_pdf_engine(mut self, engine: impl Into<String>) -> Self {
        self.pdf_engine = engine.into();
        self
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `<dir>/<filename>.pdf`, or `<dir>/<filename>_<YYYYMMDD_HHMMSS>.pdf` in
    /// tablet mode so repeated exports never overwrite each other
    pub fn output_path(&self, filename: &str, tablet_mode: bool, now: NaiveDateTime) -> PathBuf {
        let name = if tablet_mode {
            format!("{filename}_{}.pdf", now.format("%Y%m%d_%H%M%S"))
        } else {
            format!("{filename}.pdf")
        };
        self.output_dir.join(name)
    }

    /// Assemble the job for one document
    pub fn build(
        &self,
        input_markdown: &Path,
        filename: &str,
        directives: &DirectiveSet,
        now: NaiveDateTime,
    ) -> RenderJob {
        RenderJob {
            program: self.program.clone(),
            input_markdown: input_markdown.to_path_buf(),
            output_pdf: self.output_path(filename, directives.tablet_mode, now),
            template: self.template.clone(),
            pdf_engine: self.pdf_engine.clone(),
            option_flags: directives.option_flags(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 19)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn builder() -> RenderJobBuilder {
        RenderJobBuilder::new("/tmp/out", "/opt/zimpdf/template.tex")
    }

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_plain_output_path() {
        let path = builder().output_path("My_Super_Document", false, at(10, 0, 0));
        assert_eq!(path, PathBuf::from("/tmp/out/My_Super_Document.pdf"));
    }

    #[test]
    fn test_tablet_output_path_is_timestamped() {
        let path = builder().output_path("My_Super_Document", true, at(9, 5, 7));
        assert_eq!(
            path,
            PathBuf::from("/tmp/out/My_Super_Document_20210319_090507.pdf")
        );
    }

    #[test]
    fn test_tablet_paths_differ_one_second_apart() {
        let b = builder();
        assert_ne!(
            b.output_path("Doc", true, at(12, 0, 0)),
            b.output_path("Doc", true, at(12, 0, 1))
        );
    }

    #[test]
    fn test_argument_order() {
        let directives = DirectiveSet {
            table_of_contents: true,
            ..DirectiveSet::default()
        };
        let job = builder().build(Path::new("/tmp/w/in.md"), "Doc", &directives, at(1, 2, 3));
        assert_eq!(
            strings(job.args()),
            [
                "-N",
                "--template=/opt/zimpdf/template.tex",
                "--variable",
                "geometry=a4paper,left=2cm,right=2cm,top=2cm,bottom=2cm",
                "--variable",
                "fontsize=12pt",
                "--variable",
                "toc",
                "/tmp/w/in.md",
                "--pdf-engine=xelatex",
                "-o",
                "/tmp/out/Doc.pdf",
            ]
        );
    }

    #[test]
    fn test_command_line() {
        let job = builder()
            .with_program("/usr/bin/pandoc")
            .with_pdf_engine("lualatex")
            .build(Path::new("in.md"), "Doc", &DirectiveSet::default(), at(0, 0, 0));
        assert_eq!(
            job.command_line(),
            "/usr/bin/pandoc -N --template=/opt/zimpdf/template.tex --variable \
             geometry=a4paper,left=2cm,right=2cm,top=2cm,bottom=2cm --variable fontsize=12pt \
             in.md --pdf-engine=lualatex -o /tmp/out/Doc.pdf"
        );
    }

    #[test]
    fn test_tablet_job_uses_timestamp() {
        let directives = DirectiveSet::for_mode(true, false);
        let job = builder().build(Path::new("in.md"), "Doc", &directives, at(23, 59, 59));
        assert_eq!(job.output_pdf, PathBuf::from("/tmp/out/Doc_20210319_235959.pdf"));
        assert!(job.option_flags.contains(&"endemptypage=1".to_string()));
    }
}
