//! CLI Application logic
//!
//! Parses arguments, resolves configuration and runs one page through the
//! conversion pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, ValueEnum};
use tracing::{debug, error, info, warn};

use zimpdf_core::{parse_file, ImagePaths, MarkdownRenderer, ZimParser};
use zimpdf_pdf::{
    DirectiveSet, MarkdownFile, PandocRunner, PdfError, PreparedDocument, RenderJob,
    RenderJobBuilder,
};

use crate::config::{Overrides, RunConfig, Settings};
use crate::logging;

/// Output mode chosen on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Honor the page's own directives only
    #[default]
    Normal,
    /// Tablet layout with a timestamped file name
    Tablet,
    /// Tablet layout with one page per section
    TabletSplit,
}

impl Mode {
    /// Directives forced by this mode
    pub fn directives(self) -> DirectiveSet {
        match self {
            Mode::Normal => DirectiveSet::default(),
            Mode::Tablet => DirectiveSet::for_mode(true, false),
            Mode::TabletSplit => DirectiveSet::for_mode(true, true),
        }
    }
}

#[derive(Parser)]
#[command(name = "zimpdf")]
#[command(author, version, about = "Convert a Zim wiki page to PDF", long_about = None)]
struct Cli {
    /// Zim page to convert
    source: PathBuf,

    /// Directory holding the page's attachments
    attachment_dir: Option<PathBuf>,

    /// Output mode
    #[arg(short, long, value_enum, default_value_t = Mode::Normal)]
    mode: Mode,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the PDF
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Typesetting template
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Do not open the output directory afterwards
    #[arg(long)]
    no_open: bool,

    /// Keep the intermediate Markdown next to the PDF
    #[arg(long)]
    keep_markdown: bool,

    /// Write the Markdown and print the renderer command without running it
    #[arg(long)]
    dry_run: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output_dir.clone(),
            template: self.template.clone(),
            no_open: self.no_open,
            keep_markdown: self.keep_markdown,
            dry_run: self.dry_run,
        }
    }
}

/// One page to convert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    /// Zim page on disk
    pub source: PathBuf,
    /// Base for `./` and `../` image paths
    pub attachment_dir: Option<PathBuf>,
    /// Directives forced on top of the page's own
    pub mode: Mode,
}

/// What happened to the renderer step
#[derive(Debug)]
pub enum RenderStatus {
    /// The renderer exited cleanly
    Written,
    /// The renderer was not run
    Skipped,
    /// The renderer ran and failed or timed out
    Failed(PdfError),
}

/// Result of a conversion that got as far as the renderer
#[derive(Debug)]
pub struct Conversion {
    /// The renderer invocation that was built
    pub job: RenderJob,
    /// Outcome of running it
    pub status: RenderStatus,
    /// Kept copy of the Markdown, if any
    pub markdown: Option<PathBuf>,
}

impl Conversion {
    /// False only when the renderer ran and failed
    pub fn succeeded(&self) -> bool {
        !matches!(self.status, RenderStatus::Failed(_))
    }
}

/// Run the CLI application
pub fn run_cli() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                logging::init(None, cli.verbose);
                error!("{err:?}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    let config = RunConfig::resolve(settings, cli.overrides());
    logging::init(Some(&config.log_file), cli.verbose);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        source = %cli.source.display(),
        mode = ?cli.mode,
        "zimpdf starting"
    );

    let request = ConvertRequest {
        source: cli.source,
        attachment_dir: cli.attachment_dir,
        mode: cli.mode,
    };
    let conversion = match convert(&config, &request, Local::now().naive_local()) {
        Ok(conversion) => conversion,
        Err(err) => {
            error!("{err:?}");
            return ExitCode::FAILURE;
        }
    };

    match &conversion.status {
        RenderStatus::Written => info!(output = %conversion.job.output_pdf.display(), "done"),
        RenderStatus::Skipped => println!("{}", conversion.job.command_line()),
        RenderStatus::Failed(err) => error!("rendering failed: {err}"),
    }
    if config.open_output && !config.dry_run {
        open_output_dir(&config.output_dir, config.file_browser.as_deref());
    }

    if conversion.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Convert one page
///
/// Errors before the renderer runs (unreadable source, malformed object,
/// missing title or body, I/O in the work directory) are returned as `Err`
/// and nothing is rendered. A renderer failure is reported in the returned
/// [`Conversion`] instead.
pub fn convert(
    config: &RunConfig,
    request: &ConvertRequest,
    now: NaiveDateTime,
) -> Result<Conversion> {
    let source = &request.source;
    let doc = parse_file(&ZimParser, source)
        .with_context(|| format!("Failed to parse {}", source.display()))?;

    let mut image_paths = match &request.attachment_dir {
        Some(dir) => ImagePaths::new(dir),
        None => ImagePaths::without_attachments(),
    };
    if let Some(home) = &config.home_dir {
        image_paths = image_paths.with_home_dir(home);
    }
    let rendered = MarkdownRenderer::new(image_paths)
        .render(&doc)
        .with_context(|| format!("Failed to render {}", source.display()))?;

    let prepared = PreparedDocument::prepare(&rendered, request.mode.directives(), now.date())
        .with_context(|| format!("Failed to prepare {}", source.display()))?;

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", config.output_dir.display())
    })?;
    let markdown = MarkdownFile::create(&config.work_dir, &prepared.lines).with_context(|| {
        format!("Failed to write markdown in {}", config.work_dir.display())
    })?;

    if !config.template.exists() {
        warn!(template = %config.template.display(), "template not found");
    }
    let job = RenderJobBuilder::new(&config.output_dir, &config.template)
        .with_program(&config.program)
        .with_pdf_engine(&config.pdf_engine)
        .build(
            markdown.path(),
            &prepared.front_matter.filename,
            &prepared.directives,
            now,
        );

    let status = if config.dry_run {
        info!(command = %job.command_line(), "dry run, renderer not started");
        RenderStatus::Skipped
    } else {
        match PandocRunner::new(config.timeout).run(&job) {
            Ok(()) => RenderStatus::Written,
            Err(err) => RenderStatus::Failed(err),
        }
    };

    let kept = if config.keep_markdown || config.dry_run {
        keep_markdown(&markdown, &config.output_dir, &prepared.front_matter.filename)
    } else {
        None
    };

    Ok(Conversion {
        job,
        status,
        markdown: kept,
    })
}

fn keep_markdown(markdown: &MarkdownFile, output_dir: &Path, filename: &str) -> Option<PathBuf> {
    let dest = output_dir.join(format!("{filename}.md"));
    match markdown.persist_copy(&dest) {
        Ok(()) => {
            info!(path = %dest.display(), "markdown kept");
            Some(dest)
        }
        Err(err) => {
            warn!(path = %dest.display(), error = %err, "cannot keep markdown");
            None
        }
    }
}

/// Show the output directory in a file browser, best effort
pub fn open_output_dir(dir: &Path, browser: Option<&str>) {
    let result = match browser {
        Some(program) => Command::new(program).arg(dir).spawn().map(|_| ()),
        None => open::that_detached(dir),
    };
    match result {
        Ok(()) => debug!(dir = %dir.display(), "file browser opened"),
        Err(err) => warn!(dir = %dir.display(), error = %err, "cannot open file browser"),
    }
}
