//! Configuration
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags. The result, [`RunConfig`], is built once at startup and
//! passed to every stage; nothing reads paths from globals.
//!
//! ```toml
//! [paths]
//! work_dir = "/tmp/zim_pdf_convert"
//! template = "/home/me/.local/share/zimpdf/template.tex"
//!
//! [renderer]
//! program = "pandoc"
//! pdf_engine = "xelatex"
//! timeout_secs = 120
//!
//! [output]
//! open_output = true
//! file_browser = "nautilus"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use zimpdf_pdf::{DEFAULT_PDF_ENGINE, DEFAULT_PROGRAM, DEFAULT_TIMEOUT};

/// Directory used when no work directory is configured
pub const DEFAULT_WORK_DIR_NAME: &str = "zim_pdf_convert";

/// Log file name inside the work directory
pub const LOG_FILE_NAME: &str = "pdf_convert.log";

/// Template file name looked up next to the executable
pub const TEMPLATE_FILE_NAME: &str = "template.tex";

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// File-system locations
    pub paths: PathSettings,
    /// External renderer
    pub renderer: RendererSettings,
    /// What happens with the result
    pub output: OutputSettings,
}

/// File-system locations; unset entries fall back to defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathSettings {
    /// Holds the log file and intermediate Markdown
    pub work_dir: Option<PathBuf>,
    /// Where PDFs go; defaults to the work directory
    pub output_dir: Option<PathBuf>,
    /// Append-mode log file
    pub log_file: Option<PathBuf>,
    /// Typesetting template
    pub template: Option<PathBuf>,
    /// Replacement for `~` in image paths
    pub home_dir: Option<PathBuf>,
}

/// External renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub program: String,
    pub pdf_engine: String,
    pub timeout_secs: u64,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            pdf_engine: DEFAULT_PDF_ENGINE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Output handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Open the output directory when done
    pub open_output: bool,
    /// Command used to open it; the desktop default when unset
    pub file_browser: Option<String>,
    /// Keep the intermediate Markdown next to the PDF
    pub keep_markdown: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            open_output: true,
            file_browser: None,
            keep_markdown: false,
        }
    }
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Read settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Command-line overrides applied on top of [`Settings`]
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub no_open: bool,
    pub keep_markdown: bool,
    pub dry_run: bool,
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub work_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_file: PathBuf,
    pub template: PathBuf,
    pub home_dir: Option<PathBuf>,
    pub program: String,
    pub pdf_engine: String,
    pub timeout: Duration,
    pub open_output: bool,
    pub file_browser: Option<String>,
    pub keep_markdown: bool,
    pub dry_run: bool,
}

impl RunConfig {
    /// Merge settings and overrides, filling in defaults
    pub fn resolve(settings: Settings, overrides: Overrides) -> Self {
        let work_dir = settings
            .paths
            .work_dir
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_WORK_DIR_NAME));
        let output_dir = overrides
            .output_dir
            .or(settings.paths.output_dir)
            .unwrap_or_else(|| work_dir.clone());
        let log_file = settings
            .paths
            .log_file
            .unwrap_or_else(|| work_dir.join(LOG_FILE_NAME));
        let template = overrides
            .template
            .or(settings.paths.template)
            .unwrap_or_else(default_template);

        Self {
            work_dir,
            output_dir,
            log_file,
            template,
            home_dir: settings.paths.home_dir,
            program: settings.renderer.program,
            pdf_engine: settings.renderer.pdf_engine,
            timeout: Duration::from_secs(settings.renderer.timeout_secs),
            open_output: settings.output.open_output && !overrides.no_open,
            file_browser: settings.output.file_browser,
            keep_markdown: settings.output.keep_markdown || overrides.keep_markdown,
            dry_run: overrides.dry_run,
        }
    }
}

/// `template.tex` beside the running executable
fn default_template() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TEMPLATE_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(TEMPLATE_FILE_NAME))
}
