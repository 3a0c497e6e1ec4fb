//! zimpdf CLI - Command-line interface library
//!
//! Converts one Zim wiki page to PDF: parse, render to Markdown, add front
//! matter, then hand the file to pandoc.
//!
//! # Library Usage
//!
//! ```ignore
//! use zimpdf_cli::{convert, ConvertRequest, Mode, Overrides, RunConfig, Settings};
//!
//! let config = RunConfig::resolve(Settings::default(), Overrides::default());
//! let request = ConvertRequest {
//!     source: "Notes/Page.txt".into(),
//!     attachment_dir: Some("Notes/Page".into()),
//!     mode: Mode::Tablet,
//! };
//! let conversion = convert(&config, &request, chrono::Local::now().naive_local())?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Plain conversion
//! zimpdf Notes/Page.txt Notes/Page
//!
//! # Tablet layout, one page per section
//! zimpdf Notes/Page.txt Notes/Page --mode tablet-split
//!
//! # Show the renderer command without running it
//! zimpdf Notes/Page.txt --dry-run
//! ```

pub mod app;
pub mod config;
pub mod logging;

pub use app::{convert, open_output_dir, run_cli, Conversion, ConvertRequest, Mode, RenderStatus};
pub use config::{Overrides, RunConfig, Settings};
