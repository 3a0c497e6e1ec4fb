//! Link and image path resolution
//!
//! A [`Linker`] maps raw link and image targets from the wiki source to the
//! form the Markdown output should carry. [`ImagePaths`] then rewrites the
//! resolved image path against the page's attachment directory so the
//! external typesetter, which runs in a different working directory, can find
//! the file.

use std::borrow::Cow;
use std::path::Path;

/// Resolves link and image targets
pub trait Linker {
    /// Resolve the `src` of an image
    fn image(&self, src: &str) -> String;

    /// Resolve the target of a link
    fn link(&self, href: &str) -> String {
        href.to_string()
    }
}

/// Linker that returns every target unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct StubLinker;

impl Linker for StubLinker {
    fn image(&self, src: &str) -> String {
        src.to_string()
    }
}

/// Rewrites relative and home-relative image paths to absolute ones
///
/// - a leading `~` becomes the home directory
/// - every `../` becomes the attachment directory's parent followed by `/`
/// - every `./` becomes the attachment directory followed by `/`
///
/// The `../` and `./` substitutions happen in a single left-to-right pass, so
/// text inserted for one marker is never rewritten again.
#[derive(Debug, Clone, Default)]
pub struct ImagePaths {
    attachment_dir: Option<String>,
    home_dir: Option<String>,
}

impl ImagePaths {
    /// Rewriter for pages whose attachments live in `attachment_dir`
    ///
    /// A relative directory is resolved against the current directory so
    /// rewritten paths are always absolute.
    pub fn new(attachment_dir: impl AsRef<Path>) -> Self {
        let dir = attachment_dir.as_ref();
        let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        let dir = dir.to_string_lossy();
        let trimmed = dir.trim_end_matches('/');
        Self {
            attachment_dir: Some(if trimmed.is_empty() { "/" } else { trimmed }.to_string()),
            home_dir: None,
        }
    }

    /// Rewriter without an attachment directory; only `~` is expanded
    pub fn without_attachments() -> Self {
        Self::default()
    }

    /// Use `home` instead of the current user's home directory
    pub fn with_home_dir(mut self, home: impl AsRef<Path>) -> Self {
        self.home_dir = Some(home.as_ref().to_string_lossy().into_owned());
        self
    }

    /// The attachment directory, if any
    pub fn attachment_dir(&self) -> Option<&str> {
        self.attachment_dir.as_deref()
    }

    /// Rewrite a resolved image path
    pub fn rewrite(&self, src: &str) -> String {
        let expanded: Cow<'_, str> = match &self.home_dir {
            Some(home) => shellexpand::tilde_with_context(src, || Some(home.as_str())),
            None => shellexpand::tilde(src),
        };

        let Some(attachment_dir) = &self.attachment_dir else {
            return expanded.into_owned();
        };
        let parent = parent_of(attachment_dir);

        let mut out = String::with_capacity(expanded.len() + attachment_dir.len());
        let mut rest: &str = &expanded;
        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix("../") {
                out.push_str(parent);
                out.push('/');
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("./") {
                out.push_str(attachment_dir);
                out.push('/');
                rest = tail;
            } else {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    out.push(c);
                }
                rest = chars.as_str();
            }
        }
        out
    }
}

/// Everything before the last `/` of a trimmed directory path
fn parent_of(dir: &str) -> &str {
    match dir.rsplit_once('/') {
        Some((parent, _)) => parent,
        None => ".",
    }
}
