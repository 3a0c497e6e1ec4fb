//! Intermediate Markdown file
//!
//! Each conversion writes its Markdown to a fresh uniquely named file, so two
//! conversions started back to back never share or clobber an input. The file
//! is deleted when the value is dropped.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;

/// A fully written Markdown file for one render job
#[derive(Debug)]
pub struct MarkdownFile {
    file: NamedTempFile,
}

impl MarkdownFile {
    /// Write `lines` to a new file in `dir`
    ///
    /// The lines are written in full before the path is handed out.
    pub fn create(dir: &Path, lines: &[String]) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("zimpdf-")
            .suffix(".md")
            .tempfile_in(dir)?;
        for line in lines {
            file.write_all(line.as_bytes())?;
        }
        file.flush()?;
        debug!(path = %file.path().display(), lines = lines.len(), "markdown written");
        Ok(Self { file })
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Atomically copy the Markdown to `dest`, replacing any existing file
    pub fn persist_copy(&self, dest: &Path) -> Result<()> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&fs::read(self.path())?)?;
        staged.flush()?;
        staged.persist(dest).map_err(|err| err.error)?;
        debug!(path = %dest.display(), "markdown kept");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lines() -> Vec<String> {
        vec!["---\n".to_string(), "title: T\n".to_string(), "---\n".to_string()]
    }

    #[test]
    fn test_create_writes_all_lines() {
        let dir = TempDir::new().unwrap();
        let md = MarkdownFile::create(dir.path(), &lines()).unwrap();
        assert_eq!(fs::read_to_string(md.path()).unwrap(), "---\ntitle: T\n---\n");
        assert_eq!(md.path().extension().and_then(|e| e.to_str()), Some("md"));
    }

    #[test]
    fn test_paths_are_unique() {
        let dir = TempDir::new().unwrap();
        let a = MarkdownFile::create(dir.path(), &lines()).unwrap();
        let b = MarkdownFile::create(dir.path(), &lines()).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let md = MarkdownFile::create(dir.path(), &lines()).unwrap();
        let path = md.path().to_path_buf();
        drop(md);
        assert!(!path.exists());
    }

    #[test]
    fn test_persist_copy_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Doc.md");
        fs::write(&dest, "old").unwrap();
        let md = MarkdownFile::create(dir.path(), &lines()).unwrap();
        md.persist_copy(&dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "---\ntitle: T\n---\n");
        assert!(md.path().exists());
    }
}
