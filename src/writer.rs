use crate::{
    error::{Error, Result},
    page::PageKind,
};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// File name of the stylesheet asset.
pub const STYLESHEET_FILE: &str = "custom.css";

/// Directory layout of the generated site.
///
/// ```text
/// <output>/pages/<index file>
/// <output>/pages/categories/<slug>.md
/// <output>/pages/platforms/<slug>.md
/// <output>/assets/custom.css
/// ```
#[derive(Debug, Clone)]
pub(crate) struct Writer {
    output_dir: PathBuf,
}

impl Writer {
    pub(crate) fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Root of all markdown pages.
    pub(crate) fn pages_dir(&self) -> PathBuf {
        self.output_dir.join("pages")
    }

    /// Directory of static assets.
    pub(crate) fn assets_dir(&self) -> PathBuf {
        self.output_dir.join("assets")
    }

    /// Creates every output directory. Existing directories are reused.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub(crate) fn ensure_dirs(&self) -> Result<()> {
        let pages = self.pages_dir();
        let dirs = [
            pages.join(PageKind::Category.subdir()),
            pages.join(PageKind::Platform.subdir()),
            self.assets_dir(),
        ];
        for dir in &dirs {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        debug!("Output directories ready under {}", self.output_dir.display());
        Ok(())
    }

    /// Writes a page given its path relative to the pages root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub(crate) fn write_page(&self, relative: &Path, content: &str) -> Result<PathBuf> {
        let path = self.pages_dir().join(relative);
        write_file_atomic(&path, content)?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Writes the stylesheet asset, replacing any previous copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub(crate) fn write_stylesheet(&self, css: &str) -> Result<PathBuf> {
        let path = self.assets_dir().join(STYLESHEET_FILE);
        write_file_atomic(&path, css)?;
        info!("Wrote stylesheet {}", path.display());
        Ok(path)
    }
}

/// Writes a file atomically.
///
/// # Process
///
/// 1. Writes content to a temporary sibling file
/// 2. Syncs the temporary file to disk
/// 3. Renames the temporary file over the target path
///
/// An interrupted run never leaves a truncated page behind.
fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = temp_sibling(path);
    let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| Error::io(&temp_path, e))?;

    // Ensure data is flushed to disk
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    drop(temp_file);

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_ensure_dirs_is_idempotent() {
        let temp = assert_fs::TempDir::new().unwrap();
        let writer = Writer::new(temp.path());

        writer.ensure_dirs().unwrap();
        writer.ensure_dirs().unwrap();

        assert!(temp.child("pages/categories").path().is_dir());
        assert!(temp.child("pages/platforms").path().is_dir());
        assert!(temp.child("assets").path().is_dir());
    }

    #[test]
    fn test_write_page_overwrites() {
        let temp = assert_fs::TempDir::new().unwrap();
        let writer = Writer::new(temp.path());
        writer.ensure_dirs().unwrap();

        let page = temp.child("pages/categories/wikis.md");
        page.write_str("old content").unwrap();

        let written = writer
            .write_page(Path::new("categories/wikis.md"), "# Wikis\n")
            .unwrap();

        assert_eq!(written, page.path());
        assert_eq!(fs::read_to_string(page.path()).unwrap(), "# Wikis\n");
        assert!(!temp.child("pages/categories/wikis.md.tmp").exists());
    }

    #[test]
    fn test_write_stylesheet() {
        let temp = assert_fs::TempDir::new().unwrap();
        let writer = Writer::new(temp.path());
        writer.ensure_dirs().unwrap();

        let path = writer.write_stylesheet(".tag {}\n").unwrap();
        assert_eq!(path, temp.child("assets/custom.css").path());
        assert_eq!(fs::read_to_string(path).unwrap(), ".tag {}\n");
    }

    #[test]
    fn test_write_without_dirs_fails() {
        let temp = assert_fs::TempDir::new().unwrap();
        let writer = Writer::new(temp.path().join("missing"));
        let err = writer
            .write_page(Path::new("index.md"), "content")
            .unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_temp_sibling_keeps_extension() {
        assert_eq!(
            temp_sibling(Path::new("/out/pages/index.md")),
            PathBuf::from("/out/pages/index.md.tmp")
        );
    }
}
