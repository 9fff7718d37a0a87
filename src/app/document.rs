use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use fltk::text::TextBuffer;

use super::error::AppError;

/// The single open document: the editor's text buffer plus its bound
/// on-disk location. `file_path` stays `None` until the first successful
/// open or save, and is never cleared afterwards.
pub struct Document {
    pub buffer: TextBuffer,
    pub file_path: Option<PathBuf>,
    pub display_name: String,
    pub has_unsaved_changes: Rc<Cell<bool>>,
}

impl Document {
    pub fn new(buffer: TextBuffer) -> Self {
        Self {
            buffer,
            file_path: None,
            display_name: "Untitled".to_string(),
            has_unsaved_changes: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.file_path.is_some()
    }

    /// Bind the document to an on-disk location.
    pub fn bind(&mut self, path: PathBuf) {
        self.display_name = display_name_for(&path);
        self.file_path = Some(path);
    }

    pub fn is_dirty(&self) -> bool {
        self.has_unsaved_changes.get()
    }

    pub fn mark_clean(&self) {
        self.has_unsaved_changes.set(false);
    }
}

/// File name component used in the window title.
pub fn display_name_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Read a whole markup document as UTF-8 text.
pub fn read_document(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Overwrite a markup document with the given text.
pub fn write_document(path: &Path, text: &str) -> Result<(), AppError> {
    fs::write(path, text).map_err(|source| AppError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_for() {
        assert_eq!(display_name_for(Path::new("/tmp/notes.md")), "notes.md");
        assert_eq!(display_name_for(Path::new("notes.md")), "notes.md");
        assert_eq!(display_name_for(Path::new("/")), "Untitled");
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        let text = "# Title\n\nSome *content* with unicode: ✓\n";

        write_document(&path, text).unwrap();
        assert_eq!(read_document(&path).unwrap(), text);
    }

    #[test]
    fn test_read_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.md");

        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
        assert!(err.to_string().contains("missing.md"));
    }

    #[test]
    fn test_write_to_bad_path_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist
        let path = dir.path().join("nope").join("doc.md");

        let err = write_document(&path, "text").unwrap_err();
        assert!(matches!(err, AppError::Write { .. }));
    }
}
