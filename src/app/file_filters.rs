/// Filter pattern for Markdown documents in open/save dialogs.
///
/// FLTK accepts these filter formats:
/// - Simple wildcard: "*.md"
/// - Multiple wildcards: "*.{md,markdown}"
/// - With description (optional): "Markdown Files\t*.md"
pub const MARKDOWN_FILTER: &str = "Markdown Files\t*.{md,markdown,mdown}";

/// Filter pattern for PDF export dialogs.
pub const PDF_FILTER: &str = "PDF Files\t*.pdf";

const MARKDOWN_EXTENSIONS: &[&str] = &[".md", ".markdown", ".mdown"];

/// Check if a file path points to a markdown file.
pub fn is_markdown_file(path: &str) -> bool {
    let lower = path.to_lowercase();
    MARKDOWN_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Append `.md` to a save path that carries no markdown extension.
/// Native save dialogs return whatever the user typed.
pub fn ensure_markdown_extension(path: String) -> String {
    if is_markdown_file(&path) {
        path
    } else {
        format!("{}.md", path)
    }
}

/// Append `.pdf` to an export path that carries no pdf extension.
pub fn ensure_pdf_extension(path: String) -> String {
    if path.to_lowercase().ends_with(".pdf") {
        path
    } else {
        format!("{}.pdf", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markdown_file() {
        assert!(is_markdown_file("notes.md"));
        assert!(is_markdown_file("NOTES.MD"));
        assert!(is_markdown_file("doc.markdown"));
        assert!(is_markdown_file("doc.mdown"));
        assert!(!is_markdown_file("doc.txt"));
        assert!(!is_markdown_file("md"));
        assert!(!is_markdown_file(""));
    }

    #[test]
    fn test_ensure_markdown_extension_appends() {
        assert_eq!(ensure_markdown_extension("notes".to_string()), "notes.md");
        assert_eq!(
            ensure_markdown_extension("/tmp/doc.txt".to_string()),
            "/tmp/doc.txt.md"
        );
    }

    #[test]
    fn test_ensure_markdown_extension_keeps_existing() {
        assert_eq!(ensure_markdown_extension("notes.md".to_string()), "notes.md");
        assert_eq!(
            ensure_markdown_extension("a.markdown".to_string()),
            "a.markdown"
        );
    }

    #[test]
    fn test_ensure_pdf_extension() {
        assert_eq!(ensure_pdf_extension("out".to_string()), "out.pdf");
        assert_eq!(ensure_pdf_extension("out.pdf".to_string()), "out.pdf");
        assert_eq!(ensure_pdf_extension("OUT.PDF".to_string()), "OUT.PDF");
    }
}
