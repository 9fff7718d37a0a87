/// All messages that can be sent through the FLTK channel.
/// Each widget callback sends one of these; the dispatch loop in main handles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    // File
    FileOpen,
    FileSave,
    FileSaveAs,
    FileExportPdf,
    FileQuit,

    // Edit
    SetTextColor,
    SetBackgroundColor,
    SetPreviewColor,

    // Editor buffer changed; the preview must be re-rendered
    BufferModified,
}
