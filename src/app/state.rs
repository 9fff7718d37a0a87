use std::path::{Path, PathBuf};

use fltk::{
    app::Sender,
    dialog,
    dialog::ColorMode,
    menu::MenuBar,
    misc::HelpView,
    prelude::*,
    text::TextEditor,
    window::Window,
};

use super::buffer::buffer_text;
use super::color::Rgb;
use super::document::{self, Document};
use super::export::export_markdown_pdf;
use super::file_filters::{
    ensure_markdown_extension, ensure_pdf_extension, MARKDOWN_FILTER, PDF_FILTER,
};
use super::messages::Message;
use super::render::{wrap_html_for_preview, MarkdownRenderer};
use super::theme::Theme;
use crate::ui::file_dialogs::{native_open_dialog, native_save_dialog};
use crate::ui::main_window::MainWidgets;
use crate::ui::theme::{apply_editor_theme, apply_preview_theme};

/// The editor session: one document, its live preview, and the theme.
/// Every operation runs to completion on the UI thread; the dispatch loop
/// in main calls exactly one method per received message.
pub struct AppState {
    pub document: Document,
    pub editor: TextEditor,
    pub preview: HelpView,
    pub window: Window,
    pub menu: MenuBar,
    pub theme: Theme,
    pub renderer: MarkdownRenderer,
    pub sender: Sender<Message>,
    /// Last directory used in a file open/save dialog.
    pub last_open_directory: Option<String>,
}

impl AppState {
    pub fn new(widgets: MainWidgets, sender: Sender<Message>, theme: Theme) -> Self {
        let MainWidgets {
            wind,
            menu,
            editor,
            preview,
            buffer,
            ..
        } = widgets;

        let document = Document::new(buffer);

        // Keystrokes mark the document dirty and trigger a preview re-render.
        {
            let dirty = document.has_unsaved_changes.clone();
            let mut buf = document.buffer.clone();
            buf.add_modify_callback(move |_pos, inserted, deleted, _restyled, _deleted_text| {
                if inserted > 0 || deleted > 0 {
                    dirty.set(true);
                    sender.send(Message::BufferModified);
                }
            });
        }

        Self {
            document,
            editor,
            preview,
            window: wind,
            menu,
            theme,
            renderer: MarkdownRenderer::new(),
            sender,
            last_open_directory: None,
        }
    }

    /// Re-render the preview pane from the current buffer text.
    pub fn update_preview(&mut self) {
        let text = buffer_text(&self.document.buffer);
        let html = self.renderer.to_html(&text);
        self.preview.set_value(&wrap_html_for_preview(&html));
        self.update_window_title();
    }

    pub fn update_window_title(&mut self) {
        let prefix = if self.document.is_dirty() { "*" } else { "" };
        self.window
            .set_label(&format!("{}{} - MarkPad", prefix, self.document.display_name));
    }

    fn remember_directory(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.last_open_directory = Some(parent.to_string_lossy().to_string());
        }
    }

    // --- File operations ---

    pub fn file_open(&mut self) {
        let Some(path) = native_open_dialog(
            "Open Markdown File",
            MARKDOWN_FILTER,
            self.last_open_directory.as_deref(),
        ) else {
            return;
        };

        let path = PathBuf::from(path);
        match document::read_document(&path) {
            Ok(content) => {
                self.remember_directory(&path);
                self.document.buffer.set_text(&content);
                self.document.mark_clean();
                self.document.bind(path);
                log::info!("Opened {:?}", self.document.file_path);
                self.update_preview();
            }
            Err(e) => {
                log::error!("{}", e);
                dialog::alert_default(&format!("Error opening file: {}", e));
            }
        }
    }

    pub fn file_save(&mut self) {
        let Some(path) = self.document.file_path.clone() else {
            self.file_save_as();
            return;
        };

        let text = buffer_text(&self.document.buffer);
        match document::write_document(&path, &text) {
            Ok(()) => {
                self.document.mark_clean();
                self.update_window_title();
                log::info!("Saved {:?}", path);
            }
            Err(e) => {
                log::error!("{}", e);
                dialog::alert_default(&format!("Error saving file: {}", e));
            }
        }
    }

    pub fn file_save_as(&mut self) {
        let Some(path) = native_save_dialog(
            "Save Markdown File",
            MARKDOWN_FILTER,
            self.last_open_directory.as_deref(),
        ) else {
            return;
        };

        let path = PathBuf::from(ensure_markdown_extension(path));
        let text = buffer_text(&self.document.buffer);
        match document::write_document(&path, &text) {
            Ok(()) => {
                self.remember_directory(&path);
                self.document.mark_clean();
                self.document.bind(path);
                self.update_window_title();
                log::info!("Saved {:?}", self.document.file_path);
            }
            Err(e) => {
                log::error!("{}", e);
                dialog::alert_default(&format!("Error saving file: {}", e));
            }
        }
    }

    pub fn export_pdf(&mut self) {
        let Some(path) = native_save_dialog(
            "Export as PDF",
            PDF_FILTER,
            self.last_open_directory.as_deref(),
        ) else {
            return;
        };

        let path = PathBuf::from(ensure_pdf_extension(path));
        let text = buffer_text(&self.document.buffer);
        match export_markdown_pdf(&text, &path) {
            Ok(()) => log::info!("Exported PDF to {:?}", path),
            Err(e) => {
                log::error!("{}", e);
                dialog::alert_default(&format!("Error exporting PDF: {}", e));
            }
        }
    }

    /// Handle quit request. Returns `true` if the app should exit.
    pub fn file_quit(&mut self) -> bool {
        if !self.document.is_dirty() {
            return true;
        }

        let choice = dialog::choice2_default(
            "You have unsaved changes.",
            "Save",
            "Quit Without Saving",
            "Cancel",
        );
        match choice {
            Some(0) => {
                self.file_save();
                !self.document.is_dirty()
            }
            Some(1) => true,
            _ => false,
        }
    }

    // --- Colors ---

    fn pick_color(&self, title: &str, current: Rgb) -> Rgb {
        // The chooser returns the seed color unchanged when cancelled, so a
        // cancelled dialog never mutates theme state.
        let (r, g, b) = dialog::color_chooser_with_default(
            title,
            ColorMode::Byte,
            (current.r, current.g, current.b),
        );
        Rgb::new(r, g, b)
    }

    pub fn set_text_color(&mut self) {
        let chosen = self.pick_color("Select Text Color", self.theme.text_color);
        if chosen != self.theme.text_color {
            self.theme.text_color = chosen;
            apply_editor_theme(&mut self.editor, &self.theme);
            self.save_theme();
        }
    }

    pub fn set_background_color(&mut self) {
        let chosen = self.pick_color("Select Background Color", self.theme.background_color);
        if chosen != self.theme.background_color {
            self.theme.background_color = chosen;
            apply_editor_theme(&mut self.editor, &self.theme);
            self.save_theme();
        }
    }

    pub fn set_preview_color(&mut self) {
        let chosen = self.pick_color("Select Preview Color", self.theme.preview_color);
        if chosen != self.theme.preview_color {
            self.theme.preview_color = chosen;
            apply_preview_theme(&mut self.preview, &self.theme);
            self.save_theme();
        }
    }

    pub fn apply_theme(&mut self) {
        apply_editor_theme(&mut self.editor, &self.theme);
        apply_preview_theme(&mut self.preview, &self.theme);
    }

    fn save_theme(&self) {
        if let Err(e) = self.theme.save() {
            log::warn!("{}", e);
            dialog::alert_default(&format!("Failed to save theme: {}", e));
        }
    }
}
