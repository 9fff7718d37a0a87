use fltk::{enums::Color, misc::HelpView, prelude::*, text::TextEditor};

use crate::app::color::Rgb;
use crate::app::theme::Theme;

fn to_fltk(color: Rgb) -> Color {
    Color::from_rgb(color.r, color.g, color.b)
}

/// Restyle the editor pane after a text or background color change.
pub fn apply_editor_theme(editor: &mut TextEditor, theme: &Theme) {
    editor.set_color(to_fltk(theme.background_color));
    editor.set_text_color(to_fltk(theme.text_color));
    editor.set_cursor_color(to_fltk(theme.text_color));
    editor.redraw();
}

/// Restyle only the preview pane.
pub fn apply_preview_theme(preview: &mut HelpView, theme: &Theme) {
    preview.set_color(to_fltk(theme.preview_color));
    preview.redraw();
}
