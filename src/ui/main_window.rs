use fltk::{
    group::{Flex, Tile},
    menu::MenuBar,
    misc::HelpView,
    prelude::*,
    text::{TextBuffer, TextEditor, WrapMode},
    window::Window,
};

pub const MENU_HEIGHT: i32 = 30;

const WINDOW_WIDTH: i32 = 960;
const WINDOW_HEIGHT: i32 = 600;

pub struct MainWidgets {
    pub wind: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    pub editor: TextEditor,
    pub preview: HelpView,
    pub buffer: TextBuffer,
}

/// Build the single editor window: a menu bar over a user-resizable split
/// with the markup editor on the left and the rendered preview on the right.
pub fn build_main_window() -> MainWidgets {
    let mut wind = Window::new(100, 100, WINDOW_WIDTH, WINDOW_HEIGHT, "Untitled - MarkPad");
    wind.set_xclass("MarkPad");

    let mut flex = Flex::new(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT, None);
    flex.set_type(fltk::group::FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, MENU_HEIGHT, "");
    flex.fixed(&menu, MENU_HEIGHT);

    // The tile handles drag-resizing between its two children.
    let pane_height = WINDOW_HEIGHT - MENU_HEIGHT;
    let tile = Tile::new(0, MENU_HEIGHT, WINDOW_WIDTH, pane_height, None);

    let buffer = TextBuffer::default();
    let mut editor = TextEditor::new(0, MENU_HEIGHT, WINDOW_WIDTH / 2, pane_height, "");
    editor.set_buffer(buffer.clone());
    editor.wrap_mode(WrapMode::AtBounds, 0);

    let mut preview = HelpView::new(
        WINDOW_WIDTH / 2,
        MENU_HEIGHT,
        WINDOW_WIDTH / 2,
        pane_height,
        "",
    );
    preview.set_value("");

    tile.end();
    flex.end();
    wind.resizable(&flex);

    MainWidgets {
        wind,
        flex,
        menu,
        editor,
        preview,
        buffer,
    }
}
