use fltk::{app, enums::Event, prelude::*};

use markpad::app::messages::Message;
use markpad::app::state::AppState;
use markpad::app::theme::Theme;
use markpad::ui::main_window::build_main_window;
use markpad::ui::menu::build_menu;

fn main() {
    env_logger::init();
    log::info!("Starting MarkPad {}", env!("CARGO_PKG_VERSION"));

    let app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let mut widgets = build_main_window();
    build_menu(&mut widgets.menu, &sender);

    let mut state = AppState::new(widgets, sender, Theme::load());
    state.apply_theme();
    state.update_preview();

    // The window close button behaves like File/Quit
    state.window.set_callback(move |_| {
        if app::event() == Event::Close {
            sender.send(Message::FileQuit);
        }
    });
    state.window.show();

    while app.wait() {
        if let Some(msg) = receiver.recv() {
            match msg {
                Message::BufferModified => state.update_preview(),
                Message::FileOpen => state.file_open(),
                Message::FileSave => state.file_save(),
                Message::FileSaveAs => state.file_save_as(),
                Message::FileExportPdf => state.export_pdf(),
                Message::SetTextColor => state.set_text_color(),
                Message::SetBackgroundColor => state.set_background_color(),
                Message::SetPreviewColor => state.set_preview_color(),
                Message::FileQuit => {
                    if state.file_quit() {
                        app.quit();
                    }
                }
            }
        }
    }
}
