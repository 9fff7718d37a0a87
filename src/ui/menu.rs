use fltk::{
    app::Sender,
    enums::Shortcut,
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::messages::Message;

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>) {
    let s = sender;

    // File
    menu.add("File/Open...", Shortcut::Ctrl | 'o', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileOpen) });
    menu.add("File/Save", Shortcut::Ctrl | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSave) });
    menu.add("File/Save As...", Shortcut::Ctrl | Shortcut::Shift | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSaveAs) });
    menu.add("File/Export as PDF...", Shortcut::None, MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::FileExportPdf) });
    menu.add("File/Quit", Shortcut::Ctrl | 'q', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileQuit) });

    // Edit
    menu.add("Edit/Set Text Color...", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetTextColor) });
    menu.add("Edit/Set Background Color...", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetBackgroundColor) });
    menu.add("Edit/Set Preview Color...", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetPreviewColor) });
}
