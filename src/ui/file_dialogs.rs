use fltk::dialog::{FileDialogType, NativeFileChooser};

fn run_chooser(
    dialog_type: FileDialogType,
    title: &str,
    filter: &str,
    directory: Option<&str>,
) -> Option<String> {
    let mut nfc = NativeFileChooser::new(dialog_type);
    nfc.set_title(title);
    nfc.set_filter(filter);
    if let Some(dir) = directory {
        let _ = nfc.set_directory(&dir);
    }
    nfc.show(); // returns (), blocks until close
    let filename = nfc.filename();
    let s = filename.to_string_lossy();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Native open dialog. `None` means the user cancelled.
pub fn native_open_dialog(title: &str, filter: &str, directory: Option<&str>) -> Option<String> {
    run_chooser(FileDialogType::BrowseFile, title, filter, directory)
}

/// Native save dialog. `None` means the user cancelled.
pub fn native_save_dialog(title: &str, filter: &str, directory: Option<&str>) -> Option<String> {
    run_chooser(FileDialogType::BrowseSaveFile, title, filter, directory)
}
