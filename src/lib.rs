//! # MarkPad
//!
//! A minimal desktop Markdown editor: plain-text editing on the left, a
//! live rendered preview on the right, and export to paginated PDF.
//!
//! ## Modules
//!
//! - [`app`]: Document, theme, rendering, PDF export, and the session state
//! - [`ui`]: FLTK widgets - main window, menu, dialogs, widget styling

pub mod app;
pub mod ui;
