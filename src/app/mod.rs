//! Application layer.
//!
//! # Structure
//!
//! - `document` / `theme` / `color` - Core data structures
//! - `render` / `export` - Markdown conversion and PDF layout
//! - `state.rs` - Main application coordinator
//! - `buffer` / `error` / `file_filters` / `messages` - Infrastructure

pub mod buffer;
pub mod color;
pub mod document;
pub mod error;
pub mod export;
pub mod file_filters;
pub mod messages;
pub mod render;
pub mod state;
pub mod theme;

// Re-exports for convenient external access
pub use color::Rgb;
pub use document::Document;
pub use error::AppError;
pub use messages::Message;
pub use render::MarkdownRenderer;
pub use state::AppState;
pub use theme::Theme;
