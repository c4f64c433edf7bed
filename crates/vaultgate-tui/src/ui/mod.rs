//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, vault content view and login dialog
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling

pub mod input;
pub mod render;
pub mod styles;
