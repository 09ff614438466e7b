//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, the active panel's table and overlays
//! - `input`: keyboard event handling
//! - `styles`: colours and text styling

pub mod input;
pub mod render;
pub mod styles;
