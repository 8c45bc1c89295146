//! # TUI Components
//!
//! - `CommandBar`: stateless shortcut summary on the first line
//! - `LineInput`: stateful free-text prompt under the body

mod command_bar;
pub mod line_input;

pub use command_bar::CommandBar;
pub use line_input::{LineEvent, LineInput};
