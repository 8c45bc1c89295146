//! # TUI Adapter
//!
//! The ratatui/crossterm layer. Screens never talk to the terminal directly;
//! they go through the [`Console`] trait:
//!
//! - `draw` clears and repaints the command bar and the screen body
//! - `read_key` blocks for exactly one keypress
//! - `read_line` shows a prompt under the body and edits a line until Enter
//!
//! The terminal stays in raw mode for the whole session, so Ctrl+C arrives as
//! a key. Both read methods turn it into an `io::ErrorKind::Interrupted`
//! error, which unwinds every screen loop back to `main` where the save file
//! is still written.

mod component;
pub mod components;
pub mod event;
mod ui;

use std::io;

use log::info;
use ratatui::DefaultTerminal;

use crate::tui::component::EventHandler;
use crate::tui::components::{CommandBar, LineEvent, LineInput};
use crate::tui::event::Key;

pub trait Console: Send {
    /// Clear the screen and draw `header` (the command bar) above `body`.
    fn draw(&mut self, header: &str, body: &str) -> io::Result<()>;

    /// Block until one character is typed. Enter reads as `'\n'`.
    fn read_key(&mut self) -> io::Result<char>;

    /// Prompt under the last drawn body and return the entered line, or
    /// `None` if the user pressed Escape.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

pub fn interrupted() -> io::Error {
    io::Error::new(io::ErrorKind::Interrupted, "interrupted by user")
}

/// `Console` backed by the real terminal (alternate screen, raw mode).
pub struct TerminalConsole {
    terminal: DefaultTerminal,
    command_bar: CommandBar,
    body: String,
}

impl TerminalConsole {
    pub fn new(colors: bool) -> io::Result<Self> {
        let terminal = ratatui::try_init()?;
        info!("Terminal initialized (colors: {})", colors);
        Ok(Self {
            terminal,
            command_bar: CommandBar::new(String::new(), colors),
            body: String::new(),
        })
    }

    fn repaint(&mut self, input: Option<&mut LineInput>) -> io::Result<()> {
        let Self {
            terminal,
            command_bar,
            body,
        } = self;
        terminal.draw(|f| ui::draw_screen(f, command_bar, body, input))?;
        Ok(())
    }
}

impl Drop for TerminalConsole {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

impl Console for TerminalConsole {
    fn draw(&mut self, header: &str, body: &str) -> io::Result<()> {
        self.command_bar.summary = header.to_string();
        self.body = body.to_string();
        self.terminal.clear()?;
        self.repaint(None)
    }

    fn read_key(&mut self) -> io::Result<char> {
        loop {
            match event::read_key()? {
                Key::Char(c) => return Ok(c),
                Key::Enter => return Ok('\n'),
                Key::Interrupt => return Err(interrupted()),
                Key::Resize => self.repaint(None)?,
                Key::Backspace | Key::Escape | Key::Other => {}
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut input = LineInput::new(prompt);
        loop {
            self.repaint(Some(&mut input))?;
            let key = event::read_key()?;
            if key == Key::Interrupt {
                return Err(interrupted());
            }
            match input.handle_event(&key) {
                Some(LineEvent::Submit(line)) => return Ok(Some(line)),
                Some(LineEvent::Cancel) => return Ok(None),
                None => {}
            }
        }
    }
}
