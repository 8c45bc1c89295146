//! # LineInput Component
//!
//! Single-line text entry shown under the screen body while a command asks
//! for free text (an item link, a tag list, a rating).
//!
//! The buffer is internal state; the prompt is a prop. Enter submits, Escape
//! cancels the prompt, Backspace deletes one character.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::Key;

#[derive(Debug, Clone, PartialEq)]
pub enum LineEvent {
    Submit(String),
    Cancel,
}

pub struct LineInput {
    pub prompt: String,
    pub buffer: String,
}

impl LineInput {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            buffer: String::new(),
        }
    }

    /// Rows needed for the prompt plus the line being typed.
    pub fn height(&self) -> u16 {
        let prompt_lines = self.prompt.split('\n').count();
        prompt_lines.max(1) as u16
    }
}

impl EventHandler for LineInput {
    type Event = LineEvent;

    fn handle_event(&mut self, key: &Key) -> Option<LineEvent> {
        match key {
            Key::Char(c) => {
                self.buffer.push(*c);
                None
            }
            Key::Backspace => {
                self.buffer.pop();
                None
            }
            Key::Enter => Some(LineEvent::Submit(std::mem::take(&mut self.buffer))),
            Key::Escape => {
                self.buffer.clear();
                Some(LineEvent::Cancel)
            }
            _ => None,
        }
    }
}

impl Component for LineInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text = format!("{}{}", self.prompt, self.buffer);
        let paragraph = Paragraph::new(Text::raw(text.clone()))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);

        // Cursor after the last typed character
        let last_line = text.rsplit('\n').next().unwrap_or_default();
        let row = area.y + (self.height().saturating_sub(1));
        let col = area.x + (last_line.chars().count() as u16).min(area.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(col, row.min(area.bottom().saturating_sub(1))));
    }
}
