//! # CommandBar Component
//!
//! Top line of every screen listing the registered shortcuts, e.g.
//! `(q)uit (u)pdate jobs (s)elect`.
//!
//! Stateless: it receives the pre-formatted summary as a prop and only decides
//! how to style it. With colors on, every `(k)` shortcut marker is highlighted.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct CommandBar {
    /// Summary line from `CommandTable::summary`
    pub summary: String,
    pub colors: bool,
}

impl CommandBar {
    pub fn new(summary: String, colors: bool) -> Self {
        Self { summary, colors }
    }

    /// Split the summary into plain text and `(k)` marker spans.
    fn spans(&self) -> Vec<Span<'static>> {
        if !self.colors {
            return vec![Span::raw(self.summary.clone())];
        }

        let marker = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let chars: Vec<char> = self.summary.chars().collect();
        let mut spans = Vec::new();
        let mut plain = String::new();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] == '(' && chars.get(i + 2) == Some(&')') {
                if !plain.is_empty() {
                    spans.push(Span::raw(std::mem::take(&mut plain)));
                }
                spans.push(Span::styled(chars[i..i + 3].iter().collect::<String>(), marker));
                i += 3;
            } else {
                plain.push(chars[i]);
                i += 1;
            }
        }
        if !plain.is_empty() {
            spans.push(Span::raw(plain));
        }
        spans
    }
}

impl Component for CommandBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Line::from(self.spans()), area);
    }
}
