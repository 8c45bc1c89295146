//! Review screen: pages through a fixed list of items, one at a time, and
//! lets the user tag and rate the current one.

use std::io;
use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::DateTime;
use log::debug;

use crate::api::html_to_text;
use crate::core::command::{CommandSpec, CommandTable, Lifecycle, Screen};
use crate::core::item::Item;
use crate::core::state::App;
use crate::screens::split_entries;
use crate::tui::Console;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCommand {
    Next,
    Previous,
    AddTags,
    Rate,
    Quit,
}

const COMMANDS: &[CommandSpec<ReviewCommand>] = &[
    CommandSpec::new("next", ReviewCommand::Next),
    CommandSpec::new("previous", ReviewCommand::Previous),
    CommandSpec::with_shortcut("add tags", 't', ReviewCommand::AddTags),
    CommandSpec::new("rate", ReviewCommand::Rate),
    CommandSpec::new("quit", ReviewCommand::Quit),
];

const SEPARATOR: &str = "────────────────────────────────────────";

#[derive(Debug)]
pub struct ReviewScreen {
    lifecycle: Lifecycle,
    items: Vec<Item>,
    index: usize,
}

impl ReviewScreen {
    /// An empty list yields a screen that is already stopped.
    pub fn new(items: Vec<Item>) -> Self {
        let lifecycle = if items.is_empty() {
            Lifecycle::stopped()
        } else {
            Lifecycle::default()
        };
        Self {
            lifecycle,
            items,
            index: 0,
        }
    }

    fn current(&self) -> Option<&Item> {
        self.items.get(self.index)
    }
}

fn format_time(time: i64) -> String {
    DateTime::from_timestamp(time, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| format!("@{time}"))
}

#[async_trait]
impl Screen for ReviewScreen {
    type Command = ReviewCommand;

    fn commands() -> &'static CommandTable<ReviewCommand> {
        static TABLE: OnceLock<CommandTable<ReviewCommand>> = OnceLock::new();
        TABLE.get_or_init(|| {
            CommandTable::build(COMMANDS).unwrap_or_else(|e| panic!("review screen: {e}"))
        })
    }

    fn render(&self, app: &App) -> String {
        let Some(item) = self.current() else {
            return "Nothing to review.".to_string();
        };

        let rating = app
            .annotations
            .rating(item.id)
            .map_or_else(|| "???".to_string(), |r| r.to_string());
        let tags = app.annotations.tags(item.id);
        let tags = if tags.is_empty() {
            "(none)".to_string()
        } else {
            tags.join(", ")
        };

        let mut body = format!(
            "Item {}/{}  Rating: {}  Tags: {}\nBy {} on {} (id {})\n{SEPARATOR}\n",
            self.index + 1,
            self.items.len(),
            rating,
            tags,
            item.by.as_deref().unwrap_or("[deleted]"),
            format_time(item.time),
            item.id,
        );
        if let Some(title) = &item.title {
            body.push_str(title);
            body.push_str("\n\n");
        }
        body.push_str(&html_to_text(item.text.as_deref()));
        body
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    async fn execute(
        &mut self,
        command: ReviewCommand,
        app: &mut App,
        console: &mut dyn Console,
    ) -> io::Result<()> {
        match command {
            ReviewCommand::Next => {
                self.index = (self.index + 1).min(self.items.len().saturating_sub(1));
            }
            ReviewCommand::Previous => self.index = self.index.saturating_sub(1),
            ReviewCommand::AddTags => {
                let Some(id) = self.current().map(|item| item.id) else {
                    return Ok(());
                };
                if let Some(line) = console.read_line("Enter new tags separated with ',': ")? {
                    for tag in split_entries(&line) {
                        app.annotations.add_tag(id, &tag);
                    }
                }
            }
            ReviewCommand::Rate => {
                let Some(id) = self.current().map(|item| item.id) else {
                    return Ok(());
                };
                if let Some(line) = console.read_line("Enter new rating: ")? {
                    match line.trim().parse::<i64>() {
                        Ok(rating) => app.annotations.set_rating(id, rating),
                        Err(e) => debug!("Ignoring rating '{}': {}", line.trim(), e),
                    }
                }
            }
            ReviewCommand::Quit => self.lifecycle.stop(),
        }
        Ok(())
    }
}
