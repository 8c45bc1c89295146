//! Selector screen: edits the active filter and sorter lists and acts on the
//! resulting selection.

use std::io;
use std::sync::OnceLock;

use async_trait::async_trait;
use log::{debug, info};

use crate::core::command::{self, CommandSpec, CommandTable, Lifecycle, Screen};
use crate::core::expr::{self, FILTERS, Filter, SORTERS, Sorter};
use crate::core::item::Item;
use crate::core::state::App;
use crate::screens::{ReviewScreen, split_entries};
use crate::tui::Console;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorCommand {
    Filters,
    Sorters,
    TagSelected,
    ReviewSelected,
    Quit,
}

const COMMANDS: &[CommandSpec<SelectorCommand>] = &[
    CommandSpec::new("filters", SelectorCommand::Filters),
    CommandSpec::new("sorters", SelectorCommand::Sorters),
    CommandSpec::new("tag selected", SelectorCommand::TagSelected),
    CommandSpec::new("review selected", SelectorCommand::ReviewSelected),
    CommandSpec::new("quit", SelectorCommand::Quit),
];

const HELP: &str = "\
Filters and sorters are written as name or name:argument, prefixed with ! to
negate. Enter several at once separated by commas; an empty line clears the
list. Negating a sorter reverses its order.";

#[derive(Debug, Default)]
pub struct SelectorScreen {
    lifecycle: Lifecycle,
    filters: Vec<Filter>,
    sorters: Vec<Sorter>,
    /// Outcome of the last command: an error or a short report.
    status: Option<String>,
}

impl SelectorScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current selection, detached from the store.
    pub fn selected(&self, app: &App) -> Vec<Item> {
        expr::select(app.items.iter(), &self.filters, &self.sorters, &app.annotations)
            .into_iter()
            .cloned()
            .collect()
    }

    fn edit_filters(&mut self, console: &mut dyn Console) -> io::Result<()> {
        let Some(line) = console.read_line("Enter new filters separated with ',': ")? else {
            return Ok(());
        };
        match expr::compile_filters(&split_entries(&line)) {
            Ok(filters) => {
                debug!("Active filters: {:?}", filters);
                self.filters = filters;
                self.status = None;
            }
            Err(e) => self.status = Some(format!("Filter list rejected: {e}")),
        }
        Ok(())
    }

    fn edit_sorters(&mut self, console: &mut dyn Console) -> io::Result<()> {
        let Some(line) = console.read_line("Enter new sorters separated with ',': ")? else {
            return Ok(());
        };
        match expr::compile_sorters(&split_entries(&line)) {
            Ok(sorters) => {
                debug!("Active sorters: {:?}", sorters);
                self.sorters = sorters;
                self.status = None;
            }
            Err(e) => self.status = Some(format!("Sorter list rejected: {e}")),
        }
        Ok(())
    }

    fn tag_selected(&mut self, app: &mut App, console: &mut dyn Console) -> io::Result<()> {
        let Some(line) = console.read_line("Tag to add to every selected item: ")? else {
            return Ok(());
        };
        let tag = line.trim();
        if tag.is_empty() {
            self.status = Some("No tag entered.".to_string());
            return Ok(());
        }

        let ids: Vec<u64> = self.selected(app).iter().map(|item| item.id).collect();
        let mut added = 0;
        for &id in &ids {
            if app.annotations.add_tag(id, tag) {
                added += 1;
            }
        }
        info!("Tagged {}/{} selected items with '{}'", added, ids.len(), tag);
        self.status = Some(format!(
            "Tagged {added} items with '{tag}' ({} already had it).",
            ids.len() - added
        ));
        Ok(())
    }
}

fn source_list<'a>(sources: impl Iterator<Item = &'a str>) -> String {
    let list: Vec<&str> = sources.collect();
    if list.is_empty() {
        "(none)".to_string()
    } else {
        list.join(", ")
    }
}

#[async_trait]
impl Screen for SelectorScreen {
    type Command = SelectorCommand;

    fn commands() -> &'static CommandTable<SelectorCommand> {
        static TABLE: OnceLock<CommandTable<SelectorCommand>> = OnceLock::new();
        TABLE.get_or_init(|| {
            CommandTable::build(COMMANDS).unwrap_or_else(|e| panic!("selector screen: {e}"))
        })
    }

    fn render(&self, app: &App) -> String {
        let mut body = format!(
            "Selector interface\n\n{HELP}\n\nAvailable filters: {}\nAvailable sorters: {}\n\n\
             Current filters: {}\nCurrent sorters: {}\nSelected items: {}",
            expr::registry_summary(FILTERS),
            expr::registry_summary(SORTERS),
            source_list(self.filters.iter().map(Filter::source)),
            source_list(self.sorters.iter().map(Sorter::source)),
            expr::select(app.items.iter(), &self.filters, &[], &app.annotations).len(),
        );
        if let Some(status) = &self.status {
            body.push_str("\n\n");
            body.push_str(status);
        }
        body
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    async fn execute(
        &mut self,
        command: SelectorCommand,
        app: &mut App,
        console: &mut dyn Console,
    ) -> io::Result<()> {
        match command {
            SelectorCommand::Filters => self.edit_filters(console)?,
            SelectorCommand::Sorters => self.edit_sorters(console)?,
            SelectorCommand::TagSelected => self.tag_selected(app, console)?,
            SelectorCommand::ReviewSelected => {
                self.lifecycle.stop();
                let mut review = ReviewScreen::new(self.selected(app));
                command::run(&mut review, app, console).await?;
            }
            SelectorCommand::Quit => self.lifecycle.stop(),
        }
        Ok(())
    }
}
