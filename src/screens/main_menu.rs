//! Main screen: bulk-fetches a hiring thread and opens the Selector.

use std::io;
use std::sync::OnceLock;

use async_trait::async_trait;
use log::{info, warn};

use crate::core::command::{self, CommandSpec, CommandTable, Lifecycle, Screen};
use crate::core::state::App;
use crate::screens::SelectorScreen;
use crate::tui::Console;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCommand {
    Quit,
    UpdateJobs,
    Select,
    Stats,
}

const COMMANDS: &[CommandSpec<MainCommand>] = &[
    CommandSpec::new("quit", MainCommand::Quit),
    CommandSpec::new("update jobs", MainCommand::UpdateJobs),
    CommandSpec::new("select", MainCommand::Select),
    CommandSpec::new("stats", MainCommand::Stats),
];

#[derive(Debug, Default)]
pub struct MainScreen {
    lifecycle: Lifecycle,
    display: String,
}

impl MainScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn body(display: &str) -> String {
        format!("Main interface\n\n{display}")
    }

    fn show(&mut self, console: &mut dyn Console, text: impl Into<String>) -> io::Result<()> {
        self.display = text.into();
        console.draw(&Self::commands().summary(), &Self::body(&self.display))
    }

    async fn update_jobs(&mut self, app: &mut App, console: &mut dyn Console) -> io::Result<()> {
        self.show(console, "Please enter a WhoIsHiring link or item id.")?;
        let Some(input) = console.read_line("Link or id: ")? else {
            self.display.clear();
            return Ok(());
        };
        let Some(id) = parse_item_ref(&input) else {
            self.display = format!("Bad link or id: '{}'", input.trim());
            return Ok(());
        };

        self.show(console, format!("Fetching item {id}..."))?;
        // Refetch even a cached root so comments posted since the last run show up.
        let Some(root) = app.items.refresh(id).await.cloned() else {
            let reason = app
                .items
                .take_last_error()
                .map(|e| e.to_string())
                .unwrap_or_default();
            self.display = format!("Could not fetch HN post! {reason}");
            return Ok(());
        };

        let author = app.config.required_author.as_str();
        if root.by.as_deref() != Some(author) {
            warn!("Item {} is by {:?}, expected {}", id, root.by, author);
            self.display = format!("This does not seem to be a {author} post!");
            return Ok(());
        }

        let total = root.kids.len();
        self.show(
            console,
            format!("There are {total} comments here, fetch them? [y/n]"),
        )?;
        loop {
            match console.read_key()?.to_ascii_lowercase() {
                'y' => break,
                'n' => {
                    self.display = "Fetch cancelled.".to_string();
                    return Ok(());
                }
                _ => self.show(
                    console,
                    format!("There are {total} comments here, fetch them? Please enter y or n."),
                )?,
            }
        }

        let header = Self::commands().summary();
        let mut draw_error = None;
        let available = app
            .items
            .fetch_children(&root, |done, total| {
                let body = Self::body(&format!("{done}/{total} comments fetched..."));
                if let Err(e) = console.draw(&header, &body) {
                    draw_error.get_or_insert(e);
                }
            })
            .await;
        if let Some(e) = draw_error {
            return Err(e);
        }

        info!("Update of item {} done: {}/{} comments", id, available, total);
        self.display = format!("{total}/{total} comments fetched...\ndone.");
        if available < total {
            self.display
                .push_str(&format!("\n{} could not be fetched.", total - available));
        }
        Ok(())
    }

    fn stats(&mut self, app: &App) {
        let comments = app.items.iter().filter(|item| item.is_comment()).count();
        self.display = format!(
            "Cached items: {} ({} comments)\nTagged items: {}\nRated items: {}\nSave file: {}",
            app.items.len(),
            comments,
            app.annotations.tagged_count(),
            app.annotations.rated_count(),
            app.config.save_file.display()
        );
    }
}

#[async_trait]
impl Screen for MainScreen {
    type Command = MainCommand;

    fn commands() -> &'static CommandTable<MainCommand> {
        static TABLE: OnceLock<CommandTable<MainCommand>> = OnceLock::new();
        TABLE.get_or_init(|| {
            CommandTable::build(COMMANDS).unwrap_or_else(|e| panic!("main screen: {e}"))
        })
    }

    fn render(&self, _app: &App) -> String {
        Self::body(&self.display)
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    async fn execute(
        &mut self,
        command: MainCommand,
        app: &mut App,
        console: &mut dyn Console,
    ) -> io::Result<()> {
        match command {
            MainCommand::Quit => self.lifecycle.stop(),
            MainCommand::UpdateJobs => self.update_jobs(app, console).await?,
            MainCommand::Select => {
                self.display.clear();
                command::run(&mut SelectorScreen::new(), app, console).await?;
            }
            MainCommand::Stats => self.stats(app),
        }
        Ok(())
    }
}

/// Item id from a forum link (`...item?id=123&p=2`) or a bare id.
pub fn parse_item_ref(input: &str) -> Option<u64> {
    let after_id = input.rsplit("id=").next()?;
    after_id.split('&').next()?.trim().parse().ok()
}
