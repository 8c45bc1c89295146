//! # Screens
//!
//! The three modal screens. Each one owns only its view state; everything
//! shared lives in [`App`](crate::core::state::App).
//!
//! ```text
//! Main ──(s)elect──► Selector ──(r)eview selected──► Review
//!   ▲                   │                               │
//!   └──────(q)uit───────┘◄──────────(q)uit──────────────┘
//! ```
//!
//! "review selected" stops the Selector before Review starts, so quitting
//! Review lands back on Main.
//!
//! [`run_session`] runs Main and then always writes the save file, also when
//! the loop ends with Ctrl+C or a console error.

use std::io;

use log::{error, info};

use crate::core::command;
use crate::core::persist::PersistError;
use crate::core::state::App;
use crate::tui::Console;

pub mod main_menu;
pub mod review;
pub mod selector;

pub use main_menu::MainScreen;
pub use review::ReviewScreen;
pub use selector::SelectorScreen;

/// How a session ended: the screen loop's result and the shutdown save.
#[derive(Debug)]
pub struct SessionEnd {
    pub ui: io::Result<()>,
    pub save: Result<(), PersistError>,
}

impl SessionEnd {
    /// The console error that ended the session, if any. Ctrl+C is a normal
    /// way out and does not count.
    pub fn ui_error(&self) -> Option<&io::Error> {
        self.ui
            .as_ref()
            .err()
            .filter(|e| e.kind() != io::ErrorKind::Interrupted)
    }
}

/// Runs the Main screen to completion, then writes the save file.
pub async fn run_session(app: &mut App, console: &mut dyn Console) -> SessionEnd {
    let ui = command::run(&mut MainScreen::new(), app, console).await;
    match &ui {
        Ok(()) => info!("Session ended"),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => info!("Session interrupted"),
        Err(e) => error!("Terminal error: {}", e),
    }

    let save = app.save();
    match &save {
        Ok(()) => info!("State saved to {}", app.config.save_file.display()),
        Err(e) => error!("Failed to save state: {}", e),
    }
    SessionEnd { ui, save }
}

/// Splits a comma-separated prompt answer into trimmed, non-blank entries.
pub(crate) fn split_entries(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
