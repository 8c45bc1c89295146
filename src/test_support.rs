//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{FetchError, ItemFetcher};
use crate::core::config::ResolvedConfig;
use crate::core::item::{Item, ItemKind};
use crate::core::state::App;
use crate::tui::{Console, interrupted};

pub const ESC: &str = "\u{1b}";

/// In-memory fetcher that records every request.
#[derive(Default)]
pub struct MemoryFetcher {
    items: Mutex<HashMap<u64, Item>>,
    requests: Mutex<Vec<u64>>,
}

impl MemoryFetcher {
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: Mutex::new(items.into_iter().map(|i| (i.id, i)).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, item: Item) {
        self.items.lock().unwrap().insert(item.id, item);
    }

    /// Stop serving `id`, as if it had been deleted upstream.
    pub fn remove(&self, id: u64) {
        self.items.lock().unwrap().remove(&id);
    }

    /// Every requested id, in request order.
    pub fn requested(&self) -> Vec<u64> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self, id: u64) -> usize {
        self.requests.lock().unwrap().iter().filter(|&&r| r == id).count()
    }
}

#[async_trait]
impl ItemFetcher for MemoryFetcher {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_item(&self, id: u64) -> Result<Item, FetchError> {
        self.requests.lock().unwrap().push(id);
        self.items
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(FetchError::NotFound(id))
    }
}

/// Console fed from a script. Running out of keys or lines reports an
/// interrupt, the same way Ctrl+C ends a real session. A scripted line of
/// `ESC` stands for an Escape-cancelled prompt.
#[derive(Default)]
pub struct ScriptedConsole {
    keys: VecDeque<char>,
    lines: VecDeque<Option<String>>,
    /// Every drawn screen as `header\n\nbody`.
    pub frames: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn with_keys(keys: &str) -> Self {
        Self {
            keys: keys.chars().collect(),
            ..Default::default()
        }
    }

    pub fn with_lines(mut self, lines: &[&str]) -> Self {
        self.lines = lines
            .iter()
            .map(|&l| (l != ESC).then(|| l.to_string()))
            .collect();
        self
    }

    pub fn keys_left(&self) -> usize {
        self.keys.len()
    }

    pub fn last_frame(&self) -> &str {
        self.frames.last().map(String::as_str).unwrap_or_default()
    }
}

impl Console for ScriptedConsole {
    fn draw(&mut self, header: &str, body: &str) -> io::Result<()> {
        self.frames.push(format!("{header}\n\n{body}"));
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<char> {
        self.keys.pop_front().ok_or_else(interrupted)
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front().ok_or_else(interrupted)
    }
}

pub fn comment(id: u64, text: &str) -> Item {
    Item {
        id,
        kind: ItemKind::Comment,
        time: 1_700_000_000 + id as i64,
        title: None,
        text: Some(text.to_string()),
        parent: None,
        kids: Vec::new(),
        by: Some("commenter".to_string()),
        url: None,
        score: None,
        descendants: None,
        deleted: None,
        dead: None,
        poll: None,
        parts: None,
    }
}

pub fn story_with_kids(id: u64, by: &str, kids: Vec<u64>) -> Item {
    Item {
        kind: ItemKind::Story,
        title: Some("Ask HN: Who is hiring?".to_string()),
        text: None,
        by: Some(by.to_string()),
        descendants: Some(kids.len() as u64),
        kids,
        ..comment(id, "")
    }
}

/// Creates a test App whose fetcher serves `items`. The save file points at
/// a path that is never written by these tests.
pub fn test_app(items: impl IntoIterator<Item = Item>) -> App {
    test_app_with(Arc::new(MemoryFetcher::new(items)))
}

pub fn test_app_with(fetcher: Arc<MemoryFetcher>) -> App {
    let config = ResolvedConfig {
        save_file: std::env::temp_dir().join("hnjobs-test-unused.json"),
        ..ResolvedConfig::default()
    };
    App::new(fetcher, config)
}
