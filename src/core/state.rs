//! # Application State
//!
//! Everything the screens share, in one place:
//!
//! ```text
//! App
//! ├── items: ItemStore              // fetched items, get-or-fetch
//! ├── annotations: AnnotationStore  // user tags and ratings
//! └── config: ResolvedConfig        // resolved settings
//! ```
//!
//! Created once in `main`, restored from the save file, lent to each screen
//! by `&mut`, and written back at shutdown. There is no other global state.

use std::sync::Arc;

use crate::api::ItemFetcher;
use crate::core::config::ResolvedConfig;
use crate::core::persist::{self, PersistError, SaveFile};
use crate::core::store::{AnnotationStore, ItemStore};

pub struct App {
    pub items: ItemStore,
    pub annotations: AnnotationStore,
    pub config: ResolvedConfig,
}

impl App {
    pub fn new(fetcher: Arc<dyn ItemFetcher>, config: ResolvedConfig) -> Self {
        Self {
            items: ItemStore::new(fetcher),
            annotations: AnnotationStore::new(),
            config,
        }
    }

    /// Builds the app and restores the save file named in the config.
    /// A missing file yields an empty state.
    pub fn load(fetcher: Arc<dyn ItemFetcher>, config: ResolvedConfig) -> Result<Self, PersistError> {
        let mut app = Self::new(fetcher, config);
        if let Some(data) = persist::load(&app.config.save_file)? {
            app.annotations = data.restore(&mut app.items, app.config.persistent_cache);
        }
        Ok(app)
    }

    /// Writes the full state to the save file, replacing the previous one.
    pub fn save(&self) -> Result<(), PersistError> {
        let data = SaveFile::capture(&self.items, &self.annotations, self.config.persistent_cache);
        persist::save(&self.config.save_file, &data)
    }
}
