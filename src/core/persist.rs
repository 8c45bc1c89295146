//! # Save File
//!
//! The whole session state lives in one JSON document:
//!
//! ```text
//! {
//!   "tags":    { "<id>": ["remote", ...], ... },
//!   "ratings": { "<id>": 3, ... },
//!   "cache":   { "<id>": { ...item... }, ... }    // only with persistent_cache
//! }
//! ```
//!
//! A missing file is an empty state. A file that exists but does not parse is
//! an error: the caller stops before the UI starts, so the shutdown write
//! never clobbers data the user may still want to repair by hand.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::item::Item;
use crate::core::store::{AnnotationStore, ItemStore};

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct SaveFile {
    pub tags: BTreeMap<u64, Vec<String>>,
    pub ratings: BTreeMap<u64, i64>,
    /// Cached items in insertion order, written as an id-keyed object.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "ordered_cache")]
    pub cache: Option<Vec<Item>>,
}

#[derive(Debug)]
pub enum PersistError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "save file I/O error: {e}"),
            PersistError::Parse(e) => write!(f, "save file is malformed: {e}"),
        }
    }
}

impl std::error::Error for PersistError {}

impl SaveFile {
    /// Snapshot the stores. The item cache is included only when asked.
    pub fn capture(items: &ItemStore, annotations: &AnnotationStore, with_cache: bool) -> Self {
        Self {
            tags: annotations.all_tags().clone(),
            ratings: annotations.all_ratings().clone(),
            cache: with_cache.then(|| items.iter().cloned().collect()),
        }
    }

    /// Move the loaded state into the stores. A cache section is ignored when
    /// persistent caching is off.
    pub fn restore(self, items: &mut ItemStore, with_cache: bool) -> AnnotationStore {
        if with_cache {
            for item in self.cache.unwrap_or_default() {
                items.insert(item);
            }
        }
        AnnotationStore::from_parts(self.tags, self.ratings)
    }
}

/// Read the save file. `Ok(None)` when it does not exist.
pub fn load(path: &Path) -> Result<Option<SaveFile>, PersistError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No save file at {}, starting empty", path.display());
            return Ok(None);
        }
        Err(e) => return Err(PersistError::Io(e)),
    };
    let data: SaveFile = serde_json::from_str(&json).map_err(PersistError::Parse)?;
    info!(
        "Loaded {} tagged, {} rated, {} cached items from {}",
        data.tags.len(),
        data.ratings.len(),
        data.cache.as_ref().map_or(0, Vec::len),
        path.display()
    );
    Ok(Some(data))
}

/// Write the save file, replacing any previous one.
pub fn save(path: &Path, data: &SaveFile) -> Result<(), PersistError> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string(data).map_err(PersistError::Parse)?;
    fs::write(&tmp_path, json).map_err(PersistError::Io)?;
    fs::rename(&tmp_path, path).map_err(PersistError::Io)?;
    debug!("Saved state to {}", path.display());
    Ok(())
}

/// `cache` is an object keyed by string id on disk and an ordered list in
/// memory. Entries are written in list order and read back in document
/// order, so the item store's insertion order survives a restart.
mod ordered_cache {
    use super::Item;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(cache: &Option<Vec<Item>>, s: S) -> Result<S::Ok, S::Error> {
        let items = cache.as_deref().unwrap_or_default();
        let mut map = s.serialize_map(Some(items.len()))?;
        for item in items {
            map.serialize_entry(&item.id.to_string(), item)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Item>>, D::Error> {
        struct CacheVisitor;

        impl<'de> Visitor<'de> for CacheVisitor {
            type Value = Option<Vec<Item>>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of id → item")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut items = Vec::new();
                while let Some((_key, item)) = map.next_entry::<String, Item>()? {
                    items.push(item);
                }
                Ok(Some(items))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(None)
            }
        }

        d.deserialize_any(CacheVisitor)
    }
}
