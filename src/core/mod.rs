//! # Core Application Logic
//!
//! Everything that decides what happens, independent of the terminal:
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │            CORE             │
//!                    │                             │
//!                    │  • item      (data model)   │
//!                    │  • store     (items, tags)  │
//!                    │  • expr      (filter/sort)  │
//!                    │  • command   (key dispatch) │
//!                    │  • persist   (save file)    │
//!                    └──────────────┬──────────────┘
//!                                   │
//!            ┌──────────────────────┼──────────────────────┐
//!            ▼                      ▼                      ▼
//!     ┌────────────┐         ┌────────────┐         ┌────────────┐
//!     │  Screens   │         │    TUI     │         │    API     │
//!     │ main/sel/  │         │  Console   │         │  HnClient  │
//!     │  review    │         │ (ratatui)  │         │ (reqwest)  │
//!     └────────────┘         └────────────┘         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all shared state in one place
//! - [`command`]: Shortcut tables and the screen loop
//! - [`expr`]: Filter and sorter expressions

pub mod command;
pub mod config;
pub mod expr;
pub mod item;
pub mod persist;
pub mod state;
pub mod store;
