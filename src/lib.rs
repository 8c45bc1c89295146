//! hnjobs library exports for the binary and for testing

pub mod api;
pub mod core;
pub mod screens;
pub mod tui;

#[cfg(test)]
pub mod test_support;
