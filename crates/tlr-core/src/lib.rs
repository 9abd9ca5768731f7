//! Core domain + application logic for the translation relay bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the HTTP translation
//! service live behind ports (traits) implemented in adapter crates.

pub mod admission;
pub mod config;
pub mod domain;
pub mod errors;
pub mod language;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod relay;

pub use errors::{Error, Result};
