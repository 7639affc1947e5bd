//! Employee task records with computed remuneration, kept in sync with a
//! REST backend.

pub mod calculator;
pub mod commands;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod store;
pub mod tui;
pub mod validation;

pub use error::{Error, Result};
