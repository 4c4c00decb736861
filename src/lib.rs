//! codex - Personal life notebook
//!
//! Tracks income and expenses, estimates lumber for carpentry projects and
//! keeps a tagged journal with guided reflections. Everything is stored in
//! one JSON file and served through a small web UI.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod web;

pub use error::CodexError;
