//! Infrastructure layer - Files on disk

pub mod home;
pub mod settings;
pub mod store;

pub use home::CodexHome;
pub use settings::{Module, Settings};
pub use store::JsonStore;
