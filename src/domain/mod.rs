//! Domain layer - Records and calculations

pub mod carpentry;
pub mod date_input;
pub mod document;
pub mod finance;
pub mod philosophy;
pub mod tags;

pub use carpentry::UnitSystem;
pub use date_input::DateInput;
pub use document::CodexDocument;
pub use finance::{Transaction, TransactionKind};
pub use philosophy::{JournalEntry, Mood, PromptTheme, Reflection};
