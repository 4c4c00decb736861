//! Application layer - Use cases and orchestration

pub mod carpentry;
pub mod dashboard;
pub mod export;
pub mod finance;
pub mod init;
pub mod manage_config;
pub mod philosophy;

pub use carpentry::{CarpentryService, ProjectDraft};
pub use dashboard::{DashboardService, Stats};
pub use finance::{AddTransaction, FinanceService};
pub use manage_config::ConfigService;
pub use philosophy::{HistoryQuery, JournalInput, PhilosophyService};
